pub mod enclosure;
pub mod image_loader;
pub mod intensity_grid;
pub mod region_labeler;
pub mod region_map;
