use crate::core_modules::intensity_grid::IntensityGrid;
use crate::error::{Result, TriageError};
use image::DynamicImage;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// File extensions the folder scan accepts.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// The outcome of scanning one survey folder.
#[derive(Debug, Default)]
pub struct FolderScan {
    /// Decoded images as (file name, grid) pairs, ordered by file name.
    pub images: Vec<(String, IntensityGrid)>,
    /// File names that matched a supported extension but failed to decode.
    pub decode_failures: Vec<String>,
}

/// Loads every supported image under `dir` into an intensity grid.
///
/// Files are taken in file-name order so a folder always produces the same
/// batch order. A file that fails to decode is logged, recorded in
/// `decode_failures` and skipped; only an unusable folder aborts the scan.
pub fn load_survey_folder(dir: &Path) -> Result<FolderScan> {
    if dir.as_os_str().is_empty() {
        return Err(TriageError::InvalidInput(
            "survey folder path is empty".to_string(),
        ));
    }

    let entries = std::fs::read_dir(dir).map_err(|err| {
        TriageError::InvalidInput(format!("cannot read folder '{}': {}", dir.display(), err))
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| {
            TriageError::InvalidInput(format!("cannot read folder '{}': {}", dir.display(), err))
        })?;
        let path = entry.path();
        if has_supported_extension(&path) {
            paths.push(path);
        } else {
            debug!("ignoring non-image entry '{}'", path.display());
        }
    }
    paths.sort();

    let mut scan = FolderScan::default();
    for path in paths {
        match load_survey_image(&path) {
            Ok((name, grid)) => scan.images.push((name, grid)),
            Err(err) => {
                warn!("skipping image: {}", err);
                scan.decode_failures.push(file_name_of(&path));
            }
        }
    }
    Ok(scan)
}

/// Decodes a single image file. The returned identifier is the file name.
pub fn load_survey_image(path: &Path) -> Result<(String, IntensityGrid)> {
    let name = file_name_of(path);
    let img = image::open(path).map_err(|source| TriageError::DecodeFailure {
        name: name.clone(),
        source,
    })?;
    Ok((name, grid_from_image(&img)))
}

/// Collapses a decoded image to one intensity per pixel by averaging its
/// color channels. Gray-scale sources pass through unchanged.
pub fn grid_from_image(img: &DynamicImage) -> IntensityGrid {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut data = Vec::with_capacity((width * height) as usize);
    for pixel in rgb.pixels() {
        let [r, g, b] = pixel.0;
        data.push((r as u32 + g as u32 + b as u32) / 3);
    }

    IntensityGrid {
        width,
        height,
        data,
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_name_of(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}
