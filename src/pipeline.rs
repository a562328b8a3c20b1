// THEORY:
// The `pipeline` module is the top-level API for the triage engine. It
// encapsulates the segmentation and containment layers behind a single
// batch-oriented interface: feed it named intensity grids, ask for a report,
// and get back which images hold an enclosed anomaly. Entries keep their
// insertion order end to end, so a batch always reports identifiers in the
// order they were loaded. Each entry caches its region map after the first
// `check`, and a failure in one image never takes down the rest of the batch.

use crate::core_modules::enclosure;
use crate::core_modules::intensity_grid::IntensityGrid;
use crate::core_modules::region_labeler::region_labeler;
use crate::core_modules::region_map::RegionMap;
use crate::error::{Result, TriageError};
use log::{error, info};

// Re-export key data structures for the public API.
pub use crate::core_modules::enclosure::Enclosure;
pub use crate::core_modules::region_labeler::region_labeler::DEFAULT_REGION_RANGE;

/// Configuration for the TriagePipeline, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// The maximum intensity difference between neighboring pixels that still
    /// places them in the same region.
    pub region_range: u32,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            region_range: DEFAULT_REGION_RANGE,
        }
    }
}

/// The outcome of analyzing a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVerdict {
    Clear,
    EnclosedAnomaly(Enclosure),
}

/// The aggregate outcome of checking a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Identifiers analyzed without error, in insertion order.
    pub processed: Vec<String>,
    /// Identifiers whose image holds an enclosed anomaly, in insertion order.
    pub flagged: Vec<String>,
    /// Identifiers excluded by an analysis failure.
    pub failures: Vec<String>,
}

/// One image held by the pipeline, with its lazily built region map.
struct ImageEntry {
    name: String,
    grid: IntensityGrid,
    regions: Option<RegionMap>,
}

/// The main, top-level struct of the triage engine.
pub struct TriagePipeline {
    config: TriageConfig,
    entries: Vec<ImageEntry>,
}

impl TriagePipeline {
    pub fn new(config: TriageConfig) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    /// Adds an image to the batch. Identifiers must be unique within one
    /// pipeline instance.
    pub fn add_image(&mut self, name: impl Into<String>, grid: IntensityGrid) -> Result<()> {
        let name = name.into();
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(TriageError::InvalidInput(format!(
                "duplicate image identifier '{}'",
                name
            )));
        }
        self.entries.push(ImageEntry {
            name,
            grid,
            regions: None,
        });
        Ok(())
    }

    /// The identifiers currently held, in insertion order.
    pub fn get_image_names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn anomalies_detected(&mut self) -> bool {
        !self.check().flagged.is_empty()
    }

    /// Labels and checks every held image, reusing region maps built by an
    /// earlier call. One image failing keeps the rest of the batch alive.
    pub fn check(&mut self) -> BatchReport {
        let mut report = BatchReport::default();

        for entry in &mut self.entries {
            if entry.regions.is_none() {
                match region_labeler::label_regions(&entry.grid, self.config.region_range) {
                    Ok(map) => entry.regions = Some(map),
                    Err(err) => {
                        let failure = TriageError::AnalysisFailure {
                            name: entry.name.clone(),
                            reason: err.to_string(),
                        };
                        error!("{}", failure);
                        report.failures.push(entry.name.clone());
                        continue;
                    }
                }
            }

            if let Some(regions) = &entry.regions {
                report.processed.push(entry.name.clone());
                if let Some(found) = enclosure::find_enclosed_region(regions) {
                    info!(
                        "'{}': region {} is fully surrounded by region {}",
                        entry.name, found.region, found.surrounded_by
                    );
                    report.flagged.push(entry.name.clone());
                }
            }
        }

        info!(
            "checked {} images, flagged {}, {} analysis failures",
            report.processed.len(),
            report.flagged.len(),
            report.failures.len()
        );
        report
    }
}

/// Labels and checks one grid without touching any cache. The parallel path
/// and one-off callers use this directly.
pub fn evaluate_grid(grid: &IntensityGrid, config: &TriageConfig) -> Result<ImageVerdict> {
    let regions = region_labeler::label_regions(grid, config.region_range)?;
    Ok(match enclosure::find_enclosed_region(&regions) {
        Some(found) => ImageVerdict::EnclosedAnomaly(found),
        None => ImageVerdict::Clear,
    })
}
