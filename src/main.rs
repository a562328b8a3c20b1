use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{Duplicate, FileSpec, Logger};
use std::path::PathBuf;
use thermal_triage::core_modules::image_loader;
use thermal_triage::parallel_pipeline;
use thermal_triage::pipeline::{TriageConfig, TriagePipeline, DEFAULT_REGION_RANGE};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Flag thermal survey images that contain an enclosed hot or cold spot"
)]
struct Args {
    /// Folder holding the survey images (jpg/jpeg/png)
    folder: PathBuf,

    /// Maximum intensity difference between neighboring pixels of one region
    #[arg(long, default_value_t = DEFAULT_REGION_RANGE)]
    region_range: u32,

    /// Analyze the batch across a worker pool instead of sequentially
    #[arg(long)]
    parallel: bool,

    /// Worker count for --parallel; 0 selects one worker per CPU
    #[arg(long, default_value_t = 0)]
    workers: usize,
}

fn setup_logging(base_level: &str) -> Result<()> {
    let _ = Logger::try_with_env_or_str(base_level)?
        .log_to_file(FileSpec::default().directory("logs"))
        .duplicate_to_stderr(Duplicate::Warn)
        .start()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging("info").context("logger initialization failed")?;
    let args = Args::parse();
    let config = TriageConfig {
        region_range: args.region_range,
    };

    let scan = image_loader::load_survey_folder(&args.folder)
        .with_context(|| format!("failed to scan '{}'", args.folder.display()))?;

    let report = if args.parallel {
        parallel_pipeline::check_parallel(scan.images, config, args.workers).await
    } else {
        let mut pipeline = TriagePipeline::new(config);
        for (name, grid) in scan.images {
            pipeline.add_image(name, grid)?;
        }
        pipeline.check()
    };

    println!("Images checked: {}", bracketed(&report.processed));
    println!(
        "Images with spots significantly different than surrounding areas: {}",
        bracketed(&report.flagged)
    );
    if !scan.decode_failures.is_empty() {
        println!(
            "Images that could not be decoded: {}",
            bracketed(&scan.decode_failures)
        );
    }
    if !report.failures.is_empty() {
        println!(
            "Images that could not be analyzed: {}",
            bracketed(&report.failures)
        );
    }

    Ok(())
}

fn bracketed(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}
