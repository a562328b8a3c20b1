// THEORY:
// This file is the main entry point for the `thermal_triage` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (like the CLI runner
// in `main.rs`).
//
// The primary goal is to export the `TriagePipeline` and its associated data
// structures (`TriageConfig`, `BatchReport`, `ImageVerdict`) as the clean,
// high-level interface for the engine, with `check_parallel` as the
// batch-parallel alternative. The segmentation and containment internals live
// in `core_modules` and are reachable for callers that want to drive the
// layers individually.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod parallel_pipeline;
