//! Parallel fan-out of independent dichotomy searches.
//!
//! One search is strictly sequential (each step depends on the previous
//! verdict), but a study usually sweeps many scenarios — seasonal grid
//! snapshots, sensitivity cases, forecast variants. Each job owns an
//! independent model instance, so jobs parallelize freely on a Rayon pool.

pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{SearchJob, SearchRecord};
pub use manifest::{load_batch_manifest, write_batch_manifest, BatchManifest};
pub use runner::{run_batch, BatchRunnerConfig, BatchSummary};
