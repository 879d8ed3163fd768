use anyhow::{Context, Result};
use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::path::PathBuf;

use ntc_dichotomy::SearchResult;

use crate::job::{SearchJob, SearchRecord};
use crate::manifest::{write_batch_manifest, BatchManifest};

/// Settings for one sweep.
pub struct BatchRunnerConfig {
    /// Directory receiving the batch manifest.
    pub output_root: PathBuf,
    /// Sweep label written into the manifest.
    pub sweep: String,
    /// Worker threads; 0 auto-detects the CPU count.
    pub threads: usize,
}

/// Summary returned after the run so clients can log success/failure counts
/// and the manifest location.
pub struct BatchSummary {
    pub success: usize,
    pub failure: usize,
    pub manifest_path: PathBuf,
    pub jobs: Vec<SearchRecord>,
}

/// Run every job's search on a Rayon pool and write the manifest.
///
/// `search` builds and runs one complete search for a job — index, strategy,
/// oracle and a *fresh model instance* per call, since searches must never
/// share a model. A failing job is recorded with status "error" and the sweep
/// carries on.
pub fn run_batch<V, F>(
    config: &BatchRunnerConfig,
    jobs: &[SearchJob],
    search: F,
) -> Result<BatchSummary>
where
    F: Fn(&SearchJob) -> Result<SearchResult<V>> + Sync,
{
    fs::create_dir_all(&config.output_root).with_context(|| {
        format!(
            "creating batch output root '{}'",
            config.output_root.display()
        )
    })?;

    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building Rayon thread pool for batch searches")?;

    let job_records: Vec<SearchRecord> = pool.install(|| {
        jobs.par_iter()
            .map(|job| run_search_job(job, &search))
            .collect()
    });

    let success = job_records
        .iter()
        .filter(|record| record.status == "ok")
        .count();
    let failure = job_records.len() - success;

    let manifest = BatchManifest {
        created_at: Utc::now(),
        sweep: config.sweep.clone(),
        num_jobs: job_records.len(),
        success,
        failure,
        jobs: job_records.clone(),
    };
    let manifest_path = config.output_root.join("batch_manifest.json");
    write_batch_manifest(&manifest_path, &manifest)?;
    Ok(BatchSummary {
        success,
        failure,
        manifest_path,
        jobs: job_records,
    })
}

fn run_search_job<V, F>(job: &SearchJob, search: &F) -> SearchRecord
where
    F: Fn(&SearchJob) -> Result<SearchResult<V>> + Sync,
{
    match search(job) {
        Ok(result) => SearchRecord::from_result(job, &result),
        Err(err) => {
            eprintln!("batch job {} failed: {err}", job.job_id);
            SearchRecord::from_error(job, &err)
        }
    }
}
