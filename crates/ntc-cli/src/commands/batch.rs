use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::info;

use ntc_batch::{run_batch, BatchRunnerConfig, SearchJob};
use ntc_dichotomy::sim::SimReport;
use ntc_dichotomy::SearchResult;

use crate::cli::{BatchArgs, SearchArgs, StrategyKind};
use crate::commands::search::run_simulated_search;
use crate::config::SearchParams;

pub fn handle(args: &BatchArgs) -> Result<()> {
    let jobs: Vec<SearchJob> = args.limits.iter().map(|limit| job(args, *limit)).collect();
    info!(jobs = jobs.len(), out = %args.out.display(), "starting secure-limit sweep");

    let config = BatchRunnerConfig {
        output_root: args.out.clone(),
        sweep: "secure-limit-sweep".to_string(),
        threads: args.threads,
    };
    let summary = run_batch(&config, &jobs, run_job)?;

    eprintln!(
        "batch finished: {} ok, {} failed, manifest at {}",
        summary.success,
        summary.failure,
        summary.manifest_path.display()
    );
    println!("{}", summary.manifest_path.display());
    Ok(())
}

fn job(args: &BatchArgs, secure_limit: f64) -> SearchJob {
    let mut metadata = HashMap::new();
    metadata.insert("secure_limit".to_string(), secure_limit.to_string());
    SearchJob {
        job_id: format!("secure-limit-sweep:limit-{secure_limit}"),
        scenario_id: format!("limit-{secure_limit}"),
        min_exchange: args.min,
        max_exchange: args.max,
        precision: args.precision,
        metadata,
    }
}

fn run_job(job: &SearchJob) -> Result<SearchResult<SimReport>> {
    let secure_limit: f64 = job
        .metadata
        .get("secure_limit")
        .context("job is missing a secure_limit")?
        .parse()
        .context("secure_limit is not a number")?;
    let args = SearchArgs {
        min: Some(job.min_exchange),
        max: Some(job.max_exchange),
        precision: Some(job.precision),
        strategy: Some(StrategyKind::RangeDivision),
        secure_limit: Some(secure_limit),
        ..SearchArgs::default()
    };
    let params = SearchParams::resolve(&args)?;
    run_simulated_search(&params)
}
