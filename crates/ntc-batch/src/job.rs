use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ntc_dichotomy::{LimitingCause, SearchResult};

/// One independent dichotomy search within a sweep.
///
/// The batch layer stays oracle-agnostic: anything scenario-specific beyond
/// the search interval (secure limits for the simulated oracle, snapshot
/// paths for a real one) travels in `metadata` and is interpreted by the
/// caller's job factory.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub job_id: String,
    pub scenario_id: String,
    pub min_exchange: f64,
    pub max_exchange: f64,
    pub precision: f64,
    pub metadata: HashMap<String, String>,
}

/// Per-job outcome row persisted into the batch manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub job_id: String,
    pub scenario_id: String,
    pub status: String,
    pub error: Option<String>,
    pub limiting_cause: Option<LimitingCause>,
    pub limiting_message: Option<String>,
    pub best_secure_mw: Option<f64>,
    pub best_insecure_mw: Option<f64>,
}

impl SearchRecord {
    pub fn from_result<V>(job: &SearchJob, result: &SearchResult<V>) -> Self {
        Self {
            job_id: job.job_id.clone(),
            scenario_id: job.scenario_id.clone(),
            status: "ok".to_string(),
            error: None,
            limiting_cause: Some(result.limiting_cause()),
            limiting_message: Some(result.limiting_message().to_string()),
            best_secure_mw: result.best_secure_value(),
            best_insecure_mw: result.best_insecure_value(),
        }
    }

    pub fn from_error(job: &SearchJob, error: &anyhow::Error) -> Self {
        Self {
            job_id: job.job_id.clone(),
            scenario_id: job.scenario_id.clone(),
            status: "error".to_string(),
            error: Some(error.to_string()),
            limiting_cause: None,
            limiting_message: None,
            best_secure_mw: None,
            best_insecure_mw: None,
        }
    }
}
