use crate::runner::state::{SuiteSummary, TestResult};
use serde::{Deserialize, Serialize};

/// Suite results envelope for report generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResults {
    pub session_id: String,
    pub results: Vec<TestResult>,
    pub summary: SuiteSummary,
    pub generated_at: String,
}
