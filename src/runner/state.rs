use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One logged assertion-group outcome. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    /// Raw response payload, retained only for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_data: Option<serde_json::Value>,
    pub duration_ms: Option<u64>,
}

/// Mutable state for one suite run.
///
/// `log_test` is the only mutation point; the result sequence is
/// append-only and `total == passed + failed` holds after every call.
#[derive(Debug)]
pub struct SuiteState {
    pub session_id: String,
    pub results: Vec<TestResult>,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    last_mark: Option<Instant>,
}

impl SuiteState {
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            results: Vec::new(),
            total: 0,
            passed: 0,
            failed: 0,
            started_at: None,
            finished_at: None,
            last_mark: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
        self.last_mark = Some(Instant::now());
    }

    /// Append one result and bump the counters. The payload is dropped for
    /// passing results.
    pub fn log_test(
        &mut self,
        name: &str,
        passed: bool,
        message: String,
        response_data: Option<serde_json::Value>,
    ) -> &TestResult {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }

        let duration_ms = self.last_mark.map(|t| t.elapsed().as_millis() as u64);
        self.last_mark = Some(Instant::now());

        self.results.push(TestResult {
            name: name.to_string(),
            passed,
            message,
            response_data: if passed { None } else { response_data },
            duration_ms,
        });

        self.results.last().expect("result just pushed")
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Instant::now());
    }

    pub fn summary(&self) -> SuiteSummary {
        let success_rate = if self.total > 0 {
            f64::from(self.passed) / f64::from(self.total) * 100.0
        } else {
            0.0
        };

        let total_duration_ms = self.started_at.map(|start| {
            self.finished_at
                .unwrap_or_else(Instant::now)
                .duration_since(start)
                .as_millis() as u64
        });

        SuiteSummary {
            session_id: self.session_id.clone(),
            total: self.total,
            passed: self.passed,
            failed: self.failed,
            success_rate,
            total_duration_ms,
        }
    }

    /// Serialize state for reporting (without Instant which isn't serializable)
    pub fn to_report(&self) -> SuiteReport {
        SuiteReport {
            session_id: self.session_id.clone(),
            results: self.results.clone(),
            summary: self.summary(),
        }
    }
}

impl Default for SuiteState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    pub session_id: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub success_rate: f64,
    pub total_duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub session_id: String,
    pub results: Vec<TestResult>,
    pub summary: SuiteSummary,
}

impl SuiteReport {
    pub fn failures(&self) -> Vec<TestResult> {
        self.results.iter().filter(|r| !r.passed).cloned().collect()
    }
}
