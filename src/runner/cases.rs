//! The test cases of the smoke suite, in their fixed execution order.
//!
//! Each case owns one network-failure domain: transport errors are caught
//! at the case boundary and converted into a failing result, so no case can
//! abort the run. Bodies that fail to decode as JSON fail at the point of
//! decode, same as a transport error.

use super::events::{EventEmitter, TestEvent};
use super::state::{SuiteReport, SuiteState};
use crate::client::{ApiClient, RootMessage, StatusCheck};
use crate::utils::config::SuiteConfig;
use log::debug;
use std::time::Duration;

/// Case names in execution order.
pub const CASE_NAMES: [&str; 7] = [
    "Basic API Connectivity",
    "CORS Configuration",
    "Response Format",
    "Create Status Check",
    "Get Status Checks",
    "Database Persistence",
    "Error Handling",
];

/// Executes the fixed case list against one backend and records results.
pub struct SuiteRunner {
    client: ApiClient,
    config: SuiteConfig,
    state: SuiteState,
    emitter: EventEmitter,
}

impl SuiteRunner {
    pub fn new(client: ApiClient, config: SuiteConfig, emitter: EventEmitter) -> Self {
        Self {
            client,
            config,
            state: SuiteState::new(),
            emitter,
        }
    }

    /// Run every case in order. No case's outcome gates the ones after it.
    pub async fn run_all(&mut self) -> SuiteReport {
        self.state.start();
        self.emitter.emit(TestEvent::SuiteStarted {
            session_id: self.state.session_id.clone(),
            base_url: self.client.base_url().to_string(),
            case_count: CASE_NAMES.len(),
        });

        self.check_connectivity().await;
        self.check_cors_headers().await;
        self.check_response_format().await;
        self.check_create_status().await;
        self.check_list_status().await;
        self.check_persistence().await;
        self.check_error_handling().await;

        self.state.finish();
        let report = self.state.to_report();
        self.emitter.emit(TestEvent::SuiteFinished {
            summary: report.summary.clone(),
            failures: report.failures(),
        });
        report
    }

    /// GET root must answer 200 with `message == "Hello World"`.
    pub async fn check_connectivity(&mut self) {
        const NAME: &str = "Basic API Connectivity";
        self.begin(NAME);

        match self.client.get_root().await {
            Ok(resp) if resp.is_ok() => match resp.json::<RootMessage>() {
                Ok(root) if root.message.as_deref() == Some("Hello World") => {
                    let message = format!("Successfully connected to {}", self.client.base_url());
                    self.log_test(NAME, true, message, None);
                }
                Ok(root) => {
                    let message = format!(
                        "Unexpected root message: expected \"Hello World\", got {:?}",
                        root.message
                    );
                    self.log_test(NAME, false, message, resp.raw());
                }
                Err(e) => self.log_test(NAME, false, e.to_string(), None),
            },
            Ok(resp) => {
                let message = format!("HTTP {}: {}", resp.status, resp.body);
                self.log_test(NAME, false, message, resp.raw());
            }
            Err(e) => self.log_test(NAME, false, format!("Connection error: {}", e), None),
        }
    }

    /// A request carrying an Origin header must come back with a non-empty
    /// `Access-Control-Allow-Origin`.
    pub async fn check_cors_headers(&mut self) {
        const NAME: &str = "CORS Configuration";
        self.begin(NAME);

        match self.client.get_root_with_origin(&self.config.origin).await {
            Ok(resp) => match resp.allow_origin.as_deref().filter(|v| !v.is_empty()) {
                Some(allowed) => {
                    let message = format!("Access-Control-Allow-Origin: {}", allowed);
                    self.log_test(NAME, true, message, None);
                }
                None => {
                    self.log_test(
                        NAME,
                        false,
                        "Access-Control-Allow-Origin header missing".to_string(),
                        resp.raw(),
                    );
                }
            },
            Err(e) => self.log_test(NAME, false, format!("Error testing CORS: {}", e), None),
        }
    }

    /// Root body must be an object carrying `message`; the status list must
    /// be an array. Logs one result per endpoint.
    pub async fn check_response_format(&mut self) {
        self.begin("Response Format");

        const ROOT: &str = "Response Format - Root";
        match self.client.get_root().await {
            Ok(resp) if resp.is_ok() => match resp.json::<serde_json::Value>() {
                Ok(serde_json::Value::Object(map)) if map.contains_key("message") => {
                    self.log_test(
                        ROOT,
                        true,
                        "Root endpoint returns a JSON object with `message`".to_string(),
                        None,
                    );
                }
                Ok(other) => {
                    let message =
                        format!("Root endpoint shape invalid: got {}", json_type(&other));
                    self.log_test(ROOT, false, message, resp.raw());
                }
                Err(e) => self.log_test(ROOT, false, e.to_string(), None),
            },
            Ok(resp) => {
                let message = format!("HTTP {}: {}", resp.status, resp.body);
                self.log_test(ROOT, false, message, resp.raw());
            }
            Err(e) => self.log_test(ROOT, false, format!("Request error: {}", e), None),
        }

        const LIST: &str = "Response Format - Status List";
        match self.client.list_status().await {
            Ok(resp) if resp.is_ok() => match resp.json::<serde_json::Value>() {
                Ok(serde_json::Value::Array(_)) => {
                    self.log_test(
                        LIST,
                        true,
                        "Status list endpoint returns a JSON array".to_string(),
                        None,
                    );
                }
                Ok(other) => {
                    let message =
                        format!("Expected array, got {}", json_type(&other));
                    self.log_test(LIST, false, message, resp.raw());
                }
                Err(e) => self.log_test(LIST, false, e.to_string(), None),
            },
            Ok(resp) => {
                let message = format!("HTTP {}: {}", resp.status, resp.body);
                self.log_test(LIST, false, message, resp.raw());
            }
            Err(e) => self.log_test(LIST, false, format!("Request error: {}", e), None),
        }
    }

    /// POST must echo the record back with id, client_name and a parseable
    /// timestamp.
    pub async fn check_create_status(&mut self) {
        const NAME: &str = "Create Status Check";
        self.begin(NAME);

        let client_name = self.config.client_name.clone();
        match self.client.create_status(&client_name).await {
            Ok(resp) if resp.is_ok() => match resp.json::<StatusCheck>() {
                Ok(check) => {
                    let missing = check.missing_fields();
                    if !missing.is_empty() {
                        let message =
                            format!("Missing required fields: {}", missing.join(", "));
                        self.log_test(NAME, false, message, resp.raw());
                    } else if check.client_name.as_deref() != Some(client_name.as_str()) {
                        let message = format!(
                            "Client name mismatch: expected {}, got {}",
                            client_name,
                            check.client_name.unwrap_or_default()
                        );
                        self.log_test(NAME, false, message, resp.raw());
                    } else if !check.timestamp_parses() {
                        let message = format!(
                            "Timestamp not parseable: {}",
                            check.timestamp.unwrap_or_default()
                        );
                        self.log_test(NAME, false, message, resp.raw());
                    } else {
                        let message = format!(
                            "Successfully created status check with ID: {}",
                            check.id.unwrap_or_default()
                        );
                        self.log_test(NAME, true, message, None);
                    }
                }
                Err(e) => self.log_test(NAME, false, e.to_string(), resp.raw()),
            },
            Ok(resp) => {
                let message = format!("HTTP {}: {}", resp.status, resp.body);
                self.log_test(NAME, false, message, resp.raw());
            }
            Err(e) => self.log_test(NAME, false, format!("Request error: {}", e), None),
        }
    }

    /// GET must answer an array; a non-empty first element must carry every
    /// required field.
    pub async fn check_list_status(&mut self) {
        const NAME: &str = "Get Status Checks";
        self.begin(NAME);

        match self.client.list_status().await {
            Ok(resp) if resp.is_ok() => match resp.json::<Vec<StatusCheck>>() {
                Ok(checks) => {
                    if let Some(first) = checks.first() {
                        let missing = first.missing_fields();
                        if missing.is_empty() {
                            let message = format!(
                                "Successfully retrieved {} status checks",
                                checks.len()
                            );
                            self.log_test(NAME, true, message, None);
                        } else {
                            let message = format!(
                                "Status check entries missing fields: {}",
                                missing.join(", ")
                            );
                            self.log_test(NAME, false, message, resp.raw());
                        }
                    } else {
                        self.log_test(
                            NAME,
                            true,
                            "Successfully retrieved empty status checks list".to_string(),
                            None,
                        );
                    }
                }
                Err(e) => self.log_test(NAME, false, e.to_string(), resp.raw()),
            },
            Ok(resp) => {
                let message = format!("HTTP {}: {}", resp.status, resp.body);
                self.log_test(NAME, false, message, resp.raw());
            }
            Err(e) => self.log_test(NAME, false, format!("Request error: {}", e), None),
        }
    }

    /// Create a uniquely-named record, wait for the backend to settle, then
    /// find the same id/name pair in the list.
    ///
    /// The settle delay is a heuristic for asynchronous write paths, not a
    /// guarantee; a slow backend can still fail this case.
    pub async fn check_persistence(&mut self) {
        const NAME: &str = "Database Persistence";
        self.begin(NAME);

        let unique_name = unique_probe_name();

        let created_id = match self.client.create_status(&unique_name).await {
            Ok(resp) if resp.is_ok() => match resp.json::<StatusCheck>() {
                Ok(check) => match check.id {
                    Some(id) => id,
                    None => {
                        self.log_test(
                            NAME,
                            false,
                            "Create response carries no id".to_string(),
                            resp.raw(),
                        );
                        return;
                    }
                },
                Err(e) => {
                    self.log_test(NAME, false, e.to_string(), resp.raw());
                    return;
                }
            },
            Ok(resp) => {
                let message = format!("Failed to create test record: HTTP {}", resp.status);
                self.log_test(NAME, false, message, resp.raw());
                return;
            }
            Err(e) => {
                self.log_test(NAME, false, format!("Request error: {}", e), None);
                return;
            }
        };

        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        match self.client.list_status().await {
            Ok(resp) if resp.is_ok() => match resp.json::<Vec<StatusCheck>>() {
                Ok(checks) => {
                    let found = checks.iter().any(|c| {
                        c.id.as_deref() == Some(created_id.as_str())
                            && c.client_name.as_deref() == Some(unique_name.as_str())
                    });

                    if found {
                        let message = format!(
                            "Successfully persisted and retrieved record with ID: {}",
                            created_id
                        );
                        self.log_test(NAME, true, message, None);
                    } else {
                        let message = format!(
                            "Created record with ID {} not found in list",
                            created_id
                        );
                        self.log_test(NAME, false, message, None);
                    }
                }
                Err(e) => self.log_test(NAME, false, e.to_string(), resp.raw()),
            },
            Ok(resp) => {
                let message = format!("Failed to retrieve records: HTTP {}", resp.status);
                self.log_test(NAME, false, message, resp.raw());
            }
            Err(e) => self.log_test(NAME, false, format!("Request error: {}", e), None),
        }
    }

    /// Malformed bodies must be rejected with 400 or 422, never accepted.
    /// Logs one result per probe.
    pub async fn check_error_handling(&mut self) {
        self.begin("Error Handling");

        const INVALID_JSON: &str = "Error Handling - Invalid JSON";
        match self
            .client
            .post_status_raw("invalid json", "application/json")
            .await
        {
            Ok(resp) if matches!(resp.status, 400 | 422) => {
                let message =
                    format!("Properly rejected invalid JSON with HTTP {}", resp.status);
                self.log_test(INVALID_JSON, true, message, None);
            }
            Ok(resp) => {
                let message =
                    format!("Unexpected response to invalid JSON: HTTP {}", resp.status);
                self.log_test(INVALID_JSON, false, message, resp.raw());
            }
            Err(e) => {
                self.log_test(INVALID_JSON, false, format!("Request error: {}", e), None);
            }
        }

        const MISSING_FIELD: &str = "Error Handling - Missing Field";
        match self.client.post_status_raw("{}", "application/json").await {
            Ok(resp) if matches!(resp.status, 400 | 422) => {
                let message = format!(
                    "Properly rejected missing client_name with HTTP {}",
                    resp.status
                );
                self.log_test(MISSING_FIELD, true, message, None);
            }
            Ok(resp) => {
                let message =
                    format!("Unexpected response to missing field: HTTP {}", resp.status);
                self.log_test(MISSING_FIELD, false, message, resp.raw());
            }
            Err(e) => {
                self.log_test(MISSING_FIELD, false, format!("Request error: {}", e), None);
            }
        }
    }

    fn begin(&mut self, name: &str) {
        debug!("running case: {}", name);
        self.emitter.emit(TestEvent::CaseStarted {
            name: name.to_string(),
        });
    }

    fn log_test(
        &mut self,
        name: &str,
        passed: bool,
        message: String,
        response_data: Option<serde_json::Value>,
    ) {
        let result = self
            .state
            .log_test(name, passed, message, response_data)
            .clone();

        if result.passed {
            self.emitter.emit(TestEvent::CasePassed {
                name: result.name,
                message: result.message,
                duration_ms: result.duration_ms,
            });
        } else {
            self.emitter.emit(TestEvent::CaseFailed {
                name: result.name,
                message: result.message,
                duration_ms: result.duration_ms,
                response_data: result.response_data,
            });
        }
    }
}

/// Probe-record name for the persistence case: wall-clock seconds keep it
/// human-orderable, the uuid token keeps rapid consecutive runs from
/// colliding.
fn unique_probe_name() -> String {
    let token: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("DB Test Client {}-{}", chrono::Utc::now().timestamp(), token)
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_probe_names_differ_within_one_second() {
        let a = unique_probe_name();
        let b = unique_probe_name();
        assert_ne!(a, b);
        assert!(a.starts_with("DB Test Client "));
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type(&serde_json::json!([])), "array");
        assert_eq!(json_type(&serde_json::json!({})), "object");
        assert_eq!(json_type(&serde_json::json!("hi")), "string");
    }
}
