use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Root endpoint body
#[derive(Debug, Clone, Deserialize)]
pub struct RootMessage {
    pub message: Option<String>,
}

/// A status-check record as the backend returns it.
///
/// Every field is optional so that a missing field is reported by name
/// instead of failing the whole decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: Option<String>,
    pub client_name: Option<String>,
    pub timestamp: Option<String>,
}

impl StatusCheck {
    /// Names of required fields absent from this record.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("id");
        }
        if self.client_name.is_none() {
            missing.push("client_name");
        }
        if self.timestamp.is_none() {
            missing.push("timestamp");
        }
        missing
    }

    /// Whether the timestamp parses as ISO-8601, with or without an offset.
    pub fn timestamp_parses(&self) -> bool {
        match self.timestamp.as_deref() {
            Some(ts) => {
                DateTime::parse_from_rfc3339(ts).is_ok() || ts.parse::<NaiveDateTime>().is_ok()
            }
            None => false,
        }
    }
}

/// Create-status request body
#[derive(Debug, Clone, Serialize)]
pub struct CreateStatusRequest {
    pub client_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_reported_by_name() {
        let check: StatusCheck =
            serde_json::from_str(r#"{"client_name": "probe"}"#).unwrap();
        assert_eq!(check.missing_fields(), vec!["id", "timestamp"]);
    }

    #[test]
    fn test_complete_record_has_no_missing_fields() {
        let check: StatusCheck = serde_json::from_str(
            r#"{"id": "abc", "client_name": "probe", "timestamp": "2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(check.missing_fields().is_empty());
    }

    #[test]
    fn test_timestamp_parses_with_and_without_offset() {
        let mut check = StatusCheck {
            id: Some("abc".to_string()),
            client_name: Some("probe".to_string()),
            timestamp: Some("2024-05-01T10:00:00+02:00".to_string()),
        };
        assert!(check.timestamp_parses());

        check.timestamp = Some("2024-05-01T10:00:00.123456".to_string());
        assert!(check.timestamp_parses());

        check.timestamp = Some("yesterday".to_string());
        assert!(!check.timestamp_parses());

        check.timestamp = None;
        assert!(!check.timestamp_parses());
    }
}
