/// Default backend base URL, matching the local dev server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";

/// Environment variable that overrides the base URL.
pub const BASE_URL_ENV: &str = "SMOKE_BASE_URL";

/// Suite configuration
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,

    /// Per-request timeout (ms)
    pub request_timeout_ms: u64,

    /// Delay between write and read in the persistence case (ms)
    pub settle_delay_ms: u64,

    /// Client name sent by the create case
    pub client_name: String,

    /// Origin header sent by the CORS case
    pub origin: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 10_000,
            settle_delay_ms: 1_000,
            client_name: "SmartTour Test Client".to_string(),
            origin: "http://localhost:3000".to_string(),
        }
    }
}

impl SuiteConfig {
    /// Defaults plus the `SMOKE_BASE_URL` environment override.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.is_empty() {
                config.base_url = url.trim_end_matches('/').to_string();
            }
        }
        config
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.settle_delay_ms, 1_000);
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = SuiteConfig::default().with_base_url("http://10.0.0.2:9000/api/");
        assert_eq!(config.base_url, "http://10.0.0.2:9000/api");
    }

    #[test]
    fn test_env_override() {
        std::env::set_var(BASE_URL_ENV, "http://staging:8001/api");
        let config = SuiteConfig::from_env();
        std::env::remove_var(BASE_URL_ENV);
        assert_eq!(config.base_url, "http://staging:8001/api");
    }
}
