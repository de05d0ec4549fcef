use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde_json::{Value, json};

use crate::config::Config;

const USER_AGENT: &str = "replanta/0.1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the connection-pooled client shared by every upstream adapter.
///
/// The overall timeout is a deployment setting; the pipeline itself never
/// enforces one.
pub fn build_client(config: &Config) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.upstream_timeout())
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
}

/// Keep an upstream error body for the caller: structured when it parses as
/// JSON, wrapped as `raw_response` otherwise.
pub fn error_details(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "raw_response": body }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;

    #[test]
    fn test_error_details_parses_json() {
        let details = error_details(r#"{"errors":[{"code":6000}]}"#);
        assert_eq!(details["errors"][0]["code"], 6000);
    }

    #[test]
    fn test_error_details_wraps_plain_text() {
        let details = error_details("Bad Gateway");
        assert_eq!(details, json!({"raw_response": "Bad Gateway"}));
    }

    #[test]
    fn test_build_client_from_config() {
        let config = Config::new(Credentials {
            openai_api_key: "k".into(),
            medium_token: "m".into(),
            imgur_client_id: "i".into(),
            devto_token: "d".into(),
        })
        .with_upstream_timeout(Duration::from_secs(5));
        assert!(build_client(&config).is_ok());
    }
}
