use serde::Deserialize;

/// Connection settings for the Judge0 API.
#[derive(Debug, Deserialize, Clone)]
pub struct Judge0Config {
    /// Base URL of the Judge0 instance. Default: "http://localhost:2358".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Header carrying `auth_token`. Default: "X-Auth-Token".
    /// Use "x-rapidapi-key" for the hosted API.
    #[serde(default = "default_auth_header")]
    pub auth_header: String,
    /// Authentication token. No auth header is sent when unset.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Value for the `x-rapidapi-host` header, when going through RapidAPI.
    #[serde(default)]
    pub rapidapi_host: Option<String>,
    /// Per-request timeout. Default: 10000.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Where the judge should PUT completion callbacks. Default: none (poll only).
    #[serde(default)]
    pub callback_url: Option<String>,
    /// Largest batch the judge accepts in one call. Default: 20.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

fn default_base_url() -> String {
    "http://localhost:2358".into()
}
fn default_auth_header() -> String {
    "X-Auth-Token".into()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_max_batch_size() -> usize {
    20
}

impl Default for Judge0Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_header: default_auth_header(),
            auth_token: None,
            rapidapi_host: None,
            timeout_ms: default_timeout_ms(),
            callback_url: None,
            max_batch_size: default_max_batch_size(),
        }
    }
}
