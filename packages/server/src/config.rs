use std::path::PathBuf;

use common::retry::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use judge_client::Judge0Config;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_age: default_cors_max_age(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Shared secret the judge echoes back in the callback URL query string.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CallbackConfig {
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
}

fn default_max_source_bytes() -> usize {
    64 * 1024
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on a reconcile pass triggered by a fresh poll.
    #[serde(default = "default_reconcile_timeout_ms")]
    pub reconcile_timeout_ms: u64,
    /// Reconcile passes a token may go unrecognised by the judge before it is
    /// no longer fetched.
    #[serde(default = "default_fetch_miss_budget")]
    pub fetch_miss_budget: i32,
}

fn default_reconcile_timeout_ms() -> u64 {
    2000
}

fn default_fetch_miss_budget() -> i32 {
    10
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            reconcile_timeout_ms: default_reconcile_timeout_ms(),
            fetch_miss_budget: default_fetch_miss_budget(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SweeperConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sweep_interval_secs")]
    pub interval_secs: u64,
    /// Only submissions pending for longer than this are swept.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
    #[serde(default = "default_sweep_batch_size")]
    pub batch_size: u64,
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_stale_after_secs() -> u64 {
    60
}

fn default_sweep_batch_size() -> u64 {
    50
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_sweep_interval_secs(),
            stale_after_secs: default_stale_after_secs(),
            batch_size: default_sweep_batch_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FixturesConfig {
    /// Directory of `<problem_id>/input.txt` + `output.txt` imported at startup.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub judge0: Judge0Config,
    #[serde(default)]
    pub callback: CallbackConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub dispatch_retry: RetryPolicy,
    #[serde(default)]
    pub sweeper: SweeperConfig,
    #[serde(default)]
    pub fixtures: FixturesConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://relay.db?mode=rwc")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., RELAY__JUDGE0__BASE_URL)
            .add_source(Environment::with_prefix("RELAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Judge client settings, with the callback secret appended to the
    /// callback URL so the judge echoes it back on every completion.
    pub fn judge_config(&self) -> Judge0Config {
        let mut judge = self.judge0.clone();
        if let (Some(url), Some(secret)) = (judge.callback_url.as_mut(), &self.callback.secret) {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str("secret=");
            url.push_str(secret);
        }
        judge
    }
}
