use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::contact::{SubmissionSettings, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESET_DELAY};
use crate::reveal::observer::{ObserverOptions, DEFAULT_ROOT_MARGIN_BOTTOM, DEFAULT_THRESHOLD};

/// Main configuration structure for the portfolio core
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Contact form endpoint and timings
    pub contact: ContactConfig,
    /// Section reveal tuning
    pub reveal: RevealConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Base URL the contact form posts to; `/api/contact` is appended
    pub api_base_url: String,
    /// Upper bound on a single submission
    pub request_timeout_ms: u64,
    /// How long the success notice stays before the form resets
    pub reset_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of a section that must be inside the viewport
    pub threshold: f64,
    /// Fraction of the viewport height trimmed from the bottom edge
    pub root_margin_bottom: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(), // Filled from FOLIO_API_URL / VITE_API_URL
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT.as_millis() as u64,
            reset_delay_ms: DEFAULT_RESET_DELAY.as_millis() as u64,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin_bottom: DEFAULT_ROOT_MARGIN_BOTTOM,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl ContactConfig {
    /// A zero timeout fails every submission before it is sent and a zero
    /// reset delay hides the success notice immediately.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 {
            bail!("contact.request_timeout_ms must be greater than zero");
        }
        if self.reset_delay_ms == 0 {
            bail!("contact.reset_delay_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn submission_settings(&self) -> SubmissionSettings {
        SubmissionSettings {
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

impl RevealConfig {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.threshold,
            root_margin_bottom: self.root_margin_bottom,
        }
    }
}

impl FolioConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (folio.toml)
    /// 3. Environment variables (prefixed with FOLIO_, nested with __)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("folio.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&FolioConfig::default())?);

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut folio_config: FolioConfig = builder.build()?.try_deserialize()?;

        // The endpoint base has its own short-hand variables
        if folio_config.contact.api_base_url.is_empty() {
            if let Ok(url) = std::env::var("FOLIO_API_URL") {
                folio_config.contact.api_base_url = url;
            } else if let Ok(url) = std::env::var("VITE_API_URL") {
                folio_config.contact.api_base_url = url;
            }
        }

        folio_config.contact.validate()?;
        Ok(folio_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<FolioConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = FolioConfig::load_env_file();
        FolioConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static FolioConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}
