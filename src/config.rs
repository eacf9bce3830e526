//! Configuration module for the compliance gateway.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use reqwest::Url;
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub payments: PaymentsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// What to do with a write request whose body is not valid JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedBodyPolicy {
    /// Answer 400 without contacting the backend.
    #[default]
    Reject,
    /// Forward `{}` in place of the body (legacy front-end behavior).
    EmptyObject,
}

/// Backend service the relay handlers forward to.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of the backend, e.g. `https://api.example.com`.
    pub base_url: String,
    pub malformed_body: MalformedBodyPolicy,
}

/// Public site metadata used by the robots/sitemap/rss generators.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub url: String,
    pub title: String,
    pub description: String,
    /// Paths listed in the sitemap besides blog posts.
    pub static_pages: Vec<String>,
}

/// Transactional email provider used by the contact form.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_key: String,
    pub api_url: String,
    pub from: String,
    pub to: String,
}

/// Payment processor used for checkout session lookups.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    pub secret_key: String,
    pub api_base: String,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (COMPLIANCE__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml (if exists)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("COMPLIANCE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("site.static_pages")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject URLs the relay and feed generators cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_http_url("backend.base_url", &self.backend.base_url)?;
        require_http_url("site.url", &self.site.url)?;
        Ok(())
    }
}

fn require_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Message(format!("{key} is not a valid URL ({value}): {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Message(format!(
            "{key} must use http or https, got {other}"
        ))),
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            malformed_body: MalformedBodyPolicy::default(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            title: "Compliance Blog".to_string(),
            description: "HIPAA compliance news and guidance".to_string(),
            static_pages: ["/", "/about", "/pricing", "/blog", "/contact"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://api.resend.com/emails".to_string(),
            from: "noreply@localhost".to_string(),
            to: "support@localhost".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "compliance_gateway=info,tower_http=info".to_string(),
            json: true,
        }
    }
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_base: "https://api.stripe.com/v1".to_string(),
        }
    }
}
