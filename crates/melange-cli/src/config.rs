//! Layered settings: defaults < config file < `MELANGE_*` environment < flags
//!
//! The client library never sees these types; it receives a
//! [`FactoryConfig`] built from the resolved [`Settings`].

use std::path::PathBuf;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use melange_client::FactoryConfig;
use melange_client::factory::DEFAULT_PORT;
use melange_client::transport::DEFAULT_TIMEOUT;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "MELANGE_";

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Melange server host
    pub host: String,
    /// Melange server port
    pub port: u16,
    /// Talk https to the server
    pub use_ssl: bool,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Tenant requests are scoped to
    #[serde(deserialize_with = "lenient_string")]
    pub tenant_id: Option<String>,
    /// Identity service URL
    #[serde(deserialize_with = "lenient_string")]
    pub auth_url: Option<String>,
    /// Identity service user
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    /// Identity service API key
    #[serde(deserialize_with = "lenient_string")]
    pub api_key: Option<String>,
    /// Pre-issued token
    #[serde(deserialize_with = "lenient_string")]
    pub auth_token: Option<String>,
}

/// Environment values are parsed, so `MELANGE_TENANT_ID=123` arrives as a number
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Signed(n) => n.to_string(),
        Raw::Unsigned(n) => n.to_string(),
    }))
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            use_ssl: false,
            timeout: DEFAULT_TIMEOUT.as_secs(),
            tenant_id: None,
            auth_url: None,
            username: None,
            api_key: None,
            auth_token: None,
        }
    }
}

impl From<Settings> for FactoryConfig {
    fn from(settings: Settings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            use_ssl: settings.use_ssl,
            timeout: Duration::from_secs(settings.timeout),
            auth_url: settings.auth_url,
            username: settings.username,
            api_key: settings.api_key,
            auth_token: settings.auth_token,
            tenant_id: settings.tenant_id,
        }
    }
}

/// Settings given explicitly on the command line
#[derive(Debug, Default, Serialize)]
struct FlagOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    use_ssl: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

impl From<&GlobalOpts> for FlagOverrides {
    fn from(global: &GlobalOpts) -> Self {
        Self {
            host: global.host.clone(),
            port: global.port,
            use_ssl: global.use_ssl.then_some(true),
            timeout: global.timeout,
            tenant_id: global.tenant_id.clone(),
            auth_url: global.auth_url.clone(),
            username: global.username.clone(),
            api_key: global.api_key.clone(),
            auth_token: global.auth_token.clone(),
        }
    }
}

/// Default config file location (`$XDG_CONFIG_HOME/melange/config.toml`)
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("melange").join("config.toml"))
}

/// Resolve settings from every layer
pub fn load(global: &GlobalOpts) -> Result<Settings, CliError> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(path) = global.config.clone().or_else(config_path) {
        debug!("reading config from {}", path.display());
        figment = figment.merge(Toml::file(path));
    }

    let settings: Settings = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(FlagOverrides::from(global)))
        .extract()?;
    Ok(settings)
}
