//! Process-wide rendering and declaration defaults.
//!
//! The config is a small key-value store the core reads from:
//!
//! - `default_http_status`: status for declarations that set none (200)
//! - `default_format`: render format for declarations that set none
//! - `formats`: render templates, each an ordered list of output keys
//!
//! ```rust
//! use business_errors::Config;
//!
//! let config = Config::from_json(r#"{
//!     "default_http_status": 400,
//!     "formats": { "short": ["c", "m"] }
//! }"#)?;
//!
//! assert_eq!(config.default_http_status, 400);
//! assert_eq!(config.template("short"), Some(&["c".to_string(), "m".to_string()][..]));
//! # Ok::<(), business_errors::ConfigError>(())
//! ```
//!
//! Declaration sessions snapshot the installed config when they start; the
//! render pipeline reads it when a value is signaled.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Status used when neither a declaration, its scope, nor the config sets one.
pub const DEFAULT_HTTP_STATUS: u16 = 200;

/// Declaration and rendering defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fallback HTTP status.
    pub default_http_status: u16,
    /// Fallback render format id.
    pub default_format: Option<Cow<'static, str>>,
    /// Render templates keyed by format id.
    pub formats: IndexMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_http_status: DEFAULT_HTTP_STATUS,
            default_format: None,
            formats: IndexMap::new(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config document.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Parse`] for malformed JSON or unknown keys
    /// - [`ConfigError::InvalidHttpStatus`] for a status outside 100-999
    /// - [`ConfigError::MissingDefaultTemplate`] when `default_format` names no
    ///   entry of `formats`
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants [`Config::from_json`] enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(100..=999).contains(&self.default_http_status) {
            return Err(ConfigError::InvalidHttpStatus(self.default_http_status));
        }
        if let Some(format) = &self.default_format {
            if !self.formats.contains_key(format.as_ref()) {
                return Err(ConfigError::MissingDefaultTemplate(format.to_string()));
            }
        }
        Ok(())
    }

    /// Add or replace a render template.
    #[must_use]
    pub fn with_format<I, K>(mut self, id: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.formats
            .insert(id.into(), keys.into_iter().map(Into::into).collect());
        self
    }

    /// Set the fallback render format.
    #[must_use]
    pub fn with_default_format(mut self, id: impl Into<Cow<'static, str>>) -> Self {
        self.default_format = Some(id.into());
        self
    }

    /// Set the fallback HTTP status.
    #[must_use]
    pub fn with_default_http_status(mut self, status: u16) -> Self {
        self.default_http_status = status;
        self
    }

    /// Output keys of a render template.
    pub fn template(&self, id: &str) -> Option<&[String]> {
        self.formats.get(id).map(Vec::as_slice)
    }
}

/// Config loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid config JSON.
    #[error("invalid business error config: {0}")]
    Parse(#[from] serde_json::Error),
    /// `default_http_status` is not a plausible HTTP status.
    #[error("default_http_status {0} is outside 100-999")]
    InvalidHttpStatus(u16),
    /// `default_format` has no template.
    #[error("default_format `{0}` has no entry in formats")]
    MissingDefaultTemplate(String),
}

// ============================================================================
// Process-wide Store
// ============================================================================

static CONFIG: LazyLock<RwLock<Arc<Config>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Config::default())));

/// Replace the process-wide config, returning the previous one.
///
/// Install the config before declaring holders: declaration sessions
/// snapshot it when they start.
pub fn install(config: Config) -> Arc<Config> {
    let mut slot = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, Arc::new(config))
}

/// Snapshot of the process-wide config.
pub fn current() -> Arc<Config> {
    Arc::clone(&CONFIG.read().unwrap_or_else(PoisonError::into_inner))
}
