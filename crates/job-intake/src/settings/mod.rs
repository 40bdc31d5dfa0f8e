//! Persisted, rotatable mail-provider settings and the admin screen that edits them.

pub mod router;
pub mod views;

use std::fmt;

use async_trait::async_trait;

pub use router::settings_router;

/// Configuration name under which the provider key is persisted.
pub const SENDGRID_API_KEY: &str = "sendgrid_api_key";

/// Transactional-email provider key. A blank key selects the fallback delivery path.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("ApiKey(<blank>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

/// Process-wide settings storage. Reads are never cached, so a saved key is used
/// by the very next send.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns a blank key when nothing was ever saved.
    async fn load_api_key(&self) -> Result<ApiKey, SettingsError>;
    async fn save_api_key(&self, key: ApiKey) -> Result<(), SettingsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings storage unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for SettingsError {
    fn from(value: sqlx::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}
