//! A Google OAuth session (access + refresh token) persisted to a token file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::REDIRECT_URI;
use crate::app_config::AppConfig;

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData::from_tokens(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.expires_in,
        )
    }
}

impl SessionData {
    pub fn from_tokens(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        SessionData {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

pub struct Session {
    path: PathBuf,
    app: AppConfig,
    data: SessionData,
}

impl Session {
    pub fn new(path: impl Into<PathBuf>, app: AppConfig, data: SessionData) -> Self {
        Session {
            path: path.into(),
            app,
            data,
        }
    }

    /// Load the session stored at `path`, or `None` if there is no token file yet.
    pub fn load(path: &Path, app: &AppConfig) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Some(Session::new(path, app.clone(), data)))
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Owner-only, the file holds OAuth tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        debug!(path = %self.path.display(), "saved Google OAuth session");
        Ok(())
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.data.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.app.client_id.clone(),
            self.app.client_secret.clone(),
            REDIRECT_URI.to_string(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    pub async fn refresh_if_needed(&mut self) -> Result<()> {
        if self.is_expired() {
            self.refresh().await?;
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        if self.data.refresh_token.is_empty() {
            anyhow::bail!(
                "Google OAuth session in {} has expired and has no refresh token.\n\
                Delete the file and run again to re-authorize.",
                self.path.display()
            );
        }

        info!("Google access token expired, refreshing");

        let mut tokens = self
            .client()
            .refresh_access_token()
            .await
            .context("Failed to refresh Google access token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()
    }
}
