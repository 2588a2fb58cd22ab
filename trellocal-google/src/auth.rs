//! Google OAuth desktop flow, as explicit states.
//!
//! ```text
//! NoCredentials ──begin()──▶ PendingConsent (awaiting user code)
//! PendingConsent ──submit(code)──▶ Authorized(Session)
//! Authorized (expired) ──refresh──▶ Authorized(Session)
//! ```
//!
//! Nothing here reads from the terminal. The caller shows the consent URL
//! however it likes and hands the code (or the whole redirected URL) back to
//! `PendingConsent::submit`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use google_calendar::Client;
use tracing::info;
use url::Url;

use crate::app_config::AppConfig;
use crate::session::{Session, SessionData};
use crate::{REDIRECT_URI, SCOPES};

pub enum AuthState {
    /// No token file yet; consent is needed before anything else.
    NoCredentials,
    /// A valid (possibly just refreshed) session.
    Authorized(Session),
}

pub struct AuthFlow {
    app: AppConfig,
    token_path: PathBuf,
}

impl AuthFlow {
    pub fn new(app: AppConfig, token_path: impl Into<PathBuf>) -> Self {
        AuthFlow {
            app,
            token_path: token_path.into(),
        }
    }

    /// Pick up where the last run left off: load the stored session and
    /// refresh it if expired.
    pub async fn resume(&self) -> Result<AuthState> {
        match Session::load(&self.token_path, &self.app)? {
            Some(mut session) => {
                session.refresh_if_needed().await?;
                Ok(AuthState::Authorized(session))
            }
            None => Ok(AuthState::NoCredentials),
        }
    }

    /// Start the consent step.
    pub fn begin(&self) -> Result<PendingConsent> {
        let client = Client::new(
            self.app.client_id.clone(),
            self.app.client_secret.clone(),
            REDIRECT_URI.to_string(),
            String::new(),
            String::new(),
        );

        let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
        let mut consent_url = client.user_consent_url(&scopes);

        // Without a fresh consent prompt Google may not hand out a refresh token
        if !consent_url.contains("prompt=") {
            consent_url.push_str("&prompt=consent");
        }

        let state = query_param(&consent_url, "state")?
            .ok_or_else(|| anyhow::anyhow!("No state parameter in authorization URL"))?;

        Ok(PendingConsent {
            app: self.app.clone(),
            token_path: self.token_path.clone(),
            consent_url,
            state,
        })
    }
}

/// Waiting for the user to paste back the authorization code.
pub struct PendingConsent {
    app: AppConfig,
    token_path: PathBuf,
    consent_url: String,
    state: String,
}

impl PendingConsent {
    pub fn consent_url(&self) -> &str {
        &self.consent_url
    }

    /// Exchange the pasted code for tokens and persist them.
    pub async fn submit(self, input: &str) -> Result<Session> {
        let code = extract_code(input)?;

        let mut client = Client::new(
            self.app.client_id.clone(),
            self.app.client_secret.clone(),
            REDIRECT_URI.to_string(),
            String::new(),
            String::new(),
        );

        let tokens = client
            .get_access_token(&code, &self.state)
            .await
            .context("Failed to exchange authorization code for tokens")?;

        let data: SessionData = (&tokens).into();
        let session = Session::new(self.token_path, self.app, data);
        session.save()?;

        info!("Google authorization complete");
        Ok(session)
    }
}

/// Pull the authorization code out of what the user pasted.
///
/// Accepts the bare code or the full URL the browser was redirected to.
pub fn extract_code(input: &str) -> Result<String> {
    let input = input.trim();

    if input.is_empty() {
        anyhow::bail!("No authorization code entered");
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        if let Some(error) = query_param(input, "error")? {
            anyhow::bail!("Authorization was denied: {}", error);
        }
        return query_param(input, "code")?
            .ok_or_else(|| anyhow::anyhow!("No code in the pasted URL"));
    }

    Ok(input.to_string())
}

fn query_param(url: &str, name: &str) -> Result<Option<String>> {
    let url = Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
    Ok(url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.to_string()))
}
