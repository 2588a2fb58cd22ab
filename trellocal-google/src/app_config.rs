//! OAuth client credentials.
//!
//! Read from the JSON file the Google Cloud console offers for download when
//! creating a "Desktop app" OAuth client:
//!
//! ```json
//! { "installed": { "client_id": "...", "client_secret": "...", ... } }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<AppConfig>,
    web: Option<AppConfig>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google OAuth client not found at {}.\n\n\
                To create one:\n\
                \n  1. Go to https://console.cloud.google.com/apis/credentials\n  \
                2. Enable the Google Calendar API for your project\n  \
                3. Click \"Create credentials\" → \"OAuth client ID\" → \"Desktop app\"\n  \
                4. Download the JSON and save it as {}",
                path.display(),
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read OAuth client from {}", path.display()))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse OAuth client from {}", path.display()))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let file: ClientSecretFile = serde_json::from_str(contents)?;

        file.installed
            .or(file.web)
            .context("Expected an \"installed\" or \"web\" OAuth client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_desktop_client() {
        let json = r#"{
            "installed": {
                "client_id": "123.apps.googleusercontent.com",
                "project_id": "tasks",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "s3cret",
                "redirect_uris": ["http://localhost"]
            }
        }"#;

        let app = AppConfig::from_json(json).unwrap();

        assert_eq!(app.client_id, "123.apps.googleusercontent.com");
        assert_eq!(app.client_secret, "s3cret");
    }

    #[test]
    fn reads_web_client() {
        let json = r#"{ "web": { "client_id": "id", "client_secret": "secret" } }"#;
        assert_eq!(AppConfig::from_json(json).unwrap().client_id, "id");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(AppConfig::from_json(r#"{ "client_id": "id" }"#).is_err());
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn missing_file_explains_setup() {
        let err = AppConfig::load(Path::new("/nonexistent/client_secret.json")).unwrap_err();
        assert!(err.to_string().contains("Desktop app"));
    }
}
