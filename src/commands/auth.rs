//! Drives the Google authorization flow from the terminal.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use trellocal_google::{AppConfig, AuthFlow, AuthState, Session};

use crate::config::Config;

/// A valid Google session, asking the user for consent on the first run.
pub async fn authorize(config: &Config) -> Result<Session> {
    let app = AppConfig::load(&config.client_secret_file)?;
    let flow = AuthFlow::new(app, &config.token_file);

    match flow.resume().await? {
        AuthState::Authorized(session) => Ok(session),
        AuthState::NoCredentials => {
            let pending = flow.begin()?;

            println!("\nOpen this URL in your browser to authorize Google Calendar access:\n");
            println!("{}\n", pending.consent_url());

            if open::that(pending.consent_url()).is_err() {
                println!("(Could not open browser automatically, please copy the URL above)");
            }

            println!(
                "After approving, the browser lands on a page that fails to load.\n\
                Copy the `code` parameter from its address bar, or paste the whole address.\n"
            );

            let input = prompt("Authorization code: ").await?;
            let session = pending.submit(&input).await?;

            println!(
                "{} (saved to {})\n",
                "Authorized".green(),
                config.token_file.display()
            );
            Ok(session)
        }
    }
}

async fn prompt(message: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(message.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read authorization code from stdin")?;

    Ok(line)
}
