//! Google Calendar side of trellocal.
//!
//! Credentials live next to the working directory:
//!   client_secret.json  OAuth client downloaded from the Google console
//!   token.toml          access/refresh tokens, written after consent and refresh

pub mod app_config;
pub mod auth;
pub mod calendar;
pub mod convert;
pub mod session;

pub use app_config::AppConfig;
pub use auth::{AuthFlow, AuthState, PendingConsent};
pub use calendar::GoogleCalendar;
pub use session::Session;

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// Nothing listens here: after consent the browser lands on an error page
/// whose address bar carries the authorization code.
pub const REDIRECT_URI: &str = "http://localhost:1";
