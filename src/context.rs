//! Process-wide context handed to every pusher constructor.
//!
//! The context is an immutable snapshot: the relevant configuration
//! sections are copied out of [`crate::config::Config`] at construction
//! time, and a single `reqwest::Client` is built once and shared by every
//! pusher. Changing configuration means building a new context.

use std::time::Duration;

use crate::config::{Config, EmailConfig, HttpConfig};
use crate::core::PusherError;

/// Immutable configuration snapshot plus shared services.
pub struct PusherContext {
    /// Settings for http-kind pushers.
    pub http: HttpConfig,
    /// Settings for email-kind pushers, including the enablement flag.
    pub email: EmailConfig,
    client: reqwest::Client,
}

impl PusherContext {
    /// Builds a context from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, PusherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http: config.http.clone(),
            email: config.email.clone(),
            client,
        })
    }

    /// The shared HTTP client, preconfigured with the request timeout.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Whether email pushers may be created under this snapshot.
    pub fn email_notifications_enabled(&self) -> bool {
        self.email.enable_notifications
    }
}
