//! Mail transport seam for the email pusher.
//!
//! The email pusher composes a plain-text mail and hands it to a `Mailer`.
//! Two implementations are provided: one that posts the mail to an HTTP
//! mail API, and one that only logs it, used when no endpoint is
//! configured.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::core::PusherError;

/// A composed, ready-to-send mail.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Mail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub text: String,
}

/// A trait for transports that can deliver composed mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers a single mail.
    async fn send(&self, mail: &Mail) -> Result<(), PusherError>;
}

/// Delivers mail by posting it as JSON to an HTTP mail API.
pub struct HttpApiMailer {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpApiMailer {
    /// Creates a new `HttpApiMailer` for the given endpoint.
    pub fn new(endpoint: String, client: reqwest::Client) -> Self {
        Self { endpoint, client }
    }
}

#[async_trait]
impl Mailer for HttpApiMailer {
    #[instrument(skip(self, mail), fields(to = %mail.to))]
    async fn send(&self, mail: &Mail) -> Result<(), PusherError> {
        let response = self.client.post(&self.endpoint).json(mail).send().await?;

        if response.status().is_success() {
            info!("Mail accepted by mail API.");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Mail API rejected mail");
            Err(PusherError::Mail(format!(
                "mail API returned status {}: {}",
                status, body
            )))
        }
    }
}

/// A transport that logs composed mail instead of delivering it.
///
/// This serves as a basic implementation to validate the email path locally
/// and can be used for debugging purposes.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> Result<(), PusherError> {
        info!(
            to = %mail.to,
            from = %mail.from,
            subject = %mail.subject,
            "Mail composed (no mail API configured, logging only)"
        );
        Ok(())
    }
}
