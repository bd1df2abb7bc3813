//! A pusher that delivers notifications as plain-text email.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::context::PusherContext;
use crate::core::{Notification, Pusher, PusherError};
use crate::descriptor::PusherDescriptor;
use crate::mailer::{HttpApiMailer, LogMailer, Mail, Mailer};

/// Composes a plain-text mail per notification and hands it to a
/// [`Mailer`].
pub struct EmailPusher {
    address: String,
    from_address: String,
    subject_prefix: String,
    mailer: Arc<dyn Mailer>,
}

impl EmailPusher {
    /// Builds an `EmailPusher` from a descriptor.
    ///
    /// The descriptor must carry an `address` field with the recipient's
    /// email address. The transport is chosen from the context: the
    /// configured mail API if present, otherwise a log-only mailer.
    pub fn from_descriptor(
        context: &Arc<PusherContext>,
        descriptor: &PusherDescriptor,
    ) -> Result<Self, PusherError> {
        let mailer: Arc<dyn Mailer> = match &context.email.api_endpoint {
            Some(endpoint) => Arc::new(HttpApiMailer::new(
                endpoint.clone(),
                context.http_client().clone(),
            )),
            None => Arc::new(LogMailer),
        };

        Self::with_mailer(context, descriptor, mailer)
    }

    /// Like [`EmailPusher::from_descriptor`], with an explicit transport.
    pub fn with_mailer(
        context: &Arc<PusherContext>,
        descriptor: &PusherDescriptor,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, PusherError> {
        let address = descriptor
            .str_field("address")
            .ok_or(PusherError::MissingField("address"))?;

        if !address.contains('@') {
            return Err(PusherError::InvalidField {
                field: "address",
                reason: format!("`{}` is not an email address", address),
            });
        }

        Ok(Self {
            address: address.to_string(),
            from_address: context.email.from_address.clone(),
            subject_prefix: context.email.subject_prefix.clone(),
            mailer,
        })
    }

    fn compose(&self, notification: &Notification) -> Mail {
        Mail {
            to: self.address.clone(),
            from: self.from_address.clone(),
            subject: format!("{} {}", self.subject_prefix, notification.summary),
            text: format!(
                "{} sent you a notification at {}:\n\n{}\n",
                notification.sender, notification.timestamp, notification.body
            ),
        }
    }
}

#[async_trait]
impl Pusher for EmailPusher {
    fn kind(&self) -> &'static str {
        "email"
    }

    #[instrument(skip(self, notification), fields(to = %self.address))]
    async fn push(&self, notification: &Notification) -> Result<(), PusherError> {
        let mail = self.compose(notification);
        self.mailer.send(&mail).await?;
        metrics::counter!("notifications_pushed", "kind" => "email").increment(1);
        Ok(())
    }
}
