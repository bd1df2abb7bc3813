//! A pusher that delivers notifications to an HTTP push gateway.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::context::PusherContext;
use crate::core::{Notification, Pusher, PusherError};
use crate::descriptor::PusherDescriptor;

/// Delivers notifications by posting JSON to a per-pusher gateway URL.
pub struct HttpPusher {
    gateway_url: String,
    app_id: Option<String>,
    pushkey: Option<String>,
    client: reqwest::Client,
}

impl HttpPusher {
    /// Builds an `HttpPusher` from a descriptor.
    ///
    /// The descriptor must carry a `url` field naming the push gateway;
    /// anything else about the descriptor is ignored here.
    pub fn from_descriptor(
        context: &Arc<PusherContext>,
        descriptor: &PusherDescriptor,
    ) -> Result<Self, PusherError> {
        let url = descriptor
            .str_field("url")
            .ok_or(PusherError::MissingField("url"))?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PusherError::InvalidField {
                field: "url",
                reason: format!("`{}` is not an http(s) URL", url),
            });
        }

        Ok(Self {
            gateway_url: url.to_string(),
            app_id: descriptor.app_id.clone(),
            pushkey: descriptor.pushkey.clone(),
            client: context.http_client().clone(),
        })
    }
}

#[async_trait]
impl Pusher for HttpPusher {
    fn kind(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, notification), fields(gateway = %self.gateway_url))]
    async fn push(&self, notification: &Notification) -> Result<(), PusherError> {
        let payload = json!({
            "notification": notification,
            "device": {
                "app_id": self.app_id,
                "pushkey": self.pushkey,
            },
        });

        let response = self
            .client
            .post(&self.gateway_url)
            .json(&payload)
            .send()
            .await?;

        if response.status().is_success() {
            info!("Delivered notification to push gateway.");
            metrics::counter!("notifications_pushed", "kind" => "http").increment(1);
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                body = %body,
                "Push gateway rejected notification"
            );
            Err(PusherError::Gateway {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_context() -> Arc<PusherContext> {
        Arc::new(PusherContext::from_config(&Config::default()).unwrap())
    }

    fn test_notification() -> Notification {
        Notification {
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            sender: "alice".to_string(),
            summary: "New message".to_string(),
            body: "hello".to_string(),
        }
    }

    #[test]
    fn test_constructor_requires_url_field() {
        let context = test_context();
        let descriptor = PusherDescriptor::new("http");

        let result = HttpPusher::from_descriptor(&context, &descriptor);

        assert!(matches!(result, Err(PusherError::MissingField("url"))));
    }

    #[test]
    fn test_constructor_rejects_non_http_url() {
        let context = test_context();
        let descriptor =
            PusherDescriptor::new("http").with_field("url", "ftp://push.example.com");

        let result = HttpPusher::from_descriptor(&context, &descriptor);

        assert!(matches!(
            result,
            Err(PusherError::InvalidField { field: "url", .. })
        ));
    }

    #[tokio::test]
    async fn test_push_posts_notification_to_gateway() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let context = test_context();
        let descriptor = PusherDescriptor::new("http")
            .with_field("url", &format!("{}/notify", server.uri()));
        let pusher = HttpPusher::from_descriptor(&context, &descriptor).unwrap();

        // Act
        let result = pusher.push(&test_notification()).await;

        // Assert
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_push_maps_gateway_error_to_typed_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/notify"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let context = test_context();
        let descriptor = PusherDescriptor::new("http")
            .with_field("url", &format!("{}/notify", server.uri()));
        let pusher = HttpPusher::from_descriptor(&context, &descriptor).unwrap();

        // Act
        let result = pusher.push(&test_notification()).await;

        // Assert
        assert!(matches!(
            result,
            Err(PusherError::Gateway { status: 502, .. })
        ));
    }
}
