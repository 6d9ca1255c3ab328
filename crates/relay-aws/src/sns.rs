//! SNS notification sink.
//!
//! Publishes are fire-and-forget: awaited so the process does not exit
//! mid-flight, bounded by a timeout, and never propagated to the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::error_chain;

/// Upper bound on one publish call.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Publishes outcome notifications to SNS topics.
///
/// A disabled notifier (no topics configured) accepts publishes and drops
/// them, so callers need no conditional logic.
#[derive(Clone)]
pub struct Notifier {
    inner: Option<Arc<Inner>>,
}

struct Inner {
    client: aws_sdk_sns::Client,
    success_topic_arn: String,
    failure_topic_arn: String,
}

impl Notifier {
    /// Create a notifier publishing to the given topics.
    pub async fn new(region: &str, success_topic_arn: &str, failure_topic_arn: &str) -> Self {
        let config = crate::sdk_config(region).await;
        Self {
            inner: Some(Arc::new(Inner {
                client: aws_sdk_sns::Client::new(&config),
                success_topic_arn: success_topic_arn.to_owned(),
                failure_topic_arn: failure_topic_arn.to_owned(),
            })),
        }
    }

    /// Create a notifier that drops every publish.
    #[must_use]
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Publish a success notification.
    pub async fn publish_success(&self, payload: &serde_json::Value) {
        if let Some(inner) = &self.inner {
            Self::publish(inner, &inner.success_topic_arn, payload).await;
        }
    }

    /// Publish a failure notification.
    pub async fn publish_failure(&self, payload: &serde_json::Value) {
        if let Some(inner) = &self.inner {
            Self::publish(inner, &inner.failure_topic_arn, payload).await;
        }
    }

    /// Publish one message. Errors and timeouts are logged and swallowed.
    async fn publish(inner: &Inner, topic_arn: &str, payload: &serde_json::Value) {
        let send = inner
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(payload.to_string())
            .send();

        match tokio::time::timeout(PUBLISH_TIMEOUT, send).await {
            Ok(Ok(output)) => {
                tracing::debug!(
                    topic_arn,
                    message_id = output.message_id().unwrap_or(""),
                    "notification published"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    topic_arn,
                    error = %error_chain(&e),
                    "notification publish failed"
                );
            }
            Err(_) => {
                tracing::warn!(topic_arn, "notification publish timed out");
            }
        }
    }
}
