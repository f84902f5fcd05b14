// Logging Push Sender
//
// Simulated FCM-style delivery: records structured log events instead of
// calling a real push service, and reports every target as delivered.
// Swapping in a real SDK means implementing the same PushSender port.

use async_trait::async_trait;
use jobcast_core::domain::NotificationPayload;
use jobcast_core::error::Result;
use jobcast_core::port::{DeviceToken, MulticastOutcome, PushSender};
use tracing::info;
use uuid::Uuid;

pub struct LoggingPushSender;

impl LoggingPushSender {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingPushSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushSender for LoggingPushSender {
    async fn send_to_one(&self, token: &str, payload: &NotificationPayload) -> Result<()> {
        let message_id = Uuid::new_v4().to_string();

        info!(
            message_id = %message_id,
            token = %token,
            title = %payload.title,
            body = %payload.body,
            "Simulated push notification"
        );

        Ok(())
    }

    async fn send_to_many(
        &self,
        tokens: &[DeviceToken],
        payload: &NotificationPayload,
    ) -> Result<MulticastOutcome> {
        let message_id = Uuid::new_v4().to_string();

        info!(
            message_id = %message_id,
            targets = tokens.len(),
            title = %payload.title,
            body = %payload.body,
            "Simulated multicast push notification"
        );

        Ok(MulticastOutcome {
            success_count: tokens.len(),
            failure_count: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobcast_core::domain::{GeoPoint, JobStatus};

    #[tokio::test]
    async fn test_send_to_one_succeeds() {
        let sender = LoggingPushSender::new();
        let payload = NotificationPayload::status_update(&JobStatus::new("completed"));

        assert!(sender.send_to_one("tokC", &payload).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_to_many_reports_all_success() {
        let sender = LoggingPushSender::new();
        let payload = NotificationPayload::job_request(&GeoPoint {
            latitude: 40.0,
            longitude: -75.0,
        });

        let tokens = vec!["tokA".to_string(), "tokB".to_string()];
        let outcome = sender.send_to_many(&tokens, &payload).await.unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 0);
    }
}
