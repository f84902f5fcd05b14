// Push Sender Port (Notification Sender Collaborator)
// Abstraction over the FCM-style delivery service. Delivery-side limits
// (multicast batch caps, stale tokens) are the implementation's concern.

use crate::domain::NotificationPayload;
use crate::error::Result;
use async_trait::async_trait;

/// Mobile delivery address of a user
pub type DeviceToken = String;

/// Per-invocation result of a multicast send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MulticastOutcome {
    pub success_count: usize,
    pub failure_count: usize,
}

/// Notification sender interface
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Send one payload to a single device
    async fn send_to_one(&self, token: &str, payload: &NotificationPayload) -> Result<()>;

    /// Send one payload to many devices in a single request
    async fn send_to_many(
        &self,
        tokens: &[DeviceToken],
        payload: &NotificationPayload,
    ) -> Result<MulticastOutcome>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// Recording PushSender for unit tests.
    pub struct RecordingPushSender {
        singles: Mutex<Vec<(DeviceToken, NotificationPayload)>>,
        multicasts: Mutex<Vec<(Vec<DeviceToken>, NotificationPayload)>>,
        fail_with: Mutex<Option<String>>,
    }

    impl RecordingPushSender {
        pub fn new() -> Self {
            Self {
                singles: Mutex::new(Vec::new()),
                multicasts: Mutex::new(Vec::new()),
                fail_with: Mutex::new(None),
            }
        }

        /// Make every subsequent send fail with a send error
        pub fn fail_with(&self, message: impl Into<String>) {
            *self.fail_with.lock().unwrap() = Some(message.into());
        }

        pub fn singles(&self) -> Vec<(DeviceToken, NotificationPayload)> {
            self.singles.lock().unwrap().clone()
        }

        pub fn multicasts(&self) -> Vec<(Vec<DeviceToken>, NotificationPayload)> {
            self.multicasts.lock().unwrap().clone()
        }

        fn check_failure(&self) -> Result<()> {
            match self.fail_with.lock().unwrap().as_ref() {
                Some(msg) => Err(AppError::Send(msg.clone())),
                None => Ok(()),
            }
        }
    }

    impl Default for RecordingPushSender {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PushSender for RecordingPushSender {
        async fn send_to_one(&self, token: &str, payload: &NotificationPayload) -> Result<()> {
            self.check_failure()?;
            self.singles
                .lock()
                .unwrap()
                .push((token.to_string(), payload.clone()));
            Ok(())
        }

        async fn send_to_many(
            &self,
            tokens: &[DeviceToken],
            payload: &NotificationPayload,
        ) -> Result<MulticastOutcome> {
            self.check_failure()?;
            self.multicasts
                .lock()
                .unwrap()
                .push((tokens.to_vec(), payload.clone()));

            Ok(MulticastOutcome {
                success_count: tokens.len(),
                failure_count: 0,
            })
        }
    }
}
