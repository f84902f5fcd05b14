// Customer Notifier - point notification on job status change

use crate::application::constants::USERS_COLLECTION;
use crate::application::dispatcher::{ChangeEvent, ChangeHandler};
use crate::domain::{Job, NotificationPayload, User};
use crate::error::Result;
use crate::port::{Document, DocumentStore, PushSender};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Notifies the customer when the status of their job changes
pub struct CustomerNotifier {
    store: Arc<dyn DocumentStore>,
    sender: Arc<dyn PushSender>,
}

impl CustomerNotifier {
    pub fn new(store: Arc<dyn DocumentStore>, sender: Arc<dyn PushSender>) -> Self {
        Self { store, sender }
    }

    /// Entry point for one job-update event, receiving both record states.
    /// Same swallow-and-log policy as the worker fan-out.
    pub async fn on_job_updated(&self, before: &Document, after: &Document) {
        if let Err(e) = self.notify_customer(before, after).await {
            error!(job_id = %after.id, error = %e, "Error notifying customer of job status");
        }
    }

    async fn notify_customer(&self, before: &Document, after: &Document) -> Result<()> {
        let prev: Job = before.parse()?;
        let new: Job = after.parse()?;

        // Only notify if the job status has changed
        if prev.status == new.status {
            info!(job_id = %after.id, status = %new.status, "Job status unchanged, skipping customer notification");
            return Ok(());
        }

        let customer = match self
            .store
            .get_by_id(USERS_COLLECTION, &new.customer_id)
            .await?
        {
            Some(doc) => doc.parse::<User>()?,
            None => {
                info!(customer_id = %new.customer_id, "Customer record does not exist");
                return Ok(());
            }
        };

        let token = match customer.device_token() {
            Some(token) => token,
            None => {
                info!(customer_id = %new.customer_id, "Customer does not have a device token");
                return Ok(());
            }
        };

        let payload = NotificationPayload::status_update(&new.status);
        self.sender.send_to_one(token, &payload).await?;

        info!(
            customer_id = %new.customer_id,
            job_id = %after.id,
            status = %new.status,
            "Notification sent to customer"
        );
        Ok(())
    }
}

#[async_trait]
impl ChangeHandler for CustomerNotifier {
    fn name(&self) -> &'static str {
        "notify_customer_of_job_status"
    }

    async fn handle(&self, event: &ChangeEvent) {
        if let ChangeEvent::Updated { before, after, .. } = event {
            self.on_job_updated(before, after).await;
        }
    }
}
