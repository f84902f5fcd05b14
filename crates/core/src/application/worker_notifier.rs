// Worker Notifier - fan-out on job creation
//
// Pages through every available worker with bounded-batch cursor pagination
// and multicasts a single "New Job Request" push. The worker set is unbounded,
// so coverage must not be limited to one page's max size.

use crate::application::constants::{USERS_COLLECTION, WORKER_PAGE_SIZE};
use crate::application::dispatcher::{ChangeEvent, ChangeHandler};
use crate::domain::{Job, NotificationPayload, User};
use crate::error::Result;
use crate::port::{DeviceToken, DocId, Document, DocumentStore, Filter, PushSender};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Notifies all available workers of a new job request
pub struct WorkerNotifier {
    store: Arc<dyn DocumentStore>,
    sender: Arc<dyn PushSender>,
}

impl WorkerNotifier {
    pub fn new(store: Arc<dyn DocumentStore>, sender: Arc<dyn PushSender>) -> Self {
        Self { store, sender }
    }

    /// Entry point for one job-creation event.
    ///
    /// Any collaborator failure is logged and swallowed here: the event is
    /// considered handled either way, and nothing propagates to the runtime.
    pub async fn on_job_created(&self, snapshot: &Document) {
        if let Err(e) = self.notify_workers(snapshot).await {
            error!(job_id = %snapshot.id, error = %e, "Error notifying workers of job request");
        }
    }

    async fn notify_workers(&self, snapshot: &Document) -> Result<()> {
        let job: Job = snapshot.parse()?;

        // Only notify if the job status is 'pending'
        if !job.status.is_pending() {
            info!(job_id = %snapshot.id, status = %job.status, "Job not pending, skipping worker fan-out");
            return Ok(());
        }

        let tokens = self.collect_worker_tokens().await?;

        if tokens.is_empty() {
            info!(job_id = %snapshot.id, "No available workers with a device token");
            return Ok(());
        }

        let payload = NotificationPayload::job_request(&job.location);
        let outcome = self.sender.send_to_many(&tokens, &payload).await?;

        info!(
            job_id = %snapshot.id,
            succeeded = outcome.success_count,
            attempted = tokens.len(),
            "Notifications sent to workers"
        );
        Ok(())
    }

    /// Collect the device tokens of every available worker.
    ///
    /// Pages are fetched strictly sequentially: page N+1 is not requested
    /// until page N is consumed, so the cursor always reflects a fully
    /// processed page. Terminates when a page comes back empty, which also
    /// covers the empty-worker-set case.
    async fn collect_worker_tokens(&self) -> Result<Vec<DeviceToken>> {
        let filters = [
            Filter::eq("role", "worker"),
            Filter::eq("isAvailable", true),
        ];

        let mut tokens = Vec::new();
        let mut cursor: Option<DocId> = None;

        loop {
            let page = self
                .store
                .query(
                    USERS_COLLECTION,
                    &filters,
                    WORKER_PAGE_SIZE,
                    cursor.as_ref(),
                )
                .await?;

            if page.is_empty() {
                break;
            }

            cursor = page.last().map(|doc| doc.id.clone());

            for doc in page {
                let user: User = match doc.parse() {
                    Ok(user) => user,
                    Err(e) => {
                        warn!(user_id = %doc.id, error = %e, "Skipping malformed worker record");
                        continue;
                    }
                };
                if let Some(token) = user.device_token() {
                    tokens.push(token.to_string());
                }
            }
        }

        Ok(tokens)
    }
}

#[async_trait]
impl ChangeHandler for WorkerNotifier {
    fn name(&self) -> &'static str {
        "notify_workers_of_job_request"
    }

    async fn handle(&self, event: &ChangeEvent) {
        if let ChangeEvent::Created { document, .. } = event {
            self.on_job_created(document).await;
        }
    }
}
