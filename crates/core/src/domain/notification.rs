// Notification Payload
// Ephemeral value constructed per event, never persisted.

use crate::domain::job::{GeoPoint, JobStatus};
use serde::{Deserialize, Serialize};

/// Title/body pair handed to the push sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

impl NotificationPayload {
    /// Payload broadcast to available workers when a new job request appears
    pub fn job_request(location: &GeoPoint) -> Self {
        Self {
            title: "New Job Request".to_string(),
            body: format!("A new job is available at location: {}", location),
        }
    }

    /// Payload sent to the customer when their job's status changes
    pub fn status_update(status: &JobStatus) -> Self {
        Self {
            title: "Job Status Update".to_string(),
            body: format!("Your job is now {}.", status),
        }
    }
}
