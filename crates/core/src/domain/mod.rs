// Domain Layer - Records of the job-tracking store and notification values

pub mod job;
pub mod notification;
pub mod user;

// Re-exports
pub use job::{GeoPoint, Job, JobId, JobStatus};
pub use notification::NotificationPayload;
pub use user::{User, UserId, UserRole};
