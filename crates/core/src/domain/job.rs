// Job Record Model
// Jobs are created and mutated by external flows; this system only reads them.

use serde::{Deserialize, Serialize};

/// Job ID (the store document id)
pub type JobId = String;

/// Workflow status of a job.
///
/// Statuses are owned by the external job-creation flow and are open-ended;
/// "pending" is the only value this system attaches meaning to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobStatus(String);

impl JobStatus {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only pending jobs trigger the worker fan-out
    pub fn is_pending(&self) -> bool {
        self.0 == "pending"
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic location of a job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // {:?} keeps the decimal point on whole-number coordinates (40.0, not 40)
        write!(f, "{:?}, {:?}", self.latitude, self.longitude)
    }
}

/// Job record as stored in the `jobs` collection.
///
/// Identity lives on the document envelope, not in the data, so there is
/// no id field here. Wire field names are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub status: JobStatus,
    pub location: GeoPoint,
    pub customer_id: crate::domain::user::UserId,
}
