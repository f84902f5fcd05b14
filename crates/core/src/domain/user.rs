// User Record Model
// Users (workers and customers) are owned entirely outside this system.

use serde::{Deserialize, Serialize};

/// User ID (the store document id)
pub type UserId = String;

/// Role of a user in the job marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Worker,
    Customer,
    #[serde(other)]
    Other,
}

/// User record as stored in the `users` collection.
///
/// `isAvailable` is only meaningful for workers; `fcmToken` is the optional
/// mobile delivery address. Wire field names are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub role: UserRole,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub fcm_token: Option<String>,
}

impl User {
    /// Delivery token, treating an empty string as absent
    pub fn device_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|t| !t.is_empty())
    }
}
