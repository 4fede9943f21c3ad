use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. Created at signup and immutable afterwards; the
/// email doubles as the unique key and the identity-service subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
