use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached proof of authentication, stored under its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAuthSession {
    pub token: String,
    pub app_key: String,
    pub account: String,
    pub name: String,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}
