use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Refresh this long before the provider-side expiry.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// Signed-in session issued by the auth provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: String,
    pub email: Option<String>,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// Tokens must never reach logs.
impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
