use chrono::{DateTime, Utc};

/// Author profile embedded in a message row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorProfile {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub qualification: Option<String>,
    pub user_type: Option<String>,
}

impl AuthorProfile {
    /// Raw role string used for badge resolution: qualification, then user type.
    pub fn raw_role(&self) -> &str {
        self.qualification
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                self.user_type
                    .as_deref()
                    .filter(|value| !value.trim().is_empty())
            })
            .unwrap_or("Professional")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub author: Option<AuthorProfile>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_anonymous: bool,
    pub reply_to: Option<String>,
}

impl Message {
    /// Author name as stored, without anonymity resolution.
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(|author| author.name.as_deref())
    }
}

/// Write payload for a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: String,
    pub content: String,
    pub is_anonymous: bool,
    pub reply_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(qualification: Option<&str>, user_type: Option<&str>) -> AuthorProfile {
        AuthorProfile {
            name: Some("Dana".to_owned()),
            avatar_url: None,
            qualification: qualification.map(ToOwned::to_owned),
            user_type: user_type.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn raw_role_prefers_qualification() {
        assert_eq!(profile(Some("emt"), Some("hr")).raw_role(), "emt");
    }

    #[test]
    fn raw_role_falls_back_to_user_type() {
        assert_eq!(profile(None, Some("hr")).raw_role(), "hr");
        assert_eq!(profile(Some("  "), Some("hr")).raw_role(), "hr");
    }

    #[test]
    fn raw_role_defaults_to_professional() {
        assert_eq!(profile(None, None).raw_role(), "Professional");
    }
}
