//! Wire rows of the hosted database and auth service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    message::{AuthorProfile, Message, NewMessage},
    profile::UserProfile,
    room::{Room, RoomType},
    session::AuthSession,
};

/// Column list for message reads, author profile embedded.
pub const MESSAGE_SELECT: &str = "*,profile:profiles(name,avatar_url,qualification,user_type)";

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub qualification: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl ProfileRow {
    fn into_author(self) -> AuthorProfile {
        AuthorProfile {
            name: self.name,
            avatar_url: self.avatar_url,
            qualification: self.qualification,
            user_type: self.user_type,
        }
    }

    pub fn into_profile(self, fallback_id: &str) -> UserProfile {
        UserProfile {
            id: self.id.unwrap_or_else(|| fallback_id.to_owned()),
            name: self.name,
            avatar_url: self.avatar_url,
            qualification: self.qualification,
            user_type: self.user_type,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRow {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub profile: Option<ProfileRow>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            room_id: row.room_id,
            user_id: row.user_id,
            author: row.profile.map(ProfileRow::into_author),
            content: row.content,
            created_at: row.created_at,
            is_anonymous: row.is_anonymous.unwrap_or(false),
            reply_to: row.reply_to,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageIdRow {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessageRow<'a> {
    pub room_id: &'a str,
    pub user_id: &'a str,
    pub content: &'a str,
    pub is_anonymous: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<&'a str>,
}

impl<'a> NewMessageRow<'a> {
    pub fn new(message: &'a NewMessage, user_id: &'a str) -> Self {
        Self {
            room_id: &message.room_id,
            user_id,
            content: &message.content,
            is_anonymous: message.is_anonymous,
            reply_to: message.reply_to.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoomRow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            room_type: row
                .room_type
                .as_deref()
                .map(RoomType::parse)
                .unwrap_or_default(),
            is_anonymous: row.is_anonymous.unwrap_or(false),
            description: row.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUserRow {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUserRow,
}

impl TokenResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> AuthSession {
        let expires_at = session_expiry(self.expires_at, self.expires_in, now);
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user_id: self.user.id,
            email: self.user.email,
        }
    }
}

/// Absolute expiry wins over a relative one; an hour is assumed when the
/// service reports neither.
pub fn session_expiry(
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    expires_at
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_else(|| now + Duration::seconds(expires_in.unwrap_or(3600)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn message_row_with_embedded_profile_becomes_domain_message() {
        let row: MessageRow = serde_json::from_str(
            r#"{
                "id": "m1",
                "room_id": "r1",
                "user_id": "u1",
                "content": "Shift swap anyone?",
                "created_at": "2026-02-14T09:30:00+00:00",
                "is_anonymous": null,
                "reply_to": "m0",
                "profile": {"name": "Dana Reyes", "qualification": "Paramedic"}
            }"#,
        )
        .expect("row parses");

        let message = Message::from(row);

        assert_eq!(message.author_name(), Some("Dana Reyes"));
        assert_eq!(message.reply_to.as_deref(), Some("m0"));
        assert!(!message.is_anonymous);
        assert_eq!(
            message.created_at,
            Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn message_row_without_profile_has_no_author() {
        let row: MessageRow = serde_json::from_str(
            r#"{"id":"m1","room_id":"r1","user_id":"u1","content":"hi","created_at":"2026-02-14T09:30:00Z","profile":null}"#,
        )
        .expect("row parses");

        assert_eq!(Message::from(row).author, None);
    }

    #[test]
    fn room_row_maps_type_column() {
        let row: RoomRow = serde_json::from_str(
            r#"{"id":"r1","name":"Student Lounge","type":"students","is_anonymous":true}"#,
        )
        .expect("row parses");

        let room = Room::from(row);

        assert_eq!(room.room_type, RoomType::Students);
        assert!(room.is_anonymous);
    }

    #[test]
    fn new_message_row_omits_missing_reply() {
        let message = NewMessage {
            room_id: "r1".to_owned(),
            content: "Hello".to_owned(),
            is_anonymous: false,
            reply_to: None,
        };

        let body = serde_json::to_value(NewMessageRow::new(&message, "u1")).expect("serializes");

        assert_eq!(
            body,
            serde_json::json!({
                "room_id": "r1",
                "user_id": "u1",
                "content": "Hello",
                "is_anonymous": false
            })
        );
    }

    #[test]
    fn expiry_prefers_absolute_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 2, 14, 10, 0, 0).unwrap();

        assert_eq!(
            session_expiry(Some(1_771_070_400), Some(60), now),
            Utc.with_ymd_and_hms(2026, 2, 14, 12, 0, 0).unwrap()
        );
        assert_eq!(
            session_expiry(None, Some(60), now),
            now + Duration::seconds(60)
        );
        assert_eq!(session_expiry(None, None, now), now + Duration::hours(1));
    }
}
