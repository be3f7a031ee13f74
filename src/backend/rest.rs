//! Table reads and writes over the REST gateway.

use reqwest::{header::HeaderMap, Method};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::{
    message::{Message, NewMessage},
    profile::UserProfile,
    room::Room,
};

use super::{
    dto::{MessageIdRow, MessageRow, NewMessageRow, ProfileRow, RoomRow, MESSAGE_SELECT},
    error::BackendError,
    SupabaseApi,
};

impl SupabaseApi {
    /// Newest `limit` messages of a room, returned oldest first.
    pub async fn list_messages(&self, room_id: &str, limit: usize) -> Result<Vec<Message>, BackendError> {
        let mut url = self.client.endpoint("/rest/v1/messages")?;
        url.query_pairs_mut()
            .append_pair("room_id", &format!("eq.{room_id}"))
            .append_pair("select", MESSAGE_SELECT)
            .append_pair("order", "created_at.desc")
            .append_pair("limit", &limit.to_string());

        let rows: Vec<MessageRow> = self.get_json(&url).await?;
        let mut messages: Vec<Message> = rows.into_iter().map(Message::from).collect();
        messages.reverse();
        Ok(messages)
    }

    pub async fn latest_message_id(&self, room_id: &str) -> Result<Option<String>, BackendError> {
        let mut url = self.client.endpoint("/rest/v1/messages")?;
        url.query_pairs_mut()
            .append_pair("room_id", &format!("eq.{room_id}"))
            .append_pair("select", "id")
            .append_pair("order", "created_at.desc")
            .append_pair("limit", "1");

        let rows: Vec<MessageIdRow> = self.get_json(&url).await?;
        Ok(rows.into_iter().next().map(|row| row.id))
    }

    pub async fn insert_message(&self, message: &NewMessage) -> Result<(), BackendError> {
        let session = self.current_session().ok_or(BackendError::NoSession)?;
        let url = self.client.endpoint("/rest/v1/messages")?;
        let request = self
            .client
            .request(Method::POST, &url, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .json(&NewMessageRow::new(message, &session.user_id));

        let response = self.client.send(request, &url).await?;
        let inserted: Vec<MessageIdRow> = decode(response, &url).await?;
        if inserted.is_empty() {
            return Err(BackendError::Decode {
                url: url.path().to_owned(),
                details: "insert returned no row".to_owned(),
            });
        }
        Ok(())
    }

    pub async fn list_rooms(&self, limit: usize) -> Result<Vec<Room>, BackendError> {
        let mut url = self.client.endpoint("/rest/v1/rooms")?;
        url.query_pairs_mut()
            .append_pair("select", "id,name,type,is_anonymous,description")
            .append_pair("order", "name.asc")
            .append_pair("limit", &limit.to_string());

        let rows: Vec<RoomRow> = self.get_json(&url).await?;
        Ok(rows.into_iter().map(Room::from).collect())
    }

    pub async fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, BackendError> {
        let mut url = self.client.endpoint("/rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{user_id}"))
            .append_pair("select", "id,name,avatar_url,qualification,user_type")
            .append_pair("limit", "1");

        let rows: Vec<ProfileRow> = self.get_json(&url).await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.into_profile(user_id)))
    }

    /// Exact row count of a table, read from the `Content-Range` header.
    pub async fn count_rows(&self, table: &str) -> Result<u64, BackendError> {
        let mut url = self.client.endpoint(&format!("/rest/v1/{table}"))?;
        url.query_pairs_mut().append_pair("select", "*");
        let token = self.access_token();
        let request = self
            .client
            .request(Method::HEAD, &url, token.as_deref())
            .header("Prefer", "count=exact");

        let response = self.client.send(request, &url).await?;
        content_range_total(response.headers()).ok_or_else(|| BackendError::Decode {
            url: url.path().to_owned(),
            details: "missing row count".to_owned(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, BackendError> {
        let token = self.access_token();
        let request = self.client.request(Method::GET, url, token.as_deref());
        let response = self.client.send(request, url).await?;
        decode(response, url).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &Url) -> Result<T, BackendError> {
    response.json().await.map_err(|error| BackendError::Decode {
        url: url.path().to_owned(),
        details: error.to_string(),
    })
}

/// `Content-Range: 0-24/318` → 318. `*/0` for an empty table.
fn content_range_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("content-range")?
        .to_str()
        .ok()?
        .rsplit_once('/')?
        .1
        .trim()
        .parse()
        .ok()
}
