use crate::domain::message::Message;

pub const DEFAULT_MESSAGES_PAGE_SIZE: usize = 50;
const MAX_MESSAGES_PAGE_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesQuery {
    pub room_id: String,
    pub limit: usize,
}

impl LoadMessagesQuery {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            limit: DEFAULT_MESSAGES_PAGE_SIZE,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    fn normalized_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_MESSAGES_PAGE_SIZE,
            value if value > MAX_MESSAGES_PAGE_SIZE => MAX_MESSAGES_PAGE_SIZE,
            value => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadMessagesOutput {
    /// Oldest first.
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagesSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
    RoomNotFound,
}

pub trait MessagesSource {
    /// Returns the newest `limit` messages of a room, oldest first.
    fn list_messages(&self, room_id: &str, limit: usize)
        -> Result<Vec<Message>, MessagesSourceError>;
}

impl<T> MessagesSource for &T
where
    T: MessagesSource + ?Sized,
{
    fn list_messages(
        &self,
        room_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, MessagesSourceError> {
        (*self).list_messages(room_id, limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMessagesError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
    RoomNotFound,
}

impl LoadMessagesError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "LOAD_MESSAGES_UNAUTHORIZED",
            Self::TemporarilyUnavailable => "LOAD_MESSAGES_UNAVAILABLE",
            Self::DataContractViolation => "LOAD_MESSAGES_INVALID_DATA",
            Self::RoomNotFound => "LOAD_MESSAGES_ROOM_NOT_FOUND",
        }
    }
}

pub fn load_messages(
    source: &dyn MessagesSource,
    query: LoadMessagesQuery,
) -> Result<LoadMessagesOutput, LoadMessagesError> {
    let limit = query.normalized_limit();
    let mut messages = source
        .list_messages(&query.room_id, limit)
        .map_err(map_source_error)?;

    // Sources may hand back rows in any order; the list renders oldest first.
    messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(LoadMessagesOutput { messages })
}

fn map_source_error(error: MessagesSourceError) -> LoadMessagesError {
    match error {
        MessagesSourceError::Unauthorized => LoadMessagesError::Unauthorized,
        MessagesSourceError::Unavailable => LoadMessagesError::TemporarilyUnavailable,
        MessagesSourceError::InvalidData => LoadMessagesError::DataContractViolation,
        MessagesSourceError::RoomNotFound => LoadMessagesError::RoomNotFound,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    struct StubSource {
        result: Result<Vec<Message>, MessagesSourceError>,
        captured_room_id: std::sync::Mutex<Option<String>>,
        captured_limit: std::sync::Mutex<Option<usize>>,
    }

    impl StubSource {
        fn with_result(result: Result<Vec<Message>, MessagesSourceError>) -> Self {
            Self {
                result,
                captured_room_id: std::sync::Mutex::new(None),
                captured_limit: std::sync::Mutex::new(None),
            }
        }
    }

    impl MessagesSource for StubSource {
        fn list_messages(
            &self,
            room_id: &str,
            limit: usize,
        ) -> Result<Vec<Message>, MessagesSourceError> {
            *self.captured_room_id.lock().expect("room_id lock") = Some(room_id.to_owned());
            *self.captured_limit.lock().expect("limit lock") = Some(limit);
            self.result.clone()
        }
    }

    fn message(id: &str, minute: u32) -> Message {
        Message {
            id: id.to_owned(),
            room_id: "room-1".to_owned(),
            user_id: "u1".to_owned(),
            author: None,
            content: "Hello".to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 2, 14, 10, minute, 0).unwrap(),
            is_anonymous: false,
            reply_to: None,
        }
    }

    #[test]
    fn uses_default_limit_when_query_limit_is_zero() {
        let source = StubSource::with_result(Ok(vec![]));

        let _ = load_messages(&source, LoadMessagesQuery::new("room-1").with_limit(0))
            .expect("load should succeed");

        assert_eq!(*source.captured_limit.lock().expect("limit lock"), Some(50));
    }

    #[test]
    fn caps_limit_to_maximum_boundary() {
        let source = StubSource::with_result(Ok(vec![]));

        let _ = load_messages(&source, LoadMessagesQuery::new("room-1").with_limit(999))
            .expect("load should succeed");

        assert_eq!(
            *source.captured_limit.lock().expect("limit lock"),
            Some(200)
        );
    }

    #[test]
    fn passes_room_id_to_source() {
        let source = StubSource::with_result(Ok(vec![]));

        let _ = load_messages(&source, LoadMessagesQuery::new("room-42"))
            .expect("load should succeed");

        assert_eq!(
            source
                .captured_room_id
                .lock()
                .expect("room_id lock")
                .as_deref(),
            Some("room-42")
        );
    }

    #[test]
    fn orders_messages_oldest_first() {
        let source = StubSource::with_result(Ok(vec![message("b", 5), message("a", 1)]));

        let output =
            load_messages(&source, LoadMessagesQuery::new("room-1")).expect("load should succeed");

        let ids: Vec<&str> = output.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn maps_unauthorized_error() {
        let source = StubSource::with_result(Err(MessagesSourceError::Unauthorized));

        let err = load_messages(&source, LoadMessagesQuery::new("room-1")).expect_err("must fail");

        assert_eq!(err, LoadMessagesError::Unauthorized);
        assert_eq!(err.code(), "LOAD_MESSAGES_UNAUTHORIZED");
    }

    #[test]
    fn maps_room_not_found_error() {
        let source = StubSource::with_result(Err(MessagesSourceError::RoomNotFound));

        let err = load_messages(&source, LoadMessagesQuery::new("room-1")).expect_err("must fail");

        assert_eq!(err, LoadMessagesError::RoomNotFound);
    }
}
