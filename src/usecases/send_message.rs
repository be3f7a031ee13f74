//! Use case for posting a message to a room.
//!
//! This module provides the `MessageSender` trait and `send_message` function
//! for writing messages through the data service.

use crate::domain::message::NewMessage;

/// Command to post a message to a specific room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub room_id: String,
    pub content: String,
    /// Room default; the client never overrides it per message.
    pub is_anonymous: bool,
    pub reply_to: Option<String>,
}

/// Errors that can occur at the source level (data service).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageSourceError {
    /// Session is missing or rejected.
    Unauthorized,
    /// The service refused the row (policy or constraint).
    Rejected,
    /// Service is temporarily unavailable.
    Unavailable,
}

/// Domain-level errors for the send operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Content is empty after trimming whitespace.
    EmptyMessage,
    Unauthorized,
    Rejected,
    TemporarilyUnavailable,
}

impl SendMessageError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "SEND_MESSAGE_EMPTY",
            Self::Unauthorized => "SEND_MESSAGE_UNAUTHORIZED",
            Self::Rejected => "SEND_MESSAGE_REJECTED",
            Self::TemporarilyUnavailable => "SEND_MESSAGE_UNAVAILABLE",
        }
    }
}

/// Trait for writing messages.
pub trait MessageSender {
    /// Persists a new message row.
    ///
    /// # Errors
    /// Returns `SendMessageSourceError` if the write was not confirmed.
    fn send_message(&self, message: &NewMessage) -> Result<(), SendMessageSourceError>;
}

impl<T: MessageSender + ?Sized> MessageSender for &T {
    fn send_message(&self, message: &NewMessage) -> Result<(), SendMessageSourceError> {
        (*self).send_message(message)
    }
}

/// Sends a message to the specified room.
///
/// Content is trimmed; empty content returns `SendMessageError::EmptyMessage`
/// without contacting the sender.
pub fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    let content = command.content.trim();
    if content.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    let message = NewMessage {
        room_id: command.room_id,
        content: content.to_owned(),
        is_anonymous: command.is_anonymous,
        reply_to: command.reply_to,
    };

    sender.send_message(&message).map_err(map_source_error)
}

fn map_source_error(error: SendMessageSourceError) -> SendMessageError {
    match error {
        SendMessageSourceError::Unauthorized => SendMessageError::Unauthorized,
        SendMessageSourceError::Rejected => SendMessageError::Rejected,
        SendMessageSourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
    }
}
