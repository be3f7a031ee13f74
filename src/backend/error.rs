use thiserror::Error;

use crate::usecases::{
    auth::AuthSourceError, list_rooms::RoomsSourceError, load_home::CommunitySourceError,
    load_messages::MessagesSourceError, send_message::SendMessageSourceError,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("401 Unauthorized for {url}: {message}")]
    Unauthorized { url: String, message: String },
    #[error("404 Not Found for {url}")]
    NotFound { url: String },
    #[error("HTTP {status} for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {url}: {details}")]
    Decode { url: String, details: String },
    #[error("no signed-in session")]
    NoSession,
}

impl BackendError {
    fn is_server_side(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }

    /// Message the service gave for a refused request, if any.
    fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message, .. } => Some(message),
            Self::Status { message, .. } if !self.is_server_side() => Some(message),
            _ => None,
        }
    }
}

impl From<BackendError> for MessagesSourceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized { .. } | BackendError::NoSession => Self::Unauthorized,
            BackendError::NotFound { .. } => Self::RoomNotFound,
            BackendError::Decode { .. } => Self::InvalidData,
            BackendError::Status { .. } | BackendError::Transport { .. } => Self::Unavailable,
        }
    }
}

impl From<BackendError> for SendMessageSourceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized { .. } | BackendError::NoSession => Self::Unauthorized,
            ref status @ BackendError::Status { .. } if !status.is_server_side() => Self::Rejected,
            _ => Self::Unavailable,
        }
    }
}

impl From<BackendError> for RoomsSourceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized { .. } | BackendError::NoSession => Self::Unauthorized,
            BackendError::Decode { .. } => Self::InvalidData,
            _ => Self::Unavailable,
        }
    }
}

impl From<BackendError> for CommunitySourceError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized { .. } | BackendError::NoSession => Self::Unauthorized,
            BackendError::Decode { .. } => Self::InvalidData,
            _ => Self::Unavailable,
        }
    }
}

impl From<BackendError> for AuthSourceError {
    fn from(error: BackendError) -> Self {
        if let Some(message) = error.rejection_message() {
            return Self::Rejected {
                message: message.to_owned(),
            };
        }
        match error {
            BackendError::Decode { .. } => Self::InvalidResponse,
            _ => Self::Unavailable,
        }
    }
}
