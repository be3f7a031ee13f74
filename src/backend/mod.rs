//! Adapter for the hosted auth and database service.
//!
//! `SupabaseApi` speaks HTTP asynchronously; `BackendAdapter` owns the tokio
//! runtime and exposes the synchronous use-case seams on top of it.

mod auth;
mod client;
mod dto;
pub mod error;
mod rest;
pub mod updates;

use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use chrono::Utc;
use tokio::runtime::{Builder, Handle, Runtime};

use crate::{
    domain::{
        message::{Message, NewMessage},
        profile::UserProfile,
        room::Room,
        session::AuthSession,
    },
    infra::{config::BackendConfig, error::AppError},
    usecases::{
        auth::{AuthProvider, AuthSourceError},
        list_rooms::{RoomsSource, RoomsSourceError},
        load_home::{CommunitySource, CommunitySourceError, CountedTable},
        load_messages::{MessagesSource, MessagesSourceError},
        send_message::{MessageSender, SendMessageSourceError},
    },
};

use self::client::RestClient;

pub use self::updates::RoomActivityMonitor;

#[derive(Debug)]
pub struct SupabaseApi {
    client: RestClient,
    session: RwLock<Option<AuthSession>>,
}

impl SupabaseApi {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let client = RestClient::new(
            &config.url,
            &config.anon_key,
            Duration::from_millis(config.request_timeout_ms),
        )
        .map_err(|error| AppError::BackendInit {
            details: error.to_string(),
        })?;

        Ok(Self {
            client,
            session: RwLock::new(None),
        })
    }

    pub fn set_session(&self, session: Option<AuthSession>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn access_token(&self) -> Option<String> {
        self.current_session().map(|session| session.access_token)
    }
}

#[derive(Debug)]
pub struct BackendAdapter {
    runtime: Runtime,
    api: Arc<SupabaseApi>,
}

impl BackendAdapter {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("codebluer-io")
            .enable_all()
            .build()
            .map_err(|error| AppError::BackendInit {
                details: format!("tokio runtime: {error}"),
            })?;
        let api = Arc::new(SupabaseApi::new(config)?);

        tracing::debug!(url = %config.url, "backend adapter ready");
        Ok(Self { runtime, api })
    }

    pub fn set_session(&self, session: Option<AuthSession>) {
        self.api.set_session(session);
    }

    pub fn api(&self) -> Arc<SupabaseApi> {
        Arc::clone(&self.api)
    }

    pub fn runtime_handle(&self) -> Handle {
        self.runtime.handle().clone()
    }
}

impl MessagesSource for BackendAdapter {
    fn list_messages(&self, room_id: &str, limit: usize) -> Result<Vec<Message>, MessagesSourceError> {
        self.runtime
            .block_on(self.api.list_messages(room_id, limit))
            .map_err(Into::into)
    }
}

impl MessageSender for BackendAdapter {
    fn send_message(&self, message: &NewMessage) -> Result<(), SendMessageSourceError> {
        self.runtime
            .block_on(self.api.insert_message(message))
            .map_err(Into::into)
    }
}

impl RoomsSource for BackendAdapter {
    fn list_rooms(&self, limit: usize) -> Result<Vec<Room>, RoomsSourceError> {
        self.runtime
            .block_on(self.api.list_rooms(limit))
            .map_err(Into::into)
    }
}

impl CommunitySource for BackendAdapter {
    fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>, CommunitySourceError> {
        self.runtime
            .block_on(self.api.load_profile(user_id))
            .map_err(Into::into)
    }

    fn count(&self, table: CountedTable) -> Result<u64, CommunitySourceError> {
        self.runtime
            .block_on(self.api.count_rows(table.table_name()))
            .map_err(Into::into)
    }
}

impl AuthProvider for BackendAdapter {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthSourceError> {
        self.runtime
            .block_on(self.api.sign_in_with_password(email, password))
            .map_err(Into::into)
    }

    fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> Result<(), AuthSourceError> {
        self.runtime
            .block_on(self.api.sign_up(email, password, redirect_to))
            .map_err(Into::into)
    }

    fn request_password_reset(&self, email: &str, redirect_to: &str) -> Result<(), AuthSourceError> {
        self.runtime
            .block_on(self.api.recover(email, redirect_to))
            .map_err(Into::into)
    }

    fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthSourceError> {
        self.runtime
            .block_on(self.api.refresh_session(refresh_token))
            .map_err(Into::into)
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthSourceError> {
        self.runtime
            .block_on(self.api.sign_out(access_token))
            .map_err(Into::into)
    }

    fn oauth_authorize_url(&self, provider: &str, redirect_to: &str) -> Result<String, AuthSourceError> {
        self.api
            .authorize_url(provider, redirect_to)
            .map_err(Into::into)
    }

    fn complete_oauth(&self, redirected_url: &str) -> Result<AuthSession, AuthSourceError> {
        auth::session_from_redirect(redirected_url, Utc::now()).map_err(Into::into)
    }
}
