//! Auth service calls: password grant, sign-up, recovery, refresh,
//! sign-out, and the implicit OAuth redirect.

use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Deserialize;
use url::Url;

use crate::domain::session::AuthSession;

use super::{
    dto::{session_expiry, TokenResponse},
    error::BackendError,
    SupabaseApi,
};

impl SupabaseApi {
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, BackendError> {
        let mut url = self.client.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = serde_json::json!({ "email": email, "password": password });
        self.token_request(url, body).await
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), BackendError> {
        let mut url = self.client.endpoint("/auth/v1/signup")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        let request = self
            .client
            .request(Method::POST, &url, None)
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.client.send(request, &url).await?;
        Ok(())
    }

    pub async fn recover(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        let mut url = self.client.endpoint("/auth/v1/recover")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        let request = self
            .client
            .request(Method::POST, &url, None)
            .json(&serde_json::json!({ "email": email }));
        self.client.send(request, &url).await?;
        Ok(())
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> Result<AuthSession, BackendError> {
        let mut url = self.client.endpoint("/auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let body = serde_json::json!({ "refresh_token": refresh_token });
        self.token_request(url, body).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let url = self.client.endpoint("/auth/v1/logout")?;
        let request = self.client.request(Method::POST, &url, Some(access_token));
        self.client.send(request, &url).await?;
        Ok(())
    }

    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> Result<String, BackendError> {
        let mut url = self.client.endpoint("/auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to);
        Ok(url.into())
    }

    async fn token_request(
        &self,
        url: Url,
        body: serde_json::Value,
    ) -> Result<AuthSession, BackendError> {
        let request = self.client.request(Method::POST, &url, None).json(&body);
        let response = self.client.send(request, &url).await?;
        let token: TokenResponse = response.json().await.map_err(|error| BackendError::Decode {
            url: url.path().to_owned(),
            details: error.to_string(),
        })?;
        Ok(token.into_session(Utc::now()))
    }
}

#[derive(Debug, Deserialize)]
struct JwtClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Reads the session the auth service put in the redirect fragment.
pub fn session_from_redirect(redirected_url: &str, now: DateTime<Utc>) -> Result<AuthSession, BackendError> {
    let decode_error = |details: &str| BackendError::Decode {
        url: "oauth redirect".to_owned(),
        details: details.to_owned(),
    };

    let url = Url::parse(redirected_url.trim()).map_err(|error| decode_error(&error.to_string()))?;
    let fragment = url
        .fragment()
        .ok_or_else(|| decode_error("redirect carries no token fragment"))?;

    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut expires_at = None;
    let mut provider_error = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse().ok(),
            "expires_at" => expires_at = value.parse().ok(),
            "error_description" => provider_error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(message) = provider_error {
        return Err(BackendError::Status {
            status: 400,
            url: "oauth redirect".to_owned(),
            message,
        });
    }

    let access_token = access_token.ok_or_else(|| decode_error("missing access_token"))?;
    let refresh_token = refresh_token.ok_or_else(|| decode_error("missing refresh_token"))?;
    let claims = jwt_claims(&access_token).ok_or_else(|| decode_error("unreadable access token"))?;

    Ok(AuthSession {
        access_token,
        refresh_token,
        expires_at: session_expiry(expires_at, expires_in, now),
        user_id: claims.sub,
        email: claims.email,
    })
}

fn jwt_claims(token: &str) -> Option<JwtClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}
