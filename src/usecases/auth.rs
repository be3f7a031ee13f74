//! Auth form submission and OAuth hand-off.
//!
//! Every outcome is reported as a toast so the CLI form and any future
//! in-TUI form surface results the same way.

use crate::{
    domain::{
        auth_form::{AuthForm, AuthMode, Credentials},
        notification::Toast,
        session::AuthSession,
    },
    infra::contracts::ExternalOpener,
};

pub const DEFAULT_OAUTH_PROVIDER: &str = "google";
const GENERIC_FAILURE: &str = "Something went wrong";
const OAUTH_FAILURE: &str = "Failed to sign in with Google";
const RESET_REDIRECT_SUFFIX: &str = "/auth?mode=reset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthSourceError {
    /// The provider refused the request and said why.
    Rejected { message: String },
    /// Transport failure or 5xx.
    Unavailable,
    /// Response could not be understood.
    InvalidResponse,
}

impl AuthSourceError {
    fn user_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

pub trait AuthProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthSourceError>;
    fn sign_up(&self, email: &str, password: &str, redirect_to: &str)
        -> Result<(), AuthSourceError>;
    fn request_password_reset(&self, email: &str, redirect_to: &str)
        -> Result<(), AuthSourceError>;
    fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthSourceError>;
    fn sign_out(&self, access_token: &str) -> Result<(), AuthSourceError>;
    fn oauth_authorize_url(&self, provider: &str, redirect_to: &str)
        -> Result<String, AuthSourceError>;
    /// Exchanges the URL the browser was redirected to for a session.
    fn complete_oauth(&self, redirected_url: &str) -> Result<AuthSession, AuthSourceError>;
}

/// Result of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubmission {
    pub toast: Toast,
    /// Present after a successful sign-in.
    pub session: Option<AuthSession>,
}

impl AuthSubmission {
    pub fn succeeded(&self) -> bool {
        !self.toast.is_destructive()
    }
}

/// Submits validated credentials in the form's current mode.
///
/// A successful reset request switches the form back to sign-in.
pub fn submit(
    provider: &dyn AuthProvider,
    form: &mut AuthForm,
    credentials: &Credentials,
    redirect_base: &str,
) -> AuthSubmission {
    let password = credentials.password.as_deref().unwrap_or_default();

    let result = match form.mode() {
        AuthMode::ResetPassword => provider
            .request_password_reset(&credentials.email, &reset_redirect(redirect_base))
            .map(|()| {
                form.on_reset_sent();
                AuthSubmission {
                    toast: Toast::normal("Check your email")
                        .with_description("We sent you a password reset link."),
                    session: None,
                }
            }),
        AuthMode::SignIn => provider
            .sign_in(&credentials.email, password)
            .map(|session| AuthSubmission {
                toast: Toast::normal("Welcome back!").with_description("Successfully logged in."),
                session: Some(session),
            }),
        AuthMode::SignUp => provider
            .sign_up(&credentials.email, password, redirect_base)
            .map(|()| AuthSubmission {
                toast: Toast::normal("Check your email!")
                    .with_description("Please verify your email to continue."),
                session: None,
            }),
    };

    result.unwrap_or_else(|error| {
        tracing::warn!(mode = ?form.mode(), ?error, "auth submission failed");
        AuthSubmission {
            toast: failure_toast(&error, GENERIC_FAILURE),
            session: None,
        }
    })
}

/// Builds the provider URL and hands it to the browser. The URL is returned
/// so it can also be shown when no browser is available.
pub fn begin_oauth(
    provider: &dyn AuthProvider,
    opener: &dyn ExternalOpener,
    oauth_provider: &str,
    redirect_base: &str,
) -> Result<String, Toast> {
    let url = provider
        .oauth_authorize_url(oauth_provider, redirect_base)
        .map_err(|error| failure_toast(&error, OAUTH_FAILURE))?;

    if let Err(error) = opener.open(&url) {
        tracing::warn!(error = %error, "browser hand-off failed; URL printed instead");
    }

    Ok(url)
}

pub fn complete_oauth(
    provider: &dyn AuthProvider,
    redirected_url: &str,
) -> Result<AuthSubmission, Toast> {
    let session = provider
        .complete_oauth(redirected_url.trim())
        .map_err(|error| failure_toast(&error, OAUTH_FAILURE))?;

    Ok(AuthSubmission {
        toast: Toast::normal("Welcome back!").with_description("Successfully logged in."),
        session: Some(session),
    })
}

fn failure_toast(error: &AuthSourceError, fallback: &str) -> Toast {
    Toast::destructive("Error").with_description(error.user_message().unwrap_or(fallback))
}

fn reset_redirect(redirect_base: &str) -> String {
    format!("{}{RESET_REDIRECT_SUFFIX}", redirect_base.trim_end_matches('/'))
}
