//! Credential form shared by sign-in, sign-up and password reset.

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
    ResetPassword,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Welcome Back",
            Self::SignUp => "Create Account",
            Self::ResetPassword => "Reset Password",
        }
    }

    pub fn requires_password(self) -> bool {
        !matches!(self, Self::ResetPassword)
    }

    /// Modes reachable from this one, in display order.
    pub fn switch_targets(self) -> &'static [AuthMode] {
        match self {
            Self::SignIn => &[Self::SignUp, Self::ResetPassword],
            Self::SignUp => &[Self::SignIn],
            Self::ResetPassword => &[Self::SignIn],
        }
    }

    pub fn can_switch_to(self, target: AuthMode) -> bool {
        self.switch_targets().contains(&target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    InvalidEmail,
    PasswordTooShort,
}

impl CredentialError {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidEmail => "Enter a valid email address, e.g. medic@example.com.",
            Self::PasswordTooShort => "Password must be at least 6 characters.",
        }
    }
}

/// Validated credentials for one submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthForm {
    mode: AuthMode,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Returns false when the transition is not offered from the current mode.
    pub fn switch_to(&mut self, target: AuthMode) -> bool {
        if !self.mode.can_switch_to(target) {
            return false;
        }
        self.mode = target;
        true
    }

    /// A successful reset request returns the form to sign-in.
    pub fn on_reset_sent(&mut self) {
        if self.mode == AuthMode::ResetPassword {
            self.mode = AuthMode::SignIn;
        }
    }

    pub fn validate(&self, email: &str, password: &str) -> Result<Credentials, CredentialError> {
        let email = validate_email(email)?;
        if !self.mode.requires_password() {
            return Ok(Credentials {
                email,
                password: None,
            });
        }

        let password = validate_password(password)?;
        Ok(Credentials {
            email,
            password: Some(password),
        })
    }
}

pub fn validate_email(raw: &str) -> Result<String, CredentialError> {
    let email = raw.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(CredentialError::InvalidEmail);
    };

    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    let no_spaces = !email.chars().any(char::is_whitespace);

    if local.is_empty() || domain.contains('@') || !domain_ok || !no_spaces {
        return Err(CredentialError::InvalidEmail);
    }

    Ok(email.to_owned())
}

pub fn validate_password(raw: &str) -> Result<String, CredentialError> {
    if raw.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(raw.to_owned())
}
