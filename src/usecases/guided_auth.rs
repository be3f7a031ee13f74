use std::io;

use crate::{
    domain::{
        auth_form::{AuthForm, AuthMode, Credentials},
        notification::Toast,
        session::AuthSession,
    },
    infra::contracts::{ExternalOpener, SessionStore},
};

use super::auth::{self, AuthProvider};

const SWITCH_TO_SIGN_IN: &str = ":signin";
const SWITCH_TO_SIGN_UP: &str = ":signup";
const SWITCH_TO_RESET: &str = ":reset";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub email_attempts: usize,
    pub password_attempts: usize,
    pub submit_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            email_attempts: 3,
            password_attempts: 3,
            submit_attempts: 3,
        }
    }
}

pub trait AuthTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()>;
    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

pub struct StdTerminal;

impl AuthTerminal for StdTerminal {
    fn print_line(&mut self, line: &str) -> io::Result<()> {
        println!("{line}");
        Ok(())
    }

    fn prompt_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use std::io::Write;

        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim().to_owned()))
    }

    fn prompt_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match rpassword::prompt_password(prompt) {
            Ok(password) => Ok(Some(password)),
            Err(source) if source.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(source) => Err(source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedAuthOutcome {
    Authenticated(AuthSession),
    ExitWithGuidance,
}

/// Dependencies of the guided form.
pub struct GuidedAuthDeps<'a> {
    pub provider: &'a dyn AuthProvider,
    pub store: &'a mut dyn SessionStore,
    pub redirect_base: &'a str,
}

enum FieldInput<T> {
    Value(T),
    SwitchMode(AuthMode),
    Cancelled,
    Exhausted,
}

pub fn run_guided_auth(
    terminal: &mut dyn AuthTerminal,
    deps: GuidedAuthDeps<'_>,
    start_mode: AuthMode,
    retry_policy: &RetryPolicy,
) -> io::Result<GuidedAuthOutcome> {
    let mut form = AuthForm::new(start_mode);
    let mut failed_submissions = 0;

    while failed_submissions < retry_policy.submit_attempts {
        print_header(terminal, form.mode())?;

        let credentials = match collect_credentials(terminal, &mut form, retry_policy)? {
            FieldInput::Value(credentials) => credentials,
            FieldInput::SwitchMode(_) => continue,
            FieldInput::Cancelled => {
                terminal.print_line("Input cancelled (EOF). Run codebluer again to retry.")?;
                return Ok(GuidedAuthOutcome::ExitWithGuidance);
            }
            FieldInput::Exhausted => {
                terminal.print_line("Too many invalid entries. Please restart codebluer.")?;
                return Ok(GuidedAuthOutcome::ExitWithGuidance);
            }
        };

        let submitted_mode = form.mode();
        let submission = auth::submit(deps.provider, &mut form, &credentials, deps.redirect_base);
        terminal.print_line(&submission.toast.to_line())?;

        if !submission.succeeded() {
            failed_submissions += 1;
            continue;
        }

        match (submitted_mode, submission.session) {
            (_, Some(session)) => return persist(terminal, deps.store, session),
            (AuthMode::SignUp, None) => return Ok(GuidedAuthOutcome::ExitWithGuidance),
            _ => {}
        }
    }

    terminal.print_line("Authentication failed too many times. Please restart codebluer later.")?;
    Ok(GuidedAuthOutcome::ExitWithGuidance)
}

/// Browser-based sign-in: the provider redirects back with tokens in the URL
/// fragment, which the user pastes here.
pub fn run_oauth(
    terminal: &mut dyn AuthTerminal,
    deps: GuidedAuthDeps<'_>,
    opener: &dyn ExternalOpener,
    oauth_provider: &str,
) -> io::Result<GuidedAuthOutcome> {
    let url = match auth::begin_oauth(deps.provider, opener, oauth_provider, deps.redirect_base) {
        Ok(url) => url,
        Err(toast) => return fail_with(terminal, &toast),
    };

    terminal.print_line(&format!("Continue in your browser: {url}"))?;
    terminal.print_line("After signing in, paste the address of the page you land on.")?;

    let Some(redirected) = terminal.prompt_line("Redirected URL: ")? else {
        terminal.print_line("Input cancelled (EOF). Run codebluer again to retry.")?;
        return Ok(GuidedAuthOutcome::ExitWithGuidance);
    };

    match auth::complete_oauth(deps.provider, &redirected) {
        Ok(submission) => {
            terminal.print_line(&submission.toast.to_line())?;
            match submission.session {
                Some(session) => persist(terminal, deps.store, session),
                None => Ok(GuidedAuthOutcome::ExitWithGuidance),
            }
        }
        Err(toast) => fail_with(terminal, &toast),
    }
}

fn fail_with(terminal: &mut dyn AuthTerminal, toast: &Toast) -> io::Result<GuidedAuthOutcome> {
    terminal.print_line(&toast.to_line())?;
    Ok(GuidedAuthOutcome::ExitWithGuidance)
}

fn persist(
    terminal: &mut dyn AuthTerminal,
    store: &mut dyn SessionStore,
    session: AuthSession,
) -> io::Result<GuidedAuthOutcome> {
    if let Err(error) = store.save(&session) {
        tracing::error!(error = %error, "signed in but the session could not be stored");
        terminal.print_line(
            "AUTH_SESSION_PERSIST_FAILED: signed in, but the session could not be saved.",
        )?;
        return Ok(GuidedAuthOutcome::ExitWithGuidance);
    }

    terminal.print_line("Session saved.")?;
    Ok(GuidedAuthOutcome::Authenticated(session))
}

fn print_header(terminal: &mut dyn AuthTerminal, mode: AuthMode) -> io::Result<()> {
    terminal.print_line("")?;
    terminal.print_line(&format!("== {} ==", mode.title()))?;

    let hints: Vec<String> = mode
        .switch_targets()
        .iter()
        .map(|target| match target {
            AuthMode::SignIn => format!("{SWITCH_TO_SIGN_IN} to sign in"),
            AuthMode::SignUp => format!("{SWITCH_TO_SIGN_UP} to create an account"),
            AuthMode::ResetPassword => format!("{SWITCH_TO_RESET} if you forgot your password"),
        })
        .collect();
    terminal.print_line(&format!("Type {}.", hints.join(", or ")))
}

fn collect_credentials(
    terminal: &mut dyn AuthTerminal,
    form: &mut AuthForm,
    retry_policy: &RetryPolicy,
) -> io::Result<FieldInput<Credentials>> {
    let email = match collect_email(terminal, form, retry_policy.email_attempts)? {
        FieldInput::Value(email) => email,
        FieldInput::SwitchMode(mode) => return Ok(FieldInput::SwitchMode(mode)),
        FieldInput::Cancelled => return Ok(FieldInput::Cancelled),
        FieldInput::Exhausted => return Ok(FieldInput::Exhausted),
    };

    if !form.mode().requires_password() {
        return Ok(FieldInput::Value(Credentials {
            email,
            password: None,
        }));
    }

    for attempt in 1..=retry_policy.password_attempts {
        let Some(password) = terminal.prompt_secret("Password: ")? else {
            return Ok(FieldInput::Cancelled);
        };

        match form.validate(&email, &password) {
            Ok(credentials) => return Ok(FieldInput::Value(credentials)),
            Err(error) => terminal.print_line(&format!(
                "{} Attempts left: {}",
                error.message(),
                retry_policy.password_attempts.saturating_sub(attempt)
            ))?,
        }
    }

    Ok(FieldInput::Exhausted)
}

fn collect_email(
    terminal: &mut dyn AuthTerminal,
    form: &mut AuthForm,
    attempts: usize,
) -> io::Result<FieldInput<String>> {
    for attempt in 1..=attempts {
        let Some(input) = terminal.prompt_line("Email: ")? else {
            return Ok(FieldInput::Cancelled);
        };

        if let Some(target) = parse_mode_switch(&input) {
            if form.switch_to(target) {
                return Ok(FieldInput::SwitchMode(target));
            }
            terminal.print_line("That option is not available here.")?;
            continue;
        }

        match crate::domain::auth_form::validate_email(&input) {
            Ok(email) => return Ok(FieldInput::Value(email)),
            Err(error) => terminal.print_line(&format!(
                "{} Attempts left: {}",
                error.message(),
                attempts.saturating_sub(attempt)
            ))?,
        }
    }

    Ok(FieldInput::Exhausted)
}

fn parse_mode_switch(input: &str) -> Option<AuthMode> {
    match input.trim() {
        SWITCH_TO_SIGN_IN => Some(AuthMode::SignIn),
        SWITCH_TO_SIGN_UP => Some(AuthMode::SignUp),
        SWITCH_TO_RESET => Some(AuthMode::ResetPassword),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::{
        infra::stubs::RecordingOpener,
        usecases::auth::{
            test_doubles::{session, StubProvider},
            AuthSourceError,
        },
    };

    struct FakeTerminal {
        inputs: VecDeque<Option<String>>,
        output: Vec<String>,
    }

    impl FakeTerminal {
        fn new(inputs: Vec<Option<&str>>) -> Self {
            Self {
                inputs: inputs
                    .into_iter()
                    .map(|item| item.map(|value| value.to_owned()))
                    .collect(),
                output: Vec::new(),
            }
        }

        fn printed(&self, needle: &str) -> bool {
            self.output.iter().any(|line| line.contains(needle))
        }
    }

    impl AuthTerminal for FakeTerminal {
        fn print_line(&mut self, line: &str) -> io::Result<()> {
            self.output.push(line.to_owned());
            Ok(())
        }

        fn prompt_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.inputs.pop_front().flatten())
        }

        fn prompt_secret(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            Ok(self.inputs.pop_front().flatten())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: Option<AuthSession>,
        fail: bool,
    }

    impl SessionStore for MemoryStore {
        fn load(&self) -> anyhow::Result<Option<AuthSession>> {
            Ok(self.saved.clone())
        }

        fn save(&mut self, session: &AuthSession) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("disk full");
            }
            self.saved = Some(session.clone());
            Ok(())
        }

        fn clear(&mut self) -> anyhow::Result<bool> {
            Ok(self.saved.take().is_some())
        }
    }

    fn run(
        terminal: &mut FakeTerminal,
        provider: &StubProvider,
        store: &mut MemoryStore,
        mode: AuthMode,
    ) -> GuidedAuthOutcome {
        run_guided_auth(
            terminal,
            GuidedAuthDeps {
                provider,
                store,
                redirect_base: "http://localhost:5173",
            },
            mode,
            &RetryPolicy::default(),
        )
        .expect("guided auth should complete")
    }

    #[test]
    fn sign_in_happy_path_persists_session() {
        let mut terminal = FakeTerminal::new(vec![Some("medic@example.com"), Some("secret1")]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert!(matches!(outcome, GuidedAuthOutcome::Authenticated(_)));
        assert!(store.saved.is_some());
        assert!(terminal.printed("Welcome back!"));
    }

    #[test]
    fn invalid_email_reprompts_without_contacting_provider() {
        let mut terminal = FakeTerminal::new(vec![
            Some("not-an-email"),
            Some("medic@example.com"),
            Some("secret1"),
        ]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert!(matches!(outcome, GuidedAuthOutcome::Authenticated(_)));
        assert!(terminal.printed("valid email"));
        assert_eq!(provider.calls.borrow().len(), 1);
    }

    #[test]
    fn short_password_reprompts() {
        let mut terminal = FakeTerminal::new(vec![
            Some("medic@example.com"),
            Some("123"),
            Some("secret1"),
        ]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert!(matches!(outcome, GuidedAuthOutcome::Authenticated(_)));
        assert!(terminal.printed("at least 6 characters"));
    }

    #[test]
    fn reset_then_sign_in_in_one_session() {
        let mut terminal = FakeTerminal::new(vec![
            Some(":reset"),
            Some("medic@example.com"),
            Some("medic@example.com"),
            Some("secret1"),
        ]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert!(matches!(outcome, GuidedAuthOutcome::Authenticated(_)));
        assert!(terminal.printed("Check your email: We sent you a password reset link."));
        assert_eq!(provider.calls.borrow().len(), 2);
    }

    #[test]
    fn sign_up_success_exits_with_guidance() {
        let mut terminal = FakeTerminal::new(vec![Some("medic@example.com"), Some("secret1")]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignUp);

        assert_eq!(outcome, GuidedAuthOutcome::ExitWithGuidance);
        assert!(terminal.printed("Please verify your email to continue."));
        assert!(store.saved.is_none());
    }

    #[test]
    fn provider_rejection_is_retried_then_gives_up() {
        let mut terminal = FakeTerminal::new(vec![
            Some("medic@example.com"),
            Some("secret1"),
            Some("medic@example.com"),
            Some("secret1"),
            Some("medic@example.com"),
            Some("secret1"),
        ]);
        let provider = StubProvider {
            sign_in: Err(AuthSourceError::Rejected {
                message: "Invalid login credentials".to_owned(),
            }),
            ..StubProvider::default()
        };
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert_eq!(outcome, GuidedAuthOutcome::ExitWithGuidance);
        assert!(terminal.printed("✖ Error: Invalid login credentials"));
        assert_eq!(provider.calls.borrow().len(), 3);
    }

    #[test]
    fn eof_cancels_flow_cleanly() {
        let mut terminal = FakeTerminal::new(vec![None]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert_eq!(outcome, GuidedAuthOutcome::ExitWithGuidance);
        assert!(provider.calls.borrow().is_empty());
    }

    #[test]
    fn unavailable_switch_is_refused() {
        let mut terminal = FakeTerminal::new(vec![Some(":signup"), Some("medic@example.com")]);
        let provider = StubProvider::default();
        let mut store = MemoryStore::default();

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::ResetPassword);

        assert_eq!(outcome, GuidedAuthOutcome::ExitWithGuidance);
        assert!(terminal.printed("not available"));
        assert!(terminal.printed("Check your email"));
    }

    #[test]
    fn session_store_failure_is_reported() {
        let mut terminal = FakeTerminal::new(vec![Some("medic@example.com"), Some("secret1")]);
        let provider = StubProvider::default();
        let mut store = MemoryStore {
            fail: true,
            ..MemoryStore::default()
        };

        let outcome = run(&mut terminal, &provider, &mut store, AuthMode::SignIn);

        assert_eq!(outcome, GuidedAuthOutcome::ExitWithGuidance);
        assert!(terminal.printed("AUTH_SESSION_PERSIST_FAILED"));
    }

    #[test]
    fn oauth_flow_stores_session_from_pasted_url() {
        let mut terminal = FakeTerminal::new(vec![Some(
            "http://localhost:5173/#access_token=a&refresh_token=r&expires_in=3600",
        )]);
        let provider = StubProvider {
            oauth: Ok(session("google-user")),
            ..StubProvider::default()
        };
        let mut store = MemoryStore::default();
        let browser = RecordingOpener::default();

        let outcome = run_oauth(
            &mut terminal,
            GuidedAuthDeps {
                provider: &provider,
                store: &mut store,
                redirect_base: "http://localhost:5173",
            },
            &browser,
            "google",
        )
        .expect("oauth should complete");

        assert!(
            matches!(outcome, GuidedAuthOutcome::Authenticated(ref s) if s.user_id == "google-user")
        );
        assert!(terminal.printed("provider=google"));
        assert_eq!(browser.opened.borrow().len(), 1);
    }
}
