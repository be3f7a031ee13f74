use std::path::Path;

use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    domain::{auth_form::AuthMode, session::AuthSession},
    infra::{
        contracts::SessionStore, os::SystemOpener, session_store::FileSessionStore,
        storage_layout::StorageLayout,
    },
    ui,
    usecases::{
        bootstrap::{self, compose_shell},
        context::AppContext,
        guided_auth::{
            run_guided_auth, run_oauth, GuidedAuthDeps, GuidedAuthOutcome, RetryPolicy,
            StdTerminal,
        },
        logout::{logout, LogoutOutcome},
        startup::{acquire_session_lock, plan_startup, StartupFlowState, StartupPlan},
    },
};

const AUTH_TUI_BOOTSTRAP_FAILED: &str = "AUTH_TUI_BOOTSTRAP_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command_or_default() {
        Command::Run => run_shell(config_path),
        Command::Login => authenticate(config_path, AuthMode::SignIn),
        Command::Signup => authenticate(config_path, AuthMode::SignUp),
        Command::ResetPassword => authenticate(config_path, AuthMode::ResetPassword),
        Command::Oauth { provider } => authenticate_in_browser(config_path, &provider),
        Command::Logout => sign_out(config_path),
    }
}

fn run_shell(config_path: Option<&Path>) -> Result<()> {
    let context = bootstrap::bootstrap(config_path)?;
    let mut store = FileSessionStore::new(context.layout.session_file());
    let StartupPlan {
        lock_guard: _lock_guard,
        state,
    } = plan_startup(context.layout.clone(), &*context.backend, &mut store)?;

    match state {
        StartupFlowState::LaunchTui(session) => launch_shell(&context, &session),
        StartupFlowState::GuidedAuth { reason } => {
            tracing::info!(code = reason.code(), "starting guided sign-in");
            println!("{}", reason.user_message());

            let outcome = run_guided_auth(
                &mut StdTerminal,
                GuidedAuthDeps {
                    provider: &*context.backend,
                    store: &mut store,
                    redirect_base: &context.config.backend.redirect_url,
                },
                AuthMode::SignIn,
                &RetryPolicy::default(),
            )?;

            if let GuidedAuthOutcome::Authenticated(session) = outcome {
                if let Err(error) = launch_shell(&context, &session) {
                    report_post_auth_tui_bootstrap_failure(&error);
                }
            }
            Ok(())
        }
    }
}

fn launch_shell(context: &AppContext, session: &AuthSession) -> Result<()> {
    let mut shell = compose_shell(context, session)?;
    ui::shell::start(
        context,
        shell.event_source.as_mut(),
        shell.orchestrator.as_mut(),
    )
}

fn authenticate(config_path: Option<&Path>, mode: AuthMode) -> Result<()> {
    let context = bootstrap::bootstrap(config_path)?;
    context.layout.ensure_dirs()?;
    let _lock_guard = acquire_session_lock(context.layout.session_lock_file())?;
    let mut store = FileSessionStore::new(context.layout.session_file());

    let outcome = run_guided_auth(
        &mut StdTerminal,
        GuidedAuthDeps {
            provider: &*context.backend,
            store: &mut store,
            redirect_base: &context.config.backend.redirect_url,
        },
        mode,
        &RetryPolicy::default(),
    )?;
    report_auth_outcome(&outcome);
    Ok(())
}

fn authenticate_in_browser(config_path: Option<&Path>, provider: &str) -> Result<()> {
    let context = bootstrap::bootstrap(config_path)?;
    context.layout.ensure_dirs()?;
    let _lock_guard = acquire_session_lock(context.layout.session_lock_file())?;
    let mut store = FileSessionStore::new(context.layout.session_file());

    let outcome = run_oauth(
        &mut StdTerminal,
        GuidedAuthDeps {
            provider: &*context.backend,
            store: &mut store,
            redirect_base: &context.config.backend.redirect_url,
        },
        &SystemOpener,
        provider,
    )?;
    report_auth_outcome(&outcome);
    Ok(())
}

fn report_auth_outcome(outcome: &GuidedAuthOutcome) {
    if let GuidedAuthOutcome::Authenticated(session) = outcome {
        tracing::info!(user_id = %session.user_id, "signed in from the command line");
        println!("Run `codebluer` to open the chat.");
    }
}

fn sign_out(config_path: Option<&Path>) -> Result<()> {
    let outcome = match bootstrap::bootstrap(config_path) {
        Ok(context) => {
            context.layout.ensure_dirs()?;
            let _lock_guard = acquire_session_lock(context.layout.session_lock_file())?;
            let mut store = FileSessionStore::new(context.layout.session_file());
            logout(&*context.backend, &mut store)?
        }
        Err(error) => {
            tracing::warn!(
                error = ?error,
                "logout fallback: bootstrap failed, removing the local session only"
            );
            forget_local_session()?
        }
    };

    tracing::info!(
        session_removed = outcome.session_removed,
        remote_signed_out = outcome.remote_signed_out,
        "logout completed"
    );
    for line in logout_summary_lines(&outcome) {
        println!("{line}");
    }
    Ok(())
}

fn forget_local_session() -> Result<LogoutOutcome> {
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let _lock_guard = acquire_session_lock(layout.session_lock_file())?;
    let session_removed = FileSessionStore::new(layout.session_file()).clear()?;

    Ok(LogoutOutcome {
        session_removed,
        remote_signed_out: false,
    })
}

fn logout_summary_lines(outcome: &LogoutOutcome) -> Vec<&'static str> {
    match (outcome.session_removed, outcome.remote_signed_out) {
        (false, _) => vec!["No saved session found. Nothing to sign out."],
        (true, true) => vec!["Signed out. The saved session was removed."],
        (true, false) => vec![
            "Signed out locally. The saved session was removed.",
            "The server could not be reached to revoke it.",
        ],
    }
}

fn report_post_auth_tui_bootstrap_failure(error: &anyhow::Error) {
    tracing::error!(
        code = AUTH_TUI_BOOTSTRAP_FAILED,
        error = ?error,
        "post-auth TUI bootstrap failed after successful session persist"
    );

    for line in post_auth_tui_fallback_lines(AUTH_TUI_BOOTSTRAP_FAILED) {
        eprintln!("{line}");
    }
}

fn post_auth_tui_fallback_lines(error_code: &str) -> [String; 3] {
    [
        "Authentication successful. Session is saved.".to_owned(),
        format!("{error_code}: the chat failed to start in this run."),
        "Please restart codebluer to open the chat with the saved session.".to_owned(),
    ]
}
