use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::usecases::auth::DEFAULT_OAUTH_PROVIDER;

#[derive(Debug, Parser)]
#[command(
    name = "codebluer",
    about = "Community chat for EMS professionals, in the terminal"
)]
pub struct Cli {
    /// Path to config file (default: ./config.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Start the chat shell, signing in first when needed
    Run,
    /// Sign in with email and password
    Login,
    /// Create an account
    Signup,
    /// Request a password reset email
    ResetPassword,
    /// Sign in through a browser-based provider
    Oauth {
        #[arg(default_value = DEFAULT_OAUTH_PROVIDER)]
        provider: String,
    },
    /// Sign out and forget the saved session
    Logout,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
