//! Command-line and environment configuration.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use portal_core::CurrentUser;

/// Create and edit service requirements from the terminal.
#[derive(Parser, Debug)]
#[command(name = "portal-form", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the portal API.
    #[arg(long, env = "PORTAL_BASE_URL", default_value = "http://127.0.0.1:3000", global = true)]
    pub base_url: String,

    /// Session token of the signed-in user.
    #[arg(long, env = "PORTAL_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Role of the signed-in user.
    #[arg(long, env = "PORTAL_ROLE", default_value = "client", global = true)]
    pub role: String,

    /// Request timeout in seconds.
    #[arg(long, env = "PORTAL_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the academic programs offered in the dropdown.
    Programs,

    /// Post a new requirement.
    Create(RequirementArgs),

    /// Edit one of your requirements.
    Edit {
        /// Id of the requirement to edit.
        id: i64,

        #[command(flatten)]
        fields: EditArgs,
    },

    /// List your requirements.
    Mine,
}

#[derive(Args, Debug, Clone)]
pub struct RequirementArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub description: String,

    /// Program id (see `programs`).
    #[arg(long)]
    pub program: String,

    /// Optional budget; leave out for none.
    #[arg(long, default_value = "")]
    pub budget: String,
}

/// Fields left out keep their current value.
#[derive(Args, Debug, Clone, Default)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub program: Option<String>,

    /// New budget; pass an empty string to clear it.
    #[arg(long)]
    pub budget: Option<String>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The session user, if a token was configured.
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|token| CurrentUser::new(self.role.as_str(), token))
    }
}
