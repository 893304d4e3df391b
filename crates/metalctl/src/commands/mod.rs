//! Command dispatch: bridges CLI args -> controllers -> output formatting.

pub mod auth;
pub mod broadcast;
pub mod config_cmd;
pub mod connections;
pub mod dashboard;
pub mod feedback;
pub mod prompts;
pub mod thoughts;
pub mod users;
pub mod util;

use std::sync::Arc;

use metalctl_api::AdminClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &Arc<AdminClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(client, args, global).await,
        Command::Signup(args) => auth::signup(client, args, global).await,
        Command::Logout => auth::logout(client, global),
        Command::Users(args) => users::handle(client, args, global).await,
        Command::Thoughts(args) => thoughts::handle(client, args, global).await,
        Command::Feedback(args) => feedback::handle(client, args, global).await,
        Command::Broadcast(args) => broadcast::handle(client, args, global).await,
        Command::Connections(args) => connections::handle(client, args, global).await,
        Command::Prompts(args) => prompts::handle(client, args, global).await,
        Command::Dashboard => dashboard::stats(client, global).await,
        Command::Health => dashboard::health(client, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
