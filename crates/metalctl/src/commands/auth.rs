//! Login, signup, and logout handlers.

use std::sync::Arc;

use metalctl_api::AdminClient;

use crate::cli::{GlobalOpts, LoginArgs, SignupArgs};
use crate::error::CliError;

use super::util;

pub async fn login(
    client: &Arc<AdminClient>,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::password_or_prompt(args.password)?;
    client.login(&args.email, &password).await?;
    if !global.quiet {
        eprintln!("Logged in as {}", args.email);
    }
    Ok(())
}

pub async fn signup(
    client: &Arc<AdminClient>,
    args: SignupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::password_or_prompt(args.password)?;
    client.signup(&args.email, &password, &args.name).await?;
    if !global.quiet {
        eprintln!("Account created, logged in as {}", args.email);
    }
    Ok(())
}

pub fn logout(client: &Arc<AdminClient>, global: &GlobalOpts) -> Result<(), CliError> {
    client.logout();
    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}
