//! Shared helpers for command handlers.

use std::sync::Arc;

use metalctl_api::{AdminClient, PageQuery};
use metalctl_core::{ListController, ListState, PagedResource};

use crate::cli::ListArgs;
use crate::error::CliError;

/// Translate CLI pagination flags into a page query.
pub fn query_from(list: &ListArgs) -> PageQuery {
    let mut query = PageQuery::new(list.limit);
    query.page = list.page.max(1);
    query.search = list.search.clone().filter(|s| !s.is_empty());
    query
}

/// Run one fetch through a list controller and hand back the snapshot.
///
/// The controller records fetch failures in its state rather than
/// returning them; for a one-shot CLI invocation that state error is
/// the command's error.
pub async fn fetch_list<R: PagedResource>(
    client: Arc<AdminClient>,
    resource: R,
    query: PageQuery,
) -> Result<ListState<R::Item>, CliError> {
    let ctrl = ListController::with_query(client, resource, query);
    ctrl.refresh().await;
    let state = ctrl.snapshot();
    if state.has_error() {
        return Err(CliError::Api { message: state.error });
    }
    Ok(state)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Take a password from the flag or prompt for it interactively.
pub fn password_or_prompt(flag: Option<String>) -> Result<String, CliError> {
    if let Some(password) = flag {
        return Ok(password);
    }
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(password)
}

/// Map an API 404 onto a resource-specific not-found error.
pub fn or_not_found(
    err: metalctl_api::Error,
    resource: &str,
    identifier: &str,
    list_command: &str,
) -> CliError {
    if err.is_not_found() {
        CliError::not_found(resource, identifier, list_command)
    } else {
        err.into()
    }
}

/// Truncate long free text for table cells.
pub fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}\u{2026}")
}
