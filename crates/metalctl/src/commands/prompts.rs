//! Onboarding prompt command handlers.

use std::sync::Arc;

use tabled::Tabled;

use metalctl_api::{AdminClient, Prompt};
use metalctl_core::{ListController, MutationController, Prompts, require_text};

use crate::cli::{GlobalOpts, PromptsArgs, PromptsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PromptRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Text")]
    text: String,
}

impl From<&Prompt> for PromptRow {
    fn from(p: &Prompt) -> Self {
        Self {
            id: p.id.clone(),
            text: p.text.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<AdminClient>,
    args: PromptsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PromptsCommand::List => {
            let state =
                util::fetch_list(Arc::clone(client), Prompts, Default::default()).await?;
            let out = output::render_list(
                &global.output,
                &state.items,
                |p| PromptRow::from(p),
                |p| p.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PromptsCommand::Add { text } => {
            let text = require_text("text", &text).map_err(CliError::from)?;
            submit(client, move |c| async move { c.create_prompt(&text).await }).await?;
            if !global.quiet {
                eprintln!("Prompt added");
            }
            Ok(())
        }

        PromptsCommand::Edit { id, text } => {
            let text = require_text("text", &text).map_err(CliError::from)?;
            submit(client, move |c| async move { c.update_prompt(&id, &text).await }).await?;
            if !global.quiet {
                eprintln!("Prompt updated");
            }
            Ok(())
        }

        PromptsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete prompt '{id}'?"), global.yes)? {
                return Ok(());
            }
            submit(client, move |c| async move { c.delete_prompt(&id).await }).await?;
            if !global.quiet {
                eprintln!("Prompt deleted");
            }
            Ok(())
        }
    }
}

async fn submit<F, Fut>(client: &Arc<AdminClient>, op: F) -> Result<(), CliError>
where
    F: FnOnce(Arc<AdminClient>) -> Fut,
    Fut: Future<Output = Result<(), metalctl_api::Error>>,
{
    let ctrl = ListController::new(Arc::clone(client), Prompts);
    let mutations = MutationController::new(ctrl);
    mutations.submit(op).await.map_err(CliError::from)
}
