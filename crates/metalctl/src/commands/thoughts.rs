//! Thought moderation command handlers.

use std::sync::Arc;

use tabled::Tabled;

use metalctl_api::{AdminClient, Thought};
use metalctl_core::{ListController, MutationController, Thoughts};

use crate::cli::{GlobalOpts, OutputFormat, ThoughtsArgs, ThoughtsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ThoughtRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Content")]
    content: String,
    #[tabled(rename = "Reactions")]
    reactions: u32,
    #[tabled(rename = "Posted")]
    posted: String,
}

impl From<&Thought> for ThoughtRow {
    fn from(t: &Thought) -> Self {
        Self {
            id: t.id.clone(),
            author: t.user.username.clone(),
            content: util::ellipsize(&t.content, 60),
            reactions: t.reaction_count,
            posted: output::relative_time(&t.created_at),
        }
    }
}

fn thought_detail(t: &Thought) -> String {
    format!(
        "thought {}\n  author:    {} (@{})\n  posted:    {}\n  reactions: {}\n  audience:  {}\n\n{}",
        t.id,
        t.user.full_name,
        t.user.username,
        output::relative_time(&t.created_at),
        t.reaction_count,
        if t.connection_only { "connections only" } else { "everyone" },
        t.content,
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<AdminClient>,
    args: ThoughtsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ThoughtsCommand::List { list } => {
            let query = util::query_from(&list);
            let state = util::fetch_list(Arc::clone(client), Thoughts, query).await?;
            let out = output::render_list(
                &global.output,
                &state.items,
                |t| ThoughtRow::from(t),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::page_footer(&state.pagination), global.quiet);
            }
            Ok(())
        }

        ThoughtsCommand::Get { id } => {
            let thought = client
                .get_thought(&id)
                .await
                .map_err(|e| util::or_not_found(e, "thought", &id, "thoughts list"))?;
            let out =
                output::render_single(&global.output, &thought, thought_detail, |t| t.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ThoughtsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete thought '{id}'? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }

            let ctrl = ListController::new(Arc::clone(client), Thoughts);
            let mutations = MutationController::new(ctrl);
            mutations
                .submit(move |client| async move { client.delete_thought(&id).await })
                .await?;

            if !global.quiet {
                eprintln!("Thought deleted");
            }
            Ok(())
        }
    }
}
