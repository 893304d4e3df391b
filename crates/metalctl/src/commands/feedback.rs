//! Feedback triage command handlers.

use std::sync::Arc;

use tabled::Tabled;

use metalctl_api::{AdminClient, Feedback};
use metalctl_core::{FeedbackQueue, FeedbackStatus, ListController, MutationController, require_text};

use crate::cli::{FeedbackArgs, FeedbackCommand, GlobalOpts, OutputFormat, TriageStatus};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FeedbackRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Replies")]
    replies: usize,
    #[tabled(rename = "Received")]
    received: String,
}

fn feedback_row(f: &Feedback, color: bool) -> FeedbackRow {
    FeedbackRow {
        id: f.id.clone(),
        from: f.user.username.clone(),
        message: util::ellipsize(&f.message, 50),
        status: output::paint_feedback_status(FeedbackStatus::classify(&f.status), color),
        replies: f.replies.len(),
        received: output::relative_time(&f.created_at),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<AdminClient>,
    args: FeedbackArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FeedbackCommand::List { list, status } => {
            let mut query = util::query_from(&list);
            if let Some(status) = status {
                let value = match status {
                    TriageStatus::Pending => "pending",
                    TriageStatus::Resolved => "resolved",
                };
                query.set_filter("status", Some(value));
            }

            let state = util::fetch_list(Arc::clone(client), FeedbackQueue, query).await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &state.items,
                |f| feedback_row(f, color),
                |f| f.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::page_footer(&state.pagination), global.quiet);
            }
            Ok(())
        }

        FeedbackCommand::Reply { id, message } => {
            let text = require_text("message", &message).map_err(CliError::from)?;

            let ctrl = ListController::new(Arc::clone(client), FeedbackQueue);
            let mutations = MutationController::new(ctrl);
            mutations
                .submit(move |client| async move { client.reply_to_feedback(&id, &text).await })
                .await?;

            if !global.quiet {
                eprintln!("Reply sent");
            }
            Ok(())
        }

        FeedbackCommand::Resolve { id } => {
            set_status(client, id, FeedbackStatus::Resolved, global).await
        }

        FeedbackCommand::Reopen { id } => {
            set_status(client, id, FeedbackStatus::Pending, global).await
        }
    }
}

async fn set_status(
    client: &Arc<AdminClient>,
    id: String,
    status: FeedbackStatus,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let ctrl = ListController::new(Arc::clone(client), FeedbackQueue);
    let mutations = MutationController::new(ctrl);
    let wire = status.as_wire();
    mutations
        .submit(move |client| async move { client.set_feedback_status(&id, wire).await })
        .await?;

    if !global.quiet {
        eprintln!("Feedback marked {wire}");
    }
    Ok(())
}
