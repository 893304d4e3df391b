//! Broadcast notification command handlers.

use std::sync::Arc;

use tabled::Tabled;

use metalctl_api::{AdminClient, Broadcast};
use metalctl_core::{BroadcastHistory, BroadcastStatus, require_text};

use crate::cli::{BroadcastArgs, BroadcastCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BroadcastRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Audience")]
    audience: String,
    #[tabled(rename = "Recipients")]
    recipients: u64,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Sent")]
    sent: String,
}

fn broadcast_row(b: &Broadcast, color: bool) -> BroadcastRow {
    BroadcastRow {
        id: b.id.clone(),
        title: util::ellipsize(&b.title, 40),
        audience: b.target_audience.clone(),
        recipients: b.recipient_count,
        status: output::paint_broadcast_status(BroadcastStatus::classify(&b.status), color),
        sent: output::relative_time(b.timestamp()),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<AdminClient>,
    args: BroadcastArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BroadcastCommand::Send {
            title,
            message,
            audience,
        } => {
            let title = require_text("title", &title).map_err(CliError::from)?;
            let message = require_text("message", &message).map_err(CliError::from)?;

            if !util::confirm(
                &format!("Send broadcast '{title}' to audience '{}'?", audience.as_wire()),
                global.yes,
            )? {
                return Ok(());
            }

            let count = client
                .send_broadcast(&title, &message, audience.as_wire())
                .await?;
            if !global.quiet {
                eprintln!("Broadcast queued for {count} recipients");
            }
            Ok(())
        }

        BroadcastCommand::History { list } => {
            let query = util::query_from(&list);
            let state = util::fetch_list(Arc::clone(client), BroadcastHistory, query).await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &state.items,
                |b| broadcast_row(b, color),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::page_footer(&state.pagination), global.quiet);
            }
            Ok(())
        }
    }
}
