//! Connection browsing command handlers.

use std::sync::Arc;

use tabled::Tabled;

use metalctl_api::{AdminClient, Connection, Message};
use metalctl_core::{ConnectionMessages, Connections};

use crate::cli::{ConnectionsArgs, ConnectionsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Pair")]
    pair: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Last message")]
    last_message: String,
}

impl From<&Connection> for ConnectionRow {
    fn from(c: &Connection) -> Self {
        Self {
            id: c.id.clone(),
            pair: format!("@{} + @{}", c.user1.username, c.user2.username),
            status: c.status.clone(),
            connected: output::relative_time(&c.connected_on),
            last_message: c
                .last_message
                .as_deref()
                .map(|m| util::ellipsize(m, 40))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "Sender")]
    sender: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Sent")]
    sent: String,
}

impl From<&Message> for MessageRow {
    fn from(m: &Message) -> Self {
        Self {
            sender: m.sender.username.clone(),
            message: util::ellipsize(&m.message, 70),
            sent: output::relative_time(&m.created_at),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<AdminClient>,
    args: ConnectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConnectionsCommand::List { list } => {
            let query = util::query_from(&list);
            let state = util::fetch_list(Arc::clone(client), Connections, query).await?;
            let out = output::render_list(
                &global.output,
                &state.items,
                |c| ConnectionRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::page_footer(&state.pagination), global.quiet);
            }
            Ok(())
        }

        ConnectionsCommand::Messages { id, list } => {
            let query = util::query_from(&list);
            let resource = ConnectionMessages {
                connection_id: id.clone(),
            };
            let state = util::fetch_list(Arc::clone(client), resource, query).await?;
            let out = output::render_list(
                &global.output,
                &state.items,
                |m| MessageRow::from(m),
                |m| m.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::page_footer(&state.pagination), global.quiet);
            }
            Ok(())
        }
    }
}
