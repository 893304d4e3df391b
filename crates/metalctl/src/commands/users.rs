//! User roster command handlers.

use std::sync::Arc;

use tabled::Tabled;

use metalctl_api::{AdminClient, User, UserStats};
use metalctl_core::Users;

use crate::cli::{GlobalOpts, OutputFormat, ProfileStatus, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Verified")]
    verified: String,
    #[tabled(rename = "Joined")]
    joined: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.full_name.clone(),
            username: u.username.clone(),
            status: u.status.clone(),
            verified: if u.is_verified { "yes".into() } else { String::new() },
            joined: output::relative_time(&u.created_at),
        }
    }
}

fn user_detail(u: &User) -> String {
    let mut out = format!(
        "{}  (@{})\n  id:          {}\n  email:       {}\n  phone:       {}\n  status:      {}\n  verified:    {}\n  joined:      {}\n  sparks:      {}\n  connections: {}",
        u.full_name,
        u.username,
        u.id,
        u.email,
        u.phone,
        u.status,
        u.is_verified,
        output::relative_time(&u.created_at),
        u.spark_balance,
        u.connection_count,
    );
    if let Some(ref metal) = u.metal_name {
        out.push_str(&format!("\n  metal name:  {metal}"));
    }
    if let Some(ref loc) = u.location {
        let parts: Vec<&str> = [loc.city.as_deref(), loc.state.as_deref(), loc.country.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !parts.is_empty() {
            out.push_str(&format!("\n  location:    {}", parts.join(", ")));
        }
    }
    if let Some(ref active) = u.last_active {
        out.push_str(&format!("\n  last active: {}", output::relative_time(active)));
    }
    out
}

fn stats_detail(s: &UserStats) -> String {
    format!(
        "total:      {}\ncomplete:   {}\nincomplete: {}\nnew today:  {}\nverified:   {}",
        s.total, s.complete, s.incomplete, s.new_today, s.verified,
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Arc<AdminClient>,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List { list, status, metal_type } => {
            let mut query = util::query_from(&list);
            if let Some(status) = status {
                let value = match status {
                    ProfileStatus::Complete => "complete",
                    ProfileStatus::Incomplete => "incomplete",
                };
                query.set_filter("status", Some(value));
            }
            if let Some(ref metal) = metal_type {
                query.set_filter("metalType", Some(metal));
            }

            let state = util::fetch_list(Arc::clone(client), Users, query).await?;
            let out = output::render_list(
                &global.output,
                &state.items,
                |u| UserRow::from(u),
                |u| u.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::page_footer(&state.pagination), global.quiet);
            }
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = client
                .get_user(&id)
                .await
                .map_err(|e| util::or_not_found(e, "user", &id, "users list"))?;
            let out = output::render_single(&global.output, &user, user_detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Stats => {
            let stats = client.user_stats().await?;
            let out = output::render_single(&global.output, &stats, stats_detail, |s| {
                s.total.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
