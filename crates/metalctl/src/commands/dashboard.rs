//! Dashboard and health command handlers.

use std::sync::Arc;

use metalctl_api::{AdminClient, DashboardStats};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn stats_detail(s: &DashboardStats) -> String {
    format!(
        "active users:        {}\ntoday's thoughts:    {}\ntoday's signups:     {}\ntoday's connections: {}",
        s.total_active_users, s.todays_thoughts, s.todays_users, s.todays_connections,
    )
}

pub async fn stats(client: &Arc<AdminClient>, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = client.dashboard_stats().await?;
    let out = output::render_single(&global.output, &stats, stats_detail, |s| {
        s.total_active_users.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn health(client: &Arc<AdminClient>, global: &GlobalOpts) -> Result<(), CliError> {
    client.health_check().await?;
    if !global.quiet {
        eprintln!("API reachable at {}", client.base_url());
    }
    Ok(())
}
