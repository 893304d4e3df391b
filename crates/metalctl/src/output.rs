//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! JSON uses serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use metalctl_core::{BroadcastStatus, FeedbackStatus};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a broadcast status with delivery-state coloring.
pub fn paint_broadcast_status(status: BroadcastStatus, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status {
        BroadcastStatus::Completed => status.to_string().green().to_string(),
        BroadcastStatus::Failed => status.to_string().red().to_string(),
        BroadcastStatus::Sending => status.to_string().yellow().to_string(),
        BroadcastStatus::Pending => status.to_string().dimmed().to_string(),
    }
}

/// Render a feedback status with triage coloring.
pub fn paint_feedback_status(status: FeedbackStatus, color: bool) -> String {
    if !color {
        return status.to_string();
    }
    match status {
        FeedbackStatus::Resolved => status.to_string().green().to_string(),
        FeedbackStatus::Pending => status.to_string().yellow().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json`: serializes the original data via serde
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` returning a pre-formatted
/// string, since single-item detail views don't use the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Pagination footer for table output ("page 2 of 7, 134 total").
pub fn page_footer(p: &metalctl_api::Pagination) -> String {
    if p.total_pages <= 1 {
        return String::new();
    }
    format!("page {} of {}, {} total", p.page, p.total_pages, p.total)
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}

// ── Time formatting ──────────────────────────────────────────────────

/// Human-readable relative time for an RFC 3339 timestamp.
///
/// Falls back to the raw string when parsing fails, so malformed server
/// timestamps still render something.
pub fn relative_time(raw: &str) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
        return raw.to_owned();
    };
    let delta = Utc::now().signed_duration_since(parsed.with_timezone(&Utc));

    let minutes = delta.num_minutes();
    if minutes < 1 {
        "just now".into()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", delta.num_hours())
    } else if minutes < 60 * 24 * 30 {
        format!("{}d ago", delta.num_days())
    } else {
        parsed.format("%Y-%m-%d").to_string()
    }
}
