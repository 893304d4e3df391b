//! Clap derive structures for the `metalctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// metalctl -- admin console for the Metal social platform
#[derive(Debug, Parser)]
#[command(
    name = "metalctl",
    version,
    about = "Administer the Metal platform from the command line",
    long_about = "Admin console for the Metal social platform.\n\n\
        Browse users, thoughts, connections, and prompts; triage feedback;\n\
        send broadcast notifications. Authenticate once with `metalctl login`;\n\
        the bearer token is persisted until logout or expiry.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API base URL, including the /api/v1 prefix
    #[arg(long, env = "METAL_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "METAL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "METAL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the bearer token
    Login(LoginArgs),

    /// Create an admin account and log in
    Signup(SignupArgs),

    /// Discard the stored bearer token
    Logout,

    /// Browse registered users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Browse posted thoughts
    #[command(alias = "th")]
    Thoughts(ThoughtsArgs),

    /// Triage user feedback
    #[command(alias = "fb")]
    Feedback(FeedbackArgs),

    /// Send and review broadcast notifications
    #[command(alias = "bc")]
    Broadcast(BroadcastArgs),

    /// Browse connections and their messages
    #[command(alias = "conn")]
    Connections(ConnectionsArgs),

    /// Manage onboarding prompts
    Prompts(PromptsArgs),

    /// Platform activity summary
    Dashboard,

    /// Check API reachability
    Health,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination and search arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Results per page
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: u32,

    /// Free-text search
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

// ── AUTH ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Admin account email
    #[arg(long, required = true)]
    pub email: String,

    /// Password (prompted interactively when omitted)
    #[arg(long, env = "METAL_PASSWORD", hide_env = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    /// Admin account email
    #[arg(long, required = true)]
    pub email: String,

    /// Full display name
    #[arg(long, required = true)]
    pub name: String,

    /// Password (prompted interactively when omitted)
    #[arg(long, env = "METAL_PASSWORD", hide_env = true)]
    pub password: Option<String>,
}

// ── USERS ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List registered users
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by profile status
        #[arg(long, value_enum)]
        status: Option<ProfileStatus>,

        /// Filter by assigned metal (e.g. "gold", "iron")
        #[arg(long = "metal-type", value_name = "METAL")]
        metal_type: Option<String>,
    },

    /// Get full user details
    Get {
        /// User ID
        id: String,
    },

    /// Roster statistics
    Stats,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProfileStatus {
    Complete,
    Incomplete,
}

// ── THOUGHTS ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ThoughtsArgs {
    #[command(subcommand)]
    pub command: ThoughtsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ThoughtsCommand {
    /// List posted thoughts
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Get a single thought
    Get {
        /// Thought ID
        id: String,
    },

    /// Delete a thought (moderation)
    Delete {
        /// Thought ID
        id: String,
    },
}

// ── FEEDBACK ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FeedbackArgs {
    #[command(subcommand)]
    pub command: FeedbackCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeedbackCommand {
    /// List feedback items
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Filter by triage status
        #[arg(long, value_enum)]
        status: Option<TriageStatus>,
    },

    /// Reply to a feedback item
    Reply {
        /// Feedback ID
        id: String,

        /// Reply text
        #[arg(long, short = 'm', required = true)]
        message: String,
    },

    /// Mark a feedback item resolved
    Resolve {
        /// Feedback ID
        id: String,
    },

    /// Reopen a resolved feedback item
    Reopen {
        /// Feedback ID
        id: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TriageStatus {
    Pending,
    Resolved,
}

// ── BROADCAST ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BroadcastArgs {
    #[command(subcommand)]
    pub command: BroadcastCommand,
}

#[derive(Debug, Subcommand)]
pub enum BroadcastCommand {
    /// Send a broadcast notification
    Send {
        /// Notification title
        #[arg(long, required = true)]
        title: String,

        /// Notification body
        #[arg(long, short = 'm', required = true)]
        message: String,

        /// Target audience
        #[arg(long, default_value = "all", value_enum)]
        audience: Audience,
    },

    /// List past broadcasts
    History {
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Audience {
    /// Every registered user
    All,
    /// Users with complete profiles
    Complete,
    /// Users with incomplete profiles
    Incomplete,
    /// Verified users only
    Verified,
    /// Unverified users only
    Unverified,
}

impl Audience {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::Verified => "verified",
            Self::Unverified => "unverified",
        }
    }
}

// ── CONNECTIONS ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConnectionsArgs {
    #[command(subcommand)]
    pub command: ConnectionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConnectionsCommand {
    /// List connections
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// View messages within a connection
    Messages {
        /// Connection ID
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },
}

// ── PROMPTS ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PromptsArgs {
    #[command(subcommand)]
    pub command: PromptsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PromptsCommand {
    /// List onboarding prompts
    #[command(alias = "ls")]
    List,

    /// Add a prompt
    Add {
        /// Prompt text
        text: String,
    },

    /// Edit a prompt's text
    Edit {
        /// Prompt ID
        id: String,

        /// New prompt text
        text: String,
    },

    /// Delete a prompt
    Delete {
        /// Prompt ID
        id: String,
    },
}

// ── CONFIG ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Config key: base_url, timeout, output, or color
        key: String,

        /// Value to set
        value: String,
    },
}

// ── COMPLETIONS ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
