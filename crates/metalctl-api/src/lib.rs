// metalctl-api: Async Rust client for the Metal platform admin API

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::AdminClient;
pub use error::Error;
pub use session::{Session, TokenStore, UnauthorizedHook};
pub use types::{
    Broadcast, Connection, DashboardStats, Feedback, FeedbackReply, Location, Message, PageQuery,
    PageResult, Pagination, Prompt, Thought, User, UserStats, UserSummary,
};
