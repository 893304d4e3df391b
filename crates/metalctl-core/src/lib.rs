//! Reactive controllers for Metal admin surfaces.
//!
//! This crate sits between [`metalctl_api`] and any frontend (the CLI
//! today). [`ListController`] owns pagination, filtering, and debounced
//! search for one resource and broadcasts snapshots over a watch
//! channel; [`MutationController`] runs writes with an in-flight guard
//! and refreshes the list on success. Status strings from the server
//! are classified into the closed [`BroadcastStatus`] and
//! [`FeedbackStatus`] sets before display.

pub mod error;
pub mod list;
pub mod mutation;
pub mod status;

pub use error::CoreError;
pub use list::{
    BroadcastHistory, ConnectionMessages, Connections, FeedbackQueue, ListController, ListState,
    PagedResource, Prompts, SEARCH_DEBOUNCE, Thoughts, Users,
};
pub use mutation::{MutationController, require_text};
pub use status::{BroadcastStatus, FeedbackStatus};
