// ── Status classification ──
//
// Server status strings are free-form; these mappings are the closed set
// of states the admin surfaces understand. Unrecognized values degrade to
// `Pending` with a warning so a new backend status never crashes a view,
// only renders conservatively until the mapping is extended.

use strum::{Display, EnumString};

/// Delivery state of a broadcast push campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BroadcastStatus {
    Completed,
    Sending,
    Failed,
    Pending,
}

impl BroadcastStatus {
    /// Map a raw server status string onto the closed broadcast set.
    ///
    /// `"sent"` is the legacy wire spelling of [`Self::Completed`].
    pub fn classify(raw: &str) -> Self {
        match raw {
            "sent" | "completed" => Self::Completed,
            "sending" => Self::Sending,
            "failed" => Self::Failed,
            "pending" => Self::Pending,
            other => {
                tracing::warn!(status = other, "unmapped broadcast status, treating as pending");
                Self::Pending
            }
        }
    }

    /// Whether delivery finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Triage state of a feedback item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FeedbackStatus {
    Pending,
    Resolved,
}

impl FeedbackStatus {
    /// Map a raw server status string onto the closed feedback set.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "resolved" => Self::Resolved,
            other => {
                tracing::warn!(status = other, "unmapped feedback status, treating as pending");
                Self::Pending
            }
        }
    }

    /// The status to toggle to from the current one.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Resolved,
            Self::Resolved => Self::Pending,
        }
    }

    /// Wire value for status-update requests.
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_sent_maps_to_completed() {
        assert_eq!(BroadcastStatus::classify("sent"), BroadcastStatus::Completed);
        assert_eq!(BroadcastStatus::classify("completed"), BroadcastStatus::Completed);
    }

    #[test]
    fn broadcast_known_states_map_directly() {
        assert_eq!(BroadcastStatus::classify("sending"), BroadcastStatus::Sending);
        assert_eq!(BroadcastStatus::classify("failed"), BroadcastStatus::Failed);
        assert_eq!(BroadcastStatus::classify("pending"), BroadcastStatus::Pending);
    }

    #[test]
    fn broadcast_unknown_degrades_to_pending() {
        assert_eq!(BroadcastStatus::classify("queued"), BroadcastStatus::Pending);
        assert_eq!(BroadcastStatus::classify(""), BroadcastStatus::Pending);
    }

    #[test]
    fn feedback_unknown_degrades_to_pending() {
        assert_eq!(FeedbackStatus::classify("resolved"), FeedbackStatus::Resolved);
        assert_eq!(FeedbackStatus::classify("escalated"), FeedbackStatus::Pending);
    }

    #[test]
    fn feedback_toggle_flips_both_ways() {
        assert_eq!(FeedbackStatus::Pending.toggled(), FeedbackStatus::Resolved);
        assert_eq!(FeedbackStatus::Resolved.toggled(), FeedbackStatus::Pending);
    }

    #[test]
    fn terminal_states() {
        assert!(BroadcastStatus::Completed.is_terminal());
        assert!(BroadcastStatus::Failed.is_terminal());
        assert!(!BroadcastStatus::Sending.is_terminal());
        assert!(!BroadcastStatus::Pending.is_terminal());
    }
}
