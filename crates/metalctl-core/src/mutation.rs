// ── Mutation controller ──
//
// Wraps a write operation (reply, status toggle, prompt edit, delete)
// with the submission protocol every admin surface follows: validate
// locally first, reject overlapping submissions, and re-fetch the
// backing list only after the server confirms success. A failed
// mutation leaves the list untouched so the operator can retry against
// the same view they acted on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use metalctl_api::AdminClient;

use crate::error::CoreError;
use crate::list::{ListController, PagedResource};

/// Drives mutations against the resource backing a [`ListController`].
pub struct MutationController<R: PagedResource> {
    list: ListController<R>,
    in_flight: Arc<AtomicBool>,
}

impl<R: PagedResource> Clone for MutationController<R> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<R: PagedResource> MutationController<R> {
    pub fn new(list: ListController<R>) -> Self {
        Self {
            list,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a submission is currently awaiting the server.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Run a write operation, then refresh the backing list on success.
    ///
    /// At most one submission runs at a time; a second call while one is
    /// in flight fails fast with [`CoreError::SubmissionInFlight`]. A
    /// refresh failure after a confirmed write does not fail the
    /// submission, it surfaces through the list state instead.
    pub async fn submit<F, Fut>(&self, op: F) -> Result<(), CoreError>
    where
        F: FnOnce(Arc<AdminClient>) -> Fut,
        Fut: Future<Output = Result<(), metalctl_api::Error>>,
    {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(CoreError::SubmissionInFlight);
        }

        let result = op(Arc::clone(self.list.client())).await;
        self.in_flight.store(false, Ordering::SeqCst);

        match result {
            Ok(()) => {
                self.list.refresh().await;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Require a non-blank text field before a submission goes out.
pub fn require_text(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation {
            message: format!("{field} must not be empty"),
        });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_accepts() {
        assert_eq!(require_text("message", "  hello  ").unwrap(), "hello");
    }

    #[test]
    fn require_text_rejects_blank() {
        let err = require_text("message", "   ").unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
        assert!(err.display_message().contains("message"));
    }
}
