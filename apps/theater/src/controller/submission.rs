//! Draft ownership and the single create request per user action.

use shared::{
    domain::{DraftError, DraftField, DreamDraft, EntryId, MoodScale},
    error::ServiceError,
    protocol::EntryCreated,
};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

#[derive(Debug)]
pub struct SubmissionController {
    draft: DreamDraft,
    submitting: bool,
    last_error: Option<UiError>,
    last_entry_id: Option<EntryId>,
}

impl SubmissionController {
    pub fn new(mood_scale: MoodScale) -> Self {
        Self::with_draft(DreamDraft::new(mood_scale))
    }

    pub fn with_draft(draft: DreamDraft) -> Self {
        Self {
            draft,
            submitting: false,
            last_error: None,
            last_entry_id: None,
        }
    }

    pub fn draft(&self) -> &DreamDraft {
        &self.draft
    }

    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<(), DraftError> {
        self.draft.set_field(field, raw)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn last_entry_id(&self) -> Option<&EntryId> {
        self.last_entry_id.as_ref()
    }

    /// Starts a submission, or returns `None` while one is still outstanding.
    ///
    /// The previous error is cleared before the new outcome is known.
    pub fn submit(&mut self) -> Option<BackendCommand> {
        if self.submitting {
            warn!("submit ignored: a submission is already in flight");
            return None;
        }
        self.submitting = true;
        self.last_error = None;
        let request = self.draft.to_request();
        debug!(
            mood = ?request.mood,
            sleep_quality = ?request.sleep_quality,
            narrative_len = request.narrative.len(),
            "submitting dream draft"
        );
        Some(BackendCommand::CreateDream { request })
    }

    /// Applies the create response. Returns the new identifier on success so the
    /// caller can hand it to the router.
    pub fn apply_create_outcome(
        &mut self,
        outcome: Result<EntryCreated, ServiceError>,
    ) -> Option<EntryId> {
        if !self.submitting {
            debug!("discarding create response with no submission in flight");
            return None;
        }
        self.submitting = false;

        match outcome {
            Ok(created) => {
                info!(entry_id = %created.id, "dream saved");
                self.last_error = None;
                self.last_entry_id = Some(created.id.clone());
                Some(created.id)
            }
            Err(err) => {
                warn!(
                    kind = err.kind(),
                    status = ?err.status(),
                    "failed to save dream: {err}"
                );
                self.last_error = Some(UiError::from_service(UiErrorContext::Submission, &err));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/submission_tests.rs"]
mod tests;
