//! Session state: the router plus whichever controllers the current screen mounts.
//!
//! All mutation happens on the UI loop. Backend completions arrive as
//! [`UiEvent`]s and are routed to the controller that asked for them, or dropped
//! when that controller is no longer mounted.

use shared::{
    domain::{DraftError, DraftField, DreamDraft, EntryId, MoodScale},
    protocol::DreamRecord,
};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::render::{CurtainPolicy, RenderOrchestrator};
use crate::controller::router::{Mode, ModeRouter};
use crate::controller::submission::SubmissionController;
use crate::media::VideoSurface;

pub struct Session {
    router: ModeRouter,
    submission: Option<SubmissionController>,
    render: RenderOrchestrator,
    mood_scale: MoodScale,
    history: Option<Result<Vec<DreamRecord>, UiError>>,
    history_pending: bool,
    /// Past entry being looked up before it is presented.
    opening: Option<EntryId>,
    lookup_error: Option<UiError>,
    notice: Option<String>,
    alert: Option<UiError>,
}

impl Session {
    pub fn new(
        mood_scale: MoodScale,
        policy: CurtainPolicy,
        surface: Box<dyn VideoSurface>,
        draft: Option<DreamDraft>,
    ) -> Self {
        let submission = match draft {
            Some(draft) => SubmissionController::with_draft(draft),
            None => SubmissionController::new(mood_scale),
        };
        Self {
            router: ModeRouter::new(),
            submission: Some(submission),
            render: RenderOrchestrator::new(policy, surface),
            mood_scale,
            history: None,
            history_pending: false,
            opening: None,
            lookup_error: None,
            notice: None,
            alert: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        self.router.mode()
    }

    pub fn submission(&self) -> Option<&SubmissionController> {
        self.submission.as_ref()
    }

    pub fn render(&self) -> &RenderOrchestrator {
        &self.render
    }

    pub fn current_entry(&self) -> Option<&EntryId> {
        self.router.current_id()
    }

    pub fn history(&self) -> Option<&Result<Vec<DreamRecord>, UiError>> {
        self.history.as_ref()
    }

    pub fn is_loading_history(&self) -> bool {
        self.history_pending
    }

    pub fn opening(&self) -> Option<&EntryId> {
        self.opening.as_ref()
    }

    pub fn lookup_error(&self) -> Option<&UiError> {
        self.lookup_error.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Errors not owned by either screen, such as a failed backend startup.
    pub fn alert(&self) -> Option<&UiError> {
        self.alert.as_ref()
    }

    /// Edits the mounted draft. `Ok(false)` means no draft is mounted.
    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<bool, DraftError> {
        match self.submission.as_mut() {
            Some(submission) => submission.set_field(field, raw).map(|()| true),
            None => {
                debug!(field = field.keyword(), "draft edit ignored outside entry screen");
                Ok(false)
            }
        }
    }

    pub fn submit(&mut self) -> Option<BackendCommand> {
        match self.submission.as_mut() {
            Some(submission) => {
                let command = submission.submit();
                if command.is_some() {
                    self.lookup_error = None;
                    if let Some(entry_id) = self.opening.take() {
                        debug!(entry_id = %entry_id, "lookup abandoned for a new submission");
                    }
                }
                command
            }
            None => {
                debug!("submit ignored outside entry screen");
                None
            }
        }
    }

    /// Leaves the presentation and mounts an empty draft.
    pub fn exit_presentation(&mut self) -> bool {
        let Some(entry_id) = self.router.on_exit() else {
            return false;
        };
        self.render.leave();
        self.submission = Some(SubmissionController::new(self.mood_scale));
        debug!(entry_id = %entry_id, "entry screen remounted");
        true
    }

    pub fn request_history(&mut self) -> Option<BackendCommand> {
        if self.history_pending {
            debug!("history already loading");
            return None;
        }
        self.history_pending = true;
        Some(BackendCommand::ListDreams)
    }

    /// Looks up an existing entry; it is presented once the service confirms it,
    /// skipping the create step.
    pub fn present_existing(&mut self, entry_id: EntryId) -> Option<BackendCommand> {
        if self.submission.as_ref().is_some_and(SubmissionController::is_submitting) {
            warn!(entry_id = %entry_id, "cannot open a past dream while a submission is in flight");
            return None;
        }
        if self.router.is_presenting() {
            debug!(entry_id = %entry_id, "past dream requested from the theater; ignoring");
            return None;
        }
        self.lookup_error = None;
        self.opening = Some(entry_id.clone());
        Some(BackendCommand::FetchDream { entry_id })
    }

    /// Applies one backend completion and returns the commands it triggers.
    pub fn apply(&mut self, event: UiEvent) -> Vec<BackendCommand> {
        let mut commands = Vec::new();
        match event {
            UiEvent::EntryCreated(outcome) => {
                let Some(submission) = self.submission.as_mut() else {
                    debug!("create response arrived with no draft mounted; dropping");
                    return commands;
                };
                if let Some(entry_id) = submission.apply_create_outcome(outcome) {
                    commands.extend(self.enter_presentation(entry_id));
                }
            }
            UiEvent::RenderFinished { ticket, outcome } => {
                if !self.router.is_presenting() {
                    debug!(entry_id = %ticket.entry_id, "render response arrived on entry screen; dropping");
                    return commands;
                }
                commands.extend(self.render.apply_render_outcome(ticket, outcome));
            }
            UiEvent::CurtainsElapsed(ticket) => {
                if self.router.is_presenting() {
                    self.render.curtains_elapsed(&ticket);
                }
            }
            UiEvent::DreamsListed(outcome) => {
                self.history_pending = false;
                self.history = Some(match outcome {
                    Ok(records) => {
                        info!(count = records.len(), "loaded past dreams");
                        Ok(records)
                    }
                    Err(err) => {
                        warn!(kind = err.kind(), "failed to load past dreams: {err}");
                        Err(UiError::from_service(UiErrorContext::History, &err))
                    }
                });
            }
            UiEvent::DreamFetched { entry_id, outcome } => {
                if self.opening.as_ref() != Some(&entry_id) {
                    debug!(entry_id = %entry_id, "lookup no longer wanted; dropping");
                    return commands;
                }
                self.opening = None;
                match outcome {
                    Ok(record) => {
                        info!(entry_id = %record.id, "opening past dream");
                        commands.extend(self.enter_presentation(entry_id));
                    }
                    Err(err) => {
                        warn!(entry_id = %entry_id, kind = err.kind(), "failed to open past dream: {err}");
                        self.lookup_error = Some(UiError::from_service(UiErrorContext::History, &err));
                    }
                }
            }
            UiEvent::ServiceHealth(outcome) => match outcome {
                Ok(health) => info!(status = %health.status, "generation service reachable"),
                Err(err) => {
                    warn!(kind = err.kind(), "generation service health check failed: {err}");
                    self.notice = Some(format!("Generation service unreachable: {}", err.message()));
                }
            },
            UiEvent::Error(err) => {
                warn!(
                    category = ?err.category(),
                    context = ?err.context(),
                    "{}",
                    err.message()
                );
                self.alert = Some(err);
            }
            UiEvent::Input(_) | UiEvent::InputClosed => {}
        }
        commands
    }

    fn enter_presentation(&mut self, entry_id: EntryId) -> Option<BackendCommand> {
        if !self.router.on_entry_created(entry_id.clone()) {
            return None;
        }
        self.submission = None;
        self.opening = None;
        self.lookup_error = None;
        self.history = None;
        self.notice = None;
        self.render.present(entry_id)
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
