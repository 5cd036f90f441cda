//! Render request lifecycle and the curtain reveal for the presentation screen.
//!
//! Every render request is tagged with a [`RenderTicket`]. Only a response whose
//! ticket matches the active one may touch [`PresentationState`]; anything else
//! belongs to an abandoned identity and is dropped.

use std::time::Duration;

use shared::{domain::EntryId, error::ServiceError, protocol::RenderResult};
use tracing::{debug, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};
use crate::media::VideoSurface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    pub entry_id: EntryId,
    generation: u64,
}

impl RenderTicket {
    pub(crate) fn new(entry_id: EntryId, generation: u64) -> Self {
        Self {
            entry_id,
            generation,
        }
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// When the curtains open once a render succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurtainPolicy {
    /// Open as soon as the result arrives, but only if it carries a video.
    #[default]
    WhenVideoReady,
    /// Open unconditionally after a fixed pause.
    AfterDelay(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationState {
    loading: bool,
    curtains_open: bool,
    error: Option<UiError>,
    result: Option<RenderResult>,
}

impl PresentationState {
    fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> RenderPhase {
        if self.loading {
            RenderPhase::Loading
        } else if self.error.is_some() {
            RenderPhase::Failed
        } else if self.result.is_some() {
            RenderPhase::Succeeded
        } else {
            RenderPhase::Idle
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn curtains_open(&self) -> bool {
        self.curtains_open
    }

    pub fn error(&self) -> Option<&UiError> {
        self.error.as_ref()
    }

    pub fn result(&self) -> Option<&RenderResult> {
        self.result.as_ref()
    }
}

pub struct RenderOrchestrator {
    policy: CurtainPolicy,
    surface: Box<dyn VideoSurface>,
    generation: u64,
    active: Option<RenderTicket>,
    state: PresentationState,
    awaiting_curtains: bool,
}

impl RenderOrchestrator {
    pub fn new(policy: CurtainPolicy, surface: Box<dyn VideoSurface>) -> Self {
        Self {
            policy,
            surface,
            generation: 0,
            active: None,
            state: PresentationState::default(),
            awaiting_curtains: false,
        }
    }

    pub fn policy(&self) -> CurtainPolicy {
        self.policy
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn surface(&self) -> &dyn VideoSurface {
        self.surface.as_ref()
    }

    #[cfg(test)]
    pub fn active_ticket(&self) -> Option<&RenderTicket> {
        self.active.as_ref()
    }

    /// Nothing left to wait for on the current identity.
    pub fn is_settled(&self) -> bool {
        self.active.is_some() && !self.state.loading && !self.awaiting_curtains
    }

    /// Starts presenting `entry_id`. A different identity resets the state and
    /// yields the render command; the identity already on screen is left as is.
    pub fn present(&mut self, entry_id: EntryId) -> Option<BackendCommand> {
        if let Some(active) = &self.active {
            if active.entry_id == entry_id {
                debug!(entry_id = %entry_id, "already presenting entry; reusing current render");
                return None;
            }
            info!(
                abandoned = %active.entry_id,
                entry_id = %entry_id,
                "switching presentation to a new entry"
            );
        }

        self.generation += 1;
        let ticket = RenderTicket::new(entry_id, self.generation);
        self.state = PresentationState::loading();
        self.awaiting_curtains = false;
        self.surface.clear();
        self.active = Some(ticket.clone());
        info!(
            entry_id = %ticket.entry_id,
            generation = ticket.generation,
            "requesting render"
        );
        Some(BackendCommand::RenderDream { ticket })
    }

    /// Applies a render response. Responses for anything but the active ticket
    /// are discarded without touching state.
    pub fn apply_render_outcome(
        &mut self,
        ticket: RenderTicket,
        outcome: Result<RenderResult, ServiceError>,
    ) -> Option<BackendCommand> {
        if !self.is_active(&ticket) || !self.state.loading {
            debug!(
                entry_id = %ticket.entry_id,
                generation = ticket.generation,
                "discarding stale render response"
            );
            return None;
        }
        self.state.loading = false;

        match outcome {
            Ok(result) => {
                let has_video = result.video_locator().is_some();
                info!(entry_id = %ticket.entry_id, has_video, "render succeeded");
                self.state.result = Some(result);
                match self.policy {
                    CurtainPolicy::WhenVideoReady => {
                        if has_video {
                            self.open_curtains();
                        }
                        None
                    }
                    CurtainPolicy::AfterDelay(delay) => {
                        self.awaiting_curtains = true;
                        Some(BackendCommand::StartCurtainTimer { ticket, delay })
                    }
                }
            }
            Err(err) => {
                warn!(
                    entry_id = %ticket.entry_id,
                    kind = err.kind(),
                    status = ?err.status(),
                    "render failed: {err}"
                );
                self.state.error = Some(UiError::from_service(UiErrorContext::Render, &err));
                None
            }
        }
    }

    /// Curtain timer for `ticket` ran out.
    pub fn curtains_elapsed(&mut self, ticket: &RenderTicket) {
        if !self.is_active(ticket) || !self.awaiting_curtains {
            debug!(entry_id = %ticket.entry_id, "discarding stale curtain timer");
            return;
        }
        self.awaiting_curtains = false;
        self.open_curtains();
    }

    /// Abandons the active identity. Late responses for it will be dropped.
    pub fn leave(&mut self) {
        if let Some(ticket) = self.active.take() {
            debug!(
                entry_id = %ticket.entry_id,
                still_loading = self.state.loading,
                "presentation torn down"
            );
        }
        self.state = PresentationState::default();
        self.awaiting_curtains = false;
        self.surface.clear();
    }

    fn is_active(&self, ticket: &RenderTicket) -> bool {
        self.active.as_ref() == Some(ticket)
    }

    fn open_curtains(&mut self) {
        if self.state.curtains_open {
            return;
        }
        self.state.curtains_open = true;

        let video_url = self
            .state
            .result
            .as_ref()
            .and_then(RenderResult::video_locator)
            .map(str::to_string);
        let Some(video_url) = video_url else {
            return;
        };

        self.surface.load(&video_url);
        // Best effort: playback still works inline if this fails.
        if let Err(err) = self.surface.request_immersive() {
            warn!("immersive playback request failed: {err:#}");
        }
    }
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
