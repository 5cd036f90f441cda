//! Backend commands queued from the UI loop to the backend worker.

use std::time::Duration;

use shared::{domain::EntryId, error::ServiceError, protocol::CreateDreamRequest};

use crate::controller::events::UiEvent;
use crate::controller::render::RenderTicket;

#[derive(Debug)]
pub enum BackendCommand {
    CreateDream { request: CreateDreamRequest },
    RenderDream { ticket: RenderTicket },
    StartCurtainTimer { ticket: RenderTicket, delay: Duration },
    ListDreams,
    FetchDream { entry_id: EntryId },
    CheckHealth,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::CreateDream { .. } => "create_dream",
            BackendCommand::RenderDream { .. } => "render_dream",
            BackendCommand::StartCurtainTimer { .. } => "start_curtain_timer",
            BackendCommand::ListDreams => "list_dreams",
            BackendCommand::FetchDream { .. } => "fetch_dream",
            BackendCommand::CheckHealth => "check_health",
        }
    }

    /// The completion the UI should see when this command could not be queued,
    /// so no controller is left waiting on it.
    pub fn into_undelivered_event(self, reason: &str) -> Option<UiEvent> {
        let failure = || ServiceError::transport(reason);
        match self {
            BackendCommand::CreateDream { .. } => Some(UiEvent::EntryCreated(Err(failure()))),
            BackendCommand::RenderDream { ticket } => Some(UiEvent::RenderFinished {
                ticket,
                outcome: Err(failure()),
            }),
            BackendCommand::StartCurtainTimer { ticket, .. } => {
                Some(UiEvent::CurtainsElapsed(ticket))
            }
            BackendCommand::ListDreams => Some(UiEvent::DreamsListed(Err(failure()))),
            BackendCommand::FetchDream { entry_id } => Some(UiEvent::DreamFetched {
                entry_id,
                outcome: Err(failure()),
            }),
            BackendCommand::CheckHealth => None,
        }
    }
}
