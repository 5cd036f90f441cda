//! UI/backend events and error modeling for the theater controller.

use shared::{
    domain::EntryId,
    error::ServiceError,
    protocol::{DreamRecord, EntryCreated, HealthResponse, RenderResult},
};

use crate::controller::render::RenderTicket;

pub enum UiEvent {
    /// One raw line typed by the user.
    Input(String),
    InputClosed,
    EntryCreated(Result<EntryCreated, ServiceError>),
    RenderFinished {
        ticket: RenderTicket,
        outcome: Result<RenderResult, ServiceError>,
    },
    CurtainsElapsed(RenderTicket),
    DreamsListed(Result<Vec<DreamRecord>, ServiceError>),
    DreamFetched {
        entry_id: EntryId,
        outcome: Result<DreamRecord, ServiceError>,
    },
    ServiceHealth(Result<HealthResponse, ServiceError>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// The service answered and refused.
    Request,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Validation,
    Submission,
    Render,
    History,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_service(context: UiErrorContext, err: &ServiceError) -> Self {
        let category = match err {
            ServiceError::RequestFailed { .. } => UiErrorCategory::Request,
            ServiceError::TransportFailed { .. } => UiErrorCategory::Transport,
        };
        let message = if err.message().trim().is_empty() {
            generic_message(context).to_string()
        } else {
            err.message().to_string()
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context: UiErrorContext::Validation,
            message: message.into(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("connection")
            || lower.contains("timed out")
            || lower.contains("unreachable")
            || lower.contains("disconnected")
            || lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else if lower.contains("invalid") || lower.contains("missing") {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn generic_message(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::Submission => "Failed to save dream.",
        UiErrorContext::Render => "Failed to render dream.",
        UiErrorContext::History => "Failed to load past dreams.",
        UiErrorContext::BackendStartup => "Backend worker failed to start.",
        UiErrorContext::Validation | UiErrorContext::General => "Something went wrong.",
    }
}
