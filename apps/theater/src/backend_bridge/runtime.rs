//! Runtime bridge between the UI command queue and backend event intake.
//!
//! Commands are drained on a dedicated thread that owns a tokio runtime. Each
//! command runs as its own task, so a render that takes minutes never holds up
//! later commands; results come back to the UI loop as [`UiEvent`]s.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::GenerationService;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn GenerationService>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("dream-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )));
                    tracing::error!("failed to build backend runtime: {err}");
                    return;
                }
            };
            tracing::debug!("backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                let service = Arc::clone(&service);
                let ui_tx = ui_tx.clone();
                runtime.spawn(async move {
                    let name = cmd.name();
                    if let Some(event) = execute(service.as_ref(), cmd).await {
                        deliver(&ui_tx, event, name).await;
                    }
                });
            }

            tracing::debug!("command queue closed; backend worker stopping");
            runtime.shutdown_background();
        })
}

/// Posts a completion to the UI loop. A full queue is waited out on the
/// blocking pool so runtime workers stay free for other commands.
async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent, name: &'static str) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(command = name, "ui loop gone; dropping result");
            return;
        }
        Err(TrySendError::Full(event)) => event,
    };
    tracing::debug!(command = name, "ui queue full; waiting for room");
    let ui_tx = ui_tx.clone();
    let delivered = tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
    if !matches!(delivered, Ok(true)) {
        tracing::debug!(command = name, "ui loop gone; dropping result");
    }
}

/// Runs one command to completion and returns the event reporting it.
pub async fn execute(service: &dyn GenerationService, cmd: BackendCommand) -> Option<UiEvent> {
    match cmd {
        BackendCommand::CreateDream { request } => {
            Some(UiEvent::EntryCreated(service.create_dream(&request).await))
        }
        BackendCommand::RenderDream { ticket } => {
            let outcome = service.render_dream(&ticket.entry_id).await;
            Some(UiEvent::RenderFinished { ticket, outcome })
        }
        BackendCommand::StartCurtainTimer { ticket, delay } => {
            tokio::time::sleep(delay).await;
            Some(UiEvent::CurtainsElapsed(ticket))
        }
        BackendCommand::ListDreams => Some(UiEvent::DreamsListed(service.list_dreams().await)),
        BackendCommand::FetchDream { entry_id } => {
            let outcome = service.fetch_dream(&entry_id).await;
            Some(UiEvent::DreamFetched { entry_id, outcome })
        }
        BackendCommand::CheckHealth => Some(UiEvent::ServiceHealth(service.health().await)),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
