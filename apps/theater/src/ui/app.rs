//! Terminal app shell: drains UI events, drives the session, redraws on change.

use std::{collections::VecDeque, io::Write};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::Session,
    router::Mode,
};
use crate::ui::{
    input::{parse_line, UserAction, HELP},
    theme::Theme,
    view,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct TheaterApp<W: Write> {
    session: Session,
    theme: Theme,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    out: W,
    /// Quit as soon as the presentation has nothing left to wait for.
    once: bool,
    input_closed: bool,
    last_frame: String,
}

impl<W: Write> TheaterApp<W> {
    pub fn new(
        session: Session,
        theme: Theme,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        out: W,
        once: bool,
    ) -> Self {
        Self {
            session,
            theme,
            cmd_tx,
            ui_rx,
            out,
            once,
            input_closed: false,
            last_frame: String::new(),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Runs until the user quits or nothing is left to wait for. The frame
    /// produced by the final event is still written.
    pub fn run(mut self) -> Result<W> {
        self.draw()?;
        while let Ok(event) = self.ui_rx.recv() {
            let flow = self.handle_event(event)?;
            self.draw()?;
            if flow == Flow::Quit {
                break;
            }
        }
        self.out.flush().context("failed to flush output")?;
        Ok(self.out)
    }

    /// Queues commands, applying the failure event of any the backend refuses.
    pub fn dispatch(&mut self, commands: impl IntoIterator<Item = BackendCommand>) {
        let mut pending: VecDeque<BackendCommand> = commands.into_iter().collect();
        while let Some(cmd) = pending.pop_front() {
            if let Some(event) = dispatch_backend_command(&self.cmd_tx, cmd) {
                pending.extend(self.session.apply(event));
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Result<Flow> {
        let mode_before = self.session.mode().clone();
        match event {
            UiEvent::Input(line) => {
                if self.handle_input(&line)? == Flow::Quit {
                    return Ok(Flow::Quit);
                }
            }
            UiEvent::InputClosed => {
                tracing::debug!("input closed");
                self.input_closed = true;
            }
            event => {
                let commands = self.session.apply(event);
                self.dispatch(commands);
            }
        }
        if self.session.mode() != &mode_before {
            tracing::debug!(
                from = mode_before.label(),
                to = self.session.mode().label(),
                "screen changed"
            );
        }
        Ok(self.next_flow())
    }

    fn handle_input(&mut self, line: &str) -> Result<Flow> {
        let action = match parse_line(line) {
            Ok(action) => action,
            Err(err) => {
                self.reject(&UiError::validation(format!("{err} (type help for commands)")))?;
                return Ok(Flow::Continue);
            }
        };

        match action {
            UserAction::Noop => {}
            UserAction::Quit => return Ok(Flow::Quit),
            UserAction::Help => self.say(HELP)?,
            UserAction::SetField { field, value } => match self.session.set_field(field, &value) {
                Ok(true) => {}
                Ok(false) => self.refuse("The draft can only be edited in the journal.")?,
                Err(err) => self.reject(&UiError::validation(err.to_string()))?,
            },
            UserAction::Submit => self.submit()?,
            UserAction::Back => {
                if !self.session.exit_presentation() {
                    self.refuse("Already at the journal.")?;
                }
            }
            UserAction::History => {
                if matches!(self.session.mode(), Mode::Presentation(_)) {
                    self.refuse("Leave the theater first (back).")?;
                } else {
                    let command = self.session.request_history();
                    self.dispatch(command);
                }
            }
            UserAction::Show(_) if matches!(self.session.mode(), Mode::Presentation(_)) => {
                self.refuse("Leave the theater first (back).")?;
            }
            UserAction::Show(entry_id) => {
                let command = self.session.present_existing(entry_id);
                self.dispatch(command);
            }
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self) -> Result<()> {
        let Some(submission) = self.session.submission() else {
            return self.refuse("Nothing to submit from the theater.");
        };
        let missing = submission.draft().missing_required();
        if !missing.is_empty() {
            let names = missing
                .iter()
                .map(|field| field.keyword())
                .collect::<Vec<_>>()
                .join(", ");
            return self.reject(&UiError::validation(format!("Please fill in: {names}")));
        }
        let command = self.session.submit();
        self.dispatch(command);
        Ok(())
    }

    fn next_flow(&self) -> Flow {
        let busy = self
            .session
            .submission()
            .is_some_and(|submission| submission.is_submitting())
            || self.session.opening().is_some()
            || (matches!(self.session.mode(), Mode::Presentation(_))
                && !self.session.render().is_settled());

        if self.once && self.session.render().is_settled() {
            return Flow::Quit;
        }
        if self.once
            && !busy
            && self
                .session
                .submission()
                .is_some_and(|submission| submission.last_error().is_some())
        {
            return Flow::Quit;
        }
        if self.input_closed && !busy {
            return Flow::Quit;
        }
        Flow::Continue
    }

    fn draw(&mut self) -> Result<()> {
        let frame = view::frame(&self.session, &self.theme);
        if frame == self.last_frame {
            return Ok(());
        }
        writeln!(self.out).context("failed to write frame")?;
        self.out
            .write_all(frame.as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")?;
        self.last_frame = frame;
        Ok(())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}").context("failed to write message")
    }

    /// Input that makes no sense on the current screen.
    fn refuse(&mut self, message: &str) -> Result<()> {
        self.reject(&UiError::from_message(UiErrorContext::General, message))
    }

    fn reject(&mut self, err: &UiError) -> Result<()> {
        tracing::debug!(context = ?err.context(), "input rejected: {}", err.message());
        let painted = self.theme.error(err.message());
        self.say(&painted)
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
