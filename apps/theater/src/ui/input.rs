//! Line-oriented user input.

use std::{
    io::{self, BufRead},
    thread::{self, JoinHandle},
};

use crossbeam_channel::Sender;
use shared::domain::{DraftError, DraftField, EntryId};

use crate::controller::events::UiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SetField { field: DraftField, value: String },
    Submit,
    Back,
    History,
    Show(EntryId),
    Help,
    Quit,
    Noop,
}

pub const HELP: &str = "\
commands:
  mood <n> | sleep <n>           numeric fields, empty value clears
  title <text> | narrative <text>
  note | mbti | spotify | letterboxd | goodreads | listening | watching | reading <text>
  submit                         save the entry and project it
  back                           leave the theater
  history                        list past dreams
  show <id>                      project a past dream
  help | quit";

/// Parses one input line. Field values keep their inner spacing untouched.
pub fn parse_line(line: &str) -> Result<UserAction, DraftError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(UserAction::Noop);
    }
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed.trim_end(), ""),
    };

    let action = match word.to_ascii_lowercase().as_str() {
        "submit" => UserAction::Submit,
        "back" | "exit" => UserAction::Back,
        "history" | "ls" => UserAction::History,
        "help" | "?" => UserAction::Help,
        "quit" | "q" => UserAction::Quit,
        "show" => match rest.trim() {
            "" => UserAction::Help,
            id => UserAction::Show(EntryId::new(id)),
        },
        _ => UserAction::SetField {
            field: word.parse()?,
            value: rest.to_string(),
        },
    };
    Ok(action)
}

/// Forwards stdin lines to the UI loop until stdin closes or the loop goes away.
/// `scripted` lines (such as a startup `submit`) are queued ahead of anything typed.
pub fn spawn_stdin_reader(
    scripted: Vec<String>,
    ui_tx: Sender<UiEvent>,
) -> io::Result<JoinHandle<()>> {
    spawn_reader(io::BufReader::new(io::stdin()), scripted, ui_tx)
}

pub fn spawn_reader<R>(
    reader: R,
    scripted: Vec<String>,
    ui_tx: Sender<UiEvent>,
) -> io::Result<JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in scripted {
                if ui_tx.send(UiEvent::Input(line)).is_err() {
                    return;
                }
            }
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        tracing::warn!("stdin read failed: {err}");
                        break;
                    }
                };
                if ui_tx.send(UiEvent::Input(line)).is_err() {
                    return;
                }
            }
            let _ = ui_tx.send(UiEvent::InputClosed);
        })
}
