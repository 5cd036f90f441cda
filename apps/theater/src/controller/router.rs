//! Top-level screen switch. The only place an [`EntryId`] lives across screens.

use shared::domain::EntryId;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Entry,
    Presentation(EntryId),
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Entry => "entry",
            Mode::Presentation(_) => "presentation",
        }
    }
}

#[derive(Debug, Default)]
pub struct ModeRouter {
    mode: Mode,
}

impl ModeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_presenting(&self) -> bool {
        matches!(self.mode, Mode::Presentation(_))
    }

    pub fn current_id(&self) -> Option<&EntryId> {
        match &self.mode {
            Mode::Entry => None,
            Mode::Presentation(entry_id) => Some(entry_id),
        }
    }

    /// Switches to the presentation screen for `entry_id`. Returns `false` and
    /// leaves the current presentation alone when one is already showing.
    pub fn on_entry_created(&mut self, entry_id: EntryId) -> bool {
        if let Mode::Presentation(current) = &self.mode {
            warn!(
                current = %current,
                ignored = %entry_id,
                "entry created while already presenting; ignoring"
            );
            return false;
        }
        info!(entry_id = %entry_id, "switching to presentation");
        self.mode = Mode::Presentation(entry_id);
        true
    }

    /// Returns to the entry screen, handing back the identifier being dropped.
    pub fn on_exit(&mut self) -> Option<EntryId> {
        match std::mem::take(&mut self.mode) {
            Mode::Presentation(entry_id) => {
                info!(entry_id = %entry_id, "leaving presentation");
                Some(entry_id)
            }
            Mode::Entry => None,
        }
    }
}
