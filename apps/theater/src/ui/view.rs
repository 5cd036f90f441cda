//! Plain-text rendering of the entry and presentation screens.
//!
//! Both screens are pure functions of the [`Session`] and the [`Theme`]; the app
//! loop decides when to write a frame.

use std::io::{self, Write};

use shared::{
    domain::{DraftField, DreamDraft, MoodScale},
    protocol::{DreamRecord, RenderResult},
};

use crate::controller::events::UiError;
use crate::controller::reducer::Session;
use crate::controller::render::{CurtainPolicy, PresentationState, RenderPhase};
use crate::controller::router::Mode;
use crate::ui::theme::Theme;

const RULE: &str = "────────────────────────────────────────────────────────";
const CURTAIN: &str = "▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒";
const HISTORY_PREVIEW_CHARS: usize = 48;

pub fn render(out: &mut impl Write, session: &Session, theme: &Theme) -> io::Result<()> {
    match session.mode() {
        Mode::Entry => render_entry(out, session, theme),
        Mode::Presentation(_) => render_presentation(out, session, theme),
    }
}

/// Renders into a string so the caller can skip identical frames.
pub fn frame(session: &Session, theme: &Theme) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = render(&mut buf, session, theme);
    String::from_utf8_lossy(&buf).into_owned()
}

fn render_entry(out: &mut impl Write, session: &Session, theme: &Theme) -> io::Result<()> {
    let copy = theme.copy();
    writeln!(out, "{}", theme.title(copy.journal_title))?;
    writeln!(out, "{}", theme.muted(copy.journal_subtitle))?;
    writeln!(out, "{}", theme.muted(RULE))?;

    if let Some(notice) = session.notice() {
        writeln!(out, "{}", theme.accent(notice))?;
    }

    let Some(submission) = session.submission() else {
        return Ok(());
    };
    draft_summary(out, theme, submission.draft())?;
    writeln!(out, "{}", theme.muted(RULE))?;

    if submission.is_submitting() {
        writeln!(out, "{}", theme.accent(copy.saving_label))?;
    } else {
        writeln!(
            out,
            "{} {}",
            theme.accent(&format!("[submit] {}", copy.submit_label)),
            theme.muted("· help for commands")
        )?;
    }
    if let Some(entry_id) = submission.last_entry_id() {
        writeln!(
            out,
            "{}",
            theme.muted(&format!(
                "Saved entry ID: {entry_id} - next, we'll project it as a film."
            ))
        )?;
    }
    if let Some(entry_id) = session.opening() {
        writeln!(out, "{}", theme.muted(&format!("Opening dream {entry_id}...")))?;
    }
    if let Some((heading, err)) = entry_error(session) {
        error_panel(out, theme, heading, err)?;
    }

    if session.is_loading_history() {
        writeln!(out, "{}", theme.muted("Loading past dreams..."))?;
    }
    if let Some(Ok(records)) = session.history() {
        history_listing(out, theme, records)?;
    }
    Ok(())
}

/// The journal shows one error at a time: the latest save attempt first.
fn entry_error(session: &Session) -> Option<(&'static str, &UiError)> {
    let save = session
        .submission()
        .and_then(|submission| submission.last_error())
        .map(|err| ("Could not save your dream.", err));
    save.or_else(|| {
        session
            .lookup_error()
            .map(|err| ("Could not open that dream.", err))
    })
    .or_else(|| session.alert().map(|err| ("Something went wrong.", err)))
    .or_else(|| match session.history() {
        Some(Err(err)) => Some(("Could not load past dreams.", err)),
        _ => None,
    })
}

fn draft_summary(out: &mut impl Write, theme: &Theme, draft: &DreamDraft) -> io::Result<()> {
    writeln!(out, "{}", theme.title("Today's Atmosphere"))?;
    let mood = draft.mood().map(|value| value.to_string()).unwrap_or_default();
    let sleep = draft
        .sleep_quality()
        .map(|value| value.to_string())
        .unwrap_or_default();
    field_line(out, theme, &mood_label(draft.mood_scale()), &mood)?;
    field_line(out, theme, "Sleep quality (1 to 5)", &sleep)?;
    for field in DraftField::ALL {
        if field.is_numeric() || matches!(field, DraftField::Title | DraftField::Narrative) {
            continue;
        }
        field_line(out, theme, field_label(field), text_value(draft, field))?;
    }

    writeln!(out)?;
    writeln!(out, "{}", theme.title("Dream Entry"))?;
    field_line(out, theme, "Title", &draft.title)?;
    field_line(out, theme, "Dream narrative", &draft.narrative)?;
    Ok(())
}

fn field_line(out: &mut impl Write, theme: &Theme, label: &str, value: &str) -> io::Result<()> {
    let shown = if value.is_empty() {
        theme.muted("-")
    } else {
        value.to_string()
    };
    writeln!(out, "  {:<24} {}", theme.accent(label), shown)
}

fn mood_label(scale: MoodScale) -> String {
    let bounds = scale.bounds();
    match scale {
        MoodScale::Bipolar => format!("Mood ({} to {:+})", bounds.start(), bounds.end()),
        MoodScale::Likert => format!("Mood ({} to {})", bounds.start(), bounds.end()),
    }
}

fn field_label(field: DraftField) -> &'static str {
    match field {
        DraftField::Mood => "Mood",
        DraftField::SleepQuality => "Sleep quality",
        DraftField::Mbti => "MBTI",
        DraftField::SpotifyUrl => "Spotify link",
        DraftField::LetterboxdUrl => "Letterboxd link",
        DraftField::GoodreadsUrl => "Goodreads link",
        DraftField::ListeningTo => "Listening to",
        DraftField::Watching => "Watching",
        DraftField::Reading => "Reading",
        DraftField::ContextNote => "Context note",
        DraftField::Title => "Title",
        DraftField::Narrative => "Dream narrative",
    }
}

fn text_value(draft: &DreamDraft, field: DraftField) -> &str {
    match field {
        DraftField::Mbti => &draft.mbti,
        DraftField::SpotifyUrl => &draft.spotify_url,
        DraftField::LetterboxdUrl => &draft.letterboxd_url,
        DraftField::GoodreadsUrl => &draft.goodreads_url,
        DraftField::ListeningTo => &draft.listening_to,
        DraftField::Watching => &draft.watching,
        DraftField::Reading => &draft.reading,
        DraftField::ContextNote => &draft.context_note,
        DraftField::Title => &draft.title,
        DraftField::Narrative => &draft.narrative,
        DraftField::Mood | DraftField::SleepQuality => "",
    }
}

fn history_listing(out: &mut impl Write, theme: &Theme, records: &[DreamRecord]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", theme.title("Past dreams"))?;
    if records.is_empty() {
        return writeln!(out, "  {}", theme.muted("No dreams recorded yet."));
    }
    for record in records {
        let when = record
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let label = match record.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => preview(&record.narrative),
        };
        writeln!(
            out,
            "  {} {:<16} {}",
            theme.accent(record.id.as_str()),
            theme.muted(&when),
            label
        )?;
    }
    writeln!(out, "  {}", theme.muted("show <id> to project a past dream"))
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= HISTORY_PREVIEW_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(HISTORY_PREVIEW_CHARS).collect();
    format!("{cut}…")
}

fn render_presentation(out: &mut impl Write, session: &Session, theme: &Theme) -> io::Result<()> {
    let copy = theme.copy();
    let render = session.render();
    let state = render.state();

    if let Some(entry_id) = session.current_entry() {
        writeln!(out, "{}", theme.muted(&format!("Entry {entry_id}")))?;
    }

    // A projection failure owns the error panel on this screen.
    if let (Some(alert), false) = (session.alert(), state.phase() == RenderPhase::Failed) {
        error_panel(out, theme, "Something went wrong.", alert)?;
    }

    match state.phase() {
        RenderPhase::Idle => {}
        RenderPhase::Loading => {
            curtain(out, theme)?;
            writeln!(out, "{}", theme.title(copy.loading_title))?;
            writeln!(out, "{}", theme.accent(copy.loading_subtitle))?;
            writeln!(out, "{}", theme.muted(copy.loading_hint))?;
            curtain(out, theme)?;
        }
        RenderPhase::Failed => {
            if let Some(err) = state.error() {
                error_panel(out, theme, copy.failure_title, err)?;
            }
        }
        RenderPhase::Succeeded => {
            if let Some(result) = state.result() {
                if state.curtains_open() || reveals_while_closed(render.policy(), state) {
                    film(out, theme, result, render.surface().loaded())?;
                } else {
                    curtain(out, theme)?;
                    writeln!(out, "{}", theme.muted(copy.loading_subtitle))?;
                    curtain(out, theme)?;
                }
            }
        }
    }

    writeln!(out, "{}", theme.muted(RULE))?;
    writeln!(out, "{}", theme.accent(&format!("[back] {}", copy.exit_label)))
}

/// With the video-gated policy a result without video never opens the curtains,
/// so the fallback and program notes show in front of them.
fn reveals_while_closed(policy: CurtainPolicy, state: &PresentationState) -> bool {
    matches!(policy, CurtainPolicy::WhenVideoReady)
        && state
            .result()
            .is_some_and(|result| result.video_locator().is_none())
}

/// The screen shows whatever the video surface holds; it is only loaded once
/// the curtains open.
fn film(
    out: &mut impl Write,
    theme: &Theme,
    result: &RenderResult,
    on_screen: Option<&str>,
) -> io::Result<()> {
    let copy = theme.copy();
    match (on_screen, result.video_locator()) {
        (Some(url), _) => writeln!(out, "{} {}", theme.accent("▶ Now showing:"), url)?,
        (None, Some(_)) => curtain(out, theme)?,
        (None, None) => writeln!(out, "{}", theme.muted(copy.no_video_fallback))?,
    }
    writeln!(out, "{}", theme.muted(RULE))?;

    writeln!(out, "{}", theme.title(copy.film_heading))?;
    if let Some(title) = result.title() {
        writeln!(out, "{}", theme.accent(title))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", result.movie_script.trim())?;
    if !result.psychoanalysis.trim().is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", theme.title("Interpretation"))?;
        writeln!(out, "{}", result.psychoanalysis.trim())?;
    }
    Ok(())
}

fn curtain(out: &mut impl Write, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}", theme.curtain(CURTAIN))
}

fn error_panel(out: &mut impl Write, theme: &Theme, heading: &str, err: &UiError) -> io::Result<()> {
    writeln!(out, "{}", theme.error(heading))?;
    writeln!(out, "  {}", err.message())
}

#[cfg(test)]
#[path = "../tests/view_tests.rs"]
mod tests;
