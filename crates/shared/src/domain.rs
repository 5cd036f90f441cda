use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::CreateDreamRequest;

/// Opaque identifier handed out by the generation service for a stored entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Range the mood slider accepts. Screen variants disagree on the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodScale {
    /// -3 (awful) through +3 (elated).
    #[default]
    Bipolar,
    /// 1 through 5.
    Likert,
}

impl MoodScale {
    pub fn bounds(self) -> RangeInclusive<i32> {
        match self {
            MoodScale::Bipolar => -3..=3,
            MoodScale::Likert => 1..=5,
        }
    }
}

pub const SLEEP_QUALITY_BOUNDS: RangeInclusive<i32> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Mood,
    SleepQuality,
    ContextNote,
    Mbti,
    SpotifyUrl,
    LetterboxdUrl,
    GoodreadsUrl,
    ListeningTo,
    Watching,
    Reading,
    Title,
    Narrative,
}

impl DraftField {
    pub const ALL: [DraftField; 12] = [
        DraftField::Mood,
        DraftField::SleepQuality,
        DraftField::ContextNote,
        DraftField::Mbti,
        DraftField::SpotifyUrl,
        DraftField::LetterboxdUrl,
        DraftField::GoodreadsUrl,
        DraftField::ListeningTo,
        DraftField::Watching,
        DraftField::Reading,
        DraftField::Title,
        DraftField::Narrative,
    ];

    /// Short name used by the line-oriented input.
    pub fn keyword(self) -> &'static str {
        match self {
            DraftField::Mood => "mood",
            DraftField::SleepQuality => "sleep",
            DraftField::ContextNote => "note",
            DraftField::Mbti => "mbti",
            DraftField::SpotifyUrl => "spotify",
            DraftField::LetterboxdUrl => "letterboxd",
            DraftField::GoodreadsUrl => "goodreads",
            DraftField::ListeningTo => "listening",
            DraftField::Watching => "watching",
            DraftField::Reading => "reading",
            DraftField::Title => "title",
            DraftField::Narrative => "narrative",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DraftField::Mood | DraftField::SleepQuality)
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let field = match lower.as_str() {
            "sleep_quality" => DraftField::SleepQuality,
            "context_note" | "context" => DraftField::ContextNote,
            "spotify_url" => DraftField::SpotifyUrl,
            "letterboxd_url" => DraftField::LetterboxdUrl,
            "goodreads_url" => DraftField::GoodreadsUrl,
            "listening_to" => DraftField::ListeningTo,
            other => DraftField::ALL
                .into_iter()
                .find(|field| field.keyword() == other)
                .ok_or_else(|| DraftError::UnknownField(s.trim().to_string()))?,
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("{field} must be a whole number, got '{raw}'")]
    NotANumber { field: &'static str, raw: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
}

/// In-progress entry held by the submission controller while the entry view is mounted.
///
/// Numeric fields can only be changed through [`DreamDraft::set_field`], so they are
/// either unset or inside their bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DreamDraft {
    mood_scale: MoodScale,
    mood: Option<i32>,
    sleep_quality: Option<i32>,
    pub context_note: String,
    pub mbti: String,
    pub spotify_url: String,
    pub letterboxd_url: String,
    pub goodreads_url: String,
    pub listening_to: String,
    pub watching: String,
    pub reading: String,
    pub title: String,
    pub narrative: String,
}

impl DreamDraft {
    pub fn new(mood_scale: MoodScale) -> Self {
        Self {
            mood_scale,
            ..Self::default()
        }
    }

    pub fn mood_scale(&self) -> MoodScale {
        self.mood_scale
    }

    pub fn mood(&self) -> Option<i32> {
        self.mood
    }

    pub fn sleep_quality(&self) -> Option<i32> {
        self.sleep_quality
    }

    /// Applies raw widget input to a field. Empty numeric input unsets the field;
    /// text input is stored exactly as entered.
    pub fn set_field(&mut self, field: DraftField, raw: &str) -> Result<(), DraftError> {
        match field {
            DraftField::Mood => {
                self.mood = parse_bounded("mood", raw, self.mood_scale.bounds())?;
            }
            DraftField::SleepQuality => {
                self.sleep_quality = parse_bounded("sleep_quality", raw, SLEEP_QUALITY_BOUNDS)?;
            }
            DraftField::ContextNote => self.context_note = raw.to_string(),
            DraftField::Mbti => self.mbti = raw.to_string(),
            DraftField::SpotifyUrl => self.spotify_url = raw.to_string(),
            DraftField::LetterboxdUrl => self.letterboxd_url = raw.to_string(),
            DraftField::GoodreadsUrl => self.goodreads_url = raw.to_string(),
            DraftField::ListeningTo => self.listening_to = raw.to_string(),
            DraftField::Watching => self.watching = raw.to_string(),
            DraftField::Reading => self.reading = raw.to_string(),
            DraftField::Title => self.title = raw.to_string(),
            DraftField::Narrative => self.narrative = raw.to_string(),
        }
        Ok(())
    }

    /// Fields a submission needs but that are still blank.
    pub fn missing_required(&self) -> Vec<DraftField> {
        let mut missing = Vec::new();
        if self.narrative.trim().is_empty() {
            missing.push(DraftField::Narrative);
        }
        missing
    }

    /// Snapshot of the draft in the shape the create endpoint expects.
    pub fn to_request(&self) -> CreateDreamRequest {
        CreateDreamRequest {
            mood: self.mood,
            sleep_quality: self.sleep_quality,
            context_note: self.context_note.clone(),
            mbti: self.mbti.clone(),
            spotify_url: self.spotify_url.clone(),
            letterboxd_url: self.letterboxd_url.clone(),
            goodreads_url: self.goodreads_url.clone(),
            listening_to: self.listening_to.clone(),
            watching: self.watching.clone(),
            reading: self.reading.clone(),
            title: self.title.clone(),
            narrative: self.narrative.clone(),
        }
    }
}

fn parse_bounded(
    field: &'static str,
    raw: &str,
    bounds: RangeInclusive<i32>,
) -> Result<Option<i32>, DraftError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed
        .parse::<i32>()
        .map_err(|_| DraftError::NotANumber {
            field,
            raw: raw.to_string(),
        })?;
    if !bounds.contains(&value) {
        return Err(DraftError::OutOfRange {
            field,
            value,
            min: *bounds.start(),
            max: *bounds.end(),
        });
    }
    Ok(Some(value))
}
