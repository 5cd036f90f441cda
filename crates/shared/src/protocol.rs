use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::EntryId;

/// Normalized create payload. Unset numerics go out as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDreamRequest {
    pub mood: Option<i32>,
    pub sleep_quality: Option<i32>,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCreated {
    pub id: EntryId,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// A stored entry as echoed back by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamRecord {
    pub id: EntryId,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mood: Option<i32>,
    #[serde(default)]
    pub sleep_quality: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    pub narrative: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychoMetadata {
    #[serde(default)]
    pub day_residues: Option<Vec<String>>,
    #[serde(default)]
    pub wish_fulfillment_type: Option<String>,
    #[serde(default)]
    pub key_signifiers: Option<Vec<String>>,
    #[serde(default)]
    pub subject_position: Option<String>,
    #[serde(default)]
    pub register_feel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    pub movie_script: String,
    pub psychoanalysis: String,
    /// Passed through to the view untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_profile: Option<serde_json::Value>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dream: Option<DreamRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psycho_metadata: Option<PsychoMetadata>,
}

impl RenderResult {
    /// Video locator, treating a blank string the same as an absent one.
    pub fn video_locator(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.dream
            .as_ref()
            .and_then(|dream| dream.title.as_deref())
            .filter(|title| !title.trim().is_empty())
    }
}

/// Accepts RFC 3339 timestamps as well as the offset-less ones the service
/// emits, reading the latter as UTC. Anything else becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
            })
            .ok()
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
