//! Theme presets: copy, palette, and mood scale for the journal and the theater.

use std::{fmt, str::FromStr};

use owo_colors::{OwoColorize, Style};
use serde::{Deserialize, Serialize};
use shared::domain::MoodScale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Velvet,
    Noir,
    Starlight,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 3] = [ThemePreset::Velvet, ThemePreset::Noir, ThemePreset::Starlight];

    pub fn label(self) -> &'static str {
        match self {
            ThemePreset::Velvet => "velvet",
            ThemePreset::Noir => "noir",
            ThemePreset::Starlight => "starlight",
        }
    }
}

impl fmt::Display for ThemePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ThemePreset {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.label().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| {
                format!("unknown theme {raw:?}; expected one of velvet, noir, starlight")
            })
    }
}

/// Everything a screen needs to look like one preset.
#[derive(Debug, Clone, Copy)]
pub struct ScreenCopy {
    pub journal_title: &'static str,
    pub journal_subtitle: &'static str,
    pub submit_label: &'static str,
    pub saving_label: &'static str,
    pub loading_title: &'static str,
    pub loading_subtitle: &'static str,
    pub loading_hint: &'static str,
    pub failure_title: &'static str,
    pub no_video_fallback: &'static str,
    pub film_heading: &'static str,
    pub exit_label: &'static str,
}

const VELVET_COPY: ScreenCopy = ScreenCopy {
    journal_title: "Dream Journal",
    journal_subtitle:
        "Left page: your day. Right page: your dream. When you're ready, we turn it into a film.",
    submit_label: "Generate Dream Film",
    saving_label: "Saving...",
    loading_title: "Projecting your dream…",
    loading_subtitle: "Please remain seated",
    loading_hint: "(This can take a few minutes. Curtains stay closed until the film arrives.)",
    failure_title: "Projection failed.",
    no_video_fallback: "Tonight's projector refused to start. The film only exists on paper this time.",
    film_heading: "Dream Film",
    exit_label: "Back to Journal",
};

const NOIR_COPY: ScreenCopy = ScreenCopy {
    journal_title: "Night Ledger",
    journal_subtitle: "Write down the day. Then the dream. The projectionist takes it from there.",
    submit_label: "Roll Film",
    saving_label: "Filing the reel...",
    loading_title: "Developing the reel…",
    loading_subtitle: "Please remain seated",
    loading_hint: "(This can take a few minutes. The screen stays dark until the reel is ready.)",
    failure_title: "Projection failed.",
    no_video_fallback: "The reel never came back from the lab. Read the script instead.",
    film_heading: "Feature Presentation",
    exit_label: "Back to Ledger",
};

const STARLIGHT_COPY: ScreenCopy = ScreenCopy {
    journal_title: "Starlight Diary",
    journal_subtitle: "Your day on one page, your dream on the next. We will project it among the stars.",
    submit_label: "Send to the Stars",
    saving_label: "Saving...",
    loading_title: "Projecting your dream…",
    loading_subtitle: "Please remain seated",
    loading_hint: "(This can take a few minutes. Curtains stay closed until the film arrives.)",
    failure_title: "Projection failed.",
    no_video_fallback: "The stars stayed dim tonight. The film only exists on paper this time.",
    film_heading: "Dream Film",
    exit_label: "Back to Diary",
};

#[derive(Debug, Clone)]
pub struct Palette {
    pub title: Style,
    pub accent: Style,
    pub muted: Style,
    pub error: Style,
    pub curtain: Style,
}

impl Palette {
    fn velvet() -> Self {
        Self {
            title: Style::new().truecolor(247, 221, 145).bold(),
            accent: Style::new().truecolor(227, 181, 113),
            muted: Style::new().truecolor(203, 182, 234),
            error: Style::new().truecolor(255, 120, 120).bold(),
            curtain: Style::new().truecolor(140, 20, 40),
        }
    }

    fn noir() -> Self {
        Self {
            title: Style::new().white().bold(),
            accent: Style::new().bright_white(),
            muted: Style::new().bright_black(),
            error: Style::new().red().bold(),
            curtain: Style::new().bright_black(),
        }
    }

    fn starlight() -> Self {
        Self {
            title: Style::new().truecolor(246, 221, 255).bold(),
            accent: Style::new().truecolor(156, 118, 210),
            muted: Style::new().truecolor(120, 140, 200),
            error: Style::new().truecolor(255, 140, 170).bold(),
            curtain: Style::new().truecolor(30, 30, 90),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    copy: ScreenCopy,
    palette: Palette,
    mood_scale: MoodScale,
    color: bool,
}

impl Theme {
    pub fn new(preset: ThemePreset, color: bool) -> Self {
        let (copy, palette, mood_scale) = match preset {
            ThemePreset::Velvet => (VELVET_COPY, Palette::velvet(), MoodScale::Bipolar),
            ThemePreset::Noir => (NOIR_COPY, Palette::noir(), MoodScale::Bipolar),
            ThemePreset::Starlight => (STARLIGHT_COPY, Palette::starlight(), MoodScale::Likert),
        };
        Self {
            copy,
            palette,
            mood_scale,
            color,
        }
    }

    pub fn copy(&self) -> &ScreenCopy {
        &self.copy
    }

    pub fn mood_scale(&self) -> MoodScale {
        self.mood_scale
    }

    pub fn title(&self, text: &str) -> String {
        self.paint(text, &self.palette.title)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, &self.palette.accent)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(text, &self.palette.muted)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, &self.palette.error)
    }

    pub fn curtain(&self, text: &str) -> String {
        self.paint(text, &self.palette.curtain)
    }

    fn paint(&self, text: &str, style: &Style) -> String {
        if self.color {
            text.style(style.clone()).to_string()
        } else {
            text.to_string()
        }
    }
}
