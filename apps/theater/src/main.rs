use std::{io, path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::DreamServiceClient;
use crossbeam_channel::bounded;
use shared::domain::{DraftField, DreamDraft};
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod config;
mod controller;
mod media;
mod ui;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

use backend_bridge::commands::BackendCommand;
use controller::{events::UiEvent, reducer::Session};
use media::ExternalPlayerSurface;
use ui::{theme::Theme, TheaterApp};

#[derive(Parser, Debug)]
#[command(name = "dream-theater", about = "Write down a dream and watch it projected as a film")]
struct Args {
    /// TOML settings file (defaults to ./dream_theater.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// velvet, noir or starlight.
    #[arg(long)]
    theme: Option<String>,
    /// Open the curtains this long after the film arrives, video or not.
    #[arg(long)]
    curtain_delay_ms: Option<u64>,
    /// External player used for immersive playback, e.g. "mpv --fs".
    #[arg(long)]
    player: Option<String>,
    #[arg(long)]
    no_color: bool,

    #[arg(long, allow_hyphen_values = true)]
    mood: Option<String>,
    #[arg(long)]
    sleep: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    narrative: Option<String>,
    #[arg(long)]
    note: Option<String>,
    #[arg(long)]
    mbti: Option<String>,
    #[arg(long)]
    spotify: Option<String>,
    #[arg(long)]
    letterboxd: Option<String>,
    #[arg(long)]
    goodreads: Option<String>,
    #[arg(long)]
    listening: Option<String>,
    #[arg(long)]
    watching: Option<String>,
    #[arg(long)]
    reading: Option<String>,

    /// Submit the prefilled draft right away.
    #[arg(long)]
    submit: bool,
    /// Exit once the presentation has settled.
    #[arg(long)]
    once: bool,
}

impl Args {
    fn draft_fields(&self) -> [(DraftField, Option<&String>); 12] {
        [
            (DraftField::Mood, self.mood.as_ref()),
            (DraftField::SleepQuality, self.sleep.as_ref()),
            (DraftField::Title, self.title.as_ref()),
            (DraftField::Narrative, self.narrative.as_ref()),
            (DraftField::ContextNote, self.note.as_ref()),
            (DraftField::Mbti, self.mbti.as_ref()),
            (DraftField::SpotifyUrl, self.spotify.as_ref()),
            (DraftField::LetterboxdUrl, self.letterboxd.as_ref()),
            (DraftField::GoodreadsUrl, self.goodreads.as_ref()),
            (DraftField::ListeningTo, self.listening.as_ref()),
            (DraftField::Watching, self.watching.as_ref()),
            (DraftField::Reading, self.reading.as_ref()),
        ]
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(v) = &args.server_url {
        settings.server_url = v.clone();
    }
    if let Some(v) = &args.theme {
        settings.theme = v.parse().map_err(|err: String| anyhow!(err))?;
    }
    if let Some(v) = args.curtain_delay_ms {
        settings.curtain_delay_ms = v;
        settings.curtain_mode = config::CurtainMode::Delay;
    }
    if let Some(v) = &args.player {
        settings.player_command = Some(v.clone());
    }
    if args.no_color {
        settings.color = false;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    tracing::info!(
        server_url = %settings.server_url,
        theme = %settings.theme,
        curtains = ?settings.curtain_policy(),
        "starting dream theater"
    );

    let theme = Theme::new(settings.theme, settings.color);
    let mut draft = DreamDraft::new(theme.mood_scale());
    for (field, value) in args.draft_fields() {
        if let Some(value) = value {
            draft
                .set_field(field, value)
                .with_context(|| format!("invalid --{} value", field.keyword()))?;
        }
    }

    let service = DreamServiceClient::with_timeout(&settings.server_url, settings.request_timeout())
        .context("failed to build generation service client")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let backend = backend_bridge::runtime::launch(cmd_rx, ui_tx.clone(), Arc::new(service))
        .context("failed to spawn backend worker")?;
    let scripted = if args.submit {
        vec!["submit".to_string()]
    } else {
        Vec::new()
    };
    ui::input::spawn_stdin_reader(scripted, ui_tx).context("failed to spawn input reader")?;

    let surface = ExternalPlayerSurface::new(settings.player_command.as_deref());
    let session = Session::new(
        theme.mood_scale(),
        settings.curtain_policy(),
        Box::new(surface),
        Some(draft),
    );
    let mut app = TheaterApp::new(session, theme, cmd_tx, ui_rx, io::stdout(), args.once);
    app.dispatch(Some(BackendCommand::CheckHealth));
    app.run()?;

    if backend.join().is_err() {
        tracing::warn!("backend worker panicked");
    }
    Ok(())
}
