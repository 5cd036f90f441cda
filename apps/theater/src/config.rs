use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::controller::render::CurtainPolicy;
use crate::ui::theme::ThemePreset;

pub const DEFAULT_CONFIG_FILE: &str = "dream_theater.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurtainMode {
    #[default]
    Video,
    Delay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub theme: ThemePreset,
    pub curtain_mode: CurtainMode,
    pub curtain_delay_ms: u64,
    pub player_command: Option<String>,
    pub log_filter: String,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            // Renders regularly take minutes.
            request_timeout_secs: 600,
            theme: ThemePreset::default(),
            curtain_mode: CurtainMode::default(),
            curtain_delay_ms: 1500,
            player_command: None,
            log_filter: "info".into(),
            color: true,
        }
    }
}

impl Settings {
    pub fn curtain_policy(&self) -> CurtainPolicy {
        match self.curtain_mode {
            CurtainMode::Video => CurtainPolicy::WhenVideoReady,
            CurtainMode::Delay => {
                CurtainPolicy::AfterDelay(Duration::from_millis(self.curtain_delay_ms))
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    theme: Option<ThemePreset>,
    curtain_policy: Option<CurtainMode>,
    curtain_delay_ms: Option<u64>,
    player_command: Option<String>,
    log_filter: Option<String>,
    color: Option<bool>,
}

/// Defaults, then the TOML file, then environment overrides.
///
/// An explicitly requested file must exist; the default file is optional.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound && explicit_path.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileConfig = toml::from_str(raw)?;

    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.theme {
        settings.theme = v;
    }
    if let Some(v) = file_cfg.curtain_policy {
        settings.curtain_mode = v;
    }
    if let Some(v) = file_cfg.curtain_delay_ms {
        settings.curtain_delay_ms = v;
    }
    if let Some(v) = file_cfg.player_command {
        settings.player_command = Some(v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.color {
        settings.color = v;
    }
    Ok(())
}

pub fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("DREAM_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("DREAM_THEATER__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("DREAM_THEATER__THEME") {
        settings.theme = match v.parse() {
            Ok(theme) => theme,
            Err(err) => bail!("DREAM_THEATER__THEME: {err}"),
        };
    }

    if let Some(v) = lookup("DREAM_THEATER__CURTAIN_DELAY_MS") {
        settings.curtain_delay_ms = v
            .trim()
            .parse()
            .with_context(|| format!("DREAM_THEATER__CURTAIN_DELAY_MS: not a number: '{v}'"))?;
        settings.curtain_mode = CurtainMode::Delay;
    }

    if let Some(v) = lookup("DREAM_THEATER__PLAYER") {
        settings.player_command = Some(v).filter(|cmd| !cmd.trim().is_empty());
    }

    if let Some(v) = lookup("DREAM_THEATER__LOG") {
        settings.log_filter = v;
    }

    if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        settings.color = false;
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
