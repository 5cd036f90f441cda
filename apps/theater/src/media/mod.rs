//! Video playback surface owned by the presentation screen.

use std::process::{Child, Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;

pub trait VideoSurface {
    /// Points the surface at a video. Replaces whatever was loaded.
    fn load(&mut self, url: &str);
    /// Asks for fullscreen/immersive playback of the loaded video.
    fn request_immersive(&mut self) -> Result<()>;
    fn clear(&mut self);
    fn loaded(&self) -> Option<&str>;
}

/// Hands the video to an external player (e.g. `mpv --fs`) when immersive
/// playback is requested.
pub struct ExternalPlayerSurface {
    player: Option<Vec<String>>,
    loaded: Option<String>,
    child: Option<Child>,
}

impl ExternalPlayerSurface {
    pub fn new(player_command: Option<&str>) -> Self {
        let player = player_command
            .map(|raw| raw.split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .filter(|parts| !parts.is_empty());
        Self {
            player,
            loaded: None,
            child: None,
        }
    }

    fn stop_player(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                debug!("video player already gone: {err}");
            }
            let _ = child.wait();
        }
    }
}

impl VideoSurface for ExternalPlayerSurface {
    fn load(&mut self, url: &str) {
        self.stop_player();
        self.loaded = Some(url.to_string());
    }

    fn request_immersive(&mut self) -> Result<()> {
        let url = self
            .loaded
            .clone()
            .ok_or_else(|| anyhow!("no video loaded"))?;
        let Some((program, args)) = self.player.as_ref().and_then(|parts| parts.split_first())
        else {
            bail!("no video player configured");
        };

        let child = Command::new(program)
            .args(args)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to launch video player '{program}'"))?;
        debug!(player = %program, pid = child.id(), "video player launched");
        self.child = Some(child);
        Ok(())
    }

    fn clear(&mut self) {
        self.stop_player();
        self.loaded = None;
    }

    fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

impl Drop for ExternalPlayerSurface {
    fn drop(&mut self) {
        self.stop_player();
    }
}
