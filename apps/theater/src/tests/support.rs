//! Shared fixtures for controller and UI tests.

use std::{cell::RefCell, rc::Rc};

use anyhow::{bail, Result};
use shared::{
    domain::EntryId,
    protocol::{DreamRecord, EntryCreated, RenderResult},
};

use crate::media::VideoSurface;

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub loaded: Option<String>,
    pub loads: Vec<String>,
    pub immersive_requests: usize,
    pub clears: usize,
}

/// Surface that records every call and can be told to refuse immersive playback.
pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
    refuse_immersive: bool,
    loaded: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> (Self, Rc<RefCell<SurfaceLog>>) {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        (
            Self {
                log: Rc::clone(&log),
                refuse_immersive: false,
                loaded: None,
            },
            log,
        )
    }

    pub fn refusing() -> (Self, Rc<RefCell<SurfaceLog>>) {
        let (mut surface, log) = Self::new();
        surface.refuse_immersive = true;
        (surface, log)
    }
}

impl VideoSurface for RecordingSurface {
    fn load(&mut self, url: &str) {
        self.loaded = Some(url.to_string());
        let mut log = self.log.borrow_mut();
        log.loaded = Some(url.to_string());
        log.loads.push(url.to_string());
    }

    fn request_immersive(&mut self) -> Result<()> {
        self.log.borrow_mut().immersive_requests += 1;
        if self.refuse_immersive {
            bail!("fullscreen denied");
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.loaded = None;
        let mut log = self.log.borrow_mut();
        log.loaded = None;
        log.clears += 1;
    }

    fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

pub fn render_result(video_url: Option<&str>) -> RenderResult {
    RenderResult {
        movie_script: "FADE IN: a theater made of clouds.".into(),
        psychoanalysis: "You are waiting to be seen.".into(),
        style_profile: None,
        video_url: video_url.map(str::to_string),
        dream: None,
        psycho_metadata: None,
    }
}

pub fn entry_created(id: &str) -> EntryCreated {
    EntryCreated {
        id: EntryId::new(id),
        created_at: None,
    }
}

pub fn dream_record(id: &str) -> DreamRecord {
    DreamRecord {
        id: EntryId::new(id),
        created_at: None,
        mood: None,
        sleep_quality: None,
        title: Some("Moon wedding".into()),
        narrative: "I was late to my own wedding on the moon".into(),
    }
}
