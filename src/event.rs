use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
}

/// Blocking reader for terminal input. Every transition in the app is a
/// reaction to one of these, so the loop only redraws when something arrives.
pub struct EventSource {
    poll_interval: Duration,
}

impl EventSource {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait for the next key press or resize. Key releases and repeats from
    /// terminals that report them are skipped.
    pub fn next(&self) -> anyhow::Result<AppEvent> {
        loop {
            if !event::poll(self.poll_interval)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(AppEvent::Key(key)),
                Event::Resize(_, _) => return Ok(AppEvent::Resize),
                _ => {}
            }
        }
    }
}
