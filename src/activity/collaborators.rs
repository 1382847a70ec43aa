//! Interfaces to the systems around an activity: analytics and narration.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use serde::Serialize;

use super::difficulty::DifficultyRating;

/// Drop-off style analytics record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub activity_id: String,
    pub difficulty: DifficultyRating,
    pub label: String,
    pub elapsed_seconds: u32,
}

pub trait AnalyticsSink: Send + Sync {
    fn track(&mut self, event: AnalyticsEvent);

    fn track_mistakes(&mut self, activity_id: &str, difficulty: DifficultyRating, mistakes: u32) {
        info!(target: "analytics", activity = activity_id, %difficulty, mistakes, "mistakes");
    }
}

/// Writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAnalytics;

impl AnalyticsSink for LogAnalytics {
    fn track(&mut self, event: AnalyticsEvent) {
        info!(
            target: "analytics",
            "{} [{}] {} @{}s",
            event.activity_id, event.difficulty, event.label, event.elapsed_seconds
        );
    }
}

/// Keeps events in memory. Clones share the same storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryAnalytics {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
    mistakes: Arc<Mutex<Vec<u32>>>,
}

impl MemoryAnalytics {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.label).collect()
    }

    pub fn mistakes(&self) -> Vec<u32> {
        self.mistakes.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl AnalyticsSink for MemoryAnalytics {
    fn track(&mut self, event: AnalyticsEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn track_mistakes(&mut self, _activity_id: &str, _difficulty: DifficultyRating, mistakes: u32) {
        if let Ok(mut m) = self.mistakes.lock() {
            m.push(mistakes);
        }
    }
}

/// One JSON object per line.
#[derive(Debug)]
pub struct JsonLinesAnalytics<W> {
    writer: W,
}

impl<W: Write + Send + Sync> JsonLinesAnalytics<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesAnalytics<File> {
    /// Opens `path` for appending, creating it if missing. Earlier sessions' lines are kept.
    pub fn append_to(path: &Path) -> io::Result<Self> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(Self::new)
    }
}

impl<W: Write + Send + Sync> AnalyticsSink for JsonLinesAnalytics<W> {
    fn track(&mut self, event: AnalyticsEvent) {
        let line = match serde_json::to_string(&event) {
            Ok(line) => line,
            Err(e) => {
                warn!(target: "analytics", "failed to encode event {:?}: {e}", event.label);
                return;
            }
        };
        if let Err(e) = writeln!(self.writer, "{line}") {
            warn!(target: "analytics", "failed to write event: {e}");
        }
    }
}

pub trait Narrator: Send + Sync {
    /// Introduction line for a part, keyed by its index.
    fn play_part_announcement(&mut self, part_index: usize);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNarrator;

impl Narrator for LogNarrator {
    fn play_part_announcement(&mut self, part_index: usize) {
        info!(target: "activity", "narration: part {part_index} announcement");
    }
}

/// Records announcements. Clones share the same storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryNarrator {
    played: Arc<Mutex<Vec<usize>>>,
}

impl MemoryNarrator {
    pub fn played(&self) -> Vec<usize> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Narrator for MemoryNarrator {
    fn play_part_announcement(&mut self, part_index: usize) {
        if let Ok(mut p) = self.played.lock() {
            p.push(part_index);
        }
    }
}
