// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing events emitted by the pipeline stages.
//
// Each stage receives an `&dyn Observer` and reports what it did through it
// instead of logging to a global sink. `TracingObserver` forwards events to
// `tracing`; tests use a recording implementation.

use std::path::{Path, PathBuf};

use folio_core::OrderKey;
use tracing::{error, info, warn};

/// Level an event is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

/// Something an operator should see while a run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent<'a> {
    /// Discovery finished with `count` usable images.
    FilesFound { dir: &'a Path, count: usize },
    /// A matching file was left out of the page list.
    FileSkipped { path: &'a Path, reason: &'a str },
    /// A landscape image was turned to portrait.
    ImageRotated {
        path: &'a Path,
        width: u32,
        height: u32,
    },
    /// The orientation pass finished.
    RotationComplete { rotated: usize },
    /// An image was placed on page `page` (1-indexed).
    PageAdded {
        path: &'a Path,
        page: usize,
        order: OrderKey,
    },
    /// The output document was written and verified.
    DocumentWritten { path: &'a Path, pages: usize },
    /// The output document is absent or incomplete after writing.
    OutputMissing { path: &'a Path, detail: &'a str },
}

impl PipelineEvent<'_> {
    pub fn level(&self) -> EventLevel {
        match self {
            Self::FileSkipped { .. } => EventLevel::Warn,
            Self::OutputMissing { .. } => EventLevel::Error,
            _ => EventLevel::Info,
        }
    }

    /// Path the event is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::FilesFound { dir, .. } => Some(dir),
            Self::FileSkipped { path, .. }
            | Self::ImageRotated { path, .. }
            | Self::PageAdded { path, .. }
            | Self::DocumentWritten { path, .. }
            | Self::OutputMissing { path, .. } => Some(path),
            Self::RotationComplete { .. } => None,
        }
    }
}

/// Receives pipeline events. Implementations decide where they go.
pub trait Observer {
    fn record(&self, event: &PipelineEvent<'_>);
}

/// Forwards every event to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn record(&self, event: &PipelineEvent<'_>) {
        match *event {
            PipelineEvent::FilesFound { dir, count } => {
                info!(dir = %dir.display(), count, "found {count} image files");
            }
            PipelineEvent::FileSkipped { path, reason } => {
                warn!(path = %path.display(), reason, "skip file '{}', because {reason}", path.display());
            }
            PipelineEvent::ImageRotated {
                path,
                width,
                height,
            } => {
                info!(path = %path.display(), width, height, "rotated to portrait");
            }
            PipelineEvent::RotationComplete { rotated } => {
                info!(rotated, "number of rotated images {rotated}");
            }
            PipelineEvent::PageAdded { path, page, order } => {
                info!(page, order, "add file '{}'", path.display());
            }
            PipelineEvent::DocumentWritten { path, pages } => {
                info!(pages, "pdf generated successfully: '{}'", path.display());
            }
            PipelineEvent::OutputMissing { path, detail } => {
                error!(detail, "fail generate file: '{}'", path.display());
            }
        }
    }
}

/// Owned copy of an event, for observers that keep history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub level: EventLevel,
    pub path: Option<PathBuf>,
    pub description: String,
}

impl From<&PipelineEvent<'_>> for RecordedEvent {
    fn from(event: &PipelineEvent<'_>) -> Self {
        Self {
            level: event.level(),
            path: event.path().map(Path::to_path_buf),
            description: format!("{event:?}"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: std::cell::RefCell<Vec<RecordedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Events at exactly `level`.
    pub fn at_level(&self, level: EventLevel) -> Vec<RecordedEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn record(&self, event: &PipelineEvent<'_>) {
        self.events.borrow_mut().push(RecordedEvent::from(event));
    }
}
