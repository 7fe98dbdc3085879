// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Folio.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Page order taken from the last digit run of a file name.
pub type OrderKey = u64;

/// One image file queued for binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Rightmost number in the file name.
    pub order: OrderKey,
    /// Location of the image on disk.
    pub path: PathBuf,
}

impl ImageEntry {
    pub fn new(order: OrderKey, path: impl Into<PathBuf>) -> Self {
        Self {
            order,
            path: path.into(),
        }
    }
}

/// Image entries in page order.
///
/// Always sorted ascending by `order`. Entries with equal keys keep the order
/// in which they were handed to [`ImageList::from_unsorted`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageList {
    entries: Vec<ImageEntry>,
}

impl ImageList {
    /// Sort `entries` by order key. The sort is stable.
    pub fn from_unsorted(mut entries: Vec<ImageEntry>) -> Self {
        entries.sort_by_key(|entry| entry.order);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ImageEntry] {
        &self.entries
    }

    /// Order keys in page order.
    pub fn orders(&self) -> Vec<OrderKey> {
        self.entries.iter().map(|entry| entry.order).collect()
    }
}

impl<'a> IntoIterator for &'a ImageList {
    type Item = &'a ImageEntry;
    type IntoIter = std::slice::Iter<'a, ImageEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Output page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    /// ISO A4 portrait, 210 x 297 mm.
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        (self.width_mm, self.height_mm)
    }

    /// Dimensions in PostScript points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        (mm_to_pt(self.width_mm), mm_to_pt(self.height_mm))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Convert millimetres to PostScript points (1 pt = 1/72 in).
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Image files that made it into the page list.
    pub found: usize,
    /// Matching files skipped because their names carry no usable number.
    pub skipped: usize,
    /// Landscape images turned to portrait.
    pub rotated: usize,
    /// Pages written to the output document.
    pub pages: usize,
    /// Generated document, `None` when there was nothing to bind.
    pub output: Option<PathBuf>,
}
