// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::PageSize;

/// Extension of the generated document.
pub const OUTPUT_EXTENSION: &str = "pdf";

/// File name filter for discovery: matches names whose extension is one of
/// `extensions`, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePattern {
    pub extensions: Vec<String>,
}

impl ImagePattern {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.into().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Whether `file_name` ends in `.<ext>` for one of the configured extensions.
    pub fn matches(&self, file_name: &str) -> bool {
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        if stem.is_empty() {
            return false;
        }
        self.extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(ext))
    }

    /// Human-readable form used in help and log output, e.g. `jpg|jpeg|png`.
    pub fn describe(&self) -> String {
        self.extensions.join("|")
    }
}

impl Default for ImagePattern {
    fn default() -> Self {
        Self::new(["jpg", "jpeg", "png"])
    }
}

/// Everything one run needs, resolved up front and handed to each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindConfig {
    /// Absolute, normalised input directory.
    pub input_dir: PathBuf,
    /// `<input_dir>.pdf`, a sibling of the input directory.
    pub output_path: PathBuf,
    pub pattern: ImagePattern,
    pub page_size: PageSize,
}

impl BindConfig {
    /// Resolve `dir` against the current directory and derive the output path.
    pub fn for_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let absolute = std::path::absolute(dir.as_ref())?;
        let input_dir = normalize_lexically(&absolute);
        let output_path = output_path_for(&input_dir);
        Ok(Self {
            input_dir,
            output_path,
            pattern: ImagePattern::default(),
            page_size: PageSize::A4,
        })
    }

    /// Title embedded in the generated document: the directory's own name.
    pub fn document_title(&self) -> String {
        self.input_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "folio".to_owned())
    }

    /// JSON rendering for debug logs.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `<dir>.pdf`, keeping any dots already in the directory name.
pub fn output_path_for(dir: &Path) -> PathBuf {
    let mut name = OsString::from(dir.as_os_str());
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    PathBuf::from(name)
}

/// Drop `.` components and fold `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
