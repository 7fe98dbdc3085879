// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Folio.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum FolioError {
    // -- Invocation --
    #[error("no directory given (use -d/--dir <DIR>)")]
    MissingArgument,

    // -- Discovery --
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recorded by discovery for each skipped file. Never fatal.
    #[error("skipped {}: {reason}", path.display())]
    UnparsableFilename { path: PathBuf, reason: String },

    // -- Images --
    #[error("failed to decode image {}: {detail}", path.display())]
    ImageDecode { path: PathBuf, detail: String },

    #[error("failed to write image {}: {detail}", path.display())]
    ImageEncode { path: PathBuf, detail: String },

    /// The orientation pass failed after `rotated` files had been rewritten.
    #[error("{source} ({rotated} images already rotated)")]
    RotationAborted {
        rotated: usize,
        #[source]
        source: Box<FolioError>,
    },

    // -- Output document --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("failed to generate {}: {detail}", path.display())]
    OutputWrite { path: PathBuf, detail: String },

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    /// Process exit status for this error kind. `0` is reserved for success.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingArgument => 1,
            Self::DirectoryNotFound { .. } | Self::DirectoryUnreadable { .. } => 3,
            Self::ImageDecode { .. } | Self::ImageEncode { .. } => 4,
            Self::RotationAborted { source, .. } => source.exit_code(),
            // Skipped during discovery, never returned from a run.
            Self::UnparsableFilename { .. } => 4,
            Self::PdfError(_) | Self::OutputWrite { .. } => 5,
            Self::Io(_) | Self::Serialization(_) => 6,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_stage() {
        let missing = FolioError::MissingArgument.exit_code();
        let dir = FolioError::DirectoryNotFound {
            path: PathBuf::from("/nope"),
        }
        .exit_code();
        let decode = FolioError::ImageDecode {
            path: PathBuf::from("a.png"),
            detail: "truncated".into(),
        }
        .exit_code();
        let output = FolioError::OutputWrite {
            path: PathBuf::from("a.pdf"),
            detail: "missing".into(),
        }
        .exit_code();

        let codes = [missing, dir, decode, output];
        assert!(codes.iter().all(|code| *code != 0));
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn missing_argument_exits_with_one() {
        assert_eq!(FolioError::MissingArgument.exit_code(), 1);
    }

    #[test]
    fn aborted_rotation_exits_like_its_cause() {
        let err = FolioError::RotationAborted {
            rotated: 2,
            source: Box::new(FolioError::ImageDecode {
                path: PathBuf::from("page_7.png"),
                detail: "unexpected EOF".into(),
            }),
        };
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("2 images already rotated"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unreadable_directory_keeps_source() {
        let err = FolioError::DirectoryUnreadable {
            path: PathBuf::from("/root/locked"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/root/locked"));
    }
}
