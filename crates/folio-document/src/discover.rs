// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Discovery — list a directory, keep the image files, and order them by the
// last number in each file name.

use std::fmt;
use std::path::{Path, PathBuf};

use folio_core::error::{FolioError, Result};
use folio_core::{ImageEntry, ImageList, ImagePattern, OrderKey};
use tracing::{debug, instrument};

use crate::observer::{Observer, PipelineEvent};

/// Why a matching file could not be given a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The file name has no decimal digits at all.
    NoDigits,
    /// The last digit run does not fit in an [`OrderKey`].
    OutOfRange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDigits => f.write_str("name contains no digits"),
            Self::OutOfRange => f.write_str("numeric token out of range"),
        }
    }
}

/// Maximal runs of ASCII digits in `name`, left to right.
pub fn digit_runs(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

/// Page order for a file name: the value of its rightmost digit run.
///
/// `"scan_2024_page_007.jpg"` orders as `7`.
pub fn order_key(file_name: &str) -> std::result::Result<OrderKey, SkipReason> {
    let last = digit_runs(file_name).last().ok_or(SkipReason::NoDigits)?;
    last.parse::<OrderKey>()
        .map_err(|_| SkipReason::OutOfRange)
}

/// Result of scanning one directory.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Usable images in page order.
    pub images: ImageList,
    /// Matching files left out, in enumeration order, each as
    /// [`FolioError::UnparsableFilename`].
    pub skipped: Vec<FolioError>,
}

/// Scans a directory for page images.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pattern: ImagePattern,
}

impl Discovery {
    pub fn new(pattern: ImagePattern) -> Self {
        Self { pattern }
    }

    /// List the immediate children of `dir` and build the ordered page list.
    ///
    /// Fails only when `dir` cannot be enumerated. An empty result is not an
    /// error.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn scan(&self, dir: &Path, observer: &dyn Observer) -> Result<Discovered> {
        let read_dir = std::fs::read_dir(dir).map_err(|err| directory_error(dir, err))?;

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|err| directory_error(dir, err))?;
            let path = entry.path();
            if !path.is_file() {
                debug!(path = %path.display(), "not a regular file, ignoring");
                continue;
            }
            paths.push(path);
        }

        let discovered = self.collect(paths, observer);
        observer.record(&PipelineEvent::FilesFound {
            dir,
            count: discovered.images.len(),
        });
        Ok(discovered)
    }

    /// Build the page list from file paths given in enumeration order.
    pub fn collect<I>(&self, paths: I, observer: &dyn Observer) -> Discovered
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            if !self.pattern.matches(&name) {
                continue;
            }
            match order_key(&name) {
                Ok(order) => entries.push(ImageEntry::new(order, path)),
                Err(reason) => {
                    let reason = reason.to_string();
                    observer.record(&PipelineEvent::FileSkipped {
                        path: &path,
                        reason: &reason,
                    });
                    skipped.push(FolioError::UnparsableFilename { path, reason });
                }
            }
        }

        Discovered {
            images: ImageList::from_unsorted(entries),
            skipped,
        }
    }
}

fn directory_error(dir: &Path, err: std::io::Error) -> FolioError {
    match err.kind() {
        std::io::ErrorKind::NotFound => FolioError::DirectoryNotFound {
            path: dir.to_path_buf(),
        },
        _ => FolioError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::observer::{EventLevel, RecordingObserver};

    #[test]
    fn last_digit_run_wins() {
        assert_eq!(order_key("page_10.png"), Ok(10));
        assert_eq!(order_key("scan_2024_page_007.jpg"), Ok(7));
        assert_eq!(order_key("42"), Ok(42));
        assert_eq!(order_key("img0.jpeg"), Ok(0));
    }

    #[test]
    fn names_without_digits_are_rejected() {
        assert_eq!(order_key("cover.jpg"), Err(SkipReason::NoDigits));
        assert_eq!(order_key(""), Err(SkipReason::NoDigits));
    }

    #[test]
    fn oversized_numbers_are_rejected() {
        assert_eq!(
            order_key("page_99999999999999999999999.png"),
            Err(SkipReason::OutOfRange)
        );
    }

    #[test]
    fn digit_runs_are_maximal() {
        let runs: Vec<_> = digit_runs("a12b3cc456").collect();
        assert_eq!(runs, vec!["12", "3", "456"]);
    }

    #[test]
    fn collect_orders_numerically_not_lexically() {
        let recorder = RecordingObserver::new();
        let found = Discovery::default().collect(
            [
                PathBuf::from("/d/page_10.png"),
                PathBuf::from("/d/page_9.jpg"),
                PathBuf::from("/d/page_100.jpeg"),
            ],
            &recorder,
        );
        assert_eq!(found.images.orders(), vec![9, 10, 100]);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn collect_breaks_ties_by_enumeration_order() {
        let recorder = RecordingObserver::new();
        let found = Discovery::default().collect(
            [
                PathBuf::from("/d/b_1.jpg"),
                PathBuf::from("/d/a_1.png"),
                PathBuf::from("/d/c_0.jpg"),
            ],
            &recorder,
        );
        let names: Vec<_> = found
            .images
            .iter()
            .map(|e| e.path.file_name().unwrap().to_str().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["c_0.jpg", "b_1.jpg", "a_1.png"]);
    }

    #[test]
    fn scan_matches_spec_scenario() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page_2.jpg"), b"x").unwrap();
        fs::write(dir.path().join("page_10.png"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::write(dir.path().join("notes_1.txt"), b"x").unwrap();

        let recorder = RecordingObserver::new();
        let found = Discovery::default().scan(dir.path(), &recorder).unwrap();

        assert_eq!(found.images.orders(), vec![2, 10]);
        assert_eq!(found.images.as_slice()[0].path, dir.path().join("page_2.jpg"));
        assert_eq!(found.images.as_slice()[1].path, dir.path().join("page_10.png"));
        assert!(matches!(
            found.skipped.as_slice(),
            [FolioError::UnparsableFilename { path, reason }]
                if *path == dir.path().join("cover.jpg") && reason == "name contains no digits"
        ));

        let warnings = recorder.at_level(EventLevel::Warn);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path.as_deref(), Some(dir.path().join("cover.jpg").as_path()));
        assert!(warnings[0].description.contains("name contains no digits"));
    }

    #[test]
    fn scan_reports_count_once() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1.png"), b"x").unwrap();
        fs::write(dir.path().join("2.png"), b"x").unwrap();

        let recorder = RecordingObserver::new();
        Discovery::default().scan(dir.path(), &recorder).unwrap();

        let infos = recorder.at_level(EventLevel::Info);
        assert_eq!(infos.len(), 1);
        assert!(infos[0].description.contains("count: 2"));
    }

    #[test]
    fn scan_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("chapter_3.png")).unwrap();
        fs::create_dir(dir.path().join("chapter_4")).unwrap();
        fs::write(dir.path().join("chapter_4").join("page_1.png"), b"x").unwrap();

        let found = Discovery::default()
            .scan(dir.path(), &RecordingObserver::new())
            .unwrap();
        assert!(found.images.is_empty());
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let found = Discovery::default()
            .scan(dir.path(), &RecordingObserver::new())
            .unwrap();
        assert!(found.images.is_empty());
        assert!(found.skipped.is_empty());
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");
        let err = Discovery::default()
            .scan(&missing, &RecordingObserver::new())
            .unwrap_err();
        assert!(matches!(err, FolioError::DirectoryNotFound { path } if path == missing));
    }

    #[test]
    fn file_instead_of_directory_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page_1.png");
        fs::write(&file, b"x").unwrap();
        let err = Discovery::default()
            .scan(&file, &RecordingObserver::new())
            .unwrap_err();
        assert!(matches!(err, FolioError::DirectoryUnreadable { .. }));
    }
}
