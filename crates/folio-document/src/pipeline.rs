// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One binding run: discover → normalise orientation → paginate → verify.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::{BindConfig, RunSummary};
use tracing::{debug, info, instrument};

use crate::discover::Discovery;
use crate::image::orient::normalize_orientation;
use crate::observer::{Observer, PipelineEvent};
use crate::pdf::reader::PdfReader;
use crate::pdf::writer::PdfWriter;

/// Run every stage for `config.input_dir` in sequence.
///
/// The directory is enumerated before anything is modified. An empty page
/// list ends the run successfully without creating a document.
#[instrument(skip_all, fields(dir = %config.input_dir.display()))]
pub fn run(config: &BindConfig, observer: &dyn Observer) -> Result<RunSummary> {
    let config_json = config.to_json()?;
    debug!(config = %config_json, "Starting run");

    let discovered = Discovery::new(config.pattern.clone()).scan(&config.input_dir, observer)?;
    let images = discovered.images;
    let mut summary = RunSummary {
        found: images.len(),
        skipped: discovered.skipped.len(),
        ..RunSummary::default()
    };

    summary.rotated = normalize_orientation(&images, observer)?;

    let mut writer = PdfWriter::new(config.page_size);
    writer.set_title(config.document_title());
    let Some(pages) = writer.write_to_file(&images, &config.output_path, observer)? else {
        info!("No images to bind, nothing written");
        return Ok(summary);
    };

    verify_output(&config.output_path, pages, observer)?;
    observer.record(&PipelineEvent::DocumentWritten {
        path: &config.output_path,
        pages,
    });

    summary.pages = pages;
    summary.output = Some(config.output_path.clone());
    Ok(summary)
}

/// Check that `path` exists and holds `expected_pages` pages.
///
/// A failed check is reported to the observer at error level and returned as
/// [`FolioError::OutputWrite`].
pub fn verify_output(path: &Path, expected_pages: usize, observer: &dyn Observer) -> Result<()> {
    let fail = |detail: String| {
        observer.record(&PipelineEvent::OutputMissing {
            path,
            detail: &detail,
        });
        FolioError::OutputWrite {
            path: path.to_path_buf(),
            detail,
        }
    };

    if !path.is_file() {
        return Err(fail("file does not exist after writing".into()));
    }
    let actual = PdfReader::open(path)
        .map_err(|err| fail(err.to_string()))?
        .page_count();
    if actual != expected_pages {
        return Err(fail(format!(
            "expected {expected_pages} pages, found {actual}"
        )));
    }
    Ok(())
}
