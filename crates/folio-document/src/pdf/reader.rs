// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — reopen a written document with `lopdf` to check what actually
// landed on disk.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// Read-only view of an existing PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            FolioError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of page `page_number` (1-indexed) in points, taken
    /// from its MediaBox. Inherited boxes are followed up the page tree.
    pub fn page_size_pt(&self, page_number: u32) -> Result<(f32, f32)> {
        let pages = self.document.get_pages();
        let page_id: ObjectId = *pages.get(&page_number).ok_or_else(|| {
            FolioError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let media_box = self.media_box(page_id)?;
        let coords = media_box
            .iter()
            .map(|value| value.as_float())
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|err| FolioError::PdfError(format!("malformed MediaBox: {}", err)))?;
        match coords.as_slice() {
            [llx, lly, urx, ury] => Ok(((urx - llx).abs(), (ury - lly).abs())),
            other => Err(FolioError::PdfError(format!(
                "MediaBox has {} entries, expected 4",
                other.len()
            ))),
        }
    }

    // -- Helpers --------------------------------------------------------------

    fn media_box(&self, page_id: ObjectId) -> Result<&Vec<Object>> {
        let mut node: &Dictionary = self.document.get_dictionary(page_id).map_err(|err| {
            FolioError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
        })?;

        loop {
            if let Ok(value) = node.get(b"MediaBox") {
                let resolved = match value {
                    Object::Reference(id) => self.document.get_object(*id).map_err(|err| {
                        FolioError::PdfError(format!("dangling MediaBox reference: {}", err))
                    })?,
                    direct => direct,
                };
                return resolved
                    .as_array()
                    .map_err(|err| FolioError::PdfError(format!("MediaBox is not an array: {}", err)));
            }

            let parent = node
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| FolioError::PdfError("page has no MediaBox".into()))?;
            node = self.document.get_dictionary(parent).map_err(|err| {
                FolioError::PdfError(format!("cannot read page tree node: {}", err))
            })?;
        }
    }
}
