// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — bind an ordered list of images into one document, one page per
// image, using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use folio_core::error::{FolioError, Result};
use folio_core::{ImageList, PageSize};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

use crate::image::processor::ImageProcessor;
use crate::observer::{Observer, PipelineEvent};

/// Placement resolution: one image pixel is one point before scaling.
const PLACEMENT_DPI: f32 = 72.0;

/// Builds the bound document.
pub struct PdfWriter {
    /// Size of every page.
    page_size: PageSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer targeting the given page size.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            title: None,
        }
    }

    /// Create a new writer with A4 portrait pages.
    pub fn a4() -> Self {
        Self::new(PageSize::A4)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Page dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.page_size.dimensions_mm();
        (Mm(w_mm), Mm(h_mm))
    }

    /// Build the document in memory, one page per image in list order.
    ///
    /// Each image is stretched to cover the whole page from the origin; its
    /// aspect ratio is not kept. Returns `None` for an empty list.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn paginate(
        &self,
        images: &ImageList,
        observer: &dyn Observer,
    ) -> Result<Option<Vec<u8>>> {
        if images.is_empty() {
            return Ok(None);
        }

        let (page_w, page_h) = self.page_dimensions();
        let (page_w_pt, page_h_pt) = self.page_size.dimensions_pt();
        let title = self.title.as_deref().unwrap_or("Folio");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, entry) in images.iter().enumerate() {
            observer.record(&PipelineEvent::PageAdded {
                path: &entry.path,
                page: index + 1,
                order: entry.order,
            });

            let rgb = ImageProcessor::open(&entry.path)?.into_dynamic().to_rgb8();
            let (img_width, img_height) = rgb.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: img_width as usize,
                height: img_height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At PLACEMENT_DPI the native size in points equals the pixel size.
            let scale_x = page_w_pt / img_width as f32;
            let scale_y = page_h_pt / img_height as f32;

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(scale_x),
                    scale_y: Some(scale_y),
                    dpi: Some(PLACEMENT_DPI),
                    rotate: None,
                },
            }];

            debug!(
                page = index + 1,
                img_width, img_height, scale_x, scale_y, "Image stretched to page"
            );
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            bytes = output.len(),
            warnings = warnings.len(),
            "Document serialised"
        );

        Ok(Some(output))
    }

    /// Build the document and write it to `path`, replacing any existing file.
    ///
    /// Returns the number of pages written, or `None` (and writes nothing)
    /// when `images` is empty.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_to_file(
        &self,
        images: &ImageList,
        path: impl AsRef<Path>,
        observer: &dyn Observer,
    ) -> Result<Option<usize>> {
        let path = path.as_ref();
        let Some(bytes) = self.paginate(images, observer)? else {
            return Ok(None);
        };
        std::fs::write(path, &bytes).map_err(|err| FolioError::OutputWrite {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        info!(bytes = bytes.len(), "Wrote PDF to {}", path.display());
        Ok(Some(images.len()))
    }
}
