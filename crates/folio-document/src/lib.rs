// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// folio-document — Turning a directory of numbered page images into one PDF.
//
// Provides discovery (filter and order image files by the number in their
// names), orientation normalisation (turn landscape images to portrait in
// place), and pagination (one A4 page per image).

pub mod discover;
pub mod image;
pub mod observer;
pub mod pdf;
pub mod pipeline;

pub use discover::{Discovered, Discovery, SkipReason, order_key};
pub use crate::image::orient::normalize_orientation;
pub use crate::image::processor::ImageProcessor;
pub use observer::{Observer, PipelineEvent, TracingObserver};
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
pub use pipeline::run;
