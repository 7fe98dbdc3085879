// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, quarter-turn rotation, and re-encoding in the
// file's original format. Saves over an existing file go through a temporary
// sibling that is renamed into place, so the original is never truncated.

use std::io::Write;
use std::path::{Path, PathBuf};

use folio_core::error::{FolioError, Result};
use image::{DynamicImage, ImageFormat, ImageReader};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// JPEG quality used when a rotated JPEG is written back.
pub const JPEG_QUALITY: u8 = 90;

/// A single decoded image together with the format it was read from.
///
/// Transformations consume `self` and return a new `ImageProcessor`, enabling
/// method chaining.
///
/// ```ignore
/// ImageProcessor::open("page_10.png")?
///     .rotate_clockwise()
///     .save_in_place("page_10.png")?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
    /// Format detected when decoding, if any.
    format: Option<ImageFormat>,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path. The format is sniffed from the content
    /// first and the extension second.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_error(path, err))?;
        let format = reader.format();
        let img = reader.decode().map_err(|err| decode_error(path, err))?;
        debug!(
            width = img.width(),
            height = img.height(),
            ?format,
            "Image loaded"
        );
        Ok(Self { image: img, format })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image,
            format: None,
        }
    }

    /// Read only the header of the file at `path` and return (width, height).
    pub fn probe_dimensions(path: impl AsRef<Path>) -> Result<(u32, u32)> {
        let path = path.as_ref();
        ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| decode_error(path, err))?
            .into_dimensions()
            .map_err(|err| decode_error(path, err))
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width strictly greater than height.
    pub fn is_landscape(&self) -> bool {
        self.width() > self.height()
    }

    /// Format the image was decoded from.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Rotate a quarter turn clockwise. The left edge becomes the top edge.
    #[instrument(skip(self), fields(width = self.width(), height = self.height()))]
    pub fn rotate_clockwise(self) -> Self {
        debug!("Rotating image 90 degrees clockwise");
        Self {
            image: self.image.rotate90(),
            format: self.format,
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the image as `format`.
    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
                self.image
                    .to_rgb8()
                    .write_with_encoder(encoder)
                    .map_err(|err| FolioError::ImageEncode {
                        path: PathBuf::from("<memory>"),
                        detail: format!("JPEG encoding failed: {err}"),
                    })?;
            }
            other => {
                let mut cursor = std::io::Cursor::new(&mut buffer);
                self.image
                    .write_to(&mut cursor, other)
                    .map_err(|err| FolioError::ImageEncode {
                        path: PathBuf::from("<memory>"),
                        detail: format!("{other:?} encoding failed: {err}"),
                    })?;
            }
        }
        Ok(buffer)
    }

    /// Replace the file at `path` with this image, keeping its format.
    ///
    /// The bytes are written to a temporary file in the same directory and
    /// renamed over `path`. If anything fails before the rename, `path` still
    /// holds the old image.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_in_place(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = self
            .format
            .or_else(|| ImageFormat::from_path(path).ok())
            .ok_or_else(|| FolioError::ImageEncode {
                path: path.to_path_buf(),
                detail: "cannot tell which format to write".into(),
            })?;

        let bytes = self.encode(format).map_err(|err| match err {
            FolioError::ImageEncode { detail, .. } => FolioError::ImageEncode {
                path: path.to_path_buf(),
                detail,
            },
            other => other,
        })?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let encode_err = |err: std::io::Error| FolioError::ImageEncode {
            path: path.to_path_buf(),
            detail: err.to_string(),
        };

        let mut staged = NamedTempFile::new_in(parent).map_err(encode_err)?;
        staged.write_all(&bytes).map_err(encode_err)?;
        staged.as_file().sync_all().map_err(encode_err)?;
        if let Ok(metadata) = std::fs::metadata(path) {
            std::fs::set_permissions(staged.path(), metadata.permissions())
                .map_err(encode_err)?;
        }
        staged
            .persist(path)
            .map_err(|err| encode_err(err.error))?;

        info!(bytes = bytes.len(), ?format, "Image replaced");
        Ok(())
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> FolioError {
    FolioError::ImageDecode {
        path: path.to_path_buf(),
        detail: err.to_string(),
    }
}
