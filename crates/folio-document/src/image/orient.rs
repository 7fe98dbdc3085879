// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Orientation pass — every landscape image in the page list is turned a
// quarter clockwise and written back over itself, so that all pages are
// portrait before binding.

use folio_core::ImageList;
use folio_core::error::{FolioError, Result};
use tracing::{debug, instrument};

use super::processor::ImageProcessor;
use crate::observer::{Observer, PipelineEvent};

/// Rotate landscape images in `images` to portrait, in place.
///
/// All headers are probed before the first file is rewritten, so an
/// unreadable file aborts the pass without touching anything. A file that
/// probes fine but fails to decode fully still aborts the run; if earlier
/// files were already rewritten the error is wrapped in
/// [`FolioError::RotationAborted`]. Returns the number of images rotated.
#[instrument(skip_all, fields(images = images.len()))]
pub fn normalize_orientation(images: &ImageList, observer: &dyn Observer) -> Result<usize> {
    if images.is_empty() {
        return Ok(0);
    }

    let mut landscape = Vec::new();
    for entry in images {
        let (width, height) = ImageProcessor::probe_dimensions(&entry.path)?;
        debug!(path = %entry.path.display(), width, height, "Probed");
        if width > height {
            landscape.push(entry);
        }
    }

    let mut rotated = 0;
    for entry in landscape {
        let partial = |source: FolioError| match rotated {
            0 => source,
            rotated => FolioError::RotationAborted {
                rotated,
                source: Box::new(source),
            },
        };
        let processor = ImageProcessor::open(&entry.path).map_err(partial)?;
        if !processor.is_landscape() {
            continue;
        }
        let turned = processor.rotate_clockwise();
        turned.save_in_place(&entry.path).map_err(partial)?;
        observer.record(&PipelineEvent::ImageRotated {
            path: &entry.path,
            width: turned.width(),
            height: turned.height(),
        });
        rotated += 1;
    }

    observer.record(&PipelineEvent::RotationComplete { rotated });
    Ok(rotated)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use folio_core::{ImageEntry, ImageList};
    use image::{DynamicImage, Rgb, RgbImage};
    use tempfile::TempDir;

    use super::*;
    use crate::observer::RecordingObserver;

    fn write_image(path: &Path, width: u32, height: u32) {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([10, 20, 30])))
            .save(path)
            .unwrap();
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let recorder = RecordingObserver::new();
        let rotated = normalize_orientation(&ImageList::default(), &recorder).unwrap();
        assert_eq!(rotated, 0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn landscape_becomes_portrait_and_portrait_is_untouched() {
        let dir = TempDir::new().unwrap();
        let portrait = dir.path().join("page_2.jpg");
        let landscape = dir.path().join("page_10.png");
        write_image(&portrait, 80, 100);
        write_image(&landscape, 100, 80);
        let portrait_bytes = fs::read(&portrait).unwrap();

        let list = ImageList::from_unsorted(vec![
            ImageEntry::new(2, &portrait),
            ImageEntry::new(10, &landscape),
        ]);
        let recorder = RecordingObserver::new();
        let rotated = normalize_orientation(&list, &recorder).unwrap();

        assert_eq!(rotated, 1);
        assert_eq!(
            ImageProcessor::probe_dimensions(&landscape).unwrap(),
            (80, 100)
        );
        assert_eq!(fs::read(&portrait).unwrap(), portrait_bytes);
        let last = recorder.events().pop().unwrap();
        assert!(last.description.contains("RotationComplete { rotated: 1 }"));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let landscape = dir.path().join("scan_1.png");
        write_image(&landscape, 30, 10);
        let list = ImageList::from_unsorted(vec![ImageEntry::new(1, &landscape)]);

        assert_eq!(normalize_orientation(&list, &RecordingObserver::new()).unwrap(), 1);
        let after_first = fs::read(&landscape).unwrap();
        assert_eq!(normalize_orientation(&list, &RecordingObserver::new()).unwrap(), 0);
        assert_eq!(fs::read(&landscape).unwrap(), after_first);
    }

    #[test]
    fn square_images_are_left_alone() {
        let dir = TempDir::new().unwrap();
        let square = dir.path().join("sq_5.png");
        write_image(&square, 50, 50);
        let before = fs::read(&square).unwrap();

        let list = ImageList::from_unsorted(vec![ImageEntry::new(5, &square)]);
        assert_eq!(normalize_orientation(&list, &RecordingObserver::new()).unwrap(), 0);
        assert_eq!(fs::read(&square).unwrap(), before);
    }

    #[test]
    fn unreadable_file_aborts_before_any_rotation() {
        let dir = TempDir::new().unwrap();
        let landscape = dir.path().join("page_1.png");
        let broken = dir.path().join("page_2.jpg");
        write_image(&landscape, 100, 50);
        fs::write(&broken, b"not an image").unwrap();
        let before = fs::read(&landscape).unwrap();

        let list = ImageList::from_unsorted(vec![
            ImageEntry::new(1, &landscape),
            ImageEntry::new(2, &broken),
        ]);
        let err = normalize_orientation(&list, &RecordingObserver::new()).unwrap_err();

        assert!(matches!(err, FolioError::ImageDecode { path, .. } if path == broken));
        assert_eq!(fs::read(&landscape).unwrap(), before);
    }

    /// Landscape PNG whose header is intact but whose pixel data is cut off.
    fn write_truncated_png(path: &Path, width: u32, height: u32) {
        let mut seed = 0x2545_f491_u32;
        let noise = RgbImage::from_fn(width, height, |_, _| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            Rgb([r, g, b])
        });
        DynamicImage::ImageRgb8(noise).save(path).unwrap();
        let bytes = fs::read(path).unwrap();
        fs::write(path, &bytes[..bytes.len() / 2]).unwrap();
    }

    #[test]
    fn body_corruption_after_a_rotation_reports_the_count() {
        let dir = TempDir::new().unwrap();
        let landscape = dir.path().join("page_1.png");
        let truncated = dir.path().join("page_2.png");
        write_image(&landscape, 100, 50);
        write_truncated_png(&truncated, 200, 100);
        assert_eq!(
            ImageProcessor::probe_dimensions(&truncated).unwrap(),
            (200, 100)
        );

        let list = ImageList::from_unsorted(vec![
            ImageEntry::new(1, &landscape),
            ImageEntry::new(2, &truncated),
        ]);
        let err = normalize_orientation(&list, &RecordingObserver::new()).unwrap_err();

        match err {
            FolioError::RotationAborted { rotated, source } => {
                assert_eq!(rotated, 1);
                assert!(matches!(*source, FolioError::ImageDecode { ref path, .. } if *path == truncated));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            ImageProcessor::probe_dimensions(&landscape).unwrap(),
            (50, 100)
        );
    }
}
