// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, quarter-turn rotation, staged in-place saves, and
// the orientation pass over a page list.

pub mod orient;
pub mod processor;

pub use orient::normalize_orientation;
pub use processor::ImageProcessor;
