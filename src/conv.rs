// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Face identifiers are represented as `u32` instead of `usize` in order to
//! save space in the per-walk glyph cache (a font is not expected to hold
//! anywhere close to `u32::MAX` faces).

use easy_cast::Cast;

/// Convert `usize` → `u32`
///
/// This is a "safer" wrapper around `as` ensuring (on debug builds) that the
/// input value may be represented correctly by `u32`.
#[inline]
pub fn to_u32(x: usize) -> u32 {
    x.cast()
}

/// Convert `u32` → `usize`
///
/// This is a "safer" wrapper around `as` ensuring that the operation is
/// zero-extension.
#[inline]
pub fn to_usize(x: u32) -> usize {
    x.cast()
}

/// Decode the codepoint at the start of `bytes`
///
/// Returns the codepoint and its encoded length. An invalid (or truncated)
/// sequence yields the first byte as a one-byte codepoint.
///
/// Requires `bytes` to be non-empty.
pub fn decode_utf8(bytes: &[u8]) -> (u32, usize) {
    debug_assert!(!bytes.is_empty());
    let head = &bytes[..bytes.len().min(4)];
    let c = match std::str::from_utf8(head) {
        Ok(s) => s.chars().next(),
        Err(err) => std::str::from_utf8(&head[..err.valid_up_to()])
            .ok()
            .and_then(|s| s.chars().next()),
    };
    match c {
        Some(c) => (u32::from(c), c.len_utf8()),
        None => (bytes.first().copied().map(u32::from).unwrap_or(0), 1),
    }
}

/// Scale factor: points per font unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DPU(pub f32);

impl DPU {
    /// Scale for a face of `size` points with the given units-per-em
    pub(crate) fn for_size(size: i32, units_per_em: u16) -> Self {
        let size: f32 = size.cast();
        DPU(size / f32::from(units_per_em.max(1)))
    }
    pub(crate) fn i16_to_pt(self, x: i16) -> f32 {
        f32::from(x) * self.0
    }
    pub(crate) fn to_line_metrics(self, metrics: ttf_parser::LineMetrics) -> LineMetrics {
        LineMetrics {
            position: self.i16_to_pt(metrics.position),
            thickness: self.i16_to_pt(metrics.thickness),
        }
    }
}

/// Metrics for line marks
///
/// `position` follows the font file convention: positive is above the
/// baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    pub position: f32,
    pub thickness: f32,
}
