// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Atlas bakes, codepoint ranges and per-glyph metrics

use super::FaceSource;
use crate::{Rect, Vec2};
use bitflags::bitflags;
use smallvec::SmallVec;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque handle to an atlas texture
///
/// The handle is allocated by the [`GlyphBaker`] (or whoever created a sprite
/// sheet) and is only passed back to a [`DrawTarget`](crate::display::DrawTarget).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Per-glyph metrics
///
/// All values are in points, relative to the pen position on the baseline.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharInfo {
    /// Index within the owning range
    pub index: usize,
    pub codepoint: u32,
    /// Region of the bake's atlas holding the glyph bitmap
    ///
    /// Its size is also the render size of the glyph.
    pub source: Rect,
    /// Offset from the pen at which the bitmap is drawn
    pub render_offset: Vec2,
    /// Offset of the glyph's contribution to text bounds
    pub logical_offset: Vec2,
    /// Size of the glyph's contribution to text bounds
    pub logical_size: Vec2,
    /// Horizontal advance
    pub advance: f32,
}

impl CharInfo {
    /// Size at which the bitmap is drawn (before scaling)
    #[inline]
    pub fn render_size(&self) -> Vec2 {
        self.source.size
    }

    /// True if the glyph has a drawable bitmap
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.source.size.0 > 0.0 && self.source.size.1 > 0.0
    }
}

/// A set of codepoints covered by a bake
///
/// Contiguous ranges cover `min..max` and index glyphs by subtraction; other
/// ranges hold an explicit list (e.g. icons keyed by arbitrary codepoints)
/// which is scanned linearly. In both cases `min..max` bounds the codepoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRange {
    pub(crate) contiguous: bool,
    pub(crate) min: u32,
    pub(crate) max: u32,
    pub(crate) glyphs: Vec<CharInfo>,
}

impl GlyphRange {
    pub(crate) fn contiguous(first: u32, glyphs: Vec<CharInfo>) -> Self {
        let max = first.saturating_add(crate::conv::to_u32(glyphs.len()));
        GlyphRange {
            contiguous: true,
            min: first,
            max,
            glyphs,
        }
    }

    pub(crate) fn list(glyphs: Vec<CharInfo>) -> Self {
        let min = glyphs.iter().map(|g| g.codepoint).min().unwrap_or(0);
        let max = glyphs
            .iter()
            .map(|g| g.codepoint.saturating_add(1))
            .max()
            .unwrap_or(0);
        GlyphRange {
            contiguous: false,
            min,
            max,
            glyphs,
        }
    }

    /// True if this range is a contiguous interval
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.contiguous
    }

    /// Lowest covered codepoint
    #[inline]
    pub fn min_codepoint(&self) -> u32 {
        self.min
    }

    /// One past the highest covered codepoint
    #[inline]
    pub fn max_codepoint(&self) -> u32 {
        self.max
    }

    /// All glyphs of the range
    #[inline]
    pub fn glyphs(&self) -> &[CharInfo] {
        &self.glyphs
    }

    /// Find the glyph for `codepoint`
    pub fn find(&self, codepoint: u32) -> Option<&CharInfo> {
        if codepoint < self.min || codepoint >= self.max {
            return None;
        }
        if self.contiguous {
            self.glyphs.get(crate::conv::to_usize(codepoint - self.min))
        } else {
            self.glyphs.iter().find(|g| g.codepoint == codepoint)
        }
    }
}

bitflags! {
    /// Properties of a [`Bake`]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct BakeFlags: u8 {
        /// Glyph data was baked successfully
        const VALID = 0x01;
        /// Glyphs come from a sprite sheet, not a font file
        const SPRITE = 0x02;
        /// Vector glyphs: render size is normalised to the face's line height
        const SCALABLE = 0x04;
        /// Full RGBA glyphs, drawn without tint
        const COLORED = 0x08;
    }
}

/// One atlas generation pass for a face
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bake {
    pub(crate) flags: BakeFlags,
    pub(crate) texture: TextureId,
    pub(crate) atlas_size: Vec2,
    pub(crate) ranges: SmallVec<[GlyphRange; 2]>,
}

impl Bake {
    /// Flags
    #[inline]
    pub fn flags(&self) -> BakeFlags {
        self.flags
    }

    /// Atlas texture
    #[inline]
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Size of the atlas bitmap in pixels
    #[inline]
    pub fn atlas_size(&self) -> Vec2 {
        self.atlas_size
    }

    /// Codepoint ranges
    #[inline]
    pub fn ranges(&self) -> &[GlyphRange] {
        &self.ranges
    }

    /// True for vector (sprite) bakes without a fixed render size
    #[inline]
    pub fn is_scalable(&self) -> bool {
        self.flags.contains(BakeFlags::SCALABLE)
    }

    /// True if glyphs carry their own color
    #[inline]
    pub fn is_colored(&self) -> bool {
        self.flags.contains(BakeFlags::COLORED)
    }

    /// Find the range and glyph for `codepoint`
    ///
    /// The first range containing `codepoint` wins.
    pub fn find(&self, codepoint: u32) -> Option<(&GlyphRange, &CharInfo)> {
        self.ranges
            .iter()
            .find_map(|range| range.find(codepoint).map(|info| (range, info)))
    }
}

/// A request for a range of codepoints to bake
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RangeSpec {
    /// `count` codepoints starting from `first`
    Contiguous { first: u32, count: u32 },
    /// An explicit list of codepoints
    List(Vec<u32>),
}

impl RangeSpec {
    /// Number of codepoints requested
    pub fn len(&self) -> usize {
        match self {
            RangeSpec::Contiguous { count, .. } => crate::conv::to_usize(*count),
            RangeSpec::List(list) => list.len(),
        }
    }

    /// One past the highest requested codepoint
    ///
    /// Returns `None` if that bound does not fit a `u32`; such a range cannot
    /// be baked.
    pub fn end(&self) -> Option<u32> {
        match self {
            RangeSpec::Contiguous { first, count } => first.checked_add(*count),
            RangeSpec::List(list) => list
                .iter()
                .try_fold(0, |end: u32, c| Some(end.max(c.checked_add(1)?))),
        }
    }

    /// Iterate over requested codepoints, in order
    pub fn codepoints(&self) -> impl Iterator<Item = u32> + '_ {
        let (contiguous, list) = match self {
            RangeSpec::Contiguous { first, count } => {
                (Some(*first..first.saturating_add(*count)), None)
            }
            RangeSpec::List(list) => (None, Some(list.iter().copied())),
        };
        contiguous.into_iter().flatten().chain(list.into_iter().flatten())
    }
}

/// Parameters passed to a [`GlyphBaker`]
#[derive(Clone, Copy, Debug)]
pub struct BakeRequest<'a> {
    /// Point size of the face
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
    /// Size of the atlas to pack glyphs into, in pixels
    pub atlas_size: (u32, u32),
    pub ranges: &'a [RangeSpec],
}

/// Metrics of one rasterized glyph, as produced by a [`GlyphBaker`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BakedGlyph {
    pub codepoint: u32,
    /// Region of the atlas
    pub source: Rect,
    /// Offset of the bitmap from the pen (usually negative y)
    pub offset: Vec2,
    pub advance: f32,
}

/// Output of a [`GlyphBaker`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BakeData {
    pub texture: TextureId,
    pub atlas_size: (u32, u32),
    /// One entry per requested codepoint, in request order
    pub glyphs: Vec<BakedGlyph>,
}

/// Glyph rasterization failure
#[derive(Error, Debug)]
#[error("failed to bake glyphs: {0}")]
pub struct BakeError(pub String);

/// The glyph-rasterization collaborator
///
/// Implementations decode the face's source file, rasterize the requested
/// codepoints into an atlas bitmap and upload it, returning the metrics.
pub trait GlyphBaker {
    fn bake(&mut self, source: &FaceSource, request: &BakeRequest<'_>)
        -> Result<BakeData, BakeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(codepoint: u32) -> CharInfo {
        CharInfo {
            codepoint,
            advance: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn contiguous_lookup() {
        let range = GlyphRange::contiguous(65, (65..70).map(info).collect());
        assert_eq!(range.max_codepoint(), 70);
        assert_eq!(range.find(67).map(|g| g.codepoint), Some(67));
        assert!(range.find(64).is_none());
        assert!(range.find(70).is_none());
    }

    #[test]
    fn list_lookup() {
        let range = GlyphRange::list(vec![info(0xE000), info(0x41), info(0x1F600)]);
        assert!(!range.is_contiguous());
        assert_eq!(range.min_codepoint(), 0x41);
        assert_eq!(range.max_codepoint(), 0x1F601);
        assert_eq!(range.find(0xE000).map(|g| g.codepoint), Some(0xE000));
        // inside the bounds but not listed
        assert!(range.find(0x42).is_none());
    }

    #[test]
    fn first_range_wins() {
        let mut a = info(66);
        a.advance = 2.0;
        let bake = Bake {
            ranges: [
                GlyphRange::list(vec![a]),
                GlyphRange::contiguous(65, (65..70).map(info).collect()),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        assert_eq!(bake.find(66).map(|(_, g)| g.advance), Some(2.0));
        assert_eq!(bake.find(67).map(|(_, g)| g.advance), Some(1.0));
    }

    #[test]
    fn range_spec_codepoints() {
        let spec = RangeSpec::Contiguous { first: 10, count: 3 };
        assert_eq!(spec.codepoints().collect::<Vec<_>>(), vec![10, 11, 12]);
        let spec = RangeSpec::List(vec![7, 3]);
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.codepoints().collect::<Vec<_>>(), vec![7, 3]);
        assert_eq!(spec.end(), Some(8));
    }

    #[test]
    fn range_spec_end() {
        let spec = RangeSpec::Contiguous { first: 10, count: 3 };
        assert_eq!(spec.end(), Some(13));
        let spec = RangeSpec::Contiguous { first: u32::MAX - 1, count: 1 };
        assert_eq!(spec.end(), Some(u32::MAX));
        let spec = RangeSpec::Contiguous { first: u32::MAX, count: 2 };
        assert_eq!(spec.end(), None);
        assert_eq!(spec.codepoints().count(), 0);
        assert_eq!(RangeSpec::List(vec![5, u32::MAX]).end(), None);
        assert_eq!(RangeSpec::List(vec![]).end(), Some(0));

        let range = GlyphRange::list(vec![info(u32::MAX)]);
        assert_eq!(range.max_codepoint(), u32::MAX);
    }
}
