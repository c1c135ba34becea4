// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font face types

use super::{
    Bake, BakeData, BakeFlags, BakeRequest, CharInfo, FaceSource, Font, FontError, GlyphBaker,
    GlyphRange, RangeSpec,
};
use crate::conv::to_usize;
use crate::{Rect, Vec2};
use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Underline offset below the baseline used when the source has no metrics
pub const DEFAULT_UNDERLINE_OFFSET: f32 = 2.0;
/// Underline thickness used when the source has no metrics
pub const DEFAULT_UNDERLINE_THICKNESS: f32 = 1.0;

/// Font face identifier
///
/// Identifies a face within its [`Font`] by index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceId(pub(crate) u32);
impl FaceId {
    /// Get as `usize`
    pub fn get(self) -> usize {
        to_usize(self.0)
    }
}

impl From<u32> for FaceId {
    fn from(id: u32) -> Self {
        FaceId(id)
    }
}

bitflags! {
    /// Properties of a [`Face`]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct FaceFlags: u16 {
        /// Cleared if any bake failed
        const VALID = 0x0001;
        const BOLD = 0x0002;
        const ITALIC = 0x0004;
        /// Set on at most one face of a font
        const DEFAULT = 0x0008;
        /// The face holds its source and accepts new bakes
        const ACTIVE = 0x0010;
    }
}

/// Vertical metrics, in points
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VMetrics {
    pub line_height: f32,
    pub max_ascend: f32,
    pub max_descend: f32,
}

impl VMetrics {
    /// Grow to include a glyph box at `offset` (from the pen) of `size`
    fn include(&mut self, offset: Vec2, size: Vec2) {
        let ascend = (-offset.1).max(0.0);
        let descend = (offset.1 + size.1).max(0.0);
        self.max_ascend = self.max_ascend.max(ascend);
        self.max_descend = self.max_descend.max(descend);
        self.line_height = self.line_height.max(ascend + descend);
    }
}

/// One (size, bold, italic) style variant of a [`Font`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Face {
    pub(crate) flags: FaceFlags,
    pub(crate) size: i32,
    pub(crate) underline_offset: f32,
    pub(crate) underline_thickness: f32,
    pub(crate) codepoints: Option<(u32, u32)>,
    pub(crate) num_chars: usize,
    pub(crate) bakes: Vec<Bake>,
    pub(crate) logical: VMetrics,
    pub(crate) render: VMetrics,
    pub(crate) source: Option<FaceSource>,
}

impl Face {
    pub(crate) fn new(size: i32, bold: bool, italic: bool, source: FaceSource) -> Self {
        let mut flags = FaceFlags::VALID | FaceFlags::ACTIVE;
        flags.set(FaceFlags::BOLD, bold);
        flags.set(FaceFlags::ITALIC, italic);

        let (underline_offset, underline_thickness) = match source.underline_metrics(size) {
            Some(m) if m.thickness > 0.0 => (-m.position, m.thickness),
            _ => (DEFAULT_UNDERLINE_OFFSET, DEFAULT_UNDERLINE_THICKNESS),
        };

        Face {
            flags,
            size,
            underline_offset,
            underline_thickness,
            source: Some(source),
            ..Default::default()
        }
    }

    /// Flags
    #[inline]
    pub fn flags(&self) -> FaceFlags {
        self.flags
    }

    /// Point size
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn is_bold(&self) -> bool {
        self.flags.contains(FaceFlags::BOLD)
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.flags.contains(FaceFlags::ITALIC)
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.flags.contains(FaceFlags::DEFAULT)
    }

    /// False if any bake of this face failed
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.flags.contains(FaceFlags::VALID)
    }

    /// True while the face is under construction
    #[inline]
    pub fn is_active(&self) -> bool {
        self.flags.contains(FaceFlags::ACTIVE)
    }

    /// Source file, if the face is still active
    #[inline]
    pub fn source(&self) -> Option<&FaceSource> {
        self.source.as_ref()
    }

    /// Logical metrics, used for layout and cursor placement
    #[inline]
    pub fn metrics(&self) -> &VMetrics {
        &self.logical
    }

    /// Render metrics, used to place glyph bitmaps
    #[inline]
    pub fn render_metrics(&self) -> &VMetrics {
        &self.render
    }

    /// Logical line height
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.logical.line_height
    }

    /// Underline offset below the baseline
    #[inline]
    pub fn underline_offset(&self) -> f32 {
        self.underline_offset
    }

    #[inline]
    pub fn underline_thickness(&self) -> f32 {
        self.underline_thickness
    }

    /// Range of codepoints covered by any bake, as `min..max`
    pub fn codepoint_range(&self) -> Option<std::ops::Range<u32>> {
        self.codepoints.map(|(min, max)| min..max)
    }

    /// Number of glyphs over all bakes
    #[inline]
    pub fn num_chars(&self) -> usize {
        self.num_chars
    }

    /// All bakes
    #[inline]
    pub fn bakes(&self) -> &[Bake] {
        &self.bakes
    }

    /// Get a bake by index
    #[inline]
    pub fn bake(&self, index: usize) -> Option<&Bake> {
        self.bakes.get(index)
    }

    /// Find the glyph for `codepoint`
    ///
    /// Bakes are searched in order; the first to contain `codepoint` wins.
    /// Returns the bake index and glyph.
    pub fn find_glyph(&self, codepoint: u32) -> Option<(usize, &CharInfo)> {
        self.bakes
            .iter()
            .enumerate()
            .find_map(|(i, bake)| bake.find(codepoint).map(|(_, info)| (i, info)))
    }

    pub(crate) fn push_bake(&mut self, bake: Bake, include_metrics: bool) -> usize {
        for range in bake.ranges.iter() {
            if range.glyphs.is_empty() {
                continue;
            }
            self.codepoints = Some(match self.codepoints {
                None => (range.min, range.max),
                Some((min, max)) => (min.min(range.min), max.max(range.max)),
            });
            self.num_chars += range.glyphs.len();

            if include_metrics {
                for info in &range.glyphs {
                    if info.logical_size.0 > 0.0 && info.logical_size.1 > 0.0 {
                        self.logical.include(info.logical_offset, info.logical_size);
                        self.render.include(info.render_offset, info.render_size());
                    }
                }
            }
        }
        self.bakes.push(bake);
        self.bakes.len() - 1
    }
}

/// Builder for a face under construction
///
/// Obtained from [`Font::start_face`]. Bakes may only be added through the
/// builder; [`Self::finish`] (or dropping the builder) releases the face's
/// source file, after which the face is immutable.
#[derive(Debug)]
pub struct FaceBuilder<'a> {
    pub(crate) font: &'a mut Font,
    pub(crate) id: FaceId,
}

impl<'a> FaceBuilder<'a> {
    /// Identifier of the face being built
    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    /// Access the face being built
    pub fn face(&self) -> &Face {
        &self.font.faces[self.id.get()]
    }

    pub(crate) fn face_mut(&mut self) -> &mut Face {
        &mut self.font.faces[self.id.get()]
    }

    fn fail(&mut self, err: FontError) -> FontError {
        log::error!("Face {}: {err}", self.id.0);
        self.font.has_failures = true;
        self.face_mut().flags.remove(FaceFlags::VALID);
        err
    }

    /// Replace the source file of the face
    ///
    /// Later bakes use the new source. Underline metrics are not re-read.
    pub fn change_source(&mut self, source: FaceSource) {
        self.face_mut().source = Some(source);
    }

    /// Mark this face as the font's default
    pub fn make_default(&mut self) -> Result<(), FontError> {
        self.font.make_default(self.id)
    }

    /// Rasterize `ranges` with `baker` and add the result as a new bake
    ///
    /// On failure the face is marked invalid and the font as having failures;
    /// the face remains usable with its other bakes.
    ///
    /// Returns the index of the new bake within the face.
    pub fn add_bake<B: GlyphBaker + ?Sized>(
        &mut self,
        baker: &mut B,
        atlas_size: (u32, u32),
        ranges: &[RangeSpec],
    ) -> Result<usize, FontError> {
        if atlas_size.0 == 0 || atlas_size.1 == 0 {
            return Err(FontError::InvalidBakeSize(atlas_size));
        }
        if ranges.is_empty() {
            return Err(FontError::NoRanges);
        }
        if let Some(spec) = ranges.iter().find(|spec| spec.end().is_none()) {
            return Err(FontError::InvalidRange(spec.clone()));
        }

        let face = self.face();
        let request = BakeRequest {
            size: face.size,
            bold: face.is_bold(),
            italic: face.is_italic(),
            atlas_size,
            ranges,
        };
        let Some(source) = face.source.as_ref() else {
            return Err(FontError::FaceNotActive);
        };
        let result = baker.bake(source, &request);
        match result {
            Ok(data) => self.add_baked(data, ranges),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Add already-rasterized glyph data as a new bake
    ///
    /// `data` must hold one glyph per codepoint of `ranges`, in order.
    pub fn add_baked(&mut self, data: BakeData, ranges: &[RangeSpec]) -> Result<usize, FontError> {
        if !self.face().is_active() {
            return Err(FontError::FaceNotActive);
        }
        if ranges.is_empty() {
            return Err(FontError::NoRanges);
        }
        if let Some(spec) = ranges.iter().find(|spec| spec.end().is_none()) {
            return Err(FontError::InvalidRange(spec.clone()));
        }
        let expected: usize = ranges.iter().map(RangeSpec::len).sum();
        if data.glyphs.len() != expected {
            let err = FontError::GlyphMismatch {
                expected,
                found: data.glyphs.len(),
            };
            return Err(self.fail(err));
        }

        let mut baked = data.glyphs.into_iter();
        let mut built = smallvec::SmallVec::new();
        for spec in ranges {
            let mut glyphs = Vec::with_capacity(spec.len());
            for codepoint in spec.codepoints() {
                let glyph = baked.next().unwrap_or_default();
                if glyph.codepoint != codepoint {
                    let err = FontError::GlyphMismatch {
                        expected: to_usize(codepoint),
                        found: to_usize(glyph.codepoint),
                    };
                    return Err(self.fail(err));
                }
                glyphs.push(CharInfo {
                    index: glyphs.len(),
                    codepoint,
                    source: glyph.source,
                    render_offset: glyph.offset,
                    logical_offset: glyph.offset,
                    logical_size: glyph.source.size,
                    advance: glyph.advance,
                });
            }
            built.push(match spec {
                RangeSpec::Contiguous { first, .. } => GlyphRange::contiguous(*first, glyphs),
                RangeSpec::List(_) => GlyphRange::list(glyphs),
            });
        }

        let bake = Bake {
            flags: BakeFlags::VALID,
            texture: data.texture,
            atlas_size: Vec2(data.atlas_size.0 as f32, data.atlas_size.1 as f32),
            ranges: built,
        };
        let glyphs: usize = bake.ranges.iter().map(|r| r.glyphs.len()).sum();
        let index = self.face_mut().push_bake(bake, true);
        log::debug!("Face {}: added bake {index} with {glyphs} glyphs", self.id.0);
        Ok(index)
    }

    /// Finish construction, releasing the source file
    pub fn finish(self) -> FaceId {
        self.id
    }
}

impl<'a> Drop for FaceBuilder<'a> {
    fn drop(&mut self) {
        let id = self.id;
        let face = self.face_mut();
        if face.is_active() {
            face.flags.remove(FaceFlags::ACTIVE);
            face.source = None;
            log::debug!(
                "Face {}: finished ({} glyphs in {} bakes)",
                id.0,
                face.num_chars,
                face.bakes.len()
            );
        }
    }
}

/// Placeholder box size, in points, for glyphs missing from `face`
///
/// Height is the face's point size and width three quarters of it; without
/// a face, 5×10.
pub(crate) fn placeholder_size(face: Option<&Face>) -> Vec2 {
    match face {
        Some(face) => {
            let height = face.size as f32;
            Vec2((height * 0.75).round(), height)
        }
        None => Vec2(5.0, 10.0),
    }
}

/// Placeholder rectangle at the pen `pos`
pub(crate) fn placeholder_rect(face: Option<&Face>, pos: Vec2, scale: f32) -> Rect {
    let size = placeholder_size(face);
    Rect::new(pos + Vec2(0.0, -size.1 * 0.9 * scale), size * scale)
}
