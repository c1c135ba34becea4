// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font: an owned collection of faces

use super::{
    BakeError, Bake, CharInfo, Face, FaceBuilder, FaceFlags, FaceId, FaceSelector, FaceSource,
    GlyphRange, RangeSpec,
};
use crate::conv::to_u32;
use thiserror::Error;

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("face is finished; no more bakes may be added")]
    FaceNotActive,
    #[error("font already has a default face ({0:?})")]
    DefaultAlreadySet(FaceId),
    #[error("invalid face size: {0}")]
    InvalidSize(i32),
    #[error("invalid bake size: {0:?}")]
    InvalidBakeSize((u32, u32)),
    #[error("no codepoint ranges given")]
    NoRanges,
    #[error("codepoint range exceeds u32: {0:?}")]
    InvalidRange(RangeSpec),
    #[error("baked glyphs do not match request (expected {expected}, found {found})")]
    GlyphMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Bake(#[from] BakeError),
    #[error("font load error")]
    TtfParser(#[from] ttf_parser::FaceParsingError),
    #[error("no font match")]
    NoFontMatch,
}

/// Result of [`Font::glyph_for_selector`]
#[derive(Clone, Copy, Debug)]
pub struct GlyphLookup<'a> {
    pub face_id: FaceId,
    pub face: &'a Face,
    pub bake: &'a Bake,
    pub range: &'a GlyphRange,
    pub info: &'a CharInfo,
}

/// A font: an ordered collection of [`Face`]s
///
/// Faces are added with [`Self::start_face`] during asset load. Once loading
/// is complete the font is read-only and may be shared between threads for
/// any number of concurrent flows.
#[derive(Clone, Debug, Default)]
pub struct Font {
    pub(crate) faces: Vec<Face>,
    pub(crate) default_face: Option<FaceId>,
    pub(crate) has_failures: bool,
}

impl Font {
    /// Construct an empty font
    pub fn new() -> Self {
        Font::default()
    }

    /// Number of faces
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if the font has no faces
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// All faces, in declaration order
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get a face
    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.get())
    }

    /// The face flagged as default, if any
    #[inline]
    pub fn default_face(&self) -> Option<FaceId> {
        self.default_face
    }

    /// True if at least one face is valid
    pub fn is_valid(&self) -> bool {
        self.faces.iter().any(Face::is_valid)
    }

    /// True if any bake of any face failed
    #[inline]
    pub fn has_failures(&self) -> bool {
        self.has_failures
    }

    /// Start construction of a new face
    ///
    /// `source` is the font file for the face, passed to the
    /// [`GlyphBaker`](super::GlyphBaker) on each bake and released when the
    /// returned builder finishes.
    pub fn start_face(
        &mut self,
        size: i32,
        bold: bool,
        italic: bool,
        source: FaceSource,
    ) -> Result<FaceBuilder<'_>, FontError> {
        if size <= 0 {
            return Err(FontError::InvalidSize(size));
        }
        let id = FaceId(to_u32(self.faces.len()));
        log::debug!("Font: starting face {} (size {size}, bold={bold}, italic={italic})", id.0);
        self.faces.push(Face::new(size, bold, italic, source));
        Ok(FaceBuilder { font: self, id })
    }

    /// Designate `id` as the default face
    ///
    /// Fails if another face is already the default.
    pub fn make_default(&mut self, id: FaceId) -> Result<(), FontError> {
        if let Some(existing) = self.default_face {
            if existing != id {
                return Err(FontError::DefaultAlreadySet(existing));
            }
        }
        let face = self.faces.get_mut(id.get()).ok_or(FontError::FaceNotActive)?;
        face.flags.insert(FaceFlags::DEFAULT);
        self.default_face = Some(id);
        log::info!("Font: face {} (size {}) is default", id.0, face.size);
        Ok(())
    }

    /// Resolve the face best matching `selector`
    ///
    /// A default request yields the face flagged default, else the first
    /// face, whatever its other fields. Otherwise the face of lowest
    /// [`FaceSelector::cost`] wins, ties going to the first declared.
    ///
    /// Returns `None` only when the font has no faces.
    pub fn select_face(&self, selector: FaceSelector) -> Option<FaceId> {
        if self.faces.is_empty() {
            return None;
        }
        if selector.select_default {
            return Some(self.default_face.unwrap_or(FaceId(0)));
        }

        let mut best = None;
        let mut best_cost = u64::MAX;
        for (i, face) in self.faces.iter().enumerate() {
            let cost = selector.cost(face);
            if cost < best_cost {
                best = Some(FaceId(to_u32(i)));
                best_cost = cost;
            }
        }
        best
    }

    /// Find a glyph via `selector`, without any fallback
    pub fn glyph_for_selector(
        &self,
        selector: FaceSelector,
        codepoint: u32,
    ) -> Option<GlyphLookup<'_>> {
        let face_id = self.select_face(selector)?;
        let face = &self.faces[face_id.get()];
        face.bakes.iter().find_map(|bake| {
            bake.find(codepoint).map(|(range, info)| GlyphLookup {
                face_id,
                face,
                bake,
                range,
                info,
            })
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fonts::{BakeData, BakeRequest, BakedGlyph, GlyphBaker, RangeSpec, TextureId};
    use crate::{Rect, Vec2};

    /// Baker producing a monospace grid of glyphs
    ///
    /// Each glyph is `width`×`height` with its top `ascend` above the
    /// baseline and advance `advance`; space has an empty bitmap.
    pub(crate) struct GridBaker {
        pub width: f32,
        pub height: f32,
        pub ascend: f32,
        pub advance: f32,
        pub fail: bool,
        pub next_texture: u64,
    }

    impl Default for GridBaker {
        fn default() -> Self {
            GridBaker {
                width: 8.0,
                height: 10.0,
                ascend: 8.0,
                advance: 10.0,
                fail: false,
                next_texture: 1,
            }
        }
    }

    impl GlyphBaker for GridBaker {
        fn bake(
            &mut self,
            _: &FaceSource,
            request: &BakeRequest<'_>,
        ) -> Result<BakeData, BakeError> {
            if self.fail {
                return Err(BakeError("out of atlas space".into()));
            }
            let texture = TextureId(self.next_texture);
            self.next_texture += 1;
            let mut glyphs = vec![];
            for (i, codepoint) in request.ranges.iter().flat_map(|r| r.codepoints()).enumerate() {
                let size = if codepoint == u32::from(' ') {
                    Vec2::ZERO
                } else {
                    Vec2(self.width, self.height)
                };
                glyphs.push(BakedGlyph {
                    codepoint,
                    source: Rect::new(Vec2(i as f32 * self.width, 0.0), size),
                    offset: Vec2(0.0, -self.ascend),
                    advance: self.advance,
                });
            }
            Ok(BakeData {
                texture,
                atlas_size: request.atlas_size,
                glyphs,
            })
        }
    }

    pub(crate) const ASCII: RangeSpec = RangeSpec::Contiguous {
        first: 32,
        count: 95,
    };

    /// Font with a regular (default) and bold face at size 16
    ///
    /// Regular glyphs advance 10 points and bold glyphs 12.
    pub(crate) fn test_font() -> Font {
        let mut font = Font::new();
        let mut baker = GridBaker::default();
        let mut face = font
            .start_face(16, false, false, FaceSource::default())
            .unwrap();
        face.add_bake(&mut baker, (256, 256), &[ASCII]).unwrap();
        face.make_default().unwrap();
        face.finish();

        baker.advance = 12.0;
        baker.width = 10.0;
        let mut face = font.start_face(16, true, false, FaceSource::default()).unwrap();
        face.add_bake(&mut baker, (256, 256), &[ASCII]).unwrap();
        face.finish();
        font
    }

    #[test]
    fn face_lifecycle() {
        let mut font = Font::new();
        let mut baker = GridBaker::default();
        let mut face = font.start_face(12, false, false, FaceSource::default()).unwrap();
        assert!(face.face().is_active());
        assert!(face.face().source().is_some());
        face.add_bake(&mut baker, (64, 64), &[ASCII]).unwrap();
        let id = face.finish();

        let face = font.face(id).unwrap();
        assert!(!face.is_active());
        assert!(face.source().is_none());
        assert_eq!(face.num_chars(), 95);
        assert_eq!(face.codepoint_range(), Some(32..127));
        assert_eq!(face.line_height(), 10.0);
        assert_eq!(face.metrics().max_ascend, 8.0);
        assert_eq!(face.metrics().max_descend, 2.0);
        assert_eq!(face.underline_offset(), 2.0);
    }

    #[test]
    fn dropped_builder_finishes() {
        let mut font = Font::new();
        {
            let _face = font.start_face(12, false, false, FaceSource::default()).unwrap();
        }
        assert!(!font.faces()[0].is_active());
    }

    #[test]
    fn failed_bake_marks_font() {
        let mut font = Font::new();
        let mut baker = GridBaker::default();
        let mut face = font.start_face(12, false, false, FaceSource::default()).unwrap();
        face.add_bake(&mut baker, (64, 64), &[ASCII]).unwrap();
        baker.fail = true;
        let err = face.add_bake(&mut baker, (64, 64), &[RangeSpec::List(vec![0x2022])]);
        assert!(matches!(err, Err(FontError::Bake(_))));
        face.finish();

        assert!(font.has_failures());
        assert!(!font.faces()[0].is_valid());
        assert!(!font.is_valid());
        // glyphs from the good bake are still found
        assert!(font.glyph_for_selector(FaceSelector::default_face(), 65).is_some());
    }

    #[test]
    fn bake_validation() {
        let mut font = Font::new();
        let mut baker = GridBaker::default();
        assert!(matches!(
            font.start_face(0, false, false, FaceSource::default()),
            Err(FontError::InvalidSize(0))
        ));
        let mut face = font.start_face(12, false, false, FaceSource::default()).unwrap();
        assert!(matches!(
            face.add_bake(&mut baker, (0, 64), &[ASCII]),
            Err(FontError::InvalidBakeSize(_))
        ));
        assert!(matches!(
            face.add_bake(&mut baker, (64, 64), &[]),
            Err(FontError::NoRanges)
        ));
        let past_end = RangeSpec::Contiguous { first: u32::MAX, count: 2 };
        assert!(matches!(
            face.add_bake(&mut baker, (64, 64), &[ASCII, past_end.clone()]),
            Err(FontError::InvalidRange(spec)) if spec == past_end
        ));
        assert!(matches!(
            face.add_baked(BakeData::default(), &[RangeSpec::List(vec![u32::MAX])]),
            Err(FontError::InvalidRange(_))
        ));
        let data = BakeData::default();
        assert!(matches!(
            face.add_baked(data, &[ASCII]),
            Err(FontError::GlyphMismatch { expected: 95, found: 0 })
        ));
    }

    #[test]
    fn single_default() {
        let mut font = Font::new();
        let a = font.start_face(12, false, false, FaceSource::default()).unwrap().finish();
        let b = font.start_face(14, false, false, FaceSource::default()).unwrap().finish();
        font.make_default(b).unwrap();
        assert!(matches!(font.make_default(a), Err(FontError::DefaultAlreadySet(id)) if id == b));
        assert_eq!(font.faces().iter().filter(|f| f.is_default()).count(), 1);
        assert_eq!(font.select_face(FaceSelector::default_face()), Some(b));
    }

    #[test]
    fn select_face() {
        let mut font = Font::new();
        assert_eq!(font.select_face(FaceSelector::default_face()), None);
        assert_eq!(font.select_face(FaceSelector::new(12, false, false)), None);

        let bold16 = font.start_face(16, true, false, FaceSource::default()).unwrap().finish();
        // only a 16-bold face: any request resolves to it
        assert_eq!(font.select_face(FaceSelector::new(14, false, false)), Some(bold16));
        // no face is flagged default: the first face is
        assert_eq!(font.select_face(FaceSelector::default_face()), Some(bold16));

        let reg14 = font.start_face(14, false, false, FaceSource::default()).unwrap().finish();
        let reg16 = font.start_face(16, false, false, FaceSource::default()).unwrap().finish();
        assert_eq!(font.select_face(FaceSelector::new(14, false, false)), Some(reg14));
        assert_eq!(font.select_face(FaceSelector::new(16, false, false)), Some(reg16));
        assert_eq!(font.select_face(FaceSelector::new(16, true, true)), Some(bold16));
        // equal cost: first declared wins
        assert_eq!(font.select_face(FaceSelector::new(15, false, false)), Some(reg14));

        font.make_default(reg16).unwrap();
        let mut bold_default = FaceSelector::default_face();
        assert_eq!(font.select_face(bold_default), Some(reg16));
        // style and size are ignored for default requests
        bold_default.bold = true;
        bold_default.size = 14;
        assert_eq!(font.select_face(bold_default), Some(reg16));
    }

    #[test]
    fn glyph_lookup() {
        let font = test_font();
        let found = font.glyph_for_selector(FaceSelector::new(16, true, false), 65).unwrap();
        assert!(found.face.is_bold());
        assert_eq!(found.info.advance, 12.0);
        assert!(found.range.is_contiguous());
        assert!(font.glyph_for_selector(FaceSelector::default_face(), 0xE9).is_none());
    }
}
