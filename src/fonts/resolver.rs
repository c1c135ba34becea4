// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph resolution with style degradation

use super::{Bake, CharInfo, Face, FaceId, FaceSelector, Font};

/// A glyph resolved for a flow
#[derive(Clone, Copy, Debug)]
pub struct ResolvedGlyph<'a> {
    pub face: &'a Face,
    pub bake: &'a Bake,
    pub info: &'a CharInfo,
}

impl<'a> ResolvedGlyph<'a> {
    /// Render size correction of scalable bakes
    ///
    /// Scalable glyphs are drawn at the face's render line height regardless
    /// of their bitmap size; for other bakes this is 1.
    pub fn scalable_effect(&self) -> f32 {
        let height = self.info.render_size().1;
        if !self.bake.is_scalable() || height <= 0.0 {
            return 1.0;
        }
        let mut target = self.face.render_metrics().line_height;
        if target <= 0.0 {
            target = self.face.size() as f32;
        }
        target / height
    }
}

/// One-entry cache of the last resolved face and bake
///
/// The cache holds indices into the [`Font`], not references, so that copies
/// of a flow state are cheap and independent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphCache {
    face: Option<FaceId>,
    bake: Option<usize>,
}

impl GlyphCache {
    /// Construct, pre-selecting the face for `selector`
    pub fn new(font: &Font, selector: FaceSelector) -> Self {
        GlyphCache {
            face: font.select_face(selector),
            bake: None,
        }
    }

    /// Forget the cached face and bake
    #[inline]
    pub fn clear(&mut self) {
        *self = GlyphCache::default();
    }

    /// The cached face, if any
    #[inline]
    pub fn face_id(&self) -> Option<FaceId> {
        self.face
    }

    /// Get the cached face
    pub fn face<'a>(&self, font: &'a Font) -> Option<&'a Face> {
        self.face.and_then(|id| font.face(id))
    }

    /// Get the cached face, selecting (and caching) one if missing
    pub fn face_or_select<'a>(
        &mut self,
        font: &'a Font,
        selector: FaceSelector,
    ) -> Option<&'a Face> {
        if self.face.is_none() {
            self.face = font.select_face(selector);
            self.bake = None;
        }
        self.face(font)
    }

    /// The face used to size placeholder glyphs
    ///
    /// This is the cached face, else the font's default face.
    pub fn placeholder_face<'a>(&self, font: &'a Font) -> Option<&'a Face> {
        self.face(font).or_else(|| {
            font.select_face(FaceSelector::default_face())
                .and_then(|id| font.face(id))
        })
    }

    /// Resolve a glyph for `codepoint`
    ///
    /// Tries the cached face and bake, then the face freshly selected for
    /// `selector`, then (for bold or italic requests) the face selected for
    /// the same size without style. Each step that selects a face replaces
    /// the cache, so after a style-stripped lookup the unstyled face stays
    /// cached until it misses.
    pub fn resolve<'a>(
        &mut self,
        font: &'a Font,
        selector: FaceSelector,
        codepoint: u32,
    ) -> Option<ResolvedGlyph<'a>> {
        if let Some(face) = self.face(font) {
            let found = match self.bake {
                Some(index) => face
                    .bake(index)
                    .and_then(|bake| bake.find(codepoint).map(|(_, info)| (index, info))),
                None => face.find_glyph(codepoint),
            };
            if let Some((index, info)) = found {
                self.bake = Some(index);
                let bake = &face.bakes[index];
                return Some(ResolvedGlyph { face, bake, info });
            }
        }

        self.face = font.select_face(selector);
        self.bake = None;
        let face = self.face(font)?;
        if let Some((index, info)) = face.find_glyph(codepoint) {
            self.bake = Some(index);
            let bake = &face.bakes[index];
            return Some(ResolvedGlyph { face, bake, info });
        }

        if selector.is_styled() {
            self.face = font.select_face(selector.without_style());
            let face = self.face(font)?;
            if let Some((index, info)) = face.find_glyph(codepoint) {
                log::trace!("glyph {codepoint:#x}: using unstyled face (size {})", face.size());
                self.bake = Some(index);
                let bake = &face.bakes[index];
                return Some(ResolvedGlyph { face, bake, info });
            }
        }

        log::trace!("glyph {codepoint:#x}: not found");
        None
    }
}
