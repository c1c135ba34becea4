// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Sprite sheets as glyph bakes
//!
//! A sprite sheet is a grid of equally sized frames, each of which may be
//! bound to a codepoint. Bound frames become the glyphs of a single
//! non-contiguous range, allowing icons to be flowed inline with text.

use super::{Bake, BakeFlags, CharInfo, FaceBuilder, FontError, GlyphRange, TextureId};
use crate::{Rect, Vec2};

/// One frame of a [`SpriteSheet`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteFrame {
    /// Codepoint bound to this frame; zero for none
    pub codepoint: u32,
    /// Column and row within the sheet
    pub grid_pos: (u32, u32),
    /// Bounds of the drawn glyph, relative to the frame's top-left
    pub char_bounds: Rect,
    /// Offset applied when drawing, from the glyph's baseline-aligned position
    pub char_offset: Vec2,
    /// Bounds used for layout, relative to the frame; defaults to `char_bounds`
    pub logical_bounds: Option<Rect>,
    pub advance: f32,
}

/// A grid of sprite frames in a single texture
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpriteSheet {
    pub texture: TextureId,
    /// Size of the whole texture
    pub texture_size: (u32, u32),
    /// Size of each frame, excluding padding
    pub frame_size: (u32, u32),
    /// Padding on each side of each frame
    pub padding: u32,
    pub frames: Vec<SpriteFrame>,
}

impl SpriteSheet {
    /// Top-left of the frame at `grid_pos` within the texture
    pub fn frame_pos(&self, grid_pos: (u32, u32)) -> Vec2 {
        let stride_x = self.frame_size.0 + 2 * self.padding;
        let stride_y = self.frame_size.1 + 2 * self.padding;
        Vec2(
            (grid_pos.0 * stride_x + self.padding) as f32,
            (grid_pos.1 * stride_y + self.padding) as f32,
        )
    }

    fn char_info(&self, index: usize, frame: &SpriteFrame) -> CharInfo {
        let frame_pos = self.frame_pos(frame.grid_pos);
        let source = Rect::new(frame_pos + frame.char_bounds.pos, frame.char_bounds.size);
        let render_offset = Vec2(0.0, -source.size.1) + frame.char_offset;
        let (logical_offset, logical_size) = match frame.logical_bounds {
            Some(bounds) => (
                render_offset + bounds.pos - frame.char_bounds.pos,
                bounds.size,
            ),
            None => (render_offset, source.size),
        };
        CharInfo {
            index,
            codepoint: frame.codepoint,
            source,
            render_offset,
            logical_offset,
            logical_size,
            advance: frame.advance,
        }
    }
}

impl<'a> FaceBuilder<'a> {
    /// Add the frames of `sheet` bound to a codepoint as a new bake
    ///
    /// A `scalable` bake is drawn at the face's line height whatever its
    /// frame size, and so does not contribute to the face's metrics. A
    /// `colored` bake is drawn without tint.
    ///
    /// Returns the index of the new bake within the face.
    pub fn add_sprite_bake(
        &mut self,
        sheet: &SpriteSheet,
        scalable: bool,
        colored: bool,
    ) -> Result<usize, FontError> {
        if !self.face().is_active() {
            return Err(FontError::FaceNotActive);
        }
        if sheet.texture_size.0 == 0 || sheet.texture_size.1 == 0 {
            return Err(FontError::InvalidBakeSize(sheet.texture_size));
        }

        let glyphs: Vec<CharInfo> = sheet
            .frames
            .iter()
            .filter(|frame| frame.codepoint != 0)
            .enumerate()
            .map(|(index, frame)| sheet.char_info(index, frame))
            .collect();
        if glyphs.is_empty() {
            return Err(FontError::NoRanges);
        }
        let num_glyphs = glyphs.len();

        let mut flags = BakeFlags::VALID | BakeFlags::SPRITE;
        flags.set(BakeFlags::SCALABLE, scalable);
        flags.set(BakeFlags::COLORED, colored);
        let bake = Bake {
            flags,
            texture: sheet.texture,
            atlas_size: Vec2(sheet.texture_size.0 as f32, sheet.texture_size.1 as f32),
            ranges: [GlyphRange::list(glyphs)].into_iter().collect(),
        };
        let index = self.face_mut().push_bake(bake, !scalable);
        log::debug!(
            "Face {}: added sprite bake {index} with {num_glyphs} glyphs",
            self.id.0
        );
        Ok(index)
    }
}
