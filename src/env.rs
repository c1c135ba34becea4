// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text style and flow environment

use crate::fonts::{Face, FaceSelector, Font};
use crate::{Align, Color, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font, face request, scale and color of a text
#[derive(Clone, Copy, Debug)]
pub struct TextStyle<'a> {
    /// The font to draw from
    pub font: &'a Font,
    /// Face request
    ///
    /// The flow toggles bold and italic on a copy of this request.
    pub selector: FaceSelector,
    /// Output units per point
    ///
    /// All glyph metrics are multiplied by this. Must be positive.
    pub scale: f32,
    /// Tint of glyphs from single-channel bakes
    pub color: Color,
}

impl<'a> TextStyle<'a> {
    /// Construct with the font's default face at unit scale
    pub fn new(font: &'a Font) -> Self {
        TextStyle {
            font,
            selector: FaceSelector::default_face(),
            scale: 1.0,
            color: Color::WHITE,
        }
    }

    /// Set the face request
    #[must_use]
    pub fn with_selector(mut self, selector: FaceSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the color
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The face selected by this style, if any
    pub fn face(&self) -> Option<&'a Face> {
        self.font
            .select_face(self.selector)
            .and_then(|id| self.font.face(id))
    }

    /// Scaled line height
    ///
    /// Uses the selected face's logical metrics, or the requested point size
    /// if the font has no faces.
    pub fn line_height(&self) -> f32 {
        let h = match self.face() {
            Some(face) => face.line_height(),
            None => self.selector.size as f32,
        };
        h * self.scale
    }

    /// Scaled maximum ascent above the baseline
    pub fn max_ascend(&self) -> f32 {
        let a = match self.face() {
            Some(face) => face.metrics().max_ascend,
            None => self.selector.size as f32,
        };
        a * self.scale
    }

    /// Scaled maximum descent below the baseline
    pub fn max_descend(&self) -> f32 {
        self.face().map(|face| face.metrics().max_descend).unwrap_or(0.0) * self.scale
    }
}

/// Position and layout constraints of a flow
///
/// An `Environment` can be default-constructed: origin, left-aligned and
/// without line-wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Environment {
    /// Pen position (on the baseline) of the first glyph
    pub pos: Vec2,
    /// Horizontal alignment relative to `pos`
    pub align: Align,
    /// Maximum line width
    ///
    /// Zero or negative disables wrapping.
    pub max_width: f32,
}

impl Environment {
    /// Alternative default constructor
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct at `pos` with no wrapping
    pub fn at(pos: Vec2) -> Self {
        Environment {
            pos,
            ..Default::default()
        }
    }

    /// True if the flow needs to look ahead for line ends
    ///
    /// This is the case when wrapping or when not left-aligned.
    #[inline]
    pub fn needs_line_breaks(&self) -> bool {
        self.max_width > 0.0 || self.align != Align::Left
    }
}
