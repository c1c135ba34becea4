// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Flow state: the walk cursor

use crate::env::{Environment, TextStyle};
use crate::fonts::{
    placeholder_rect, Face, FaceSelector, Font, GlyphCache, ResolvedGlyph,
    DEFAULT_UNDERLINE_OFFSET, DEFAULT_UNDERLINE_THICKNESS,
};
use crate::{Align, Color, Rect, Vec2};

/// A character placed at the pen
#[derive(Clone, Copy, Debug)]
pub(crate) enum Placed<'a> {
    /// A glyph was found
    Glyph {
        glyph: ResolvedGlyph<'a>,
        logical: Rect,
        render: Rect,
        advance: f32,
    },
    /// No glyph: a placeholder box is used
    Missing { rect: Rect, advance: f32 },
}

/// The complete state of a flow over some text
///
/// A state is created by [`FlowState::new`] and advanced by
/// [`flow`](super::flow). Callbacks receive the state read-only, except that
/// they may change the [color](Self::set_color) used for following glyphs.
#[derive(Clone, Debug)]
pub struct FlowState<'a> {
    pub(crate) text: &'a [u8],
    pub(crate) font: &'a Font,
    pub(crate) selector: FaceSelector,
    pub(crate) scale: f32,
    pub(crate) color: Color,
    pub(crate) start_pos: Vec2,
    pub(crate) align: Align,
    pub(crate) max_width: f32,

    pub(crate) byte_index: usize,
    pub(crate) char_index: usize,
    pub(crate) line_index: usize,
    pub(crate) column_index: usize,
    pub(crate) pos: Vec2,
    pub(crate) line_start: Vec2,
    pub(crate) line_rect: Rect,
    pub(crate) line_height: f32,
    pub(crate) underlined: bool,
    pub(crate) underline_start: Vec2,
    pub(crate) cache: GlyphCache,

    pub(crate) next_break: usize,
    pub(crate) break_width: f32,
    pub(crate) consume_at_break: bool,
    pub(crate) called_before_line: bool,
    pub(crate) called_after_line: bool,
}

impl<'a> FlowState<'a> {
    /// Construct a state at the start of `text`
    ///
    /// `text` is UTF-8; invalid sequences are consumed one byte at a time.
    pub fn new<T: AsRef<[u8]> + ?Sized>(
        text: &'a T,
        style: &TextStyle<'a>,
        env: &Environment,
    ) -> Self {
        debug_assert!(style.scale > 0.0, "scale must be positive");
        FlowState {
            text: text.as_ref(),
            font: style.font,
            selector: style.selector,
            scale: style.scale,
            color: style.color,
            start_pos: env.pos,
            align: env.align,
            max_width: env.max_width,

            byte_index: 0,
            char_index: 0,
            line_index: 0,
            column_index: 0,
            pos: env.pos,
            line_start: env.pos,
            line_rect: Rect::ZERO,
            line_height: 0.0,
            underlined: false,
            underline_start: env.pos,
            cache: GlyphCache::new(style.font, style.selector),

            next_break: 0,
            break_width: 0.0,
            consume_at_break: false,
            called_before_line: false,
            called_after_line: false,
        }
    }

    /// The text being flowed
    #[inline]
    pub fn text(&self) -> &'a [u8] {
        self.text
    }

    #[inline]
    pub fn font(&self) -> &'a Font {
        self.font
    }

    /// Current face request, including toggled bold and italic
    #[inline]
    pub fn selector(&self) -> FaceSelector {
        self.selector
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Tint for following glyphs
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the tint for following glyphs
    ///
    /// Called from [`FlowCallbacks::before_char`](super::FlowCallbacks::before_char)
    /// this affects the current glyph.
    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Position of the first line's start
    #[inline]
    pub fn start_pos(&self) -> Vec2 {
        self.start_pos
    }

    #[inline]
    pub fn align(&self) -> Align {
        self.align
    }

    #[inline]
    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Byte index of the next character
    #[inline]
    pub fn byte_index(&self) -> usize {
        self.byte_index
    }

    /// Index (in codepoints) of the next character
    #[inline]
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    #[inline]
    pub fn line_index(&self) -> usize {
        self.line_index
    }

    /// Column of the next character within its line (tabs count to the next stop)
    #[inline]
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    /// Pen position, on the baseline
    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Pen position at the start of the current line (after alignment)
    #[inline]
    pub fn line_start(&self) -> Vec2 {
        self.line_start
    }

    /// Logical bounds of glyphs so far on the current line
    ///
    /// Zero-sized until a glyph has been placed on the line.
    #[inline]
    pub fn line_rect(&self) -> Rect {
        self.line_rect
    }

    /// Unscaled height of the current line so far
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    #[inline]
    pub fn is_bold(&self) -> bool {
        self.selector.bold
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.selector.italic
    }

    #[inline]
    pub fn is_underlined(&self) -> bool {
        self.underlined
    }

    /// True when all text has been consumed
    #[inline]
    pub fn is_done(&self) -> bool {
        self.byte_index >= self.text.len()
    }

    /// Byte index of the end of the current line, if known
    ///
    /// Line ends are only computed when wrapping or aligning.
    pub fn next_line_break(&self) -> Option<usize> {
        self.needs_line_breaks().then_some(self.next_break)
    }

    /// The face of the last resolved glyph (or of the request)
    pub fn face(&self) -> Option<&'a Face> {
        self.cache.face(self.font)
    }

    #[inline]
    pub(crate) fn needs_line_breaks(&self) -> bool {
        self.max_width > 0.0 || self.align != Align::Left
    }

    pub(crate) fn toggle_bold(&mut self) {
        self.selector.bold = !self.selector.bold;
        self.cache.clear();
    }

    pub(crate) fn toggle_italic(&mut self) {
        self.selector.italic = !self.selector.italic;
        self.cache.clear();
    }

    /// Scaled underline offset from the pen and thickness
    pub(crate) fn underline_metrics(&self) -> (Vec2, f32) {
        let (offset, thickness) = match self.face() {
            Some(face) => (face.underline_offset(), face.underline_thickness()),
            None => (DEFAULT_UNDERLINE_OFFSET, DEFAULT_UNDERLINE_THICKNESS),
        };
        (Vec2(0.0, offset * self.scale), thickness * self.scale)
    }

    /// Underline segment from the underline start to the pen, if non-empty
    pub(crate) fn underline_rect(&self) -> Option<Rect> {
        let (offset, thickness) = self.underline_metrics();
        let end = self.pos + offset;
        if self.underline_start.approx_eq(end, 1e-4) {
            return None;
        }
        let mut rect = Rect::between(self.underline_start, end);
        if rect.size.1 < thickness {
            rect.size.1 = thickness;
        }
        Some(rect)
    }

    /// Resolve and place `codepoint` at the pen, without advancing
    ///
    /// `columns` is the number of columns the character occupies (more than
    /// one only for tabs). Both the main walk and line-break lookahead place
    /// characters through this method, so they agree on all metrics.
    pub(crate) fn place(&mut self, codepoint: u32, columns: usize) -> Placed<'a> {
        match self.cache.resolve(self.font, self.selector, codepoint) {
            Some(glyph) => {
                let k = self.scale * glyph.scalable_effect();
                let info = glyph.info;
                let render = Rect::new(self.pos + info.render_offset * k, info.render_size() * k);
                let logical = Rect::new(self.pos + info.logical_offset * k, info.logical_size * k);
                let advance = info.advance * columns as f32 * k;
                Placed::Glyph {
                    glyph,
                    logical,
                    render,
                    advance,
                }
            }
            None => {
                let face = self.cache.placeholder_face(self.font);
                let rect = placeholder_rect(face, self.pos, self.scale);
                let advance = rect.size.0 + 2.0 * self.scale;
                Placed::Missing { rect, advance }
            }
        }
    }

    /// Shift the line start for alignment, given the line width
    pub(crate) fn align_line(&mut self) {
        let shift = match self.align {
            Align::Left => return,
            Align::Centre => (self.break_width / 2.0).round(),
            Align::Right => self.break_width,
        };
        self.pos.0 -= shift;
        self.line_start.0 -= shift;
        self.underline_start.0 -= shift;
    }

    /// Compute the end of the line starting at the current byte, and align it
    pub(crate) fn start_line_layout(&mut self) {
        let lb = super::find_next_line_break(self);
        self.next_break = self.byte_index + lb.offset;
        self.break_width = lb.width;
        self.consume_at_break = lb.consume;
        debug_assert!(self.next_break > self.byte_index || lb.consume || self.is_done());
        self.align_line();
    }

    /// Move the pen to the start of the next line
    ///
    /// Returns the pending underline segment of the finished line, if any.
    pub(crate) fn line_break(&mut self) -> Option<Rect> {
        let face = self.cache.face_or_select(self.font, self.selector);
        if self.line_height == 0.0 {
            self.line_height = match face {
                Some(face) => face.line_height(),
                None => self.selector.size as f32,
            };
        }

        let underline = if self.underlined {
            self.underline_rect()
        } else {
            None
        };

        self.pos.0 = self.start_pos.0;
        self.pos.1 += self.line_height * self.scale;
        self.line_rect = Rect::ZERO;
        self.line_height = 0.0;
        self.line_start = self.pos;
        if self.underlined {
            self.underline_start = self.pos + self.underline_metrics().0;
        }
        self.line_index += 1;
        self.column_index = 0;
        self.called_before_line = false;
        self.called_after_line = false;
        underline
    }
}
