// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Flow callbacks

use super::FlowState;
use crate::fonts::CharInfo;
use crate::{Rect, Vec2};

/// A glyph about to be (or just) drawn
#[derive(Clone, Copy, Debug)]
pub struct FlowChar<'a> {
    /// Codepoint (tabs are reported as spaces)
    pub codepoint: u32,
    pub info: &'a CharInfo,
    /// Bounds contributing to text measurement
    pub logical: Rect,
    /// Destination of the glyph bitmap
    pub render: Rect,
}

/// Hooks into a flow
///
/// All methods have a no-op default. For each character, calls happen in the
/// order `between_char`, `before_char`, `after_char`; each line is bracketed
/// by one `before_line` and one `after_line`.
///
/// The state may only be modified through [`FlowState::set_color`].
pub trait FlowCallbacks {
    /// A line is starting at `byte`
    fn before_line(&mut self, _line: usize, _byte: usize, _state: &mut FlowState<'_>) {}

    /// A line is ending at `byte`
    ///
    /// `wrapped` is true when the line ends because of the maximum width.
    fn after_line(
        &mut self,
        _wrapped: bool,
        _line: usize,
        _byte: usize,
        _state: &mut FlowState<'_>,
    ) {
    }

    /// The pen is at `pos`, before the character at `byte`
    ///
    /// Also called once after the last character, at the final pen position.
    fn between_char(
        &mut self,
        _byte: usize,
        _char_index: usize,
        _pos: Vec2,
        _state: &mut FlowState<'_>,
    ) {
    }

    /// A glyph with a non-empty bitmap is about to be drawn
    ///
    /// Return false to skip it: it is then neither drawn nor included in
    /// measured bounds, though the pen still advances.
    fn before_char(&mut self, _c: &FlowChar<'_>, _state: &mut FlowState<'_>) -> bool {
        true
    }

    /// A glyph has been drawn
    fn after_char(&mut self, _c: &FlowChar<'_>, _state: &mut FlowState<'_>) {}
}

impl FlowCallbacks for () {}

impl<T: FlowCallbacks + ?Sized> FlowCallbacks for &mut T {
    fn before_line(&mut self, line: usize, byte: usize, state: &mut FlowState<'_>) {
        (**self).before_line(line, byte, state)
    }

    fn after_line(&mut self, wrapped: bool, line: usize, byte: usize, state: &mut FlowState<'_>) {
        (**self).after_line(wrapped, line, byte, state)
    }

    fn between_char(
        &mut self,
        byte: usize,
        char_index: usize,
        pos: Vec2,
        state: &mut FlowState<'_>,
    ) {
        (**self).between_char(byte, char_index, pos, state)
    }

    fn before_char(&mut self, c: &FlowChar<'_>, state: &mut FlowState<'_>) -> bool {
        (**self).before_char(c, state)
    }

    fn after_char(&mut self, c: &FlowChar<'_>, state: &mut FlowState<'_>) {
        (**self).after_char(c, state)
    }
}

/// Chain two sets of callbacks
///
/// Both are called, first `A` then `B`. A character is drawn only if both
/// accept it in [`FlowCallbacks::before_char`].
impl<A: FlowCallbacks, B: FlowCallbacks> FlowCallbacks for (A, B) {
    fn before_line(&mut self, line: usize, byte: usize, state: &mut FlowState<'_>) {
        self.0.before_line(line, byte, state);
        self.1.before_line(line, byte, state);
    }

    fn after_line(&mut self, wrapped: bool, line: usize, byte: usize, state: &mut FlowState<'_>) {
        self.0.after_line(wrapped, line, byte, state);
        self.1.after_line(wrapped, line, byte, state);
    }

    fn between_char(
        &mut self,
        byte: usize,
        char_index: usize,
        pos: Vec2,
        state: &mut FlowState<'_>,
    ) {
        self.0.between_char(byte, char_index, pos, state);
        self.1.between_char(byte, char_index, pos, state);
    }

    fn before_char(&mut self, c: &FlowChar<'_>, state: &mut FlowState<'_>) -> bool {
        let a = self.0.before_char(c, state);
        let b = self.1.before_char(c, state);
        a && b
    }

    fn after_char(&mut self, c: &FlowChar<'_>, state: &mut FlowState<'_>) {
        self.0.after_char(c, state);
        self.1.after_char(c, state);
    }
}
