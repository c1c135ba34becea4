// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Cursor hit-testing

use crate::env::{Environment, TextStyle};
use crate::flow::{flow, FlowCallbacks, FlowState};
use crate::Vec2;

/// Result of [`find_cursor_index`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorHit {
    /// Byte index of the nearest position between characters
    pub byte_index: usize,
    /// Pen position at that index (on the baseline)
    pub position: Vec2,
}

struct Nearest {
    point: Vec2,
    best: Option<(CursorHit, f32)>,
}

impl FlowCallbacks for Nearest {
    fn between_char(&mut self, byte: usize, _: usize, pos: Vec2, _: &mut FlowState<'_>) {
        let dist = (self.point - pos).length();
        if self.best.map(|(_, best)| dist < best).unwrap_or(true) {
            let hit = CursorHit {
                byte_index: byte,
                position: pos,
            };
            self.best = Some((hit, dist));
        }
    }
}

/// Find the byte index nearest to `point`
///
/// Text is flowed left-aligned from the origin (with the first baseline at
/// zero), wrapping at `max_width` if positive. Candidates are the positions
/// between characters, including the end of the text; the first of equally
/// near candidates wins.
///
/// Returns `None` only if the flow reports no position, which does not
/// happen for any text.
pub fn find_cursor_index<T: AsRef<[u8]> + ?Sized>(
    text: &T,
    style: &TextStyle<'_>,
    max_width: f32,
    point: Vec2,
) -> Option<CursorHit> {
    let env = Environment {
        max_width,
        ..Default::default()
    };
    let mut state = FlowState::new(text, style, &env);
    let mut nearest = Nearest { point, best: None };
    flow(&mut state, &mut nearest, None);
    nearest.best.map(|(hit, _)| hit)
}

struct PositionOf {
    byte: usize,
    pos: Option<Vec2>,
}

impl FlowCallbacks for PositionOf {
    fn between_char(&mut self, byte: usize, _: usize, pos: Vec2, _: &mut FlowState<'_>) {
        if byte == self.byte && self.pos.is_none() {
            self.pos = Some(pos);
        }
    }
}

/// Pen position of the cursor at `byte_index`
///
/// The inverse of [`find_cursor_index`]: text is flowed in the same way.
/// Where a wrap puts one index at both the end of a line and the start of
/// the next, the former is returned.
///
/// When `max_width` is positive, the character ending each line (a space or
/// explicit `\n`) is consumed by the wrap and its own index has no position;
/// the index after it maps to the end of the line. Without wrapping, the
/// index of a `\n` is the end of its line.
///
/// Returns `None` if `byte_index` is not at a character boundary (or is a
/// consumed wrap character, or past the end).
pub fn cursor_position<T: AsRef<[u8]> + ?Sized>(
    text: &T,
    style: &TextStyle<'_>,
    max_width: f32,
    byte_index: usize,
) -> Option<Vec2> {
    let env = Environment {
        max_width,
        ..Default::default()
    };
    let mut state = FlowState::new(text, style, &env);
    let mut finder = PositionOf {
        byte: byte_index,
        pos: None,
    };
    flow(&mut state, &mut finder, None);
    finder.pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::library::tests::test_font;

    #[test]
    fn nearest_index() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let hit = |x, y| find_cursor_index("abc", &style, 0.0, Vec2(x, y)).unwrap();
        assert_eq!(hit(-5.0, 0.0).byte_index, 0);
        assert_eq!(hit(14.0, -4.0).byte_index, 1);
        assert_eq!(hit(100.0, 0.0).byte_index, 3);
        assert_eq!(hit(100.0, 0.0).position, Vec2(30.0, 0.0));
        // equidistant from 1 and 2: first wins
        assert_eq!(hit(15.0, 0.0).byte_index, 1);
    }

    #[test]
    fn empty_text() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let hit = find_cursor_index("", &style, 0.0, Vec2(3.0, 3.0)).unwrap();
        assert_eq!(hit.byte_index, 0);
        assert_eq!(hit.position, Vec2::ZERO);
    }

    #[test]
    fn second_line() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let hit = find_cursor_index("ab\ncd", &style, 0.0, Vec2(11.0, 9.0)).unwrap();
        assert_eq!(hit.byte_index, 4);
        assert_eq!(hit.position, Vec2(10.0, 10.0));
        assert_eq!(cursor_position("ab\ncd", &style, 0.0, 4), Some(hit.position));
        assert_eq!(cursor_position("ab\ncd", &style, 0.0, 9), None);
    }

    #[test]
    fn newline_index() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let text = "ab\ncd";
        assert_eq!(cursor_position(text, &style, 0.0, 2), Some(Vec2(20.0, 0.0)));
        assert_eq!(cursor_position(text, &style, 0.0, 3), Some(Vec2(0.0, 10.0)));
        // wrapping consumes the newline at the end of the line
        assert_eq!(cursor_position(text, &style, 1000.0, 2), None);
        assert_eq!(cursor_position(text, &style, 1000.0, 3), Some(Vec2(20.0, 0.0)));
        assert_eq!(cursor_position(text, &style, 1000.0, 4), Some(Vec2(10.0, 10.0)));
    }
}
