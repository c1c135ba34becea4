// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Selection rectangles and highlighting

use crate::env::{Environment, TextStyle};
use crate::flow::{flow, FlowCallbacks, FlowChar, FlowState};
use crate::{Color, Rect, Vec2};
use std::ops::Range;

struct SelectionRects {
    range: Range<usize>,
    start: Option<Vec2>,
    rects: Vec<Rect>,
}

impl SelectionRects {
    fn push(&mut self, state: &FlowState<'_>) {
        let Some(start) = self.start.take() else {
            return;
        };
        let line = state.line_rect();
        let (top, height) = if line.size.1 > 0.0 {
            (line.pos.1, line.size.1)
        } else {
            // nothing drawn on this line: use the face metrics
            let scale = state.scale();
            match state.face() {
                Some(face) => (
                    state.pos().1 - face.metrics().max_ascend * scale,
                    face.line_height() * scale,
                ),
                None => (state.pos().1, 0.0),
            }
        };
        self.rects.push(Rect::new(
            Vec2(start.0, top),
            Vec2(state.pos().0 - start.0, height),
        ));
    }
}

impl FlowCallbacks for SelectionRects {
    fn before_line(&mut self, _: usize, byte: usize, state: &mut FlowState<'_>) {
        self.start = self.range.contains(&byte).then(|| state.pos());
    }

    fn after_line(&mut self, _: bool, _: usize, _: usize, state: &mut FlowState<'_>) {
        self.push(state);
    }

    fn between_char(&mut self, byte: usize, _: usize, pos: Vec2, state: &mut FlowState<'_>) {
        if byte == self.range.start {
            self.start = Some(pos);
        }
        if byte == self.range.end {
            self.push(state);
        }
    }
}

/// Rectangles covering the text in `range` (byte indices)
///
/// Text is flowed as by [`find_cursor_index`](super::find_cursor_index).
/// One rectangle is produced per line touched by the selection, spanning
/// from the selection start (or line start) to the selection end (or line
/// end) and vertically over the line's glyphs. An empty range yields no
/// rectangles.
pub fn selection_rects<T: AsRef<[u8]> + ?Sized>(
    text: &T,
    style: &TextStyle<'_>,
    max_width: f32,
    range: Range<usize>,
) -> Vec<Rect> {
    if range.is_empty() {
        return vec![];
    }
    let env = Environment {
        max_width,
        ..Default::default()
    };
    let mut state = FlowState::new(text, style, &env);
    let mut sel = SelectionRects {
        range,
        start: None,
        rects: vec![],
    };
    flow(&mut state, &mut sel, None);
    sel.rects
}

/// Callbacks drawing glyphs in a byte range with another color
///
/// Use with [`render_text`](super::render_text). Glyphs from colored bakes
/// are unaffected.
#[derive(Clone, Debug)]
pub struct HighlightRange {
    pub range: Range<usize>,
    pub color: Color,
    saved: Option<Color>,
}

impl HighlightRange {
    /// Construct
    pub fn new(range: Range<usize>, color: Color) -> Self {
        HighlightRange {
            range,
            color,
            saved: None,
        }
    }
}

impl FlowCallbacks for HighlightRange {
    fn before_char(&mut self, _: &FlowChar<'_>, state: &mut FlowState<'_>) -> bool {
        let inside = self.range.contains(&state.byte_index());
        if inside && self.saved.is_none() {
            self.saved = Some(state.color());
            state.set_color(self.color);
        } else if !inside {
            if let Some(color) = self.saved.take() {
                state.set_color(color);
            }
        }
        true
    }
}
