// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text flow: the layout walk
//!
//! A flow walks text one codepoint at a time, placing glyphs at a pen
//! position which advances along the baseline. Lines end at explicit `\n`
//! characters and, when a maximum width is set, at wrap points found by a
//! lookahead ([`find_next_line_break`]). Every consumer of layout (drawing,
//! measuring, hit-testing and selection) observes the same walk through
//! [`FlowCallbacks`], so they cannot disagree about glyph positions.
//!
//! ### Control characters
//!
//! Three bytes act as in-band style toggles and are never drawn:
//! [`BOLD_TOGGLE`], [`ITALIC_TOGGLE`] and [`UNDERLINE_TOGGLE`].

mod callbacks;
mod line_break;
mod state;

pub use callbacks::{FlowCallbacks, FlowChar};
pub use line_break::{find_next_line_break, is_punctuation_end, is_punctuation_start, LineBreak};
pub use state::FlowState;

use crate::conv::decode_utf8;
use crate::display::DrawTarget;
use crate::{Color, Rect, Vec2};
use state::Placed;

/// Toggles bold for following text (`'\b'`)
pub const BOLD_TOGGLE: u32 = 0x08;
/// Toggles italic for following text (`'\a'`)
pub const ITALIC_TOGGLE: u32 = 0x07;
/// Toggles underline for following text (`'\f'`)
pub const UNDERLINE_TOGGLE: u32 = 0x0C;

/// Statistics and bounds of a flow
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlowInfo {
    /// Pen position at the start
    pub start_pos: Vec2,
    /// Pen position at the end
    pub end_pos: Vec2,
    /// Union of the logical bounds of all drawn glyphs and placeholders
    pub logical_rect: Rect,
    /// Union of the render bounds of all drawn glyphs and placeholders
    pub render_rect: Rect,
    /// Glyphs drawn, including placeholders
    pub num_rendered: usize,
    /// Placeholders drawn for missing glyphs
    pub num_invalid: usize,
    /// Style toggles
    pub num_control: usize,
    /// Spaces, tabs and other glyphs not drawn
    pub num_whitespace: usize,
    /// Explicit `\n` characters
    pub num_newlines: usize,
    /// Lines ended because of the maximum width
    pub num_wraps: usize,
    pub num_lines: usize,
}

struct Walk<'s, 'a, 't, C: ?Sized> {
    state: &'s mut FlowState<'a>,
    callbacks: &'s mut C,
    target: Option<&'t mut dyn DrawTarget>,
    info: FlowInfo,
}

/// Flow the remaining text of `state`
///
/// Glyphs are drawn to `target`, if any; without a target the flow only
/// measures. The flow runs to the end of the text; calling again on a
/// finished state only repeats the final callbacks.
pub fn flow<C: FlowCallbacks + ?Sized>(
    state: &mut FlowState<'_>,
    callbacks: &mut C,
    target: Option<&mut dyn DrawTarget>,
) -> FlowInfo {
    let info = FlowInfo {
        start_pos: state.pos,
        ..Default::default()
    };
    let mut walk = Walk {
        state,
        callbacks,
        target,
        info,
    };
    walk.run();
    walk.info
}

impl<'s, 'a, 't, C: FlowCallbacks + ?Sized> Walk<'s, 'a, 't, C> {
    fn run(&mut self) {
        if self.state.needs_line_breaks() && self.state.next_break <= self.state.byte_index {
            self.state.start_line_layout();
        }
        if !self.state.called_before_line {
            self.before_line();
        }

        while !self.state.is_done() {
            self.step();
        }

        self.info.end_pos = self.state.pos;
        if self.state.column_index > 0 {
            self.info.num_lines += 1;
        }
        if self.state.underlined {
            if let Some(rect) = self.state.underline_rect() {
                self.draw_rect(rect, self.state.color);
            }
        }

        if !self.state.called_before_line {
            self.before_line();
        }
        self.between_char();
        if !self.state.called_after_line {
            self.after_line(false);
        }
    }

    fn step(&mut self) {
        let state = &mut *self.state;
        let (mut codepoint, len) = decode_utf8(&state.text[state.byte_index..]);
        let mut columns = 1;
        if codepoint == u32::from('\t') {
            codepoint = u32::from(' ');
            columns = 4 - state.column_index % 4;
        }

        self.between_char();

        let mut new_line = false;
        match codepoint {
            0x0A => {
                self.info.num_lines += 1;
                self.info.num_newlines += 1;
                self.after_line(false);
                self.line_break();
                new_line = true;
            }
            BOLD_TOGGLE => {
                self.info.num_control += 1;
                self.state.toggle_bold();
            }
            ITALIC_TOGGLE => {
                self.info.num_control += 1;
                self.state.toggle_italic();
            }
            UNDERLINE_TOGGLE => {
                self.info.num_control += 1;
                self.toggle_underline();
            }
            _ => {
                self.place(codepoint, columns);
                self.state.column_index += columns;
            }
        }

        self.state.char_index += 1;
        self.state.byte_index += len;

        if new_line {
            if self.state.needs_line_breaks() {
                self.state.start_line_layout();
            }
            self.before_line();
        } else if self.state.needs_line_breaks()
            && self.state.byte_index == self.state.next_break
            && !self.state.is_done()
        {
            self.wrap();
        }
    }

    fn place(&mut self, codepoint: u32, columns: usize) {
        match self.state.place(codepoint, columns) {
            Placed::Glyph {
                glyph,
                logical,
                render,
                advance,
            } => {
                let face = glyph.face;
                if face.line_height() > self.state.line_height {
                    self.state.line_height = face.line_height();
                }

                let c = FlowChar {
                    codepoint,
                    info: glyph.info,
                    logical,
                    render,
                };
                let mut drawn = false;
                if glyph.info.is_renderable() {
                    drawn = self.callbacks.before_char(&c, self.state);
                    if drawn {
                        let color = if glyph.bake.is_colored() {
                            Color::WHITE
                        } else {
                            self.state.color
                        };
                        if let Some(target) = self.target.as_deref_mut() {
                            target.draw_glyph(glyph.bake.texture(), glyph.info.source, render, color);
                        }
                        self.include(logical, render);

                        let scale = self.state.scale;
                        let line_rect = &mut self.state.line_rect;
                        if line_rect.size.0 == 0.0 {
                            *line_rect = Rect::new(
                                Vec2(
                                    self.state.pos.0,
                                    self.state.pos.1 - face.metrics().max_ascend * scale,
                                ),
                                Vec2(0.0, face.line_height() * scale),
                            );
                        }
                        self.state.line_rect = self.state.line_rect.union(&logical);

                        self.callbacks.after_char(&c, self.state);
                    }
                }

                if drawn {
                    self.info.num_rendered += 1;
                } else {
                    self.info.num_whitespace += 1;
                }
                self.state.pos.0 += advance;
            }
            Placed::Missing { rect, advance } => {
                self.draw_rect(rect, Color::INVALID_GLYPH);
                self.include(rect, rect);
                self.state.line_rect.expand(&rect);
                self.info.num_rendered += 1;
                self.info.num_invalid += 1;
                self.state.pos.0 += advance;
            }
        }
    }

    fn toggle_underline(&mut self) {
        let state = &mut *self.state;
        state.underlined = !state.underlined;
        if state.underlined {
            state.underline_start = state.pos + state.underline_metrics().0;
        } else if let Some(rect) = state.underline_rect() {
            let color = state.color;
            self.draw_rect(rect, color);
        }
    }

    fn wrap(&mut self) {
        let mut newline = false;
        if self.state.consume_at_break {
            let state = &mut *self.state;
            let (consumed, len) = decode_utf8(&state.text[state.byte_index..]);
            if consumed == 0x0A {
                newline = true;
                self.info.num_newlines += 1;
            } else if consumed == u32::from(' ') || consumed == u32::from('\t') {
                self.info.num_whitespace += 1;
            }
            state.char_index += 1;
            state.byte_index += len;
        }

        // the last line is counted at the end only if it has columns
        self.info.num_lines += 1;
        if !newline {
            self.info.num_wraps += 1;
        }

        self.after_line(!newline);
        self.between_char();
        self.line_break();
        self.state.start_line_layout();
        self.before_line();
    }

    fn line_break(&mut self) {
        if let Some(rect) = self.state.line_break() {
            self.draw_rect(rect, self.state.color);
        }
    }

    fn include(&mut self, logical: Rect, render: Rect) {
        self.info.logical_rect.expand(&logical);
        self.info.render_rect.expand(&render);
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        if let Some(target) = self.target.as_deref_mut() {
            target.draw_rect(rect, color);
        }
    }

    fn before_line(&mut self) {
        let (line, byte) = (self.state.line_index, self.state.byte_index);
        self.callbacks.before_line(line, byte, self.state);
        self.state.called_before_line = true;
    }

    fn after_line(&mut self, wrapped: bool) {
        let (line, byte) = (self.state.line_index, self.state.byte_index);
        self.callbacks.after_line(wrapped, line, byte, self.state);
        self.state.called_after_line = true;
    }

    fn between_char(&mut self) {
        let state = &mut *self.state;
        let (byte, index, pos) = (state.byte_index, state.char_index, state.pos);
        self.callbacks.between_char(byte, index, pos, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Environment, TextStyle};
    use crate::fonts::library::tests::test_font;
    use crate::fonts::FaceSelector;

    fn flow_str(text: &str, max_width: f32, scale: f32) -> FlowInfo {
        let font = test_font();
        let style = TextStyle::new(&font).with_scale(scale);
        let env = Environment {
            max_width,
            ..Default::default()
        };
        let mut state = FlowState::new(text, &style, &env);
        flow(&mut state, &mut (), None)
    }

    #[test]
    fn wrap_counts() {
        let info = flow_str("aaaa aaaa", 40.0, 1.0);
        assert_eq!(info.num_lines, 2);
        assert_eq!(info.num_wraps, 1);
        assert_eq!(info.num_whitespace, 1);
        assert_eq!(info.end_pos, Vec2(40.0, 10.0));

        // a newline at the wrap point is not a wrap
        let info = flow_str("aaaa\nbbbb", 40.0, 1.0);
        assert_eq!(info.num_lines, 2);
        assert_eq!(info.num_newlines, 1);
        assert_eq!(info.num_wraps, 0);
    }

    #[test]
    fn scaled_bounds() {
        let info = flow_str("aa", 0.0, 2.0);
        assert_eq!(info.end_pos, Vec2(40.0, 0.0));
        assert_eq!(info.logical_rect, Rect::new(Vec2(0.0, -16.0), Vec2(36.0, 20.0)));
        assert_eq!(info.render_rect, info.logical_rect);
    }

    #[test]
    fn tab_columns() {
        let info = flow_str("a\tb", 0.0, 1.0);
        assert_eq!(info.num_rendered, 2);
        assert_eq!(info.num_whitespace, 1);
        assert_eq!(info.end_pos, Vec2(50.0, 0.0));

        // a tab at a column boundary fills all four
        let info = flow_str("\tb", 0.0, 1.0);
        assert_eq!(info.end_pos, Vec2(50.0, 0.0));
    }

    #[derive(Default)]
    struct Italics(Vec<(char, bool)>);

    impl FlowCallbacks for Italics {
        fn after_char(&mut self, c: &FlowChar<'_>, state: &mut FlowState<'_>) {
            let c = char::from_u32(c.codepoint).unwrap_or('?');
            self.0.push((c, state.is_italic()));
        }
    }

    #[test]
    fn italic_toggle() {
        let font = test_font();
        let style = TextStyle::new(&font).with_selector(FaceSelector::new(16, false, false));
        let mut state = FlowState::new("a\x07b\x07c", &style, &Environment::new());
        let mut italics = Italics::default();
        let info = flow(&mut state, &mut italics, None);
        assert_eq!(info.num_control, 2);
        assert_eq!(info.num_rendered, 3);
        assert_eq!(italics.0, vec![('a', false), ('b', true), ('c', false)]);
        assert!(!state.is_italic());
        // no italic face: the nearest regular face is used
        assert_eq!(info.end_pos, Vec2(30.0, 0.0));

        let mut state = FlowState::new("a\x07b", &style, &Environment::new());
        flow(&mut state, &mut (), None);
        assert!(state.is_italic());
        assert!(!state.face().unwrap().is_bold());
    }

    #[derive(Default)]
    struct Events(Vec<String>);

    impl FlowCallbacks for Events {
        fn before_line(&mut self, line: usize, byte: usize, _: &mut FlowState<'_>) {
            self.0.push(format!("L{line}@{byte}"));
        }

        fn after_line(&mut self, _: bool, line: usize, byte: usize, _: &mut FlowState<'_>) {
            self.0.push(format!("E{line}@{byte}"));
        }

        fn between_char(&mut self, byte: usize, _: usize, _: Vec2, _: &mut FlowState<'_>) {
            self.0.push(format!("B{byte}"));
        }

        fn before_char(&mut self, c: &FlowChar<'_>, _: &mut FlowState<'_>) -> bool {
            self.0.push(format!("C{}", c.codepoint));
            true
        }

        fn after_char(&mut self, c: &FlowChar<'_>, _: &mut FlowState<'_>) {
            self.0.push(format!("A{}", c.codepoint));
        }
    }

    #[test]
    fn callback_order() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let mut state = FlowState::new("ab\nc", &style, &Environment::new());
        let mut events = Events::default();
        flow(&mut state, &mut events, None);
        let expected = [
            "L0@0", "B0", "C97", "A97", "B1", "C98", "A98", "B2", "E0@2", "L1@3", "B3", "C99",
            "A99", "B4", "E1@4",
        ];
        assert_eq!(events.0, expected);
    }
}
