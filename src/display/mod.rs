// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Consumers of text flow: drawing, measurement, hit-testing and selection
//!
//! Each consumer is a set of [`FlowCallbacks`] over one [`flow`] and contains
//! no layout logic of its own.

mod cursor;
mod measure;
mod selection;

pub use cursor::{cursor_position, find_cursor_index, CursorHit};
pub use measure::{measure_text, measure_text_with, TextMeasure};
pub use selection::{selection_rects, HighlightRange};

use crate::env::{Environment, TextStyle};
use crate::flow::{flow, FlowCallbacks, FlowInfo, FlowState};
use crate::fonts::TextureId;
use crate::{Color, Rect};

/// A drawing backend
///
/// Receives one call per glyph or rectangle, in text order.
pub trait DrawTarget {
    /// Draw the `source` region of `texture`, scaled to `dest` and tinted by `color`
    fn draw_glyph(&mut self, texture: TextureId, source: Rect, dest: Rect, color: Color);

    /// Fill `rect` (underlines and missing-glyph placeholders)
    fn draw_rect(&mut self, rect: Rect, color: Color);
}

/// A recorded draw call
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Glyph {
        texture: TextureId,
        source: Rect,
        dest: Rect,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
}

/// Records draw calls, e.g. for batching
impl DrawTarget for Vec<DrawCommand> {
    fn draw_glyph(&mut self, texture: TextureId, source: Rect, dest: Rect, color: Color) {
        self.push(DrawCommand::Glyph {
            texture,
            source,
            dest,
            color,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.push(DrawCommand::Rect { rect, color });
    }
}

/// Draw `text` to `target`
///
/// The pen starts at `env.pos`, on the baseline of the first line.
pub fn render_text<T: AsRef<[u8]> + ?Sized, C: FlowCallbacks + ?Sized>(
    text: &T,
    style: &TextStyle<'_>,
    env: &Environment,
    callbacks: &mut C,
    target: &mut dyn DrawTarget,
) -> FlowInfo {
    let mut state = FlowState::new(text, style, env);
    flow(&mut state, callbacks, Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowChar;
    use crate::fonts::library::tests::test_font;
    use crate::fonts::{FaceSelector, FaceSource, Font, SpriteFrame, SpriteSheet};
    use crate::{Align, Vec2};

    #[test]
    fn draws_glyphs_in_order() {
        let font = test_font();
        let style = TextStyle::new(&font).with_color(Color::BLACK);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let env = Environment::at(Vec2(10.0, 20.0));
        let info = render_text("ab c", &style, &env, &mut (), &mut cmds);
        assert_eq!(info.num_rendered, 3);
        assert_eq!(info.num_whitespace, 1);
        assert_eq!(cmds.len(), 3);
        match cmds[2] {
            DrawCommand::Glyph { dest, color, .. } => {
                assert_eq!(dest, Rect::new(Vec2(40.0, 12.0), Vec2(8.0, 10.0)));
                assert_eq!(color, Color::BLACK);
            }
            DrawCommand::Rect { .. } => panic!("expected a glyph"),
        }
    }

    #[test]
    fn missing_glyph_placeholder() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let info = render_text("a\u{2603}b", &style, &Environment::new(), &mut (), &mut cmds);
        assert_eq!(info.num_invalid, 1);
        assert_eq!(info.num_rendered, 3);
        assert!(matches!(
            cmds[1],
            DrawCommand::Rect { color: Color::INVALID_GLYPH, .. }
        ));
        // 16pt face: 12 wide box plus 2 spacing
        assert_eq!(info.end_pos, Vec2(34.0, 0.0));
    }

    #[test]
    fn underline_drawn() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let info = render_text("a\x0Cbc\x0Cd", &style, &Environment::new(), &mut (), &mut cmds);
        assert_eq!(info.num_control, 2);
        let rects: Vec<_> = cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect();
        assert_eq!(rects, vec![Rect::new(Vec2(10.0, 2.0), Vec2(20.0, 1.0))]);
    }

    #[test]
    fn pending_underline_drawn_at_end() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        render_text("\x0Cab", &style, &Environment::new(), &mut (), &mut cmds);
        assert_eq!(
            cmds.last(),
            Some(&DrawCommand::Rect {
                rect: Rect::new(Vec2(0.0, 2.0), Vec2(20.0, 1.0)),
                color: Color::WHITE,
            })
        );
    }

    #[test]
    fn right_aligned() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let env = Environment {
            pos: Vec2(100.0, 0.0),
            align: Align::Right,
            max_width: 0.0,
        };
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let info = render_text("ab\nabc", &style, &env, &mut (), &mut cmds);
        assert_eq!(info.num_lines, 2);
        assert_eq!(xs(&cmds), vec![80.0, 90.0, 70.0, 80.0, 90.0]);
    }

    fn xs(cmds: &[DrawCommand]) -> Vec<f32> {
        cmds.iter()
            .map(|cmd| match cmd {
                DrawCommand::Glyph { dest, .. } => dest.pos.0,
                DrawCommand::Rect { rect, .. } => rect.pos.0,
            })
            .collect()
    }

    fn aligned(text: &str, align: Align, max_width: f32) -> (FlowInfo, Vec<f32>) {
        let font = test_font();
        let style = TextStyle::new(&font);
        let env = Environment {
            pos: Vec2(100.0, 0.0),
            align,
            max_width,
        };
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let info = render_text(text, &style, &env, &mut (), &mut cmds);
        (info, xs(&cmds))
    }

    #[test]
    fn centre_aligned() {
        let (info, xs) = aligned("ab\nabc", Align::Centre, 0.0);
        assert_eq!(info.num_lines, 2);
        assert_eq!(xs, vec![90.0, 100.0, 85.0, 95.0, 105.0]);
        assert_eq!(info.end_pos, Vec2(115.0, 10.0));
    }

    #[test]
    fn aligned_with_wrapping() {
        let (info, xs) = aligned("aa bbbb", Align::Right, 45.0);
        assert_eq!(info.num_lines, 2);
        assert_eq!(info.num_wraps, 1);
        assert_eq!(info.num_whitespace, 1);
        // the consumed space is not part of the first line's width
        assert_eq!(xs, vec![80.0, 90.0, 60.0, 70.0, 80.0, 90.0]);
        assert_eq!(info.end_pos, Vec2(100.0, 10.0));

        let (info, xs) = aligned("aa bbbb", Align::Centre, 45.0);
        assert_eq!(info.num_lines, 2);
        assert_eq!(xs, vec![90.0, 100.0, 80.0, 90.0, 100.0, 110.0]);
    }

    #[test]
    fn aligned_tab() {
        // the tab fills three columns after `a`
        let (info, xs) = aligned("a\tb", Align::Right, 0.0);
        assert_eq!(xs, vec![50.0, 90.0]);
        assert_eq!(info.end_pos, Vec2(100.0, 0.0));
    }

    struct Recolor;
    impl FlowCallbacks for Recolor {
        fn before_char(&mut self, c: &FlowChar<'_>, state: &mut FlowState<'_>) -> bool {
            if c.codepoint == u32::from('b') {
                state.set_color(Color::BLACK);
            }
            c.codepoint != u32::from('c')
        }
    }

    #[test]
    fn callbacks_recolor_and_veto() {
        let font = test_font();
        let style = TextStyle::new(&font);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let info = render_text("abcd", &style, &Environment::new(), &mut Recolor, &mut cmds);
        assert_eq!(info.num_rendered, 3);
        assert_eq!(info.num_whitespace, 1);
        let colors: Vec<Color> = cmds
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Glyph { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::WHITE, Color::BLACK, Color::BLACK]);
        assert_eq!(info.end_pos, Vec2(40.0, 0.0));
    }

    #[test]
    fn colored_scalable_sprite() {
        let mut font = Font::new();
        let mut baker = crate::fonts::library::tests::GridBaker::default();
        let mut face = font.start_face(16, false, false, FaceSource::default()).unwrap();
        face.add_bake(&mut baker, (256, 256), &[crate::fonts::library::tests::ASCII])
            .unwrap();
        let sheet = SpriteSheet {
            texture: TextureId(9),
            texture_size: (32, 32),
            frame_size: (32, 32),
            padding: 0,
            frames: vec![SpriteFrame {
                codepoint: 0xE000,
                grid_pos: (0, 0),
                char_bounds: Rect::new(Vec2::ZERO, Vec2(32.0, 32.0)),
                char_offset: Vec2::ZERO,
                logical_bounds: None,
                advance: 32.0,
            }],
        };
        face.add_sprite_bake(&sheet, true, true).unwrap();
        face.finish();

        let style = TextStyle::new(&font)
            .with_selector(FaceSelector::new(16, false, false))
            .with_color(Color::BLACK);
        let mut cmds: Vec<DrawCommand> = Vec::new();
        let info = render_text("\u{E000}a", &style, &Environment::new(), &mut (), &mut cmds);
        // sprite scaled from 32 to the face's render line height of 10
        match cmds[0] {
            DrawCommand::Glyph {
                texture,
                dest,
                color,
                ..
            } => {
                assert_eq!(texture, TextureId(9));
                assert_eq!(dest, Rect::new(Vec2(0.0, -10.0), Vec2(10.0, 10.0)));
                assert_eq!(color, Color::WHITE);
            }
            DrawCommand::Rect { .. } => panic!("expected a glyph"),
        }
        assert_eq!(info.end_pos, Vec2(20.0, 0.0));
    }
}
