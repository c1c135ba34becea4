// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Line-break lookahead

use super::state::{FlowState, Placed};
use super::{BOLD_TOGGLE, ITALIC_TOGGLE, UNDERLINE_TOGGLE};
use crate::conv::decode_utf8;

/// Where the line starting at some byte ends
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineBreak {
    /// Length of the line in bytes, from the start byte
    pub offset: usize,
    /// Width of the line, excluding any consumed character
    pub width: f32,
    /// If true, the character at the break (a space or `\n`) belongs to
    /// neither line
    pub consume: bool,
}

/// True for characters before which a line may break
///
/// Opening brackets. A break before a space is also allowed but the space is
/// consumed.
pub fn is_punctuation_start(codepoint: u32) -> bool {
    matches!(char::from_u32(codepoint), Some('(' | '[' | '{' | '<'))
}

/// True for characters after which a line may break
pub fn is_punctuation_end(codepoint: u32) -> bool {
    matches!(
        char::from_u32(codepoint),
        Some(')' | ']' | '}' | '>' | '.' | ',' | ';' | ':' | '!' | '?' | '-')
    )
}

/// Find the end of the line starting at the state's byte index
///
/// The lookahead walks a copy of `state` placing characters exactly as the
/// flow would, until one does not fit within the state's maximum width (if
/// positive), an explicit `\n` or the end of the text is reached. The line
/// then ends:
///
/// -   at a `\n`, which is consumed
/// -   after the first character, if not even that fits
/// -   at the last legal break: before a space (consumed) or opening bracket,
///     or after closing punctuation
/// -   else after the last character which fits
/// -   at the end of the text
///
/// Style toggles are applied to the copy but never count as fitting.
pub fn find_next_line_break(state: &FlowState<'_>) -> LineBreak {
    let start = state.byte_index;
    let mut look = state.clone();

    let mut width = 0.0;
    let mut last_fit = (start, 0.0);
    let mut last_good = (start, 0.0, false);

    while look.byte_index < look.text.len() {
        let (mut codepoint, len) = decode_utf8(&look.text[look.byte_index..]);
        let mut columns = 1;
        if codepoint == u32::from('\t') {
            codepoint = u32::from(' ');
            columns = 4 - look.column_index % 4;
        }

        let is_space = codepoint == u32::from(' ');
        if is_space || is_punctuation_start(codepoint) {
            last_good = (look.byte_index, width, is_space);
        }

        let (advance, logical_right) = match codepoint {
            0x0A => {
                return LineBreak {
                    offset: look.byte_index - start,
                    width,
                    consume: true,
                };
            }
            BOLD_TOGGLE | ITALIC_TOGGLE | UNDERLINE_TOGGLE => {
                match codepoint {
                    BOLD_TOGGLE => look.toggle_bold(),
                    ITALIC_TOGGLE => look.toggle_italic(),
                    _ => look.underlined = !look.underlined,
                }
                look.byte_index += len;
                continue;
            }
            _ => match look.place(codepoint, columns) {
                Placed::Glyph {
                    logical, advance, ..
                } => (advance, logical.right()),
                Placed::Missing { rect, advance } => (advance, rect.right()),
            },
        };

        let line_x = look.line_start.0;
        let fits = look.max_width <= 0.0
            || (look.pos.0 + advance - line_x <= look.max_width
                && logical_right - line_x <= look.max_width);

        if !fits {
            if last_fit.0 == start {
                return LineBreak {
                    offset: look.byte_index + len - start,
                    width: width + advance,
                    consume: false,
                };
            } else if last_good.0 > start {
                return LineBreak {
                    offset: last_good.0 - start,
                    width: last_good.1,
                    consume: last_good.2,
                };
            } else {
                return LineBreak {
                    offset: last_fit.0 - start,
                    width: last_fit.1,
                    consume: false,
                };
            }
        }

        last_fit = (look.byte_index + len, width + advance);
        if is_punctuation_end(codepoint) {
            last_good = (look.byte_index + len, width + advance, false);
        }

        look.pos.0 += advance;
        width += advance;
        look.column_index += columns;
        look.byte_index += len;
    }

    LineBreak {
        offset: look.byte_index - start,
        width,
        consume: false,
    }
}
