// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Baked-glyph text flow
//!
//! This library lays out and draws text from pre-rasterized glyph atlases.
//!
//! -   [`fonts`]: the glyph catalog. A [`Font`] holds faces (size and style
//!     variants), each with bakes of glyph metrics and atlas locations.
//! -   [`flow`]: the layout walk, placing one glyph per codepoint with
//!     word-wrapping and alignment, observed through [`FlowCallbacks`].
//! -   [`display`]: everything built on a flow: drawing ([`render_text`]),
//!     measurement ([`measure_text`]), cursor hit-testing
//!     ([`find_cursor_index`]) and selection ([`selection_rects`]).
//!
//! Shaping, kerning, bidirectional text and hyphenation are not supported:
//! each codepoint is one glyph advanced by a fixed width.
//!
//! ```
//! # use glyph_flow::*;
//! let font = Font::new();
//! let style = TextStyle::new(&font);
//! // without faces, each character is a 5×10 placeholder box
//! let (measure, info) = measure_text("Hi", &style, 0.0);
//! assert_eq!(info.num_invalid, 2);
//! assert_eq!(measure.size, Vec2(12.0, 10.0));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod conv;

mod data;
pub use data::*;

mod env;
pub use env::*;

pub mod fonts;
pub use fonts::{FaceSelector, Font, FontError};

pub mod flow;
pub use flow::{flow, FlowCallbacks, FlowInfo, FlowState};

pub mod display;
pub use display::{
    find_cursor_index, measure_text, render_text, selection_rects, DrawTarget, TextMeasure,
};
