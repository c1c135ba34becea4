// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph catalog: fonts, faces and baked glyphs
//!
//! A [`Font`] is an ordered list of [`Face`]s, each one (point size, bold,
//! italic) variant. A face owns one or more [`Bake`]s: the output of an atlas
//! generation pass (or a [`SpriteSheet`]), covering one or more
//! [`GlyphRange`]s of codepoints, each glyph described by a [`CharInfo`].
//!
//! ### Construction
//!
//! Faces are built during asset load:
//!
//! 1.  [`Font::start_face`] adds a face holding its [`FaceSource`]
//! 2.  [`FaceBuilder::add_bake`] rasterizes codepoint ranges through a
//!     [`GlyphBaker`] (or [`FaceBuilder::add_sprite_bake`] adds a sprite sheet)
//! 3.  [`FaceBuilder::finish`] releases the source; the face is now immutable
//!
//! A failed bake does not abort loading: the face and font are flagged (see
//! [`Font::has_failures`]) and the glyphs of other bakes remain usable.
//!
//! ### Lookup
//!
//! [`Font::select_face`] picks the face of least [`FaceSelector::cost`];
//! within a face, the first bake and range containing a codepoint wins.
//!
//! ### Units
//!
//! All metrics are in points. Flows multiply by a scale factor to obtain
//! output units (usually pixels).

mod bake;
mod face;
pub(crate) mod library;
mod resolver;
mod selector;
mod source;
mod sprite;

pub use bake::{
    Bake, BakeData, BakeError, BakeFlags, BakeRequest, BakedGlyph, CharInfo, GlyphBaker,
    GlyphRange, RangeSpec, TextureId,
};
pub use face::{
    Face, FaceBuilder, FaceFlags, FaceId, VMetrics, DEFAULT_UNDERLINE_OFFSET,
    DEFAULT_UNDERLINE_THICKNESS,
};
pub(crate) use face::{placeholder_rect, placeholder_size};
pub use library::{Font, FontError, GlyphLookup};
pub use resolver::{GlyphCache, ResolvedGlyph};
pub use selector::FaceSelector;
pub use source::FaceSource;
pub use sprite::{SpriteFrame, SpriteSheet};
