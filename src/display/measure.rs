// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text measurement

use crate::env::{Environment, TextStyle};
use crate::flow::{flow, FlowCallbacks, FlowInfo, FlowState};
use crate::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Size of text and where to put the pen to draw it
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextMeasure {
    /// Size of the logical bounds
    pub size: Vec2,
    /// Pen start position placing the bounds' top-left at the origin
    pub offset: Vec2,
}

/// Measure `text`, wrapping at `max_width` if positive
///
/// Text is flowed left-aligned from the origin without drawing.
pub fn measure_text<T: AsRef<[u8]> + ?Sized>(
    text: &T,
    style: &TextStyle<'_>,
    max_width: f32,
) -> (TextMeasure, FlowInfo) {
    measure_text_with(text, style, max_width, &mut ())
}

/// Measure `text`, observing the flow through `callbacks`
pub fn measure_text_with<T: AsRef<[u8]> + ?Sized, C: FlowCallbacks + ?Sized>(
    text: &T,
    style: &TextStyle<'_>,
    max_width: f32,
    callbacks: &mut C,
) -> (TextMeasure, FlowInfo) {
    let env = Environment {
        max_width,
        ..Default::default()
    };
    let mut state = FlowState::new(text, style, &env);
    let info = flow(&mut state, callbacks, None);
    let measure = TextMeasure {
        size: info.logical_rect.size,
        offset: -info.logical_rect.pos,
    };
    (measure, info)
}
