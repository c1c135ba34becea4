// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Face selection

use super::Face;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A logical face request
///
/// Either the font's designated default face, or the face best matching a
/// point size and style. No exact match is required: see [`Self::cost`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceSelector {
    /// Select the default face; other fields are then ignored
    pub select_default: bool,
    /// Point size; zero matches any size
    pub size: i32,
    pub bold: bool,
    pub italic: bool,
}

impl FaceSelector {
    /// Select the font's default face
    pub const fn default_face() -> Self {
        FaceSelector {
            select_default: true,
            size: 0,
            bold: false,
            italic: false,
        }
    }

    /// Select by size and style
    pub const fn new(size: i32, bold: bool, italic: bool) -> Self {
        FaceSelector {
            select_default: false,
            size,
            bold,
            italic,
        }
    }

    /// True if bold or italic is requested
    #[inline]
    pub fn is_styled(&self) -> bool {
        self.bold || self.italic
    }

    /// The same request without bold or italic
    pub fn without_style(self) -> Self {
        FaceSelector {
            bold: false,
            italic: false,
            ..self
        }
    }

    /// Fitness cost of `face` for this request (lower is better)
    ///
    /// The size difference is shifted left two bits, then one is added for
    /// each of a bold and an italic mismatch. Styles thus only decide between
    /// faces of equal size distance.
    pub fn cost(&self, face: &Face) -> u64 {
        let mut cost = 0;
        if self.size != 0 {
            cost += u64::from(face.size.abs_diff(self.size));
        }
        cost <<= 2;
        if self.bold != face.is_bold() {
            cost += 1;
        }
        if self.italic != face.is_italic() {
            cost += 1;
        }
        cost
    }
}
