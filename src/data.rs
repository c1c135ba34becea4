// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D vector
///
/// Usually used as a position or a size. The y axis points down; a text
/// position refers to the baseline of the first line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2(pub f32, pub f32);

impl Vec2 {
    /// Zero
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);

    /// Euclidean length
    #[inline]
    pub fn length(self) -> f32 {
        self.0.hypot(self.1)
    }

    /// Component-wise multiplication
    #[inline]
    pub fn mul_components(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 * rhs.0, self.1 * rhs.1)
    }

    /// True if both components are within `epsilon` of `rhs`
    #[inline]
    pub fn approx_eq(self, rhs: Vec2, epsilon: f32) -> bool {
        (self.0 - rhs.0).abs() <= epsilon && (self.1 - rhs.1).abs() <= epsilon
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.0 += rhs.0;
        self.1 += rhs.1;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2(self.0 * rhs, self.1 * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2(-self.0, -self.1)
    }
}

/// Axis-aligned rectangle
///
/// A rectangle of zero width is treated as "empty" when accumulating bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Zero
    pub const ZERO: Rect = Rect::new(Vec2::ZERO, Vec2::ZERO);

    /// Construct
    #[inline]
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Rect { pos, size }
    }

    /// Construct the rectangle spanning two corners (in any order)
    pub fn between(a: Vec2, b: Vec2) -> Self {
        let pos = Vec2(a.0.min(b.0), a.1.min(b.1));
        let size = Vec2((a.0 - b.0).abs(), (a.1 - b.1).abs());
        Rect { pos, size }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.0 + self.size.0
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.1 + self.size.1
    }

    /// Smallest rectangle containing both `self` and `rhs`
    pub fn union(&self, rhs: &Rect) -> Rect {
        let left = self.pos.0.min(rhs.pos.0);
        let top = self.pos.1.min(rhs.pos.1);
        let right = self.right().max(rhs.right());
        let bottom = self.bottom().max(rhs.bottom());
        Rect::new(Vec2(left, top), Vec2(right - left, bottom - top))
    }

    /// Grow to include `rhs`, or replace `self` if currently empty
    pub fn expand(&mut self, rhs: &Rect) {
        if self.size.0 != 0.0 {
            *self = self.union(rhs);
        } else {
            *self = *rhs;
        }
    }

    /// True if `point` lies within the rectangle (inclusive of the top-left)
    pub fn contains(&self, point: Vec2) -> bool {
        point.0 >= self.pos.0
            && point.1 >= self.pos.1
            && point.0 < self.right()
            && point.1 < self.bottom()
    }
}

/// An 8-bit-per-channel RGBA color
///
/// Glyphs from single-channel bakes are tinted by this color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Fill color of the "invalid glyph" placeholder box
    pub const INVALID_GLYPH: Color = Color::rgb(0x6B, 0x3F, 0xA0);

    /// Construct an opaque color
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Horizontal alignment of text lines
///
/// Alignment is relative to the flow's start position: centred lines are
/// centred on it and right-aligned lines end at it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Align {
    /// Lines start at the start position
    #[default]
    Left,
    /// Lines are centred on the start position
    Centre,
    /// Lines end at the start position
    Right,
}
