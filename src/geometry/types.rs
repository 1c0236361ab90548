//! Core geometric types
//!
//! All coordinates are integral internal units. Field transforms only ever
//! contain entries in {-1, 0, 1}, so every mapping on these types is exact.

use std::ops::{Add, Neg, Sub};

use serde::Deserialize;

/// A 2D point in internal units (Y axis pointing down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Rotate this point by a quarter turn about `center`.
    ///
    /// Matches the schematic convention of a +90 degree text angle: on a
    /// Y-down canvas the point turns counter-clockwise, so a vector pointing
    /// right ends up pointing up.
    pub fn rotate_quarter(self, center: Point) -> Point {
        let d = self - center;
        center + Point::new(d.y, -d.x)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Text glyph size (width, height) in internal units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

impl Size {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        // 50 mil text, the usual schematic default
        Self::new(50, 50)
    }
}

/// An axis-aligned rectangle described by an origin and a signed extent.
///
/// A freshly transformed rectangle may have negative width or height; call
/// [`Rect::normalize`] before comparing or hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle spanning two corner points
    pub fn from_corners(origin: Point, end: Point) -> Self {
        Self::new(origin.x, origin.y, end.x - origin.x, end.y - origin.y)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Opposite corner of the origin
    pub fn end(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn left(&self) -> i64 {
        self.x.min(self.x + self.width)
    }

    pub fn right(&self) -> i64 {
        self.x.max(self.x + self.width)
    }

    pub fn top(&self) -> i64 {
        self.y.min(self.y + self.height)
    }

    pub fn bottom(&self) -> i64 {
        self.y.max(self.y + self.height)
    }

    /// Center point (integer division rounds toward the origin)
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Return the same area with a non-negative extent
    pub fn normalize(&self) -> Rect {
        Rect::new(
            self.left(),
            self.top(),
            self.right() - self.left(),
            self.bottom() - self.top(),
        )
    }

    /// Translate by an offset
    pub fn translate(&self, offset: Point) -> Rect {
        Rect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Grow the rectangle by `margin` on every side (shrinks for negative margins)
    pub fn inflate(&self, margin: i64) -> Rect {
        let r = self.normalize();
        Rect::new(
            r.x - margin,
            r.y - margin,
            r.width + 2 * margin,
            r.height + 2 * margin,
        )
    }

    /// Check whether the point lies inside or on the border
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Check whether `other` lies completely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.origin()) && self.contains(other.end())
    }

    /// Check whether the two rectangles share any area or border
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }
}

/// Orientation of a field's text.
///
/// Field text is only ever horizontal or vertical; the enum replaces the
/// 0/900 tenth-of-degree arithmetic of older schematic formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAngle {
    #[default]
    Horizontal,
    Vertical,
}

impl TextAngle {
    /// Text angle in degrees (0 or 90)
    pub fn degrees(self) -> u16 {
        match self {
            TextAngle::Horizontal => 0,
            TextAngle::Vertical => 90,
        }
    }

    /// The other orientation
    pub fn swapped(self) -> TextAngle {
        match self {
            TextAngle::Horizontal => TextAngle::Vertical,
            TextAngle::Vertical => TextAngle::Horizontal,
        }
    }

    /// Effective orientation once the owner's quarter-turn flag is applied
    pub fn combine(self, parent_rotated: bool) -> TextAngle {
        match (self, parent_rotated) {
            (angle, false) => angle,
            (TextAngle::Horizontal, true) => TextAngle::Vertical,
            (TextAngle::Vertical, true) => TextAngle::Horizontal,
        }
    }
}
