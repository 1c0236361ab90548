//! Rotation/mirror transforms for field owners
//!
//! A [`Transform`] is a 2x2 integer matrix whose entries are restricted to
//! {-1, 0, 1} with a determinant of ±1. That covers every combination of
//! quarter-turn rotations and axis mirrors a schematic symbol can carry, and
//! makes the inverse exact.
//!
//! ## Composition Convention
//!
//! `a.compose(b)` is the matrix product `a · b`: the resulting transform
//! applies `b` first and `a` second.
//!
//! ```text
//! a.compose(b).apply(p) == a.apply(b.apply(p))
//! ```
//!
//! ## Rotation Convention
//!
//! The canvas Y axis points down. A positive quarter turn moves a vector
//! pointing right so that it points up (counter-clockwise as seen on screen).

use serde::Deserialize;

use super::types::Point;

/// Reflect a y-coordinate about the horizontal line `axis`
pub fn mirror_y(value: i64, axis: i64) -> i64 {
    2 * axis - value
}

/// Integer rotation/mirror matrix
///
/// ```text
/// [x1 y1] [px]
/// [x2 y2] [py]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform {
    x1: i8,
    y1: i8,
    x2: i8,
    y2: i8,
}

impl Transform {
    pub const IDENTITY: Transform = Transform::raw(1, 0, 0, 1);
    pub const ROTATE_90: Transform = Transform::raw(0, 1, -1, 0);
    pub const ROTATE_180: Transform = Transform::raw(-1, 0, 0, -1);
    pub const ROTATE_270: Transform = Transform::raw(0, -1, 1, 0);
    /// Mirror about the X axis (y becomes -y)
    pub const MIRROR_X: Transform = Transform::raw(1, 0, 0, -1);
    /// Mirror about the Y axis (x becomes -x)
    pub const MIRROR_Y: Transform = Transform::raw(-1, 0, 0, 1);

    const fn raw(x1: i8, y1: i8, x2: i8, y2: i8) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a transform from matrix entries.
    ///
    /// Returns `None` unless every entry is in {-1, 0, 1} and the determinant
    /// is ±1.
    pub fn new(x1: i8, y1: i8, x2: i8, y2: i8) -> Option<Self> {
        let unit = |v: i8| (-1..=1).contains(&v);
        if !(unit(x1) && unit(y1) && unit(x2) && unit(y2)) {
            return None;
        }
        let t = Self::raw(x1, y1, x2, y2);
        match t.determinant() {
            1 | -1 => Some(t),
            _ => None,
        }
    }

    /// Matrix entries as `(x1, y1, x2, y2)`
    pub fn entries(&self) -> (i8, i8, i8, i8) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    pub fn determinant(&self) -> i8 {
        self.x1 * self.y2 - self.y1 * self.x2
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// True when the transform turns the owner by a quarter turn (90 or 270
    /// degrees, mirrored or not). Field text on such owners swaps between
    /// horizontal and vertical.
    pub fn is_quarter_turn(&self) -> bool {
        self.y1 != 0
    }

    /// True when the transform flips handedness
    pub fn is_mirrored(&self) -> bool {
        self.determinant() < 0
    }

    /// Map a point through the matrix (no translation)
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            i64::from(self.x1) * p.x + i64::from(self.y1) * p.y,
            i64::from(self.x2) * p.x + i64::from(self.y2) * p.y,
        )
    }

    /// Matrix product `self · other` (apply `other` first)
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform::raw(
            self.x1 * other.x1 + self.y1 * other.x2,
            self.x1 * other.y1 + self.y1 * other.y2,
            self.x2 * other.x1 + self.y2 * other.x2,
            self.x2 * other.y1 + self.y2 * other.y2,
        )
    }

    /// Exact inverse.
    ///
    /// The adjugate divided by the determinant; with a determinant of ±1 the
    /// division is a sign flip.
    pub fn inverse(&self) -> Transform {
        let det = self.determinant();
        Transform::raw(self.y2 * det, -self.y1 * det, -self.x2 * det, self.x1 * det)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Named symbol orientations used to build owner transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolOrientation {
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
    MirrorX,
    MirrorY,
}

impl SymbolOrientation {
    pub fn transform(self) -> Transform {
        match self {
            SymbolOrientation::Rotate0 => Transform::IDENTITY,
            SymbolOrientation::Rotate90 => Transform::ROTATE_90,
            SymbolOrientation::Rotate180 => Transform::ROTATE_180,
            SymbolOrientation::Rotate270 => Transform::ROTATE_270,
            SymbolOrientation::MirrorX => Transform::MIRROR_X,
            SymbolOrientation::MirrorY => Transform::MIRROR_Y,
        }
    }

    /// Compose a sequence of orientation steps, applied in order
    pub fn chain(steps: &[SymbolOrientation]) -> Transform {
        steps
            .iter()
            .fold(Transform::IDENTITY, |acc, step| step.transform().compose(&acc))
    }
}
