//! Integer geometry for field placement
//!
//! Points, rectangles, the two-valued text orientation and the
//! rotation/mirror matrices owners use to place their fields.

pub mod transform;
pub mod types;

pub use transform::{mirror_y, SymbolOrientation, Transform};
pub use types::{Point, Rect, Size, TextAngle};
