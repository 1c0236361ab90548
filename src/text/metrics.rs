//! Text extent and stroke width estimation
//!
//! The host drawing surface owns the real stroke font. These metrics follow
//! the same rules closely enough for selection and layout: every glyph is one
//! text width wide, lines are spaced at 1.4 text heights, italic text gains a
//! slant of one eighth of its height, and the pen width adds to both extents.

use serde::Deserialize;

use crate::geometry::{Point, Rect, Size};

/// Horizontal justification relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HJustify {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical justification relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VJustify {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Visual text attributes of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextEffects {
    pub size: Size,
    /// Stroke width; 0 selects a default from the settings
    pub thickness: i64,
    pub bold: bool,
    pub italic: bool,
    pub h_justify: HJustify,
    pub v_justify: VJustify,
}

impl TextEffects {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_thickness(mut self, thickness: i64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_justify(mut self, h: HJustify, v: VJustify) -> Self {
        self.h_justify = h;
        self.v_justify = v;
        self
    }
}

/// Integer division rounded half away from zero
fn round_div(num: i64, den: i64) -> i64 {
    let half = den / 2;
    if num >= 0 {
        (num + half) / den
    } else {
        (num - half) / den
    }
}

/// Pen width used for bold text of the given glyph width
pub fn bold_pen_size(text_width: i64) -> i64 {
    round_div(text_width.abs(), 5)
}

/// Limit a pen width so small text stays legible.
///
/// The width never exceeds a quarter (bold) or a sixth (normal) of the
/// smaller glyph dimension, and never drops below one unit.
pub fn clamp_pen_size(pen: i64, size: Size, bold: bool) -> i64 {
    let smallest = size.width.abs().min(size.height.abs());
    let scale = if bold { 4 } else { 6 };
    let max_width = round_div(smallest, scale);
    pen.min(max_width).max(1)
}

/// Effective stroke width for the effects
pub fn pen_size(effects: &TextEffects, default_thickness: i64) -> i64 {
    let pen = match effects.thickness {
        0 if effects.bold => bold_pen_size(effects.size.width),
        0 => default_thickness,
        t => t,
    };
    clamp_pen_size(pen, effects.size, effects.bold)
}

/// Distance between consecutive baselines
pub fn interline(size: Size) -> i64 {
    round_div(size.height.abs() * 14, 10)
}

/// Width and height of the rendered text including the pen
pub fn text_extent(text: &str, effects: &TextEffects, pen: i64) -> Size {
    let glyph_w = effects.size.width.abs();
    let glyph_h = effects.size.height.abs();

    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as i64;
    let line_count = text.lines().count().max(1) as i64;

    let mut width = longest * glyph_w + pen;
    if effects.italic {
        width += round_div(glyph_h, 8);
    }
    let height = glyph_h + (line_count - 1) * interline(effects.size) + pen;

    Size::new(width, height)
}

/// Unrotated text box placed at `anchor` according to the justification
pub fn text_box(text: &str, effects: &TextEffects, anchor: Point, pen: i64) -> Rect {
    let extent = text_extent(text, effects, pen);

    let x = match effects.h_justify {
        HJustify::Left => anchor.x,
        HJustify::Center => anchor.x - extent.width / 2,
        HJustify::Right => anchor.x - extent.width,
    };
    let y = match effects.v_justify {
        VJustify::Top => anchor.y,
        VJustify::Center => anchor.y - extent.height / 2,
        VJustify::Bottom => anchor.y - extent.height,
    };

    Rect::new(x, y, extent.width, extent.height)
}
