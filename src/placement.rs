//! Field placement: bounding boxes, world/local mapping and hit testing
//!
//! ## Coordinate Frames
//!
//! A field stores its anchor in the owner's unrotated frame, in absolute
//! units. The on-canvas position is obtained by applying the owner's
//! transform around the owner's position:
//!
//! ```text
//! world = origin + T · (local - origin)
//! local = origin + T⁻¹ · (world - origin)
//! ```
//!
//! Both directions use integer matrices with entries in {-1, 0, 1}, so
//! `to_local(to_world(p)) == p` holds exactly.
//!
//! ## Bounding Box Pipeline
//!
//! 1. Measure the shown text and build the justified box at the anchor
//! 2. Express the corners relative to the owner origin
//! 3. Rotate the corners a quarter turn about the anchor for vertical text
//! 4. For owners that mirror the text box, reflect the corners' y about the anchor
//! 5. Apply the owner transform, move back to the owner origin, normalize

use crate::field::FieldRef;
use crate::geometry::{mirror_y, Point, Rect, Size, TextAngle, Transform};
use crate::parent::FieldParent;
use crate::settings::FieldSettings;
use crate::text::{pen_size, text_box, HJustify};

/// Map an owner-frame point to world space
pub fn to_world(origin: Point, transform: Transform, local: Point) -> Point {
    origin + transform.apply(local - origin)
}

/// Map a world-space point back to the owner frame (exact inverse of [`to_world`])
pub fn to_local(origin: Point, transform: Transform, world: Point) -> Point {
    origin + transform.inverse().apply(world - origin)
}

/// Move the field at `index` so that it is displayed at `world`.
///
/// Returns `false` when the parent has no such field.
pub fn set_field_position<P>(parent: &mut P, index: usize, world: Point) -> bool
where
    P: FieldParent + ?Sized,
{
    let local = to_local(parent.position(), parent.transform(), world);
    match parent.fields_mut().get_mut(index) {
        Some(field) => {
            field.set_text_pos(local);
            true
        }
        None => false,
    }
}

/// Rotate the stored anchor of the field at `index` a quarter turn about
/// `center`. The owner transform is not involved. Returns `false` when the
/// parent has no such field.
pub fn rotate_field<P>(parent: &mut P, index: usize, center: Point) -> bool
where
    P: FieldParent + ?Sized,
{
    match parent.fields_mut().get_mut(index) {
        Some(field) => {
            field.rotate_about(center);
            true
        }
        None => false,
    }
}

/// Result of the placement pipeline for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGeometry {
    /// World-space, normalized bounding box
    pub bbox: Rect,
    /// Orientation the text is drawn with once the owner rotation is applied
    pub angle: TextAngle,
}

/// Where a collaborator draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Interactive canvas: force-visible fields are drawn too
    Screen,
    /// Printing/plotting: only visible fields
    Plot,
}

/// Everything a drawing surface needs to render a field.
///
/// Text is always drawn centered on the bounding box center, which keeps
/// the justification logic out of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawText {
    pub text: String,
    pub position: Point,
    pub angle: TextAngle,
    pub size: Size,
    pub pen: i64,
    pub italic: bool,
    pub bold: bool,
    pub color: String,
}

/// Pure text-box transform.
///
/// Takes an already measured box and returns the world-space, normalized box
/// of the field anchored at `anchor`.
pub fn place_text_box(
    local_box: Rect,
    anchor: Point,
    angle: TextAngle,
    origin: Point,
    transform: Transform,
    mirror: bool,
) -> Rect {
    let pos = anchor - origin;
    let mut begin = local_box.origin() - origin;
    let mut end = local_box.end() - origin;

    if angle == TextAngle::Vertical {
        begin = begin.rotate_quarter(pos);
        end = end.rotate_quarter(pos);
    }

    if mirror {
        begin.y = mirror_y(begin.y, pos.y);
        end.y = mirror_y(end.y, pos.y);
    }

    Rect::from_corners(transform.apply(begin), transform.apply(end))
        .translate(origin)
        .normalize()
}

impl<'a> FieldRef<'a> {
    fn origin(&self) -> Point {
        self.parent().map(|p| p.position()).unwrap_or_default()
    }

    fn owner_transform(&self) -> Transform {
        self.parent().map(|p| p.transform()).unwrap_or_default()
    }

    /// On-canvas anchor position
    pub fn position(&self) -> Point {
        to_world(self.origin(), self.owner_transform(), self.field().text_pos())
    }

    /// Orientation of the drawn text.
    ///
    /// A quarter-turned owner swaps horizontal and vertical text.
    pub fn effective_angle(&self) -> TextAngle {
        self.field()
            .angle()
            .combine(self.owner_transform().is_quarter_turn())
    }

    /// Stroke width used to draw and measure the field
    pub fn pen_size(&self, settings: &FieldSettings) -> i64 {
        pen_size(self.field().effects(), settings.default_line_thickness)
    }

    /// Bounding box and effective angle
    pub fn geometry(&self, settings: &FieldSettings) -> FieldGeometry {
        self.geometry_for_text(&self.shown_text(settings), settings)
    }

    /// Geometry for a given shown text, skipping resolution
    pub fn geometry_for_text(&self, text: &str, settings: &FieldSettings) -> FieldGeometry {
        let field = self.field();
        let local_box = text_box(
            text,
            field.effects(),
            field.text_pos(),
            self.pen_size(settings),
        );
        let bbox = place_text_box(
            local_box,
            field.text_pos(),
            field.angle(),
            self.origin(),
            self.owner_transform(),
            self.parent().is_some_and(|p| p.mirrors_text_box()),
        );
        FieldGeometry {
            bbox,
            angle: self.effective_angle(),
        }
    }

    /// World-space, normalized bounding box of the shown text
    pub fn bounding_box(&self, settings: &FieldSettings) -> Rect {
        self.geometry(settings).bbox
    }

    /// Hit test against a point.
    ///
    /// Hidden and void fields are never hit.
    pub fn hit_test_point(&self, point: Point, accuracy: i64, settings: &FieldSettings) -> bool {
        let field = self.field();
        if !field.is_visible() || field.is_void() {
            return false;
        }
        self.bounding_box(settings).inflate(accuracy).contains(point)
    }

    /// Hit test against an area.
    ///
    /// In contained mode the whole bounding box must lie inside the area,
    /// otherwise any overlap counts. The area is grown by `accuracy`.
    pub fn hit_test_rect(
        &self,
        area: Rect,
        contained: bool,
        accuracy: i64,
        settings: &FieldSettings,
    ) -> bool {
        let field = self.field();
        if !field.is_visible() || field.is_void() {
            return false;
        }
        let area = area.inflate(accuracy);
        let bbox = self.bounding_box(settings);
        if contained {
            area.contains_rect(&bbox)
        } else {
            area.intersects(&bbox)
        }
    }

    /// Whether the field is drawn in the given mode
    pub fn is_drawn(&self, mode: DrawMode) -> bool {
        let field = self.field();
        if field.is_void() {
            return false;
        }
        match mode {
            DrawMode::Screen => field.is_visible() || field.is_force_visible(),
            DrawMode::Plot => field.is_visible(),
        }
    }

    /// Draw command for the field, or `None` when nothing is drawn
    pub fn draw_command(&self, mode: DrawMode, settings: &FieldSettings) -> Option<DrawText> {
        if !self.is_drawn(mode) {
            return None;
        }

        let field = self.field();
        let text = self.shown_text(settings);
        let geometry = self.geometry_for_text(&text, settings);
        let color = if mode == DrawMode::Screen && field.is_force_visible() {
            settings.palette.force_visible.clone()
        } else {
            settings.palette.color(field.layer()).to_string()
        };

        Some(DrawText {
            text,
            position: geometry.bbox.center(),
            angle: geometry.angle,
            size: field.effects().size,
            pen: self.pen_size(settings),
            italic: field.effects().italic,
            bold: field.effects().bold,
            color,
        })
    }

    /// True when the owner transform moved the text to the other side of
    /// its anchor than the declared horizontal justification implies
    pub fn is_horiz_justify_flipped(&self, settings: &FieldSettings) -> bool {
        let center = self.bounding_box(settings).center();
        let pos = self.position();
        match self.field().effects().h_justify {
            HJustify::Left => center.x < pos.x,
            HJustify::Right => center.x > pos.x,
            HJustify::Center => false,
        }
    }
}
