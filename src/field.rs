//! Field entities and the borrowed field handle
//!
//! A [`Field`] is plain data owned by its parent. Everything that needs the
//! parent (shown text, placement, search) goes through a [`FieldRef`], which
//! borrows the parent and remembers the field's index inside it.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::geometry::{Point, TextAngle};
use crate::parent::FieldParent;
use crate::text::TextEffects;

/// Draw layer of a field; selects the fallback color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    #[default]
    Fields,
    Reference,
    Value,
    SheetName,
    SheetFileName,
    SheetFields,
}

impl Layer {
    /// Key used for the layer in settings files
    pub fn key(self) -> &'static str {
        match self {
            Layer::Fields => "fields",
            Layer::Reference => "reference",
            Layer::Value => "value",
            Layer::SheetName => "sheet_name",
            Layer::SheetFileName => "sheet_file_name",
            Layer::SheetFields => "sheet_fields",
        }
    }
}

/// One annotated text item attached to a component or sheet.
///
/// `text_pos` is the anchor in the owner's unrotated frame, expressed in
/// absolute units: the owner's transform is applied around the owner's
/// position to obtain the on-canvas position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: usize,
    name: String,
    text: String,
    text_pos: Point,
    angle: TextAngle,
    effects: TextEffects,
    visible: bool,
    force_visible: bool,
    layer: Layer,
}

impl Field {
    /// Create a visible, horizontal field with default text effects
    pub fn new(id: usize, text_pos: Point) -> Self {
        Self {
            id,
            name: String::new(),
            text: String::new(),
            text_pos,
            angle: TextAngle::Horizontal,
            effects: TextEffects::default(),
            visible: true,
            force_visible: false,
            layer: Layer::Fields,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_angle(mut self, angle: TextAngle) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_effects(mut self, effects: TextEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// User-assigned name, empty when the default name applies
    pub fn raw_name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Unexpanded template text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text_pos(&self) -> Point {
        self.text_pos
    }

    pub fn set_text_pos(&mut self, pos: Point) {
        self.text_pos = pos;
    }

    pub fn angle(&self) -> TextAngle {
        self.angle
    }

    pub fn set_angle(&mut self, angle: TextAngle) {
        self.angle = angle;
    }

    pub fn effects(&self) -> &TextEffects {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut TextEffects {
        &mut self.effects
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_force_visible(&self) -> bool {
        self.force_visible
    }

    /// Draw the field even when hidden (used while editing hidden fields)
    pub fn set_force_visible(&mut self, force: bool) {
        self.force_visible = force;
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    /// A field with no text is never drawn nor hit
    pub fn is_void(&self) -> bool {
        self.text.is_empty()
    }

    /// Rotate the anchor a quarter turn about `center`
    pub fn rotate_about(&mut self, center: Point) {
        self.text_pos = self.text_pos.rotate_quarter(center);
    }

    /// Stable ordering: id, text, anchor x, anchor y, then name
    pub fn compare(&self, other: &Field) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.text.cmp(&other.text))
            .then_with(|| self.text_pos.x.cmp(&other.text_pos.x))
            .then_with(|| self.text_pos.y.cmp(&other.text_pos.y))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// A field together with the parent that owns it.
///
/// The handle is only valid while the parent is borrowed; it never owns the
/// parent. A detached handle (no parent) degrades every parent-dependent
/// operation to the field's raw data.
#[derive(Clone, Copy)]
pub struct FieldRef<'a> {
    field: &'a Field,
    owner: Option<(&'a dyn FieldParent, usize)>,
}

impl<'a> FieldRef<'a> {
    /// Borrow the field at `index` of `parent`
    pub fn attached(parent: &'a dyn FieldParent, index: usize) -> Option<Self> {
        parent.fields().get(index).map(|field| Self {
            field,
            owner: Some((parent, index)),
        })
    }

    /// A field that has not been attached to any parent yet
    pub fn detached(field: &'a Field) -> Self {
        Self { field, owner: None }
    }

    pub fn field(&self) -> &'a Field {
        self.field
    }

    pub fn parent(&self) -> Option<&'a dyn FieldParent> {
        self.owner.map(|(parent, _)| parent)
    }

    /// Index of the field inside its parent's field list
    pub fn index(&self) -> Option<usize> {
        self.owner.map(|(_, index)| index)
    }

    pub fn id(&self) -> usize {
        self.field.id()
    }

    /// True when the field occupies one of the parent's built-in roles
    pub fn is_mandatory(&self) -> bool {
        self.parent()
            .is_some_and(|p| self.field.id() < p.mandatory_count())
    }

    /// Field name.
    ///
    /// Returns the user-assigned name, or when that is empty and
    /// `use_default` is set, the default name the parent gives this id.
    pub fn name(&self, use_default: bool) -> String {
        if !self.field.raw_name().is_empty() {
            return self.field.raw_name().to_string();
        }
        match self.parent() {
            Some(parent) if use_default => parent.default_field_name(self.field.id()),
            _ => String::new(),
        }
    }

    /// Stable, locale-independent role name for mandatory fields; the user
    /// name for any other field
    pub fn canonical_name(&self) -> String {
        self.parent()
            .and_then(|p| p.canonical_name(self.field.id()))
            .map(str::to_string)
            .unwrap_or_else(|| self.field.raw_name().to_string())
    }
}

impl std::fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("field", self.field)
            .field("index", &self.index())
            .field("parent", &self.parent().map(|p| p.kind_name()))
            .finish()
    }
}
