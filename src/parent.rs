//! Field owners: component instances and hierarchical sheet instances
//!
//! [`FieldParent`] is the only seam between fields and the things that own
//! them. Shown-text resolution and placement call its methods and never look
//! at the concrete owner type. A new kind of owner implements the trait and
//! the rest of the crate works unchanged.
//!
//! Role-specific behavior lives in the provided-method overrides:
//! - components append the unit sub-reference to the reference field and
//!   expose `FOOTPRINT_LIBRARY`, `FOOTPRINT_NAME` and `UNIT`;
//! - sheets prefix the file field with a label and refuse to replace it.

use crate::field::{Field, Layer};
use crate::geometry::{Point, Transform};
use crate::settings::{FieldSettings, SubReferenceStyle};

/// Multi-unit information of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitInfo {
    /// Number of units in the package
    pub count: u32,
    /// Selected unit, starting at 1
    pub current: u32,
}

impl UnitInfo {
    pub fn is_multi_unit(&self) -> bool {
        self.count > 1
    }
}

/// Capability shared by every field owner
pub trait FieldParent {
    /// Short owner description used in logs and reports
    fn kind_name(&self) -> &'static str;

    /// Ordered fields; the first `mandatory_count()` hold the built-in roles
    fn fields(&self) -> &[Field];

    fn fields_mut(&mut self) -> &mut [Field];

    fn mandatory_count(&self) -> usize;

    /// World-space anchor of the owner
    fn position(&self) -> Point;

    /// Rotation/mirror applied around `position()`
    fn transform(&self) -> Transform {
        Transform::IDENTITY
    }

    fn unit_info(&self) -> Option<UnitInfo> {
        None
    }

    /// Role name of a mandatory field id
    fn canonical_name(&self, id: usize) -> Option<&'static str>;

    /// Name shown for a field that has no user-assigned name
    fn default_field_name(&self, id: usize) -> String;

    /// Variables computed by the owner rather than stored in a field
    fn pseudo_variable(&self, _token: &str, _settings: &FieldSettings) -> Option<String> {
        None
    }

    /// Role-specific decoration of an expanded field text
    fn decorate_shown_text(&self, _id: usize, text: String, _settings: &FieldSettings) -> String {
        text
    }

    /// Whether the text box is mirrored about the anchor before the
    /// transform is applied. Component text is never drawn mirrored, only
    /// repositioned, which this compensates for.
    fn mirrors_text_box(&self) -> bool {
        false
    }

    /// Whether find/replace may rewrite the field
    fn is_replaceable(&self, _id: usize) -> bool {
        true
    }

    /// Whether the field holds the owner's reference designator
    fn is_reference(&self, _id: usize) -> bool {
        false
    }
}

/// Spell the sub-reference of a unit ("A", "B", ..., "AA" or "1", "2", ...).
///
/// Unit 0 has no sub-reference.
pub fn sub_reference(unit: u32, style: &SubReferenceStyle) -> String {
    if unit == 0 {
        return String::new();
    }

    let mut out = String::new();
    if let Some(sep) = style.separator {
        out.push(sep);
    }

    if style.is_numeric() {
        out.push_str(&unit.to_string());
        return out;
    }

    // bijective base 26: 1 -> A, 26 -> Z, 27 -> AA
    let first = u32::from(style.first_id);
    let mut letters = Vec::new();
    let mut n = unit;
    while n > 0 {
        n -= 1;
        letters.push(char::from_u32(first + n % 26).unwrap_or(style.first_id));
        n /= 26;
    }
    out.extend(letters.iter().rev());
    out
}

/// Split a footprint identifier into library and name.
///
/// `"Resistor_SMD:R_0603"` gives `("Resistor_SMD", "R_0603")`. Without a
/// separator both parts are the whole text.
pub fn split_footprint(text: &str) -> (&str, &str) {
    let mut parts = text.split(':');
    let library = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or(library);
    (library, name)
}

/// A placed schematic symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInstance {
    position: Point,
    transform: Transform,
    fields: Vec<Field>,
    unit_count: u32,
    unit: u32,
    power: bool,
}

impl ComponentInstance {
    pub const REFERENCE: usize = 0;
    pub const VALUE: usize = 1;
    pub const FOOTPRINT: usize = 2;
    pub const DATASHEET: usize = 3;
    pub const MANDATORY_FIELDS: usize = 4;

    /// Create a single-unit component with its four mandatory fields
    /// anchored at `position`
    pub fn new(position: Point) -> Self {
        let fields = (0..Self::MANDATORY_FIELDS)
            .map(|id| {
                let layer = match id {
                    Self::REFERENCE => Layer::Reference,
                    Self::VALUE => Layer::Value,
                    _ => Layer::Fields,
                };
                Field::new(id, position).with_layer(layer)
            })
            .collect();

        Self {
            position,
            transform: Transform::IDENTITY,
            fields,
            unit_count: 1,
            unit: 1,
            power: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the package unit count and the selected unit
    pub fn with_units(mut self, count: u32, current: u32) -> Self {
        self.unit_count = count.max(1);
        self.unit = current;
        self
    }

    /// Mark the component as a power symbol
    pub fn with_power(mut self, power: bool) -> Self {
        self.power = power;
        self
    }

    /// Set the text of a mandatory field; ids outside the mandatory range
    /// are ignored
    pub fn with_field_text(mut self, id: usize, text: impl Into<String>) -> Self {
        if let Some(field) = self.fields.get_mut(id).filter(|_| id < Self::MANDATORY_FIELDS) {
            field.set_text(text);
        }
        self
    }

    pub fn is_power(&self) -> bool {
        self.power
    }

    /// Append a user field and return its index
    pub fn add_field(&mut self, name: impl Into<String>, text: impl Into<String>) -> usize {
        let id = self.fields.len();
        self.fields.push(
            Field::new(id, self.position)
                .with_name(name)
                .with_text(text),
        );
        id
    }

    pub fn field(&self, id: usize) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn field_mut(&mut self, id: usize) -> Option<&mut Field> {
        self.fields.get_mut(id)
    }
}

impl FieldParent for ComponentInstance {
    fn kind_name(&self) -> &'static str {
        "component"
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    fn mandatory_count(&self) -> usize {
        Self::MANDATORY_FIELDS
    }

    fn position(&self) -> Point {
        self.position
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn unit_info(&self) -> Option<UnitInfo> {
        Some(UnitInfo {
            count: self.unit_count,
            current: self.unit,
        })
    }

    fn canonical_name(&self, id: usize) -> Option<&'static str> {
        match id {
            Self::REFERENCE => Some("Reference"),
            Self::VALUE => Some("Value"),
            Self::FOOTPRINT => Some("Footprint"),
            Self::DATASHEET => Some("Datasheet"),
            _ => None,
        }
    }

    fn default_field_name(&self, id: usize) -> String {
        match self.canonical_name(id) {
            Some(name) => name.to_string(),
            None => format!("Field{}", id),
        }
    }

    fn pseudo_variable(&self, token: &str, settings: &FieldSettings) -> Option<String> {
        let footprint = || {
            self.fields
                .get(Self::FOOTPRINT)
                .map(|f| f.text())
                .unwrap_or_default()
        };

        match token {
            "FOOTPRINT_LIBRARY" => Some(split_footprint(footprint()).0.to_string()),
            "FOOTPRINT_NAME" => Some(split_footprint(footprint()).1.to_string()),
            "UNIT" => self
                .unit_info()
                .map(|unit| sub_reference(unit.current, &settings.sub_reference)),
            _ => None,
        }
    }

    fn decorate_shown_text(&self, id: usize, mut text: String, settings: &FieldSettings) -> String {
        if id != Self::REFERENCE {
            return text;
        }
        if let Some(unit) = self.unit_info().filter(UnitInfo::is_multi_unit) {
            text.push_str(&sub_reference(unit.current, &settings.sub_reference));
        }
        text
    }

    fn mirrors_text_box(&self) -> bool {
        true
    }

    fn is_replaceable(&self, id: usize) -> bool {
        !(id == Self::VALUE && self.power)
    }

    fn is_reference(&self, id: usize) -> bool {
        id == Self::REFERENCE
    }
}

/// A hierarchical sheet placed on a parent sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetInstance {
    position: Point,
    fields: Vec<Field>,
}

impl SheetInstance {
    pub const SHEET_NAME: usize = 0;
    pub const SHEET_FILE: usize = 1;
    pub const MANDATORY_FIELDS: usize = 2;

    /// Create a sheet with its name and file fields anchored at `position`
    pub fn new(position: Point, name: impl Into<String>, file: impl Into<String>) -> Self {
        let fields = vec![
            Field::new(Self::SHEET_NAME, position)
                .with_layer(Layer::SheetName)
                .with_text(name),
            Field::new(Self::SHEET_FILE, position)
                .with_layer(Layer::SheetFileName)
                .with_text(file),
        ];
        Self { position, fields }
    }

    /// Append a user field and return its index
    pub fn add_field(&mut self, name: impl Into<String>, text: impl Into<String>) -> usize {
        let id = self.fields.len();
        self.fields.push(
            Field::new(id, self.position)
                .with_layer(Layer::SheetFields)
                .with_name(name)
                .with_text(text),
        );
        id
    }

    pub fn field(&self, id: usize) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn field_mut(&mut self, id: usize) -> Option<&mut Field> {
        self.fields.get_mut(id)
    }
}

impl FieldParent for SheetInstance {
    fn kind_name(&self) -> &'static str {
        "sheet"
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    fn mandatory_count(&self) -> usize {
        Self::MANDATORY_FIELDS
    }

    fn position(&self) -> Point {
        self.position
    }

    fn canonical_name(&self, id: usize) -> Option<&'static str> {
        match id {
            Self::SHEET_NAME => Some("Sheetname"),
            Self::SHEET_FILE => Some("Sheetfile"),
            _ => None,
        }
    }

    fn default_field_name(&self, id: usize) -> String {
        match id {
            Self::SHEET_NAME => "Sheet name".to_string(),
            Self::SHEET_FILE => "Sheet file".to_string(),
            _ => format!("Field{}", id),
        }
    }

    fn decorate_shown_text(&self, id: usize, text: String, settings: &FieldSettings) -> String {
        if id == Self::SHEET_FILE {
            format!("{}{}", settings.sheet_file_label, text)
        } else {
            text
        }
    }

    fn is_replaceable(&self, id: usize) -> bool {
        id != Self::SHEET_FILE
    }
}
