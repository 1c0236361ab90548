//! TOML scene descriptions
//!
//! A scene lists placed components and sheets together with their fields.
//! Field positions are given in the owner's unrotated frame, in absolute
//! units; a field without a position sits on its owner's anchor.
//!
//! ```toml
//! [text_vars]
//! REVISION = "B"
//!
//! [[component]]
//! position = { x = 1000, y = 1000 }
//! orientation = ["rotate90"]
//! unit_count = 2
//! unit = 1
//!
//! [[component.field]]
//! id = 0
//! text = "U1"
//! position = { x = 1100, y = 1000 }
//!
//! [[component.field]]
//! name = "MPN"
//! text = "LM358DR"
//! visible = false
//!
//! [[sheet]]
//! position = { x = 0, y = 0 }
//! name = "Power"
//! file = "power.kicad_sch"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::DocumentError;
use crate::field::{Field, FieldRef};
use crate::geometry::{Point, Size, SymbolOrientation, TextAngle};
use crate::log::warn;
use crate::parent::{ComponentInstance, FieldParent, SheetInstance};
use crate::resolver::TextVars;
use crate::text::{HJustify, VJustify};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    text_vars: HashMap<String, String>,
    #[serde(default, rename = "component")]
    components: Vec<RawComponent>,
    #[serde(default, rename = "sheet")]
    sheets: Vec<RawSheet>,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawComponent {
    position: Point,
    #[serde(default)]
    orientation: Vec<SymbolOrientation>,
    #[serde(default = "one")]
    unit_count: u32,
    #[serde(default = "one")]
    unit: u32,
    #[serde(default)]
    power: bool,
    #[serde(default, rename = "field")]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSheet {
    position: Point,
    name: String,
    file: String,
    #[serde(default, rename = "field")]
    fields: Vec<RawField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawField {
    id: Option<usize>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    text: String,
    position: Option<Point>,
    #[serde(default)]
    angle: TextAngle,
    size: Option<Size>,
    #[serde(default)]
    thickness: i64,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    h_justify: HJustify,
    #[serde(default)]
    v_justify: VJustify,
    visible: Option<bool>,
    #[serde(default)]
    force_visible: bool,
}

/// Largest accepted magnitude for coordinates, sizes and thicknesses.
///
/// Placement adds, subtracts and multiplies these values; staying far below
/// `i64::MAX` keeps that arithmetic from overflowing.
pub const COORD_LIMIT: i64 = 1 << 40;

fn check_value(owner: &str, key: &str, value: i64) -> Result<(), DocumentError> {
    if value.unsigned_abs() > COORD_LIMIT.unsigned_abs() {
        return Err(DocumentError::Invalid {
            message: format!(
                "{}: {} = {} is out of range (limit {})",
                owner, key, value, COORD_LIMIT
            ),
        });
    }
    Ok(())
}

fn check_point(owner: &str, key: &str, point: Point) -> Result<(), DocumentError> {
    check_value(owner, &format!("{}.x", key), point.x)?;
    check_value(owner, &format!("{}.y", key), point.y)
}

impl RawField {
    fn validate(&self, owner: &str) -> Result<(), DocumentError> {
        if let Some(pos) = self.position {
            check_point(owner, "field position", pos)?;
        }
        if let Some(size) = self.size {
            check_value(owner, "field size.width", size.width)?;
            check_value(owner, "field size.height", size.height)?;
        }
        check_value(owner, "field thickness", self.thickness)
    }

    fn apply(&self, field: &mut Field) {
        if !self.name.is_empty() {
            field.set_name(self.name.as_str());
        }
        field.set_text(self.text.as_str());
        if let Some(pos) = self.position {
            field.set_text_pos(pos);
        }
        field.set_angle(self.angle);

        let effects = field.effects_mut();
        if let Some(size) = self.size {
            effects.size = size;
        }
        effects.thickness = self.thickness;
        effects.bold = self.bold;
        effects.italic = self.italic;
        effects.h_justify = self.h_justify;
        effects.v_justify = self.v_justify;

        field.set_visible(self.visible.unwrap_or(true));
        field.set_force_visible(self.force_visible);
    }
}

/// A field owner placed in a scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Component(ComponentInstance),
    Sheet(SheetInstance),
}

impl Item {
    pub fn as_parent(&self) -> &dyn FieldParent {
        match self {
            Item::Component(c) => c,
            Item::Sheet(s) => s,
        }
    }

    pub fn as_parent_mut(&mut self) -> &mut dyn FieldParent {
        match self {
            Item::Component(c) => c,
            Item::Sheet(s) => s,
        }
    }
}

/// A loaded scene: items in file order (components first, then sheets)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub items: Vec<Item>,
    pub text_vars: TextVars,
}

impl Document {
    /// Load a scene from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a scene from a TOML string
    pub fn from_str(source: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = toml::from_str(source)?;

        let mut items = Vec::with_capacity(raw.components.len() + raw.sheets.len());
        for (n, component) in raw.components.iter().enumerate() {
            items.push(Item::Component(build_component(n, component)?));
        }
        for (n, sheet) in raw.sheets.iter().enumerate() {
            items.push(Item::Sheet(build_sheet(n, sheet)?));
        }

        Ok(Self {
            items,
            text_vars: raw.text_vars.into_iter().collect(),
        })
    }

    /// Every field of every item, in order
    pub fn field_refs(&self) -> impl Iterator<Item = FieldRef<'_>> {
        self.items.iter().flat_map(|item| {
            let parent = item.as_parent();
            (0..parent.fields().len()).filter_map(move |i| FieldRef::attached(parent, i))
        })
    }
}

fn build_component(n: usize, raw: &RawComponent) -> Result<ComponentInstance, DocumentError> {
    let owner = format!("component {}", n);
    check_point(&owner, "position", raw.position)?;
    for field in &raw.fields {
        field.validate(&owner)?;
    }

    if raw.unit_count == 0 {
        return Err(DocumentError::Invalid {
            message: format!("component {}: unit_count must be at least 1", n),
        });
    }
    if raw.unit > raw.unit_count {
        return Err(DocumentError::Invalid {
            message: format!(
                "component {}: unit {} out of range (unit_count = {})",
                n, raw.unit, raw.unit_count
            ),
        });
    }

    let mut component = ComponentInstance::new(raw.position)
        .with_transform(SymbolOrientation::chain(&raw.orientation))
        .with_units(raw.unit_count, raw.unit)
        .with_power(raw.power);

    for field in &raw.fields {
        let index = match field.id {
            Some(id) if id < ComponentInstance::MANDATORY_FIELDS => id,
            other => {
                let index = component.add_field("", "");
                if other.is_some_and(|id| id != index) {
                    warn!(id = ?other, index, "unknown component field id; appending as user field");
                }
                index
            }
        };
        if let Some(target) = component.field_mut(index) {
            field.apply(target);
        }
    }

    Ok(component)
}

fn build_sheet(n: usize, raw: &RawSheet) -> Result<SheetInstance, DocumentError> {
    let owner = format!("sheet {}", n);
    check_point(&owner, "position", raw.position)?;
    for field in &raw.fields {
        field.validate(&owner)?;
    }

    let mut sheet = SheetInstance::new(raw.position, raw.name.as_str(), raw.file.as_str());

    for field in &raw.fields {
        let index = match field.id {
            Some(id) if id < SheetInstance::MANDATORY_FIELDS => id,
            other => {
                let index = sheet.add_field("", "");
                if other.is_some_and(|id| id != index) {
                    warn!(id = ?other, index, "unknown sheet field id; appending as user field");
                }
                index
            }
        };
        if let Some(target) = sheet.field_mut(index) {
            field.apply(target);
        }
    }

    Ok(sheet)
}
