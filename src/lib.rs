//! Schematic Fields - text resolution and placement for schematic fields
//!
//! A field is a named piece of annotated text (reference designator, value,
//! footprint, sheet name, user properties) attached to a placed component or
//! a hierarchical sheet. This library resolves `${NAME}` references between
//! sibling fields, maps field anchors between the owner's frame and the
//! canvas, computes bounding boxes for hit testing and drawing, and supports
//! find/replace over field text.
//!
//! # Example
//!
//! ```rust
//! use schematic_fields::{ComponentInstance, FieldRef, FieldSettings, Point};
//!
//! let mut c = ComponentInstance::new(Point::new(1000, 1000))
//!     .with_field_text(ComponentInstance::REFERENCE, "R1")
//!     .with_field_text(ComponentInstance::VALUE, "10k");
//! let label = c.add_field("Label", "${REFERENCE}: ${VALUE}");
//!
//! let field = FieldRef::attached(&c, label).unwrap();
//! assert_eq!(field.shown_text(&FieldSettings::default()), "R1: 10k");
//! ```

pub mod document;
pub mod error;
pub mod field;
pub mod geometry;
pub mod log;
pub mod parent;
pub mod placement;
pub mod resolver;
pub mod search;
pub mod settings;
pub mod text;

use std::fmt;

pub use document::{Document, Item};
pub use error::DocumentError;
pub use field::{Field, FieldRef, Layer};
pub use geometry::{Point, Rect, Size, SymbolOrientation, TextAngle, Transform};
pub use parent::{ComponentInstance, FieldParent, SheetInstance, UnitInfo};
pub use placement::{rotate_field, set_field_position, DrawMode, DrawText, FieldGeometry};
pub use resolver::{ResolutionContext, TextVars};
pub use search::{replace, replace_field, ReplaceOutcome, SearchQuery};
pub use settings::{FieldSettings, SettingsError};
pub use text::{HJustify, TextEffects, VJustify};

/// Configuration for the inspection pipeline
#[derive(Debug, Clone, Default)]
pub struct InspectConfig {
    /// Field settings used for resolution and metrics
    pub settings: FieldSettings,
    /// Optional point to hit-test every field against
    pub hit_point: Option<Point>,
    /// Hit-test tolerance in internal units
    pub accuracy: i64,
}

impl InspectConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: FieldSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Hit-test every field against `point`
    pub fn with_hit_point(mut self, point: Point) -> Self {
        self.hit_point = Some(point);
        self
    }

    pub fn with_accuracy(mut self, accuracy: i64) -> Self {
        self.accuracy = accuracy;
        self
    }
}

/// One line of an inspection report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    /// Owner kind and its position in the document ("component 0")
    pub owner: String,
    pub name: String,
    pub shown_text: String,
    pub bbox: Rect,
    /// Hit-test result when a hit point was configured
    pub hit: Option<bool>,
}

impl fmt::Display for FieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:?} [{},{} {}x{}]",
            self.owner,
            self.name,
            self.shown_text,
            self.bbox.x,
            self.bbox.y,
            self.bbox.width,
            self.bbox.height
        )?;
        if let Some(hit) = self.hit {
            write!(f, " hit={}", if hit { "yes" } else { "no" })?;
        }
        Ok(())
    }
}

/// Inspect a scene with default configuration
pub fn inspect(source: &str) -> Result<Vec<FieldReport>, DocumentError> {
    inspect_with_config(source, &InspectConfig::default())
}

/// Load a scene and report every field's shown text and bounding box
pub fn inspect_with_config(
    source: &str,
    config: &InspectConfig,
) -> Result<Vec<FieldReport>, DocumentError> {
    let doc = Document::from_str(source)?;
    Ok(inspect_document(&doc, config))
}

/// Report every field of an already loaded document
pub fn inspect_document(doc: &Document, config: &InspectConfig) -> Vec<FieldReport> {
    let settings = &config.settings;
    let mut reports = Vec::new();

    for (n, item) in doc.items.iter().enumerate() {
        let parent = item.as_parent();
        for index in 0..parent.fields().len() {
            let Some(field) = FieldRef::attached(parent, index) else {
                continue;
            };

            let mut ctx = ResolutionContext::new(settings).with_text_vars(&doc.text_vars);
            let shown_text = field.shown_text_with(&mut ctx);
            let bbox = field.geometry_for_text(&shown_text, settings).bbox;
            let hit = config
                .hit_point
                .map(|p| field.hit_test_point(p, config.accuracy, settings));

            reports.push(FieldReport {
                owner: format!("{} {}", parent.kind_name(), n),
                name: field.name(true),
                shown_text,
                bbox,
                hit,
            });
        }
    }

    reports
}

/// Render reports one per line
pub fn format_report(reports: &[FieldReport]) -> String {
    reports
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
