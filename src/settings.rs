//! Settings for field text resolution and display
//!
//! Settings are plain values with builder setters and can be loaded from a
//! TOML file. Every section and key is optional; missing values keep their
//! defaults.
//!
//! ```toml
//! [text]
//! default_line_thickness = 6
//! sheet_file_label = "File: "
//!
//! [sub_reference]
//! separator = "."
//! first_id = "A"
//!
//! [resolver]
//! guard_cycles = true
//! max_depth = 10
//!
//! [colors]
//! reference = "#008484"
//! force_visible = "#484848"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::field::Layer;

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: String, reason: String },
}

/// How unit sub-references are spelled ("U1A", "U1.2", ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubReferenceStyle {
    /// Optional character inserted between the reference and the unit id
    pub separator: Option<char>,
    /// Id of unit 1: a letter gives alphabetic ids, a digit gives numbers
    pub first_id: char,
}

impl Default for SubReferenceStyle {
    fn default() -> Self {
        Self {
            separator: None,
            first_id: 'A',
        }
    }
}

impl SubReferenceStyle {
    pub fn is_numeric(&self) -> bool {
        self.first_id.is_ascii_digit()
    }
}

/// Layer name to color mapping
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPalette {
    /// Color mappings: layer key -> hex color
    pub colors: HashMap<String, String>,
    /// Color used for hidden fields drawn because they are force-visible
    pub force_visible: String,
}

const DEFAULT_LAYER_COLORS: [(Layer, &str); 6] = [
    (Layer::Fields, "#840084"),
    (Layer::Reference, "#008484"),
    (Layer::Value, "#008484"),
    (Layer::SheetName, "#008484"),
    (Layer::SheetFileName, "#840000"),
    (Layer::SheetFields, "#840084"),
];

const DARK_GRAY: &str = "#484848";

/// Last-resort color for layers missing from every palette
const FALLBACK_COLOR: &str = "#000000";

impl Default for LayerPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_LAYER_COLORS
                .iter()
                .map(|(layer, color)| (layer.key().to_string(), color.to_string()))
                .collect(),
            force_visible: DARK_GRAY.to_string(),
        }
    }
}

impl LayerPalette {
    /// Color of a layer, falling back to the default palette
    pub fn color(&self, layer: Layer) -> &str {
        if let Some(color) = self.colors.get(layer.key()) {
            return color;
        }
        DEFAULT_LAYER_COLORS
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, c)| *c)
            .unwrap_or(FALLBACK_COLOR)
    }
}

/// Configuration for shown-text resolution and field display
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSettings {
    /// Pen width for fields whose thickness is 0
    pub default_line_thickness: i64,
    /// Label prefixed to a sheet's file field
    pub sheet_file_label: String,
    pub sub_reference: SubReferenceStyle,
    /// Cut reference chains that come back to a field already being expanded
    pub guard_cycles: bool,
    /// Maximum nesting of field references
    pub max_depth: usize,
    pub palette: LayerPalette,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            default_line_thickness: 6,
            sheet_file_label: "File: ".to_string(),
            sub_reference: SubReferenceStyle::default(),
            guard_cycles: true,
            max_depth: 10,
            palette: LayerPalette::default(),
        }
    }
}

/// TOML structure for deserializing settings
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    text: Option<TomlText>,
    sub_reference: Option<TomlSubReference>,
    resolver: Option<TomlResolver>,
    colors: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlText {
    default_line_thickness: Option<i64>,
    sheet_file_label: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSubReference {
    separator: Option<String>,
    first_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlResolver {
    guard_cycles: Option<bool>,
    max_depth: Option<usize>,
}

fn single_char(key: &str, value: &str) -> Result<char, SettingsError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SettingsError::Invalid {
            key: key.to_string(),
            reason: format!("expected a single character, got {:?}", value),
        }),
    }
}

impl FieldSettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let mut settings = Self::default();

        if let Some(text) = parsed.text {
            if let Some(thickness) = text.default_line_thickness {
                if thickness <= 0 {
                    return Err(SettingsError::Invalid {
                        key: "text.default_line_thickness".to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
                settings.default_line_thickness = thickness;
            }
            if let Some(label) = text.sheet_file_label {
                settings.sheet_file_label = label;
            }
        }

        if let Some(sub) = parsed.sub_reference {
            if let Some(sep) = sub.separator {
                settings.sub_reference.separator = if sep.is_empty() {
                    None
                } else {
                    Some(single_char("sub_reference.separator", &sep)?)
                };
            }
            if let Some(first) = sub.first_id {
                let c = single_char("sub_reference.first_id", &first)?;
                if !c.is_ascii_alphanumeric() {
                    return Err(SettingsError::Invalid {
                        key: "sub_reference.first_id".to_string(),
                        reason: "must be a letter or a digit".to_string(),
                    });
                }
                settings.sub_reference.first_id = c;
            }
        }

        if let Some(resolver) = parsed.resolver {
            if let Some(guard) = resolver.guard_cycles {
                settings.guard_cycles = guard;
            }
            if let Some(depth) = resolver.max_depth {
                settings.max_depth = depth;
            }
        }

        if let Some(mut colors) = parsed.colors {
            if let Some(force) = colors.remove("force_visible") {
                settings.palette.force_visible = force;
            }
            settings.palette.colors.extend(colors);
        }

        Ok(settings)
    }

    pub fn with_default_line_thickness(mut self, thickness: i64) -> Self {
        self.default_line_thickness = thickness;
        self
    }

    pub fn with_sheet_file_label(mut self, label: impl Into<String>) -> Self {
        self.sheet_file_label = label.into();
        self
    }

    pub fn with_sub_reference(mut self, style: SubReferenceStyle) -> Self {
        self.sub_reference = style;
        self
    }

    /// Enable or disable the reference cycle guard
    pub fn with_cycle_guard(mut self, guard: bool) -> Self {
        self.guard_cycles = guard;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_palette(mut self, palette: LayerPalette) -> Self {
        self.palette = palette;
        self
    }
}
