//! Text templates and text metrics
//!
//! This module holds the field-independent parts of text handling: the
//! `${NAME}` template lexer and expander, and the stroke/extent estimation
//! used to size a field's bounding box.
//!
//! # Example
//!
//! ```rust
//! use schematic_fields::text::expand_text_vars;
//!
//! let out = expand_text_vars("${VALUE} ohm", |name| {
//!     (name == "VALUE").then(|| "10k".to_string())
//! });
//! assert_eq!(out, "10k ohm");
//! ```

mod expand;
pub mod lexer;
pub mod metrics;

pub use expand::{expand_text_vars, has_text_vars};
pub use metrics::{pen_size, text_box, text_extent, HJustify, TextEffects, VJustify};
