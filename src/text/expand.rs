//! Generic `${NAME}` expansion
//!
//! The expander knows nothing about fields or owners; it hands each variable
//! name to a resolver callback and splices in whatever comes back.

use super::lexer::{segments, Segment};

/// Expand every `${NAME}` reference in `source`.
///
/// - The resolver returns `Some(value)` to substitute a variable.
/// - Unresolved references are copied through as `${NAME}`.
/// - An empty reference (`${}`) is dropped.
pub fn expand_text_vars<F>(source: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(source.len());

    for segment in segments(source) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable("") => {}
            Segment::Variable(name) => match resolve(name) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                }
            },
        }
    }

    out
}

/// True if the text contains at least one complete `${...}` reference
pub fn has_text_vars(source: &str) -> bool {
    segments(source)
        .iter()
        .any(|s| matches!(s, Segment::Variable(_)))
}
