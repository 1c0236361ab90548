//! Shown-text resolution for fields
//!
//! A field's raw text may reference sibling fields with `${NAME}`. Lookup
//! order for a reference:
//!
//! 1. mandatory fields, by upper-cased canonical name (`${REFERENCE}`, `${VALUE}`, ...)
//! 2. user fields, by name as written or upper-cased
//! 3. owner pseudo-variables (`${FOOTPRINT_LIBRARY}`, `${FOOTPRINT_NAME}`, `${UNIT}`)
//! 4. project text variables, when supplied
//!
//! Anything else is left in the output as written. A reference to the field
//! itself expands to nothing. With the cycle guard enabled (the default) the
//! same holds for a reference back to any field already being expanded, so
//! `A -> B -> A` terminates; the nesting limit bounds expansion either way.

use std::collections::{HashMap, HashSet};

use crate::field::FieldRef;
use crate::log::{debug, warn};
use crate::parent::FieldParent;
use crate::settings::FieldSettings;
use crate::text::expand_text_vars;

/// Project-level text variables consulted after the owner's fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextVars {
    vars: HashMap<String, String>,
}

impl TextVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|s| s.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// State of one shown-text resolution
#[derive(Debug, Clone)]
pub struct ResolutionContext<'s> {
    settings: &'s FieldSettings,
    text_vars: Option<&'s TextVars>,
    /// Field indices currently being expanded (cycle detection)
    resolving: HashSet<usize>,
    depth: usize,
}

impl<'s> ResolutionContext<'s> {
    pub fn new(settings: &'s FieldSettings) -> Self {
        Self {
            settings,
            text_vars: None,
            resolving: HashSet::new(),
            depth: 0,
        }
    }

    /// Fall back to project text variables for unknown names
    pub fn with_text_vars(mut self, vars: &'s TextVars) -> Self {
        self.text_vars = Some(vars);
        self
    }

    pub fn settings(&self) -> &'s FieldSettings {
        self.settings
    }

    /// Check if a field is currently being expanded
    pub fn is_resolving(&self, index: usize) -> bool {
        self.resolving.contains(&index)
    }

    fn start_resolving(&mut self, index: usize) {
        self.resolving.insert(index);
        self.depth += 1;
    }

    fn done_resolving(&mut self, index: usize) {
        self.resolving.remove(&index);
        self.depth -= 1;
    }
}

impl<'a> FieldRef<'a> {
    /// Text as displayed: references expanded and role decorations applied
    pub fn shown_text(&self, settings: &FieldSettings) -> String {
        self.shown_text_with(&mut ResolutionContext::new(settings))
    }

    /// Shown text using an explicit resolution context
    pub fn shown_text_with(&self, ctx: &mut ResolutionContext<'_>) -> String {
        let (parent, index) = match (self.parent(), self.index()) {
            (Some(parent), Some(index)) => (parent, index),
            _ => {
                debug!(id = self.id(), "field has no parent; using raw text");
                return self.field().text().to_string();
            }
        };

        ctx.start_resolving(index);
        let text = expand_text_vars(self.field().text(), |token| {
            resolve_token(parent, index, token, ctx)
        });
        ctx.done_resolving(index);

        parent.decorate_shown_text(self.id(), text, ctx.settings)
    }
}

/// Look up one `${token}` on behalf of the field at `self_index`
fn resolve_token(
    parent: &dyn FieldParent,
    self_index: usize,
    token: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Option<String> {
    let fields = parent.fields();
    let mandatory = parent.mandatory_count().min(fields.len());

    let mandatory_hit = fields[..mandatory].iter().position(|f| {
        parent
            .canonical_name(f.id())
            .is_some_and(|name| name.to_uppercase() == token)
    });

    let hit = mandatory_hit.or_else(|| {
        (mandatory..fields.len()).find(|&i| {
            FieldRef::attached(parent, i).is_some_and(|r| {
                let name = r.name(true);
                name == token || name.to_uppercase() == token
            })
        })
    });

    if let Some(index) = hit {
        return sibling_text(parent, self_index, index, token, ctx);
    }

    parent
        .pseudo_variable(token, ctx.settings)
        .or_else(|| ctx.text_vars.and_then(|v| v.get(token)).map(str::to_string))
}

/// Expanded text of the sibling at `index`, honoring the recursion guards
fn sibling_text(
    parent: &dyn FieldParent,
    self_index: usize,
    index: usize,
    token: &str,
    ctx: &mut ResolutionContext<'_>,
) -> Option<String> {
    if index == self_index {
        // silently drop references to the field itself
        return Some(String::new());
    }

    if ctx.settings.guard_cycles && ctx.is_resolving(index) {
        warn!(token, "reference cycle between {} fields; dropping", parent.kind_name());
        return Some(String::new());
    }

    if ctx.depth >= ctx.settings.max_depth {
        warn!(token, depth = ctx.depth, "field reference nesting too deep; leaving unexpanded");
        return None;
    }

    FieldRef::attached(parent, index).map(|sibling| sibling.shown_text_with(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::geometry::Point;
    use crate::parent::{ComponentInstance, SheetInstance};

    fn component() -> ComponentInstance {
        ComponentInstance::new(Point::zero())
            .with_field_text(ComponentInstance::REFERENCE, "R1")
            .with_field_text(ComponentInstance::VALUE, "10k")
            .with_field_text(ComponentInstance::FOOTPRINT, "Resistor_SMD:R_0603")
    }

    fn shown(parent: &dyn FieldParent, index: usize) -> String {
        FieldRef::attached(parent, index)
            .expect("field exists")
            .shown_text(&FieldSettings::default())
    }

    #[test]
    fn test_plain_text_unchanged() {
        let c = component();
        assert_eq!(shown(&c, ComponentInstance::VALUE), "10k");
    }

    #[test]
    fn test_mandatory_reference() {
        let mut c = component();
        let i = c.add_field("Label", "${REFERENCE} = ${VALUE}");
        assert_eq!(shown(&c, i), "R1 = 10k");
    }

    #[test]
    fn test_canonical_name_must_be_uppercase() {
        let mut c = component();
        let i = c.add_field("Label", "${Value}");
        assert_eq!(shown(&c, i), "${Value}");
    }

    #[test]
    fn test_user_field_by_literal_or_uppercase_name() {
        let mut c = component();
        c.add_field("Mpn", "RC0603FR");
        let a = c.add_field("A", "${Mpn}");
        let b = c.add_field("B", "${MPN}");
        assert_eq!(shown(&c, a), "RC0603FR");
        assert_eq!(shown(&c, b), "RC0603FR");
    }

    #[test]
    fn test_unnamed_user_field_uses_default_name() {
        let mut c = component();
        let i = c.add_field("", "x");
        let j = c.add_field("Copy", format!("${{Field{}}}", i));
        assert_eq!(shown(&c, j), "x");
    }

    #[test]
    fn test_self_reference_is_empty() {
        let c = component().with_field_text(ComponentInstance::VALUE, "${VALUE}");
        assert_eq!(shown(&c, ComponentInstance::VALUE), "");
    }

    #[test]
    fn test_self_reference_user_field() {
        let mut c = component();
        let i = c.add_field("Note", "[${NOTE}]");
        assert_eq!(shown(&c, i), "[]");
    }

    #[test]
    fn test_pseudo_variables() {
        let mut c = component().with_units(2, 2);
        let i = c.add_field("Fp", "${FOOTPRINT_LIBRARY}/${FOOTPRINT_NAME} u${UNIT}");
        assert_eq!(shown(&c, i), "Resistor_SMD/R_0603 uB");
    }

    #[test]
    fn test_unknown_token_passes_through() {
        let c = component().with_field_text(ComponentInstance::DATASHEET, "${NOPE}");
        assert_eq!(shown(&c, ComponentInstance::DATASHEET), "${NOPE}");
    }

    #[test]
    fn test_text_vars_fallback() {
        let settings = FieldSettings::default();
        let vars = TextVars::new().with_var("REVISION", "B2");
        let mut c = component();
        let i = c.add_field("Rev", "rev ${REVISION}");
        let r = FieldRef::attached(&c, i).expect("field exists");
        let mut ctx = ResolutionContext::new(&settings).with_text_vars(&vars);
        assert_eq!(r.shown_text_with(&mut ctx), "rev B2");
        assert_eq!(r.shown_text(&settings), "rev ${REVISION}");
    }

    #[test]
    fn test_fields_shadow_text_vars() {
        let settings = FieldSettings::default();
        let vars: TextVars = [("VALUE", "from project")].into_iter().collect();
        let mut c = component();
        let i = c.add_field("V", "${VALUE}");
        let r = FieldRef::attached(&c, i).expect("field exists");
        let mut ctx = ResolutionContext::new(&settings).with_text_vars(&vars);
        assert_eq!(r.shown_text_with(&mut ctx), "10k");
    }

    #[test]
    fn test_two_field_cycle_terminates_with_guard() {
        let mut c = component();
        let a = c.add_field("A", "a(${B})");
        let b = c.add_field("B", "b(${A})");
        assert_eq!(shown(&c, a), "a(b())");
        assert_eq!(shown(&c, b), "b(a())");
    }

    #[test]
    fn test_cycle_without_guard_stops_at_depth_limit() {
        let settings = FieldSettings::default()
            .with_cycle_guard(false)
            .with_max_depth(3);
        let mut c = component();
        let a = c.add_field("A", "a${B}");
        c.add_field("B", "b${A}");
        let r = FieldRef::attached(&c, a).expect("field exists");
        assert_eq!(r.shown_text(&settings), "aba${B}");
    }

    #[test]
    fn test_detached_field_returns_raw_text() {
        let f = Field::new(ComponentInstance::VALUE, Point::zero()).with_text("${REFERENCE}");
        assert_eq!(
            FieldRef::detached(&f).shown_text(&FieldSettings::default()),
            "${REFERENCE}"
        );
    }

    #[test]
    fn test_sheet_resolution() {
        let mut s = SheetInstance::new(Point::zero(), "Power", "power.sch");
        let i = s.add_field("Title", "${SHEETNAME} (${SHEETFILE})");
        assert_eq!(shown(&s, i), "Power (File: power.sch)");
        assert_eq!(shown(&s, SheetInstance::SHEET_FILE), "File: power.sch");
    }

    #[test]
    fn test_sheet_has_no_component_pseudo_variables() {
        let mut s = SheetInstance::new(Point::zero(), "Power", "power.sch");
        let i = s.add_field("U", "${UNIT}");
        assert_eq!(shown(&s, i), "${UNIT}");
    }
}
