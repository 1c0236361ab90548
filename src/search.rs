//! Find and replace over field text
//!
//! Matching runs against the shown text (what the user sees), replacement
//! rewrites the raw text. Owners can refuse a replacement; that is reported
//! as [`ReplaceOutcome::NotReplaceable`], never as an error.

use std::ops::Range;

use crate::field::FieldRef;
use crate::parent::FieldParent;
use crate::settings::FieldSettings;

/// A find/replace request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub replacement: String,
    /// Compare case-sensitively (ASCII letters only fold otherwise)
    pub match_case: bool,
    /// Only match occurrences not embedded in a longer word
    pub whole_word: bool,
    /// Also search user fields, not just the built-in roles
    pub search_all_fields: bool,
    /// The search is the first half of a replace
    pub search_and_replace: bool,
    /// Allow reference designators to be replaced
    pub replace_references: bool,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Turn the search into a replace
    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self.search_and_replace = true;
        self
    }

    pub fn with_match_case(mut self, match_case: bool) -> Self {
        self.match_case = match_case;
        self
    }

    pub fn with_whole_word(mut self, whole_word: bool) -> Self {
        self.whole_word = whole_word;
        self
    }

    pub fn with_all_fields(mut self, all: bool) -> Self {
        self.search_all_fields = all;
        self
    }

    pub fn with_replace_references(mut self, replace: bool) -> Self {
        self.replace_references = replace;
        self
    }
}

/// Result of a replace attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    NoMatch,
    /// The owner does not allow this field to be rewritten
    NotReplaceable,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte ranges of the non-overlapping occurrences of the pattern
fn find_matches(text: &str, query: &SearchQuery) -> Vec<Range<usize>> {
    let pattern = query.pattern.as_str();
    if pattern.is_empty() {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut next_allowed = 0;

    for (start, _) in text.char_indices() {
        if start < next_allowed {
            continue;
        }
        let end = start + pattern.len();
        let Some(candidate) = text.get(start..end) else {
            continue;
        };

        let same = if query.match_case {
            candidate == pattern
        } else {
            candidate.eq_ignore_ascii_case(pattern)
        };
        if !same {
            continue;
        }

        if query.whole_word {
            let before = text[..start].chars().next_back();
            let after = text[end..].chars().next();
            if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
                continue;
            }
        }

        found.push(start..end);
        next_allowed = end;
    }

    found
}

/// Check whether `text` contains the pattern
pub fn text_matches(text: &str, query: &SearchQuery) -> bool {
    !find_matches(text, query).is_empty()
}

/// Replace every occurrence; `None` when nothing matched
pub fn replace_text(text: &str, query: &SearchQuery) -> Option<String> {
    let found = find_matches(text, query);
    if found.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for range in found {
        out.push_str(&text[last..range.start]);
        out.push_str(&query.replacement);
        last = range.end;
    }
    out.push_str(&text[last..]);
    Some(out)
}

impl<'a> FieldRef<'a> {
    /// Check whether the field matches a search.
    ///
    /// User fields are only searched with `search_all_fields`. During a
    /// replace, reference designators are skipped unless
    /// `replace_references` is set. When `sheet_reference` is given, a
    /// reference field is matched against that per-sheet designator instead
    /// of its own text.
    pub fn matches(
        &self,
        query: &SearchQuery,
        sheet_reference: Option<&str>,
        settings: &FieldSettings,
    ) -> bool {
        let Some(parent) = self.parent() else {
            return text_matches(self.field().text(), query);
        };

        let id = self.id();
        if !query.search_all_fields && id >= parent.mandatory_count() {
            return false;
        }

        let is_reference = parent.is_reference(id);
        if query.search_and_replace && is_reference && !query.replace_references {
            return false;
        }

        let text = match sheet_reference {
            Some(reference) if is_reference => {
                parent.decorate_shown_text(id, reference.to_string(), settings)
            }
            _ => self.shown_text(settings),
        };

        text_matches(&text, query)
    }

    /// Whether find/replace may rewrite this field
    pub fn is_replaceable(&self) -> bool {
        self.parent()
            .map_or(true, |parent| parent.is_replaceable(self.id()))
    }

    /// One-line description for selection menus, e.g. `Field Value (10k)`
    pub fn select_menu_text(&self, settings: &FieldSettings) -> String {
        format!(
            "Field {} ({})",
            self.name(true),
            shorten_text(&self.shown_text(settings))
        )
    }
}

const MENU_TEXT_LIMIT: usize = 36;

/// Flatten line breaks and cut long text with an ellipsis
pub fn shorten_text(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect();

    if flat.chars().count() <= MENU_TEXT_LIMIT {
        return flat;
    }
    let mut out: String = flat.chars().take(MENU_TEXT_LIMIT).collect();
    out.push_str("...");
    out
}

/// Apply a replace to the raw text of the field at `index`
pub fn replace_field<P>(parent: &mut P, index: usize, query: &SearchQuery) -> ReplaceOutcome
where
    P: FieldParent + ?Sized,
{
    let Some(field) = parent.fields().get(index) else {
        return ReplaceOutcome::NoMatch;
    };

    let id = field.id();
    if !parent.is_replaceable(id) {
        return ReplaceOutcome::NotReplaceable;
    }
    if parent.is_reference(id) && !query.replace_references {
        return ReplaceOutcome::NotReplaceable;
    }

    match replace_text(field.text(), query) {
        Some(text) => {
            parent.fields_mut()[index].set_text(text);
            ReplaceOutcome::Replaced
        }
        None => ReplaceOutcome::NoMatch,
    }
}

/// [`replace_field`] reduced to success or failure
pub fn replace<P>(parent: &mut P, index: usize, query: &SearchQuery) -> bool
where
    P: FieldParent + ?Sized,
{
    replace_field(parent, index, query) == ReplaceOutcome::Replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::parent::{ComponentInstance, SheetInstance};

    fn component() -> ComponentInstance {
        ComponentInstance::new(Point::zero())
            .with_field_text(ComponentInstance::REFERENCE, "U1")
            .with_field_text(ComponentInstance::VALUE, "LM358")
            .with_units(2, 2)
    }

    #[test]
    fn test_find_case_insensitive_by_default() {
        let q = SearchQuery::new("lm3");
        assert!(text_matches("LM358", &q));
        assert!(!text_matches("LM358", &q.clone().with_match_case(true)));
    }

    #[test]
    fn test_whole_word() {
        let q = SearchQuery::new("R1").with_whole_word(true);
        assert!(text_matches("R1", &q));
        assert!(text_matches("near R1.", &q));
        assert!(!text_matches("R12", &q));
        assert!(!text_matches("XR1", &q));
    }

    #[test]
    fn test_replace_text_all_occurrences() {
        let q = SearchQuery::new("ab").with_replacement("x");
        assert_eq!(replace_text("ab-AB-cab", &q).as_deref(), Some("x-x-cx"));
        assert_eq!(replace_text("none", &q), None);
    }

    #[test]
    fn test_replace_text_non_ascii() {
        let q = SearchQuery::new("Ω").with_replacement("ohm");
        assert_eq!(replace_text("10kΩ ±1%", &q).as_deref(), Some("10kohm ±1%"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!text_matches("abc", &SearchQuery::new("")));
    }

    #[test]
    fn test_user_fields_need_search_all_fields() {
        let settings = FieldSettings::default();
        let mut c = component();
        let i = c.add_field("MPN", "LM358DR");
        let r = FieldRef::attached(&c, i).expect("field exists");
        assert!(!r.matches(&SearchQuery::new("358"), None, &settings));
        assert!(r.matches(&SearchQuery::new("358").with_all_fields(true), None, &settings));
    }

    #[test]
    fn test_reference_matches_shown_text_with_unit() {
        let settings = FieldSettings::default();
        let c = component();
        let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).expect("field exists");
        assert!(r.matches(&SearchQuery::new("U1B"), None, &settings));
        assert!(r.matches(&SearchQuery::new("U7B"), Some("U7"), &settings));
        assert!(!r.matches(&SearchQuery::new("U1"), Some("U7"), &settings));
    }

    #[test]
    fn test_reference_skipped_during_replace_without_flag() {
        let settings = FieldSettings::default();
        let c = component();
        let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).expect("field exists");
        let q = SearchQuery::new("U1").with_replacement("U2");
        assert!(!r.matches(&q, None, &settings));
        assert!(r.matches(&q.with_replace_references(true), None, &settings));
    }

    #[test]
    fn test_replace_value() {
        let mut c = component();
        let q = SearchQuery::new("358").with_replacement("324");
        assert!(replace(&mut c, ComponentInstance::VALUE, &q));
        assert_eq!(c.fields()[1].text(), "LM324");
        assert_eq!(
            replace_field(&mut c, ComponentInstance::VALUE, &q),
            ReplaceOutcome::NoMatch
        );
    }

    #[test]
    fn test_replace_reference_requires_flag() {
        let mut c = component();
        let q = SearchQuery::new("U1").with_replacement("U9");
        assert_eq!(
            replace_field(&mut c, ComponentInstance::REFERENCE, &q),
            ReplaceOutcome::NotReplaceable
        );
        let q = q.with_replace_references(true);
        assert!(replace(&mut c, ComponentInstance::REFERENCE, &q));
        assert_eq!(c.fields()[0].text(), "U9");
    }

    #[test]
    fn test_power_value_not_replaceable() {
        let mut c = ComponentInstance::new(Point::zero())
            .with_field_text(ComponentInstance::VALUE, "GND")
            .with_power(true);
        let q = SearchQuery::new("GND").with_replacement("VCC");
        assert!(!FieldRef::attached(&c, ComponentInstance::VALUE)
            .expect("field exists")
            .is_replaceable());
        assert!(!replace(&mut c, ComponentInstance::VALUE, &q));
        assert_eq!(c.fields()[1].text(), "GND");
    }

    #[test]
    fn test_sheet_file_never_replaceable() {
        let mut s = SheetInstance::new(Point::zero(), "Power", "power.sch");
        let q = SearchQuery::new("power")
            .with_replacement("supply")
            .with_replace_references(true)
            .with_all_fields(true);
        assert_eq!(
            replace_field(&mut s, SheetInstance::SHEET_FILE, &q),
            ReplaceOutcome::NotReplaceable
        );
        assert_eq!(s.fields()[1].text(), "power.sch");
        assert!(replace(&mut s, SheetInstance::SHEET_NAME, &q));
        assert_eq!(s.fields()[0].text(), "supply");
    }

    #[test]
    fn test_select_menu_text() {
        let settings = FieldSettings::default();
        let c = component();
        let r = FieldRef::attached(&c, ComponentInstance::VALUE).expect("field exists");
        assert_eq!(r.select_menu_text(&settings), "Field Value (LM358)");
    }

    #[test]
    fn test_shorten_text() {
        assert_eq!(shorten_text("two\nlines"), "two lines");
        let long = "x".repeat(40);
        assert_eq!(shorten_text(&long), format!("{}...", "x".repeat(36)));
        assert_eq!(shorten_text(&"y".repeat(36)), "y".repeat(36));
    }

    #[test]
    fn test_missing_field_is_no_match() {
        let mut c = component();
        assert_eq!(
            replace_field(&mut c, 99, &SearchQuery::new("x")),
            ReplaceOutcome::NoMatch
        );
    }
}
