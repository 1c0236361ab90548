//! Integration tests for find/replace over fields

use pretty_assertions::assert_eq;

use schematic_fields::{
    replace, replace_field, ComponentInstance, FieldParent, FieldRef, FieldSettings, Point,
    ReplaceOutcome, SearchQuery, SheetInstance,
};

fn opamp() -> ComponentInstance {
    let mut c = ComponentInstance::new(Point::zero())
        .with_field_text(ComponentInstance::REFERENCE, "U3")
        .with_field_text(ComponentInstance::VALUE, "TL072")
        .with_field_text(ComponentInstance::FOOTPRINT, "Package_SO:SOIC-8")
        .with_units(2, 1);
    c.add_field("Note", "dual ${VALUE}");
    c
}

fn matching(parent: &dyn FieldParent, query: &SearchQuery) -> Vec<usize> {
    let settings = FieldSettings::default();
    (0..parent.fields().len())
        .filter(|&i| {
            FieldRef::attached(parent, i)
                .is_some_and(|r| r.matches(query, None, &settings))
        })
        .collect()
}

#[test]
fn test_search_uses_shown_text() {
    let c = opamp();
    let query = SearchQuery::new("dual tl072").with_all_fields(true);
    assert_eq!(matching(&c, &query), vec![4]);
}

#[test]
fn test_search_mandatory_only_by_default() {
    let c = opamp();
    assert_eq!(matching(&c, &SearchQuery::new("TL072")), vec![1]);
    assert_eq!(
        matching(&c, &SearchQuery::new("TL072").with_all_fields(true)),
        vec![1, 4]
    );
}

#[test]
fn test_whole_word_and_case() {
    let c = opamp();
    let query = SearchQuery::new("soic").with_whole_word(true);
    assert_eq!(matching(&c, &query), vec![2]);
    assert_eq!(matching(&c, &query.with_match_case(true)), Vec::<usize>::new());
}

#[test]
fn test_replace_edits_raw_text_not_shown_text() {
    let mut c = opamp();
    let query = SearchQuery::new("dual")
        .with_replacement("2x")
        .with_all_fields(true);
    assert!(replace(&mut c, 4, &query));
    assert_eq!(c.fields()[4].text(), "2x ${VALUE}");

    let r = FieldRef::attached(&c, 4).unwrap();
    assert_eq!(r.shown_text(&FieldSettings::default()), "2x TL072");
}

#[test]
fn test_reference_replace_gating() {
    let mut c = opamp();
    let query = SearchQuery::new("U3").with_replacement("U4");
    assert_eq!(matching(&c, &query), Vec::<usize>::new());
    assert_eq!(
        replace_field(&mut c, ComponentInstance::REFERENCE, &query),
        ReplaceOutcome::NotReplaceable
    );

    let query = query.with_replace_references(true);
    assert_eq!(matching(&c, &query), vec![0]);
    assert!(replace(&mut c, ComponentInstance::REFERENCE, &query));

    let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).unwrap();
    assert_eq!(r.shown_text(&FieldSettings::default()), "U4A");
}

#[test]
fn test_sheet_reference_overrides_stored_reference() {
    let settings = FieldSettings::default();
    let c = opamp();
    let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).unwrap();
    assert!(r.matches(&SearchQuery::new("U12A"), Some("U12"), &settings));
    assert!(!r.matches(&SearchQuery::new("U3"), Some("U12"), &settings));
}

#[test]
fn test_sheet_file_is_never_replaced() {
    let mut s = SheetInstance::new(Point::zero(), "Power", "power.kicad_sch");
    let query = SearchQuery::new("power")
        .with_replacement("supply")
        .with_all_fields(true);

    assert_eq!(matching(&s, &query), vec![0, 1]);
    let r = FieldRef::attached(&s, SheetInstance::SHEET_FILE).unwrap();
    assert!(!r.is_replaceable());

    assert!(!replace(&mut s, SheetInstance::SHEET_FILE, &query));
    assert!(replace(&mut s, SheetInstance::SHEET_NAME, &query));
    assert_eq!(s.fields()[0].text(), "supply");
    assert_eq!(s.fields()[1].text(), "power.kicad_sch");
}

#[test]
fn test_select_menu_text() {
    let settings = FieldSettings::default();
    let mut c = opamp();
    let long = c.add_field("", "a very long description\nthat spans two lines");

    let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).unwrap();
    assert_eq!(r.select_menu_text(&settings), "Field Reference (U3A)");

    let r = FieldRef::attached(&c, long).unwrap();
    assert_eq!(
        r.select_menu_text(&settings),
        "Field Field5 (a very long description that spans t...)"
    );
}
