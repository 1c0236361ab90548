//! Integration tests for field placement under owner transforms

use pretty_assertions::assert_eq;

use schematic_fields::placement::{to_local, to_world};
use schematic_fields::{
    rotate_field, set_field_position, ComponentInstance, DrawMode, FieldParent, FieldRef,
    FieldSettings, Point, Rect, SheetInstance, SymbolOrientation, TextAngle, Transform,
};

const ORIGIN: Point = Point::new(1000, 1000);

/// The eight orientations a symbol can take
fn orientations() -> Vec<Transform> {
    use SymbolOrientation::*;
    vec![
        SymbolOrientation::chain(&[Rotate0]),
        SymbolOrientation::chain(&[Rotate90]),
        SymbolOrientation::chain(&[Rotate180]),
        SymbolOrientation::chain(&[Rotate270]),
        SymbolOrientation::chain(&[MirrorX]),
        SymbolOrientation::chain(&[MirrorY]),
        SymbolOrientation::chain(&[Rotate90, MirrorX]),
        SymbolOrientation::chain(&[Rotate90, MirrorY]),
    ]
}

fn component(transform: Transform) -> ComponentInstance {
    let mut c = ComponentInstance::new(ORIGIN)
        .with_transform(transform)
        .with_field_text(ComponentInstance::REFERENCE, "R12")
        .with_field_text(ComponentInstance::VALUE, "4k7");
    if let Some(f) = c.field_mut(ComponentInstance::REFERENCE) {
        f.set_text_pos(Point::new(1100, 1000));
    }
    if let Some(f) = c.field_mut(ComponentInstance::VALUE) {
        f.set_text_pos(Point::new(1000, 1080));
    }
    c
}

#[test]
fn test_orientations_are_distinct() {
    let all = orientations();
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_world_local_roundtrip_all_orientations() {
    let points = [
        Point::new(0, 0),
        Point::new(1000, 1000),
        Point::new(1234, -567),
        Point::new(-40, 9000),
    ];
    for t in orientations() {
        for p in points {
            assert_eq!(to_local(ORIGIN, t, to_world(ORIGIN, t, p)), p, "{:?}", t);
            assert_eq!(to_world(ORIGIN, t, to_local(ORIGIN, t, p)), p, "{:?}", t);
        }
    }
}

#[test]
fn test_set_position_then_get_position() {
    let target = Point::new(1337, 842);
    for t in orientations() {
        let mut c = component(t);
        assert!(set_field_position(&mut c, ComponentInstance::VALUE, target));
        let r = FieldRef::attached(&c, ComponentInstance::VALUE).unwrap();
        assert_eq!(r.position(), target, "{:?}", t);
    }
}

#[test]
fn test_set_position_missing_field() {
    let mut c = component(Transform::IDENTITY);
    assert!(!set_field_position(&mut c, 42, ORIGIN));
}

#[test]
fn test_owner_anchor_is_fixed_point() {
    for t in orientations() {
        let c = ComponentInstance::new(ORIGIN)
            .with_transform(t)
            .with_field_text(ComponentInstance::VALUE, "x");
        let r = FieldRef::attached(&c, ComponentInstance::VALUE).unwrap();
        assert_eq!(r.position(), ORIGIN);
    }
}

#[test]
fn test_rotated_component_positions_and_box() {
    let c = component(Transform::ROTATE_90);
    let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).unwrap();
    assert_eq!(r.position(), Point::new(1000, 900));
    assert_eq!(
        r.bounding_box(&FieldSettings::default()),
        Rect::new(972, 822, 56, 156)
    );
}

#[test]
fn test_bbox_center_follows_anchor_for_centered_text() {
    let settings = FieldSettings::default();
    for t in orientations() {
        let c = component(t);
        for id in [ComponentInstance::REFERENCE, ComponentInstance::VALUE] {
            let r = FieldRef::attached(&c, id).unwrap();
            assert_eq!(r.bounding_box(&settings).center(), r.position(), "{:?}", t);
        }
    }
}

#[test]
fn test_effective_angle_composition() {
    for t in orientations() {
        let c = component(t);
        let r = FieldRef::attached(&c, ComponentInstance::REFERENCE).unwrap();
        let expected = if t.is_quarter_turn() {
            TextAngle::Vertical
        } else {
            TextAngle::Horizontal
        };
        assert_eq!(r.effective_angle(), expected, "{:?}", t);
    }
}

#[test]
fn test_four_rotations_restore_position() {
    let mut c = component(Transform::ROTATE_270);
    let before = c.fields()[ComponentInstance::REFERENCE].text_pos();
    let center = Point::new(500, 700);
    for _ in 0..4 {
        assert!(rotate_field(&mut c, ComponentInstance::REFERENCE, center));
    }
    assert_eq!(c.fields()[ComponentInstance::REFERENCE].text_pos(), before);
}

#[test]
fn test_sheet_fields_are_not_transformed() {
    let mut s = SheetInstance::new(ORIGIN, "Power", "power.kicad_sch");
    if let Some(f) = s.field_mut(SheetInstance::SHEET_NAME) {
        f.set_text_pos(Point::new(1000, 990));
    }
    let r = FieldRef::attached(&s, SheetInstance::SHEET_NAME).unwrap();
    assert_eq!(r.position(), Point::new(1000, 990));
    // "Power" is 5 glyphs: 256 x 56 centered on the anchor
    assert_eq!(
        r.bounding_box(&FieldSettings::default()),
        Rect::new(872, 962, 256, 56)
    );
}

#[test]
fn test_draw_commands_by_mode() {
    let settings = FieldSettings::default();
    let mut c = component(Transform::IDENTITY);
    if let Some(f) = c.field_mut(ComponentInstance::VALUE) {
        f.set_visible(false);
        f.set_force_visible(true);
    }

    let reference = FieldRef::attached(&c, ComponentInstance::REFERENCE).unwrap();
    let cmd = reference.draw_command(DrawMode::Plot, &settings).unwrap();
    assert_eq!(cmd.text, "R12");
    assert_eq!(cmd.position, Point::new(1100, 1000));
    assert_eq!(cmd.pen, 6);
    assert_eq!(cmd.color, "#008484");

    let value = FieldRef::attached(&c, ComponentInstance::VALUE).unwrap();
    assert!(value.draw_command(DrawMode::Plot, &settings).is_none());
    let cmd = value.draw_command(DrawMode::Screen, &settings).unwrap();
    assert_eq!(cmd.color, "#484848");

    let footprint = FieldRef::attached(&c, ComponentInstance::FOOTPRINT).unwrap();
    assert!(footprint.draw_command(DrawMode::Screen, &settings).is_none());
}

#[test]
fn test_field_order() {
    let c = component(Transform::IDENTITY);
    let mut fields: Vec<_> = c.fields().iter().rev().cloned().collect();
    fields.sort_by(|a, b| a.compare(b));
    let ids: Vec<usize> = fields.iter().map(|f| f.id()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
}
