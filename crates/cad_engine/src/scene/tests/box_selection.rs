use super::{point_at, scene};
use crate::input::{PickRect, VecPickBuffer};
use crate::objects::ObjectId;
use crate::scene::{Scene, SelectionMode};

/// Three points drawn side by side into a 90x30 pick buffer
fn three_points() -> (Scene, [ObjectId; 3], VecPickBuffer) {
    let mut scene = scene();
    let ids = [
        point_at(&mut scene, -1.0, 0.0, 0.0),
        point_at(&mut scene, 0.0, 0.0, 0.0),
        point_at(&mut scene, 1.0, 0.0, 0.0),
    ];

    let mut picks = VecPickBuffer::new(90, 30);
    for (i, id) in ids.iter().enumerate() {
        let left = i as f64 * 30.0 + 10.0;
        let tag = scene.pick_tag(*id).unwrap();
        picks.fill_rect(PickRect::from_corners((left, 10.0), (left + 9.0, 19.0)), tag);
    }
    (scene, ids, picks)
}

#[test]
fn test_box_replaces_selection() {
    let (mut scene, [a, b, c], picks) = three_points();
    scene.select(c).unwrap();

    scene.begin_box_select((0.0, 0.0), SelectionMode::Replace);
    scene.update_box_select((40.0, 25.0));
    assert!(scene.box_select().is_pending());
    assert_eq!(scene.finish_box_select((45.0, 25.0), &picks), Some(2));

    assert_eq!(scene.selection().as_slice(), &[a, b]);
    assert!(!scene.box_select().is_pending());
}

#[test]
fn test_additive_and_subtractive_boxes() {
    let (mut scene, [a, b, c], picks) = three_points();

    scene.begin_box_select((0.0, 0.0), SelectionMode::Replace);
    scene.finish_box_select((25.0, 29.0), &picks);
    assert_eq!(scene.selection().as_slice(), &[a]);

    // Dragging right to left covers the same pixels.
    scene.begin_box_select((89.0, 29.0), SelectionMode::Add);
    scene.finish_box_select((60.0, 0.0), &picks);
    assert_eq!(scene.selection().as_slice(), &[a, c]);

    scene.begin_box_select((0.0, 0.0), SelectionMode::Remove);
    scene.finish_box_select((89.0, 29.0), &picks);
    assert!(scene.selection().is_empty());
    assert!(!scene.selection().contains(b));
}

#[test]
fn test_empty_box_clears_selection() {
    let (mut scene, [a, ..], picks) = three_points();
    scene.select(a).unwrap();

    scene.begin_box_select((0.0, 0.0), SelectionMode::Replace);
    assert_eq!(scene.finish_box_select((5.0, 5.0), &picks), Some(0));
    assert!(scene.selection().is_empty());
}

#[test]
fn test_finish_without_begin_is_ignored() {
    let (mut scene, [a, ..], picks) = three_points();
    scene.select(a).unwrap();

    assert_eq!(scene.finish_box_select((89.0, 29.0), &picks), None);
    assert_eq!(scene.selection().as_slice(), &[a]);
}

#[test]
fn test_stale_tags_are_skipped() {
    let (mut scene, [a, b, c], picks) = three_points();
    scene.delete(a).unwrap();

    // Tag 3 no longer maps to an object after the deletion shifted tags.
    scene.begin_box_select((0.0, 0.0), SelectionMode::Replace);
    scene.finish_box_select((89.0, 29.0), &picks);
    assert_eq!(scene.selection().as_slice(), &[b, c]);
}
