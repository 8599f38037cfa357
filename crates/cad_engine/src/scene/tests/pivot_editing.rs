use approx::assert_relative_eq;

use super::{point_at, scene};
use crate::foundation::math::{constants::HALF_PI, Mat4, Point3, Vec3};
use crate::foundation::transform::Transform;
use crate::objects::{ObjectKind, ShapeParams};
use crate::scene::{PivotMode, RenderGeometry, RenderRole, SceneError};

fn quarter_turn() -> Transform {
    Transform::identity().with_rotation_euler(0.0, 0.0, HALF_PI)
}

#[test]
fn test_edit_previews_until_applied() {
    let mut scene = scene();
    let point = point_at(&mut scene, 2.0, 0.0, 0.0);
    scene.set_cursor_position(Vec3::new(1.0, 0.0, 0.0));
    scene.select(point).unwrap();
    scene.set_edit_delta(quarter_turn()).unwrap();

    let preview = scene.effective_matrix(point).unwrap().transform_point(&Point3::origin());
    assert_relative_eq!(preview.coords, Vec3::new(1.0, 1.0, 0.0), epsilon = 1e-5);
    assert_eq!(scene.get(point).unwrap().transform.translation, Vec3::new(2.0, 0.0, 0.0));

    assert_eq!(scene.apply_edit(), Ok(1));
    assert_relative_eq!(
        scene.get(point).unwrap().transform.translation,
        Vec3::new(1.0, 1.0, 0.0),
        epsilon = 1e-5
    );
    assert_eq!(*scene.edit_delta(), Transform::identity());
}

#[test]
fn test_cancel_leaves_objects_untouched() {
    let mut scene = scene();
    let point = point_at(&mut scene, 2.0, 0.0, 0.0);
    scene.select(point).unwrap();
    scene.set_edit_delta(Transform::identity().with_uniform_scale(3.0)).unwrap();
    scene.cancel_edit();

    assert_eq!(scene.pivot_matrix(), Ok(None));
    assert_eq!(scene.apply_edit(), Ok(0));
    assert_eq!(scene.get(point).unwrap().transform.translation, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_edit_requires_selection() {
    let mut scene = scene();
    point_at(&mut scene, 0.0, 0.0, 0.0);
    assert_eq!(scene.set_edit_delta(quarter_turn()), Err(SceneError::NothingSelected));
}

#[test]
fn test_clearing_selection_drops_edit() {
    let mut scene = scene();
    let point = point_at(&mut scene, 0.0, 0.0, 0.0);
    scene.select(point).unwrap();
    scene.set_edit_delta(quarter_turn()).unwrap();

    scene.clear_selection();
    assert_eq!(*scene.edit_delta(), Transform::identity());
}

#[test]
fn test_centroid_pivot_scales_about_mean() {
    let mut scene = scene();
    let a = point_at(&mut scene, 0.0, 0.0, 0.0);
    let b = point_at(&mut scene, 2.0, 0.0, 0.0);
    let curve = scene.create(ShapeParams::PolyLine(vec![a, b])).unwrap();
    for id in [a, b, curve] {
        scene.select(id).unwrap();
    }
    scene.set_pivot_mode(PivotMode::Centroid);

    assert_eq!(scene.update_centroid(), Some(Vec3::new(1.0, 0.0, 0.0)));
    scene.set_edit_delta(Transform::identity().with_uniform_scale(2.0)).unwrap();
    scene.apply_edit().unwrap();

    assert_relative_eq!(scene.get(a).unwrap().transform.translation, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(scene.get(b).unwrap().transform.translation, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(scene.get(a).unwrap().transform.scale, Vec3::new(2.0, 2.0, 2.0), epsilon = 1e-5);
}

#[test]
fn test_centroid_falls_back_to_cursor() {
    let mut scene = scene();
    let curve = scene.create_default(ObjectKind::C0Bezier).unwrap();
    scene.select(curve).unwrap();
    scene.set_cursor_position(Vec3::new(0.0, 4.0, 0.0));
    scene.set_pivot_mode(PivotMode::Centroid);

    assert_eq!(scene.update_centroid(), None);
    assert_eq!(scene.pivot_point(), Vec3::new(0.0, 4.0, 0.0));
}

#[test]
fn test_curves_follow_points_during_edit() {
    let mut scene = scene();
    let a = point_at(&mut scene, 0.0, 0.0, 0.0);
    let b = point_at(&mut scene, 1.0, 0.0, 0.0);
    let line = scene.create(ShapeParams::PolyLine(vec![a, b])).unwrap();
    scene.select(b).unwrap();
    scene.set_edit_delta(Transform::from_translation(Vec3::new(0.0, 1.0, 0.0))).unwrap();

    let queue = scene.collect_render_items(&Mat4::identity()).unwrap();
    let item = queue
        .with_role(RenderRole::Object)
        .find(|item| item.object == Some(line))
        .unwrap();
    assert_eq!(item.model, Mat4::identity());
    let RenderGeometry::Lines(buffers) = &item.geometry else {
        panic!("polyline should render as lines");
    };
    assert_eq!(buffers.vertices[0].position, [0.0, 0.0, 0.0]);
    assert_relative_eq!(buffers.vertices[1].position[1], 1.0, epsilon = 1e-5);
    assert_relative_eq!(buffers.vertices[1].position[0], 1.0, epsilon = 1e-5);

    // The stored point has not moved yet.
    assert_eq!(scene.get(b).unwrap().transform.translation, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_apply_is_all_or_nothing() {
    let mut scene = scene();
    let a = point_at(&mut scene, 1.0, 0.0, 0.0);
    let b = point_at(&mut scene, 0.0, 1.0, 0.0);
    scene.select(a).unwrap();
    scene.select(b).unwrap();
    scene
        .set_edit_delta(Transform::identity().with_scale(Vec3::new(1.0, 0.0, 1.0)))
        .unwrap();

    assert!(matches!(scene.apply_edit(), Err(SceneError::Transform(_))));
    assert_eq!(scene.get(a).unwrap().transform.translation, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(scene.get(b).unwrap().transform.translation, Vec3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_apply_skips_selected_curves() {
    let mut scene = scene();
    let a = point_at(&mut scene, 0.0, 0.0, 0.0);
    let b = point_at(&mut scene, 1.0, 0.0, 0.0);
    let curve = scene.create(ShapeParams::C0Bezier(vec![a, b])).unwrap();
    scene.select(b).unwrap();
    scene.select(curve).unwrap();
    scene.set_edit_delta(Transform::from_translation(Vec3::new(0.0, 2.0, 0.0))).unwrap();

    assert_eq!(scene.apply_edit().unwrap(), 1);
    assert_eq!(scene.get(curve).unwrap().transform, Transform::identity());
    assert_relative_eq!(
        scene.get(b).unwrap().transform.translation,
        Vec3::new(1.0, 2.0, 0.0),
        epsilon = 1e-5
    );
}
