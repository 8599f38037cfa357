//! Scene-level tests spanning objects, curves, caches and edits

mod box_selection;
mod pivot_editing;

use crate::core::config::EditorConfig;
use crate::foundation::math::Vec3;
use crate::foundation::transform::Transform;
use crate::objects::{ObjectId, PointParams, ShapeParams};

use super::Scene;

fn scene() -> Scene {
    crate::foundation::logging::init_for_tests();
    Scene::new(&EditorConfig::default())
}

fn point_at(scene: &mut Scene, x: f32, y: f32, z: f32) -> ObjectId {
    scene
        .create_with_transform(
            ShapeParams::Point(PointParams::default()),
            Transform::from_translation(Vec3::new(x, y, z)),
        )
        .unwrap()
}
