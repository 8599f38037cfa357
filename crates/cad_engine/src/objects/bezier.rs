//! C0-continuous chain of cubic Bezier segments
//!
//! Control points are padded to `4 + 3k` entries by repeating the last one,
//! then consumed four at a time with stride 3 so neighbouring segments share
//! an endpoint. Each segment is sampled according to how large its control
//! points appear on screen.

use serde::{Deserialize, Serialize};

use super::geometry::{chain_edges, WireframeBuffers, DEFAULT_COLOR};
use super::polyline::{resolve_points, PolyLine};
use super::ObjectId;
use crate::foundation::math::{project_to_ndc, Mat4, Vec3};

/// Color of the control polygon overlay
pub const POLYGON_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

/// Adaptive sampling settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BezierSampling {
    /// Samples per unit of projected bounding-box area (NDC units)
    pub density: f32,
    /// Lower bound on samples per segment, at least 2
    pub min_points: usize,
    /// Upper bound on samples per segment
    pub max_points: usize,
}

impl Default for BezierSampling {
    fn default() -> Self {
        Self {
            density: 100.0,
            min_points: 2,
            max_points: 1024,
        }
    }
}

/// Piecewise cubic Bezier curve through referenced Point objects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct C0Bezier {
    points: Vec<ObjectId>,
    polygon: PolyLine,
    show_polygon: bool,
}

impl C0Bezier {
    /// Create a curve with the given control points; the control polygon is shown
    pub fn new(points: Vec<ObjectId>) -> Self {
        Self {
            polygon: PolyLine::new(points.clone()),
            points,
            show_polygon: true,
        }
    }

    /// Control points in order
    pub fn points(&self) -> &[ObjectId] {
        &self.points
    }

    /// Auxiliary polyline drawn through the control points
    pub fn polygon(&self) -> &PolyLine {
        &self.polygon
    }

    /// Whether the control polygon is drawn
    pub fn show_polygon(&self) -> bool {
        self.show_polygon
    }

    /// Toggle the control polygon overlay
    pub fn set_show_polygon(&mut self, show: bool) {
        self.show_polygon = show;
    }

    /// Append a control point
    pub fn push(&mut self, point: ObjectId) {
        self.points.push(point);
        self.polygon.push(point);
    }

    /// Drop every reference to `point` from the curve and its polygon
    pub fn remove(&mut self, point: ObjectId) -> usize {
        let before = self.points.len();
        self.points.retain(|p| *p != point);
        self.polygon.remove(point);
        before - self.points.len()
    }

    /// True if `point` is a control point or polygon vertex
    pub fn contains(&self, point: ObjectId) -> bool {
        self.points.contains(&point) || self.polygon.contains(point)
    }

    /// Tessellate the curve for the current view.
    ///
    /// `resolve` yields the effective position of each control point, with any
    /// in-progress edit already applied.
    pub fn build<F>(&self, resolve: F, view_projection: &Mat4, sampling: &BezierSampling) -> WireframeBuffers
    where
        F: Fn(ObjectId) -> Option<Vec3>,
    {
        let control = resolve_points(&self.points, resolve);
        let samples = tessellate(&control, view_projection, sampling);
        WireframeBuffers::from_positions(&samples, chain_edges(samples.len()), DEFAULT_COLOR)
    }

    /// Control polygon buffers for the current positions
    pub fn build_polygon<F>(&self, resolve: F) -> WireframeBuffers
    where
        F: Fn(ObjectId) -> Option<Vec3>,
    {
        PolyLine::wireframe(&self.polygon.resolve(resolve), POLYGON_COLOR)
    }
}

/// Pad control points to `4 + 3k` entries by repeating the last one.
///
/// With `n` points, `4 - n` copies are added for `n <= 4`, otherwise
/// `(4 - n) mod 3`. No points yields no curve.
pub fn pad_control_points(points: &[Vec3]) -> Vec<Vec3> {
    let Some(&last) = points.last() else {
        return Vec::new();
    };
    let n = points.len() as i64;
    let padding = if n <= 4 { 4 - n } else { (4 - n).rem_euclid(3) };

    let mut padded = points.to_vec();
    padded.extend(std::iter::repeat(last).take(padding as usize));
    padded
}

/// Number of samples for one segment.
///
/// The four control points are projected to NDC; the sample count is the
/// area of their bounding box times `density`, clamped to
/// `[min_points, max_points]`. A segment that cannot be projected gets the
/// minimum.
pub fn points_per_segment(segment: &[Vec3; 4], view_projection: &Mat4, sampling: &BezierSampling) -> usize {
    let min_points = sampling.min_points.max(2);
    let max_points = sampling.max_points.max(min_points);

    let mut lo = [f32::INFINITY; 2];
    let mut hi = [f32::NEG_INFINITY; 2];
    for point in segment {
        let Some(ndc) = project_to_ndc(view_projection, point) else {
            return min_points;
        };
        lo = [lo[0].min(ndc.x), lo[1].min(ndc.y)];
        hi = [hi[0].max(ndc.x), hi[1].max(ndc.y)];
    }

    let estimate = ((hi[0] - lo[0]) * (hi[1] - lo[1]) * sampling.density).round();
    if !estimate.is_finite() {
        return min_points;
    }
    (estimate.max(0.0) as usize).clamp(min_points, max_points)
}

/// Evaluate a cubic Bezier segment at `t` in `[0, 1]`
pub fn cubic_bezier(control: &[Vec3; 4], t: f32) -> Vec3 {
    let u = 1.0 - t;
    control[0] * (u * u * u)
        + control[1] * (3.0 * u * u * t)
        + control[2] * (3.0 * u * t * t)
        + control[3] * (t * t * t)
}

/// Sample the whole padded curve.
///
/// Joined segments share their endpoint vertex, so it is emitted once
/// rather than at the end of one segment and the start of the next.
pub fn tessellate(control: &[Vec3], view_projection: &Mat4, sampling: &BezierSampling) -> Vec<Vec3> {
    let padded = pad_control_points(control);
    let mut samples = Vec::new();

    for (index, start) in (0..padded.len().saturating_sub(3)).step_by(3).enumerate() {
        let segment = [padded[start], padded[start + 1], padded[start + 2], padded[start + 3]];
        let count = points_per_segment(&segment, view_projection, sampling);
        let first = usize::from(index > 0);

        for i in first..count {
            let t = i as f32 / (count - 1) as f32;
            samples.push(cubic_bezier(&segment, t));
        }
    }

    log::trace!("Tessellated {} control points into {} samples", control.len(), samples.len());
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_padding_lengths() {
        assert!(pad_control_points(&[]).is_empty());
        assert_eq!(pad_control_points(&line(1)).len(), 4);
        assert_eq!(pad_control_points(&line(3)).len(), 4);
        assert_eq!(pad_control_points(&line(4)).len(), 4);
        assert_eq!(pad_control_points(&line(5)).len(), 7);
        assert_eq!(pad_control_points(&line(6)).len(), 7);
        assert_eq!(pad_control_points(&line(7)).len(), 7);
        assert_eq!(pad_control_points(&line(8)).len(), 10);
    }

    #[test]
    fn test_padding_repeats_last_point() {
        let padded = pad_control_points(&line(2));
        assert_eq!(padded[1], padded[2]);
        assert_eq!(padded[1], padded[3]);
    }

    #[test]
    fn test_cubic_endpoints() {
        let control = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ];
        assert_relative_eq!(cubic_bezier(&control, 0.0), control[0]);
        assert_relative_eq!(cubic_bezier(&control, 1.0), control[3]);
        assert_relative_eq!(cubic_bezier(&control, 0.5), Vec3::new(2.0, 1.5, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_single_point_is_stationary() {
        let samples = tessellate(&[Vec3::new(1.0, 2.0, 3.0)], &Mat4::identity(), &BezierSampling::default());
        assert!(samples.len() >= 2);
        for sample in samples {
            assert_relative_eq!(sample, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sample_count_scales_with_projected_area() {
        let sampling = BezierSampling::default();
        let small = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.01, 0.01, 0.0),
            Vec3::new(0.02, 0.0, 0.0),
            Vec3::new(0.03, 0.01, 0.0),
        ];
        let large = [
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(0.25, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        ];

        assert_eq!(points_per_segment(&small, &Mat4::identity(), &sampling), 2);
        // 1.0 x 1.0 NDC box at density 100
        assert_eq!(points_per_segment(&large, &Mat4::identity(), &sampling), 100);
    }

    #[test]
    fn test_sample_count_is_capped() {
        let sampling = BezierSampling { max_points: 50, ..Default::default() };
        let huge = [
            Vec3::new(-10.0, -10.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(-10.0, 10.0, 0.0),
            Vec3::new(10.0, -10.0, 0.0),
        ];
        assert_eq!(points_per_segment(&huge, &Mat4::identity(), &sampling), 50);
    }

    #[test]
    fn test_unprojectable_segment_uses_minimum() {
        let projection = Mat4::perspective(1.0, 1.0, 0.1, 10.0);
        let behind_eye = [Vec3::zeros(); 4];
        assert_eq!(points_per_segment(&behind_eye, &projection, &BezierSampling::default()), 2);
    }

    #[test]
    fn test_segments_share_endpoints() {
        let sampling = BezierSampling { density: 0.0, ..Default::default() };
        let samples = tessellate(&line(7), &Mat4::identity(), &sampling);
        // Two segments with 2 samples each, shared middle emitted once.
        assert_eq!(samples.len(), 3);
        assert_relative_eq!(samples[1], Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(samples[2], Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_curve_keeps_polygon_in_sync() {
        use slotmap::SlotMap;

        let mut ids: SlotMap<ObjectId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());

        let mut curve = C0Bezier::new(vec![a, b]);
        curve.push(a);
        assert_eq!(curve.polygon().points(), &[a, b, a]);

        assert_eq!(curve.remove(a), 2);
        assert_eq!(curve.points(), &[b]);
        assert_eq!(curve.polygon().points(), &[b]);
        assert!(!curve.contains(a));
    }
}
