#![warn(missing_docs)]
//! Collision primitives and the line-of-sight oracle used for camera occlusion.

use glam::Vec3;

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.cmple(max).all());
        Self { min, max }
    }

    /// Create an AABB from its center and half extents.
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self::new(center - half, center + half)
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Whether `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// First contact of the segment `from -> to` with this box.
    ///
    /// Returns the segment parameter in `[0, 1]`; a segment starting inside
    /// the box reports 0.
    pub fn segment_entry(&self, from: Vec3, to: Vec3) -> Option<f32> {
        let delta = to - from;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let dir = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if dir.abs() < f32::EPSILON {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / dir;
            let mut t0 = (lo - origin) * inv;
            let mut t1 = (hi - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Line-of-sight query against the environment.
pub trait OcclusionOracle {
    /// First point where the segment `from -> to` hits the environment.
    fn line_intersects(&self, from: Vec3, to: Vec3) -> Option<Vec3>;
}

impl<F> OcclusionOracle for F
where
    F: Fn(Vec3, Vec3) -> Option<Vec3>,
{
    fn line_intersects(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        self(from, to)
    }
}

/// Environment made of static boxes.
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    boxes: Vec<Aabb>,
}

impl StaticScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene from a list of boxes.
    pub fn from_boxes(boxes: Vec<Aabb>) -> Self {
        Self { boxes }
    }

    /// Add a box.
    pub fn push(&mut self, aabb: Aabb) {
        self.boxes.push(aabb);
    }

    /// Boxes in insertion order.
    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the scene has no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl OcclusionOracle for StaticScene {
    /// Closest hit along the segment. Boxes that already contain `from` are
    /// ignored, so a segment cast from inside a wall only reports the walls
    /// it enters.
    fn line_intersects(&self, from: Vec3, to: Vec3) -> Option<Vec3> {
        let t = self
            .boxes
            .iter()
            .filter(|aabb| !aabb.contains_point(from))
            .filter_map(|aabb| aabb.segment_entry(from, to))
            .min_by(|a, b| a.total_cmp(b))?;
        let hit = from + (to - from) * t;
        tracing::trace!(?from, ?to, ?hit, "line of sight blocked");
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Aabb {
        Aabb::new(Vec3::new(-5.0, 0.0, -3.0), Vec3::new(5.0, 4.0, -2.0))
    }

    #[test]
    fn intersects_overlapping_boxes() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::splat(0.5), Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(3.0), Vec3::splat(4.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn segment_entry_reports_near_face() {
        let t = wall()
            .segment_entry(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -4.0))
            .expect("segment crosses the wall");
        assert!((t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn segment_entry_misses_short_and_parallel_segments() {
        let aabb = wall();
        assert!(aabb
            .segment_entry(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.5))
            .is_none());
        assert!(aabb
            .segment_entry(Vec3::new(0.0, 5.0, 0.0), Vec3::new(0.0, 5.0, -4.0))
            .is_none());
    }

    #[test]
    fn scene_returns_closest_hit() {
        let mut scene = StaticScene::new();
        scene.push(Aabb::new(Vec3::new(-1.0, 0.0, -8.0), Vec3::new(1.0, 4.0, -7.0)));
        scene.push(wall());

        let hit = scene
            .line_intersects(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -10.0))
            .expect("hit");
        assert!(hit.distance(Vec3::new(0.0, 1.0, -2.0)) < 1e-4);
    }

    #[test]
    fn scene_ignores_box_containing_origin() {
        let scene = StaticScene::from_boxes(vec![wall()]);
        assert!(scene
            .line_intersects(Vec3::new(0.0, 1.0, -2.5), Vec3::new(0.0, 1.0, -10.0))
            .is_none());
    }

    #[test]
    fn closures_act_as_oracles() {
        let oracle = |_from: Vec3, _to: Vec3| Some(Vec3::ONE);
        assert_eq!(oracle.line_intersects(Vec3::ZERO, Vec3::X), Some(Vec3::ONE));
    }
}
