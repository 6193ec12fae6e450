use glam::Vec3;

use super::path::{Path, PathLayout, Waypoint};

/// Straight segments between consecutive waypoints
#[derive(Debug, Clone)]
pub struct LinearPath {
    waypoints: Vec<Waypoint>,
    layout: PathLayout,
}

impl Default for LinearPath {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearPath {
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            layout: PathLayout::empty(),
        }
    }
}

impl Path for LinearPath {
    fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    fn waypoints_mut(&mut self) -> &mut Vec<Waypoint> {
        &mut self.waypoints
    }

    fn layout(&self) -> &PathLayout {
        &self.layout
    }

    fn rebuild(&mut self) {
        self.layout = if self.waypoints.is_empty() {
            PathLayout::empty()
        } else {
            PathLayout::from_segments(
                self.waypoints
                    .windows(2)
                    .map(|w| w[0].position.distance(w[1].position) * w[1].weight),
            )
        };
    }

    fn segment_position(&self, index: usize, fraction: f32) -> Vec3 {
        let (a, b) = (self.waypoints[index].position, self.waypoints[index + 1].position);
        a.lerp(b, fraction)
    }

    fn segment_tangent(&self, index: usize, _fraction: f32) -> Vec3 {
        (self.waypoints[index + 1].position - self.waypoints[index].position).normalize_or_zero()
    }
}
