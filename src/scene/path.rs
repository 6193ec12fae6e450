//! Waypoint paths sampled by distance.
//!
//! Distances are measured along the path and scaled per segment by the
//! weight of the waypoint that ends the segment, so a lower weight gives a
//! segment a smaller share of the total length without changing geometry.

use glam::{Quat, Vec3};

use crate::error::{EngineError, Result};
use crate::math::slerp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub position: Vec3,
    pub rotation: Quat,
    /// Relative share of path length for the segment arriving here
    pub weight: f32,
}

impl Waypoint {
    pub fn new(position: impl Into<Vec3>, rotation: Quat) -> Self {
        Self {
            position: position.into(),
            rotation,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }
}

/// Where a distance lands on a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    /// Path has a single waypoint
    Point,
    /// Segment between waypoints `index` and `index + 1`, at a fraction of its length
    Segment { index: usize, fraction: f32 },
}

/// Cumulative weighted lengths at each waypoint
#[derive(Debug, Clone, Default)]
pub struct PathLayout {
    cumulative: Vec<f32>,
}

impl PathLayout {
    /// Build from weighted segment lengths (one per segment)
    pub fn from_segments(lengths: impl IntoIterator<Item = f32>) -> Self {
        let mut cumulative = vec![0.0];
        let mut total = 0.0;
        for length in lengths {
            total += length;
            cumulative.push(total);
        }
        Self { cumulative }
    }

    pub fn empty() -> Self {
        Self { cumulative: Vec::new() }
    }

    pub fn total(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn cumulative(&self) -> &[f32] {
        &self.cumulative
    }

    /// Map a distance (clamped to [0, total]) to a segment and fraction
    pub fn locate(&self, distance: f32) -> Result<Location> {
        match self.cumulative.len() {
            0 => Err(EngineError::invalid("path has no waypoints")),
            1 => Ok(Location::Point),
            n => {
                let total = self.total();
                let d = if distance.is_nan() { 0.0 } else { distance.clamp(0.0, total) };

                // First waypoint whose cumulative length is not less than d
                let upper = self.cumulative.partition_point(|&c| c < d).clamp(1, n - 1);
                let index = upper - 1;
                let start = self.cumulative[index];
                let span = self.cumulative[upper] - start;
                let fraction = if span > 0.0 {
                    ((d - start) / span).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                Ok(Location::Segment { index, fraction })
            }
        }
    }
}

pub(crate) fn validate_weight(weight: f32) -> Result<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "waypoint weight must be positive and finite, got {weight}"
        )))
    }
}

/// Common behaviour of waypoint paths
pub trait Path {
    fn waypoints(&self) -> &[Waypoint];

    fn waypoints_mut(&mut self) -> &mut Vec<Waypoint>;

    fn layout(&self) -> &PathLayout;

    /// Recompute tangents, segment lengths and lookup tables
    fn rebuild(&mut self);

    /// Position on segment `index` at arc-length fraction `fraction`
    fn segment_position(&self, index: usize, fraction: f32) -> Vec3;

    /// Direction of travel on segment `index` at arc-length fraction `fraction`
    fn segment_tangent(&self, index: usize, fraction: f32) -> Vec3;

    /// Append a waypoint
    fn add_waypoint(&mut self, position: impl Into<Vec3>, rotation: Quat) -> &mut Self
    where
        Self: Sized,
    {
        let len = self.waypoints().len();
        self.insert_waypoint(len, position, rotation)
    }

    /// Insert before the waypoint currently at `index`; an index at or past the end appends
    fn insert_waypoint(&mut self, index: usize, position: impl Into<Vec3>, rotation: Quat) -> &mut Self
    where
        Self: Sized,
    {
        let waypoint = Waypoint::new(position, rotation);
        let waypoints = self.waypoints_mut();
        let index = index.min(waypoints.len());
        waypoints.insert(index, waypoint);
        self.rebuild();
        self
    }

    /// Replace the waypoint at `index`, keeping its weight
    fn set_waypoint(&mut self, index: usize, position: impl Into<Vec3>, rotation: Quat) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let waypoint = self
            .waypoints_mut()
            .get_mut(index)
            .ok_or_else(|| EngineError::not_found("waypoint", index.to_string()))?;
        waypoint.position = position.into();
        waypoint.rotation = rotation;
        self.rebuild();
        Ok(self)
    }

    fn set_waypoint_weight(&mut self, index: usize, weight: f32) -> Result<&mut Self>
    where
        Self: Sized,
    {
        validate_weight(weight)?;
        let waypoint = self
            .waypoints_mut()
            .get_mut(index)
            .ok_or_else(|| EngineError::not_found("waypoint", index.to_string()))?;
        waypoint.weight = weight;
        self.rebuild();
        Ok(self)
    }

    fn path_length(&self) -> Result<f32> {
        if self.waypoints().is_empty() {
            return Err(EngineError::invalid("path has no waypoints"));
        }
        Ok(self.layout().total())
    }

    fn position_at_distance(&self, distance: f32) -> Result<Vec3> {
        Ok(match self.layout().locate(distance)? {
            Location::Point => self.waypoints()[0].position,
            Location::Segment { index, fraction } => self.segment_position(index, fraction),
        })
    }

    fn tangent_at_distance(&self, distance: f32) -> Result<Vec3> {
        Ok(match self.layout().locate(distance)? {
            Location::Point => Vec3::ZERO,
            Location::Segment { index, fraction } => self.segment_tangent(index, fraction),
        })
    }

    /// Orientation slerped between the segment's waypoints by the same fraction as position
    fn rotation_at_distance(&self, distance: f32) -> Result<Quat> {
        let waypoints = self.waypoints();
        Ok(match self.layout().locate(distance)? {
            Location::Point => waypoints[0].rotation,
            Location::Segment { index, fraction } => {
                slerp(waypoints[index].rotation, waypoints[index + 1].rotation, fraction)
            }
        })
    }
}
