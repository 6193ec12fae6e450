use glam::Vec3;

use super::path::{Path, PathLayout, Waypoint};
use crate::math::{CubicHermite, GaussLegendre};

/// Samples per segment in the distance -> parameter table
const LUT_SAMPLES: usize = 32;
const QUADRATURE_ORDER: usize = 8;

#[derive(Debug, Clone)]
struct Segment {
    curve: CubicHermite,
    /// Arc length at u = k / LUT_SAMPLES, k = 0..=LUT_SAMPLES
    lut: Vec<f32>,
}

impl Segment {
    fn new(curve: CubicHermite, quadrature: &GaussLegendre) -> Self {
        let step = 1.0 / LUT_SAMPLES as f32;
        let mut lut = Vec::with_capacity(LUT_SAMPLES + 1);
        let mut acc = 0.0;
        lut.push(0.0);
        for k in 0..LUT_SAMPLES {
            let a = k as f32 * step;
            acc += curve.length_between(quadrature, a, a + step);
            lut.push(acc);
        }
        Self { curve, lut }
    }

    fn length(&self) -> f32 {
        self.lut[LUT_SAMPLES]
    }

    /// Invert arc-length fraction to curve parameter
    fn parameter(&self, fraction: f32) -> f32 {
        let length = self.length();
        if length <= 0.0 {
            return fraction;
        }
        let target = fraction.clamp(0.0, 1.0) * length;
        let upper = self.lut.partition_point(|&s| s < target).clamp(1, LUT_SAMPLES);
        let (s0, s1) = (self.lut[upper - 1], self.lut[upper]);
        let local = if s1 > s0 { (target - s0) / (s1 - s0) } else { 0.0 };
        ((upper - 1) as f32 + local) / LUT_SAMPLES as f32
    }
}

/// Piecewise cubic Hermite path through its waypoints.
///
/// Interior tangents are Catmull-Rom (`0.5 * (next - prev)`); the open ends
/// use the explicit start/end tangents when set, otherwise half the
/// adjacent chord.
#[derive(Debug, Clone)]
pub struct SplinePath {
    waypoints: Vec<Waypoint>,
    start_tangent: Option<Vec3>,
    end_tangent: Option<Vec3>,
    segments: Vec<Segment>,
    layout: PathLayout,
    quadrature: GaussLegendre,
}

impl Default for SplinePath {
    fn default() -> Self {
        Self::new()
    }
}

impl SplinePath {
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            start_tangent: None,
            end_tangent: None,
            segments: Vec::new(),
            layout: PathLayout::empty(),
            quadrature: GaussLegendre::new(QUADRATURE_ORDER),
        }
    }

    pub fn set_start_tangent(&mut self, tangent: impl Into<Vec3>) -> &mut Self {
        self.start_tangent = Some(tangent.into());
        self.rebuild();
        self
    }

    pub fn set_end_tangent(&mut self, tangent: impl Into<Vec3>) -> &mut Self {
        self.end_tangent = Some(tangent.into());
        self.rebuild();
        self
    }

    /// Revert both end tangents to the derived default
    pub fn clear_end_tangents(&mut self) -> &mut Self {
        self.start_tangent = None;
        self.end_tangent = None;
        self.rebuild();
        self
    }

    pub fn start_tangent(&self) -> Option<Vec3> {
        self.start_tangent
    }

    pub fn end_tangent(&self) -> Option<Vec3> {
        self.end_tangent
    }

    /// Unweighted geometric length of segment `index`
    pub fn segment_length(&self, index: usize) -> Option<f32> {
        self.segments.get(index).map(Segment::length)
    }

    fn tangents(&self) -> Vec<Vec3> {
        let p: Vec<Vec3> = self.waypoints.iter().map(|w| w.position).collect();
        let n = p.len();
        (0..n)
            .map(|i| match i {
                0 => self.start_tangent.unwrap_or_else(|| 0.5 * (p[1] - p[0])),
                i if i == n - 1 => self.end_tangent.unwrap_or_else(|| 0.5 * (p[i] - p[i - 1])),
                i => 0.5 * (p[i + 1] - p[i - 1]),
            })
            .collect()
    }
}

impl Path for SplinePath {
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
        if self.waypoints.is_empty() {
            self.segments.clear();
            self.layout = PathLayout::empty();
            return;
        }
        if self.waypoints.len() == 1 {
            self.segments.clear();
            self.layout = PathLayout::from_segments([]);
            return;
        }

        let tangents = self.tangents();
        let quadrature = &self.quadrature;
        self.segments = self
            .waypoints
            .windows(2)
            .zip(tangents.windows(2))
            .map(|(w, m)| {
                let curve = CubicHermite::new(w[0].position, w[1].position, m[0], m[1]);
                Segment::new(curve, quadrature)
            })
            .collect();

        self.layout = PathLayout::from_segments(
            self.segments
                .iter()
                .zip(self.waypoints.iter().skip(1))
                .map(|(segment, end)| segment.length() * end.weight),
        );
        log::trace!(
            "spline rebuilt: {} waypoints, length {:.3}",
            self.waypoints.len(),
            self.layout.total()
        );
    }

    fn segment_position(&self, index: usize, fraction: f32) -> Vec3 {
        let segment = &self.segments[index];
        segment.curve.point(segment.parameter(fraction))
    }

    fn segment_tangent(&self, index: usize, fraction: f32) -> Vec3 {
        let segment = &self.segments[index];
        segment.curve.tangent(segment.parameter(fraction)).normalize_or_zero()
    }
}
