use glam::Vec3;

use super::quadrature::GaussLegendre;

/// Cubic Hermite segment between two points with explicit tangents
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicHermite {
    pub p0: Vec3,
    pub p1: Vec3,
    pub m0: Vec3,
    pub m1: Vec3,
}

impl CubicHermite {
    pub fn new(p0: Vec3, p1: Vec3, m0: Vec3, m1: Vec3) -> Self {
        Self { p0, p1, m0, m1 }
    }

    /// Point at parameter `t` in [0, 1]; exact at both ends
    pub fn point(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        self.p0 * h00 + self.m0 * h10 + self.p1 * h01 + self.m1 * h11
    }

    /// First derivative with respect to `t`
    pub fn tangent(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let d00 = 6.0 * t2 - 6.0 * t;
        let d10 = 3.0 * t2 - 4.0 * t + 1.0;
        let d01 = -6.0 * t2 + 6.0 * t;
        let d11 = 3.0 * t2 - 2.0 * t;
        self.p0 * d00 + self.m0 * d10 + self.p1 * d01 + self.m1 * d11
    }

    /// Arc length over [a, b]
    pub fn length_between(&self, quadrature: &GaussLegendre, a: f32, b: f32) -> f32 {
        quadrature.integrate(a, b, |t| self.tangent(t).length())
    }
}
