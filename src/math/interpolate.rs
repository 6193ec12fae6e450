use glam::{EulerRot, Quat, Vec3};

/// Linear interpolation between two scalars
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`, clamped to [0, 1]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 == edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Shortest-arc spherical interpolation, `t` clamped to [0, 1]
pub fn slerp(q0: Quat, q1: Quat, t: f32) -> Quat {
    q0.normalize().slerp(q1.normalize(), t.clamp(0.0, 1.0))
}

/// Euler angles in degrees (pitch X, yaw Y, roll Z), applied yaw then pitch then roll
pub fn euler_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Inverse of [`euler_to_quat`], returns degrees as (pitch, yaw, roll)
pub fn quat_to_euler(q: Quat) -> Vec3 {
    let (yaw, pitch, roll) = q.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn smoothstep_is_clamped_and_symmetric() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
        assert!(smoothstep(0.0, 1.0, 0.25) < 0.25);
    }

    #[test]
    fn slerp_halfway_around_y() {
        let q0 = Quat::IDENTITY;
        let q1 = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mid = slerp(q0, q1, 0.5);
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let q0 = Quat::from_rotation_z(0.1);
        let q1 = -Quat::from_rotation_z(0.3);
        let mid = slerp(q0, q1, 0.5);
        let expected = Quat::from_rotation_z(0.2);
        assert!(mid.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn euler_round_trip() {
        let euler = Vec3::new(-20.0, 45.0, 10.0);
        let back = quat_to_euler(euler_to_quat(euler));
        assert!(back.abs_diff_eq(euler, 1e-3));
    }

    #[test]
    fn euler_yaw_only_matches_rotation_y() {
        let q = euler_to_quat(Vec3::new(0.0, 90.0, 0.0));
        assert!(q.abs_diff_eq(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), 1e-6));
    }
}
