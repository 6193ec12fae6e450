use glam::{Quat, Vec3};
use scene_engine::scene::{LinearPath, Path, SplinePath};
use scene_engine::{EngineError, SceneGraph};

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-3
}

fn showcase_path() -> SplinePath {
    let mut path = SplinePath::new();
    path.add_waypoint([2.0, 0.0, 2.0], Quat::IDENTITY)
        .add_waypoint([-2.0, 0.0, 2.0], Quat::IDENTITY)
        .add_waypoint([2.0, 0.0, -2.0], Quat::IDENTITY)
        .add_waypoint([2.0, 0.0, 2.0], Quat::IDENTITY)
        .insert_waypoint(2, [-2.0, 2.0, -2.0], Quat::IDENTITY)
        .set_start_tangent([-2.0, 0.0, 2.0])
        .set_end_tangent([-2.0, 0.0, 2.0]);
    path
}

#[cfg(test)]
mod spline_path_tests {
    use super::*;

    #[test]
    fn test_empty_path_queries_fail() {
        let path = SplinePath::new();
        assert!(matches!(path.path_length(), Err(EngineError::InvalidArgument(_))));
        assert!(path.position_at_distance(0.0).is_err());
    }

    #[test]
    fn test_single_waypoint_path_has_zero_length() {
        let mut path = SplinePath::new();
        path.add_waypoint([1.0, 2.0, 3.0], Quat::IDENTITY);
        assert_eq!(path.path_length().unwrap(), 0.0);
        assert!(approx(path.position_at_distance(5.0).unwrap(), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_insert_places_waypoint_before_index() {
        let path = showcase_path();
        let positions: Vec<Vec3> = path.waypoints().iter().map(|w| w.position).collect();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[2], Vec3::new(-2.0, 2.0, -2.0));
        assert_eq!(positions[3], Vec3::new(2.0, 0.0, -2.0));
    }

    #[test]
    fn test_endpoints_are_exact() {
        let path = showcase_path();
        let length = path.path_length().unwrap();
        assert!(length > 0.0);
        assert!(approx(path.position_at_distance(0.0).unwrap(), Vec3::new(2.0, 0.0, 2.0)));
        assert!(approx(path.position_at_distance(length).unwrap(), Vec3::new(2.0, 0.0, 2.0)));
        // Out-of-range distances clamp to the ends
        assert!(approx(path.position_at_distance(-1.0).unwrap(), Vec3::new(2.0, 0.0, 2.0)));
        assert!(approx(path.position_at_distance(length * 2.0).unwrap(), Vec3::new(2.0, 0.0, 2.0)));
    }

    #[test]
    fn test_passes_through_interior_waypoints() {
        let path = showcase_path();
        let lengths: Vec<f32> = (0..4).map(|i| path.segment_length(i).unwrap()).collect();
        let mut distance = 0.0;
        for (i, len) in lengths.iter().enumerate() {
            distance += len;
            let expected = path.waypoints()[i + 1].position;
            assert!(approx(path.position_at_distance(distance).unwrap(), expected));
        }
    }

    #[test]
    fn test_straight_spline_position_is_monotonic() {
        let mut path = SplinePath::new();
        path.add_waypoint([0.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([3.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([10.0, 0.0, 0.0], Quat::IDENTITY);

        let length = path.path_length().unwrap();
        assert!((length - 10.0).abs() < 1e-2);

        let mut last = -1.0;
        for i in 0..=100 {
            let x = path.position_at_distance(length * i as f32 / 100.0).unwrap().x;
            assert!(x >= last - 1e-4, "x went backwards at step {i}: {x} < {last}");
            last = x;
        }
    }

    #[test]
    fn test_distance_is_arc_length() {
        let mut path = SplinePath::new();
        path.add_waypoint([0.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([4.0, 0.0, 0.0], Quat::IDENTITY);
        // Uneven tangents bunch the parameter; distance must stay even
        path.set_start_tangent([12.0, 0.0, 0.0]).set_end_tangent([1.0, 0.0, 0.0]);

        let length = path.path_length().unwrap();
        let quarter = path.position_at_distance(length * 0.25).unwrap();
        let half = path.position_at_distance(length * 0.5).unwrap();
        assert!((quarter.x - 1.0).abs() < 0.05, "quarter at {quarter}");
        assert!((half.x - 2.0).abs() < 0.05, "half at {half}");
    }

    #[test]
    fn test_rotation_slerps_between_waypoints() {
        let mut path = LinearPath::new();
        path.add_waypoint([0.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([2.0, 0.0, 0.0], Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

        let mid = path.rotation_at_distance(1.0).unwrap();
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.angle_between(expected) < 1e-4);
        assert!(approx(path.tangent_at_distance(1.0).unwrap(), Vec3::X));
    }

    #[test]
    fn test_weight_shortens_share_without_moving_geometry() {
        let mut plain = SplinePath::new();
        plain
            .add_waypoint([0.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([2.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([4.0, 0.0, 0.0], Quat::IDENTITY);
        let mut weighted = plain.clone();
        weighted.set_waypoint_weight(1, 0.5).unwrap();

        let first = plain.segment_length(0).unwrap();
        let second = plain.segment_length(1).unwrap();
        assert_eq!(weighted.segment_length(0).unwrap(), first);
        assert!((weighted.path_length().unwrap() - (0.5 * first + second)).abs() < 1e-4);

        // The first segment now ends at half its old distance
        assert!(approx(weighted.position_at_distance(0.5 * first).unwrap(), Vec3::new(2.0, 0.0, 0.0)));
        assert!(approx(
            weighted.position_at_distance(0.25 * first).unwrap(),
            plain.position_at_distance(0.5 * first).unwrap()
        ));
        assert!(approx(
            weighted.position_at_distance(weighted.path_length().unwrap()).unwrap(),
            Vec3::new(4.0, 0.0, 0.0)
        ));
    }

    #[test]
    fn test_set_waypoint_out_of_range() {
        let mut path = showcase_path();
        assert!(matches!(
            path.set_waypoint(9, [0.0, 0.0, 0.0], Quat::IDENTITY),
            Err(EngineError::NotFound { .. })
        ));
        assert!(path.set_waypoint_weight(0, -1.0).is_err());
    }

    #[test]
    fn test_world_space_sampling_uses_path_transform() {
        let mut scene = SceneGraph::new();
        let handle = scene.create_linear_path("rail").unwrap();
        scene
            .linear_path_mut(handle)
            .unwrap()
            .add_waypoint([0.0, 0.0, 0.0], Quat::IDENTITY)
            .add_waypoint([1.0, 0.0, 0.0], Quat::IDENTITY);
        scene.transform_mut(handle).unwrap().translate([0.0, 1.0, 0.0]).scale_uniform(2.0);

        assert_eq!(scene.path_length(handle).unwrap(), 1.0);
        let end = scene.path_position_world(handle, 1.0).unwrap();
        assert!(approx(end, Vec3::new(2.0, 1.0, 0.0)));
    }
}
