use glam::{Quat, Vec3};

use super::common::bind_standard_events;
use crate::camera::FlyController;
use crate::core::{Engine, RenderBackend};
use crate::error::Result;
use crate::math::{euler_to_quat, slerp, smoothstep};

/// Block-built plane banking through a looping keyframed manoeuvre
pub fn create_aircraft_scene<B: RenderBackend>(engine: &mut Engine<B>) -> Result<()> {
    let controls = FlyController::from_config(&engine.config().controls);

    engine.pipeline_mut().add_geometry_stage("base")?.set_framebuffer_enabled(false);
    bind_standard_events(engine.input_mut())?;

    let scene = engine.scene_mut();

    let camera = scene.create_perspective_camera("camera", 45.0, 0.1, 100.0)?;
    scene
        .transform_mut(camera)?
        .translate([15.0, 15.0, 15.0])
        .rotate([-35.0, 45.0, 0.0]);
    scene.set_active_camera("camera")?;

    // Axis markers
    let markers = [
        ("x", Vec3::new(10.0, 0.05, 0.05)),
        ("y", Vec3::new(0.05, 10.0, 0.05)),
        ("z", Vec3::new(0.05, 0.05, 10.0)),
    ];
    for (name, scale) in markers {
        let line = scene.create_mesh(name, "cubeMesh", format!("{name}Material"))?;
        scene.transform_mut(line)?.scale(scale);
    }

    let plane = scene.create_empty("plane")?;
    let parts = [
        ("fuselage", Vec3::new(1.0, 1.0, 10.0), Vec3::ZERO, Vec3::ZERO),
        ("wings", Vec3::new(12.0, 0.2, 1.0), Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO),
        ("rudder", Vec3::new(0.2, 2.0, 1.0), Vec3::new(0.0, 1.0, -5.0), Vec3::new(-10.0, 0.0, 0.0)),
        ("tail", Vec3::new(4.0, 0.2, 1.0), Vec3::new(0.0, 0.2, -5.0), Vec3::ZERO),
    ];
    for (name, scale, offset, euler) in parts {
        let part = scene.create_mesh(name, "cubeMesh", "planeMaterial")?;
        scene
            .transform_mut(part)?
            .scale(scale)
            .translate(offset)
            .rotate(euler);
        scene.set_parent_handle(part, plane)?;
    }

    let sun = scene.create_directional_light("sun")?;
    scene.transform_mut(sun)?.rotate([90.0, 0.0, 10.0]);
    scene.light_mut(sun)?.enabled = true;

    let animation = scene.create_animation("flight")?;
    let anim = scene.animation_mut(animation)?;
    anim.add_property_with(
        "rotation",
        Quat::IDENTITY,
        move |scene, rotation| {
            scene.transform_mut(plane)?.rotate_quat(rotation);
            Ok(())
        },
        |a, b, u| slerp(a, b, smoothstep(0.0, 1.0, u)),
    )?;
    anim.add_keyframe("rotation", 2.0, euler_to_quat(Vec3::new(-35.0, 0.0, 0.0)))?
        .add_keyframe("rotation", 5.0, euler_to_quat(Vec3::new(-35.0, 20.0, -45.0)))?
        .add_keyframe("rotation", 11.0, euler_to_quat(Vec3::new(-35.0, -20.0, 45.0)))?
        .add_keyframe("rotation", 14.0, Quat::IDENTITY)?
        .set_looping(true)
        .play();

    controls.attach(engine.input_mut(), camera)?;
    Ok(())
}
