use glam::{Quat, Vec2, Vec3};

use super::common::bind_standard_events;
use crate::camera::FlyController;
use crate::core::{Engine, RenderBackend};
use crate::error::Result;
use crate::render::PipelineLink;
use crate::scene::{ObjectKind, Path, Spin};

/// Lit tabletop with a lamp travelling a looping spline and a fly camera
pub fn create_showcase_scene<B: RenderBackend>(engine: &mut Engine<B>) -> Result<()> {
    let (width, height) = (engine.config().window.width, engine.config().window.height);
    let controls = FlyController::from_config(&engine.config().controls);

    let pipeline = engine.pipeline_mut();
    pipeline.add_geometry_stage("base")?;
    // HDR resolve, antialiasing, then gamma straight to the screen
    pipeline
        .add_quad_stage("hdr_postprocess")?
        .set_shader_program("post_hdr_shader")
        .set_color_link(PipelineLink::Previous);
    pipeline
        .add_quad_stage("fxaa_postprocess")?
        .set_shader_program("post_fxaa_shader")
        .set_parameter_float("fMaxSpan", 4.0)
        .set_parameter_vec2("vInvResolution", Vec2::new(1.0 / width as f32, 1.0 / height as f32))
        .set_color_link(PipelineLink::Previous);
    pipeline
        .add_quad_stage("gamma_postprocess+screen")?
        .set_shader_program("post_gamma_shader")
        .set_parameter_float("fGamma", 2.1)
        .set_color_link(PipelineLink::Previous)
        .set_framebuffer_enabled(false);

    bind_standard_events(engine.input_mut())?;

    let scene = engine.scene_mut();

    let camera = scene.create_perspective_camera("camera", 60.0, 0.5, 10.0)?;
    scene
        .transform_mut(camera)?
        .translate([5.0, 2.5, 5.0])
        .rotate([-20.0, 45.0, 0.0]);
    scene.set_active_camera("camera")?;

    let cube = scene.create_mesh("cube", "cubeMesh", "redMaterial")?;
    scene.transform_mut(cube)?.scale_uniform(0.5).translate([0.0, 1.1, 0.0]);

    let cone = scene.create_mesh("cone", "coneMesh", "goldMaterial")?;
    scene.transform_mut(cone)?.translate([-1.5, 0.5, 1.0]).scale_uniform(0.5);
    scene.add_behavior(cone, Spin::yaw(90.0))?;

    let cylinder = scene.create_mesh("cylinder", "cylinderMesh", "blueMaterial")?;
    scene
        .transform_mut(cylinder)?
        .rotate([90.0, 12.5, 0.0])
        .translate([1.7, 0.5, 0.7])
        .scale_uniform(0.5);

    let lamp = scene.create_mesh("lamp", "lampMesh", "lampMaterial")?;
    scene
        .transform_mut(lamp)?
        .scale([0.1, 0.1, 0.1])
        .translate([1.0, 0.75, 1.0]);

    let floor = scene.create_mesh("floor", "floorMesh", "greenMaterial")?;
    scene
        .transform_mut(floor)?
        .scale([2.5, 0.05, 2.5])
        .translate([0.0, -0.05, 0.0]);

    let light1 = scene.create_point_light("light1")?;
    scene.set_parent(light1, "lamp")?;
    if let ObjectKind::PointLight(point) = scene.object_mut(light1)?.kind_mut() {
        point.light.color = Vec3::splat(1.5);
        point.light.enabled = true;
        point.attenuation.linear = 0.0;
        point.attenuation.quadratic = 1.0;
    }

    for (name, yaw) in [("light2", -135.0), ("light2a", 135.0)] {
        let light = scene.create_directional_light(name)?;
        scene.transform_mut(light)?.rotate([45.0, yaw, 0.0]);
        let light = scene.light_mut(light)?;
        light.color = Vec3::splat(2.7);
        light.enabled = true;
    }

    let light3 = scene.create_spot_light("light3")?;
    scene
        .transform_mut(light3)?
        .translate([2.0, 10.0, 0.0])
        .rotate([90.0, 0.0, 0.0]);
    if let ObjectKind::SpotLight(spot) = scene.object_mut(light3)?.kind_mut() {
        spot.light.color = Vec3::splat(2.7);
        spot.light.enabled = true;
        spot.inner_cutoff = 5.0;
        spot.outer_cutoff = 12.0;
    }

    let path = scene.create_spline_path("splinepath")?;
    scene
        .spline_path_mut(path)?
        .add_waypoint([2.0, 0.0, 2.0], Quat::IDENTITY)
        .add_waypoint([-2.0, 0.0, 2.0], Quat::IDENTITY)
        .add_waypoint([2.0, 0.0, -2.0], Quat::IDENTITY)
        .add_waypoint([2.0, 0.0, 2.0], Quat::IDENTITY)
        .insert_waypoint(2, [-2.0, 2.0, -2.0], Quat::IDENTITY)
        .set_start_tangent([-2.0, 0.0, 2.0])
        .set_end_tangent([-2.0, 0.0, 2.0]);
    scene
        .transform_mut(path)?
        .rotate([0.0, 0.0, -15.0])
        .translate([0.0, 1.0, 0.0]);

    let animation = scene.create_animation("lightAnimation")?;
    let anim = scene.animation_mut(animation)?;
    anim.add_property("t", 0.0f32, move |scene, t| {
        let distance = scene.path_length(path)? * t;
        let position = scene.path_position_world(path, distance)?;
        let rotation = scene.path_rotation_world(path, distance)?;
        scene.transform_mut(lamp)?.translate(position).rotate_quat(rotation);
        Ok(())
    })?;
    anim.add_keyframe("t", 5.0, 1.0f32)?;
    anim.set_looping(true).play();

    controls.attach(engine.input_mut(), camera)?;
    Ok(())
}
