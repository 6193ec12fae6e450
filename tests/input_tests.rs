use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use scene_engine::camera::{FlyController, AXIS_MOVE_FORWARD};
use scene_engine::core::{FrameContext, LoopControl};
use scene_engine::input::{InputController, InputKey, InputModifier, InputTrigger, ModifierSet};
use scene_engine::SceneGraph;

fn frame(input: &mut InputController, scene: &mut SceneGraph, control: &mut LoopControl) {
    let mut ctx = FrameContext::new(scene, control, 1.0 / 60.0);
    input.dispatch(&mut ctx);
}

fn recorded_axis(input: &mut InputController, name: &str) -> Rc<RefCell<Vec<f32>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    input
        .bind_axis(name, move |_, v| {
            sink.borrow_mut().push(v);
            Ok(())
        })
        .unwrap();
    log
}

#[cfg(test)]
mod input_tests {
    use super::*;

    #[test]
    fn test_opposing_keys_cancel() {
        let mut scene = SceneGraph::new();
        let mut control = LoopControl::new();
        let mut input = InputController::new();
        FlyController::register_axes(&mut input).unwrap();
        let values = recorded_axis(&mut input, AXIS_MOVE_FORWARD);

        input.key_pressed(InputKey::KeyW);
        frame(&mut input, &mut scene, &mut control);
        input.key_pressed(InputKey::KeyS);
        frame(&mut input, &mut scene, &mut control);
        input.key_released(InputKey::KeyS);
        frame(&mut input, &mut scene, &mut control);
        input.key_released(InputKey::KeyW);
        frame(&mut input, &mut scene, &mut control);

        // Listeners hear every frame, zeros included
        assert_eq!(*values.borrow(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_escape_fires_once_per_press() {
        let mut scene = SceneGraph::new();
        let mut control = LoopControl::new();
        let mut input = InputController::new();
        scene_engine::scenes::bind_standard_events(&mut input).unwrap();

        let fired = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&fired);
        input
            .bind_event("exit", move |_| {
                *sink.borrow_mut() += 1;
                Ok(())
            })
            .unwrap();

        input.key_pressed(InputKey::KeyEsc);
        input.key_pressed(InputKey::KeyEsc);
        for _ in 0..3 {
            frame(&mut input, &mut scene, &mut control);
        }
        assert_eq!(*fired.borrow(), 1);
        assert!(control.is_stop_requested());

        input.key_released(InputKey::KeyEsc);
        input.key_pressed(InputKey::KeyEsc);
        frame(&mut input, &mut scene, &mut control);
        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn test_modified_event_ignores_plain_press() {
        let mut scene = SceneGraph::new();
        let mut control = LoopControl::new();
        let mut input = InputController::new();
        input
            .create_event("save", InputKey::KeyS, InputTrigger::Press, InputModifier::Control)
            .unwrap();
        let fired = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&fired);
        input
            .bind_event("save", move |_| {
                *sink.borrow_mut() += 1;
                Ok(())
            })
            .unwrap();

        input.key_pressed(InputKey::KeyS);
        frame(&mut input, &mut scene, &mut control);
        input.key_released(InputKey::KeyS);
        assert_eq!(*fired.borrow(), 0);

        input.key_pressed(InputKey::KeyLeftControl);
        input.key_pressed(InputKey::KeyLeftShift);
        input.key_pressed(InputKey::KeyS);
        frame(&mut input, &mut scene, &mut control);
        input.key_released(InputKey::KeyS);
        assert_eq!(*fired.borrow(), 0);

        input.key_released(InputKey::KeyLeftShift);
        input.key_pressed(InputKey::KeyS);
        frame(&mut input, &mut scene, &mut control);
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(input.modifiers(), ModifierSet::from(InputModifier::Control));
    }

    #[test]
    fn test_space_release_toggles_game_mode() {
        let mut scene = SceneGraph::new();
        let mut control = LoopControl::new();
        let mut input = InputController::new();
        scene_engine::scenes::bind_standard_events(&mut input).unwrap();

        input.key_pressed(InputKey::KeySpace);
        frame(&mut input, &mut scene, &mut control);
        assert!(!input.game_mode());

        input.key_released(InputKey::KeySpace);
        frame(&mut input, &mut scene, &mut control);
        assert!(input.game_mode());
        assert!(control.game_mode());
    }

    #[test]
    fn test_fly_controller_moves_and_turns_target() {
        let mut scene = SceneGraph::new();
        let camera = scene.create_perspective_camera("camera", 60.0, 0.5, 10.0).unwrap();
        let mut control = LoopControl::new();
        let mut input = InputController::new();
        FlyController::new(0.5, 0.1).attach(&mut input, camera).unwrap();

        input.key_pressed(InputKey::KeyW);
        frame(&mut input, &mut scene, &mut control);
        frame(&mut input, &mut scene, &mut control);
        let p = scene.transform(camera).unwrap().translation();
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        input.key_released(InputKey::KeyW);

        // Pointer motion is ignored outside game mode
        input.pointer_moved(100.0, 100.0);
        input.pointer_moved(50.0, 100.0);
        frame(&mut input, &mut scene, &mut control);
        assert_eq!(scene.transform(camera).unwrap().euler(), Vec3::ZERO);

        input.set_game_mode(true);
        input.pointer_moved(100.0, 100.0);
        input.pointer_moved(50.0, 100.0);
        frame(&mut input, &mut scene, &mut control);
        let yaw = scene.transform(camera).unwrap().euler().y;
        assert!((yaw - 5.0).abs() < 1e-2, "yaw {yaw}");

        // Pitch, then a large yaw: the right vector must stay level
        input.pointer_delta(0.0, -450.0);
        frame(&mut input, &mut scene, &mut control);
        input.pointer_delta(900.0, 0.0);
        frame(&mut input, &mut scene, &mut control);

        let right = scene.right(camera).unwrap();
        assert!(right.y.abs() < 1e-4, "right {right}");
        let euler = scene.transform(camera).unwrap().euler();
        assert!(euler.z.abs() < 1e-2, "euler {euler}");
        assert!((euler.x - 45.0).abs() < 1e-2, "euler {euler}");
    }
}
