use std::f32::consts::{FRAC_PI_2, TAU};

use cgmath::{Point2, Rad};
use voxel_space::{CameraController, CameraPose, CameraState, MovementIntent, Settings};

fn pose_at(x: f32, y: f32, yaw: f32) -> CameraPose {
    CameraPose::new(Point2::new(x, y), Rad(yaw), 50.0, 100.0, 120.0)
}

fn random_intent(rng: &mut fastrand::Rng) -> MovementIntent {
    MovementIntent {
        move_forward: rng.bool(),
        move_backward: rng.bool(),
        strafe_left: rng.bool(),
        strafe_right: rng.bool(),
        yaw_left: rng.bool(),
        yaw_right: rng.bool(),
        rise_up: rng.bool(),
        rise_down: rng.bool(),
    }
}

#[test]
fn yaw_stays_in_range_under_random_input() {
    let mut rng = fastrand::Rng::with_seed(42);
    let controller = CameraController::new(5.0, 0.3, 10.0);
    let mut pose = pose_at(0.0, 0.0, 0.0);

    for _ in 0..10_000 {
        controller.apply(&mut pose, random_intent(&mut rng));
        assert!(pose.yaw.0 >= 0.0 && pose.yaw.0 < TAU, "yaw {}", pose.yaw.0);
        assert!(pose.position.x.is_finite() && pose.position.y.is_finite());
    }
}

#[test]
fn turning_right_from_zero_wraps_below_a_full_turn() {
    let controller = CameraController::new(5.0, 0.06, 10.0);
    let mut pose = pose_at(0.0, 0.0, 0.0);

    controller.apply(
        &mut pose,
        MovementIntent {
            yaw_right: true,
            ..Default::default()
        },
    );

    assert!((pose.yaw.0 - (TAU - 0.06)).abs() < 1e-5);
}

#[test]
fn forward_moves_toward_the_view_fan() {
    let controller = CameraController::new(5.0, 0.06, 10.0);
    let mut pose = pose_at(400.0, 400.0, 0.0);

    controller.apply(
        &mut pose,
        MovementIntent {
            move_forward: true,
            ..Default::default()
        },
    );
    assert!((pose.position.x - 400.0).abs() < 1e-4);
    assert!((pose.position.y - 395.0).abs() < 1e-4);

    let mut turned = pose_at(400.0, 400.0, FRAC_PI_2);
    controller.apply(
        &mut turned,
        MovementIntent {
            move_forward: true,
            ..Default::default()
        },
    );
    assert!((turned.position.x - 395.0).abs() < 1e-4);
    assert!((turned.position.y - 400.0).abs() < 1e-4);
}

#[test]
fn combined_intents_add_up() {
    let controller = CameraController::new(5.0, 0.06, 10.0);
    let mut pose = pose_at(100.0, 100.0, 0.0);

    controller.apply(
        &mut pose,
        MovementIntent {
            move_forward: true,
            strafe_right: true,
            rise_up: true,
            ..Default::default()
        },
    );

    assert!((pose.position.x - 105.0).abs() < 1e-4);
    assert!((pose.position.y - 95.0).abs() < 1e-4);
    assert_eq!(pose.height, 60.0);
}

#[test]
fn opposite_intents_cancel() {
    let controller = CameraController::new(5.0, 0.06, 10.0);
    let start = pose_at(10.0, 20.0, 0.0);
    let mut pose = start;

    controller.apply(
        &mut pose,
        MovementIntent {
            move_forward: true,
            move_backward: true,
            strafe_left: true,
            strafe_right: true,
            yaw_left: true,
            yaw_right: true,
            rise_up: true,
            rise_down: true,
        },
    );

    assert_eq!(pose, start);
}

#[test]
fn height_may_go_below_zero() {
    let controller = CameraController::new(5.0, 0.06, 10.0);
    let mut pose = pose_at(0.0, 0.0, 0.0);

    for _ in 0..8 {
        controller.apply(
            &mut pose,
            MovementIntent {
                rise_down: true,
                ..Default::default()
            },
        );
    }

    assert_eq!(pose.height, -30.0);
}

#[test]
fn camera_state_applies_each_intent_once() {
    let mut state = CameraState::new(&Settings::default());

    state.intake_intent(MovementIntent {
        strafe_left: true,
        ..Default::default()
    });
    assert!(state.update());
    assert!((state.pose().position.x - 395.0).abs() < 1e-4);

    assert!(!state.update());
    assert!((state.pose().position.x - 395.0).abs() < 1e-4);
}
