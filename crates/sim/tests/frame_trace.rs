//! End-to-end frame driving with a recorded trace.

use proptest::prelude::*;
use std::time::{SystemTime, UNIX_EPOCH};
use trailcam_camera::CameraConfig;
use trailcam_core::{Axis, Button, CameraMode, InputFrame, ParameterAnimator, Transform};
use trailcam_locomotion::LocomotionConfig;
use trailcam_physics::StaticScene;
use trailcam_sim::{SimConfig, Simulation};
use trailcam_testkit::{read_jsonl, JsonlSink, TraceRecord};

fn simulation() -> Simulation {
    Simulation::standard(
        SimConfig::default(),
        LocomotionConfig::default(),
        CameraConfig::default(),
        ParameterAnimator::new().with_layers(2),
        StaticScene::new(),
        Transform::IDENTITY,
    )
    .expect("defaults are valid")
}

#[test]
fn scripted_session_walks_through_every_mode() {
    let path = std::env::temp_dir().join(format!(
        "trailcam-sim-{}.jsonl",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));

    let walk = InputFrame::neutral().with_axis(Axis::Vertical, 1.0);
    let aim = InputFrame::neutral().with_axis(Axis::Target, 1.0);
    let look = InputFrame::neutral().with_axis(Axis::RightStickY, 1.0);
    let hold = InputFrame::neutral();
    let exit = InputFrame::neutral().with_button(Button::ExitFpv, true);
    let script: Vec<(usize, InputFrame)> = vec![
        (30, walk),
        (30, aim),
        // Let the animator settle back to idle before looking around.
        (30, hold),
        (10, look),
        (10, hold),
        (1, exit),
    ];

    let mut sim = simulation();
    let mut modes = Vec::new();
    {
        let mut sink = JsonlSink::create(&path).expect("sink");
        for (frames, input) in &script {
            for _ in 0..*frames {
                let report = sim.step(1.0 / 60.0, input);
                modes.push(report.camera_mode);
                sink.write(&TraceRecord {
                    tick: report.tick,
                    kind: "frame",
                    payload: &report,
                })
                .expect("trace write");
            }
        }
        assert_eq!(sink.written(), modes.len());
    }

    assert_eq!(modes[29], CameraMode::Behind);
    assert_eq!(modes[59], CameraMode::Target);
    assert_eq!(modes[89], CameraMode::Behind);
    assert_eq!(modes[99], CameraMode::FirstPerson);
    assert_eq!(modes[109], CameraMode::FirstPerson);
    assert_eq!(modes[110], CameraMode::Behind);

    let lines = read_jsonl(&path).expect("trace readable");
    assert_eq!(lines.len(), modes.len());
    assert_eq!(lines[45]["payload"]["camera_mode"], "Target");
    assert_eq!(lines[0]["tick"], 0);
    let _ = std::fs::remove_file(&path);
}

proptest! {
    /// Property: arbitrary frame deltas never break the fixed-step budget or
    /// produce non-finite camera state.
    #[test]
    fn frame_deltas_stay_within_budget(
        deltas in prop::collection::vec(-0.1f32..0.5, 1..80),
        horizontal in -1.0f32..=1.0,
    ) {
        let mut sim = simulation();
        let input = InputFrame::neutral().with_axis(Axis::Horizontal, horizontal);
        for dt in deltas {
            let report = sim.step(dt, &input);
            prop_assert!(report.fixed_steps <= sim.config().max_fixed_steps);
            prop_assert!(report.dt >= 0.0);
            prop_assert!(report.camera_position.is_finite());
            prop_assert!(report.body_yaw.is_finite());
        }
    }
}
