//! trailcam - third-person locomotion and follow-camera rig
//!
//! Headless driver: replays scripted stick input through the rig and traces
//! every frame.

mod config;
mod scripted_input;

use anyhow::{Context, Result};
use config::RigConfig;
use scripted_input::ScriptedInputPlayer;
use std::{env, path::PathBuf};
use tracing::info;
use trailcam_core::{CameraMode, InputFrame, Transform};
use trailcam_sim::{FrameReport, Simulation};
use trailcam_testkit::{JsonlSink, TraceRecord};

/// Frames run when neither `--frames` nor a script bounds the session.
const DEFAULT_FRAMES: u64 = 600;
/// Hard stop for scripts that never reach their last step (one hour at 60 Hz).
const MAX_SCRIPT_FRAMES: u64 = 216_000;

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting trailcam v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let config = match cli.config.as_deref() {
        Some(path) => RigConfig::load_from_path(path),
        None => RigConfig::load(),
    };

    if let Some(path) = cli.dump_config.as_deref() {
        config
            .save_to_path(path)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "wrote effective configuration");
    }

    let mut sim = Simulation::standard(
        config.sim.clone(),
        config.locomotion.clone(),
        config.camera.clone(),
        config.animator.build(),
        config.scene.build(),
        Transform::IDENTITY,
    )
    .context("invalid rig configuration")?;

    let mut player = match cli.script.as_deref() {
        Some(path) => Some(
            ScriptedInputPlayer::from_path(path)
                .with_context(|| format!("failed to load script {}", path.display()))?,
        ),
        None => None,
    };

    let mut sink = match cli.trace.as_deref() {
        Some(path) => Some(JsonlSink::create(path)?),
        None => None,
    };

    let limit = match (cli.frames, player.is_some()) {
        (Some(frames), _) => frames,
        (None, true) => MAX_SCRIPT_FRAMES,
        (None, false) => DEFAULT_FRAMES,
    };

    let mut summary = RunSummary::default();
    for _ in 0..limit {
        let input = match player.as_mut() {
            Some(player) => player.advance(cli.dt),
            None => InputFrame::neutral(),
        };
        let report = sim.step(cli.dt, &input);
        summary.record(&report);

        if let Some(sink) = sink.as_mut() {
            sink.write(&TraceRecord {
                tick: report.tick,
                kind: "frame",
                payload: &report,
            })?;
        }

        if cli.frames.is_none() && player.as_ref().is_some_and(ScriptedInputPlayer::finished) {
            break;
        }
    }

    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }

    let body = sim.body();
    info!(
        frames = summary.frames,
        mode_changes = summary.mode_changes,
        occluded_frames = summary.occluded_frames,
        first_person_frames = summary.first_person_frames,
        target_frames = summary.target_frames,
        body_yaw = body.yaw_degrees(),
        camera = ?sim.camera().transform().position,
        final_mode = sim.camera().mode().label(),
        "run complete"
    );

    Ok(())
}

/// Counters accumulated over a run.
#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    mode_changes: u64,
    occluded_frames: u64,
    first_person_frames: u64,
    target_frames: u64,
    last_mode: Option<CameraMode>,
}

impl RunSummary {
    fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.occluded {
            self.occluded_frames += 1;
        }
        match report.camera_mode {
            CameraMode::FirstPerson => self.first_person_frames += 1,
            CameraMode::Target => self.target_frames += 1,
            CameraMode::Behind | CameraMode::Free => {}
        }
        if self
            .last_mode
            .is_some_and(|previous| previous != report.camera_mode)
        {
            self.mode_changes += 1;
        }
        self.last_mode = Some(report.camera_mode);
    }
}

/// Command line options for the headless driver.
#[derive(Debug)]
struct CliOptions {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    trace: Option<PathBuf>,
    dump_config: Option<PathBuf>,
    frames: Option<u64>,
    dt: f32,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions {
            config: None,
            script: None,
            trace: None,
            dump_config: None,
            frames: None,
            dt: 1.0 / 60.0,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--script" => {
                    if let Some(path) = args.next() {
                        opts.script = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--script requires a file path");
                    }
                }
                "--trace" => {
                    if let Some(path) = args.next() {
                        opts.trace = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--trace requires a file path");
                    }
                }
                "--dump-config" => {
                    if let Some(path) = args.next() {
                        opts.dump_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--dump-config requires a file path");
                    }
                }
                "--frames" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<u64>() {
                            Ok(value) => opts.frames = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--frames must be an integer");
                            }
                        }
                    } else {
                        tracing::error!("--frames requires an integer");
                    }
                }
                "--dt" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<f32>() {
                            Ok(value) if value.is_finite() && value > 0.0 => opts.dt = value,
                            Ok(value) => {
                                tracing::error!(value, "--dt must be a positive number of seconds");
                            }
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--dt must be a number");
                            }
                        }
                    } else {
                        tracing::error!("--dt requires a number of seconds");
                    }
                }
                other => tracing::warn!(arg = other, "ignoring unknown argument"),
            }
        }

        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn defaults_without_arguments() {
        let opts = parse(&[]);
        assert!(opts.config.is_none());
        assert!(opts.script.is_none());
        assert!(opts.frames.is_none());
        assert!((opts.dt - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn parses_every_option() {
        let opts = parse(&[
            "--config",
            "rig.toml",
            "--script",
            "walk.json",
            "--trace",
            "out/trace.jsonl",
            "--frames",
            "120",
            "--dt",
            "0.02",
            "--dump-config",
            "effective.toml",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("rig.toml")));
        assert_eq!(opts.script, Some(PathBuf::from("walk.json")));
        assert_eq!(opts.trace, Some(PathBuf::from("out/trace.jsonl")));
        assert_eq!(opts.dump_config, Some(PathBuf::from("effective.toml")));
        assert_eq!(opts.frames, Some(120));
        assert_eq!(opts.dt, 0.02);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let opts = parse(&["--frames", "lots", "--dt", "-1", "--bogus"]);
        assert!(opts.frames.is_none());
        assert!((opts.dt - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn summary_counts_mode_changes() {
        let mut summary = RunSummary::default();
        let mut sim = Simulation::standard(
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Default::default(),
            Transform::IDENTITY,
        )
        .expect("defaults are valid");
        let aim = InputFrame::neutral().with_axis(trailcam_core::Axis::Target, 1.0);
        summary.record(&sim.step(0.02, &InputFrame::neutral()));
        summary.record(&sim.step(0.02, &aim));
        summary.record(&sim.step(0.02, &InputFrame::neutral()));
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.mode_changes, 2);
        assert_eq!(summary.target_frames, 1);
    }
}
