use serde::Deserialize;
use std::{fs, path::Path};
use trailcam_core::InputFrame;

#[derive(Debug, Deserialize)]
struct ScriptedInputFile {
    steps: Vec<ScriptedStep>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
struct ScriptedStep {
    duration: f32,
    #[serde(flatten)]
    input: InputFrame,
}

/// Replays a JSON list of timed input steps.
pub struct ScriptedInputPlayer {
    steps: Vec<ScriptedStep>,
    index: usize,
    time_in_step: f32,
    finished: bool,
}

impl ScriptedInputPlayer {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let file: ScriptedInputFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("scripted input file contains no steps");
        }
        if let Some(step) = file
            .steps
            .iter()
            .find(|step| !step.duration.is_finite() || step.duration < 0.0)
        {
            anyhow::bail!(
                "scripted step duration must be finite and non-negative, got {}",
                step.duration
            );
        }
        Ok(Self {
            steps: file.steps,
            index: 0,
            time_in_step: 0.0,
            finished: false,
        })
    }

    /// Input for the frame after `dt` more seconds. The last step holds once
    /// the script runs out.
    pub fn advance(&mut self, dt: f32) -> InputFrame {
        if self.steps.is_empty() {
            return InputFrame::neutral();
        }

        self.time_in_step += dt.max(0.0);
        while self.index < self.steps.len() && self.time_in_step >= self.steps[self.index].duration
        {
            self.time_in_step -= self.steps[self.index].duration;
            if self.index + 1 < self.steps.len() {
                self.index += 1;
            } else {
                self.time_in_step = 0.0;
                self.finished = true;
                break;
            }
        }

        let step = self.steps.get(self.index).copied().unwrap_or_default();
        step.input.sanitized()
    }

    /// Whether playback has reached the end of the last step.
    pub fn finished(&self) -> bool {
        self.finished
    }
}
