use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;
use trailcam_camera::CameraConfig;
use trailcam_core::ParameterAnimator;
use trailcam_locomotion::LocomotionConfig;
use trailcam_physics::{Aabb, StaticScene};
use trailcam_sim::SimConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/trailcam.toml";

/// Everything needed to assemble a simulation, loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RigConfig {
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
    pub sim: SimConfig,
    pub animator: AnimatorConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimatorConfig {
    /// `Speed` above which the base layer counts as locomotion.
    pub locomotion_speed_threshold: f32,
    /// Number of animation layers; a second layer is switched on at startup.
    pub layers: usize,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            locomotion_speed_threshold: 0.1,
            layers: 2,
        }
    }
}

impl AnimatorConfig {
    pub fn build(&self) -> ParameterAnimator {
        ParameterAnimator::new()
            .with_layers(self.layers)
            .with_locomotion_threshold(self.locomotion_speed_threshold)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    pub obstacles: Vec<ObstacleConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ObstacleConfig {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl SceneConfig {
    pub fn build(&self) -> StaticScene {
        StaticScene::from_boxes(
            self.obstacles
                .iter()
                .filter(|obstacle| {
                    let finite = obstacle.center.is_finite() && obstacle.half_extents.is_finite();
                    if !finite {
                        warn!(?obstacle, "skipping obstacle with non-finite extents");
                    }
                    finite
                })
                .map(|obstacle| {
                    Aabb::from_center_half_extents(obstacle.center, obstacle.half_extents)
                })
                .collect(),
        )
    }
}

impl RigConfig {
    /// Load rig configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<RigConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    RigConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Rig config not found at {}. Using defaults", path.display());
                }
                RigConfig::default()
            }
        }
    }

    /// Save rig configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("trailcam-{name}-{nanos}.toml"))
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let cfg: RigConfig = toml::from_str(
            r#"
            [camera]
            distance_away = 5.0

            [sim]
            fixed_dt = 0.01
            "#,
        )
        .expect("valid toml");
        assert_eq!(cfg.camera.distance_away, 5.0);
        assert_eq!(cfg.camera.distance_up, CameraConfig::default().distance_up);
        assert_eq!(cfg.sim.fixed_dt, 0.01);
        assert_eq!(cfg.sim.max_fixed_steps, 8);
        assert_eq!(cfg.locomotion, LocomotionConfig::default());
    }

    #[test]
    fn obstacles_become_scene_boxes() {
        let cfg: RigConfig = toml::from_str(
            r#"
            [[scene.obstacles]]
            center = [0.0, 1.0, -2.0]
            half_extents = [4.0, 1.0, 0.25]
            "#,
        )
        .expect("valid toml");
        let scene = cfg.scene.build();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.boxes()[0].min, Vec3::new(-4.0, 0.0, -2.25));
        assert_eq!(scene.boxes()[0].max, Vec3::new(4.0, 2.0, -1.75));
    }

    #[test]
    fn non_finite_obstacles_are_skipped() {
        let scene = SceneConfig {
            obstacles: vec![
                ObstacleConfig {
                    center: Vec3::new(f32::NAN, 1.0, -2.0),
                    half_extents: Vec3::ONE,
                },
                ObstacleConfig {
                    center: Vec3::ZERO,
                    half_extents: Vec3::new(1.0, f32::INFINITY, 1.0),
                },
                ObstacleConfig {
                    center: Vec3::new(0.0, 1.0, -2.0),
                    half_extents: Vec3::new(1.0, 1.0, 0.5),
                },
            ],
        }
        .build();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.boxes()[0].min, Vec3::new(-1.0, 0.0, -2.5));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = temp_path("save");
        let mut cfg = RigConfig::default();
        cfg.locomotion.rotation_degrees_per_second = 90.0;
        cfg.animator.layers = 3;
        cfg.save_to_path(&path).expect("save");

        let loaded = RigConfig::load_from_path(&path);
        assert_eq!(loaded, cfg);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unreadable_or_invalid_files_fall_back_to_defaults() {
        let missing = temp_path("missing");
        assert_eq!(RigConfig::load_from_path(&missing), RigConfig::default());

        let broken = temp_path("broken");
        fs::write(&broken, "[camera\ndistance_away = ").expect("write");
        assert_eq!(RigConfig::load_from_path(&broken), RigConfig::default());
        let _ = fs::remove_file(&broken);
    }

    #[test]
    fn animator_config_sets_layers_and_threshold() {
        let animator = AnimatorConfig {
            locomotion_speed_threshold: 0.3,
            layers: 2,
        }
        .build();
        assert_eq!(animator.layer_weight(1), Some(0.0));
        assert_eq!(animator.layer_weight(2), None);
    }
}
