// src/config.rs
//! Scene configuration, loadable from JSON.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actors::Material;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub gravity: Vec3,
    /// Fixed step used by the demo loop (seconds).
    pub timestep: f32,
    /// Larger step requests are clamped to this to keep the solver stable.
    pub max_timestep: f32,
    /// Solver substeps per step; each gets `dt / substeps`.
    pub substeps: u32,
    /// Number of frames the demo binary simulates.
    pub frames: u32,
    pub default_material: Material,
    /// Optional trampoline added next to the trebuchet.
    pub trampoline: Option<TrampolineConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
            max_timestep: 1.0 / 15.0,
            substeps: 1,
            frames: 600,
            default_material: Material::default(),
            trampoline: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrampolineConfig {
    /// Half-width, height and half-depth.
    pub dimensions: Vec3,
    pub stiffness: f32,
    pub damping: f32,
    pub position: Vec3,
}

impl Default for TrampolineConfig {
    fn default() -> Self {
        Self {
            dimensions: Vec3::ONE,
            stiffness: 1.0,
            damping: 1.0,
            position: Vec3::ZERO,
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).context(format!("reading {}", path.display())))?;
        Self::from_json_str(&text).map_err(|e| e.context(format!("parsing {}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        let non_negative = |v: f32| v.is_finite() && v >= 0.0;

        if !positive(self.timestep) || !positive(self.max_timestep) {
            return Err(Error::custom("timestep and max_timestep must be positive"));
        }
        if self.substeps == 0 {
            return Err(Error::custom("substeps must be at least 1"));
        }
        if let Some(t) = &self.trampoline {
            if !t.dimensions.is_finite() || t.dimensions.min_element() <= 0.0 {
                return Err(Error::custom("trampoline dimensions must be positive"));
            }
            if !non_negative(t.stiffness) || !non_negative(t.damping) {
                return Err(Error::custom(
                    "trampoline stiffness and damping must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }

    /// Clamp a requested step to `[0, max_timestep]`.
    #[inline]
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        dt.max(0.0).min(self.max_timestep)
    }
}
