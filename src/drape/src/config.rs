//! Solver settings, loadable from YAML.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```yaml
//! substeps: 4
//! solver_iterations: 10
//! gravity: [0.0, -9.81, 0.0]
//! smoothing_strength: 0.5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DrapeError, Result};
use crate::V3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
	/// Fixed tick duration in seconds.
	pub time_step: f32,
	/// Integration + solve passes per tick.
	pub substeps: usize,
	/// Gauss-Seidel iterations per substep.
	pub solver_iterations: usize,
	pub gravity: V3,
	/// Velocity scale applied after each substep, in [0, 1].
	pub damping: f32,
	/// Follow weight for vertices past the end of a table injected with
	/// `with_follow_weights`; colour-derived tables always cover every vertex.
	pub skin_follow_weight: f32,
	pub skin_follow_stiffness: f32,
	/// Global scale on every per-vertex follow weight.
	pub skin_follow_global: f32,
	/// Sphere radius for collision queries.
	pub cloth_thickness: f32,
	/// Upper bound on any single corrective displacement.
	pub max_penetration_push: f32,
	/// Blend factor toward the neighbour mean, 0 disables smoothing.
	pub smoothing_strength: f32,
	/// Standoff from the driving surface along its normal.
	pub normal_offset: f32,
	/// Positions farther than this from the origin count as corrupt.
	pub sanity_bound: f32,
}

impl Default for ClothConfig {
	fn default() -> Self {
		Self {
			time_step: 0.02,
			substeps: 4,
			solver_iterations: 10,
			gravity: V3::new(0., -9.81, 0.),
			damping: 0.95,
			skin_follow_weight: 0.05,
			skin_follow_stiffness: 0.4,
			skin_follow_global: 0.651,
			cloth_thickness: 0.005,
			max_penetration_push: 0.04,
			smoothing_strength: 0.726,
			normal_offset: 0.012,
			sanity_bound: 1000.,
		}
	}
}

fn check_unit(name: &str, value: f32) -> Result<()> {
	if (0.0..=1.0).contains(&value) {
		Ok(())
	} else {
		Err(DrapeError::InvalidConfig(format!(
			"{} must be in [0, 1], got {}",
			name, value
		)))
	}
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
	if value >= 0.0 && value.is_finite() {
		Ok(())
	} else {
		Err(DrapeError::InvalidConfig(format!(
			"{} must be finite and >= 0, got {}",
			name, value
		)))
	}
}

impl ClothConfig {
	pub fn from_yaml_str(s: &str) -> Result<Self> {
		let config: Self = serde_yaml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}

	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let data = std::fs::read_to_string(path)?;
		Self::from_yaml_str(&data)
	}

	pub fn validate(&self) -> Result<()> {
		if !(self.time_step > 0.0 && self.time_step.is_finite()) {
			return Err(DrapeError::InvalidConfig(format!(
				"time_step must be positive, got {}",
				self.time_step
			)));
		}
		if self.substeps == 0 {
			return Err(DrapeError::InvalidConfig(
				"substeps must be at least 1".into(),
			));
		}
		if self.solver_iterations == 0 {
			return Err(DrapeError::InvalidConfig(
				"solver_iterations must be at least 1".into(),
			));
		}
		if !crate::is_finite(&self.gravity) {
			return Err(DrapeError::InvalidConfig(
				"gravity must be finite".into(),
			));
		}
		check_unit("damping", self.damping)?;
		check_unit("skin_follow_weight", self.skin_follow_weight)?;
		check_unit("skin_follow_global", self.skin_follow_global)?;
		check_unit("smoothing_strength", self.smoothing_strength)?;
		check_non_negative("skin_follow_stiffness", self.skin_follow_stiffness)?;
		check_non_negative("cloth_thickness", self.cloth_thickness)?;
		check_non_negative("max_penetration_push", self.max_penetration_push)?;
		check_non_negative("sanity_bound", self.sanity_bound)?;
		if !self.normal_offset.is_finite() {
			return Err(DrapeError::InvalidConfig(
				"normal_offset must be finite".into(),
			));
		}
		Ok(())
	}

	pub fn substep_time(&self) -> f32 {
		self.time_step / self.substeps as f32
	}

	pub fn with_time_step(mut self, time_step: f32) -> Self {
		self.time_step = time_step;
		self
	}

	pub fn with_substeps(mut self, substeps: usize) -> Self {
		self.substeps = substeps.max(1);
		self
	}

	pub fn with_iterations(mut self, iterations: usize) -> Self {
		self.solver_iterations = iterations.max(1);
		self
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_damping(mut self, damping: f32) -> Self {
		self.damping = damping;
		self
	}

	pub fn with_skin_follow(
		mut self,
		weight: f32,
		stiffness: f32,
		global: f32,
	) -> Self {
		self.skin_follow_weight = weight;
		self.skin_follow_stiffness = stiffness;
		self.skin_follow_global = global;
		self
	}

	pub fn with_collision(mut self, thickness: f32, max_push: f32) -> Self {
		self.cloth_thickness = thickness;
		self.max_penetration_push = max_push;
		self
	}

	pub fn with_smoothing(mut self, strength: f32) -> Self {
		self.smoothing_strength = strength;
		self
	}

	pub fn with_normal_offset(mut self, offset: f32) -> Self {
		self.normal_offset = offset;
		self
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		let config = ClothConfig::default();
		config.validate().unwrap();
		assert!((config.substep_time() - 0.005).abs() < 1e-9);
	}

	#[test]
	fn test_partial_yaml() {
		let config = ClothConfig::from_yaml_str(
			"substeps: 2\nsmoothing_strength: 0.0\ngravity: [0.0, -1.0, 0.0]\n",
		)
		.unwrap();
		assert_eq!(config.substeps, 2);
		assert_eq!(config.smoothing_strength, 0.0);
		assert_eq!(config.gravity, V3::new(0., -1., 0.));
		assert_eq!(config.solver_iterations, 10);
		assert_eq!(config.normal_offset, 0.012);
	}

	#[test]
	fn test_rejects_bad_values() {
		assert!(matches!(
			ClothConfig::from_yaml_str("substeps: 0"),
			Err(DrapeError::InvalidConfig(_))
		));
		assert!(matches!(
			ClothConfig::from_yaml_str("damping: 1.5"),
			Err(DrapeError::InvalidConfig(_))
		));
		assert!(matches!(
			ClothConfig::from_yaml_str("time_step: -0.01"),
			Err(DrapeError::InvalidConfig(_))
		));
		assert!(matches!(
			ClothConfig::from_yaml_str("substeps: [1, 2]"),
			Err(DrapeError::Yaml(_))
		));
	}

	#[test]
	fn test_missing_file() {
		assert!(matches!(
			ClothConfig::load("/nonexistent/drape.yaml"),
			Err(DrapeError::Io(_))
		));
	}
}
