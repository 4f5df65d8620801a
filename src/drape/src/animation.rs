//! Keyframed swing driven by an external clock.
//!
//! A cycle is a ring of key angles. Segment `i` eases linearly from key `i`
//! to key `i + 1` (wrapping), then the cycle holds for `pause` seconds before
//! the next segment starts. Nothing moves until `start_delay` has elapsed.

use nalgebra::{Unit, UnitQuaternion};

use crate::V3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SwingPhase {
	Delay,
	Moving { segment: usize },
	Paused { next: usize },
}

#[derive(Clone, Debug)]
struct SwingKey {
	// degrees
	angle: f32,
	// seconds to reach the next key
	duration: f32,
}

#[derive(Clone, Debug)]
pub struct SwingCycle {
	axis: Unit<V3>,
	keys: Vec<SwingKey>,
	pause: f32,
	start_delay: f32,
	phase: SwingPhase,
	elapsed: f32,
	angle: f32,
}

impl SwingCycle {
	/// A zero axis falls back to +X.
	pub fn new(axis: V3) -> Self {
		let axis = Unit::try_new(axis, 1e-12).unwrap_or_else(V3::x_axis);
		Self {
			axis,
			keys: Vec::new(),
			pause: 0.0,
			start_delay: 0.0,
			phase: SwingPhase::Delay,
			elapsed: 0.0,
			angle: 0.0,
		}
	}

	/// neutral -> forward -> backward -> neutral, the hip swing of a walk
	pub fn leg_swing(axis: V3, amplitude: f32) -> Self {
		Self::new(axis)
			.with_key(0.0, 1.0)
			.with_key(amplitude, 1.0)
			.with_key(-amplitude, 2.0)
			.with_pause(1.5)
			.with_start_delay(0.5)
	}

	pub fn with_key(mut self, angle_deg: f32, duration: f32) -> Self {
		self.keys.push(SwingKey {
			angle: angle_deg,
			duration,
		});
		if self.keys.len() == 1 {
			self.angle = angle_deg;
		}
		self
	}

	pub fn with_pause(mut self, pause: f32) -> Self {
		self.pause = pause.max(0.0);
		self
	}

	pub fn with_start_delay(mut self, delay: f32) -> Self {
		self.start_delay = delay.max(0.0);
		self
	}

	pub fn phase(&self) -> SwingPhase {
		self.phase
	}

	/// Current angle in degrees.
	pub fn angle(&self) -> f32 {
		self.angle
	}

	pub fn rotation(&self) -> UnitQuaternion<f32> {
		UnitQuaternion::from_axis_angle(&self.axis, self.angle.to_radians())
	}

	fn move_segment(&mut self, segment: usize, dt: f32) {
		let n = self.keys.len();
		let from = &self.keys[segment];
		let to = &self.keys[(segment + 1) % n];
		self.elapsed += dt;
		let t = if from.duration > 0.0 {
			(self.elapsed / from.duration).clamp(0.0, 1.0)
		} else {
			1.0
		};
		self.angle = from.angle + (to.angle - from.angle) * t;
		if t >= 1.0 {
			self.elapsed = 0.0;
			self.phase = SwingPhase::Paused {
				next: (segment + 1) % n,
			};
		}
	}

	/// Advances by `dt` seconds, returns the new angle in degrees.
	pub fn advance(&mut self, dt: f32) -> f32 {
		if self.keys.len() < 2 || !(dt > 0.0) {
			return self.angle;
		}
		match self.phase {
			SwingPhase::Delay => {
				self.elapsed += dt;
				if self.elapsed >= self.start_delay {
					self.elapsed = 0.0;
					self.phase = SwingPhase::Moving { segment: 0 };
					self.move_segment(0, dt);
				}
			}
			SwingPhase::Moving { segment } => self.move_segment(segment, dt),
			SwingPhase::Paused { next } => {
				self.elapsed += dt;
				if self.elapsed >= self.pause {
					self.elapsed = 0.0;
					self.phase = SwingPhase::Moving { segment: next };
				}
			}
		}
		self.angle
	}
}
