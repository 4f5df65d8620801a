use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeModel {
	// tick as fast as possible, simulated time still advances by the fixed step
	VideoRender,
	// sleep so one tick takes at least the fixed step of wall time
	RtFrameLock,
}

/// Paces the simulation thread; always hands out the fixed step.
pub struct TimeManager {
	step: Duration,
	model: TimeModel,
	last: Instant,
	// wall time of the previous tick as a fraction of the step
	load: f32,
}

impl TimeManager {
	pub fn new(step: f32, model: TimeModel) -> Self {
		Self {
			step: Duration::from_secs_f32(step.max(0.0)),
			model,
			last: Instant::now(),
			load: 0.0,
		}
	}

	pub fn load(&self) -> f32 {
		self.load
	}

	/// Restarts the measurement, used after a pause.
	pub fn reset(&mut self) {
		self.last = Instant::now();
	}

	/// Waits out the rest of the step if the model asks for it, returns the
	/// simulated time to advance.
	pub fn take_time(&mut self) -> f32 {
		let busy = self.last.elapsed();
		if !self.step.is_zero() {
			self.load = busy.as_secs_f32() / self.step.as_secs_f32();
		}
		if self.model == TimeModel::RtFrameLock && busy < self.step {
			std::thread::sleep(self.step - busy);
		}
		self.last = Instant::now();
		self.step.as_secs_f32()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_video_render_does_not_sleep() {
		let mut tm = TimeManager::new(10.0, TimeModel::VideoRender);
		let start = Instant::now();
		assert_eq!(tm.take_time(), 10.0);
		assert!(start.elapsed() < Duration::from_secs(5));
		assert!(tm.load() < 1.0);
	}

	#[test]
	fn test_frame_lock_waits() {
		let mut tm = TimeManager::new(0.02, TimeModel::RtFrameLock);
		let start = Instant::now();
		tm.take_time();
		tm.take_time();
		assert!(start.elapsed() >= Duration::from_millis(39));
	}
}
