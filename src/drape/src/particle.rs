use crate::V3;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub pos: V3,
	pub ppos: V3,
	pub vel: V3,
	pub imass: f32,
}

impl Particle {
	pub fn new(pos: V3) -> Self {
		Self {
			pos,
			ppos: pos,
			vel: V3::zeros(),
			imass: 1.0,
		}
	}

	pub fn get_pos(&self) -> V3 {
		self.pos
	}

	pub fn add_pos(&mut self, dp: V3) {
		self.pos += dp
	}

	pub fn get_imass(&self) -> f32 {
		self.imass
	}

	// semi-implicit euler
	pub fn integrate(&mut self, gravity: V3, h: f32) {
		self.ppos = self.pos;
		self.vel += gravity * h;
		self.pos += self.vel * h;
	}

	pub fn update_velocity(&mut self, h: f32, damping: f32) {
		self.vel = (self.pos - self.ppos) / h * damping;
	}

	pub fn is_sane(&self, bound: f32) -> bool {
		crate::is_finite(&self.pos)
			&& crate::is_finite(&self.vel)
			&& self.pos.magnitude() <= bound
	}

	pub fn reset(&mut self) {
		self.pos = V3::zeros();
		self.ppos = V3::zeros();
		self.vel = V3::zeros();
	}
}

#[derive(Clone, Debug, Default)]
pub struct ParticleState {
	particles: Vec<Particle>,
}

impl ParticleState {
	/// Non-finite rest positions start at the origin.
	pub fn from_positions(positions: &[V3]) -> Self {
		let particles = positions
			.iter()
			.map(|p| {
				if crate::is_finite(p) {
					Particle::new(*p)
				} else {
					log::warn!("non-finite rest position {:?}, using origin", p);
					Particle::new(V3::zeros())
				}
			})
			.collect();
		Self { particles }
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn as_slice(&self) -> &[Particle] {
		&self.particles
	}

	pub fn as_mut_slice(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	pub fn positions(&self) -> Vec<V3> {
		self.particles.iter().map(|p| p.pos).collect()
	}

	#[cfg(not(debug_assertions))]
	pub fn integrate(&mut self, gravity: V3, h: f32) {
		use rayon::prelude::*;
		self.particles
			.par_iter_mut()
			.for_each(|p| p.integrate(gravity, h));
	}

	#[cfg(debug_assertions)]
	pub fn integrate(&mut self, gravity: V3, h: f32) {
		self.particles
			.iter_mut()
			.for_each(|p| p.integrate(gravity, h));
	}

	#[cfg(not(debug_assertions))]
	pub fn update_velocities(&mut self, h: f32, damping: f32) {
		use rayon::prelude::*;
		self.particles
			.par_iter_mut()
			.for_each(|p| p.update_velocity(h, damping));
	}

	#[cfg(debug_assertions)]
	pub fn update_velocities(&mut self, h: f32, damping: f32) {
		self.particles
			.iter_mut()
			.for_each(|p| p.update_velocity(h, damping));
	}

	/// Resets every particle failing the sanity check, returns their indices.
	pub fn recover(&mut self, bound: f32) -> Vec<usize> {
		let mut corrupted = Vec::new();
		for (id, p) in self.particles.iter_mut().enumerate() {
			if !p.is_sane(bound) {
				log::error!(
					"invalid particle {} at {:?}, resetting to origin",
					id,
					p.pos
				);
				p.reset();
				corrupted.push(id);
			}
		}
		corrupted
	}
}

impl std::ops::Index<usize> for ParticleState {
	type Output = Particle;
	fn index(&self, idx: usize) -> &Self::Output {
		&self.particles[idx]
	}
}

impl std::ops::IndexMut<usize> for ParticleState {
	fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
		&mut self.particles[idx]
	}
}
