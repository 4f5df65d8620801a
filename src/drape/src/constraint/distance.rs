use super::{EPS_IMASS, EPS_LENGTH};
use crate::particle::Particle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceConstraintType {
	Structural, // mesh edge
	Bending,    // across a shared edge
}
type DCTy = DistanceConstraintType;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceConstraint {
	pub a: usize,
	pub b: usize,
	pub l0: f32,
	pub ty: DCTy,
}

impl DistanceConstraint {
	pub fn new_with_l0(a: usize, b: usize, l0: f32) -> Self {
		debug_assert!(a != b);
		Self {
			a,
			b,
			l0,
			ty: DCTy::Structural,
		}
	}

	pub fn with_ty(mut self, ty: DCTy) -> Self {
		self.ty = ty;
		self
	}

	pub fn is_bending(&self) -> bool {
		self.ty == DCTy::Bending
	}

	/// Mass-weighted projection back to `l0`.
	/// Returns false if the pair was degenerate and left untouched.
	pub fn project(&self, particles: &mut [Particle]) -> bool {
		let pa = particles[self.a].get_pos();
		let pb = particles[self.b].get_pos();
		let imass_a = particles[self.a].get_imass();
		let imass_b = particles[self.b].get_imass();

		let dp = pb - pa;
		let l = dp.magnitude();
		if !l.is_finite() || l < EPS_LENGTH {
			return false;
		}
		let imass = imass_a + imass_b;
		if imass <= EPS_IMASS {
			return false;
		}
		let correct = dp / l * (l - self.l0);
		particles[self.a].add_pos(correct * (imass_a / imass));
		particles[self.b].add_pos(-correct * (imass_b / imass));
		true
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::V3;

	#[test]
	fn test_single_projection_restores_length() {
		let mut ps = vec![
			Particle::new(V3::new(0., 0., 0.)),
			Particle::new(V3::new(3., 4., 12.)),
		];
		let c = DistanceConstraint::new_with_l0(0, 1, 2.5);
		assert!(c.project(&mut ps));
		let l = (ps[1].pos - ps[0].pos).magnitude();
		assert!((l - 2.5).abs() < 1e-5, "{}", l);
	}

	#[test]
	fn test_unequal_masses() {
		let mut ps = vec![
			Particle::new(V3::new(0., 0., 0.)),
			Particle::new(V3::new(2., 0., 0.)),
		];
		ps[0].imass = 0.25;
		ps[1].imass = 0.75;
		let c = DistanceConstraint::new_with_l0(0, 1, 1.0);
		c.project(&mut ps);
		let l = (ps[1].pos - ps[0].pos).magnitude();
		assert!((l - 1.0).abs() < 1e-5);
		// lighter particle moves three times as far
		assert!((ps[0].pos.x - 0.25).abs() < 1e-6);
		assert!((ps[1].pos.x - 1.25).abs() < 1e-6);
	}

	#[test]
	fn test_degenerate_pairs_skipped() {
		let mut ps = vec![
			Particle::new(V3::new(1., 1., 1.)),
			Particle::new(V3::new(1., 1., 1.)),
		];
		let c = DistanceConstraint::new_with_l0(0, 1, 1.0);
		assert!(!c.project(&mut ps));
		assert_eq!(ps[0].pos, ps[1].pos);

		ps[1].pos = V3::new(3., 1., 1.);
		ps[0].imass = 0.0;
		ps[1].imass = 0.0;
		assert!(!c.project(&mut ps));
		assert_eq!(ps[1].pos, V3::new(3., 1., 1.));

		ps[0].imass = 1.0;
		ps[1].imass = 1.0;
		ps[1].pos = V3::new(f32::NAN, 0., 0.);
		assert!(!c.project(&mut ps));
		assert_eq!(ps[0].pos, V3::new(1., 1., 1.));
	}
}
