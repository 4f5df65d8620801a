use dyn_clone::DynClone;

use crate::animation::SwingCycle;
use crate::mesh_writer::compute_normals;
use crate::V3;

/// Driving surface positions and normals in world space for one tick.
#[derive(Clone, Debug, Default)]
pub struct SurfaceSample {
	pub positions: Vec<V3>,
	pub normals: Vec<V3>,
}

impl SurfaceSample {
	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	/// Both arrays present and equally long.
	pub fn is_consistent(&self, n: usize) -> bool {
		self.positions.len() == n && self.normals.len() == n
	}
}

/// Bakes the animated body once per tick.
pub trait SurfaceSource: DynClone + Send + Sync {
	fn vertex_count(&self) -> usize;

	/// Overwrites `out`; called exactly once per tick.
	fn sample(&mut self, out: &mut SurfaceSample);
}

dyn_clone::clone_trait_object!(SurfaceSource);

pub type SurfaceSourceRef = Box<dyn SurfaceSource>;

#[derive(Clone, Debug)]
pub struct StaticSurface {
	positions: Vec<V3>,
	normals: Vec<V3>,
}

impl StaticSurface {
	pub fn new(positions: Vec<V3>, normals: Vec<V3>) -> Self {
		Self { positions, normals }
	}

	pub fn from_mesh(positions: Vec<V3>, triangles: &[u32]) -> Self {
		let normals = compute_normals(&positions, triangles);
		Self::new(positions, normals)
	}
}

impl SurfaceSource for StaticSurface {
	fn vertex_count(&self) -> usize {
		self.positions.len()
	}

	fn sample(&mut self, out: &mut SurfaceSample) {
		out.positions.clone_from(&self.positions);
		out.normals.clone_from(&self.normals);
	}
}

/// Rest mesh rigidly rotated about `pivot` by a swing cycle.
#[derive(Clone, Debug)]
pub struct AnimatedSurface {
	rest_positions: Vec<V3>,
	rest_normals: Vec<V3>,
	pivot: V3,
	cycle: SwingCycle,
	dt: f32,
}

impl AnimatedSurface {
	/// The cycle advances `dt` seconds per sample.
	pub fn new(
		rest_positions: Vec<V3>,
		triangles: &[u32],
		pivot: V3,
		cycle: SwingCycle,
		dt: f32,
	) -> Self {
		let rest_normals = compute_normals(&rest_positions, triangles);
		Self {
			rest_positions,
			rest_normals,
			pivot,
			cycle,
			dt,
		}
	}

	pub fn cycle(&self) -> &SwingCycle {
		&self.cycle
	}
}

impl SurfaceSource for AnimatedSurface {
	fn vertex_count(&self) -> usize {
		self.rest_positions.len()
	}

	fn sample(&mut self, out: &mut SurfaceSample) {
		self.cycle.advance(self.dt);
		let rot = self.cycle.rotation();
		let pivot = self.pivot;
		out.positions.clear();
		out.positions.extend(
			self.rest_positions
				.iter()
				.map(|p| pivot + rot * (p - pivot)),
		);
		out.normals.clear();
		out.normals
			.extend(self.rest_normals.iter().map(|n| rot * *n));
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_static_surface() {
		let mut s = StaticSurface::from_mesh(
			vec![V3::new(0., 0., 0.), V3::new(1., 0., 0.), V3::new(0., 1., 0.)],
			&[0, 1, 2],
		);
		let mut sample = SurfaceSample::default();
		s.sample(&mut sample);
		assert!(sample.is_consistent(3));
		assert_eq!(sample.positions[1], V3::new(1., 0., 0.));
		assert!((sample.normals[0] - V3::z()).magnitude() < 1e-6);
	}

	#[test]
	fn test_animated_surface_rotates_about_pivot() {
		let cycle = SwingCycle::new(V3::z())
			.with_key(0.0, 1.0)
			.with_key(90.0, 1.0);
		let mut s: SurfaceSourceRef = Box::new(AnimatedSurface::new(
			vec![V3::new(1., 1., 0.), V3::new(2., 1., 0.), V3::new(1., 2., 0.)],
			&[0, 1, 2],
			V3::new(1., 1., 0.),
			cycle,
			1.0,
		));
		let mut sample = SurfaceSample::default();
		s.sample(&mut sample);
		assert_eq!(s.vertex_count(), 3);
		// pivot stays, (1, 0, 0) arm turns to (0, 1, 0)
		assert!((sample.positions[0] - V3::new(1., 1., 0.)).magnitude() < 1e-6);
		assert!((sample.positions[1] - V3::new(1., 2., 0.)).magnitude() < 1e-6);
		// rotation about the face normal keeps the normal
		assert!((sample.normals[2] - V3::z()).magnitude() < 1e-6);

		// clones advance independently
		let mut t = s.clone();
		let mut other = SurfaceSample::default();
		t.sample(&mut other);
		s.sample(&mut sample);
		assert_eq!(sample.positions, other.positions);
	}
}
