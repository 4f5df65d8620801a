// mesh: renderable garment surface, replaced once per tick

use serde::{Deserialize, Serialize};

use crate::V3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
	pub min: V3,
	pub max: V3,
}

impl Default for Bounds {
	fn default() -> Self {
		Self::new(V3::zeros(), V3::zeros())
	}
}

impl Bounds {
	pub fn new(min: V3, max: V3) -> Self {
		Self { min, max }
	}

	/// Empty input gives a zero-sized box at the origin.
	pub fn from_points(points: &[V3]) -> Self {
		let mut iter = points.iter();
		let first = match iter.next() {
			Some(p) => *p,
			None => return Self::default(),
		};
		let (min, max) = iter.fold((first, first), |(min, max), p| {
			(min.inf(p), max.sup(p))
		});
		Self { min, max }
	}

	pub fn center(&self) -> V3 {
		(self.min + self.max) * 0.5
	}

	pub fn contains(&self, p: V3) -> bool {
		(0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
	pub vertices: Vec<V3>,
	pub normals: Vec<V3>,
	pub triangles: Vec<u32>,
	pub bounds: Bounds,
}

impl RenderMesh {
	pub fn vertex_count(&self) -> usize {
		self.vertices.len()
	}

	pub fn triangle_count(&self) -> usize {
		self.triangles.len() / 3
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_bounds_from_points() {
		let b = Bounds::from_points(&[
			V3::new(1., -2., 0.5),
			V3::new(-1., 3., 0.),
			V3::new(0., 0., 2.),
		]);
		assert_eq!(b.min, V3::new(-1., -2., 0.));
		assert_eq!(b.max, V3::new(1., 3., 2.));
		assert_eq!(b.center(), V3::new(0., 0.5, 1.));
		assert!(b.contains(V3::new(0., 0., 1.)));
		assert!(!b.contains(V3::new(0., 4., 1.)));
	}

	#[test]
	fn test_bounds_empty() {
		assert_eq!(Bounds::from_points(&[]), Bounds::default());
	}
}
