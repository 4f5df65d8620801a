use crate::skin_follow::FollowWeights;
use crate::V3;

/// Rest pose of a garment: vertices, triangle list, optional red channel.
#[derive(Clone, Debug, Default)]
pub struct GarmentModel {
	pub positions: Vec<V3>,
	pub triangles: Vec<u32>,
	pub colors: Option<Vec<f32>>,
}

impl GarmentModel {
	pub fn new(positions: Vec<V3>, triangles: Vec<u32>) -> Self {
		Self {
			positions,
			triangles,
			colors: None,
		}
	}

	pub fn with_colors(mut self, red: Vec<f32>) -> Self {
		self.colors = Some(red);
		self
	}

	/// Colours each vertex with `f(position)`.
	pub fn with_follow_colors<F: Fn(&V3) -> f32>(mut self, f: F) -> Self {
		self.colors = Some(self.positions.iter().map(f).collect());
		self
	}

	pub fn follow_weights(&self) -> FollowWeights {
		FollowWeights::from_colors(self.colors.as_deref(), self.positions.len())
	}

	pub fn vertex_count(&self) -> usize {
		self.positions.len()
	}

	pub fn triangle_count(&self) -> usize {
		self.triangles.len() / 3
	}

	/// Flat sheet in the xz plane with `x * z` vertices `size` apart.
	#[allow(clippy::needless_range_loop)]
	pub fn new_grid(x: usize, z: usize, size: f32, origin: V3) -> Self {
		let mut positions = Vec::with_capacity(x * z);
		for idx in 0..x {
			for idz in 0..z {
				positions.push(
					origin + V3::new(size * idx as f32, 0., size * idz as f32),
				);
			}
		}
		let id = |idx: usize, idz: usize| (idx * z + idz) as u32;
		let mut triangles = Vec::new();
		for idx in 1..x {
			for idz in 1..z {
				triangles.extend_from_slice(&[
					id(idx - 1, idz - 1),
					id(idx - 1, idz),
					id(idx, idz - 1),
				]);
				triangles.extend_from_slice(&[
					id(idx, idz - 1),
					id(idx - 1, idz),
					id(idx, idz),
				]);
			}
		}
		Self::new(positions, triangles)
	}

	/// Open cylinder around the y axis hanging down from `top`, `rings`
	/// circles of `segments` vertices; faces point outward.
	pub fn new_tube(
		radius: f32,
		height: f32,
		segments: usize,
		rings: usize,
		top: V3,
	) -> Self {
		let segments = segments.max(3);
		let rings = rings.max(2);
		let mut positions = Vec::with_capacity(segments * rings);
		for ring in 0..rings {
			let y = -height * ring as f32 / (rings - 1) as f32;
			for seg in 0..segments {
				let a = std::f32::consts::TAU * seg as f32 / segments as f32;
				positions.push(top + V3::new(radius * a.cos(), y, radius * a.sin()));
			}
		}
		let id = |ring: usize, seg: usize| (ring * segments + seg % segments) as u32;
		let mut triangles = Vec::new();
		for ring in 1..rings {
			for seg in 0..segments {
				let (a, b) = (id(ring - 1, seg), id(ring - 1, seg + 1));
				let (c, d) = (id(ring, seg), id(ring, seg + 1));
				triangles.extend_from_slice(&[a, b, c, b, d, c]);
			}
		}
		Self::new(positions, triangles)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::mesh_writer::compute_normals;

	#[test]
	fn test_grid() {
		let g = GarmentModel::new_grid(3, 2, 0.5, V3::new(0., 1., 0.));
		assert_eq!(g.vertex_count(), 6);
		assert_eq!(g.triangle_count(), 4);
		assert_eq!(g.positions[5], V3::new(1.0, 1., 0.5));
		assert!(g.triangles.iter().all(|&i| (i as usize) < 6));
		// faces point up
		let normals = compute_normals(&g.positions, &g.triangles);
		assert!(normals.iter().all(|n| n.y > 0.99));
	}

	#[test]
	fn test_tube_normals_face_out() {
		let g = GarmentModel::new_tube(1.0, 2.0, 8, 3, V3::zeros());
		assert_eq!(g.vertex_count(), 24);
		assert_eq!(g.triangle_count(), 32);
		assert_eq!(g.positions[8].y, -1.0);
		let normals = compute_normals(&g.positions, &g.triangles);
		for (p, n) in g.positions.iter().zip(normals.iter()) {
			let radial = V3::new(p.x, 0., p.z);
			assert!(n.dot(&radial) > 0.5);
		}
	}

	#[test]
	fn test_follow_colors() {
		let g = GarmentModel::new_tube(1.0, 1.0, 4, 2, V3::zeros())
			.with_follow_colors(|p| 1.0 + p.y);
		let w = g.follow_weights();
		assert_eq!(w.get(0, 0.0), 1.0);
		assert_eq!(w.get(7, 0.5), 0.0);
		let bare = GarmentModel::new_grid(2, 2, 1.0, V3::zeros());
		assert_eq!(bare.follow_weights().get(3, 0.0), 1.0);
	}

	#[test]
	fn test_short_colors_follow_fully() {
		let fallback = crate::config::ClothConfig::default().skin_follow_weight;
		let g = GarmentModel::new_grid(2, 2, 1.0, V3::zeros()).with_colors(vec![0.0, 0.0]);
		let w = g.follow_weights();
		assert_eq!(w.len(), 4);
		assert_eq!(w.get(1, fallback), 0.0);
		assert_eq!(w.get(2, fallback), 1.0);
		assert_eq!(w.get(3, fallback), 1.0);
	}
}
