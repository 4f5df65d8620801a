use protocol::mesh::{Bounds, RenderMesh};

use crate::particle::Particle;
use crate::V3;

/// Area-weighted vertex normals. Vertices on no triangle get a zero normal.
pub fn compute_normals(positions: &[V3], triangles: &[u32]) -> Vec<V3> {
	let mut normals = vec![V3::zeros(); positions.len()];
	accumulate_normals(positions, triangles, &mut normals);
	normals
}

fn accumulate_normals(positions: &[V3], triangles: &[u32], normals: &mut [V3]) {
	for n in normals.iter_mut() {
		*n = V3::zeros();
	}
	for tri in triangles.chunks_exact(3) {
		let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
		if a >= positions.len() || b >= positions.len() || c >= positions.len()
		{
			continue;
		}
		let face = (positions[b] - positions[a]).cross(&(positions[c] - positions[a]));
		if !crate::is_finite(&face) {
			continue;
		}
		normals[a] += face;
		normals[b] += face;
		normals[c] += face;
	}
	for n in normals.iter_mut() {
		*n = n.try_normalize(1e-12).unwrap_or_else(V3::zeros);
	}
}

#[derive(Clone, Debug)]
pub struct MeshWriter {
	triangles: Vec<u32>,
}

impl MeshWriter {
	pub fn new(triangles: Vec<u32>) -> Self {
		Self { triangles }
	}

	/// Fresh output mesh for the rest pose.
	pub fn create(&self, positions: &[V3]) -> RenderMesh {
		let mut mesh = RenderMesh {
			vertices: positions.to_vec(),
			normals: vec![V3::zeros(); positions.len()],
			triangles: self.triangles.clone(),
			bounds: Bounds::default(),
		};
		self.refresh(&mut mesh);
		mesh
	}

	/// Copies particle positions into the mesh, then recomputes normals and
	/// bounds.
	pub fn write(&self, mesh: &mut RenderMesh, particles: &[Particle]) {
		mesh.vertices.clear();
		mesh.vertices.extend(particles.iter().map(|p| p.pos));
		if mesh.triangles.len() != self.triangles.len() {
			mesh.triangles = self.triangles.clone();
		}
		self.refresh(mesh);
	}

	fn refresh(&self, mesh: &mut RenderMesh) {
		mesh.normals.resize(mesh.vertices.len(), V3::zeros());
		accumulate_normals(&mesh.vertices, &self.triangles, &mut mesh.normals);
		mesh.bounds = Bounds::from_points(&mesh.vertices);
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_quad_normals() {
		let ps = vec![
			V3::new(0., 0., 0.),
			V3::new(1., 0., 0.),
			V3::new(0., 1., 0.),
			V3::new(1., 1., 0.),
			V3::new(9., 9., 9.),
		];
		let normals = compute_normals(&ps, &[0, 1, 2, 1, 3, 2]);
		for n in normals[..4].iter() {
			assert!((n - V3::z()).magnitude() < 1e-6);
		}
		assert_eq!(normals[4], V3::zeros());
	}

	#[test]
	fn test_area_weighting() {
		// a large triangle in xy and a small one in xz sharing vertex 0
		let ps = vec![
			V3::new(0., 0., 0.),
			V3::new(2., 0., 0.),
			V3::new(0., 2., 0.),
			V3::new(0., 0., 0.1),
			V3::new(-0.1, 0., 0.),
		];
		let normals = compute_normals(&ps, &[0, 1, 2, 0, 4, 3]);
		assert!(normals[0].z > 0.99);
		assert!(normals[0].y > 0.0);
	}

	#[test]
	fn test_write_updates_bounds() {
		let ps = vec![V3::new(0., 0., 0.), V3::new(1., 0., 0.), V3::new(0., 1., 0.)];
		let writer = MeshWriter::new(vec![0, 1, 2]);
		let mut mesh = writer.create(&ps);
		assert_eq!(mesh.bounds.max, V3::new(1., 1., 0.));
		let mut particles: Vec<Particle> = ps.iter().map(|&p| Particle::new(p)).collect();
		particles[1].pos = V3::new(3., -1., 0.5);
		writer.write(&mut mesh, &particles);
		assert_eq!(mesh.vertices[1], V3::new(3., -1., 0.5));
		assert_eq!(mesh.bounds.min, V3::new(0., -1., 0.));
		assert_eq!(mesh.bounds.max, V3::new(3., 1., 0.5));
		assert_eq!(mesh.triangle_count(), 1);
		assert_eq!(mesh.normals.len(), 3);
	}
}
