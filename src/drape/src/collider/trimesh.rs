use super::cell_grid::CellGrid;
use super::capsule::closest_on_segment;
use super::{Collider, Penetration};
use crate::error::{DrapeError, Result};
use crate::V3;

fn closest_on_triangle(p: V3, a: V3, b: V3, c: V3) -> V3 {
	let ab = b - a;
	let ac = c - a;
	let ap = p - a;
	let d1 = ab.dot(&ap);
	let d2 = ac.dot(&ap);
	if d1 <= 0.0 && d2 <= 0.0 {
		return a;
	}
	let bp = p - b;
	let d3 = ab.dot(&bp);
	let d4 = ac.dot(&bp);
	if d3 >= 0.0 && d4 <= d3 {
		return b;
	}
	let vc = d1 * d4 - d3 * d2;
	if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
		return a + ab * (d1 / (d1 - d3));
	}
	let cp = p - c;
	let d5 = ab.dot(&cp);
	let d6 = ac.dot(&cp);
	if d6 >= 0.0 && d5 <= d6 {
		return c;
	}
	let vb = d5 * d2 - d1 * d6;
	if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
		return a + ac * (d2 / (d2 - d6));
	}
	let va = d3 * d6 - d5 * d4;
	if va <= 0.0 && d4 - d3 >= 0.0 && d5 - d6 >= 0.0 {
		return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
	}
	let sum = va + vb + vc;
	if sum.abs() <= f32::EPSILON {
		// sliver, fall back to the closest edge
		return [(a, b), (b, c), (c, a)]
			.iter()
			.map(|&(s, e)| closest_on_segment(p, s, e))
			.min_by(|x, y| {
				(p - x)
					.magnitude_squared()
					.total_cmp(&(p - y).magnitude_squared())
			})
			.unwrap_or(a);
	}
	a + ab * (vb / sum) + ac * (vc / sum)
}

/// Thin triangle shell, e.g. a baked body surface.
///
/// The shell is two-sided: a query sphere overlapping any triangle is pushed away
/// from the closest surface point, through the face normal (ccw) when the
/// query center lies on the surface.
#[derive(Clone, Debug)]
pub struct MeshCollider {
	vertices: Vec<V3>,
	triangles: Vec<[usize; 3]>,
	grid: CellGrid,
}

impl MeshCollider {
	pub fn new(vertices: Vec<V3>, triangles: &[u32], csize: f32) -> Result<Self> {
		if triangles.len() % 3 != 0 {
			return Err(DrapeError::RaggedTriangles(triangles.len()));
		}
		let count = vertices.len();
		if let Some(&index) = triangles.iter().find(|&&i| i as usize >= count) {
			return Err(DrapeError::TriangleIndexOutOfRange {
				index: index as usize,
				count,
			});
		}
		let triangles = triangles
			.chunks_exact(3)
			.map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
			.collect();
		let mut result = Self {
			vertices,
			triangles,
			grid: CellGrid::new(csize),
		};
		result.rebuild_grid();
		Ok(result)
	}

	/// Re-bakes the shell from a deformed pose with the same topology.
	pub fn update_vertices(&mut self, vertices: &[V3]) -> Result<()> {
		if vertices.len() != self.vertices.len() {
			return Err(DrapeError::SurfaceMismatch {
				expected: self.vertices.len(),
				found: vertices.len(),
			});
		}
		self.vertices.copy_from_slice(vertices);
		self.rebuild_grid();
		Ok(())
	}

	pub fn vertices(&self) -> &[V3] {
		&self.vertices
	}

	fn corners(&self, id: usize) -> [V3; 3] {
		let [a, b, c] = self.triangles[id];
		[self.vertices[a], self.vertices[b], self.vertices[c]]
	}

	fn rebuild_grid(&mut self) {
		self.grid.clear();
		for id in 0..self.triangles.len() {
			let [a, b, c] = self.corners(id);
			if !(crate::is_finite(&a) && crate::is_finite(&b) && crate::is_finite(&c)) {
				log::warn!("mesh collider: skipping non-finite triangle {}", id);
				continue;
			}
			self.grid.insert_aabb(id, a.inf(&b).inf(&c), a.sup(&b).sup(&c));
		}
	}
}

impl Collider for MeshCollider {
	fn penetration(&self, center: V3, radius: f32) -> Option<Penetration> {
		if !crate::is_finite(&center) || !radius.is_finite() {
			return None;
		}
		let r = V3::repeat(radius);
		let mut candidates = Vec::new();
		self.grid.query_aabb(center - r, center + r, &mut candidates);

		let mut best: Option<Penetration> = None;
		for id in candidates.into_iter() {
			let [a, b, c] = self.corners(id);
			let q = closest_on_triangle(center, a, b, c);
			let offset = center - q;
			let dist = offset.magnitude();
			let overlap = radius - dist;
			if !(overlap > 0.0) {
				continue;
			}
			if best.map_or(false, |p| p.depth >= overlap) {
				continue;
			}
			let direction = if dist > 1e-9 {
				offset / dist
			} else {
				(b - a).cross(&(c - a)).try_normalize(1e-12).unwrap_or_else(V3::y)
			};
			best = Some(Penetration {
				direction,
				depth: overlap,
			});
		}
		best
	}

	fn name(&self) -> &str {
		"mesh"
	}
}
