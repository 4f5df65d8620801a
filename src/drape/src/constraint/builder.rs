use fnv::{FnvHashMap, FnvHashSet};

use super::{Adjacency, DistanceConstraint, DistanceConstraintType};
use crate::error::{DrapeError, Result};
use crate::V3;

type EdgeKey = (usize, usize);

fn edge_key(i: usize, j: usize) -> EdgeKey {
	if i < j {
		(i, j)
	} else {
		(j, i)
	}
}

/// Constraint set and neighbour table derived from the rest pose.
#[derive(Clone, Debug, Default)]
pub struct ClothTopology {
	pub constraints: Vec<DistanceConstraint>,
	pub adjacency: Adjacency,
}

impl ClothTopology {
	pub fn structural_count(&self) -> usize {
		self.constraints.iter().filter(|c| !c.is_bending()).count()
	}

	pub fn bending_count(&self) -> usize {
		self.constraints.iter().filter(|c| c.is_bending()).count()
	}
}

pub struct ConstraintBuilder<'a> {
	positions: &'a [V3],
	triangles: &'a [u32],
	edge_set: FnvHashSet<EdgeKey>,
	edges: Vec<EdgeKey>,
	constraints: Vec<DistanceConstraint>,
}

impl<'a> ConstraintBuilder<'a> {
	pub fn new(positions: &'a [V3], triangles: &'a [u32]) -> Self {
		Self {
			positions,
			triangles,
			edge_set: Default::default(),
			edges: Vec::new(),
			constraints: Vec::new(),
		}
	}

	fn check_triangles(&self) -> Result<()> {
		if self.triangles.len() % 3 != 0 {
			return Err(DrapeError::RaggedTriangles(self.triangles.len()));
		}
		let count = self.positions.len();
		for &index in self.triangles.iter() {
			if index as usize >= count {
				return Err(DrapeError::TriangleIndexOutOfRange {
					index: index as usize,
					count,
				});
			}
		}
		Ok(())
	}

	fn rest_length(&self, i: usize, j: usize) -> f32 {
		(self.positions[i] - self.positions[j]).magnitude()
	}

	fn add_edge(&mut self, i: usize, j: usize) {
		if i == j {
			return;
		}
		if !self.edge_set.insert(edge_key(i, j)) {
			return;
		}
		let l0 = self.rest_length(i, j);
		self.constraints
			.push(DistanceConstraint::new_with_l0(i, j, l0));
		self.edges.push((i, j));
	}

	fn add_bending(&mut self) {
		// opposite vertices per undirected edge, keys in first-seen order
		let mut shared: FnvHashMap<EdgeKey, Vec<usize>> = Default::default();
		let mut order: Vec<EdgeKey> = Vec::new();
		for tri in self.triangles.chunks_exact(3) {
			let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
			for (u, v, w) in [(a, b, c), (b, c, a), (c, a, b)] {
				if u == v {
					continue;
				}
				let key = edge_key(u, v);
				shared
					.entry(key)
					.or_insert_with(|| {
						order.push(key);
						Vec::new()
					})
					.push(w);
			}
		}
		for key in order.iter() {
			let opp = &shared[key];
			if opp.len() != 2 {
				continue;
			}
			let (v0, v1) = (opp[0], opp[1]);
			if v0 == v1 {
				continue;
			}
			if !self.edge_set.insert(edge_key(v0, v1)) {
				continue;
			}
			let l0 = self.rest_length(v0, v1);
			self.constraints.push(
				DistanceConstraint::new_with_l0(v0, v1, l0)
					.with_ty(DistanceConstraintType::Bending),
			);
		}
	}

	pub fn build(mut self) -> Result<ClothTopology> {
		self.check_triangles()?;
		let tris: Vec<[usize; 3]> = self
			.triangles
			.chunks_exact(3)
			.map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
			.collect();
		for [a, b, c] in tris.into_iter() {
			self.add_edge(a, b);
			self.add_edge(b, c);
			self.add_edge(c, a);
		}
		self.add_bending();
		let adjacency = Adjacency::from_edges(self.positions.len(), &self.edges);
		let topology = ClothTopology {
			constraints: self.constraints,
			adjacency,
		};
		log::debug!(
			"built {} structural and {} bending constraints for {} vertices",
			topology.structural_count(),
			topology.bending_count(),
			self.positions.len(),
		);
		Ok(topology)
	}
}
