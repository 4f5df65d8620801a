/// Vertex neighbour lists packed into one arena.
///
/// `neighbors[offsets[i]..offsets[i + 1]]` are the vertices sharing a mesh
/// edge with `i`, in the order the edges were first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Adjacency {
	offsets: Vec<usize>,
	neighbors: Vec<usize>,
}

impl Adjacency {
	/// Each undirected edge is registered both ways.
	pub fn from_edges(vertex_count: usize, edges: &[(usize, usize)]) -> Self {
		let mut degree = vec![0usize; vertex_count];
		for &(i, j) in edges.iter() {
			degree[i] += 1;
			degree[j] += 1;
		}
		let mut offsets = Vec::with_capacity(vertex_count + 1);
		offsets.push(0);
		for d in degree.iter() {
			let last = offsets[offsets.len() - 1];
			offsets.push(last + d);
		}
		let mut cursor = offsets.clone();
		let mut neighbors = vec![0usize; edges.len() * 2];
		for &(i, j) in edges.iter() {
			neighbors[cursor[i]] = j;
			cursor[i] += 1;
			neighbors[cursor[j]] = i;
			cursor[j] += 1;
		}
		Self { offsets, neighbors }
	}

	pub fn vertex_count(&self) -> usize {
		self.offsets.len().saturating_sub(1)
	}

	pub fn neighbors(&self, i: usize) -> &[usize] {
		&self.neighbors[self.offsets[i]..self.offsets[i + 1]]
	}

	/// Total number of (directed) entries.
	pub fn len(&self) -> usize {
		self.neighbors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.neighbors.is_empty()
	}

	pub fn is_symmetric(&self) -> bool {
		(0..self.vertex_count()).all(|i| {
			self.neighbors(i)
				.iter()
				.all(|&j| self.neighbors(j).contains(&i))
		})
	}
}
