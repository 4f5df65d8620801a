use fnv::FnvHashMap;

use crate::{C3, V3};

// boxes spanning more cells than this skip the buckets
pub const MAX_CELLS: i64 = 4096;

/// Uniform hash grid over world space, buckets hold item ids.
#[derive(Clone, Debug)]
pub struct CellGrid {
	csize: f32,
	data: FnvHashMap<C3, Vec<usize>>,
	// too large to bucket, returned by every query
	overflow: Vec<usize>,
	ids: Vec<usize>,
}

impl Default for CellGrid {
	fn default() -> Self {
		Self::new(0.1)
	}
}

impl CellGrid {
	pub fn new(csize: f32) -> Self {
		Self {
			csize: csize.max(1e-4),
			data: FnvHashMap::default(),
			overflow: Vec::new(),
			ids: Vec::new(),
		}
	}

	pub fn clear(&mut self) {
		self.data.clear();
		self.overflow.clear();
		self.ids.clear();
	}

	fn get_cpos(&self, p: V3) -> C3 {
		C3::new(
			(p[0] / self.csize).floor() as i32,
			(p[1] / self.csize).floor() as i32,
			(p[2] / self.csize).floor() as i32,
		)
	}

	fn span(&self, min: V3, max: V3) -> i64 {
		let lo = self.get_cpos(min);
		let hi = self.get_cpos(max);
		(0..3)
			.map(|k| (hi[k] as i64 - lo[k] as i64 + 1).max(0))
			.fold(1i64, |acc, n| acc.saturating_mul(n))
	}

	fn cells(&self, min: V3, max: V3) -> impl Iterator<Item = C3> {
		let lo = self.get_cpos(min);
		let hi = self.get_cpos(max);
		(lo[0]..=hi[0]).flat_map(move |x| {
			(lo[1]..=hi[1])
				.flat_map(move |y| (lo[2]..=hi[2]).map(move |z| C3::new(x, y, z)))
		})
	}

	pub fn insert_aabb(&mut self, id: usize, min: V3, max: V3) {
		self.ids.push(id);
		if self.span(min, max) > MAX_CELLS {
			log::debug!("cell grid: item {} spans too many cells", id);
			self.overflow.push(id);
			return;
		}
		let cells: Vec<C3> = self.cells(min, max).collect();
		for cpos in cells.into_iter() {
			self.data.entry(cpos).or_insert_with(Vec::new).push(id);
		}
	}

	/// Ids whose boxes may overlap `[min, max]`, sorted and unique.
	pub fn query_aabb(&self, min: V3, max: V3, out: &mut Vec<usize>) {
		out.clear();
		if self.span(min, max) > MAX_CELLS {
			out.extend_from_slice(&self.ids);
		} else {
			out.extend_from_slice(&self.overflow);
			for cpos in self.cells(min, max) {
				if let Some(ids) = self.data.get(&cpos) {
					out.extend_from_slice(ids);
				}
			}
		}
		out.sort_unstable();
		out.dedup();
	}

	pub fn len(&self) -> usize {
		self.data.len()
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}
}
