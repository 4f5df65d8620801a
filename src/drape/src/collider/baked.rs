use super::trimesh::MeshCollider;
use super::{Collider, Penetration};
use crate::error::{DrapeError, Result};
use crate::surface::{SurfaceSample, SurfaceSourceRef};
use crate::V3;

/// Triangle shell that follows an animated body, re-baked from its surface
/// source on every tick.
#[derive(Clone)]
pub struct BakedMeshCollider {
	source: SurfaceSourceRef,
	shell: MeshCollider,
	sample: SurfaceSample,
}

impl BakedMeshCollider {
	/// The shell starts in `rest` until the first bake.
	pub fn new(
		rest: Vec<V3>,
		triangles: &[u32],
		source: SurfaceSourceRef,
		csize: f32,
	) -> Result<Self> {
		if source.vertex_count() != rest.len() {
			return Err(DrapeError::SurfaceMismatch {
				expected: rest.len(),
				found: source.vertex_count(),
			});
		}
		Ok(Self {
			source,
			shell: MeshCollider::new(rest, triangles, csize)?,
			sample: SurfaceSample::default(),
		})
	}

	pub fn vertices(&self) -> &[V3] {
		self.shell.vertices()
	}
}

impl Collider for BakedMeshCollider {
	fn penetration(&self, center: V3, radius: f32) -> Option<Penetration> {
		self.shell.penetration(center, radius)
	}

	fn bake(&mut self) {
		self.source.sample(&mut self.sample);
		// a bad pose keeps the previous shell
		if let Err(e) = self.shell.update_vertices(&self.sample.positions) {
			log::error!("baked collider: {}", e);
		}
	}

	fn name(&self) -> &str {
		"baked mesh"
	}
}
