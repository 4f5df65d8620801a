//! Colliders answering sphere penetration queries.
//!
//! A query places a sphere of `radius` at `center` (world space) and
//! reports the unit direction and distance the sphere must move to stop
//! overlapping the collider, or `None` when they do not overlap.

pub mod baked;
pub mod capsule;
pub mod cell_grid;
pub mod plane;
pub mod sphere;
pub mod trimesh;

use dyn_clone::DynClone;

use crate::V3;

pub use baked::BakedMeshCollider;
pub use capsule::CapsuleCollider;
pub use plane::PlaneCollider;
pub use sphere::SphereCollider;
pub use trimesh::MeshCollider;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Penetration {
	/// Unit vector, points out of the collider.
	pub direction: V3,
	/// Always > 0.
	pub depth: f32,
}

impl Penetration {
	/// Query sphere at `dist` from the closest collider point along `offset`.
	fn from_offset(offset: V3, dist: f32, overlap: f32) -> Option<Self> {
		if !(overlap > 0.0) {
			return None;
		}
		let direction = if dist > 1e-9 {
			offset / dist
		} else {
			// query center sits exactly on the feature
			V3::y()
		};
		Some(Self {
			direction,
			depth: overlap,
		})
	}
}

pub trait Collider: DynClone + Send + Sync {
	fn penetration(&self, center: V3, radius: f32) -> Option<Penetration>;

	/// Called once per tick before any query; animated bodies refresh here.
	fn bake(&mut self) {}

	fn name(&self) -> &str {
		"collider"
	}
}

dyn_clone::clone_trait_object!(Collider);

pub type ColliderRef = Box<dyn Collider>;
