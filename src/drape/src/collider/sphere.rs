use super::{Collider, Penetration};
use crate::V3;

#[derive(Clone, Debug)]
pub struct SphereCollider {
	pub center: V3,
	pub radius: f32,
}

impl SphereCollider {
	pub fn new(center: V3, radius: f32) -> Self {
		Self { center, radius }
	}
}

impl Collider for SphereCollider {
	fn penetration(&self, center: V3, radius: f32) -> Option<Penetration> {
		let offset = center - self.center;
		let dist = offset.magnitude();
		Penetration::from_offset(offset, dist, self.radius + radius - dist)
	}

	fn name(&self) -> &str {
		"sphere"
	}
}
