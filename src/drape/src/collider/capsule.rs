use super::{Collider, Penetration};
use crate::V3;

pub(crate) fn closest_on_segment(p: V3, a: V3, b: V3) -> V3 {
	let ab = b - a;
	let len_sq = ab.magnitude_squared();
	if len_sq <= f32::EPSILON {
		return a;
	}
	let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
	a + ab * t
}

/// Segment `a`-`b` swept by `radius`, e.g. a limb or torso.
#[derive(Clone, Debug)]
pub struct CapsuleCollider {
	pub a: V3,
	pub b: V3,
	pub radius: f32,
}

impl CapsuleCollider {
	pub fn new(a: V3, b: V3, radius: f32) -> Self {
		Self { a, b, radius }
	}
}

impl Collider for CapsuleCollider {
	fn penetration(&self, center: V3, radius: f32) -> Option<Penetration> {
		let q = closest_on_segment(center, self.a, self.b);
		let offset = center - q;
		let dist = offset.magnitude();
		Penetration::from_offset(offset, dist, self.radius + radius - dist)
	}

	fn name(&self) -> &str {
		"capsule"
	}
}
