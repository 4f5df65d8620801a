use super::{Collider, Penetration};
use crate::V3;

/// Solid half-space behind a plane (floor, table top).
#[derive(Clone, Debug)]
pub struct PlaneCollider {
	pub point: V3,
	pub normal: V3,
}

impl PlaneCollider {
	/// `normal` is normalized; a zero normal falls back to +Y.
	pub fn new(point: V3, normal: V3) -> Self {
		let normal = normal.try_normalize(1e-12).unwrap_or_else(V3::y);
		Self { point, normal }
	}

	pub fn floor(height: f32) -> Self {
		Self::new(V3::new(0., height, 0.), V3::y())
	}
}

impl Collider for PlaneCollider {
	fn penetration(&self, center: V3, radius: f32) -> Option<Penetration> {
		let dist = (center - self.point).dot(&self.normal);
		let overlap = radius - dist;
		if !(overlap > 0.0) {
			return None;
		}
		Some(Penetration {
			direction: self.normal,
			depth: overlap,
		})
	}

	fn name(&self) -> &str {
		"plane"
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_floor() {
		let f = PlaneCollider::floor(1.0);
		let p = f.penetration(V3::new(3., 0.5, -2.), 0.25).unwrap();
		assert_eq!(p.direction, V3::y());
		assert_eq!(p.depth, 0.75);
		assert!(f.penetration(V3::new(0., 1.25, 0.), 0.25).is_none());
	}

	#[test]
	fn test_normalizes() {
		let f = PlaneCollider::new(V3::zeros(), V3::new(0., 0., 4.));
		assert_eq!(f.normal, V3::z());
		let f = PlaneCollider::new(V3::zeros(), V3::zeros());
		assert_eq!(f.normal, V3::y());
	}
}
