use crate::collider::{ColliderRef, Penetration};
use crate::particle::Particle;
use crate::{Frame, V3};

// velocity scale after a correction, reduces bounce
pub const BOUNCE_DAMPING: f32 = 0.9;

#[derive(Clone)]
struct ColliderEntry {
	collider: ColliderRef,
	enabled: bool,
}

/// Externally owned rigid colliders; index 0 is the primary body.
#[derive(Clone, Default)]
pub struct ColliderSet {
	entries: Vec<ColliderEntry>,
}

impl ColliderSet {
	pub fn add(&mut self, collider: ColliderRef) -> usize {
		log::debug!("collider #{}: {}", self.entries.len(), collider.name());
		self.entries.push(ColliderEntry {
			collider,
			enabled: true,
		});
		self.entries.len() - 1
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn set_enabled(&mut self, id: usize, enabled: bool) {
		if let Some(entry) = self.entries.get_mut(id) {
			entry.enabled = enabled;
		}
	}

	/// Re-bakes every collider, disabled ones included so they are current
	/// when re-enabled.
	pub fn bake(&mut self) {
		for entry in self.entries.iter_mut() {
			entry.collider.bake();
		}
	}

	/// Queries the primary collider, `None` when absent or disabled.
	pub fn primary_penetration(&self, center: V3, radius: f32) -> Option<Penetration> {
		let entry = self.entries.first()?;
		if !entry.enabled {
			return None;
		}
		entry.collider.penetration(center, radius)
	}

	pub fn enabled(&self) -> impl Iterator<Item = &ColliderRef> {
		self.entries
			.iter()
			.filter(|e| e.enabled)
			.map(|e| &e.collider)
	}
}

/// Pushes particles out of the colliders with a query sphere per particle.
#[derive(Clone, Debug)]
pub struct CollisionResolver {
	pub thickness: f32,
	pub max_push: f32,
}

impl CollisionResolver {
	pub fn new(thickness: f32, max_push: f32) -> Self {
		Self {
			thickness,
			max_push,
		}
	}

	pub fn is_inside_primary(&self, colliders: &ColliderSet, world_pos: V3) -> bool {
		colliders
			.primary_penetration(world_pos, self.thickness)
			.is_some()
	}

	/// Returns the number of corrections applied.
	pub fn resolve_particle(
		&self,
		p: &mut Particle,
		colliders: &ColliderSet,
		frame: &Frame,
	) -> usize {
		if !crate::is_finite(&p.pos) {
			return 0;
		}
		let world_pos = frame.transform_point(&p.pos.into()).coords;
		let mut count = 0;
		for collider in colliders.enabled() {
			let hit = match collider.penetration(world_pos, self.thickness) {
				Some(hit) => hit,
				None => continue,
			};
			if !(hit.depth > 0.0) {
				continue;
			}
			let correct = hit.direction * hit.depth.min(self.max_push);
			p.add_pos(frame.inverse_transform_vector(&correct));
			p.vel *= BOUNCE_DAMPING;
			count += 1;
		}
		count
	}

	pub fn resolve(
		&self,
		particles: &mut [Particle],
		colliders: &ColliderSet,
		frame: &Frame,
	) -> usize {
		particles
			.iter_mut()
			.map(|p| self.resolve_particle(p, colliders, frame))
			.sum()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::collider::{PlaneCollider, SphereCollider};

	fn unit_sphere() -> ColliderSet {
		let mut set = ColliderSet::default();
		set.add(Box::new(SphereCollider::new(V3::zeros(), 1.0)));
		set
	}

	#[test]
	fn test_full_correction_clears_penetration() {
		let set = unit_sphere();
		let resolver = CollisionResolver::new(0.25, 1.0);
		let mut p = Particle::new(V3::new(0., 0.5, 0.));
		p.vel = V3::new(1., 0., 0.);
		let n = resolver.resolve_particle(&mut p, &set, &Frame::identity());
		assert_eq!(n, 1);
		// depth 0.75 along +y
		assert_eq!(p.pos, V3::new(0., 1.25, 0.));
		assert_eq!(p.vel, V3::new(0.9, 0., 0.));
		assert!(!resolver.is_inside_primary(&set, p.pos));
		assert_eq!(resolver.resolve_particle(&mut p, &set, &Frame::identity()), 0);
	}

	#[test]
	fn test_correction_clamped() {
		let set = unit_sphere();
		let resolver = CollisionResolver::new(0.25, 0.5);
		let mut p = Particle::new(V3::new(0., 0.5, 0.));
		resolver.resolve_particle(&mut p, &set, &Frame::identity());
		assert_eq!(p.pos, V3::new(0., 1.0, 0.));
		assert!(resolver.is_inside_primary(&set, p.pos));
	}

	#[test]
	fn test_correction_in_local_space() {
		let set = unit_sphere();
		let resolver = CollisionResolver::new(0.25, 1.0);
		// local origin sits at world (0, 0.5, 0), rotated half a turn about z
		let frame = Frame::new(
			V3::new(0., 0.5, 0.),
			V3::new(0., 0., std::f32::consts::PI),
		);
		let mut p = Particle::new(V3::zeros());
		resolver.resolve_particle(&mut p, &set, &frame);
		// world push is +y, which is -y locally
		assert!((p.pos - V3::new(0., -0.75, 0.)).magnitude() < 1e-5);
		let world = frame.transform_point(&p.pos.into()).coords;
		assert!((world - V3::new(0., 1.25, 0.)).magnitude() < 1e-5);
	}

	#[test]
	fn test_disabled_colliders_skipped() {
		let mut set = unit_sphere();
		set.add(Box::new(PlaneCollider::floor(0.0)));
		let resolver = CollisionResolver::new(0.25, 1.0);
		let mut p = Particle::new(V3::new(0., -0.5, 0.));
		set.set_enabled(0, false);
		assert!(!resolver.is_inside_primary(&set, p.pos));
		let n = resolver.resolve_particle(&mut p, &set, &Frame::identity());
		assert_eq!(n, 1);
		assert_eq!(p.pos, V3::new(0., 0.25, 0.));
	}

	#[test]
	fn test_every_collider_queried_from_one_position() {
		let mut set = unit_sphere();
		set.add(Box::new(PlaneCollider::floor(0.0)));
		let resolver = CollisionResolver::new(0.25, 1.0);
		let mut p = Particle::new(V3::new(0., -0.5, 0.));
		let n = resolver.resolve_particle(&mut p, &set, &Frame::identity());
		assert_eq!(n, 2);
		// sphere pushes 0.75 down, floor pushes 0.75 up
		assert_eq!(p.pos, V3::new(0., -0.5, 0.));
		assert!((p.vel.magnitude()).abs() < 1e-9);
	}

	#[test]
	fn test_non_finite_particle_ignored() {
		let set = unit_sphere();
		let resolver = CollisionResolver::new(0.25, 1.0);
		let mut ps = vec![Particle::new(V3::new(f32::NAN, 0., 0.))];
		assert_eq!(resolver.resolve(&mut ps, &set, &Frame::identity()), 0);
	}
}
