use crate::constraint::Adjacency;
use crate::particle::Particle;
use crate::V3;

/// Laplacian smoothing toward the neighbour mean.
///
/// Reads from a snapshot so the result does not depend on vertex order.
/// `scratch` is reused between calls to avoid reallocating the snapshot.
pub fn smooth(
	particles: &mut [Particle],
	adjacency: &Adjacency,
	strength: f32,
	scratch: &mut Vec<V3>,
) {
	if strength <= 0.0 {
		return;
	}
	scratch.clear();
	scratch.extend(particles.iter().map(|p| p.pos));
	for (i, p) in particles.iter_mut().enumerate() {
		let neighbors = adjacency.neighbors(i);
		if neighbors.is_empty() {
			continue;
		}
		let sum = neighbors
			.iter()
			.fold(V3::zeros(), |acc, &j| acc + scratch[j]);
		let mean = sum / neighbors.len() as f32;
		if !crate::is_finite(&mean) {
			continue;
		}
		p.pos = scratch[i].lerp(&mean, strength);
	}
}
