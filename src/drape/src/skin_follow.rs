//! Soft pull of the cloth toward the driving surface.

use crate::particle::Particle;
use crate::surface::SurfaceSample;
use crate::{Frame, V3};

pub fn clamp01(x: f32) -> f32 {
	x.clamp(0.0, 1.0)
}

pub fn smoothstep(x: f32) -> f32 {
	let t = clamp01(x);
	t * t * (3.0 - 2.0 * t)
}

/// Scales `v` down to at most `max` length; a non-finite input gives zero.
pub fn clamp_magnitude(v: V3, max: f32) -> V3 {
	let len = v.magnitude();
	if !len.is_finite() {
		return V3::zeros();
	}
	if len > max {
		v * (max / len)
	} else {
		v
	}
}

/// Per-vertex follow weights in [0, 1].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FollowWeights {
	weights: Vec<f32>,
}

impl FollowWeights {
	pub fn uniform(n: usize, weight: f32) -> Self {
		Self {
			weights: vec![clamp01(weight); n],
		}
	}

	/// Weights from the vertex-colour red channel, eased through smoothstep.
	/// Vertices without a colour follow fully; extra colours are ignored.
	pub fn from_colors(red: Option<&[f32]>, n: usize) -> Self {
		let red = red.unwrap_or(&[]);
		Self {
			weights: (0..n)
				.map(|i| smoothstep(red.get(i).copied().unwrap_or(1.0)))
				.collect(),
		}
	}

	/// Takes a precomputed table as is, clamped to [0, 1].
	pub fn from_table(weights: Vec<f32>) -> Self {
		Self {
			weights: weights.into_iter().map(clamp01).collect(),
		}
	}

	pub fn len(&self) -> usize {
		self.weights.len()
	}

	pub fn is_empty(&self) -> bool {
		self.weights.is_empty()
	}

	/// `fallback` covers indices past the end of the table.
	pub fn get(&self, i: usize, fallback: f32) -> f32 {
		self.weights.get(i).copied().unwrap_or(fallback)
	}
}

/// Local-space follow targets for one tick, `None` where the sample is
/// unusable. Returns the number of skipped vertices.
pub fn compute_targets(
	sample: &SurfaceSample,
	frame: &Frame,
	normal_offset: f32,
	out: &mut Vec<Option<V3>>,
) -> usize {
	out.clear();
	let mut skipped = 0;
	for (pos, normal) in sample.positions.iter().zip(sample.normals.iter()) {
		let offset = normal
			.try_normalize(1e-12)
			.map_or_else(V3::zeros, |n| n * normal_offset);
		let world = pos + offset;
		let local = frame.inverse_transform_point(&world.into()).coords;
		if crate::is_finite(&local) {
			out.push(Some(local));
		} else {
			skipped += 1;
			out.push(None);
		}
	}
	skipped
}

/// Moves `p` toward `target` by `weight * stiffness` of the gap, clamped.
pub fn pull(p: &mut Particle, target: V3, weight: f32, stiffness: f32, max_push: f32) {
	let delta = (target - p.pos) * (weight * stiffness);
	if !crate::is_finite(&delta) {
		return;
	}
	p.add_pos(clamp_magnitude(delta, max_push));
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_smoothstep() {
		assert_eq!(smoothstep(-1.0), 0.0);
		assert_eq!(smoothstep(0.5), 0.5);
		assert_eq!(smoothstep(2.0), 1.0);
		assert!((smoothstep(0.25) - 0.15625).abs() < 1e-7);
	}

	#[test]
	fn test_weights() {
		let w = FollowWeights::from_colors(Some(&[0.0, 0.5, 1.5]), 5);
		assert_eq!(w.len(), 5);
		assert_eq!(w.get(0, 0.05), 0.0);
		assert_eq!(w.get(1, 0.05), 0.5);
		assert_eq!(w.get(2, 0.05), 1.0);
		assert_eq!(w.get(4, 0.05), 1.0);
		let w = FollowWeights::from_colors(Some(&[0.0, 0.0, 0.0]), 2);
		assert_eq!(w.len(), 2);
		let w = FollowWeights::from_colors(None, 2);
		assert_eq!(w.get(1, 0.05), 1.0);
	}

	#[test]
	fn test_injected_table_fallback() {
		let w = FollowWeights::from_table(vec![0.3, 2.0]);
		assert_eq!(w.get(0, 0.05), 0.3);
		assert_eq!(w.get(1, 0.05), 1.0);
		assert_eq!(w.get(2, 0.05), 0.05);
	}

	#[test]
	fn test_clamp_magnitude() {
		let v = clamp_magnitude(V3::new(3., 4., 0.), 1.0);
		assert!((v - V3::new(0.6, 0.8, 0.)).magnitude() < 1e-6);
		assert_eq!(clamp_magnitude(V3::new(0.1, 0., 0.), 1.0), V3::new(0.1, 0., 0.));
		assert_eq!(clamp_magnitude(V3::new(f32::NAN, 0., 0.), 1.0), V3::zeros());
	}

	#[test]
	fn test_targets() {
		let sample = SurfaceSample {
			positions: vec![V3::new(0., 1., 0.), V3::new(f32::NAN, 0., 0.), V3::zeros()],
			normals: vec![V3::new(0., 0., 2.), V3::z(), V3::zeros()],
		};
		let frame = Frame::translation(0., 1., 0.);
		let mut out = Vec::new();
		let skipped = compute_targets(&sample, &frame, 0.5, &mut out);
		assert_eq!(skipped, 1);
		assert_eq!(out[0], Some(V3::new(0., 0., 0.5)));
		assert_eq!(out[1], None);
		// zero normal means no standoff
		assert_eq!(out[2], Some(V3::new(0., -1., 0.)));
	}

	#[test]
	fn test_pull_is_clamped() {
		let mut p = Particle::new(V3::zeros());
		pull(&mut p, V3::new(1., 0., 0.), 0.5, 0.5, 1.0);
		assert_eq!(p.pos, V3::new(0.25, 0., 0.));
		pull(&mut p, V3::new(100., 0., 0.), 1.0, 1.0, 0.04);
		assert!((p.pos.x - 0.29).abs() < 1e-6);
	}
}
