use std::sync::mpsc::channel;

use log::{info, warn};
use nalgebra::Isometry3;

use drape::animation::SwingCycle;
use drape::collider::{BakedMeshCollider, PlaneCollider};
use drape::config::ClothConfig;
use drape::controller_message::ControllerMessage;
use drape::error::Result;
use drape::garment::GarmentModel;
use drape::simulator::{ClothSimulator, ClothSimulatorBuilder};
use drape::surface::AnimatedSurface;
use drape::time_manager::TimeModel;
use drape::V3;
use protocol::mesh::RenderMesh;
use protocol::user_event::{UpdateInfo, UserEvent};

const HIP_HEIGHT: f32 = 1.0;
const SKIRT_LENGTH: f32 = 0.55;
const SKIRT_RADIUS: f32 = 0.22;

/// Tube skirt around a torso shell. The skirt surface and the torso swing
/// with the same cycle; the torso is re-baked every tick. Cloth space is
/// centred on the hip.
pub fn demo_scene(config: ClothConfig) -> Result<ClothSimulator> {
	let hip = V3::new(0., HIP_HEIGHT, 0.);
	// fades from fully attached at the waist to free at the hem
	let garment =
		GarmentModel::new_tube(SKIRT_RADIUS, SKIRT_LENGTH, 32, 12, V3::zeros())
			.with_follow_colors(|p| 1.0 + p.y / SKIRT_LENGTH * 1.5);
	let world_rest: Vec<V3> = garment.positions.iter().map(|p| p + hip).collect();
	let cycle = SwingCycle::leg_swing(V3::x(), 12.0);
	let torso = GarmentModel::new_tube(
		SKIRT_RADIUS - 0.03,
		1.0,
		24,
		10,
		hip + V3::new(0., 0.4, 0.),
	);
	let torso_pose = AnimatedSurface::new(
		torso.positions.clone(),
		&torso.triangles,
		hip,
		cycle.clone(),
		config.time_step,
	);
	let torso = BakedMeshCollider::new(
		torso.positions,
		&torso.triangles,
		Box::new(torso_pose),
		0.1,
	)?;
	let body = AnimatedSurface::new(
		world_rest,
		&garment.triangles,
		hip,
		cycle,
		config.time_step,
	);
	ClothSimulatorBuilder::new(garment)
		.with_config(config)
		.with_frame(Isometry3::translation(hip.x, hip.y, hip.z))
		.with_surface(Box::new(body))
		.with_collider(Box::new(torso))
		.with_collider(Box::new(PlaneCollider::floor(0.0)))
		.build()
}

#[derive(Debug, Default)]
pub struct RunStats {
	pub frames: usize,
	pub collisions: usize,
	pub corrupted: usize,
	pub last: UpdateInfo,
}

/// Runs `frames` ticks on a simulation thread and returns the final mesh.
pub fn run(sim: ClothSimulator, frames: usize) -> (Option<RenderMesh>, RunStats) {
	let sim = sim.with_time_model(TimeModel::VideoRender);
	let (tx, rx) = channel();
	let (ctx, crx) = channel();
	let handle = std::thread::spawn(move || {
		let mut sim = sim;
		sim.run_thread(tx, crx);
	});
	let mut stats = RunStats::default();
	let mut last_mesh = None;
	// the first update is the rest pose
	while stats.frames <= frames {
		let (mesh, info) = match rx.recv() {
			Ok(UserEvent::Update(mesh, info)) => (mesh, info),
			Err(_) => {
				warn!("simulation thread ended early");
				break;
			}
		};
		stats.collisions += info.collisions;
		stats.corrupted += info.corrupted;
		if info.tick % 50 == 0 {
			info!(
				"tick {}: {} collisions, bounds {:?}",
				info.tick, info.collisions, mesh.bounds
			);
		}
		stats.last = info;
		last_mesh = Some(mesh);
		stats.frames += 1;
	}
	// the thread may already be gone
	let _ = ctx.send(ControllerMessage::Stop);
	drop(rx);
	if handle.join().is_err() {
		warn!("simulation thread panicked");
	}
	stats.frames = stats.frames.saturating_sub(1);
	(last_mesh, stats)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_demo_scene_runs() {
		let sim = demo_scene(ClothConfig::default()).unwrap();
		assert_eq!(sim.particles().len(), 32 * 12);
		let (mesh, stats) = run(sim, 5);
		let mesh = mesh.unwrap();
		assert_eq!(stats.frames, 5);
		assert_eq!(stats.last.tick, 5);
		assert_eq!(stats.corrupted, 0);
		assert_eq!(mesh.vertex_count(), 32 * 12);
		// cloth space is hip-centred
		assert!(mesh.bounds.max.y <= 0.1);
	}

	#[test]
	fn test_demo_rejects_bad_config() {
		assert!(demo_scene(ClothConfig::default().with_damping(2.0)).is_err());
	}
}
