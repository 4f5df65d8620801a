use std::time::Instant;

use drape::collider::{PlaneCollider, SphereCollider};
use drape::config::ClothConfig;
use drape::garment::GarmentModel;
use drape::simulator::ClothSimulatorBuilder;
use drape::surface::StaticSurface;
use drape::V3;

// prints wall time per simulated time, below 100% is faster than real time
fn main() {
	let garment = GarmentModel::new_grid(40, 40, 0.025, V3::new(-0.5, 0.6, -0.5));
	let surface = StaticSurface::from_mesh(
		garment
			.positions
			.iter()
			.map(|p| p + V3::new(0., -0.2, 0.))
			.collect(),
		&garment.triangles,
	);
	let config = ClothConfig::default().with_skin_follow(0.05, 0.4, 0.1);
	let mut sim = match ClothSimulatorBuilder::new(garment)
		.with_surface(Box::new(surface))
		.with_collider(Box::new(SphereCollider::new(V3::zeros(), 0.4)))
		.with_collider(Box::new(PlaneCollider::floor(-0.5)))
		.with_config(config)
		.build()
	{
		Ok(sim) => sim,
		Err(e) => {
			eprintln!("ERROR: {}", e);
			std::process::exit(1);
		}
	};
	let start = Instant::now();
	let rframes = 100;
	for _ in 0..rframes {
		sim.tick();
	}
	let time = rframes as f32 * sim.config().time_step;
	let duration = start.elapsed().as_micros();
	eprintln!("{:.3}%", duration as f32 / time / 1e4);
}
