use drape::config::ClothConfig;
use protocol::Message;

// usage: skirt [config.yaml|-] [frames] [out.bin]
fn main() {
	env_logger::init();
	let mut iter = std::env::args();
	iter.next();
	let config = match iter.next().as_deref() {
		None | Some("-") => ClothConfig::default(),
		Some(path) => match ClothConfig::load(path) {
			Ok(config) => config,
			Err(e) => {
				log::error!("cannot load {}: {}", path, e);
				std::process::exit(1);
			}
		},
	};
	let frames: usize = match iter.next() {
		None => 250,
		Some(s) => match s.parse() {
			Ok(n) => n,
			Err(e) => {
				log::error!("bad frame count {:?}: {}", s, e);
				std::process::exit(1);
			}
		},
	};
	let out = iter.next();

	let sim = match runner::demo_scene(config) {
		Ok(sim) => sim,
		Err(e) => {
			log::error!("cannot build scene: {}", e);
			std::process::exit(1);
		}
	};
	let (mesh, stats) = runner::run(sim, frames);
	log::info!(
		"{} frames, {} collisions, {} corrupted, last load {:.3}",
		stats.frames,
		stats.collisions,
		stats.corrupted,
		stats.last.load,
	);
	let (mesh, path) = match (mesh, out) {
		(Some(mesh), Some(path)) => (mesh, path),
		_ => return,
	};
	let bytes = match Message::MeshUpdate(mesh).to_bytes() {
		Ok(bytes) => bytes,
		Err(e) => {
			log::error!("cannot encode mesh: {}", e);
			std::process::exit(1);
		}
	};
	if let Err(e) = std::fs::write(&path, bytes) {
		log::error!("cannot write {}: {}", path, e);
		std::process::exit(1);
	}
	log::info!("wrote {}", path);
}
