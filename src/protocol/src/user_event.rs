use crate::mesh::RenderMesh;

#[derive(Debug)]
pub enum UserEvent {
	Update(RenderMesh, UpdateInfo),
}

#[derive(Debug, Clone, Default)]
pub struct UpdateInfo {
	// wall time spent / fixed step, > 1.0 means slower than real time
	pub load: f32,
	pub tick: u64,
	pub particle_len: usize,
	pub constraint_len: [usize; 2],
	pub collisions: usize,
	pub corrupted: usize,
}
