pub mod mesh;
pub mod user_event;

use mesh::RenderMesh;
use serde::{Deserialize, Serialize};

pub type V3 = nalgebra::Vector3<f32>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Message {
	MeshUpdate(RenderMesh),
}

impl Message {
	pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
		bincode::serialize(&self)
	}

	pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
		bincode::deserialize(bytes)
	}
}
