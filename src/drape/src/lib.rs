pub mod animation;
pub mod collider;
pub mod collision;
pub mod config;
pub mod constraint;
pub mod controller_message;
pub mod error;
pub mod garment;
pub mod mesh_writer;
pub mod particle;
pub mod simulator;
pub mod skin_follow;
pub mod smoothing;
pub mod surface;
pub mod time_manager;

pub use protocol::V3;
pub type C3 = nalgebra::Vector3<i32>;
pub type Frame = nalgebra::Isometry3<f32>;

pub fn is_finite(v: &V3) -> bool {
	v.iter().all(|x| x.is_finite())
}
