pub mod adjacency;
pub mod builder;
pub mod distance;

pub use adjacency::Adjacency;
pub use builder::{ClothTopology, ConstraintBuilder};
pub use distance::{DistanceConstraint, DistanceConstraintType};

// below these the pair is treated as degenerate and skipped
pub const EPS_LENGTH: f32 = 1e-6;
pub const EPS_IMASS: f32 = 1e-8;
