use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrapeError {
	#[error("missing collaborator: {0}")]
	MissingCollaborator(&'static str),
	#[error("surface source has {found} vertices, garment has {expected}")]
	SurfaceMismatch { expected: usize, found: usize },
	#[error("triangle list length {0} is not a multiple of 3")]
	RaggedTriangles(usize),
	#[error("triangle index {index} out of range for {count} vertices")]
	TriangleIndexOutOfRange { index: usize, count: usize },
	#[error("invalid config: {0}")]
	InvalidConfig(String),
	#[error("config parse error: {0}")]
	Yaml(#[from] serde_yaml::Error),
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DrapeError>;
