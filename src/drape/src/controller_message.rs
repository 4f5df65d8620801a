#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControllerMessage {
	TogglePause,
	FrameForward,
	// scale on every per-vertex follow weight, clamped to [0, 1]
	SetFollowGlobal(f32),
	Stop,
}
