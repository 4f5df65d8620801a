use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use log::{debug, error, info, warn};
use protocol::mesh::RenderMesh;
use protocol::user_event::{UpdateInfo, UserEvent};

use crate::collider::ColliderRef;
use crate::collision::{ColliderSet, CollisionResolver};
use crate::config::ClothConfig;
use crate::constraint::{Adjacency, ClothTopology, ConstraintBuilder, DistanceConstraint};
use crate::controller_message::ControllerMessage;
use crate::error::{DrapeError, Result};
use crate::garment::GarmentModel;
use crate::mesh_writer::MeshWriter;
use crate::particle::ParticleState;
use crate::skin_follow::{self, FollowWeights};
use crate::smoothing::smooth;
use crate::surface::{SurfaceSample, SurfaceSourceRef};
use crate::time_manager::{TimeManager, TimeModel};
use crate::{Frame, V3};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
	pub substeps: usize,
	/// Collision corrections applied, summed over all passes.
	pub collisions: usize,
	/// Surface vertices whose follow target was unusable.
	pub skipped_targets: usize,
	/// Particles reset by the sanity check.
	pub corrupted: usize,
}

pub struct ClothSimulatorBuilder {
	garment: GarmentModel,
	config: ClothConfig,
	surface: Option<SurfaceSourceRef>,
	colliders: ColliderSet,
	frame: Frame,
	weights: Option<FollowWeights>,
}

impl ClothSimulatorBuilder {
	pub fn new(garment: GarmentModel) -> Self {
		Self {
			garment,
			config: ClothConfig::default(),
			surface: None,
			colliders: ColliderSet::default(),
			frame: Frame::identity(),
			weights: None,
		}
	}

	pub fn with_config(mut self, config: ClothConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_surface(mut self, surface: SurfaceSourceRef) -> Self {
		self.surface = Some(surface);
		self
	}

	/// The first collider added is the primary body.
	pub fn with_collider(mut self, collider: ColliderRef) -> Self {
		self.colliders.add(collider);
		self
	}

	/// Local-to-world transform of the cloth.
	pub fn with_frame(mut self, frame: Frame) -> Self {
		self.frame = frame;
		self
	}

	/// Overrides the weights derived from the garment colours.
	pub fn with_follow_weights(mut self, weights: FollowWeights) -> Self {
		self.weights = Some(weights);
		self
	}

	pub fn build(self) -> Result<ClothSimulator> {
		let surface = match self.surface {
			Some(surface) => surface,
			None => {
				error!("cloth simulator needs a surface source");
				return Err(DrapeError::MissingCollaborator("surface source"));
			}
		};
		if self.colliders.is_empty() {
			error!("cloth simulator needs at least one collider");
			return Err(DrapeError::MissingCollaborator("collider"));
		}
		self.config.validate()?;
		let n = self.garment.vertex_count();
		if surface.vertex_count() != n {
			error!(
				"surface has {} vertices, garment has {}",
				surface.vertex_count(),
				n
			);
			return Err(DrapeError::SurfaceMismatch {
				expected: n,
				found: surface.vertex_count(),
			});
		}
		let topology =
			ConstraintBuilder::new(&self.garment.positions, &self.garment.triangles)
				.build()?;
		let particles = ParticleState::from_positions(&self.garment.positions);
		let weights = self
			.weights
			.unwrap_or_else(|| self.garment.follow_weights());
		let writer = MeshWriter::new(self.garment.triangles);
		let mesh = writer.create(&particles.positions());
		let resolver = CollisionResolver::new(
			self.config.cloth_thickness,
			self.config.max_penetration_push,
		);
		info!(
			"cloth simulator: {} particles, {} structural, {} bending, {} colliders",
			n,
			topology.structural_count(),
			topology.bending_count(),
			self.colliders.len(),
		);
		Ok(ClothSimulator {
			config: self.config,
			particles,
			topology,
			weights,
			surface,
			colliders: self.colliders,
			resolver,
			frame: self.frame,
			sample: SurfaceSample::default(),
			targets: Vec::new(),
			scratch: Vec::new(),
			writer,
			mesh,
			enabled: true,
			tick_count: 0,
			time_model: TimeModel::RtFrameLock,
			forward_frames: -1,
		})
	}
}

#[derive(Clone)]
pub struct ClothSimulator {
	config: ClothConfig,
	particles: ParticleState,
	topology: ClothTopology,
	weights: FollowWeights,
	surface: SurfaceSourceRef,
	colliders: ColliderSet,
	resolver: CollisionResolver,
	frame: Frame,

	sample: SurfaceSample,
	targets: Vec<Option<V3>>,
	scratch: Vec<V3>,

	writer: MeshWriter,
	mesh: RenderMesh,

	enabled: bool,
	tick_count: u64,
	time_model: TimeModel,

	// -1: always play
	// 0: pause
	// n: play n frames
	forward_frames: i32,
}

impl ClothSimulator {
	pub fn with_time_model(mut self, model: TimeModel) -> Self {
		self.time_model = model;
		self
	}

	pub fn with_paused(mut self) -> Self {
		self.forward_frames = 1; // provide first frame
		self
	}

	pub fn config(&self) -> &ClothConfig {
		&self.config
	}

	pub fn particles(&self) -> &ParticleState {
		&self.particles
	}

	pub fn particles_mut(&mut self) -> &mut ParticleState {
		&mut self.particles
	}

	pub fn constraints(&self) -> &[DistanceConstraint] {
		&self.topology.constraints
	}

	pub fn adjacency(&self) -> &Adjacency {
		&self.topology.adjacency
	}

	pub fn topology(&self) -> &ClothTopology {
		&self.topology
	}

	pub fn weights(&self) -> &FollowWeights {
		&self.weights
	}

	pub fn mesh(&self) -> &RenderMesh {
		&self.mesh
	}

	pub fn frame(&self) -> &Frame {
		&self.frame
	}

	pub fn set_frame(&mut self, frame: Frame) {
		self.frame = frame;
	}

	pub fn colliders_mut(&mut self) -> &mut ColliderSet {
		&mut self.colliders
	}

	pub fn set_collider_enabled(&mut self, id: usize, enabled: bool) {
		self.colliders.set_enabled(id, enabled);
	}

	pub fn set_follow_global(&mut self, global: f32) {
		self.config.skin_follow_global = skin_follow::clamp01(global);
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// A disabled simulator ignores `tick`.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	pub fn tick_count(&self) -> u64 {
		self.tick_count
	}

	fn apply_skin_follow(&mut self) {
		let config = &self.config;
		for (id, p) in self.particles.as_mut_slice().iter_mut().enumerate() {
			let target = match self.targets.get(id) {
				Some(Some(target)) => *target,
				_ => continue,
			};
			let world = self.frame.transform_point(&p.pos.into()).coords;
			if self.resolver.is_inside_primary(&self.colliders, world) {
				continue;
			}
			let weight = self.weights.get(id, config.skin_follow_weight)
				* config.skin_follow_global;
			skin_follow::pull(
				p,
				target,
				weight,
				config.skin_follow_stiffness,
				config.max_penetration_push,
			);
		}
	}

	fn solve(&mut self, follow: bool) {
		let iterations = self.config.solver_iterations;
		for iteration in 0..iterations {
			if follow {
				self.apply_skin_follow();
			}
			let particles = self.particles.as_mut_slice();
			for constraint in self.topology.constraints.iter() {
				constraint.project(particles);
			}
			if iteration + 1 == iterations {
				smooth(
					particles,
					&self.topology.adjacency,
					self.config.smoothing_strength,
					&mut self.scratch,
				);
			}
		}
	}

	fn resolve_collisions(&mut self) -> usize {
		self.resolver
			.resolve(self.particles.as_mut_slice(), &self.colliders, &self.frame)
	}

	/// Advances the cloth by one fixed time step.
	pub fn tick(&mut self) -> TickReport {
		let mut report = TickReport::default();
		if !self.enabled {
			return report;
		}
		self.surface.sample(&mut self.sample);
		self.colliders.bake();
		let follow = if self.sample.is_consistent(self.particles.len()) {
			report.skipped_targets = skin_follow::compute_targets(
				&self.sample,
				&self.frame,
				self.config.normal_offset,
				&mut self.targets,
			);
			if report.skipped_targets > 0 {
				warn!(
					"skipped {} non-finite follow targets",
					report.skipped_targets
				);
			}
			true
		} else {
			error!(
				"surface sample has {} positions and {} normals, expected {}",
				self.sample.positions.len(),
				self.sample.normals.len(),
				self.particles.len(),
			);
			self.targets.clear();
			false
		};

		let h = self.config.substep_time();
		for _ in 0..self.config.substeps {
			report.collisions += self.resolve_collisions();
			self.particles.integrate(self.config.gravity, h);
			self.solve(follow);
			self.particles.update_velocities(h, self.config.damping);
		}
		report.substeps = self.config.substeps;
		report.collisions += self.resolve_collisions();
		report.corrupted = self.particles.recover(self.config.sanity_bound).len();
		self.writer.write(&mut self.mesh, self.particles.as_slice());
		self.tick_count += 1;
		debug!("tick {}: {:?}", self.tick_count, report);
		report
	}

	fn update_info(&self, load: f32, report: &TickReport) -> UpdateInfo {
		UpdateInfo {
			load,
			tick: self.tick_count,
			particle_len: self.particles.len(),
			constraint_len: [
				self.topology.structural_count(),
				self.topology.bending_count(),
			],
			collisions: report.collisions,
			corrupted: report.corrupted,
		}
	}

	// returns false when the thread should stop
	fn handle_message(&mut self, msg: ControllerMessage) -> bool {
		match msg {
			ControllerMessage::TogglePause => {
				if self.forward_frames == 0 {
					self.forward_frames = -1;
				} else {
					self.forward_frames = 0;
				}
			}
			ControllerMessage::FrameForward => {
				if self.forward_frames == 0 {
					self.forward_frames += 1;
				}
			}
			ControllerMessage::SetFollowGlobal(global) => {
				self.set_follow_global(global)
			}
			ControllerMessage::Stop => return false,
		}
		true
	}

	/// Ticks until `Stop` arrives or either channel end is dropped.
	pub fn run_thread(
		&mut self,
		tx: Sender<UserEvent>,
		rx: Receiver<ControllerMessage>,
	) {
		let mut time_manager =
			TimeManager::new(self.config.time_step, self.time_model);
		info!("simulation thread started, {:?}", self.time_model);
		let mut first_frame = true;
		'run: loop {
			if self.forward_frames != 0 {
				if self.forward_frames > 0 {
					self.forward_frames -= 1;
				}
				let report = if first_frame {
					first_frame = false;
					TickReport::default()
				} else {
					self.tick()
				};
				let info = self.update_info(time_manager.load(), &report);
				if tx.send(UserEvent::Update(self.mesh.clone(), info)).is_err() {
					info!("mesh receiver dropped");
					break;
				}
			}

			if self.forward_frames == 0 {
				// paused, block until told otherwise
				match rx.recv() {
					Ok(msg) if self.handle_message(msg) => {}
					_ => break,
				}
				time_manager.reset();
				continue;
			}
			loop {
				match rx.try_recv() {
					Ok(msg) => {
						if !self.handle_message(msg) {
							break 'run;
						}
					}
					Err(TryRecvError::Empty) => break,
					Err(TryRecvError::Disconnected) => break 'run,
				}
			}
			time_manager.take_time();
		}
		info!("simulation thread stopped after {} ticks", self.tick_count);
	}
}
