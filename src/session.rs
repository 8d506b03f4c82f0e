use std::collections::BTreeMap;

use bevy::math::{Quat, Vec2, Vec3};
use log::info;
use rand::{SeedableRng, rngs::StdRng};

use crate::actions::Action;
use crate::camera::CameraRig;
use crate::color::CubeColor;
use crate::config::SessionConfig;
use crate::connectivity::{Classification, ColorProgress, ConnectivityAnalyzer, ConnectivityReport};
use crate::controller::{GrabDropController, GrabState};
use crate::coords::{Column, GridCoord3, GridSize};
use crate::cube::{CubeId, CubeRegistry};
use crate::grid::GridIndex;
use crate::level::{LevelDef, LevelError};
use crate::orientation::OrientationKeyframes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
	ColorSolved(CubeColor),
	LevelSolved,
	ExitRequested,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CubeView {
	pub id: CubeId,
	/// Committed cell; `None` while the cube is in the arm.
	pub grid_position: Option<GridCoord3>,
	/// Render position; follows the arm while held.
	pub position: Vec3,
	pub color: CubeColor,
	pub orientation: Quat,
	pub classification: Classification,
	pub held: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmView {
	pub column: Column,
	pub position: Vec2,
	pub lift: f32,
	pub radius: f32,
	pub state: GrabState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldView {
	pub id: CubeId,
	pub keyframes: Option<OrientationKeyframes>,
}

/// Read-only view handed to renderers and UI after each step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
	pub level_name: String,
	pub size: GridSize,
	pub cubes: Vec<CubeView>,
	pub arm: ArmView,
	pub held: Option<HeldView>,
	pub camera: CameraRig,
	pub progress: BTreeMap<CubeColor, ColorProgress>,
	pub solved: bool,
}

/// One playthrough of one level. Owns the cubes, the grid and every
/// derived set; dropped on exit or restart.
#[derive(Debug)]
pub struct LevelSession {
	level: LevelDef,
	config: SessionConfig,
	cubes: CubeRegistry,
	grid: GridIndex,
	analyzer: ConnectivityAnalyzer,
	report: ConnectivityReport,
	controller: GrabDropController,
	camera: CameraRig,
	rng: StdRng,
	events: Vec<SessionEvent>,
}

impl LevelSession {
	pub fn new(level: LevelDef, config: SessionConfig) -> Result<Self, LevelError> {
		level.validate()?;
		config.validate()?;
		let mut cubes = CubeRegistry::new();
		let mut grid = GridIndex::new(level.size);
		let placements = level.cubes.iter().map(|p| (p, false)).chain(level.generators.iter().map(|p| (p, true)));
		for (p, generator) in placements {
			let id = cubes.spawn(p.at, p.color, generator);
			grid.place(id, p.at);
		}
		let analyzer = ConnectivityAnalyzer::new(&cubes);
		let rng = match config.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		info!(
			"loaded level {:?}: {:?} grid, {} cubes",
			level.name,
			level.size,
			cubes.len()
		);
		let mut session = Self {
			controller: GrabDropController::new(level.size),
			camera: CameraRig::new(level.size.y as f32),
			level,
			config,
			cubes,
			grid,
			analyzer,
			report: ConnectivityReport::default(),
			rng,
			events: Vec::new(),
		};
		session.recompute();
		Ok(session)
	}

	/// Fresh session for the same level and config.
	pub fn restart(&self) -> Result<Self, LevelError> {
		Self::new(self.level.clone(), self.config.clone())
	}

	pub fn level(&self) -> &LevelDef {
		&self.level
	}
	pub fn config(&self) -> &SessionConfig {
		&self.config
	}
	pub fn cubes(&self) -> &CubeRegistry {
		&self.cubes
	}
	pub fn grid(&self) -> &GridIndex {
		&self.grid
	}
	pub fn report(&self) -> &ConnectivityReport {
		&self.report
	}
	pub fn controller(&self) -> &GrabDropController {
		&self.controller
	}
	pub fn camera(&self) -> &CameraRig {
		&self.camera
	}
	pub fn is_solved(&self) -> bool {
		self.report.solved
	}

	/// Applies the step's actions in order, then recomputes connectivity
	/// over the settled grid. Returns the events raised since the last call.
	pub fn step(&mut self, actions: &[Action]) -> Vec<SessionEvent> {
		let yaw_bucket = self.camera.yaw_bucket();
		for &action in actions {
			match action {
				Action::Move(dir) => {
					self.controller.move_target(dir, yaw_bucket, &mut self.grid, &mut self.cubes);
				}
				Action::Activate => {
					self.controller.activate(&mut self.grid, &mut self.cubes, &mut self.rng);
				}
				Action::Cancel => self.events.push(SessionEvent::ExitRequested),
				Action::RotateCameraLeft => self.camera.rotate(self.config.camera_rotation_step),
				Action::RotateCameraRight => self.camera.rotate(-self.config.camera_rotation_step),
				Action::RaiseCamera => self.camera.pan(self.config.camera_pan_step),
				Action::LowerCamera => self.camera.pan(-self.config.camera_pan_step),
			}
		}
		self.camera.normalize();
		self.recompute();
		std::mem::take(&mut self.events)
	}

	/// Advances animation by `dt` seconds. A drop that lands here updates
	/// connectivity immediately.
	pub fn advance(&mut self, dt: f32) -> Vec<SessionEvent> {
		let settled = self.controller.advance(dt, &self.config, &mut self.grid, &mut self.cubes);
		self.camera.advance(&self.config);
		if settled {
			self.recompute();
		}
		std::mem::take(&mut self.events)
	}

	/// One frame: `step` then `advance`.
	pub fn tick(&mut self, actions: &[Action], dt: f32) -> Vec<SessionEvent> {
		let mut events = self.step(actions);
		events.extend(self.advance(dt));
		events
	}

	fn recompute(&mut self) {
		let report = self.analyzer.analyze(&self.grid, &self.cubes);
		for &color in report.solved_colors.difference(&self.report.solved_colors) {
			self.events.push(SessionEvent::ColorSolved(color));
		}
		if report.solved && !self.report.solved {
			info!("level {:?} solved", self.level.name);
			self.events.push(SessionEvent::LevelSolved);
		}
		self.report = report;
	}

	pub fn snapshot(&self) -> Snapshot {
		let held = self.controller.held();
		let arm_pos = self.controller.arm_position();
		let cubes = self
			.cubes
			.iter()
			.map(|cube| {
				let is_held = held == Some(cube.id);
				let position = if is_held {
					Vec3::new(arm_pos.x, self.controller.lift(), arm_pos.y)
				} else {
					Vec3::new(cube.position.x as f32, cube.position.y as f32, cube.position.z as f32)
				};
				CubeView {
					id: cube.id,
					grid_position: (!is_held).then_some(cube.position),
					position,
					color: cube.color,
					orientation: cube.orientation,
					classification: self.report.classify(cube),
					held: is_held,
				}
			})
			.collect();

		Snapshot {
			level_name: self.level.name.clone(),
			size: self.level.size,
			cubes,
			arm: ArmView {
				column: self.controller.target(),
				position: arm_pos,
				lift: self.controller.lift(),
				radius: self.controller.arm_radius(&self.config),
				state: self.controller.state(),
			},
			held: held.map(|id| HeldView { id, keyframes: self.controller.keyframes() }),
			camera: self.camera,
			progress: self.report.progress.clone(),
			solved: self.report.solved,
		}
	}

	/// Panics if the grid and registry disagree: overlapping or dangling
	/// cells, a held cube still in the grid, or a missing cube.
	pub fn assert_invariants(&self) {
		let mut seen = vec![false; self.cubes.len()];
		for (at, id) in self.grid.occupied() {
			let cube = self.cubes.get(id);
			assert_eq!(cube.position, at, "{:?} is filed under the wrong cell", id);
			assert!(!seen[id.index()], "{:?} occupies two cells", id);
			assert_ne!(self.controller.held(), Some(id), "held {:?} is still in the grid", id);
			seen[id.index()] = true;
		}
		let in_grid = seen.iter().filter(|&&s| s).count();
		let held = usize::from(self.controller.held().is_some());
		assert_eq!(in_grid + held, self.cubes.len(), "cubes went missing");
	}
}
