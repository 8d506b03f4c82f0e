use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use cubelink::hud::{CONTROLS_HINT, CUBE_PANEL_HEADING};
use cubelink::{
	Action, Classification, CubeColor, CubeId, LevelDef, LevelSession, MoveDirection, SessionConfig, SessionEvent,
	Snapshot, builtin_levels, format_hud, format_side_panel,
};

// ---------- Constants ----------
const CUBE_SIZE: f32 = 0.92;
const BEAM_LENGTH: f32 = 20.0;
const FIRST_LEVEL: &str = "T1";
const RNG_SEED: u64 = 42;

const DISCONNECTED_SHADE: f32 = 0.55;
const CONNECTED_SHADE: f32 = 1.0;
const GENERATOR_SHADE: f32 = 1.2;
const LINKED_SHADE: f32 = 1.4;

const KEY_BINDINGS: [(KeyCode, Action); 15] = [
	(KeyCode::ArrowUp, Action::Move(MoveDirection::Forward)),
	(KeyCode::KeyI, Action::Move(MoveDirection::Forward)),
	(KeyCode::ArrowLeft, Action::Move(MoveDirection::Left)),
	(KeyCode::KeyJ, Action::Move(MoveDirection::Left)),
	(KeyCode::ArrowDown, Action::Move(MoveDirection::Back)),
	(KeyCode::KeyK, Action::Move(MoveDirection::Back)),
	(KeyCode::ArrowRight, Action::Move(MoveDirection::Right)),
	(KeyCode::KeyL, Action::Move(MoveDirection::Right)),
	(KeyCode::Space, Action::Activate),
	(KeyCode::Escape, Action::Cancel),
	(KeyCode::Backspace, Action::Cancel),
	(KeyCode::KeyA, Action::RotateCameraLeft),
	(KeyCode::KeyD, Action::RotateCameraRight),
	(KeyCode::KeyW, Action::RaiseCamera),
	(KeyCode::KeyS, Action::LowerCamera),
];

// ---------- Components ----------
#[derive(Component)]
struct CubeTag(CubeId);

#[derive(Component)]
struct ArmBeam;

#[derive(Component)]
struct MainCamera;

#[derive(Component)]
struct LevelScene; // Marker to despawn/rebuild when the level changes

// ---------- Resources ----------
#[derive(Resource)]
struct Game {
	session: LevelSession,
	snapshot: Snapshot,
	levels: Vec<LevelDef>,
	config: SessionConfig,
	current: usize,
	paused: bool,
	request_rebuild: bool,
}

#[derive(Resource)]
struct UiState {
	log: Vec<String>,
	solved_levels: HashSet<String>,
	toast: Option<(String, f32)>, // (message, remaining_seconds)
}

#[derive(Resource)]
struct Palette {
	cubes: HashMap<(CubeColor, Classification), Handle<StandardMaterial>>,
	base: Handle<StandardMaterial>,
	beam: Handle<StandardMaterial>,
}

impl Palette {
	fn material(&self, color: CubeColor, class: Classification) -> Handle<StandardMaterial> {
		self.cubes.get(&(color, class)).cloned().unwrap_or_else(|| self.base.clone())
	}
}

// ---------- Entry ----------
fn main() {
	let levels = match builtin_levels() {
		Ok(levels) => levels,
		Err(e) => {
			eprintln!("Failed to load level catalog: {}", e);
			return;
		}
	};
	let config = SessionConfig::default().with_seed(RNG_SEED);
	let current = levels.iter().position(|l| l.name == FIRST_LEVEL).unwrap_or(0);
	let session = match LevelSession::new(levels[current].clone(), config.clone()) {
		Ok(session) => session,
		Err(e) => {
			eprintln!("Failed to start level {}: {}", FIRST_LEVEL, e);
			return;
		}
	};

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Cubelink".to_string(),
				resolution: (1280, 800).into(),
				..Default::default()
			}),
			..Default::default()
		}))
		.add_plugins(EguiPlugin::default())
		// Resources
		.insert_resource(ClearColor(Color::srgb(0.03, 0.03, 0.06)))
		.insert_resource(Game {
			snapshot: session.snapshot(),
			session,
			levels,
			config,
			current,
			paused: false,
			request_rebuild: true,
		})
		.insert_resource(UiState {
			log: vec!["Welcome to Cubelink".to_string()],
			solved_levels: HashSet::new(),
			toast: None,
		})
		// Setup
		.add_systems(Startup, (setup_camera_and_light, setup_palette))
		// Frame systems
		.add_systems(
			Update,
			(
				step_session_from_keys,
				build_scene_when_needed,
				sync_cubes_from_snapshot,
				sync_arm_beam,
				orbit_camera,
				update_toast_timer,
			)
				.chain(),
		)
		.add_systems(EguiPrimaryContextPass, draw_ui)
		.run();
}

// ---------- Setup ----------
fn setup_camera_and_light(mut commands: Commands) {
	commands.spawn((Camera3d::default(), Transform::from_xyz(0.0, 6.0, 10.0), MainCamera));
	commands.spawn((
		DirectionalLight {
			illuminance: 8000.0,
			..Default::default()
		},
		Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
	));
}

fn setup_palette(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
	let colors = [
		CubeColor::Red,
		CubeColor::Blue,
		CubeColor::Green,
		CubeColor::Yellow,
		CubeColor::Neutral,
		CubeColor::Immovable,
	];
	let classes = [
		(Classification::None, DISCONNECTED_SHADE),
		(Classification::Connected, CONNECTED_SHADE),
		(Classification::Generator, GENERATOR_SHADE),
		(Classification::FullyConnected, LINKED_SHADE),
	];
	let mut cubes = HashMap::new();
	for color in colors {
		for (class, shade) in classes {
			let [r, g, b] = color.rgb().map(|c| (c * shade).min(1.0));
			let handle = materials.add(StandardMaterial {
				base_color: Color::srgb(r, g, b),
				perceptual_roughness: 0.6,
				..Default::default()
			});
			cubes.insert((color, class), handle);
		}
	}
	let base = materials.add(StandardMaterial {
		base_color: Color::srgb(0.2, 0.2, 0.24),
		..Default::default()
	});
	let beam = materials.add(StandardMaterial {
		base_color: Color::srgba(0.6, 0.9, 1.0, 0.35),
		alpha_mode: AlphaMode::Blend,
		unlit: true,
		..Default::default()
	});
	commands.insert_resource(Palette { cubes, base, beam });
}

// ---------- Utilities ----------
fn set_toast(ui: &mut UiState, msg: impl Into<String>) {
	ui.toast = Some((msg.into(), 2.0));
}

fn load_level(game: &mut Game, ui: &mut UiState, index: usize) {
	let Some(level) = game.levels.get(index).cloned() else {
		return;
	};
	let name = level.name.clone();
	match LevelSession::new(level, game.config.clone()) {
		Ok(session) => {
			game.snapshot = session.snapshot();
			game.session = session;
			game.current = index;
			game.paused = false;
			game.request_rebuild = true;
			ui.log.push(format!("Loaded level {}", name));
		}
		Err(e) => ui.log.push(format!("Error: {}", e)),
	}
}

// ---------- Systems: Session ----------
fn step_session_from_keys(
	keys: Res<ButtonInput<KeyCode>>,
	time: Res<Time>,
	mut game: ResMut<Game>,
	mut ui: ResMut<UiState>,
) {
	if keys.just_pressed(KeyCode::KeyR) {
		let current = game.current;
		load_level(&mut game, &mut ui, current);
		return;
	}
	if game.paused {
		return;
	}

	let actions: Vec<Action> = KEY_BINDINGS
		.iter()
		.filter(|(key, _)| keys.just_pressed(*key))
		.map(|(_, action)| *action)
		.collect();
	let events = game.session.tick(&actions, time.delta_secs());
	game.snapshot = game.session.snapshot();

	for event in events {
		match event {
			SessionEvent::ColorSolved(color) => {
				ui.log.push(format!("{} linked", color.name()));
			}
			SessionEvent::LevelSolved => {
				let name = game.snapshot.level_name.clone();
				ui.log.push(format!("Level {} solved", name));
				set_toast(&mut ui, format!("Level {} solved!", name));
				ui.solved_levels.insert(name);
			}
			SessionEvent::ExitRequested => {
				game.paused = true;
				set_toast(&mut ui, "Pick a level from the list");
			}
		}
	}
}

// ---------- Systems: Scene ----------
fn build_scene_when_needed(
	mut commands: Commands,
	mut game: ResMut<Game>,
	palette: Res<Palette>,
	mut meshes: ResMut<Assets<Mesh>>,
	existing: Query<Entity, With<LevelScene>>,
) {
	if !game.request_rebuild {
		return;
	}
	for e in &existing {
		commands.entity(e).despawn();
	}

	let size = game.snapshot.size;
	let base = meshes.add(Cuboid::new(size.x as f32, 0.1, size.z as f32));
	commands.spawn((
		Mesh3d(base),
		MeshMaterial3d(palette.base.clone()),
		Transform::from_xyz((size.x as f32 - 1.0) * 0.5, -0.55, (size.z as f32 - 1.0) * 0.5),
		LevelScene,
	));

	let cube_mesh = meshes.add(Cuboid::new(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE));
	for cube in &game.snapshot.cubes {
		commands.spawn((
			Mesh3d(cube_mesh.clone()),
			MeshMaterial3d(palette.material(cube.color, cube.classification)),
			Transform::from_translation(cube.position).with_rotation(cube.orientation),
			CubeTag(cube.id),
			LevelScene,
		));
	}

	let beam = meshes.add(Cylinder::new(1.0, BEAM_LENGTH));
	commands.spawn((
		Mesh3d(beam),
		MeshMaterial3d(palette.beam.clone()),
		Transform::default(),
		ArmBeam,
		LevelScene,
	));
	game.request_rebuild = false;
}

fn sync_cubes_from_snapshot(
	game: Res<Game>,
	palette: Res<Palette>,
	mut q: Query<(&CubeTag, &mut Transform, &mut MeshMaterial3d<StandardMaterial>)>,
) {
	for (tag, mut transform, mut material) in &mut q {
		if let Some(view) = game.snapshot.cubes.get(tag.0.index()) {
			transform.translation = view.position;
			transform.rotation = view.orientation;
			let wanted = palette.material(view.color, view.classification);
			if material.0 != wanted {
				material.0 = wanted;
			}
		}
	}
}

fn sync_arm_beam(game: Res<Game>, mut q: Query<&mut Transform, With<ArmBeam>>) {
	let arm = game.snapshot.arm;
	for mut transform in &mut q {
		transform.translation = Vec3::new(arm.position.x, BEAM_LENGTH * 0.5, arm.position.y);
		transform.scale = Vec3::new(arm.radius, 1.0, arm.radius);
	}
}

fn orbit_camera(game: Res<Game>, mut q_cam: Query<&mut Transform, With<MainCamera>>) {
	let Ok(mut cam_transform) = q_cam.single_mut() else {
		return;
	};
	let size = game.snapshot.size;
	let camera = game.snapshot.camera;
	let centre = Vec3::new((size.x as f32 - 1.0) * 0.5, camera.elevation, (size.z as f32 - 1.0) * 0.5);
	let radius = 2.0 * size.x.max(size.z) as f32 + 2.0;
	// Yaw 0 looks down -Z, matching the grid step of "forward".
	let eye = centre + Vec3::new(-radius * camera.yaw.sin(), size.y as f32 + 2.0, radius * camera.yaw.cos());
	*cam_transform = Transform::from_translation(eye).looking_at(centre, Vec3::Y);
}

// ---------- Systems: Toast ----------
fn update_toast_timer(time: Res<Time>, mut ui: ResMut<UiState>) {
	if let Some((_, ref mut remaining)) = ui.toast {
		*remaining -= time.delta_secs();
		if *remaining <= 0.0 {
			ui.toast = None;
		}
	}
}

// ---------- Systems: UI ----------
fn draw_ui(mut egui_ctx: EguiContexts, mut game: ResMut<Game>, mut ui: ResMut<UiState>) {
	let Ok(ctx) = egui_ctx.ctx_mut() else {
		return;
	};

	// Top HUD
	egui::TopBottomPanel::top("top_hud").show(&*ctx, |ui_top| {
		ui_top.horizontal(|ui_row| {
			ui_row.label(format_hud(&game.snapshot));
			if game.paused {
				ui_row.separator();
				ui_row.label("Paused");
			}
			if let Some((ref msg, _)) = ui.toast {
				ui_row.separator();
				ui_row.colored_label(egui::Color32::YELLOW, msg);
			}
		});
	});

	// Right panel (levels / colour progress / cubes)
	let mut picked = None;
	egui::SidePanel::right("right_panel")
		.resizable(true)
		.default_width(320.0)
		.show(&*ctx, |ui_right| {
			ui_right.heading("Levels");
			ui_right.horizontal_wrapped(|ui_row| {
				for (i, level) in game.levels.iter().enumerate() {
					let label = if ui.solved_levels.contains(&level.name) {
						format!("{} ✓", level.name)
					} else {
						level.name.clone()
					};
					if ui_row.selectable_label(i == game.current, label).clicked() {
						picked = Some(i);
					}
				}
			});
			ui_right.separator();
			ui_right.heading(CUBE_PANEL_HEADING);
			egui::ScrollArea::vertical().show(ui_right, |ui_scroll| {
				for line in format_side_panel(&game.snapshot) {
					ui_scroll.label(line);
				}
			});
		});
	if let Some(i) = picked {
		load_level(&mut game, &mut ui, i);
	}

	// Bottom log
	egui::TopBottomPanel::bottom("bottom_log").resizable(true).show(&*ctx, |ui_bottom| {
		ui_bottom.label(CONTROLS_HINT);
		ui_bottom.separator();
		egui::ScrollArea::vertical().stick_to_bottom(true).show(ui_bottom, |ui_logs| {
			for line in &ui.log {
				ui_logs.label(line);
			}
		});
	});
}
