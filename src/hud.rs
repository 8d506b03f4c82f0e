use crate::connectivity::Classification;
use crate::controller::GrabState;
use crate::session::Snapshot;

pub const PROGRESS_PANEL_HEADING: &str = "Colours";
pub const CUBE_PANEL_HEADING: &str = "Cubes";
pub const CONTROLS_HINT: &str = "Arrows/IJKL move · Space grab/drop · A/D rotate · W/S pan · R restart · Esc exit";

fn state_label(state: GrabState) -> &'static str {
	match state {
		GrabState::Settled => "Ready",
		GrabState::Grabbing => "Lifting...",
		GrabState::Held => "Holding",
		GrabState::Dropping => "Dropping...",
	}
}

pub fn format_hud(snapshot: &Snapshot) -> String {
	let solved = snapshot.progress.values().filter(|p| p.is_solved()).count();
	let status = if snapshot.solved { "Solved!" } else { "In progress" };
	format!(
		"Level {} | Arm ({}, {}) {} | Colours {}/{} | {}",
		snapshot.level_name,
		snapshot.arm.column.x,
		snapshot.arm.column.z,
		state_label(snapshot.arm.state),
		solved,
		snapshot.progress.len(),
		status
	)
}

pub fn format_side_panel(snapshot: &Snapshot) -> Vec<String> {
	let mut out = Vec::new();
	out.push(format!("[{}]", PROGRESS_PANEL_HEADING));
	for (color, p) in &snapshot.progress {
		let mark = if p.is_solved() { "linked" } else { "open" };
		out.push(format!("{} – {}/{} generators – {}", color.name(), p.reached, p.total, mark));
	}
	out.push(format!("[{}]", CUBE_PANEL_HEADING));
	for c in &snapshot.cubes {
		let class = match c.classification {
			Classification::None => "loose",
			Classification::Connected => "connected",
			Classification::FullyConnected => "linked",
			Classification::Generator => "generator",
		};
		let place = match c.grid_position {
			Some(p) => format!("at ({}, {}, {})", p.x, p.y, p.z),
			None => "in the arm".to_string(),
		};
		out.push(format!("#{} {} {} – {}", c.id.index(), c.color.name(), place, class));
	}
	out
}
