use serde::{Deserialize, Serialize};

use crate::coords::Column;

/// Abstract per-step input. Device mapping lives with the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
	Move(MoveDirection),
	Activate,
	Cancel,
	RotateCameraLeft,
	RotateCameraRight,
	RaiseCamera,
	LowerCamera,
}

/// Screen-relative direction. Which grid axis it moves along depends on
/// the camera yaw bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
	Forward,
	Left,
	Back,
	Right,
}

impl MoveDirection {
	fn slot(self) -> i32 {
		match self {
			MoveDirection::Forward => 0,
			MoveDirection::Left => 1,
			MoveDirection::Back => 2,
			MoveDirection::Right => 3,
		}
	}

	/// Grid step `(dx, dz)` for this direction seen from `yaw_bucket`
	/// quarter turns.
	pub fn grid_step(self, yaw_bucket: i32) -> (i32, i32) {
		match (self.slot() - yaw_bucket).rem_euclid(4) {
			0 => (0, -1),
			1 => (-1, 0),
			2 => (0, 1),
			_ => (1, 0),
		}
	}

	pub fn apply(self, col: Column, yaw_bucket: i32) -> Column {
		let (dx, dz) = self.grid_step(yaw_bucket);
		Column::new(col.x + dx, col.z + dz)
	}
}
