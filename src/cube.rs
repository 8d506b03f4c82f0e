use bevy::math::Quat;
use serde::{Deserialize, Serialize};

use crate::color::CubeColor;
use crate::coords::GridCoord3;

/// Index of a cube in its level's [`CubeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeId(pub usize);

impl CubeId {
	pub fn index(self) -> usize {
		self.0
	}
}

#[derive(Debug, Clone)]
pub struct Cube {
	pub id: CubeId,
	/// Last committed cell. While held, only `x`/`z` follow the arm.
	pub position: GridCoord3,
	pub color: CubeColor,
	pub generator: bool,
	pub orientation: Quat,
}

impl Cube {
	pub fn new(id: CubeId, position: GridCoord3, color: CubeColor, generator: bool) -> Self {
		Self { id, position, color, generator, orientation: Quat::IDENTITY }
	}

	pub fn is_grabbable(&self) -> bool {
		!self.generator && self.color.is_movable()
	}
}

/// Owns every cube of a level. Cubes are created at load and never removed.
#[derive(Debug, Clone, Default)]
pub struct CubeRegistry {
	cubes: Vec<Cube>,
}

impl CubeRegistry {
	pub fn new() -> Self {
		Self { cubes: Vec::new() }
	}

	pub fn spawn(&mut self, position: GridCoord3, color: CubeColor, generator: bool) -> CubeId {
		let id = CubeId(self.cubes.len());
		self.cubes.push(Cube::new(id, position, color, generator));
		id
	}

	pub fn len(&self) -> usize {
		self.cubes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cubes.is_empty()
	}

	pub fn get(&self, id: CubeId) -> &Cube {
		match self.cubes.get(id.index()) {
			Some(cube) => cube,
			None => panic!("cube {:?} is not registered in this level", id),
		}
	}

	pub fn get_mut(&mut self, id: CubeId) -> &mut Cube {
		match self.cubes.get_mut(id.index()) {
			Some(cube) => cube,
			None => panic!("cube {:?} is not registered in this level", id),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Cube> {
		self.cubes.iter()
	}

	pub fn generators(&self) -> impl Iterator<Item = &Cube> {
		self.cubes.iter().filter(|c| c.generator)
	}
}
