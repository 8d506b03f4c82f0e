use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::CubeColor;
use crate::config::ConfigError;
use crate::coords::{GridCoord3, GridSize};

const BUILTIN_LEVELS: &str = include_str!("levels.json");

#[derive(Debug, Error)]
pub enum LevelError {
	#[error("Level parse error: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("Invalid grid size {0:?}")]
	InvalidSize(GridSize),
	#[error("Placement {0:?} is outside the grid")]
	OutOfBounds(GridCoord3),
	#[error("Two placements share cell {0:?}")]
	Overlap(GridCoord3),
	#[error("Generators cannot be {0:?}")]
	InvalidGenerator(CubeColor),
	#[error("Level has no generators")]
	NoGenerators,
	#[error("Unknown level: {0}")]
	UnknownLevel(String),
	#[error(transparent)]
	Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
	pub at: GridCoord3,
	pub color: CubeColor,
}

impl Placement {
	pub fn new(at: GridCoord3, color: CubeColor) -> Self {
		Self { at, color }
	}
}

/// Static description of a level: grid size, loose cubes, generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDef {
	#[serde(default)]
	pub name: String,
	pub size: GridSize,
	#[serde(default)]
	pub cubes: Vec<Placement>,
	pub generators: Vec<Placement>,
}

impl LevelDef {
	pub fn from_json_str(s: &str) -> Result<Self, LevelError> {
		let level: LevelDef = serde_json::from_str(s)?;
		level.validate()?;
		Ok(level)
	}

	pub fn validate(&self) -> Result<(), LevelError> {
		if !self.size.is_positive() {
			return Err(LevelError::InvalidSize(self.size));
		}
		if self.generators.is_empty() {
			return Err(LevelError::NoGenerators);
		}
		if let Some(g) = self.generators.iter().find(|g| !g.color.can_generate()) {
			return Err(LevelError::InvalidGenerator(g.color));
		}
		let mut taken = HashSet::new();
		for p in self.cubes.iter().chain(&self.generators) {
			if !self.size.contains(p.at) {
				return Err(LevelError::OutOfBounds(p.at));
			}
			if !taken.insert(p.at) {
				return Err(LevelError::Overlap(p.at));
			}
		}
		Ok(())
	}
}

/// The shipped catalog: tutorials T1–T5, then levels 06–18.
pub fn builtin_levels() -> Result<Vec<LevelDef>, LevelError> {
	let levels: Vec<LevelDef> = serde_json::from_str(BUILTIN_LEVELS)?;
	for level in &levels {
		level.validate()?;
	}
	Ok(levels)
}

pub fn builtin_level(name: &str) -> Result<LevelDef, LevelError> {
	builtin_levels()?
		.into_iter()
		.find(|l| l.name == name)
		.ok_or_else(|| LevelError::UnknownLevel(name.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn builtin_catalog_is_valid() {
		let levels = builtin_levels().unwrap();
		assert_eq!(levels.len(), 18);
		assert_eq!(levels[0].name, "T1");
		assert_eq!(levels[17].name, "18");
	}

	#[test]
	fn lookup_by_name() {
		let t1 = builtin_level("T1").unwrap();
		assert_eq!(t1.size, GridSize::new(2, 1, 3));
		assert_eq!(t1.generators.len(), 2);
		assert!(matches!(builtin_level("nope"), Err(LevelError::UnknownLevel(_))));
	}

	#[test]
	fn parses_compact_json() {
		let text = json!({
			"name": "tiny",
			"size": [2, 1, 1],
			"generators": [{ "at": [0, 0, 0], "color": "red" }]
		})
		.to_string();
		let level = LevelDef::from_json_str(&text).unwrap();
		assert!(level.cubes.is_empty());
		assert_eq!(level.generators[0], Placement::new(GridCoord3::new(0, 0, 0), CubeColor::Red));
	}

	#[test]
	fn rejects_broken_levels() {
		let base = |size: serde_json::Value, cubes: serde_json::Value, generators: serde_json::Value| {
			json!({ "size": size, "cubes": cubes, "generators": generators }).to_string()
		};
		let red = json!([{ "at": [0, 0, 0], "color": "red" }]);

		let err = LevelDef::from_json_str(&base(json!([0, 1, 1]), json!([]), red.clone())).unwrap_err();
		assert!(matches!(err, LevelError::InvalidSize(_)));

		let err = LevelDef::from_json_str(&base(json!([1, 1, 1]), json!([]), json!([]))).unwrap_err();
		assert!(matches!(err, LevelError::NoGenerators));

		let err = LevelDef::from_json_str(&base(
			json!([2, 1, 1]),
			json!([{ "at": [2, 0, 0], "color": "blue" }]),
			red.clone(),
		))
		.unwrap_err();
		assert!(matches!(err, LevelError::OutOfBounds(_)));

		let err = LevelDef::from_json_str(&base(
			json!([2, 1, 1]),
			json!([{ "at": [0, 0, 0], "color": "blue" }]),
			red.clone(),
		))
		.unwrap_err();
		assert!(matches!(err, LevelError::Overlap(_)));

		let err = LevelDef::from_json_str(&base(
			json!([2, 1, 1]),
			json!([]),
			json!([{ "at": [0, 0, 0], "color": "neutral" }]),
		))
		.unwrap_err();
		assert!(matches!(err, LevelError::InvalidGenerator(CubeColor::Neutral)));

		let err = LevelDef::from_json_str("{ \"size\": 3 }").unwrap_err();
		assert!(matches!(err, LevelError::Parse(_)));
	}
}
