/// Category key for a cube's colour. Compared by variant, never by RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeColor {
	Red,
	Blue,
	Green,
	Yellow,
	Neutral,
	Immovable,
}

impl CubeColor {
	pub const PALETTE: [CubeColor; 4] = [CubeColor::Red, CubeColor::Blue, CubeColor::Green, CubeColor::Yellow];

	pub fn is_movable(self) -> bool {
		!matches!(self, CubeColor::Immovable)
	}

	/// Only palette colours may own generators.
	pub fn can_generate(self) -> bool {
		Self::PALETTE.contains(&self)
	}

	pub fn name(self) -> &'static str {
		match self {
			CubeColor::Red => "Red",
			CubeColor::Blue => "Blue",
			CubeColor::Green => "Green",
			CubeColor::Yellow => "Yellow",
			CubeColor::Neutral => "Neutral",
			CubeColor::Immovable => "Immovable",
		}
	}

	/// Base sRGB colour, for presentation only.
	pub fn rgb(self) -> [f32; 3] {
		match self {
			CubeColor::Red => [247.0 / 255.0, 57.0 / 255.0, 76.0 / 255.0],
			CubeColor::Blue => [86.0 / 255.0, 128.0 / 255.0, 235.0 / 255.0],
			CubeColor::Green => [103.0 / 255.0, 189.0 / 255.0, 89.0 / 255.0],
			CubeColor::Yellow => [242.0 / 255.0, 226.0 / 255.0, 81.0 / 255.0],
			CubeColor::Neutral => [0.6, 0.6, 0.6],
			CubeColor::Immovable => [0.1, 0.1, 0.1],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn movable_flags() {
		assert!(CubeColor::Red.is_movable());
		assert!(CubeColor::Neutral.is_movable());
		assert!(!CubeColor::Immovable.is_movable());
	}

	#[test]
	fn reserved_categories_cannot_generate() {
		assert!(CubeColor::Yellow.can_generate());
		assert!(!CubeColor::Neutral.can_generate());
		assert!(!CubeColor::Immovable.can_generate());
	}

	#[test]
	fn lowercase_names_on_the_wire() {
		let c: CubeColor = serde_json::from_str("\"immovable\"").unwrap();
		assert_eq!(c, CubeColor::Immovable);
		assert_eq!(serde_json::to_string(&CubeColor::Green).unwrap(), "\"green\"");
	}
}
