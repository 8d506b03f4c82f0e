use serde::{Deserialize, Serialize};

/// Integer cell coordinate. `y` is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct GridCoord3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord3 {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn column(self) -> Column {
        Column::new(self.x, self.z)
    }

    pub fn offset(self, (dx, dy, dz): (i32, i32, i32)) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl From<[i32; 3]> for GridCoord3 {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<GridCoord3> for [i32; 3] {
    fn from(c: GridCoord3) -> Self {
        [c.x, c.y, c.z]
    }
}

/// Face-adjacent offsets: ±X, ±Y, ±Z. No diagonals.
pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// A vertical stack, identified by its `(x, z)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub x: i32,
    pub z: i32,
}

impl Column {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn at_height(self, y: i32) -> GridCoord3 {
        GridCoord3::new(self.x, y, self.z)
    }

    /// The 3×3 block of columns centred here, including diagonals and
    /// columns that fall outside any grid.
    pub fn neighbourhood(self) -> impl Iterator<Item = Column> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dz| Column::new(self.x + dx, self.z + dz)))
    }
}

/// Dimensions of a level grid, fixed for the level's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct GridSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridSize {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn is_positive(&self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }

    pub fn cell_count(&self) -> usize {
        if !self.is_positive() {
            return 0;
        }
        (self.x as usize) * (self.y as usize) * (self.z as usize)
    }

    pub fn contains(&self, c: GridCoord3) -> bool {
        c.x >= 0 && c.y >= 0 && c.z >= 0 && c.x < self.x && c.y < self.y && c.z < self.z
    }

    pub fn contains_column(&self, c: Column) -> bool {
        c.x >= 0 && c.z >= 0 && c.x < self.x && c.z < self.z
    }

    pub fn clamp_column(&self, c: Column) -> Column {
        Column::new(c.x.clamp(0, (self.x - 1).max(0)), c.z.clamp(0, (self.z - 1).max(0)))
    }

    /// Column the arm starts over: the middle of the base, rounding up.
    pub fn centre_column(&self) -> Column {
        Column::new(self.x / 2, self.z / 2)
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = Column> {
        let (sx, sz) = (self.x, self.z);
        (0..sx).flat_map(move |x| (0..sz).map(move |z| Column::new(x, z)))
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = GridCoord3> {
        let (sx, sy, sz) = (self.x, self.y, self.z);
        (0..sx).flat_map(move |x| (0..sy).flat_map(move |y| (0..sz).map(move |z| GridCoord3 { x, y, z })))
    }
}

impl From<[i32; 3]> for GridSize {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<GridSize> for [i32; 3] {
    fn from(s: GridSize) -> Self {
        [s.x, s.y, s.z]
    }
}
