use crate::coords::{Column, GridCoord3, GridSize};
use crate::cube::CubeId;

/// Dense occupancy table. Cells hold cube ids, never the cubes themselves.
#[derive(Debug, Clone)]
pub struct GridIndex {
    size: GridSize,
    cells: Vec<Option<CubeId>>,
}

impl GridIndex {
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![None; size.cell_count()],
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    fn index(&self, c: GridCoord3) -> Option<usize> {
        if !self.size.contains(c) {
            return None;
        }
        let idx = ((c.x * self.size.y + c.y) * self.size.z + c.z) as usize;
        Some(idx)
    }

    /// Cube at `c`, or `None` for empty and out-of-range cells.
    pub fn occupant(&self, c: GridCoord3) -> Option<CubeId> {
        self.index(c).and_then(|i| self.cells[i])
    }

    /// Height of the highest occupied cell in the column. Columns off the
    /// grid are simply empty.
    pub fn top_cube(&self, col: Column) -> Option<i32> {
        if !self.size.contains_column(col) {
            return None;
        }
        (0..self.size.y)
            .rev()
            .find(|&y| self.occupant(col.at_height(y)).is_some())
    }

    /// `1 + max(floor, tallest stack in the 3×3 block around col)`, where an
    /// empty stack counts as -1.
    pub fn neighbour_level(&self, col: Column, floor: i32) -> i32 {
        col.neighbourhood()
            .map(|c| self.top_cube(c).unwrap_or(-1))
            .fold(floor, i32::max)
            + 1
    }

    /// Panics if `c` is off the grid or already occupied.
    pub fn place(&mut self, id: CubeId, c: GridCoord3) {
        let Some(i) = self.index(c) else {
            panic!("cube {:?} placed outside the grid at {:?}", id, c);
        };
        if let Some(existing) = self.cells[i] {
            panic!("cell {:?} already holds {:?}, cannot place {:?}", c, existing, id);
        }
        self.cells[i] = Some(id);
    }

    /// Empties the cell and returns what was there.
    pub fn clear(&mut self, c: GridCoord3) -> Option<CubeId> {
        let i = self.index(c)?;
        self.cells[i].take()
    }

    pub fn occupied(&self) -> impl Iterator<Item = (GridCoord3, CubeId)> + '_ {
        self.size
            .iter_cells()
            .filter_map(|c| self.occupant(c).map(|id| (c, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridIndex {
        GridIndex::new(GridSize::new(3, 3, 2))
    }

    #[test]
    fn index_and_bounds() {
        let g = grid();
        assert!(g.index(GridCoord3::new(0, 0, 0)).is_some());
        assert!(g.index(GridCoord3::new(2, 2, 1)).is_some());
        assert!(g.index(GridCoord3::new(-1, 0, 0)).is_none());
        assert!(g.index(GridCoord3::new(0, 3, 0)).is_none());
        assert!(g.index(GridCoord3::new(0, 0, 2)).is_none());
    }

    #[test]
    fn place_and_clear() {
        let mut g = grid();
        let c = GridCoord3::new(1, 0, 1);
        g.place(CubeId(4), c);
        assert_eq!(g.occupant(c), Some(CubeId(4)));
        assert_eq!(g.clear(c), Some(CubeId(4)));
        assert_eq!(g.occupant(c), None);
        assert_eq!(g.clear(GridCoord3::new(9, 9, 9)), None);
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn overlap_is_fatal() {
        let mut g = grid();
        g.place(CubeId(0), GridCoord3::new(0, 0, 0));
        g.place(CubeId(1), GridCoord3::new(0, 0, 0));
    }

    #[test]
    fn top_cube_skips_gaps() {
        let mut g = grid();
        assert_eq!(g.top_cube(Column::new(0, 0)), None);
        g.place(CubeId(0), GridCoord3::new(0, 0, 0));
        g.place(CubeId(1), GridCoord3::new(0, 2, 0));
        assert_eq!(g.top_cube(Column::new(0, 0)), Some(2));
    }

    #[test]
    fn off_grid_columns_are_empty() {
        let g = grid();
        for col in Column::new(0, 0).neighbourhood() {
            if !g.size().contains_column(col) {
                assert_eq!(g.top_cube(col), None);
            }
        }
        assert_eq!(g.top_cube(Column::new(-1, -1)), None);
        assert_eq!(g.top_cube(Column::new(3, 2)), None);
        assert_eq!(g.occupant(GridCoord3::new(5, -2, 0)), None);
    }

    #[test]
    fn neighbour_level_counts_diagonals() {
        let mut g = grid();
        g.place(CubeId(0), GridCoord3::new(1, 0, 1));
        g.place(CubeId(1), GridCoord3::new(1, 1, 1));
        // Corner column with the tall stack on its diagonal.
        assert_eq!(g.neighbour_level(Column::new(0, 0), -1), 2);
        assert_eq!(g.neighbour_level(Column::new(0, 0), 2), 3);
        // Nothing nearby.
        let empty = grid();
        assert_eq!(empty.neighbour_level(Column::new(2, 1), -1), 0);
    }
}
