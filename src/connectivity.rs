use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::color::CubeColor;
use crate::coords::NEIGHBOR_OFFSETS;
use crate::cube::{Cube, CubeId, CubeRegistry};
use crate::grid::GridIndex;

/// How a cube should be presented after a connectivity pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    None,
    Connected,
    FullyConnected,
    Generator,
}

/// Best coverage reached by any single network of one colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorProgress {
    pub reached: usize,
    pub total: usize,
}

impl ColorProgress {
    pub fn is_solved(&self) -> bool {
        self.reached == self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityReport {
    pub connected: BTreeSet<CubeId>,
    pub fully_connected: BTreeSet<CubeId>,
    pub solved_colors: BTreeSet<CubeColor>,
    pub progress: BTreeMap<CubeColor, ColorProgress>,
    pub solved: bool,
}

impl ConnectivityReport {
    pub fn classify(&self, cube: &Cube) -> Classification {
        if self.fully_connected.contains(&cube.id) {
            Classification::FullyConnected
        } else if self.connected.contains(&cube.id) {
            Classification::Connected
        } else if cube.generator {
            Classification::Generator
        } else {
            Classification::None
        }
    }
}

/// Per-colour flood fill over the settled grid.
#[derive(Debug, Clone)]
pub struct ConnectivityAnalyzer {
    generator_counts: BTreeMap<CubeColor, usize>,
}

impl ConnectivityAnalyzer {
    pub fn new(cubes: &CubeRegistry) -> Self {
        let mut generator_counts = BTreeMap::new();
        for g in cubes.generators() {
            *generator_counts.entry(g.color).or_insert(0) += 1;
        }
        Self { generator_counts }
    }

    pub fn generator_count(&self, color: CubeColor) -> usize {
        self.generator_counts.get(&color).copied().unwrap_or(0)
    }

    /// Recomputes every set from scratch. Generators are flooded one at a
    /// time with nothing shared between floods.
    pub fn analyze(&self, grid: &GridIndex, cubes: &CubeRegistry) -> ConnectivityReport {
        let mut report = ConnectivityReport::default();
        for (&color, &total) in &self.generator_counts {
            report.progress.insert(color, ColorProgress { reached: 0, total });
        }

        for generator in cubes.generators() {
            let visited = flood(grid, cubes, generator);
            let reached = visited
                .iter()
                .filter(|&&id| cubes.get(id).generator)
                .count();
            let total = self.generator_count(generator.color);

            if let Some(p) = report.progress.get_mut(&generator.color) {
                p.reached = p.reached.max(reached);
            }

            if reached == total {
                report.solved_colors.insert(generator.color);
                report.fully_connected.extend(visited);
            } else {
                report
                    .connected
                    .extend(visited.into_iter().filter(|&id| !cubes.get(id).generator));
            }
        }

        report.solved = report.solved_colors.len() == self.generator_counts.len();
        report
    }
}

/// Same-colour cubes reachable from `start` through face-adjacent cells.
/// Uses an explicit worklist; the result is sorted by id.
pub fn flood(grid: &GridIndex, cubes: &CubeRegistry, start: &Cube) -> Vec<CubeId> {
    flood_in_order(grid, cubes, start, &NEIGHBOR_OFFSETS)
}

fn flood_in_order(
    grid: &GridIndex,
    cubes: &CubeRegistry,
    start: &Cube,
    offsets: &[(i32, i32, i32)],
) -> Vec<CubeId> {
    match grid.occupant(start.position) {
        Some(id) if id == start.id => {}
        other => panic!(
            "generator {:?} expected at {:?}, grid holds {:?}",
            start.id, start.position, other
        ),
    }

    let mut seen = vec![false; cubes.len()];
    let mut worklist = vec![start.id];
    let mut visited = Vec::new();
    seen[start.id.index()] = true;

    while let Some(id) = worklist.pop() {
        visited.push(id);
        let pos = cubes.get(id).position;
        for &offset in offsets {
            let Some(next) = grid.occupant(pos.offset(offset)) else {
                continue;
            };
            if seen[next.index()] || cubes.get(next).color != start.color {
                continue;
            }
            seen[next.index()] = true;
            worklist.push(next);
        }
    }

    visited.sort_unstable();
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{GridCoord3, GridSize};

    fn build(size: GridSize, placements: &[((i32, i32, i32), CubeColor, bool)]) -> (GridIndex, CubeRegistry) {
        let mut grid = GridIndex::new(size);
        let mut cubes = CubeRegistry::new();
        for &((x, y, z), color, generator) in placements {
            let at = GridCoord3::new(x, y, z);
            let id = cubes.spawn(at, color, generator);
            grid.place(id, at);
        }
        (grid, cubes)
    }

    #[test]
    fn single_generator_colour_is_solved_at_load() {
        let (grid, cubes) = build(
            GridSize::new(2, 1, 3),
            &[
                ((0, 0, 0), CubeColor::Red, false),
                ((0, 0, 2), CubeColor::Red, false),
                ((1, 0, 1), CubeColor::Red, true),
            ],
        );
        let report = ConnectivityAnalyzer::new(&cubes).analyze(&grid, &cubes);
        assert!(report.solved);
        assert!(report.solved_colors.contains(&CubeColor::Red));
        assert_eq!(report.fully_connected.len(), 1);
        assert!(report.fully_connected.contains(&CubeId(2)));
        assert!(report.connected.is_empty());
        assert_eq!(report.classify(cubes.get(CubeId(0))), Classification::None);
    }

    #[test]
    fn partial_network_marks_non_generators_connected() {
        let (grid, cubes) = build(
            GridSize::new(4, 1, 1),
            &[
                ((0, 0, 0), CubeColor::Red, true),
                ((1, 0, 0), CubeColor::Red, false),
                ((3, 0, 0), CubeColor::Red, true),
            ],
        );
        let report = ConnectivityAnalyzer::new(&cubes).analyze(&grid, &cubes);
        assert!(!report.solved);
        assert_eq!(report.connected.iter().copied().collect::<Vec<_>>(), vec![CubeId(1)]);
        assert!(report.fully_connected.is_empty());
        assert_eq!(report.classify(cubes.get(CubeId(0))), Classification::Generator);
        assert_eq!(report.classify(cubes.get(CubeId(1))), Classification::Connected);
        assert_eq!(
            report.progress[&CubeColor::Red],
            ColorProgress { reached: 1, total: 2 }
        );
    }

    #[test]
    fn bridge_completes_the_colour() {
        let (grid, cubes) = build(
            GridSize::new(3, 2, 1),
            &[
                ((0, 0, 0), CubeColor::Red, true),
                ((0, 1, 0), CubeColor::Red, false),
                ((1, 1, 0), CubeColor::Red, false),
                ((2, 1, 0), CubeColor::Red, false),
                ((2, 0, 0), CubeColor::Red, true),
                ((1, 0, 0), CubeColor::Neutral, false),
            ],
        );
        let report = ConnectivityAnalyzer::new(&cubes).analyze(&grid, &cubes);
        assert!(report.solved);
        assert_eq!(report.fully_connected.len(), 5);
        assert!(!report.fully_connected.contains(&CubeId(5)));
        assert_eq!(report.classify(cubes.get(CubeId(0))), Classification::FullyConnected);
    }

    #[test]
    fn colours_do_not_mix() {
        let (grid, cubes) = build(
            GridSize::new(3, 1, 1),
            &[
                ((0, 0, 0), CubeColor::Red, true),
                ((1, 0, 0), CubeColor::Blue, false),
                ((2, 0, 0), CubeColor::Red, true),
            ],
        );
        let report = ConnectivityAnalyzer::new(&cubes).analyze(&grid, &cubes);
        assert!(!report.solved);
        assert!(report.connected.is_empty());
    }

    #[test]
    fn every_colour_with_generators_must_be_solved() {
        let (grid, cubes) = build(
            GridSize::new(3, 1, 2),
            &[
                ((0, 0, 0), CubeColor::Red, true),
                ((1, 0, 0), CubeColor::Red, true),
                ((0, 0, 1), CubeColor::Blue, true),
                ((2, 0, 1), CubeColor::Blue, true),
            ],
        );
        let report = ConnectivityAnalyzer::new(&cubes).analyze(&grid, &cubes);
        assert!(report.solved_colors.contains(&CubeColor::Red));
        assert!(!report.solved_colors.contains(&CubeColor::Blue));
        assert!(!report.solved);
    }

    // Every ordering of the six face offsets, by Heap's algorithm.
    fn offset_orders() -> Vec<Vec<(i32, i32, i32)>> {
        let mut current = NEIGHBOR_OFFSETS.to_vec();
        let mut counters = [0usize; 6];
        let mut orders = vec![current.clone()];
        let mut i = 1;
        while i < current.len() {
            if counters[i] < i {
                let j = if i % 2 == 0 { 0 } else { counters[i] };
                current.swap(j, i);
                orders.push(current.clone());
                counters[i] += 1;
                i = 1;
            } else {
                counters[i] = 0;
                i += 1;
            }
        }
        orders
    }

    #[test]
    fn flood_result_does_not_depend_on_scan_order() {
        let orders = offset_orders();
        assert_eq!(orders.len(), 720);
        for level in crate::level::builtin_levels().unwrap() {
            let mut grid = GridIndex::new(level.size);
            let mut cubes = CubeRegistry::new();
            let placements = level.cubes.iter().map(|p| (p, false)).chain(level.generators.iter().map(|p| (p, true)));
            for (p, generator) in placements {
                let id = cubes.spawn(p.at, p.color, generator);
                grid.place(id, p.at);
            }
            for generator in cubes.generators() {
                let expected = flood(&grid, &cubes, generator);
                for order in &orders {
                    assert_eq!(
                        flood_in_order(&grid, &cubes, generator, order),
                        expected,
                        "level {} generator {:?}",
                        level.name,
                        generator.id
                    );
                }
            }
        }
    }

    #[test]
    fn flood_ignores_diagonals() {
        let (grid, cubes) = build(
            GridSize::new(2, 2, 1),
            &[
                ((0, 0, 0), CubeColor::Green, true),
                ((1, 1, 0), CubeColor::Green, false),
            ],
        );
        let visited = flood(&grid, &cubes, cubes.get(CubeId(0)));
        assert_eq!(visited, vec![CubeId(0)]);
    }
}
