//! # Pathfinding Algorithms
//!
//! Breadth-first exploration over walkable terrain.
//!
//! One bounded flood fill backs every connectivity question the generator
//! asks: island detection, landmass labelling for bridges and chest
//! reachability from the spawn.

use crate::{Grid, Position};
use std::collections::{HashSet, VecDeque};

/// Limits applied to a single flood fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloodLimits {
    /// Stop once more than this many cells have been visited
    pub budget: Option<usize>,
    /// Stop as soon as this cell is discovered
    pub target: Option<Position>,
}

impl FloodLimits {
    /// Explore the whole connected region.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Search for `target`, giving up after `budget` visited cells.
    pub fn search(target: Position, budget: usize) -> Self {
        Self {
            budget: Some(budget),
            target: Some(target),
        }
    }
}

/// Outcome of a flood fill.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FloodResult {
    /// Visited cells in discovery order, starting with the start cell
    pub cells: Vec<Position>,
    pub reached_target: bool,
    /// The visit budget ran out before the region was exhausted
    pub truncated: bool,
}

/// 4-directional breadth-first flood fill over walkable cells.
///
/// The start cell is always visited. Neighbours are only entered when they
/// are walkable on `grid`.
///
/// # Examples
///
/// ```
/// use verdant::{flood_fill, FloodLimits, Grid, Position, TerrainKind};
///
/// let mut grid = Grid::new(5, 1);
/// grid.set(Position::new(2, 0), TerrainKind::Rock);
///
/// let left = flood_fill(&grid, Position::new(0, 0), FloodLimits::unbounded());
/// assert_eq!(left.cells.len(), 2);
/// assert!(!left.truncated);
/// ```
pub fn flood_fill(grid: &Grid, start: Position, limits: FloodLimits) -> FloodResult {
    let mut result = FloodResult::default();

    if limits.target == Some(start) {
        result.cells.push(start);
        result.reached_target = true;
        return result;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    result.cells.push(start);

    while let Some(pos) = queue.pop_front() {
        for next in pos.cardinal_adjacent_positions() {
            if visited.contains(&next) || !grid.is_walkable_at(next) {
                continue;
            }

            visited.insert(next);
            result.cells.push(next);

            if limits.target == Some(next) {
                result.reached_target = true;
                return result;
            }

            if let Some(budget) = limits.budget {
                if visited.len() > budget {
                    result.truncated = true;
                    return result;
                }
            }

            queue.push_back(next);
        }
    }

    result
}

/// Whether `to` can be reached from `from` within `budget` visited cells.
///
/// A budget smaller than the true distance yields a false negative; callers
/// treat the answer as "reachable cheaply".
pub fn is_reachable(grid: &Grid, from: Position, to: Position, budget: usize) -> bool {
    flood_fill(grid, from, FloodLimits::search(to, budget)).reached_target
}

/// All maximal 4-connected regions of walkable cells.
///
/// Regions are ordered by the row-major position of their first cell.
pub fn connected_components(grid: &Grid) -> Vec<Vec<Position>> {
    let mut seen = vec![false; grid.len()];
    let mut components = Vec::new();
    let width = grid.width() as usize;

    for pos in grid.positions() {
        let index = pos.y as usize * width + pos.x as usize;
        if seen[index] || !grid.is_walkable_at(pos) {
            continue;
        }

        let region = flood_fill(grid, pos, FloodLimits::unbounded()).cells;
        for cell in &region {
            seen[cell.y as usize * width + cell.x as usize] = true;
        }
        components.push(region);
    }

    components
}
