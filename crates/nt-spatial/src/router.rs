//! Routing trait and default A* implementation.
//!
//! # Pluggability
//!
//! The scheduler calls routing through the [`Router`] trait, so applications
//! can swap in a cached or multi-target search without touching planning.
//! The default [`AStarRouter`] is a 4-neighbour A* over tile costs.
//!
//! # Paths
//!
//! A path is the full cell sequence from `start` to `end`, both included.
//! Its cost is the sum of the entry costs of every cell after `start`
//! (see [`Grid::path_cost`]).  An empty path means "no move": the endpoints
//! coincide, the goal is a wall or off the grid, or it is unreachable.
//!
//! # Zone targets
//!
//! [`Router::find_path_to_zone`] runs one full search per non-wall cell of the
//! zone and keeps the shortest result, so its cost grows with zone area.
//! Zones in town maps are a few dozen cells; a router for large zones should
//! override it with a multi-target search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use nt_core::Cell;

use crate::grid::Grid;
use crate::zone::ZoneMap;

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path search.
pub trait Router {
    /// Cost-optimal 4-neighbour path from `start` to `end`.
    fn find_path(&self, grid: &Grid, start: Cell, end: Cell) -> Vec<Cell>;

    /// Shortest path (in cells) from `start` to any reachable non-wall cell
    /// of the zone named `zone`.
    ///
    /// Candidate cells are tried row by row; the first of several equally
    /// short paths wins.  Empty if the zone is unknown or no cell of it can
    /// be reached.
    fn find_path_to_zone(
        &self,
        grid: &Grid,
        zones: &ZoneMap,
        start: Cell,
        zone: &str,
    ) -> Vec<Cell> {
        let Some(zone) = zones.get(zone) else {
            return Vec::new();
        };

        let mut best: Vec<Cell> = Vec::new();
        for cell in zone.cells().filter(|&c| grid.is_passable(c)) {
            let path = self.find_path(grid, start, cell);
            if !path.is_empty() && (best.is_empty() || path.len() < best.len()) {
                best = path;
            }
        }
        best
    }
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* with the Manhattan heuristic.
///
/// Every passable tile costs at least 1 to enter, so Manhattan distance never
/// overestimates and the first time the goal is popped its cost is optimal.
/// Heap ties break on `(f, cell)` order, which makes results deterministic.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter;

impl Router for AStarRouter {
    fn find_path(&self, grid: &Grid, start: Cell, end: Cell) -> Vec<Cell> {
        astar(grid, start, end).unwrap_or_default()
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

fn astar(grid: &Grid, start: Cell, end: Cell) -> Option<Vec<Cell>> {
    if start == end || !grid.is_passable(end) {
        return None;
    }
    let start_idx = grid.index_of(start)?;

    let n = grid.cell_count();
    // g[i] = best known cost from start to cell i.
    let mut g    = vec![u64::MAX; n];
    // prev[i] = predecessor on the best known path; None for start/unreached.
    let mut prev: Vec<Option<Cell>> = vec![None; n];

    g[start_idx] = 0;

    // Min-heap on (f, g, cell).
    let mut open: BinaryHeap<Reverse<(u64, u64, Cell)>> = BinaryHeap::new();
    open.push(Reverse((start.manhattan(end) as u64, 0, start)));

    while let Some(Reverse((_, cost, cell))) = open.pop() {
        if cell == end {
            return Some(reconstruct(grid, &prev, end));
        }

        // Skip stale heap entries.
        let idx = grid.index_of(cell)?;
        if cost > g[idx] {
            continue;
        }

        for next in cell.neighbors4() {
            let Some(tile) = grid.at(next) else { continue };
            if tile.is_wall() {
                continue;
            }
            let Some(next_idx) = grid.index_of(next) else { continue };
            let new_cost = cost + tile.cost as u64;
            if new_cost < g[next_idx] {
                g[next_idx] = new_cost;
                prev[next_idx] = Some(cell);
                let f = new_cost + next.manhattan(end) as u64;
                open.push(Reverse((f, new_cost, next)));
            }
        }
    }

    None
}

fn reconstruct(grid: &Grid, prev: &[Option<Cell>], end: Cell) -> Vec<Cell> {
    let mut path = vec![end];
    let mut cur = end;
    while let Some(p) = grid.index_of(cur).and_then(|i| prev[i]) {
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}
