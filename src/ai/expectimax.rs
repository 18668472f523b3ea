use crate::engine::grid::{Direction, Grid};
use crate::engine::session::Score;

use super::{heuristic, DepthPolicy, Policy};

/// Sentinel for a board with no legal move left: worse than any reachable
/// evaluation, but still a well-defined operand for the max fold above it.
const DEAD_END: f64 = f64::MIN;

/// Whose turn a search node represents: the searching agent's own move
/// choice (maximizing) or the environment's random tile placement
/// (probability-weighted average).
#[derive(Clone, Copy, Debug)]
enum Layer {
    Player,
    Chance,
}

/// Expectimax decision engine. Deterministic: for a fixed grid and depth the
/// same direction comes back every time; all randomness in the game lives in
/// the spawner, not here.
pub(crate) struct Expectimax {
    depth: DepthPolicy,
}

impl Expectimax {
    pub(crate) fn new(depth: DepthPolicy) -> Self {
        Self { depth }
    }

    /// Evaluates every direction that changes the board and keeps the
    /// strictly best one; ties keep the first-found direction in enumeration
    /// order. `None` when nothing is legal.
    pub(crate) fn best_move(&self, grid: &Grid, score: Score) -> Option<Direction> {
        let depth = self.depth.depth_for(score, grid.occupied());
        let mut best: Option<(Direction, f64)> = None;
        for direction in Direction::ALL {
            let Some(child) = grid.shifted(direction) else {
                continue;
            };
            let value = expectimax(&child, depth, Layer::Chance);
            log::trace!("depth {} {:?} -> {:.3}", depth, direction, value);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((direction, value)),
            }
        }
        best.map(|(direction, _)| direction)
    }
}

impl Policy for Expectimax {
    fn pick_move(&mut self, grid: &Grid, score: Score) -> Option<Direction> {
        self.best_move(grid, score)
    }
}

fn expectimax(grid: &Grid, depth: u8, layer: Layer) -> f64 {
    if depth == 0 {
        return heuristic::evaluate(grid);
    }
    match layer {
        Layer::Player => {
            let mut best = DEAD_END;
            for direction in Direction::ALL {
                if let Some(child) = grid.shifted(direction) {
                    best = best.max(expectimax(&child, depth - 1, Layer::Chance));
                }
            }
            // DEAD_END survives when no direction is legal
            best
        }
        Layer::Chance => {
            let empty = grid.empty_cells();
            if empty.is_empty() {
                // degenerate case; the session's loss check keeps full dead
                // boards out of the search
                return heuristic::evaluate(grid);
            }
            let cell_weight = 1.0 / empty.len() as f64;
            let mut total = 0.0;
            for idx in &empty {
                for (exponent, probability) in [(1u8, 0.9), (2u8, 0.1)] {
                    let mut child = *grid;
                    child.set(idx, exponent);
                    total +=
                        probability * cell_weight * expectimax(&child, depth - 1, Layer::Player);
                }
            }
            total
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ai::heuristic::evaluate;
    use crate::engine::grid::Idx;

    fn grid(cells: [[u8; 4]; 4]) -> Grid {
        Grid::from_exponents(cells)
    }

    #[test]
    fn repeated_searches_agree() {
        let g = grid([
            [3, 2, 1, 0],
            [1, 3, 0, 0],
            [0, 1, 0, 0],
            [0, 0, 0, 1],
        ]);
        let search = Expectimax::new(DepthPolicy::Fixed(3));
        let first = search.best_move(&g, 0);
        assert!(first.is_some());
        for _ in 0..5 {
            assert_eq!(search.best_move(&g, 0), first);
        }
    }

    #[test]
    fn prefers_merging_into_the_scan_corner() {
        let g = grid([
            [5, 5, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let search = Expectimax::new(DepthPolicy::Fixed(1));
        assert_eq!(search.best_move(&g, 0), Some(Direction::Left));
    }

    #[test]
    fn dead_board_yields_no_move() {
        let g = grid([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 2],
            [2, 1, 2, 1],
        ]);
        let search = Expectimax::new(DepthPolicy::Fixed(4));
        assert_eq!(search.best_move(&g, 0), None);
    }

    #[test]
    fn chance_layer_blends_the_forced_spawn() {
        // one empty cell: the chance value must be exactly the 0.9/0.1 blend
        // of the two possible spawns
        let g = grid([
            [1, 2, 3, 4],
            [5, 6, 7, 8],
            [1, 2, 3, 4],
            [5, 6, 7, 0],
        ]);
        let mut with_two = g;
        with_two.set(&Idx(3, 3), 1);
        let mut with_four = g;
        with_four.set(&Idx(3, 3), 2);
        let expected = 0.9 * evaluate(&with_two) + 0.1 * evaluate(&with_four);
        let actual = expectimax(&g, 1, Layer::Chance);
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn chance_weights_are_normalized_over_empty_cells() {
        let g = grid([
            [3, 2, 0, 0],
            [1, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 1],
        ]);
        let empty = g.empty_cells();
        let cell_weight = 1.0 / empty.len() as f64;
        let mut expected = 0.0;
        for idx in &empty {
            for (exponent, probability) in [(1u8, 0.9), (2u8, 0.1)] {
                let mut child = g;
                child.set(idx, exponent);
                expected += probability * cell_weight * evaluate(&child);
            }
        }
        let actual = expectimax(&g, 1, Layer::Chance);
        assert!((actual - expected).abs() < 1e-9);
    }

    #[test]
    fn player_layer_reports_dead_ends_as_worst_possible() {
        let g = grid([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 1, 2],
            [2, 1, 2, 1],
        ]);
        assert_eq!(expectimax(&g, 2, Layer::Player), DEAD_END);
    }
}
