use crate::engine::grid::Grid;

const WEIGHT_DECAY: f64 = 0.25;

/// Desirability of a board snapshot: each cell contributes
/// `2^exponent * weight` in row-major scan order, with the weight shrinking
/// fourfold per cell. The steep decay means large values concentrated toward
/// the first-scanned corner dominate the total, so compact ordered boards
/// score far above spread-out ones holding the same tiles. Empty cells carry
/// `2^0` by construction; they decay away just like everything else.
pub(crate) fn evaluate(grid: &Grid) -> f64 {
    let mut weight = 1.0;
    let mut score = 0.0;
    for row in grid.rows() {
        for &exponent in row {
            score += f64::from(1u32 << exponent) * weight;
            weight *= WEIGHT_DECAY;
        }
    }
    score
}
