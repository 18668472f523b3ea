use super::grid::Idx;

/// Tile value as displayed (2, 4, ... 32768). The search layer works with
/// exponents instead; see [`super::grid::Grid`].
pub(crate) type Value = u16;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TileState {
    Normal,
    /// Merge destination; doubles and scores when the move settles.
    Merging,
    /// Merged away; kept until the animation cycle completes, then discarded.
    Removed,
}

/// Identity-bearing tile used by the live session only. `origin` is the cell
/// the tile occupied before the current move, `target` the cell it ends up in
/// once the move resolves; the presentation layer interpolates between the
/// two while the session is animating.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tile {
    pub(crate) value: Value,
    pub(crate) state: TileState,
    pub(crate) origin: Idx,
    pub(crate) target: Idx,
}

impl Tile {
    pub(crate) fn new(value: Value, at: Idx) -> Self {
        Self {
            value,
            state: TileState::Normal,
            origin: at.clone(),
            target: at,
        }
    }

    /// Two tiles may fuse only when they hold equal values and neither is
    /// already part of a merge this move.
    pub(crate) fn mergeable_with(&self, other: &Tile) -> bool {
        self.value == other.value
            && self.state == TileState::Normal
            && other.state == TileState::Normal
    }

    pub(crate) fn exponent(&self) -> u8 {
        self.value.ilog2() as u8
    }
}
