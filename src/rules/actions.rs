//! Movement legality shared by both variants.

use crate::core::{Direction, Grid, LegalActions};
use crate::state::Configuration;

/// Every move that does not walk into a wall.
///
/// An agent between cells can only keep going the way it faces. On a cell,
/// each unblocked cardinal direction is legal, and so is `Stop`.
#[must_use]
pub fn possible_actions(config: Configuration, walls: &Grid) -> LegalActions {
    if !config.is_grid_aligned() {
        return LegalActions::from_slice(&[config.direction]);
    }

    let cell = config.position.nearest_cell();
    Direction::ALL
        .into_iter()
        .filter(|direction| {
            let (dx, dy) = direction.delta();
            cell.offset(dx, dy)
                .and_then(|next| walls.try_get(next))
                .is_some_and(|wall| !wall)
        })
        .collect()
}
