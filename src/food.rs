use std::collections::HashSet;

use rand::Rng;

use crate::snake::Cell;

/// Draws uniformly random cells in `[0, width) x [0, height)` until one is
/// not in `occupied`.
///
/// `occupied` must leave at least one cell of the grid free, otherwise this
/// never returns.
pub fn place_food<R: Rng + ?Sized>(
    width: i32,
    height: i32,
    occupied: &HashSet<Cell>,
    rng: &mut R,
) -> Cell {
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let candidate = Cell::new(rng.gen_range(0..width), rng.gen_range(0..height));

        if !occupied.contains(&candidate) {
            log::debug!("food placed at ({}, {}) after {} draw(s)", candidate.x, candidate.y, attempts);
            return candidate;
        }
    }
}
