//! Backtracking search for a tiling of ten pieces over a calendar target.
//!
//! The search picks the largest remaining piece first (`PIECES` is already
//! sorted that way), tries its candidate placements in a randomized order
//! so that independent workers searching the same date diverge quickly,
//! and backtracks as soon as any disjoint remaining region drops to three
//! cells or fewer, since the smallest piece covers four.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Configuration, HEIGHT, WIDTH};
use crate::pieces::{Placement, PlacementTable, PIECES};

/// One piece committed to a specific placement in a solution.
#[derive(Debug, Clone, Copy)]
pub struct Placed {
    pub piece_index: usize,
    pub placement: Placement,
}

/// Find a tiling that covers every bit set in `target`, or `None` if the
/// search exhausts all branches.
pub fn solve(target: u64, table: &PlacementTable, rng: &mut impl Rng) -> Option<Vec<Placed>> {
    let mut placed = Vec::with_capacity(PIECES.len());
    if solve_from(target, 0, table, rng, &mut placed) {
        Some(placed)
    } else {
        None
    }
}

fn solve_from(
    remaining: u64,
    piece_index: usize,
    table: &PlacementTable,
    rng: &mut impl Rng,
    placed: &mut Vec<Placed>,
) -> bool {
    if piece_index == PIECES.len() {
        return remaining == 0;
    }

    if remaining != 0 && smallest_component(remaining) <= 3 {
        return false;
    }

    let mut candidates: Vec<&Placement> = table.by_piece[piece_index]
        .iter()
        .filter(|p| p.mask & remaining == p.mask)
        .collect();
    candidates.shuffle(rng);

    if candidates.is_empty() {
        return false;
    }

    for placement in candidates {
        placed.push(Placed {
            piece_index,
            placement: *placement,
        });

        if solve_from(remaining & !placement.mask, piece_index + 1, table, rng, placed) {
            return true;
        }

        placed.pop();
    }

    false
}

/// Find any solvable configuration, without being told which month, day and
/// weekday to leave uncovered ahead of time.
///
/// Tries every (month, day, weekday) triple in a shuffled order and returns
/// the first one that solves, along with its tiling. Since this crate does
/// not know of any unsolvable configuration, this almost always returns on
/// the first or second attempt; it still checks every triple before giving
/// up, for the rare case of a genuinely unsolvable one.
pub fn discover(table: &PlacementTable, rng: &mut impl Rng) -> Option<(Configuration, Vec<Placed>)> {
    let mut months: Vec<u8> = (1..=12).collect();
    months.shuffle(rng);

    for month in months {
        let mut days: Vec<u8> = (1..=31).collect();
        days.shuffle(rng);

        for day in days {
            let mut weekdays: Vec<u8> = (0..=6).collect();
            weekdays.shuffle(rng);

            for weekday in weekdays {
                let config = Configuration::new(month, day, weekday)
                    .expect("month/day/weekday are already within range");
                if let Some(solution) = solve(config.target(), table, rng) {
                    return Some((config, solution));
                }
            }
        }
    }

    None
}

/// Size of the smallest 4-connected component of set bits in `mask`.
///
/// Used to prune branches early: once the uncovered region fragments into
/// a piece smaller than the smallest available piece (four cells), no
/// completion is possible.
fn smallest_component(mask: u64) -> u32 {
    let mut unvisited = mask;
    let mut smallest = u32::MAX;

    while unvisited != 0 {
        let start = unvisited.trailing_zeros();
        let size = flood_fill(start, &mut unvisited);
        if size < smallest {
            smallest = size;
        }
        if smallest <= 3 {
            break;
        }
    }

    smallest
}

fn flood_fill(start: u32, unvisited: &mut u64) -> u32 {
    let mut stack = vec![start];
    let mut count = 0;
    *unvisited &= !(1u64 << start);

    while let Some(cell) = stack.pop() {
        count += 1;
        let x = cell % WIDTH as u32;
        let y = cell / WIDTH as u32;

        let mut neighbor = |nx: i32, ny: i32, stack: &mut Vec<u32>| {
            if nx < 0 || ny < 0 || nx >= WIDTH as i32 || ny >= HEIGHT as i32 {
                return;
            }
            let idx = ny as u32 * WIDTH as u32 + nx as u32;
            if *unvisited & (1u64 << idx) != 0 {
                *unvisited &= !(1u64 << idx);
                stack.push(idx);
            }
        };

        neighbor(x as i32 - 1, y as i32, &mut stack);
        neighbor(x as i32 + 1, y as i32, &mut stack);
        neighbor(x as i32, y as i32 - 1, &mut stack);
        neighbor(x as i32, y as i32 + 1, &mut stack);
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> impl Rng {
        rand::rngs::StdRng::seed_from_u64(1)
    }

    #[test]
    fn solves_a_known_configuration() {
        let config = Configuration::new(2, 29, 6).unwrap();
        let table = PlacementTable::build();
        let mut rng = rng();
        let solution = solve(config.target(), &table, &mut rng).expect("solvable");
        assert_eq!(solution.len(), PIECES.len());

        let mut covered = 0u64;
        for placed in &solution {
            assert_eq!(covered & placed.placement.mask, 0, "pieces must not overlap");
            covered |= placed.placement.mask;
        }
        assert_eq!(covered, config.target());
    }

    #[test]
    fn smallest_component_of_contiguous_mask_is_its_full_size() {
        let mask = 0b111u64;
        assert_eq!(smallest_component(mask), 3);
    }

    #[test]
    fn smallest_component_detects_isolated_single_cell() {
        // Cell 0 isolated from cell 10 (different row, not adjacent).
        let mask = (1u64 << 0) | (1u64 << 10);
        assert_eq!(smallest_component(mask), 1);
    }

    #[test]
    fn discover_lands_on_a_solvable_configuration() {
        let table = PlacementTable::build();
        let mut rng = rng();
        let (config, solution) = discover(&table, &mut rng).expect("some configuration solves");
        assert_eq!(solution.len(), PIECES.len());

        let mut covered = 0u64;
        for placed in &solution {
            covered |= placed.placement.mask;
        }
        assert_eq!(covered, config.target());
    }
}
