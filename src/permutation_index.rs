//! Bijection between boards and integers in `0..16!`, via the
//! factorial-number-system.

use crate::tile::{sorted_pool, Board};
use crate::NUM_TILES;

/// `16!`, the size of the raw (uncanonicalized) layout space.
pub const TOTAL_PERMUTATIONS: u64 = 20_922_789_888_000;

fn factorial(n: u64) -> u64 {
    (1..=n).product::<u64>().max(1)
}

/// Returns the `index`-th permutation of the sorted tile pool in
/// lexicographic order, or `None` if `index >= 16!`.
pub fn unrank(index: u64) -> Option<Board> {
    if index >= TOTAL_PERMUTATIONS {
        return None;
    }

    let mut pool: Vec<_> = sorted_pool().to_vec();
    let mut remaining = index;
    let mut result = Vec::with_capacity(NUM_TILES);

    for step in 0..NUM_TILES {
        let n_left = (NUM_TILES - step) as u64;
        let fact = factorial(n_left - 1);
        let k = (remaining / fact) as usize;
        remaining %= fact;
        result.push(pool.remove(k));
    }

    Some(result.try_into().expect("exactly NUM_TILES tiles produced"))
}

/// Returns the lexicographic rank of `board` among all permutations of the
/// sorted tile pool, i.e. the inverse of [`unrank`].
pub fn rank(board: &Board) -> u64 {
    let mut pool: Vec<_> = sorted_pool().to_vec();
    let mut r = 0u64;

    for (step, &tile) in board.iter().enumerate() {
        let n_left = (NUM_TILES - step) as u64;
        let fact = factorial(n_left - 1);
        let k = pool
            .iter()
            .position(|&t| t == tile)
            .expect("board is a permutation of the full pool");
        r += k as u64 * fact;
        pool.remove(k);
    }

    r
}
