//! An exhaustive solver and symmetry canonicalizer for Niya, a 4x4
//! tile-placement game played with the 16-tile Cartesian product of two
//! 4-valued attributes.
//!
//! # Basic usage
//!
//! ```
//! use niya_core::permutation_index::unrank;
//! use niya_core::canonical::canonicalize;
//! use niya_core::solve::solve;
//!
//! let board = unrank(0).expect("0 is a valid rank");
//! let canon = canonicalize(&board);
//! let result = solve(&canon, true);
//! assert!(result.best_move >= 0);
//! ```

use static_assertions::const_assert;

pub mod analysis;
pub mod canonical;
pub mod diagnostics;
pub mod outcome;
pub mod permutation_group;
pub mod permutation_index;
pub mod sampler;
pub mod solve;
pub mod storage;
pub mod tile;
pub mod transforms;
pub mod transposition;
pub mod win_patterns;

/// The number of tiles in the pool, and the number of cells on the board.
pub const NUM_TILES: usize = 16;

/// The side length of the (square) board.
pub const BOARD_SIDE: usize = 4;

/// The 12 non-interior cells a first move may land on: every cell except
/// the central 2x2 square.
pub const OPENING_CELLS: [usize; 12] = [0, 1, 2, 3, 4, 7, 8, 11, 12, 13, 14, 15];

/// The 4 corner cells, used to classify a move's board position.
pub const CORNER_CELLS: [usize; 4] = [0, 3, 12, 15];

const_assert!(BOARD_SIDE * BOARD_SIDE == NUM_TILES);
const_assert!(OPENING_CELLS.len() == NUM_TILES - 4);
