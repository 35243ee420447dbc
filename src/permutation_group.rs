//! The 24 permutations of a 4-label alphabet, shared by both attribute
//! relabelings in the canonicalizer's equivalence group.

use std::sync::OnceLock;

use itertools::Itertools;

/// One of the 24 permutations of `{0, 1, 2, 3}`, indexed so that
/// `perm[label]` is the relabeled value.
pub type LabelPermutation = [u8; 4];

static LABEL_PERMUTATIONS: OnceLock<Vec<LabelPermutation>> = OnceLock::new();

/// All 24 permutations of `{0, 1, 2, 3}`, generated once and cached.
pub fn all_label_permutations() -> &'static [LabelPermutation] {
    LABEL_PERMUTATIONS.get_or_init(|| {
        (0u8..4)
            .permutations(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect()
    })
}
