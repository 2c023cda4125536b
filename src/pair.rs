// src/pair.rs
// Pair topology - pure slot index math shared by every controller.
//
// Slots are 1-based and pair up as (1,2), (3,4), ... regardless of merge
// state; pairing only determines which two slots *may* fuse.

/// First (odd) slot of the pair containing `index`.
pub fn pair_first(index: usize) -> usize {
    if index % 2 == 1 {
        index
    } else {
        index - 1
    }
}

/// Second (even) slot of the pair whose first slot is `first`.
pub fn pair_second(first: usize) -> usize {
    first + 1
}

/// Whether `(first, second)` is exactly one pair in canonical order.
pub fn is_pair(first: usize, second: usize) -> bool {
    first == pair_first(first) && second == pair_second(first)
}
