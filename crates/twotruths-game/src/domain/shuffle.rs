//! Presentation shuffle.

use twotruths_core::rng::GameRng;

use super::records::StatementKind;

/// Produces a uniformly random permutation of the three statement
/// kinds and the 1-based position of the lie within it.
///
/// Fisher–Yates over the fixed `[truth1, truth2, lie1]` array: each
/// of the six orderings is equally likely given a uniform `rng`.
pub fn shuffle_statements(rng: &mut dyn GameRng) -> ([StatementKind; 3], u8) {
    let mut order = [
        StatementKind::Truth1,
        StatementKind::Truth2,
        StatementKind::Lie1,
    ];
    for i in (1..order.len()).rev() {
        let j = rng.next_u32_range(0, i as u32) as usize;
        order.swap(i, j);
    }

    let mut lie_index = 0u8;
    for (idx, kind) in order.iter().enumerate() {
        if *kind == StatementKind::Lie1 {
            lie_index = idx as u8 + 1;
        }
    }
    (order, lie_index)
}
