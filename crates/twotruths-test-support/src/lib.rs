//! Shared test doubles for the Two Truths and a Lie backend.

mod clock;
mod rng;
mod store;

pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingTableStore, FlakyTableStore};
