//! Two Truths and a Lie — game state repository and orchestration.
//!
//! The repository maps game concepts (user, session, statement set,
//! presentation, vote, score) onto partitioned table records: one
//! partition per session plus a global `users` partition. The
//! orchestration layer sits on top of it and owns the presentation
//! shuffle and the vote tally.

pub mod domain;
pub mod orchestration;
pub mod repository;
