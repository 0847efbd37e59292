//! Partition and row-key scheme.
//!
//! All records of one session share the session id as partition key,
//! which makes whole-session scans and deletion a single-partition
//! operation. Users live in a global `users` partition. Row-key
//! prefixes group record kinds into contiguous, range-scannable key
//! spans within a partition.

/// Partition holding every user profile.
pub const USERS_PARTITION: &str = "users";

/// Row key of the per-session meta record.
pub const META_ROW_KEY: &str = "meta";

/// Row-key prefix for statement sets.
pub const STATEMENT_PREFIX: &str = "st:";

/// Row-key prefix for presentations.
pub const PRESENTATION_PREFIX: &str = "pr:";

/// Row-key prefix for votes.
pub const VOTE_PREFIX: &str = "vt:";

/// Row-key prefix for scores.
pub const SCORE_PREFIX: &str = "sc:";

/// Case-folds an email before any use as key material or stored value.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}

/// Row key of a player's statement set.
#[must_use]
pub fn statement_row_key(email: &str) -> String {
    format!("{STATEMENT_PREFIX}{}", normalize_email(email))
}

/// Row key of a target's presentation.
#[must_use]
pub fn presentation_row_key(target_email: &str) -> String {
    format!("{PRESENTATION_PREFIX}{}", normalize_email(target_email))
}

/// Row key of a vote; one vote per (voter, target) pair.
#[must_use]
pub fn vote_row_key(voter_email: &str, target_email: &str) -> String {
    format!(
        "{VOTE_PREFIX}{}:{}",
        normalize_email(voter_email),
        normalize_email(target_email)
    )
}

/// Row key of a voter's score.
#[must_use]
pub fn score_row_key(email: &str) -> String {
    format!("{SCORE_PREFIX}{}", normalize_email(email))
}
