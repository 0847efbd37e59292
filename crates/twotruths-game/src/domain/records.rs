//! Stored record types.
//!
//! Every record body is persisted as a [`RecordBody`] variant tagged
//! with a `kind` field. The variant is decoded from the body on read;
//! row-key prefixes exist only to scope range scans and are never
//! parsed back into a record kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a game session.
///
/// Transitions are caller-driven (`collecting → voting → reveal →
/// ended` by convention); the core does not gate operations on the
/// declared status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Players are registering and submitting statements.
    Collecting,
    /// Votes are being cast.
    Voting,
    /// Lies are being revealed and tallied.
    Reveal,
    /// The game is over.
    Ended,
}

/// One of a player's three submitted statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// First true statement.
    Truth1,
    /// Second true statement.
    Truth2,
    /// The lie.
    Lie1,
}

/// A registered user; global across sessions, last-write-wins on alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Normalized email, also the record's row key.
    pub email: String,
    /// Display name.
    pub alias: String,
}

/// The per-session meta record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Normalized email of the host.
    pub host: String,
    /// Declared session status.
    pub status: SessionStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A player's three claims for a session: two truths and a lie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSet {
    /// Normalized email of the player.
    pub email: String,
    /// Display name at submission time.
    pub alias: String,
    /// First true statement.
    pub truth1: String,
    /// Second true statement.
    pub truth2: String,
    /// The lie.
    pub lie1: String,
}

/// The randomized display order of a target's statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    /// Normalized email of the target player.
    pub target: String,
    /// Permutation of the three statement kinds, persisted as shown.
    pub order: [StatementKind; 3],
    /// 1-based position of the lie within `order`.
    pub lie_index: u8,
}

/// A vote on which displayed position holds the lie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Normalized email of the voter.
    pub voter: String,
    /// Normalized email of the target player.
    pub target: String,
    /// 1-based position in the target's presentation order.
    pub choice: u8,
}

/// A voter's per-session score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Normalized email of the voter.
    pub email: String,
    /// Correct-guess count; absent record means zero.
    pub score: u32,
}

/// Tagged union of every stored record body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordBody {
    /// Global user profile.
    User(UserRecord),
    /// Per-session meta record.
    SessionMeta(SessionMeta),
    /// A player's statement set.
    StatementSet(StatementSet),
    /// A target's randomized presentation.
    Presentation(Presentation),
    /// A single vote.
    Vote(Vote),
    /// A voter's score.
    Score(Score),
}
