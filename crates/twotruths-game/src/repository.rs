//! Game state repository.
//!
//! Translates typed game operations into store-level key operations
//! with correct normalization and query filtering. Content validation
//! lives in the caller-facing orchestration layer; the repository only
//! normalizes key material.
//!
//! Read-modify-write sequences (`set_session_status`, the tally's
//! score updates) are not atomic against concurrent callers; the
//! consistency model is last-writer-wins per record.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use twotruths_core::clock::Clock;
use twotruths_core::error::GameError;
use twotruths_core::store::{TableRecord, TableStore};

use crate::domain::keys;
use crate::domain::records::{
    Presentation, RecordBody, Score, SessionMeta, SessionStatus, StatementSet, UserRecord, Vote,
};

/// A session meta record paired with its session id (partition key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEntry {
    /// Opaque generated session identifier.
    pub session_id: String,
    /// The meta record.
    #[serde(flatten)]
    pub meta: SessionMeta,
}

/// Outcome of a whole-session deletion.
///
/// Partial failure is reported, not retried: a failing record delete
/// is recorded in `errors` and the enumeration continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteSessionOutcome {
    /// The session whose partition was enumerated.
    pub session_id: String,
    /// Number of records successfully deleted.
    pub deleted: usize,
    /// Per-record error descriptions, `"<row key>: <error>"`.
    pub errors: Vec<String>,
}

fn encode_record(
    partition_key: &str,
    row_key: &str,
    body: &RecordBody,
) -> Result<TableRecord, GameError> {
    let value = serde_json::to_value(body).map_err(|e| {
        GameError::Store(format!(
            "record encode failed for {partition_key}/{row_key}: {e}"
        ))
    })?;
    Ok(TableRecord {
        partition_key: partition_key.to_owned(),
        row_key: row_key.to_owned(),
        body: value,
    })
}

fn decode_record<T>(
    record: &TableRecord,
    pick: impl FnOnce(RecordBody) -> Option<T>,
) -> Result<T, GameError> {
    let body: RecordBody = serde_json::from_value(record.body.clone()).map_err(|e| {
        GameError::Store(format!(
            "record decode failed for {}/{}: {e}",
            record.partition_key, record.row_key
        ))
    })?;
    pick(body).ok_or_else(|| {
        GameError::Store(format!(
            "unexpected record kind at {}/{}",
            record.partition_key, record.row_key
        ))
    })
}

fn session_not_found(session_id: &str) -> GameError {
    GameError::NotFound(format!("session {session_id}"))
}

/// Repository over the partitioned table store.
#[derive(Clone)]
pub struct GameRepository {
    store: Arc<dyn TableStore>,
}

impl GameRepository {
    /// Creates a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    // --- users ---

    /// Registers or updates a user profile. Idempotent; overwrites the alias.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn upsert_user(&self, email: &str, alias: &str) -> Result<UserRecord, GameError> {
        let user = UserRecord {
            email: keys::normalize_email(email),
            alias: alias.to_owned(),
        };
        let record = encode_record(
            keys::USERS_PARTITION,
            &user.email,
            &RecordBody::User(user.clone()),
        )?;
        self.store.upsert(record).await?;
        Ok(user)
    }

    /// Point lookup of a user profile by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, GameError> {
        let row_key = keys::normalize_email(email);
        let found = self.store.get(keys::USERS_PARTITION, &row_key).await?;
        found
            .as_ref()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::User(u) => Some(u),
                    _ => None,
                })
            })
            .transpose()
    }

    // --- sessions ---

    /// Creates a new session in `collecting` status and returns it.
    ///
    /// The identifier is a freshly generated UUID; the id space is
    /// large enough that collisions with existing sessions are not a
    /// concern.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn create_session(
        &self,
        host_email: &str,
        clock: &dyn Clock,
    ) -> Result<SessionEntry, GameError> {
        let session_id = Uuid::new_v4().to_string();
        let meta = SessionMeta {
            host: keys::normalize_email(host_email),
            status: SessionStatus::Collecting,
            created_at: clock.now(),
        };
        let record = encode_record(
            &session_id,
            keys::META_ROW_KEY,
            &RecordBody::SessionMeta(meta.clone()),
        )?;
        self.store.upsert(record).await?;
        Ok(SessionEntry { session_id, meta })
    }

    /// Point lookup of a session's meta record.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<SessionMeta>, GameError> {
        let found = self.store.get(session_id, keys::META_ROW_KEY).await?;
        found
            .as_ref()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::SessionMeta(m) => Some(m),
                    _ => None,
                })
            })
            .transpose()
    }

    /// Lists every session by scanning meta records across partitions.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn list_sessions(&self) -> Result<Vec<SessionEntry>, GameError> {
        let records = self.store.scan_row_key(keys::META_ROW_KEY).await?;
        records
            .iter()
            .map(|r| {
                let meta = decode_record(r, |b| match b {
                    RecordBody::SessionMeta(m) => Some(m),
                    _ => None,
                })?;
                Ok(SessionEntry {
                    session_id: r.partition_key.clone(),
                    meta,
                })
            })
            .collect()
    }

    /// Updates a session's declared status (read-then-write).
    ///
    /// # Errors
    ///
    /// Returns `GameError::NotFound` if the session never existed and
    /// `GameError::Store` if a store call fails.
    pub async fn set_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<SessionMeta, GameError> {
        let mut meta = self
            .get_session(session_id)
            .await?
            .ok_or_else(|| session_not_found(session_id))?;
        meta.status = status;
        let record = encode_record(
            session_id,
            keys::META_ROW_KEY,
            &RecordBody::SessionMeta(meta.clone()),
        )?;
        self.store.upsert(record).await?;
        Ok(meta)
    }

    /// Enumerates the session's partition and deletes every record
    /// individually. A failure on one record does not abort the rest.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` only if the initial partition scan
    /// fails; per-record failures land in the outcome's `errors`.
    pub async fn delete_session(
        &self,
        session_id: &str,
    ) -> Result<DeleteSessionOutcome, GameError> {
        let records = self.store.scan_partition(session_id).await?;
        let mut deleted = 0usize;
        let mut errors = Vec::new();
        for record in records {
            match self
                .store
                .delete(&record.partition_key, &record.row_key)
                .await
            {
                Ok(()) => deleted += 1,
                Err(err) => {
                    tracing::warn!(
                        session_id,
                        row_key = %record.row_key,
                        error = %err,
                        "session record delete failed"
                    );
                    errors.push(format!("{}: {err}", record.row_key));
                }
            }
        }
        Ok(DeleteSessionOutcome {
            session_id: session_id.to_owned(),
            deleted,
            errors,
        })
    }

    // --- statements ---

    /// Stores a player's statement set. Idempotent overwrite keyed by
    /// (session, email).
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn upsert_statements(
        &self,
        session_id: &str,
        email: &str,
        alias: &str,
        truth1: &str,
        truth2: &str,
        lie1: &str,
    ) -> Result<StatementSet, GameError> {
        let set = StatementSet {
            email: keys::normalize_email(email),
            alias: alias.to_owned(),
            truth1: truth1.to_owned(),
            truth2: truth2.to_owned(),
            lie1: lie1.to_owned(),
        };
        let row_key = keys::statement_row_key(email);
        let record = encode_record(session_id, &row_key, &RecordBody::StatementSet(set.clone()))?;
        self.store.upsert(record).await?;
        Ok(set)
    }

    /// Point lookup of a player's statement set.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn get_statements(
        &self,
        session_id: &str,
        email: &str,
    ) -> Result<Option<StatementSet>, GameError> {
        let row_key = keys::statement_row_key(email);
        let found = self.store.get(session_id, &row_key).await?;
        found
            .as_ref()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::StatementSet(s) => Some(s),
                    _ => None,
                })
            })
            .transpose()
    }

    /// Lists every statement set in the session. Order not guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn list_statements(&self, session_id: &str) -> Result<Vec<StatementSet>, GameError> {
        let records = self
            .store
            .scan_prefix(session_id, keys::STATEMENT_PREFIX)
            .await?;
        records
            .iter()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::StatementSet(s) => Some(s),
                    _ => None,
                })
            })
            .collect()
    }

    // --- presentations ---

    /// Persists a presentation, overwriting any previous order for the
    /// same target.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn put_presentation(
        &self,
        session_id: &str,
        presentation: &Presentation,
    ) -> Result<(), GameError> {
        let row_key = keys::presentation_row_key(&presentation.target);
        let record = encode_record(
            session_id,
            &row_key,
            &RecordBody::Presentation(presentation.clone()),
        )?;
        self.store.upsert(record).await
    }

    /// Point lookup of a target's presentation.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn get_presentation(
        &self,
        session_id: &str,
        target_email: &str,
    ) -> Result<Option<Presentation>, GameError> {
        let row_key = keys::presentation_row_key(target_email);
        let found = self.store.get(session_id, &row_key).await?;
        found
            .as_ref()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::Presentation(p) => Some(p),
                    _ => None,
                })
            })
            .transpose()
    }

    // --- votes ---

    /// Records a vote. Idempotent overwrite keyed by (voter, target);
    /// a later call silently replaces an earlier vote.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn cast_vote(
        &self,
        session_id: &str,
        voter_email: &str,
        target_email: &str,
        chosen_index: u8,
    ) -> Result<Vote, GameError> {
        let vote = Vote {
            voter: keys::normalize_email(voter_email),
            target: keys::normalize_email(target_email),
            choice: chosen_index,
        };
        let row_key = keys::vote_row_key(voter_email, target_email);
        let record = encode_record(session_id, &row_key, &RecordBody::Vote(vote.clone()))?;
        self.store.upsert(record).await?;
        Ok(vote)
    }

    /// Lists the votes cast against one target: a `vt:` prefix scan
    /// filtered on the stored target field.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn list_votes_for_target(
        &self,
        session_id: &str,
        target_email: &str,
    ) -> Result<Vec<Vote>, GameError> {
        let target = keys::normalize_email(target_email);
        let records = self.store.scan_prefix(session_id, keys::VOTE_PREFIX).await?;
        let votes = records
            .iter()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::Vote(v) => Some(v),
                    _ => None,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(votes.into_iter().filter(|v| v.target == target).collect())
    }

    // --- scores ---

    /// Sets a voter's score for the session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn upsert_score(
        &self,
        session_id: &str,
        email: &str,
        score: u32,
    ) -> Result<Score, GameError> {
        let record_body = Score {
            email: keys::normalize_email(email),
            score,
        };
        let row_key = keys::score_row_key(email);
        let record = encode_record(session_id, &row_key, &RecordBody::Score(record_body.clone()))?;
        self.store.upsert(record).await?;
        Ok(record_body)
    }

    /// Returns a voter's score, defaulting to 0 when no record exists.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn get_score(&self, session_id: &str, email: &str) -> Result<u32, GameError> {
        let row_key = keys::score_row_key(email);
        let found = self.store.get(session_id, &row_key).await?;
        found
            .as_ref()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::Score(s) => Some(s.score),
                    _ => None,
                })
            })
            .transpose()
            .map(Option::unwrap_or_default)
    }

    /// Lists every score record in the session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Store` if the store call fails.
    pub async fn list_scores(&self, session_id: &str) -> Result<Vec<Score>, GameError> {
        let records = self
            .store
            .scan_prefix(session_id, keys::SCORE_PREFIX)
            .await?;
        records
            .iter()
            .map(|r| {
                decode_record(r, |b| match b {
                    RecordBody::Score(s) => Some(s),
                    _ => None,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use twotruths_table_store::MemoryTableStore;
    use twotruths_test_support::{FixedClock, FlakyTableStore};

    use super::*;

    fn repository() -> GameRepository {
        GameRepository::new(Arc::new(MemoryTableStore::new()))
    }

    #[tokio::test]
    async fn test_upsert_user_normalizes_email_key() {
        let repo = repository();

        repo.upsert_user("Alice@X.com", "Alice").await.unwrap();

        let user = repo.get_user("ALICE@x.COM").await.unwrap().unwrap();
        assert_eq!(user.email, "alice@x.com");
        assert_eq!(user.alias, "Alice");
    }

    #[tokio::test]
    async fn test_upsert_user_overwrites_alias() {
        let repo = repository();
        repo.upsert_user("alice@x.com", "Alice").await.unwrap();

        repo.upsert_user("alice@x.com", "Allie").await.unwrap();

        let user = repo.get_user("alice@x.com").await.unwrap().unwrap();
        assert_eq!(user.alias, "Allie");
    }

    #[tokio::test]
    async fn test_create_session_writes_collecting_meta() {
        let repo = repository();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let clock = FixedClock(now);

        let entry = repo.create_session("Host@X.com", &clock).await.unwrap();

        assert_eq!(entry.meta.host, "host@x.com");
        assert_eq!(entry.meta.status, SessionStatus::Collecting);
        assert_eq!(entry.meta.created_at, now);
        let meta = repo.get_session(&entry.session_id).await.unwrap().unwrap();
        assert_eq!(meta, entry.meta);
    }

    #[tokio::test]
    async fn test_list_sessions_returns_every_meta_record() {
        let repo = repository();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        let first = repo.create_session("a@x.com", &clock).await.unwrap();
        let second = repo.create_session("b@x.com", &clock).await.unwrap();

        let sessions = repo.list_sessions().await.unwrap();

        assert_eq!(sessions.len(), 2);
        let ids: Vec<&str> = sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert!(ids.contains(&first.session_id.as_str()));
        assert!(ids.contains(&second.session_id.as_str()));
    }

    #[tokio::test]
    async fn test_set_session_status_updates_existing() {
        let repo = repository();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        let entry = repo.create_session("host@x.com", &clock).await.unwrap();

        let meta = repo
            .set_session_status(&entry.session_id, SessionStatus::Voting)
            .await
            .unwrap();

        assert_eq!(meta.status, SessionStatus::Voting);
        assert_eq!(meta.host, "host@x.com");
        assert_eq!(meta.created_at, entry.meta.created_at);
    }

    #[tokio::test]
    async fn test_set_session_status_missing_session_returns_not_found() {
        let repo = repository();

        let err = repo
            .set_session_status("no-such-session", SessionStatus::Voting)
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_statements_scoped_to_session() {
        let repo = repository();
        repo.upsert_statements("s1", "a@x.com", "A", "t1", "t2", "l1")
            .await
            .unwrap();
        repo.upsert_statements("s1", "b@x.com", "B", "t1", "t2", "l1")
            .await
            .unwrap();
        repo.upsert_statements("s2", "c@x.com", "C", "t1", "t2", "l1")
            .await
            .unwrap();

        let statements = repo.list_statements("s1").await.unwrap();

        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.email != "c@x.com"));
    }

    #[tokio::test]
    async fn test_vote_overwrite_keeps_latest() {
        let repo = repository();
        repo.cast_vote("s1", "alice@x.com", "bob@x.com", 1)
            .await
            .unwrap();

        repo.cast_vote("s1", "Alice@X.com", "Bob@X.com", 3)
            .await
            .unwrap();

        let votes = repo.list_votes_for_target("s1", "bob@x.com").await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].choice, 3);
    }

    #[tokio::test]
    async fn test_list_votes_for_target_filters_by_target() {
        let repo = repository();
        repo.cast_vote("s1", "alice@x.com", "bob@x.com", 1)
            .await
            .unwrap();
        repo.cast_vote("s1", "carol@x.com", "bob@x.com", 2)
            .await
            .unwrap();
        repo.cast_vote("s1", "bob@x.com", "alice@x.com", 3)
            .await
            .unwrap();

        let votes = repo
            .list_votes_for_target("s1", "Bob@X.com")
            .await
            .unwrap();

        assert_eq!(votes.len(), 2);
        assert!(votes.iter().all(|v| v.target == "bob@x.com"));
    }

    #[tokio::test]
    async fn test_get_score_defaults_to_zero() {
        let repo = repository();

        let score = repo.get_score("s1", "nobody@x.com").await.unwrap();

        assert_eq!(score, 0);
    }

    #[tokio::test]
    async fn test_upsert_score_round_trips() {
        let repo = repository();

        repo.upsert_score("s1", "Alice@X.com", 2).await.unwrap();

        assert_eq!(repo.get_score("s1", "alice@x.com").await.unwrap(), 2);
        let scores = repo.list_scores("s1").await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_delete_session_deletes_all_records_and_reports_count() {
        let repo = repository();
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        let entry = repo.create_session("alice@x.com", &clock).await.unwrap();
        let sid = entry.session_id.clone();
        repo.upsert_statements(&sid, "alice@x.com", "A", "t1", "t2", "l1")
            .await
            .unwrap();
        repo.upsert_statements(&sid, "bob@x.com", "B", "t1", "t2", "l1")
            .await
            .unwrap();
        for target in ["alice@x.com", "bob@x.com"] {
            let presentation = Presentation {
                target: target.to_owned(),
                order: [
                    crate::domain::records::StatementKind::Truth1,
                    crate::domain::records::StatementKind::Truth2,
                    crate::domain::records::StatementKind::Lie1,
                ],
                lie_index: 3,
            };
            repo.put_presentation(&sid, &presentation).await.unwrap();
        }
        repo.cast_vote(&sid, "alice@x.com", "bob@x.com", 1)
            .await
            .unwrap();
        repo.cast_vote(&sid, "bob@x.com", "alice@x.com", 2)
            .await
            .unwrap();
        repo.upsert_score(&sid, "alice@x.com", 1).await.unwrap();
        repo.upsert_score(&sid, "bob@x.com", 0).await.unwrap();

        let outcome = repo.delete_session(&sid).await.unwrap();

        assert_eq!(outcome.deleted, 9);
        assert!(outcome.errors.is_empty());
        assert!(repo.get_session(&sid).await.unwrap().is_none());
        assert!(repo.list_statements(&sid).await.unwrap().is_empty());
        assert!(repo.list_scores(&sid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_session_accumulates_per_record_errors() {
        let inner = Arc::new(MemoryTableStore::new());
        let flaky = FlakyTableStore::new(
            Arc::clone(&inner) as Arc<dyn TableStore>,
            vec![keys::statement_row_key("bob@x.com")],
        );
        let repo = GameRepository::new(Arc::new(flaky));
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        let entry = repo.create_session("alice@x.com", &clock).await.unwrap();
        let sid = entry.session_id.clone();
        repo.upsert_statements(&sid, "alice@x.com", "A", "t1", "t2", "l1")
            .await
            .unwrap();
        repo.upsert_statements(&sid, "bob@x.com", "B", "t1", "t2", "l1")
            .await
            .unwrap();

        let outcome = repo.delete_session(&sid).await.unwrap();

        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("st:bob@x.com:"));
        // The failing record survives the sweep.
        assert!(
            repo.get_statements(&sid, "bob@x.com")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_session_on_empty_partition_reports_zero() {
        let repo = repository();

        let outcome = repo.delete_session("never-created").await.unwrap();

        assert_eq!(outcome.deleted, 0);
        assert!(outcome.errors.is_empty());
    }
}
