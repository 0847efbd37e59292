//! Game flow operations on top of the repository.
//!
//! These functions carry the caller-facing rules: input validation,
//! the presentation shuffle, and the reveal tally. The tally writes
//! scores as a side effect and is not idempotent; invoking it twice
//! for the same target increments correct voters' scores twice.

use std::sync::Mutex;

use serde::Serialize;

use twotruths_core::error::GameError;
use twotruths_core::rng::GameRng;

use crate::domain::records::{Presentation, StatementKind, StatementSet};
use crate::domain::shuffle::shuffle_statements;
use crate::repository::GameRepository;

/// A target's statements in presentation order, lie position withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentationView {
    /// Normalized email of the target player.
    pub target: String,
    /// Statement texts in the persisted display order.
    pub order: [String; 3],
}

/// One voter's line in a reveal tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteResult {
    /// Normalized email of the voter.
    pub voter: String,
    /// The 1-based position the voter chose.
    pub choice: u8,
    /// Whether the choice matched the lie's position.
    pub correct: bool,
}

/// The full reveal for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyOutcome {
    /// Normalized email of the target player.
    pub target: String,
    /// 1-based position of the lie in the presentation order.
    pub lie_index: u8,
    /// Every vote cast against the target, graded.
    pub results: Vec<VoteResult>,
}

fn statement_text(set: &StatementSet, kind: StatementKind) -> &str {
    match kind {
        StatementKind::Truth1 => &set.truth1,
        StatementKind::Truth2 => &set.truth2,
        StatementKind::Lie1 => &set.lie1,
    }
}

/// Shuffles the target's statements and persists the resulting order.
///
/// Every call draws a fresh permutation and overwrites any previously
/// stored presentation for the target, which changes what already-cast
/// votes' positions refer to.
///
/// The `Mutex` is locked only around the synchronous shuffle to avoid
/// holding a `MutexGuard` across await points.
///
/// # Errors
///
/// Returns `GameError::NotFound` if the target has no statement set in
/// the session and `GameError::Store` if a store call fails.
pub async fn create_presentation(
    repo: &GameRepository,
    rng: &Mutex<dyn GameRng + Send>,
    session_id: &str,
    target_email: &str,
) -> Result<Presentation, GameError> {
    let set = repo
        .get_statements(session_id, target_email)
        .await?
        .ok_or_else(|| {
            GameError::NotFound(format!(
                "statements for {target_email} in session {session_id}"
            ))
        })?;

    let (order, lie_index) = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| GameError::Store(format!("RNG mutex poisoned: {e}")))?;
        shuffle_statements(&mut *rng_guard)
    };
    let presentation = Presentation {
        target: set.email,
        order,
        lie_index,
    };
    repo.put_presentation(session_id, &presentation).await?;
    tracing::debug!(session_id, target = %presentation.target, "presentation created");
    Ok(presentation)
}

/// Resolves the stored presentation order into statement texts for
/// display, withholding the lie's position.
///
/// # Errors
///
/// Returns `GameError::NotFound` if the target has no presentation or
/// no statement set and `GameError::Store` if a store call fails.
pub async fn prepare_presentation(
    repo: &GameRepository,
    session_id: &str,
    target_email: &str,
) -> Result<PresentationView, GameError> {
    let presentation = repo
        .get_presentation(session_id, target_email)
        .await?
        .ok_or_else(|| {
            GameError::NotFound(format!(
                "presentation for {target_email} in session {session_id}"
            ))
        })?;
    let set = repo
        .get_statements(session_id, target_email)
        .await?
        .ok_or_else(|| {
            GameError::NotFound(format!(
                "statements for {target_email} in session {session_id}"
            ))
        })?;

    let order = presentation
        .order
        .map(|kind| statement_text(&set, kind).to_owned());
    Ok(PresentationView {
        target: presentation.target,
        order,
    })
}

/// Validates and records a vote. The chosen index must name one of the
/// three displayed positions.
///
/// # Errors
///
/// Returns `GameError::Validation` if `chosen_index` is outside 1..=3
/// and `GameError::Store` if a store call fails.
pub async fn cast_vote(
    repo: &GameRepository,
    session_id: &str,
    voter_email: &str,
    target_email: &str,
    chosen_index: u8,
) -> Result<crate::domain::records::Vote, GameError> {
    if !(1..=3).contains(&chosen_index) {
        return Err(GameError::Validation(format!(
            "chosen index must be 1, 2 or 3, got {chosen_index}"
        )));
    }
    repo.cast_vote(session_id, voter_email, target_email, chosen_index)
        .await
}

/// Reveals the lie for one target: grades every vote against the
/// stored lie position and increments each correct voter's score.
///
/// Score updates happen on every invocation. A repeated tally for the
/// same target counts the same correct votes again.
///
/// # Errors
///
/// Returns `GameError::NotFound` if the target has no presentation and
/// `GameError::Store` if a store call fails.
pub async fn tally_target(
    repo: &GameRepository,
    session_id: &str,
    target_email: &str,
) -> Result<TallyOutcome, GameError> {
    let presentation = repo
        .get_presentation(session_id, target_email)
        .await?
        .ok_or_else(|| {
            GameError::NotFound(format!(
                "presentation for {target_email} in session {session_id}"
            ))
        })?;

    let votes = repo.list_votes_for_target(session_id, target_email).await?;
    let mut results = Vec::with_capacity(votes.len());
    for vote in votes {
        let correct = vote.choice == presentation.lie_index;
        if correct {
            let current = repo.get_score(session_id, &vote.voter).await?;
            repo.upsert_score(session_id, &vote.voter, current + 1).await?;
        }
        results.push(VoteResult {
            voter: vote.voter,
            choice: vote.choice,
            correct,
        });
    }
    tracing::debug!(
        session_id,
        target = %presentation.target,
        votes = results.len(),
        "target tallied"
    );
    Ok(TallyOutcome {
        target: presentation.target,
        lie_index: presentation.lie_index,
        results,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use twotruths_table_store::MemoryTableStore;
    use twotruths_test_support::SequenceRng;

    use super::*;

    fn repository() -> GameRepository {
        GameRepository::new(Arc::new(MemoryTableStore::new()))
    }

    async fn seed_statements(repo: &GameRepository, session_id: &str, email: &str) {
        repo.upsert_statements(
            session_id,
            email,
            "Bob",
            "I ran a marathon",
            "I own a telescope",
            "I met the queen",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_presentation_requires_statements() {
        let repo = repository();
        let rng = Mutex::new(SequenceRng::new(vec![0, 0]));

        let err = create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_presentation_persists_order_and_lie_index() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0]));

        let presentation = create_presentation(&repo, &rng, "s1", "Bob@X.com")
            .await
            .unwrap();

        assert_eq!(presentation.target, "bob@x.com");
        assert_eq!(
            presentation.order,
            [
                StatementKind::Truth2,
                StatementKind::Lie1,
                StatementKind::Truth1
            ]
        );
        assert_eq!(presentation.lie_index, 2);
        let stored = repo.get_presentation("s1", "bob@x.com").await.unwrap();
        assert_eq!(stored, Some(presentation));
    }

    #[tokio::test]
    async fn test_create_presentation_regenerates_order_on_each_call() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0, 2, 1]));

        let first = create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();
        let second = create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();

        assert_ne!(first.order, second.order);
        assert_eq!(second.lie_index, 3);
        let stored = repo.get_presentation("s1", "bob@x.com").await.unwrap();
        assert_eq!(stored, Some(second));
    }

    #[tokio::test]
    async fn test_prepare_presentation_maps_kinds_to_texts() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0]));
        create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();

        let view = prepare_presentation(&repo, "s1", "bob@x.com").await.unwrap();

        assert_eq!(view.target, "bob@x.com");
        assert_eq!(
            view.order,
            [
                "I own a telescope".to_owned(),
                "I met the queen".to_owned(),
                "I ran a marathon".to_owned()
            ]
        );
    }

    #[tokio::test]
    async fn test_prepare_presentation_without_presentation_returns_not_found() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;

        let err = prepare_presentation(&repo, "s1", "bob@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cast_vote_rejects_out_of_range_choice() {
        let repo = repository();

        for bad in [0u8, 4, 200] {
            let err = cast_vote(&repo, "s1", "alice@x.com", "bob@x.com", bad)
                .await
                .unwrap_err();
            assert!(matches!(err, GameError::Validation(_)));
        }
        assert!(
            repo.list_votes_for_target("s1", "bob@x.com")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_tally_requires_presentation() {
        let repo = repository();

        let err = tally_target(&repo, "s1", "bob@x.com").await.unwrap_err();

        assert!(matches!(err, GameError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tally_scores_correct_voters() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0]));
        create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();
        // Lie sits at position 2.
        cast_vote(&repo, "s1", "alice@x.com", "bob@x.com", 2)
            .await
            .unwrap();
        cast_vote(&repo, "s1", "carol@x.com", "bob@x.com", 1)
            .await
            .unwrap();

        let outcome = tally_target(&repo, "s1", "bob@x.com").await.unwrap();

        assert_eq!(outcome.target, "bob@x.com");
        assert_eq!(outcome.lie_index, 2);
        assert_eq!(outcome.results.len(), 2);
        let alice = outcome
            .results
            .iter()
            .find(|r| r.voter == "alice@x.com")
            .unwrap();
        assert!(alice.correct);
        let carol = outcome
            .results
            .iter()
            .find(|r| r.voter == "carol@x.com")
            .unwrap();
        assert!(!carol.correct);
        assert_eq!(repo.get_score("s1", "alice@x.com").await.unwrap(), 1);
        assert_eq!(repo.get_score("s1", "carol@x.com").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_tally_twice_double_counts_scores() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0]));
        create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();
        cast_vote(&repo, "s1", "alice@x.com", "bob@x.com", 2)
            .await
            .unwrap();

        tally_target(&repo, "s1", "bob@x.com").await.unwrap();
        tally_target(&repo, "s1", "bob@x.com").await.unwrap();

        assert_eq!(repo.get_score("s1", "alice@x.com").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_revote_only_latest_choice_counts() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0]));
        create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();
        cast_vote(&repo, "s1", "alice@x.com", "bob@x.com", 2)
            .await
            .unwrap();
        cast_vote(&repo, "s1", "alice@x.com", "bob@x.com", 1)
            .await
            .unwrap();

        let outcome = tally_target(&repo, "s1", "bob@x.com").await.unwrap();

        assert_eq!(outcome.results.len(), 1);
        assert!(!outcome.results[0].correct);
        assert_eq!(repo.get_score("s1", "alice@x.com").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recreating_presentation_regrades_existing_votes() {
        let repo = repository();
        seed_statements(&repo, "s1", "bob@x.com").await;
        let rng = Mutex::new(SequenceRng::new(vec![0, 0, 2, 1]));
        create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();
        // Correct against the first order, where the lie sits at 2.
        cast_vote(&repo, "s1", "alice@x.com", "bob@x.com", 2)
            .await
            .unwrap();

        // Second shuffle moves the lie to position 3.
        create_presentation(&repo, &rng, "s1", "bob@x.com")
            .await
            .unwrap();
        let outcome = tally_target(&repo, "s1", "bob@x.com").await.unwrap();

        assert_eq!(outcome.lie_index, 3);
        assert!(!outcome.results[0].correct);
        assert_eq!(repo.get_score("s1", "alice@x.com").await.unwrap(), 0);
    }
}
