//! Scripted demo round: three players, cross votes, reveal, scores.

use std::sync::Mutex;

use twotruths_core::clock::SystemClock;
use twotruths_core::error::GameError;
use twotruths_core::rng::{GameRng, SeededRng};
use twotruths_game::orchestration;
use twotruths_game::repository::GameRepository;

const PLAYERS: [(&str, &str); 3] = [
    ("alice@example.com", "Alice"),
    ("bob@example.com", "Bob"),
    ("carol@example.com", "Carol"),
];

const STATEMENTS: [(&str, &str, &str); 3] = [
    ("I love cats", "I ran a marathon", "I have been to Mars"),
    ("I play guitar", "I speak 4 languages", "I can fly unaided"),
    ("I have met a president", "I hate pizza", "I collect stamps"),
];

fn draw_choice(rng: &Mutex<SeededRng>) -> Result<u8, GameError> {
    let mut guard = rng
        .lock()
        .map_err(|e| GameError::Store(format!("RNG mutex poisoned: {e}")))?;
    Ok(guard.next_u32_range(1, 3) as u8)
}

/// Plays one full round end to end and prints the reveal and the final
/// score table. The same seed reproduces the same round.
///
/// # Errors
///
/// Returns `GameError::Store` if a store call fails.
pub async fn run(repo: &GameRepository, seed: u64) -> Result<(), GameError> {
    for (email, alias) in PLAYERS {
        repo.upsert_user(email, alias).await?;
    }

    let (host_email, _) = PLAYERS[0];
    let session = repo.create_session(host_email, &SystemClock).await?;
    println!("Session created: {}", session.session_id);

    for ((email, alias), (truth1, truth2, lie1)) in PLAYERS.into_iter().zip(STATEMENTS) {
        repo.upsert_statements(&session.session_id, email, alias, truth1, truth2, lie1)
            .await?;
    }

    let rng = Mutex::new(SeededRng::from_seed(seed));
    for (email, alias) in PLAYERS {
        orchestration::create_presentation(repo, &rng, &session.session_id, email).await?;
        let view = orchestration::prepare_presentation(repo, &session.session_id, email).await?;
        println!("Presentation for {alias} order: {:?}", view.order);
    }

    // Naive random votes, skipping self-votes.
    for (voter, _) in PLAYERS {
        for (target, _) in PLAYERS {
            if voter == target {
                continue;
            }
            let choice = draw_choice(&rng)?;
            orchestration::cast_vote(repo, &session.session_id, voter, target, choice).await?;
        }
    }

    println!("\nReveal and tally:");
    for (email, alias) in PLAYERS {
        let tally = orchestration::tally_target(repo, &session.session_id, email).await?;
        let correct = tally.results.iter().filter(|r| r.correct).count();
        println!("- {alias} lie index: {}", tally.lie_index);
        println!("  Correct guesses: {correct}/{}", tally.results.len());
    }

    let mut scores = repo.list_scores(&session.session_id).await?;
    scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.email.cmp(&b.email)));
    println!("\nScores:");
    for entry in scores {
        println!("- {}: {}", entry.email, entry.score);
    }

    Ok(())
}
