//! Session teardown.

use twotruths_core::error::GameError;
use twotruths_game::repository::GameRepository;

/// Deletes every record in the session's partition and prints the
/// outcome, including any per-record failures.
///
/// # Errors
///
/// Returns `GameError::Store` if the partition scan fails.
pub async fn run(repo: &GameRepository, session_id: &str) -> Result<(), GameError> {
    let outcome = repo.delete_session(session_id).await?;
    println!("Deleted records: {}", outcome.deleted);
    if !outcome.errors.is_empty() {
        println!("Errors:");
        for error in &outcome.errors {
            println!("- {error}");
        }
    }
    Ok(())
}
