//! CSV export of a session's statements, votes and scores.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use twotruths_core::error::GameError;
use twotruths_game::orchestration;
use twotruths_game::repository::GameRepository;

/// Writes three CSV files into `out_dir`: statements, graded votes and
/// scores for the session.
///
/// Grading the votes runs the reveal tally per target, which credits
/// correct voters' scores again as a side effect.
///
/// # Errors
///
/// Returns an error if a store call fails, a target was never
/// presented, or a file cannot be written.
pub async fn run(
    repo: &GameRepository,
    session_id: &str,
    out_dir: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Path::new(out_dir);
    std::fs::create_dir_all(dir)?;

    let statements = repo.list_statements(session_id).await?;
    let mut alias_by_email: HashMap<String, String> = HashMap::new();

    let path = dir.join(format!("session_{session_id}_statements.csv"));
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(&path)?));
    writer.write_record(["email", "alias", "truth1", "truth2", "lie1"])?;
    for set in &statements {
        alias_by_email.insert(set.email.clone(), set.alias.clone());
        writer.write_record([&set.email, &set.alias, &set.truth1, &set.truth2, &set.lie1])?;
    }
    writer.flush()?;

    let path = dir.join(format!("session_{session_id}_votes.csv"));
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(&path)?));
    writer.write_record([
        "target_email",
        "target_alias",
        "voter_email",
        "voter_alias",
        "choice",
        "correct",
        "lie_index",
    ])?;
    for set in &statements {
        let tally = orchestration::tally_target(repo, session_id, &set.email).await?;
        let lie_index = tally.lie_index.to_string();
        for result in &tally.results {
            let voter_alias = resolve_alias(repo, &mut alias_by_email, &result.voter).await?;
            let choice = result.choice.to_string();
            let correct = result.correct.to_string();
            writer.write_record([
                set.email.as_str(),
                set.alias.as_str(),
                result.voter.as_str(),
                voter_alias.as_str(),
                choice.as_str(),
                correct.as_str(),
                lie_index.as_str(),
            ])?;
        }
    }
    writer.flush()?;

    let scores = repo.list_scores(session_id).await?;
    let path = dir.join(format!("session_{session_id}_scores.csv"));
    let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(&path)?));
    writer.write_record(["email", "alias", "score"])?;
    for entry in &scores {
        let alias = resolve_alias(repo, &mut alias_by_email, &entry.email).await?;
        let score = entry.score.to_string();
        writer.write_record([entry.email.as_str(), alias.as_str(), score.as_str()])?;
    }
    writer.flush()?;

    println!("Exported CSVs to {}", dir.display());
    Ok(())
}

/// Looks up an alias, preferring statement authors already seen in the
/// session, then the user registry, then the bare email.
async fn resolve_alias(
    repo: &GameRepository,
    cache: &mut HashMap<String, String>,
    email: &str,
) -> Result<String, GameError> {
    if let Some(alias) = cache.get(email) {
        return Ok(alias.clone());
    }
    let alias = repo
        .get_user(email)
        .await?
        .map_or_else(|| email.to_owned(), |user| user.alias);
    cache.insert(email.to_owned(), alias.clone());
    Ok(alias)
}
