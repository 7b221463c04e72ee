//! The `simstudy check` command: list signature collisions without fixing them.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use simstudy_core::dedup::Signature;
use simstudy_core::{find_collisions, CandidatePool, CollisionGroup};

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Table to check
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print the collision groups as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CheckSummary<'a> {
    rows: usize,
    duplicate_rows: usize,
    groups: &'a [CollisionGroup],
}

/// Execute the check command.
pub fn execute(args: CheckArgs) -> anyhow::Result<()> {
    let pool = CandidatePool::load(&args.input)?;
    let groups = find_collisions(pool.rows());
    let duplicate_rows: usize = groups.iter().map(|g| g.rows.len()).sum();

    if args.json {
        let summary = CheckSummary {
            rows: pool.len(),
            duplicate_rows,
            groups: &groups,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("No duplicates among {} rows", pool.len());
        return Ok(());
    }

    println!(
        "{} rows in {} duplicate groups ({} rows total):",
        duplicate_rows,
        groups.len(),
        pool.len()
    );
    for group in &groups {
        println!("{}", describe(&Signature::of(&pool.rows()[group.rows[0]]), group));
    }
    Ok(())
}

/// One line per group: file lines (header is line 1) and the shared labels.
fn describe(signature: &Signature, group: &CollisionGroup) -> String {
    let lines: Vec<String> = group.rows.iter().map(|r| (r + 2).to_string()).collect();
    format!(
        "  lines {}: {} {} ({} / {}) -> {} / {}",
        lines.join(", "),
        signature.gt_verb,
        signature.gt_object,
        signature.gt_verb_synset,
        signature.gt_object_synset,
        signature.pred_verb_synset,
        signature.pred_object_synset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fixtures::{pool_row, write_csv, POOL_HEADER};

    #[test]
    fn describe_uses_file_lines() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![pool_row(1, 1, 1), pool_row(2, 1, 1), pool_row(1, 2, 3)];
        let input = write_csv(dir.path(), "s.csv", POOL_HEADER, &rows);
        let pool = CandidatePool::load(&input).unwrap();

        let groups = find_collisions(pool.rows());
        assert_eq!(groups.len(), 1);
        let line = describe(&Signature::of(&pool.rows()[0]), &groups[0]);
        assert!(line.starts_with("  lines 2, 4: ride horse (gt1.v.01 / gt1.n.01)"));
    }

    #[test]
    fn check_runs_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![pool_row(1, 1, 1), pool_row(1, 1, 1)];
        let input = write_csv(dir.path(), "s.csv", POOL_HEADER, &rows);
        execute(CheckArgs { input: input.clone(), json: false }).unwrap();
        execute(CheckArgs { input, json: true }).unwrap();
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "s.csv", "image_id,category", &["a,1".to_string()]);
        assert!(execute(CheckArgs { input, json: false }).is_err());
    }
}
