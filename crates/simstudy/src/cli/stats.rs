//! The `simstudy stats` command.

use std::path::PathBuf;

use clap::Args;
use simstudy_core::report::REPORT_LEVELS;
use simstudy_core::{CandidatePool, DistributionTable, TOP_REPEATED_IDS};

/// Arguments for the `stats` command.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Table to summarize
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the stats command.
pub fn execute(args: StatsArgs) -> anyhow::Result<()> {
    let pool = CandidatePool::load(&args.input)?;
    let table = DistributionTable::from_rows(pool.rows(), &REPORT_LEVELS);
    pool.image_id_stats(TOP_REPEATED_IDS).log();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", table.render());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fixtures::{pool_row, write_csv, POOL_HEADER};

    #[test]
    fn stats_on_sample_file() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![pool_row(1, 1, 0), pool_row(2, 2, 4), pool_row(3, 2, 4)];
        let input = write_csv(dir.path(), "s.csv", POOL_HEADER, &rows);
        execute(StatsArgs { input: input.clone(), json: false }).unwrap();
        execute(StatsArgs { input, json: true }).unwrap();
    }
}
