//! The `simstudy sample` command.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use simstudy_core::output::write_json;
use simstudy_core::{CandidatePool, Config, StudyPipeline, UniquenessKey};

/// Arguments for the `sample` command.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Candidate pool CSV
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the sampled rows
    #[arg(short, long)]
    pub output: PathBuf,

    /// Total number of rows to sample
    #[arg(short, long)]
    pub target: Option<usize>,

    /// Seed for reproducible bin shuffles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Which columns must be unique across the sample
    #[arg(long, value_enum)]
    pub uniqueness: Option<Uniqueness>,

    /// Skip the balancing pass
    #[arg(long)]
    pub no_balance: bool,

    /// Write the run summary as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Uniqueness constraint choices.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Uniqueness {
    /// One row per source image
    ImageId,
    /// One row per (image, ground-truth verb synset, ground-truth object synset)
    GroundTruth,
}

impl From<Uniqueness> for UniquenessKey {
    fn from(u: Uniqueness) -> Self {
        match u {
            Uniqueness::ImageId => UniquenessKey::ImageId,
            Uniqueness::GroundTruth => UniquenessKey::GroundTruth,
        }
    }
}

/// Apply command-line overrides on top of the loaded config.
fn apply_overrides(config: &mut Config, args: &SampleArgs) -> anyhow::Result<()> {
    let sampling = &mut config.sampling;
    if let Some(target) = args.target {
        sampling.target_total = target;
    }
    if let Some(seed) = args.seed {
        sampling.seed = Some(seed);
    }
    if let Some(uniqueness) = args.uniqueness {
        sampling.uniqueness = uniqueness.into();
    }
    if args.no_balance {
        sampling.balance = false;
    }
    config.validate()?;
    Ok(())
}

/// Execute the sample command.
pub fn execute(args: SampleArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args)?;

    let pool = CandidatePool::load(&args.input)?;
    if pool.is_empty() {
        anyhow::bail!("Candidate pool {} has no rows", args.input.display());
    }

    let pipeline = StudyPipeline::new(config);
    let outcome = pipeline.sample(pool.rows());
    let rows = outcome.rows(pool.rows());
    pool.write_rows(&args.output, &rows)?;

    if let Some(path) = &args.report {
        write_json(path, &outcome.report)?;
        tracing::info!("Wrote sampling report to {:?}", path);
    }

    println!(
        "Sampled {} of {} rows into {} ({:?})",
        outcome.report.selected,
        outcome.report.target_total,
        args.output.display(),
        outcome.report.state
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fixtures::{pool_row, write_csv, POOL_HEADER};
    use simstudy_core::Table;

    fn args(input: PathBuf, output: PathBuf) -> SampleArgs {
        SampleArgs {
            input,
            output,
            target: None,
            seed: Some(11),
            uniqueness: None,
            no_balance: false,
            report: None,
        }
    }

    #[test]
    fn overrides_are_applied_and_validated() {
        let mut config = Config::default();
        let mut a = args(PathBuf::new(), PathBuf::new());
        a.target = Some(24);
        a.uniqueness = Some(Uniqueness::ImageId);
        a.no_balance = true;
        apply_overrides(&mut config, &a).unwrap();
        assert_eq!(config.sampling.target_total, 24);
        assert_eq!(config.sampling.seed, Some(11));
        assert_eq!(config.sampling.uniqueness, UniquenessKey::ImageId);
        assert!(!config.sampling.balance);

        a.target = Some(5);
        apply_overrides(&mut config, &a).unwrap();
        assert_eq!(config.sampling.target_total, 5);

        a.target = Some(0);
        assert!(apply_overrides(&mut config, &a).is_err());
    }

    #[test]
    fn samples_pool_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut rows = Vec::new();
        let mut id = 0;
        for category in 1..=3 {
            for level in 0..=4 {
                for _ in 0..6 {
                    rows.push(pool_row(id, category, level));
                    id += 1;
                }
            }
        }
        let input = write_csv(dir.path(), "pool.csv", POOL_HEADER, &rows);
        let output = dir.path().join("sample.csv");
        let report = dir.path().join("report.json");

        let mut a = args(input, output.clone());
        a.target = Some(48);
        a.report = Some(report.clone());
        execute(a, Config::default()).unwrap();

        let sample = Table::read(&output).unwrap();
        assert_eq!(sample.len(), 48);
        assert_eq!(sample.headers().last().map(String::as_str), Some("note"));
        let level = sample.require_column("similarity_level").unwrap();
        assert!(sample.records().iter().all(|r| r[level] != "0"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["state"], "done");
        assert_eq!(json["selected"], 48);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), "pool.csv", POOL_HEADER, &[]);
        let a = args(input, dir.path().join("out.csv"));
        assert!(execute(a, Config::default()).is_err());
    }
}
