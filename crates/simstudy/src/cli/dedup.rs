//! The `simstudy dedup` command.

use std::path::PathBuf;

use clap::Args;
use simstudy_core::output::write_json;
use simstudy_core::{CandidatePool, Config, SimilarityLookup, StudyPipeline};

/// Arguments for the `dedup` command.
#[derive(Args, Debug)]
pub struct DedupArgs {
    /// Sampled rows to deduplicate
    #[arg(short, long)]
    pub input: PathBuf,

    /// Verb similarity table (synset_1, synset_2, majority_score)
    #[arg(long)]
    pub verb_sim: PathBuf,

    /// Object similarity table (synset_1, synset_2, majority_score)
    #[arg(long)]
    pub object_sim: PathBuf,

    /// Where to write the deduplicated rows
    #[arg(short, long)]
    pub output: PathBuf,

    /// Seed for replacement candidate order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the run summary as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Execute the dedup command.
pub fn execute(args: DedupArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(seed) = args.seed {
        config.dedup.seed = Some(seed);
    }

    let mut pool = CandidatePool::load(&args.input)?;
    let verbs = SimilarityLookup::load(&args.verb_sim)?;
    let objects = SimilarityLookup::load(&args.object_sim)?;

    let pipeline = StudyPipeline::new(config);
    let report = pipeline.resolve(pool.rows_mut(), &verbs, &objects);
    pool.write(&args.output)?;

    if let Some(path) = &args.report {
        write_json(path, &report)?;
        tracing::info!("Wrote dedup report to {:?}", path);
    }

    println!(
        "Replaced {} of {} duplicates ({} unresolved); wrote {} rows to {}",
        report.replaced,
        report.total_duplicates,
        report.unresolved.len(),
        report.rows,
        args.output.display()
    );
    Ok(())
}
