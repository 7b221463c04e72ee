//! The `simstudy questions` command.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use simstudy_core::types::Question;
use simstudy_core::{CandidatePool, Config, GlossTable, OutputWriter, QuestionBuilder};

/// Arguments for the `questions` command.
#[derive(Args, Debug)]
pub struct QuestionsArgs {
    /// Final (deduplicated) sample
    #[arg(short, long)]
    pub input: PathBuf,

    /// Question file (.json array, or .jsonl for one question per line)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Synset definitions (synset, definition); overrides `questions.gloss_file`
    #[arg(long)]
    pub glosses: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

/// Execute the questions command.
pub fn execute(args: QuestionsArgs, config: &Config) -> anyhow::Result<()> {
    let pool = CandidatePool::load(&args.input)?;

    let glosses = match args.glosses.clone().or_else(|| config.gloss_file()) {
        Some(path) => GlossTable::load(&path)?,
        None => {
            tracing::warn!("No gloss table given; definitions will read \"[Definition not found]\"");
            GlossTable::default()
        }
    };

    let builder = QuestionBuilder::new(&glosses, &config.questions.choices);
    let mut writer: OutputWriter<_, Question> = OutputWriter::create(&args.output)?;

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        create_progress_bar(pool.len() as u64)?
    };
    for (i, row) in pool.rows().iter().enumerate() {
        writer.push(builder.question(i + 1, row))?;
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let written = writer.items_written();
    writer.finish()?;
    println!("Wrote {} questions to {}", written, args.output.display());
    Ok(())
}

fn create_progress_bar(total: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message("rendering");
    Ok(pb)
}
