//! The `simstudy map-synsets` command.

use std::path::PathBuf;

use clap::Args;
use simstudy_core::{SynsetMapper, Table};

/// Arguments for the `map-synsets` command.
#[derive(Args, Debug)]
pub struct MapSynsetsArgs {
    /// Ground-truth table with `verb` and `object` columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Verb mapping table (original_verb, synset)
    #[arg(long)]
    pub verb_map: PathBuf,

    /// Object mapping table (Object, Synset)
    #[arg(long)]
    pub object_map: PathBuf,

    /// Where to write the extended table
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute the map-synsets command.
pub fn execute(args: MapSynsetsArgs) -> anyhow::Result<()> {
    let table = Table::read(&args.input)?;
    let mapper = SynsetMapper::load(&args.verb_map, &args.object_map)?;

    let (extended, report) = mapper.attach(&table)?;
    extended.write(&args.output)?;
    report.log();

    println!(
        "Extended {} rows with synsets -> {} ({} missing verbs, {} missing objects)",
        report.rows,
        args.output.display(),
        report.missing_verbs.len(),
        report.missing_objects.len()
    );
    Ok(())
}
