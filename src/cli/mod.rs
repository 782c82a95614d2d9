// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2. This is
// the only layer that prints to stdout.
//
//   1. `build`   - CSV → train/valid/test LMDB datasets
//   2. `inspect` - length and first records of one dataset

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildArgs, Commands, InspectArgs};

use crate::domain::split::SplitName;

#[derive(Parser, Debug)]
#[command(
    name = "seqsplit",
    version,
    about = "Split a CSV column of sequences into seeded train/valid/test LMDB datasets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Build(ref args)   => self.run_build(args),
            Commands::Inspect(ref args) => self.run_inspect(args),
        }
    }

    /// Handles the `build` subcommand.
    /// Converts the flags into a BuildConfig, runs the build and
    /// prints the per-split counts.
    fn run_build(&self, args: &BuildArgs) -> Result<()> {
        use crate::application::build_use_case::{BuildConfig, BuildUseCase};

        tracing::info!("Building datasets from: {}", args.csv_path.display());

        let report = BuildUseCase::new(BuildConfig::from(args)).execute()?;

        println!("Total samples: {}", report.counts.total());
        for name in SplitName::ALL {
            println!(
                "{:<5} {:>8}  {}",
                name,
                report.counts.get(name),
                report.output_dir.join(name.as_str()).display()
            );
        }
        Ok(())
    }

    /// Handles the `inspect` subcommand.
    /// Prints the store's length, entry count, the build it came
    /// from (when a manifest is present) and the first records.
    fn run_inspect(&self, args: &InspectArgs) -> Result<()> {
        use crate::application::inspect_use_case::InspectUseCase;

        let report = InspectUseCase::new(&args.store, args.show).execute()?;

        println!("length:  {}", report.length);
        println!("entries: {}", report.entries);
        if let Some(manifest) = &report.manifest {
            let c = &manifest.counts;
            println!(
                "build:   seed {}, train {} / valid {} / test {}",
                manifest.config.split.seed, c.train, c.valid, c.test
            );
        }
        for (i, record) in report.sample.iter().enumerate() {
            println!("{i}\t{}", record.seq);
        }
        Ok(())
    }
}
