// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `build` and `inspect`, and all
// their flags. clap's derive macros generate --help, missing
// argument errors and type conversion.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::build_use_case::BuildConfig;
use crate::domain::split::SplitConfig;
use crate::infra::lmdb_store::DEFAULT_MAP_SIZE_MIB;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a CSV column into train/valid/test LMDB datasets
    Build(BuildArgs),

    /// Print the length and first records of one LMDB dataset
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to input CSV file
    #[arg(long = "csv-path", alias = "csv_path", alias = "input-path")]
    pub csv_path: PathBuf,

    /// Output directory for the train/, valid/ and test/ LMDBs
    #[arg(long = "output-dir", alias = "output_dir")]
    pub output_dir: PathBuf,

    /// Column name for sequences
    #[arg(long, default_value = "Sequence")]
    pub column: String,

    /// Proportion of the dataset to include in the test split
    #[arg(long = "test-size", alias = "test_size", default_value_t = 0.1)]
    pub test_size: f64,

    /// Proportion of the dataset to include in the validation split
    #[arg(long = "valid-size", alias = "valid_size", default_value_t = 0.1)]
    pub valid_size: f64,

    /// Random seed for the split
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Field delimiter of the input table
    #[arg(long, default_value_t = ',', value_parser = parse_delimiter)]
    pub delimiter: char,

    /// LMDB map size per split, in MiB
    #[arg(long = "map-size-mib", default_value_t = DEFAULT_MAP_SIZE_MIB)]
    pub map_size_mib: usize,
}

/// Convert CLI BuildArgs into the application-layer BuildConfig,
/// so the application layer never sees clap types.
impl From<&BuildArgs> for BuildConfig {
    fn from(a: &BuildArgs) -> Self {
        BuildConfig {
            input_path:   a.csv_path.clone(),
            output_dir:   a.output_dir.clone(),
            column:       a.column.clone(),
            delimiter:    a.delimiter,
            split:        SplitConfig::new(a.test_size, a.valid_size, a.seed),
            map_size_mib: a.map_size_mib,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Store directory (e.g. out/train)
    #[arg(long)]
    pub store: PathBuf,

    /// Number of records to print
    #[arg(long, default_value_t = 5)]
    pub show: usize,
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let s = if s == "\\t" { "\t" } else { s };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("expected a single ASCII character, got {s:?}")),
    }
}
