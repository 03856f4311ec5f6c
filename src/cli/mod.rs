use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cbiohub::config::PROCESSED_PATH_ENV;
use cbiohub::query::{CoordinateKey, GeneKey};
use cbiohub::schema::columns;

mod clean;
mod combine;
mod config;
mod ingest;
mod profile;
mod query;
mod ui;

pub use config::Config;
pub use profile::Profile;

/// cBioHub - combine cancer genomics studies into one queryable store
#[derive(Parser)]
#[command(name = "cbiohub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root of the processed data directory
    #[arg(long, global = true, value_name = "DIR", env = PROCESSED_PATH_ENV)]
    processed_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Write profile for optimizing speed vs compression.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ProfileArg {
    /// Prioritize speed over compression
    Fast,
    /// Balance between speed and compression
    #[default]
    Balanced,
    /// Maximum compression, slower writes
    MaxCompression,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Fast => Profile::Fast,
            ProfileArg::Balanced => Profile::Balanced,
            ProfileArg::MaxCompression => Profile::MaxCompression,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest studies from a folder and create Parquet files
    Ingest {
        /// Study folder, or a folder containing study folders
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Write profile (fast, balanced, max-compression)
        #[arg(short = 'p', long, default_value = "balanced", value_enum)]
        profile: ProfileArg,
    },

    /// Combine all processed studies into the combined store
    Combine {
        /// Output directory for combined files
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Write profile (fast, balanced, max-compression)
        #[arg(short = 'p', long, default_value = "balanced", value_enum)]
        profile: ProfileArg,
    },

    /// Find a variant: CHROM START END REF ALT, or GENE PROTEIN_CHANGE
    Find {
        /// Variant address
        #[arg(value_name = "ARGS", num_args = 1..=5, required = true)]
        args: Vec<String>,

        /// Directory containing the combined Parquet files
        #[arg(long, value_name = "DIR")]
        processed_dir: Option<PathBuf>,
    },

    /// Check how frequently a variant occurs per cancer type
    VariantFrequency {
        /// Chromosome
        chrom: String,
        /// Start position
        start: String,
        /// End position
        end: String,
        /// Reference allele
        reference: String,
        /// Alternate allele
        alternate: String,

        /// Clinical attribute to group by
        #[arg(long, default_value = columns::CANCER_TYPE)]
        clinical_attribute: String,

        /// Directory containing the combined Parquet files
        #[arg(long, value_name = "DIR")]
        processed_dir: Option<PathBuf>,
    },

    /// Convert a gene and protein change to genomic coordinates and count occurrences
    Convert {
        /// Gene symbol
        gene: String,
        /// Protein change (with or without the `p.` prefix)
        protein_change: String,

        /// Directory containing the combined Parquet files
        #[arg(long, value_name = "DIR")]
        processed_dir: Option<PathBuf>,
    },

    /// Remove everything in the processed path folder
    Clean,

    /// Display the current configuration settings
    Config,

    /// Display the current version of the tool
    Version,
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let paths = config.store_paths(cli.processed_path.as_deref());
    log::debug!("Processed root: {}", paths.processed_root().display());

    match cli.command {
        Commands::Ingest { folder, profile } => {
            ingest::run(folder, &paths, config.writer_config(profile.into()))
        }
        Commands::Combine {
            output_dir,
            profile,
        } => combine::run(output_dir, &paths, config.writer_config(profile.into())),
        Commands::Find {
            args,
            processed_dir,
        } => query::find(args, &paths, processed_dir),
        Commands::VariantFrequency {
            chrom,
            start,
            end,
            reference,
            alternate,
            clinical_attribute,
            processed_dir,
        } => {
            let key = CoordinateKey::new(chrom, start, end, reference, alternate)?;
            query::frequency(key, &clinical_attribute, &paths, processed_dir)
        }
        Commands::Convert {
            gene,
            protein_change,
            processed_dir,
        } => query::convert(GeneKey::new(gene, protein_change)?, &paths, processed_dir),
        Commands::Clean => clean::run(&paths),
        Commands::Config => config::show(&config, &paths, cli.config.as_deref()),
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_find_modes() {
        let cli = Cli::try_parse_from(["cbiohub", "find", "17", "7675088", "7675088", "C", "T"]).unwrap();
        assert!(matches!(cli.command, Commands::Find { ref args, .. } if args.len() == 5));

        let cli = Cli::try_parse_from(["cbiohub", "-v", "find", "TP53", "R175H"]).unwrap();
        assert_eq!(cli.verbosity(), 1);

        assert!(Cli::try_parse_from(["cbiohub", "find"]).is_err());
        assert!(Cli::try_parse_from(["cbiohub", "find", "1", "2", "3", "4", "5", "6"]).is_err());
    }

    #[test]
    fn test_cli_variant_frequency_defaults() {
        let cli = Cli::try_parse_from([
            "cbiohub",
            "variant-frequency",
            "17",
            "7675088",
            "7675088",
            "C",
            "T",
        ])
        .unwrap();
        match cli.command {
            Commands::VariantFrequency {
                clinical_attribute,
                processed_dir,
                ..
            } => {
                assert_eq!(clinical_attribute, "CANCER_TYPE");
                assert!(processed_dir.is_none());
            }
            _ => panic!("expected variant-frequency"),
        }
    }

    #[test]
    fn test_processed_path_flag() {
        let cli = Cli::try_parse_from(["cbiohub", "config", "--processed-path", "/tmp/x"]).unwrap();
        assert_eq!(cli.processed_path, Some(PathBuf::from("/tmp/x")));
    }
}
