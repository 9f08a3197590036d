use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "resistaid - retrieval-augmented design and triage of antibody candidates against receptor resistance mutations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Design and rank antibody candidates against one resistance mutation.
    Design(DesignArgs),
    /// Run the pipeline over the canonical benchmark mutations.
    Demo(DemoArgs),
}

/// Arguments for the `design` subcommand.
#[derive(Args, Debug)]
pub struct DesignArgs {
    /// Mutation identifier to design against (e.g. L755S).
    #[arg(short, long, required = true, value_name = "ID")]
    pub mutation: String,

    /// Number of candidates to generate (defaults to 3).
    #[arg(short, long, value_name = "NUM")]
    pub candidates: Option<usize>,

    /// Fix the generator seed for a reproducible run.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Directory holding the normalized CSV datasets.
    #[arg(short, long, default_value = "data", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Directory the JSON report is written to.
    #[arg(short, long, default_value = "reports", value_name = "DIR")]
    pub report_dir: PathBuf,

    /// Optional TOML file overriding run parameters and ranking weights.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Directory holding the normalized CSV datasets.
    #[arg(short, long, default_value = "data", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Directory the JSON reports are written to.
    #[arg(short, long, default_value = "reports", value_name = "DIR")]
    pub report_dir: PathBuf,

    /// Fix the generator seed for reproducible runs.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn design_arguments_parse() {
        let cli = Cli::parse_from([
            "resistaid", "design", "--mutation", "L755S", "--candidates", "5", "--seed", "42",
        ]);
        match cli.command {
            Commands::Design(args) => {
                assert_eq!(args.mutation, "L755S");
                assert_eq!(args.candidates, Some(5));
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.data_dir, PathBuf::from("data"));
            }
            _ => panic!("expected design command"),
        }
    }
}
