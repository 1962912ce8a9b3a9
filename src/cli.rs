use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "designmap")]
#[command(about = "Synthesize a system design document from a source tree", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a design document from a directory of source files
    Synthesize {
        /// Directory to scan
        path: PathBuf,

        /// Project identifier (defaults to [project].id, then the directory name)
        #[arg(long)]
        project_id: Option<String>,

        /// Document version (defaults to [project].version, then 1.0)
        #[arg(long = "project-version")]
        project_version: Option<String>,

        /// JSON file with `fields` and `sections` for the project metadata
        #[arg(long)]
        meta: Option<PathBuf>,

        /// JSON key mapping file laid over the builtin labels
        #[arg(long)]
        key_mapping: Option<PathBuf>,

        /// Output format (defaults to [output].default_format, then json)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable capabilities beyond the standard set (PDF output)
        #[arg(long)]
        extended: bool,

        /// Also save the document to the store under this caller
        #[arg(long)]
        caller: Option<String>,

        /// Parse files on a single thread
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Convert a document between presentation formats
    Convert {
        /// Format of the input
        #[arg(long, value_enum)]
        from: OutputFormat,

        /// Format to produce
        #[arg(long, value_enum)]
        to: OutputFormat,

        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON key mapping file laid over the builtin labels
        #[arg(long)]
        key_mapping: Option<PathBuf>,

        /// Enable capabilities beyond the standard set (PDF output)
        #[arg(long)]
        extended: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a .designmap.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Short-keyed JSON
    Json,
    /// JSON with labels instead of short keys
    Human,
    Markdown,
    Pdf,
}

impl From<OutputFormat> for crate::convert::Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::convert::Format::Json,
            OutputFormat::Human => crate::convert::Format::Human,
            OutputFormat::Markdown => crate::convert::Format::Markdown,
            OutputFormat::Pdf => crate::convert::Format::Pdf,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_synthesize_arguments() {
        let cli = Cli::try_parse_from([
            "designmap",
            "synthesize",
            "repo",
            "--format",
            "markdown",
            "--project-version",
            "2.0",
            "-vv",
        ])
        .unwrap();
        let Commands::Synthesize {
            path,
            format,
            project_version,
            verbosity,
            extended,
            ..
        } = cli.command
        else {
            panic!("expected synthesize");
        };
        assert_eq!(path, PathBuf::from("repo"));
        assert_eq!(format, Some(OutputFormat::Markdown));
        assert_eq!(project_version.as_deref(), Some("2.0"));
        assert_eq!(verbosity, 2);
        assert!(!extended);
    }

    #[test]
    fn test_convert_requires_both_formats() {
        assert!(Cli::try_parse_from(["designmap", "convert", "--from", "json"]).is_err());
        let cli = Cli::try_parse_from(["designmap", "convert", "--from", "json", "--to", "pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Convert {
                from: OutputFormat::Json,
                to: OutputFormat::Pdf,
                ..
            }
        ));
    }
}
