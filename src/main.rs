use anyhow::Result;
use colored::Colorize;
use designmap::cli::{Cli, Commands};
use designmap::commands::{run_convert, run_synthesize, ConvertConfig, SynthesizeConfig};
use designmap::observability::{init_logging, install_panic_hook};

fn main() {
    install_panic_hook();
    let cli = designmap::cli::parse_args();

    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Synthesize {
            path,
            project_id,
            project_version,
            meta,
            key_mapping,
            format,
            output,
            extended,
            caller,
            no_parallel,
            verbosity,
        } => {
            init_logging(verbosity);
            run_synthesize(SynthesizeConfig {
                path,
                project_id,
                project_version,
                meta,
                key_mapping,
                format: format.map(Into::into),
                output,
                extended,
                caller,
                no_parallel,
            })
        }
        Commands::Convert {
            from,
            to,
            input,
            output,
            key_mapping,
            extended,
            verbosity,
        } => {
            init_logging(verbosity);
            run_convert(ConvertConfig {
                from: from.into(),
                to: to.into(),
                input,
                output,
                key_mapping,
                extended,
            })
        }
        Commands::Init { force } => {
            init_logging(0);
            designmap::commands::init_config(force)
        }
    }
}

// Library errors carry their own exit code; anything else is a generic failure.
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<designmap::Error>() {
        return err.exit_code();
    }
    if err.downcast_ref::<designmap::ConversionError>().is_some() {
        return 2;
    }
    1
}
