use anyhow::Context;
use clap::{CommandFactory, Parser};
use img_mini::cli::Args;
use img_mini::{logger, run};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Bare invocation shows usage instead of converting the current directory.
    if std::env::args_os().len() < 2 {
        let _ = Args::command().print_help();
        return ExitCode::FAILURE;
    }

    let args = Args::parse();
    logger::init(args.verbose, args.quiet);

    match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            img_mini::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> anyhow::Result<ExitCode> {
    let input_dir = match &args.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to resolve the current directory")?,
    };

    let options = args.conversion_options();
    let status = run(&input_dir, &options)
        .with_context(|| format!("failed to process {}", input_dir.display()))?;

    Ok(status.exit_code())
}
