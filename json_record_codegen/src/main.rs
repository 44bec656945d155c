//! Binary to generate Rust record code from a model document.
//!
//! Usage: `jsonrecordgen [--input model.json] [--output records.rs]`
//!
//! Reads the model from `--input` (or stdin) and writes the generated code to
//! `--output` (or stdout). Logs go to stderr.

use std::io::{read_to_string, stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use json_record_codegen::{CodegenError, GenerateSettings, generate_from_file, generate_to_writer};

#[derive(Parser, Debug)]
#[command(name = "jsonrecordgen", version, about = "Generate JSON contracts for Rust records")]
struct Cli {
    /// Model document to read. Defaults to stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// File to write generated code to. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail when the model has validation issues instead of logging them.
    #[arg(long)]
    deny_invalid_model: bool,

    /// Tool name for the "Code generated by" marker line.
    #[arg(long)]
    marker: Option<String>,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level: &str = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let settings = GenerateSettings {
        deny_invalid_model: cli.deny_invalid_model,
        marker: cli.marker.clone(),
    };

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli, settings: &GenerateSettings) -> Result<(), CodegenError> {
    match (&cli.input, &cli.output) {
        (Some(input), Some(output)) => {
            tracing::debug!(input = %input.display(), output = %output.display(), "generating");
            generate_from_file(input, output, settings)
        }
        (input, output) => {
            let model_json: String = match input {
                Some(path) => std::fs::read_to_string(path)?,
                None => read_to_string(stdin())?,
            };
            match output {
                Some(path) => {
                    let mut file: std::fs::File = std::fs::File::create(path)?;
                    generate_to_writer(&model_json, &mut file, settings)
                }
                None => generate_to_writer(&model_json, &mut stdout(), settings),
            }
        }
    }
}
