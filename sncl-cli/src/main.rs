//! Command-line interface for sncl
//! This binary compiles an sncl source file into the NCL document next to it.
//!
//! Usage:
//!   sncl `<path>`                       - Write `<path>` with the .ncl extension
//!   sncl `<path>` --stdout              - Print the document instead of writing it
//!   sncl `<path>` --config `<file>`     - Layer a configuration file over the defaults
//!   sncl `<path>` --log-level `<level>` - Set the log filter (else SNCL_LOG, else the config)
//!
//! A `sncl.toml` next to the source is picked up automatically. Errors are printed
//! to stderr as `<file>:<line>:<message>` and the process exits with status 1.

use clap::{Arg, ArgAction, Command};
use sncl_config::{ConfigError, Loader, SnclConfig, USER_CONFIG_FILE};
use sncl_parser::{compile_with, CompileOptions, SourceLoader};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SNCL_LOG";

fn main() {
    let matches = Command::new("sncl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile sncl sources into NCL documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the .sncl file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log filter, e.g. 'debug' or 'sncl_parser=trace'"),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print the generated document instead of writing the .ncl file")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("path")
        .expect("path is required");

    let config = load_config(path, matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    init_logging(
        matches.get_one::<String>("log-level").map(String::as_str),
        &config.logging.level,
    );

    let options = config.compile_options();
    tracing::debug!(?options, path = %path, "compiling");
    if matches.get_flag("stdout") {
        handle_print_command(path, &options);
    } else {
        handle_compile_command(path, &options);
    }
}

/// Defaults, then `sncl.toml` beside the source, then an explicit `--config` file.
fn load_config(path: &str, explicit: Option<&String>) -> Result<SnclConfig, ConfigError> {
    let dir = Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut loader = Loader::new().with_optional_file(dir.join(USER_CONFIG_FILE));
    if let Some(file) = explicit {
        loader = loader.with_file(file);
    }
    loader.build()
}

fn init_logging(flag: Option<&str>, configured: &str) {
    let filter = match flag {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(configured)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Compile to the sibling .ncl file and print its path
fn handle_compile_command(path: &str, options: &CompileOptions) {
    let output = compile_with(path, options).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });
    println!("{}", output.display());
}

/// Compile and print the document, writing nothing
fn handle_print_command(path: &str, options: &CompileOptions) {
    let document = SourceLoader::from_path(path)
        .and_then(|loader| loader.compile(options))
        .unwrap_or_else(|e| {
            eprintln!("{}", e);
            std::process::exit(1);
        });
    print!("{}", document);
}
