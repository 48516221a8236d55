//! Command-line interface for naturally
//! This binary compiles flowed documents and prints the grammar.
//!
//! Usage:
//!   naturally compile `<path>` [--emit `<stage>`] [--tolerant] [--config `<file>`] [--compact]
//!                                                    - Compile a document and print it as JSON
//!   naturally grammar [--format `<format>`]         - Print the grammar as EBNF or JSON
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use clap::{Arg, ArgAction, ArgMatches, Command};
use naturally::flowed::config::{Loader, NaturallyConfig};
use naturally::{grammar, CompileOptions, Compiler, RecoveryMode};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("naturally")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler for flowed workflow definitions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compile")
                .about("Compile a flowed document")
                .arg(
                    Arg::new("path")
                        .help("Path to the flowed file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("emit")
                        .long("emit")
                        .short('e')
                        .help("Stage to stop at")
                        .value_parser(["document", "tokens", "tree"])
                        .default_value("document"),
                )
                .arg(
                    Arg::new("tolerant")
                        .long("tolerant")
                        .help("Keep parsing after a syntax error and report every error")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Print JSON on a single line")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("grammar")
                .about("Print the grammar")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["ebnf", "json"])
                        .default_value("ebnf"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("compile", compile_matches)) => handle_compile_command(compile_matches),
        Some(("grammar", grammar_matches)) => {
            let format = grammar_matches
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("ebnf");
            handle_grammar_command(format);
        }
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> Result<NaturallyConfig, config::ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if matches.get_flag("tolerant") {
        loader = loader.recovery(RecoveryMode::Tolerant)?;
    }
    if matches.get_flag("compact") {
        loader = loader.pretty(false)?;
    }
    loader.build()
}

/// Handle the compile command
fn handle_compile_command(matches: &ArgMatches) {
    let config = load_config(matches).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or_default();
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let compiler = Compiler::new(CompileOptions::from(&config));
    let emit = matches
        .get_one::<String>("emit")
        .map(String::as_str)
        .unwrap_or("document");
    let output = match emit {
        "tokens" => compiler
            .tokens(&source)
            .map(|tokens| to_json(&tokens, config.output.pretty)),
        "tree" => compiler
            .tree(&source)
            .map(|tree| to_json(&tree, config.output.pretty)),
        _ => compiler
            .compile(&source)
            .map(|document| to_json(&document, config.output.pretty)),
    };

    match output {
        Ok(json) => println!("{}", json),
        Err(error) => {
            eprint!("{}", error.render(&source));
            std::process::exit(1);
        }
    }
}

/// Handle the grammar command
fn handle_grammar_command(format: &str) {
    let description = grammar();
    match format {
        "json" => println!("{}", to_json(&description, true)),
        _ => print!("{}", description.to_ebnf()),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.unwrap_or_else(|e| {
        eprintln!("Serialization error: {}", e);
        std::process::exit(1);
    })
}
