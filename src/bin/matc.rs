//! Command-line interface for the material compiler
//!
//! Usage:
//!   matc check `<paths>`...                    - Compile documents and report errors
//!   matc dump `<path>` [--format `<format>`]   - Print the compiled tree
//!   matc apply `<path>`                        - Print the resolved state of every pass
//!
//! `--config <file>` layers a YAML configuration over the built-in defaults.
//! Logging is controlled with `RUST_LOG`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::error;
use std::path::Path;
use std::process::ExitCode;

use matlang::config::{self, CompilerConfig};
use matlang::formats::{serialize, OutputFormat};
use matlang::{compile_file, Material};

fn main() -> ExitCode {
    env_logger::init();

    let matches = Command::new("matc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile and inspect material description files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("YAML configuration layered over the defaults"),
        )
        .subcommand(
            Command::new("check")
                .about("Compile documents and report errors")
                .arg(
                    Arg::new("paths")
                        .help("Material files to check")
                        .required(true)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Print the compiled document tree")
                .arg(
                    Arg::new("path")
                        .help("Material file to compile")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: treeviz, json or yaml (default from config)"),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Print the resolved render state of every pass")
                .arg(
                    Arg::new("path")
                        .help("Material file to compile")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(Path::new);
    let config = match config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match matches.subcommand() {
        Some(("check", sub)) => handle_check_command(sub, &config),
        Some(("dump", sub)) => handle_dump_command(sub, &config),
        Some(("apply", sub)) => handle_apply_command(sub, &config),
        _ => unreachable!(),
    }
}

/// Compile every document, reporting each failure
fn handle_check_command(matches: &ArgMatches, config: &CompilerConfig) -> ExitCode {
    let mut failures = 0;
    for path in matches.get_many::<String>("paths").into_iter().flatten() {
        let mut resolver = config.asset_registry();
        match compile_file(path, &mut resolver, config) {
            Ok(file) => println!(
                "{}: ok ({} techniques, {} passes)",
                path,
                file.techniques.len(),
                file.pass_count()
            ),
            Err(err) => {
                error!("{}", err);
                eprintln!("{}", err);
                failures += 1;
            }
        }
    }
    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn handle_dump_command(matches: &ArgMatches, config: &CompilerConfig) -> ExitCode {
    let Some(path) = matches.get_one::<String>("path") else {
        return ExitCode::FAILURE;
    };
    let format = match matches.get_one::<String>("format") {
        Some(name) => match name.parse::<OutputFormat>() {
            Ok(format) => format,
            Err(err) => {
                eprintln!("Error: {}", err);
                return ExitCode::FAILURE;
            }
        },
        None => config.output_format,
    };

    let mut resolver = config.asset_registry();
    let file = match compile_file(path, &mut resolver, config) {
        Ok(file) => file,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match serialize(&file, format) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn handle_apply_command(matches: &ArgMatches, config: &CompilerConfig) -> ExitCode {
    let Some(path) = matches.get_one::<String>("path") else {
        return ExitCode::FAILURE;
    };
    let mut resolver = config.asset_registry();
    let material = match Material::load(path, &mut resolver, config) {
        Ok(material) => material,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    for technique in material.techniques() {
        println!("technique {}", technique.name().unwrap_or("<unnamed>"));
        for pass in technique.passes() {
            println!("  pass {}", pass.name().unwrap_or("<unnamed>"));
            for line in pass.to_string().lines() {
                println!("    {}", line);
            }
            if let Some(shader) = pass.shader() {
                if let Some(shader_path) = resolver.shader_path(shader) {
                    println!("    # shader #{} = {}", shader.0, shader_path);
                }
            }
        }
    }
    ExitCode::SUCCESS
}
