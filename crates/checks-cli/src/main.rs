//! `checks` command-line tool

mod commands;
mod config;

use anyhow::{Context, Result};
use checks_geo::Position;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use config::AppConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Checklist document")
}

fn coordinate_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("lat")
                .long("lat")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .help("Latitude in degrees"),
        )
        .arg(
            Arg::new("lon")
                .long("lon")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .help("Longitude in degrees"),
        )
}

fn cli() -> Command {
    Command::new("checks")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checklist documents, progress and flight log")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (default: ./checks.toml if present)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit diagnostics as JSON lines"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a document; exits 2 when entries were skipped")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("fmt")
                .about("Print a document in canonical form")
                .arg(file_arg())
                .arg(
                    Arg::new("write")
                        .long("write")
                        .short('w')
                        .action(ArgAction::SetTrue)
                        .help("Rewrite the file in place"),
                ),
        )
        .subcommand(Command::new("list").about("List documents in the storage directory"))
        .subcommand(
            Command::new("show")
                .about("Summarize the checklists in a document")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("step")
                .about("Navigate a checklist: show, next, previous, reset, toggle <n>, voice on|off, mode inherit|steps|list, or spoken text")
                .arg(file_arg())
                .arg(Arg::new("checklist").required(true).help("Checklist id"))
                .arg(
                    Arg::new("command")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .help("Navigation command"),
                ),
        )
        .subcommand(
            coordinate_args(Command::new("nearest").about("Find the nearest aerodrome")).arg(
                Arg::new("radius")
                    .long("radius")
                    .value_parser(value_parser!(f64))
                    .help("Search radius in km (default from config)"),
            ),
        )
        .subcommand(
            coordinate_args(Command::new("log").about("Append a flight log entry"))
                .arg(
                    Arg::new("alt")
                        .long("alt")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(f64))
                        .help("Altitude in meters"),
                )
                .arg(
                    Arg::new("speed")
                        .long("speed")
                        .value_parser(value_parser!(f64))
                        .help("Ground speed in km/h"),
                )
                .arg(Arg::new("text").required(true).num_args(1..).help("Entry text")),
        )
        .subcommand(Command::new("log-show").about("Print the flight log"))
        .subcommand(
            Command::new("log-delete").about("Delete one flight log entry").arg(
                Arg::new("entry")
                    .required(true)
                    .value_parser(value_parser!(usize))
                    .help("Entry number as shown by log-show"),
            ),
        )
        .subcommand(Command::new("log-clear").about("Delete the whole flight log"))
}

fn init_tracing(verbosity: u8, json: bool) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn required<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, id: &str) -> Result<&'a T> {
    args.get_one::<T>(id).with_context(|| format!("missing <{id}>"))
}

fn joined(args: &ArgMatches, id: &str) -> String {
    args.get_many::<String>(id)
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn position(args: &ArgMatches) -> Result<Position> {
    let mut position = Position::new(
        *required::<f64>(args, "lat")?,
        *required::<f64>(args, "lon")?,
        *required::<f64>(args, "alt")?,
    );
    if let Some(speed) = args.get_one::<f64>("speed") {
        position = position.with_speed(*speed);
    }
    Ok(position)
}

async fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let config = AppConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("validate", args)) => commands::validate(required::<PathBuf>(args, "file")?).await,
        Some(("fmt", args)) => commands::fmt(required::<PathBuf>(args, "file")?, args.get_flag("write")).await,
        Some(("list", _)) => commands::list(&config).await,
        Some(("show", args)) => commands::show(required::<PathBuf>(args, "file")?).await,
        Some(("step", args)) => {
            let command = joined(args, "command").parse()?;
            commands::step(
                &config,
                required::<PathBuf>(args, "file")?,
                required::<String>(args, "checklist")?,
                command,
            )
            .await
        }
        Some(("nearest", args)) => {
            commands::nearest(
                &config,
                *required::<f64>(args, "lat")?,
                *required::<f64>(args, "lon")?,
                args.get_one::<f64>("radius").copied(),
            )
            .await
        }
        Some(("log", args)) => commands::log(&config, position(args)?, &joined(args, "text")).await,
        Some(("log-show", _)) => commands::log_show(&config).await,
        Some(("log-delete", args)) => commands::log_delete(&config, *required::<usize>(args, "entry")?).await,
        Some(("log-clear", _)) => commands::log_clear(&config).await,
        _ => Ok(ExitCode::FAILURE),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"), matches.get_flag("log-json"));

    match run(&matches).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn step_collects_free_text() {
        let matches = cli()
            .try_get_matches_from(["checks", "step", "doc.yaml", "a", "siguiente", "por", "favor"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(joined(args, "command"), "siguiente por favor");
    }

    #[test]
    fn log_accepts_negative_coordinates() {
        let matches = cli()
            .try_get_matches_from([
                "checks", "log", "--lat", "40.47", "--lon", "-3.56", "--alt", "610", "--speed", "12",
                "Engine", "start",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let position = position(args).unwrap();
        assert!((position.longitude + 3.56).abs() < 1e-9);
        assert_eq!(position.speed_kmh, Some(12.0));
        assert_eq!(joined(args, "text"), "Engine start");
    }
}
