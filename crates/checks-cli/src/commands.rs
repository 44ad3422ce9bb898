//! Subcommand implementations

use crate::config::AppConfig;
use anyhow::{bail, Context, Result};
use checks_catalog::{parse, serialize, CatalogStore, Checklist, FsCatalogStore, LoadReport, Notice};
use checks_geo::{step_readouts, FlightLog, FlightLogger, GeoIndex, Position, SensorReadings};
use checks_progress::{
    DisplayMode, FileProgressStore, ModePreference, NavOutcome, NavigationController, ProgressSession,
    ProgressStore,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

/// Exit code for a document that loaded with skipped entries
const EXIT_PARTIAL: u8 = 2;

/// Action for the `step` subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StepCommand {
    Show,
    Next,
    Previous,
    Reset,
    Toggle(usize),
    Voice(bool),
    Mode(ModePreference),
    /// Free text handed to voice recognition
    Transcript(String),
}

impl FromStr for StepCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let words: Vec<&str> = s.split_whitespace().collect();
        let command = match words.as_slice() {
            [] | ["show"] => Self::Show,
            ["next"] => Self::Next,
            ["previous" | "prev"] => Self::Previous,
            ["reset"] => Self::Reset,
            ["toggle", n] => Self::Toggle(n.parse().with_context(|| format!("bad item number '{n}'"))?),
            ["voice", "on"] => Self::Voice(true),
            ["voice", "off"] => Self::Voice(false),
            ["mode", "inherit"] => Self::Mode(ModePreference::Inherit),
            ["mode", "steps"] => Self::Mode(ModePreference::ForceStepByStep),
            ["mode", "list"] => Self::Mode(ModePreference::ForceFullList),
            ["toggle" | "voice" | "mode", ..] => bail!("invalid arguments for '{}'", words[0]),
            _ => Self::Transcript(s.to_string()),
        };
        Ok(command)
    }
}

async fn read_document(file: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::None => {}
        Notice::Dismissible(lines) => {
            for line in lines {
                eprintln!("warning: {line}");
            }
        }
        Notice::Blocking(reason) => eprintln!("error: {reason}"),
    }
}

pub(crate) async fn validate(file: &Path) -> Result<ExitCode> {
    let bytes = read_document(file).await?;
    let outcome = parse(&bytes).with_context(|| format!("{} is not a checklist document", file.display()))?;

    println!(
        "{}: {} checklists, {} steps",
        file.display(),
        outcome.catalog.len(),
        outcome.catalog.checklists.iter().map(Checklist::len).sum::<usize>()
    );
    if outcome.has_warnings() {
        for message in outcome.warning_messages() {
            println!("  skipped: {message}");
        }
        return Ok(ExitCode::from(EXIT_PARTIAL));
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn fmt(file: &Path, write: bool) -> Result<ExitCode> {
    let bytes = read_document(file).await?;
    let outcome = parse(&bytes).with_context(|| format!("{} is not a checklist document", file.display()))?;

    if write && outcome.has_warnings() {
        for message in outcome.warning_messages() {
            eprintln!("warning: {message}");
        }
        eprintln!("not rewriting {}: skipped entries would be lost", file.display());
        return Ok(ExitCode::from(EXIT_PARTIAL));
    }
    for message in outcome.warning_messages() {
        eprintln!("warning: dropping {message}");
    }

    let canonical = serialize(&outcome.catalog)?;
    if write {
        if canonical == bytes {
            tracing::info!("{} already canonical", file.display());
        } else {
            replace_file(file, &canonical).await?;
            println!("formatted {}", file.display());
        }
    } else {
        print!("{}", String::from_utf8_lossy(&canonical));
    }
    Ok(ExitCode::SUCCESS)
}

/// Write beside `file`, then rename over it
async fn replace_file(file: &Path, contents: &[u8]) -> Result<()> {
    let mut staging = file.as_os_str().to_os_string();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    tokio::fs::write(&staging, contents)
        .await
        .with_context(|| format!("cannot write {}", staging.display()))?;
    tokio::fs::rename(&staging, file)
        .await
        .with_context(|| format!("cannot replace {}", file.display()))
}

pub(crate) async fn list(config: &AppConfig) -> Result<ExitCode> {
    let store = FsCatalogStore::new(&config.storage_dir);
    let names = store.list().await?;
    if names.is_empty() {
        println!("no documents in {}", config.storage_dir.display());
    }
    for name in names {
        let report = LoadReport::resolve(store.load(&name).await);
        let status = match &report.notice {
            Notice::None => String::new(),
            Notice::Dismissible(lines) => format!(" ({} skipped)", lines.len()),
            Notice::Blocking(_) => " (unreadable)".to_string(),
        };
        println!("{name}\t{} checklists{status}", report.catalog.len());
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn show(file: &Path) -> Result<ExitCode> {
    let bytes = read_document(file).await?;
    let report = LoadReport::resolve(parse(&bytes));
    print_notice(&report.notice);
    if report.notice.is_blocking() {
        return Ok(ExitCode::FAILURE);
    }

    for category in report.catalog.categories() {
        println!("[{category}]");
    }
    for checklist in &report.catalog.checklists {
        let mode = if checklist.full_list == Some(true) { "list" } else { "steps" };
        println!(
            "{}\t{}\t{} steps\t{}{}",
            checklist.id,
            checklist.title,
            checklist.len(),
            mode,
            checklist
                .category
                .as_deref()
                .map(|c| format!("\t{c}"))
                .unwrap_or_default()
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn step(
    config: &AppConfig,
    file: &Path,
    checklist_id: &str,
    command: StepCommand,
) -> Result<ExitCode> {
    let bytes = read_document(file).await?;
    let report = LoadReport::resolve(parse(&bytes));
    print_notice(&report.notice);
    if report.notice.is_blocking() {
        return Ok(ExitCode::FAILURE);
    }
    let Some(checklist) = report.catalog.get(checklist_id).cloned() else {
        bail!("no checklist '{checklist_id}' in {}", file.display());
    };

    let store: Arc<dyn ProgressStore> = Arc::new(FileProgressStore::new(&config.progress_file));
    let session = ProgressSession::open(store, checklist_id).await;
    let mut nav = NavigationController::new(session, checklist, config.page_layout())
        .with_auto_advance_delay(config.auto_advance_delay());

    let outcome = match command {
        StepCommand::Show => None,
        StepCommand::Next => Some(nav.next()),
        StepCommand::Previous => Some(nav.previous()),
        StepCommand::Reset => {
            nav.reset();
            None
        }
        StepCommand::Toggle(n) => {
            let position = n.checked_sub(1).context("items are numbered from 1")?;
            if nav.toggle_item(position).is_none() {
                bail!("no item {n} in '{checklist_id}'");
            }
            nav.auto_advance().await
        }
        StepCommand::Voice(enabled) => {
            nav.set_voice_control(enabled);
            None
        }
        StepCommand::Mode(preference) => {
            nav.set_mode_preference(preference);
            None
        }
        StepCommand::Transcript(text) => {
            let outcome = nav.handle_voice(&text);
            if outcome.is_none() {
                eprintln!("no command recognized (voice control must be on)");
            }
            outcome
        }
    };

    match outcome {
        Some(NavOutcome::Exit) => println!("left '{checklist_id}'"),
        Some(NavOutcome::Complete) => println!("'{checklist_id}' complete"),
        Some(NavOutcome::Moved) | None => print_position(&nav),
    }

    nav.into_session().close().await;
    Ok(ExitCode::SUCCESS)
}

fn print_position(nav: &NavigationController) {
    let checklist = nav.checklist();
    let state = nav.session().state();
    println!("{} ({})", checklist.title, checklist.id);

    match nav.mode() {
        DisplayMode::StepByStep => {
            let Some(step) = nav.current_step() else {
                println!("  (no steps)");
                return;
            };
            println!("  step {}/{}: {}", state.step_index() + 1, checklist.len(), step.text);
            for line in step_readouts(step, &SensorReadings::at(Utc::now())) {
                println!("    {line}");
            }
        }
        DisplayMode::FullList => {
            println!("  page {}/{}", state.page_index() + 1, nav.max_page() + 1);
            let range = nav.current_page_range();
            for (position, step) in range.zip(nav.current_page()) {
                let mark = if state.is_checked(position) { 'x' } else { ' ' };
                println!("  [{mark}] {}. {}", position + 1, step.text);
            }
        }
    }
}

async fn load_index(config: &AppConfig) -> GeoIndex {
    match &config.aerodrome_db {
        Some(path) => GeoIndex::load(path).await,
        None => {
            tracing::warn!("no aerodrome_db configured");
            GeoIndex::empty()
        }
    }
}

pub(crate) async fn nearest(config: &AppConfig, lat: f64, lon: f64, radius_km: Option<f64>) -> Result<ExitCode> {
    let radius = radius_km.unwrap_or(config.geo.max_distance_km);
    let index = load_index(config).await;

    match index.nearest_point(lat, lon) {
        Some((point, distance)) if distance <= radius => {
            println!("{}\t{distance:.2} km", point.identifier);
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            println!("no aerodrome within {radius} km");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn flight_log(config: &AppConfig) -> Result<FlightLog> {
    Ok(FlightLog::new(&config.log_file).with_language(config.header_language()?))
}

pub(crate) async fn log(config: &AppConfig, position: Position, text: &str) -> Result<ExitCode> {
    let logger = FlightLogger::new(
        flight_log(config)?,
        Arc::new(load_index(config).await),
        config.geo.clone(),
    );
    let entry = logger.record(&position, text).await?;
    println!("{}", entry.to_line());
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn log_show(config: &AppConfig) -> Result<ExitCode> {
    let entries = flight_log(config)?.read_all().await?;
    if entries.is_empty() {
        println!("flight log is empty");
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{:>3}  {}  {:.6}, {:.6}  {:.0} m  {:<4}  {}",
            i + 1,
            entry.timestamp.format("%d/%m/%Y %H:%M:%S"),
            entry.latitude,
            entry.longitude,
            entry.altitude_m,
            entry.aerodrome.as_deref().unwrap_or("-"),
            entry.text
        );
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn log_delete(config: &AppConfig, number: usize) -> Result<ExitCode> {
    let index = number.checked_sub(1).context("entries are numbered from 1")?;
    let removed = flight_log(config)?.delete_entry(index).await?;
    println!("deleted: {}", removed.to_line());
    Ok(ExitCode::SUCCESS)
}

pub(crate) async fn log_clear(config: &AppConfig) -> Result<ExitCode> {
    flight_log(config)?.clear().await?;
    println!("flight log cleared");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_commands() {
        assert_eq!("".parse::<StepCommand>().unwrap(), StepCommand::Show);
        assert_eq!("next".parse::<StepCommand>().unwrap(), StepCommand::Next);
        assert_eq!("prev".parse::<StepCommand>().unwrap(), StepCommand::Previous);
        assert_eq!("toggle 3".parse::<StepCommand>().unwrap(), StepCommand::Toggle(3));
        assert_eq!(
            "mode list".parse::<StepCommand>().unwrap(),
            StepCommand::Mode(ModePreference::ForceFullList)
        );
        assert_eq!("voice off".parse::<StepCommand>().unwrap(), StepCommand::Voice(false));
    }

    #[test]
    fn malformed_keyword_commands_are_errors() {
        assert!("toggle".parse::<StepCommand>().is_err());
        assert!("toggle x".parse::<StepCommand>().is_err());
        assert!("mode sideways".parse::<StepCommand>().is_err());
    }

    #[test]
    fn anything_else_is_a_transcript() {
        assert_eq!(
            "siguiente por favor".parse::<StepCommand>().unwrap(),
            StepCommand::Transcript("siguiente por favor".into())
        );
    }

    #[tokio::test]
    async fn step_persists_between_invocations() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("doc.yaml");
        std::fs::write(
            &doc,
            "checklists:\n  - id: a\n    pasos:\n      - {id: s1, texto: One}\n      - {id: s2, texto: Two}\n",
        )
        .unwrap();
        let config = AppConfig {
            progress_file: dir.path().join("progress.json"),
            ..AppConfig::default()
        };

        step(&config, &doc, "a", StepCommand::Next).await.unwrap();

        let store = FileProgressStore::new(&config.progress_file);
        assert_eq!(store.load("a").await.unwrap().step_index, 1);
    }

    #[tokio::test]
    async fn fmt_write_keeps_documents_with_skipped_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("doc.yaml");
        let original = "checklists:\n  - id: a\n    pasos:\n      - {id: s1, texto: One}\n      - {id: s2}\n";
        std::fs::write(&doc, original).unwrap();

        let code = fmt(&doc, true).await.unwrap();

        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::from(EXIT_PARTIAL)));
        assert_eq!(std::fs::read_to_string(&doc).unwrap(), original);
    }

    #[tokio::test]
    async fn fmt_write_replaces_clean_documents() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("doc.yaml");
        std::fs::write(&doc, "checklists:\n  - {id: a, pasos: [{id: s1, texto: One}]}\n").unwrap();

        let code = fmt(&doc, true).await.unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));

        let rewritten = std::fs::read(&doc).unwrap();
        let outcome = parse(&rewritten).unwrap();
        assert!(!outcome.has_warnings());
        assert_eq!(outcome.catalog.checklists[0].steps[0].text, "One");
        assert_eq!(serialize(&outcome.catalog).unwrap(), rewritten);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn unknown_checklist_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("doc.yaml");
        std::fs::write(&doc, "checklists: []\n").unwrap();
        assert!(step(&AppConfig::default(), &doc, "nope", StepCommand::Show).await.is_err());
    }
}
