//! Flight log
//!
//! Append-only text file of [`LogEntry`] lines under a localized header.
//! Edits and deletions rewrite the whole file; lines that do not parse are
//! dropped by a rewrite.

mod entry;
mod logger;

pub use entry::{LogEntry, SEPARATOR, TIMESTAMP_FORMAT};
pub use logger::{FlightLogger, Position};

use crate::error::{LogError, LogResult};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Language of the header line written to a new log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderLanguage {
    /// Spanish column names
    #[default]
    Spanish,
    /// English column names
    English,
}

impl HeaderLanguage {
    /// Header line for this language
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Spanish => "Hora UTC;Latitud;Longitud;Altitud (m);OACI;Texto",
            Self::English => "UTC Time;Latitude;Longitude;Altitude (m);ICAO;Text",
        }
    }

    /// Whether `line` is the header of any language
    #[must_use]
    pub fn is_header(line: &str) -> bool {
        [Self::Spanish, Self::English]
            .iter()
            .any(|language| language.header() == line.trim_end())
    }
}

impl FromStr for HeaderLanguage {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "es" => Ok(Self::Spanish),
            "en" => Ok(Self::English),
            other => Err(LogError::malformed(format!("unknown language '{other}'"))),
        }
    }
}

impl fmt::Display for HeaderLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spanish => write!(f, "es"),
            Self::English => write!(f, "en"),
        }
    }
}

/// File-backed flight log
///
/// Operations on one `FlightLog` are serialized; concurrent writers on the
/// same file from separate instances are not coordinated.
#[derive(Debug)]
pub struct FlightLog {
    path: PathBuf,
    language: HeaderLanguage,
    lock: Mutex<()>,
}

impl FlightLog {
    /// Log at `path` with a Spanish header
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            language: HeaderLanguage::default(),
            lock: Mutex::new(()),
        }
    }

    /// Set header language used when the file is created or rewritten
    #[must_use]
    pub fn with_language(mut self, language: HeaderLanguage) -> Self {
        self.language = language;
        self
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add one entry at the end, creating the file with a header if needed
    pub async fn append(&self, entry: &LogEntry) -> LogResult<()> {
        let _guard = self.lock.lock().await;
        self.ensure_parent().await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| LogError::from_io(&self.path, e))?;
        let is_new = file
            .metadata()
            .await
            .map_err(|e| LogError::from_io(&self.path, e))?
            .len()
            == 0;

        let mut buf = String::new();
        if is_new {
            buf.push_str(self.language.header());
            buf.push('\n');
        }
        buf.push_str(&entry.to_line());
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| LogError::from_io(&self.path, e))?;
        file.flush().await.map_err(|e| LogError::from_io(&self.path, e))?;
        tracing::debug!("logged '{}' to {}", entry.text, self.path.display());
        Ok(())
    }

    /// All entries in file order; header and unparsable lines are skipped
    pub async fn read_all(&self) -> LogResult<Vec<LogEntry>> {
        let _guard = self.lock.lock().await;
        self.read_entries().await
    }

    /// Number of readable entries
    pub async fn count(&self) -> LogResult<usize> {
        Ok(self.read_all().await?.len())
    }

    /// Remove the entry at `index`; removing the last one deletes the file
    pub async fn delete_entry(&self, index: usize) -> LogResult<LogEntry> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        check_index(index, entries.len())?;
        let removed = entries.remove(index);
        self.rewrite(&entries).await?;
        Ok(removed)
    }

    /// Replace the entry at `index`
    pub async fn edit_entry(&self, index: usize, entry: LogEntry) -> LogResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        check_index(index, entries.len())?;
        entries[index] = entry;
        self.rewrite(&entries).await
    }

    /// Delete the log file; a missing file is not an error
    pub async fn clear(&self) -> LogResult<()> {
        let _guard = self.lock.lock().await;
        remove_if_exists(&self.path).await
    }

    async fn read_entries(&self) -> LogResult<Vec<LogEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LogError::from_io(&self.path, e)),
        };

        let mut entries = Vec::new();
        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() || (number == 0 && HeaderLanguage::is_header(line)) {
                continue;
            }
            match line.parse::<LogEntry>() {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::debug!("skipping log line {}: {}", number + 1, e),
            }
        }
        Ok(entries)
    }

    async fn rewrite(&self, entries: &[LogEntry]) -> LogResult<()> {
        if entries.is_empty() {
            return remove_if_exists(&self.path).await;
        }
        let mut content = String::from(self.language.header());
        content.push('\n');
        for entry in entries {
            content.push_str(&entry.to_line());
            content.push('\n');
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| LogError::from_io(&self.path, e))
    }

    async fn ensure_parent(&self) -> LogResult<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LogError::from_io(parent, e)),
            _ => Ok(()),
        }
    }
}

fn check_index(index: usize, len: usize) -> LogResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(LogError::OutOfRange { index, len })
    }
}

async fn remove_if_exists(path: &Path) -> LogResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LogError::from_io(path, e)),
    }
}
