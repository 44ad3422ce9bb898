//! Catalog store boundary
//!
//! The core depends on durable storage only through [`CatalogStore`]. The
//! filesystem implementation keeps one document per `*.yaml` file inside a
//! single directory.

use crate::error::{StoreError, StoreResult};
use crate::model::Catalog;
use crate::parser::{self, ParseOutcome};
use crate::writer;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// File extensions recognised as catalog documents
pub const DOCUMENT_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Named catalog documents on durable storage
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Document names, sorted
    async fn list(&self) -> StoreResult<Vec<String>>;

    /// Load and parse a document; a missing document is an empty catalog
    async fn load(&self, name: &str) -> StoreResult<ParseOutcome>;

    /// Serialize and persist a catalog under `name`
    async fn save(&self, name: &str, catalog: &Catalog) -> StoreResult<()>;

    /// Remove a document; removing a missing document succeeds
    async fn delete(&self, name: &str) -> StoreResult<()>;

    /// Persist an empty catalog, returning the name used
    async fn create_empty(&self, name: Option<&str>) -> StoreResult<String> {
        let name = name.map_or_else(generate_unique_name, str::to_string);
        self.save(&name, &Catalog::default()).await?;
        Ok(name)
    }

    /// Parse external content and persist it in canonical form
    async fn import(&self, content: &[u8], name: Option<&str>) -> StoreResult<(String, ParseOutcome)> {
        let outcome = parser::parse(content)?;
        let name = name.map_or_else(generate_unique_name, str::to_string);
        self.save(&name, &outcome.catalog).await?;
        Ok((name, outcome))
    }
}

/// Name of the form `checklist_<unix-millis>.yaml`
#[must_use]
pub fn generate_unique_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("checklist_{millis}.yaml")
}

/// Directory-backed catalog store
#[derive(Debug, Clone)]
pub struct FsCatalogStore {
    root: PathBuf,
}

impl FsCatalogStore {
    /// Create store rooted at `root`; the directory is created on first save
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a document name to its path
    ///
    /// # Errors
    /// `StoreError::InvalidName` if the name is empty or not a plain file name
    pub fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        let plain = !name.trim().is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !plain {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl CatalogStore for FsCatalogStore {
    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::from_io(&self.root, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::from_io(&self.root, e))?
        {
            let path = entry.path();
            let is_document = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext));
            if let (true, Some(name)) = (is_document, path.file_name().and_then(|n| n.to_str())) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn load(&self, name: &str) -> StoreResult<ParseOutcome> {
        let path = self.path_for(name)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "document not found, using empty catalog");
                return Ok(ParseOutcome::default());
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to read document: {}", e);
                return Err(StoreError::from_io(path, e));
            }
        };

        Ok(parser::parse(&bytes)?)
    }

    async fn save(&self, name: &str, catalog: &Catalog) -> StoreResult<()> {
        let path = self.path_for(name)?;
        let bytes = writer::serialize(catalog)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::from_io(&self.root, e))?;

        // Write beside the target, then rename over it.
        let staging = path.with_extension("tmp");
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|e| StoreError::from_io(&staging, e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| StoreError::from_io(&path, e))?;

        tracing::debug!(path = %path.display(), checklists = catalog.len(), "catalog saved");
        Ok(())
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::from_io(path, e)),
        }
    }
}
