//! Checks Catalog Layer
//!
//! The trusted boundary between untrusted checklist documents and the typed
//! in-memory model.
//!
//! # Core Operations
//!
//! - **Parse**: decode a document into a typed [`Catalog`], dropping and
//!   reporting invalid entries instead of failing
//! - **Serialize**: write a [`Catalog`] back in canonical form
//! - **Store**: load/save/list/delete named documents through [`CatalogStore`]
//!
//! # Architecture
//!
//! ```text
//! bytes → parser → ParseOutcome { Catalog, warnings } → (edit) → writer → bytes
//!                        ↑                                           ↓
//!                        └────────────── CatalogStore ───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use checks_catalog::{CatalogStore, FsCatalogStore, LoadReport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FsCatalogStore::new("checklists");
//! let report = LoadReport::resolve(store.load("aircraft.yaml").await);
//!
//! let mut catalog = report.catalog;
//! catalog.checklists.retain(|c| c.id != "obsolete");
//! store.save("aircraft.yaml", &catalog).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod store;
pub mod writer;

// Re-exports for convenience
pub use error::{EntrySkipped, MalformedReason, ParseError, SkipReason, StoreError, StoreResult, WriteError};
pub use model::{AltitudeUnit, Catalog, Checklist, PressureUnit, Step, DOCUMENT_VERSION};
pub use parser::{parse, parse_str, ParseOutcome};
pub use report::{LoadReport, Notice};
pub use store::{CatalogStore, FsCatalogStore};
pub use writer::{serialize, serialize_to_string};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with catalogs
    pub use crate::error::{EntrySkipped, ParseError, StoreError};
    pub use crate::model::{Catalog, Checklist, Step};
    pub use crate::parser::{parse, ParseOutcome};
    pub use crate::store::CatalogStore;
    pub use crate::writer::serialize;
}
