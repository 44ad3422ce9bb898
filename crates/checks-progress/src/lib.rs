//! Checks Progress Layer
//!
//! Tracks where the user is inside each checklist and what they have
//! checked, independently per checklist id.
//!
//! # Core Operations
//!
//! - **Navigate**: bounded step and page movement through [`ProgressState`]
//! - **Paginate**: derive page size from display capacity via [`PageLayout`]
//! - **Persist**: asynchronous, ordered snapshots through [`ProgressSession`]
//! - **Drive**: map buttons, taps and voice transcripts onto transitions with
//!   [`NavigationController`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             NavigationController             │
//! │   (mode resolution, voice, auto-advance)     │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │               ProgressSession                │
//! │   ProgressState (memory, source of truth)    │
//! └──────────────────────┬───────────────────────┘
//!                        │ mpsc
//! ┌──────────────────────▼───────────────────────┐
//! │                ProgressStore                 │
//! │   MemoryProgressStore │ FileProgressStore    │
//! └──────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod mode;
pub mod navigation;
pub mod pagination;
pub mod session;
pub mod state_machine;
pub mod store;

// Re-exports for convenience
pub use error::{ProgressStoreError, ProgressStoreResult};
pub use mode::{resolve_for, resolve_mode, DisplayMode, ModePreference};
pub use navigation::{NavOutcome, NavigationController, UnrecognizedCommand, VoiceCommand, AUTO_ADVANCE_DELAY};
pub use pagination::{evaluate_auto_advance, AutoAdvance, PageLayout, PaginationConfig};
pub use session::ProgressSession;
pub use state_machine::{ProgressRecord, ProgressState, Transition};
pub use store::{FileProgressStore, MemoryProgressStore, ProgressStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving checklist progress
    pub use crate::mode::{DisplayMode, ModePreference};
    pub use crate::navigation::{NavOutcome, NavigationController, VoiceCommand};
    pub use crate::pagination::PageLayout;
    pub use crate::session::ProgressSession;
    pub use crate::state_machine::{ProgressState, Transition};
    pub use crate::store::ProgressStore;
}
