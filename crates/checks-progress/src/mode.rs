//! Display mode preference and resolution

use checks_catalog::Checklist;
use serde::{Deserialize, Serialize};

/// Per-checklist user preference for the display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModePreference {
    /// Use the checklist's default mode
    #[default]
    Inherit,
    /// Always step-by-step
    ForceStepByStep,
    /// Always full-list
    ForceFullList,
}

impl ModePreference {
    /// From a nullable flag (`None` = inherit)
    #[must_use]
    pub const fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => Self::Inherit,
            Some(true) => Self::ForceFullList,
            Some(false) => Self::ForceStepByStep,
        }
    }

    /// As a nullable flag (`None` = inherit)
    #[must_use]
    pub const fn as_flag(self) -> Option<bool> {
        match self {
            Self::Inherit => None,
            Self::ForceFullList => Some(true),
            Self::ForceStepByStep => Some(false),
        }
    }
}

/// How a checklist is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// One step at a time with linear navigation
    StepByStep,
    /// Paginated list of checkable steps
    FullList,
}

impl DisplayMode {
    /// Whether this is full-list mode
    #[inline]
    #[must_use]
    pub const fn is_full_list(self) -> bool {
        matches!(self, Self::FullList)
    }
}

/// Effective mode: the preference wins, then the checklist default, then step-by-step
#[must_use]
pub const fn resolve_mode(preference: ModePreference, default_full_list: Option<bool>) -> DisplayMode {
    let full_list = match preference {
        ModePreference::ForceFullList => true,
        ModePreference::ForceStepByStep => false,
        ModePreference::Inherit => matches!(default_full_list, Some(true)),
    };
    if full_list {
        DisplayMode::FullList
    } else {
        DisplayMode::StepByStep
    }
}

/// [`resolve_mode`] against a checklist's metadata
#[inline]
#[must_use]
pub fn resolve_for(preference: ModePreference, checklist: &Checklist) -> DisplayMode {
    resolve_mode(preference, checklist.full_list)
}
