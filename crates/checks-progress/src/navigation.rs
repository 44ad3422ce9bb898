//! Navigation controller
//!
//! Binds a [`ProgressSession`] to the checklist it tracks and translates
//! user intents (buttons, taps, voice transcripts) into state transitions
//! for whichever mode is active.
//!
//! # Bounds
//!
//! | mode         | `previous` at start | `next` at end          |
//! |--------------|---------------------|------------------------|
//! | step-by-step | [`NavOutcome::Exit`] | [`NavOutcome::Complete`] |
//! | full-list    | [`NavOutcome::Exit`] | [`NavOutcome::Complete`] |
//!
//! In full-list mode a fully checked page advances on its own after
//! [`AUTO_ADVANCE_DELAY`]; see [`NavigationController::auto_advance`].

use crate::mode::{resolve_for, DisplayMode, ModePreference};
use crate::pagination::{evaluate_auto_advance, AutoAdvance, PageLayout};
use crate::session::ProgressSession;
use checks_catalog::{Checklist, Step};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::time::Duration;

/// Pause between the last check on a page and the automatic page turn
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(300);

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Position changed
    Moved,
    /// Went back past the first step or page; leave the checklist
    Exit,
    /// Went forward past the last step or page; the checklist is done
    Complete,
}

/// Spoken navigation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Go back
    Previous,
    /// Go forward
    Next,
}

impl VoiceCommand {
    /// Find a command in a free-form transcript, case-insensitively
    ///
    /// Spanish keywords are checked before English ones, "back" before
    /// "forward" within each language.
    #[must_use]
    pub fn recognize(transcript: &str) -> Option<Self> {
        let lower = transcript.to_lowercase();
        [
            ("anterior", Self::Previous),
            ("siguiente", Self::Next),
            ("previous", Self::Previous),
            ("next", Self::Next),
        ]
        .into_iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, command)| command)
    }
}

/// Error for transcripts without a known command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no navigation command in '{0}'")]
pub struct UnrecognizedCommand(pub String);

impl FromStr for VoiceCommand {
    type Err = UnrecognizedCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::recognize(s).ok_or_else(|| UnrecognizedCommand(s.to_string()))
    }
}

impl fmt::Display for VoiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => write!(f, "previous"),
            Self::Next => write!(f, "next"),
        }
    }
}

/// Navigation over one checklist
#[derive(Debug)]
pub struct NavigationController {
    session: ProgressSession,
    checklist: Checklist,
    layout: PageLayout,
    auto_advance_delay: Duration,
}

impl NavigationController {
    /// Bind `session` to `checklist`, clamping any stale saved position
    pub fn new(session: ProgressSession, checklist: Checklist, layout: PageLayout) -> Self {
        let mut controller = Self {
            session,
            checklist,
            layout,
            auto_advance_delay: AUTO_ADVANCE_DELAY,
        };
        controller.clamp();
        controller
    }

    /// Override the auto-advance delay
    #[must_use]
    pub const fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    /// Underlying progress session
    #[inline]
    #[must_use]
    pub const fn session(&self) -> &ProgressSession {
        &self.session
    }

    /// Checklist being navigated
    #[inline]
    #[must_use]
    pub const fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Full-list page layout in use
    #[inline]
    #[must_use]
    pub const fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Effective display mode
    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        resolve_for(self.session.state().mode_preference(), &self.checklist)
    }

    /// Last valid page for the current layout
    #[must_use]
    pub fn max_page(&self) -> usize {
        self.layout.max_page(self.checklist.len())
    }

    /// Step shown in step-by-step mode
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.checklist.steps.get(self.session.state().step_index())
    }

    /// Positions shown on the current page
    #[must_use]
    pub fn current_page_range(&self) -> Range<usize> {
        self.layout
            .page_range(self.session.state().page_index(), self.checklist.len())
    }

    /// Steps shown on the current page
    #[must_use]
    pub fn current_page(&self) -> &[Step] {
        &self.checklist.steps[self.current_page_range()]
    }

    /// Apply a new layout; the page index is clamped against it
    pub fn set_layout(&mut self, layout: PageLayout) {
        self.layout = layout;
        self.clamp();
    }

    /// Go back in the active mode
    pub fn previous(&mut self) -> NavOutcome {
        let transition = match self.mode() {
            DisplayMode::StepByStep => self.session.prev_step(),
            DisplayMode::FullList => self.session.prev_page(),
        };
        if transition.changed() {
            NavOutcome::Moved
        } else {
            NavOutcome::Exit
        }
    }

    /// Go forward in the active mode
    pub fn next(&mut self) -> NavOutcome {
        let transition = match self.mode() {
            DisplayMode::StepByStep => self.session.next_step(self.checklist.max_step_index()),
            DisplayMode::FullList => self.session.next_page(self.max_page()),
        };
        if transition.changed() {
            NavOutcome::Moved
        } else {
            NavOutcome::Complete
        }
    }

    /// Run a voice command
    pub fn apply(&mut self, command: VoiceCommand) -> NavOutcome {
        match command {
            VoiceCommand::Previous => self.previous(),
            VoiceCommand::Next => self.next(),
        }
    }

    /// Run the command found in `transcript`, if voice control is on and one is found
    pub fn handle_voice(&mut self, transcript: &str) -> Option<NavOutcome> {
        if !self.session.state().voice_control() {
            tracing::debug!("ignoring transcript, voice control is off");
            return None;
        }
        let command = VoiceCommand::recognize(transcript)?;
        tracing::debug!("voice command '{}' from '{}'", command, transcript);
        Some(self.apply(command))
    }

    /// Check or uncheck a step by its position in the checklist
    ///
    /// Returns `None` for a position outside the checklist.
    pub fn toggle_item(&mut self, position: usize) -> Option<bool> {
        if position >= self.checklist.len() {
            return None;
        }
        Some(self.session.toggle_checked(position))
    }

    /// Auto-advance that would fire now, if any
    #[must_use]
    pub fn pending_auto_advance(&self) -> Option<AutoAdvance> {
        if !self.mode().is_full_list() {
            return None;
        }
        evaluate_auto_advance(self.session.state(), &self.layout, self.checklist.len())
    }

    /// Wait out the delay, then perform the auto-advance if it still applies
    ///
    /// Returns `None` when nothing is pending, or when the page stopped being
    /// fully checked during the delay.
    pub async fn auto_advance(&mut self) -> Option<NavOutcome> {
        self.pending_auto_advance()?;
        tokio::time::sleep(self.auto_advance_delay).await;

        match self.pending_auto_advance()? {
            AutoAdvance::NextPage => {
                let max_page = self.max_page();
                let _ = self.session.next_page(max_page);
                Some(NavOutcome::Moved)
            }
            AutoAdvance::Complete => Some(NavOutcome::Complete),
        }
    }

    /// Override or inherit the checklist's display mode
    pub fn set_mode_preference(&mut self, preference: ModePreference) {
        self.session.set_mode_preference(preference);
    }

    /// Enable or disable spoken commands
    pub fn set_voice_control(&mut self, enabled: bool) {
        self.session.set_voice_control(enabled);
    }

    /// Back to the first step and page with nothing checked
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Release the checklist and hand the session back
    #[must_use]
    pub fn into_session(self) -> ProgressSession {
        self.session
    }

    fn clamp(&mut self) {
        let max_index = self.checklist.max_step_index();
        let max_page = self.max_page();
        self.session.clamp(max_index, max_page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_in_priority_order() {
        assert_eq!(VoiceCommand::recognize("Siguiente por favor"), Some(VoiceCommand::Next));
        assert_eq!(VoiceCommand::recognize("ANTERIOR"), Some(VoiceCommand::Previous));
        assert_eq!(VoiceCommand::recognize("go to next"), Some(VoiceCommand::Next));
        assert_eq!(VoiceCommand::recognize("previous one"), Some(VoiceCommand::Previous));
        // "anterior" wins even when "next" is also present
        assert_eq!(VoiceCommand::recognize("next anterior"), Some(VoiceCommand::Previous));
        assert_eq!(VoiceCommand::recognize("hello"), None);
    }

    #[test]
    fn parse_rejects_unknown_transcripts() {
        assert_eq!("next".parse::<VoiceCommand>(), Ok(VoiceCommand::Next));
        assert!("stop".parse::<VoiceCommand>().is_err());
    }
}
