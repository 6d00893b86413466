//! # Session State
//!
//! One `SessionState` exists per interactive session. It is owned by the
//! [`InputRouter`](crate::core::router::InputRouter) and mutated in place for
//! the session's lifetime; collaborators only see read-only snapshots.
//!
//! The three mode flags (`grid_browse_mode`, `inline_edit_mode`,
//! `modal_active`) together imply `active_context`:
//!
//! - `inline_edit_mode`  → `InlineEdit`
//! - `modal_active`      → `Modal`
//! - `grid_browse_mode`  → `GridNavigation`
//! - none of the above   → `CommandLine`
//!
//! One deliberate exception: grid browse is *sticky*. After Escape pulls
//! focus back to the command line, `grid_browse_mode` stays set so the next
//! navigation key re-enters the grid. `CommandLine` focus with the grid flag
//! set is therefore a legal combination, not a drift.

use chrono::{DateTime, Utc};
use log::warn;

/// The four input contexts. Exactly one is active at any time; it is a
/// property of the session, not of individual key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    CommandLine,
    GridNavigation,
    InlineEdit,
    Modal,
}

/// All mutable per-session input state, in one place.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub active_context: InputContext,
    pub grid_browse_mode: bool,
    pub inline_edit_mode: bool,
    pub modal_active: bool,
    /// Command-line text buffer; `command_cursor` is a byte offset that is
    /// always on a char boundary, in `0..=command_buffer.len()`.
    pub command_buffer: String,
    pub command_cursor: usize,
    /// Grid selection. Never negative; bounding against the dataset size is
    /// the grid-data collaborator's job, not this core's.
    pub grid_selected_row: i32,
    pub grid_selected_col: i32,
    /// In-progress cell edit buffer, only meaningful while
    /// `inline_edit_mode` is set.
    pub grid_editing_value: String,
    pub grid_edit_cursor: usize,
    /// Updated on every handled key. Passive: external idle policies read
    /// it, nothing in this core schedules off it.
    pub last_activity: DateTime<Utc>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            active_context: InputContext::CommandLine,
            grid_browse_mode: false,
            inline_edit_mode: false,
            modal_active: false,
            command_buffer: String::new(),
            command_cursor: 0,
            grid_selected_row: 0,
            grid_selected_col: 0,
            grid_editing_value: String::new(),
            grid_edit_cursor: 0,
            last_activity: Utc::now(),
        }
    }

    /// Record activity. Called once per `handle_key`, before dispatch.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Full reset to command-line defaults. Safe to call at any time; no
    /// operation can be in flight between keys.
    pub fn reset(&mut self) {
        *self = SessionState::new();
    }

    /// Context implied by the mode flags alone.
    pub fn context_from_flags(&self) -> InputContext {
        if self.inline_edit_mode {
            InputContext::InlineEdit
        } else if self.modal_active {
            InputContext::Modal
        } else if self.grid_browse_mode {
            InputContext::GridNavigation
        } else {
            InputContext::CommandLine
        }
    }

    /// Self-correct `active_context` if it drifted from the mode flags.
    ///
    /// Drift cannot happen through the documented transitions; if it shows
    /// up anyway, recompute from the flags instead of crashing the session.
    pub fn enforce_invariants(&mut self) {
        // Sticky grid browse: command-line focus with the grid flag set.
        if self.active_context == InputContext::CommandLine
            && !self.inline_edit_mode
            && !self.modal_active
        {
            return;
        }
        let expected = self.context_from_flags();
        if self.active_context != expected {
            warn!(
                "session invariant drift: context {:?} with flags grid={} edit={} modal={}, correcting to {:?}",
                self.active_context,
                self.grid_browse_mode,
                self.inline_edit_mode,
                self.modal_active,
                expected
            );
            self.active_context = expected;
        }
    }

    /// Begin an inline cell edit seeded with `value`, cursor at `cursor`.
    pub(crate) fn enter_inline_edit(&mut self, value: String, cursor: usize) {
        self.grid_editing_value = value;
        self.grid_edit_cursor = cursor;
        self.inline_edit_mode = true;
        self.active_context = InputContext::InlineEdit;
    }

    /// Leave inline edit and return focus to grid navigation. The edit
    /// buffer is cleared either way; committing its value is the router's
    /// responsibility before calling this.
    pub(crate) fn exit_inline_edit_to_grid(&mut self) {
        self.grid_editing_value.clear();
        self.grid_edit_cursor = 0;
        self.inline_edit_mode = false;
        self.grid_browse_mode = true;
        self.active_context = InputContext::GridNavigation;
    }

    /// Priority-key override: force focus to the command line from any
    /// state. Discards an in-progress inline edit without committing and
    /// closes a modal; leaves sticky `grid_browse_mode` untouched.
    pub(crate) fn force_command_line(&mut self) {
        if self.inline_edit_mode {
            self.grid_editing_value.clear();
            self.grid_edit_cursor = 0;
            self.inline_edit_mode = false;
        }
        self.modal_active = false;
        self.active_context = InputContext::CommandLine;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = SessionState::new();
        assert_eq!(s.active_context, InputContext::CommandLine);
        assert!(!s.grid_browse_mode);
        assert!(!s.inline_edit_mode);
        assert!(!s.modal_active);
        assert!(s.command_buffer.is_empty());
        assert_eq!(s.command_cursor, 0);
        assert_eq!((s.grid_selected_row, s.grid_selected_col), (0, 0));
    }

    #[test]
    fn test_context_from_flags_precedence() {
        let mut s = SessionState::new();
        s.grid_browse_mode = true;
        assert_eq!(s.context_from_flags(), InputContext::GridNavigation);
        s.modal_active = true;
        assert_eq!(s.context_from_flags(), InputContext::Modal);
        s.inline_edit_mode = true;
        assert_eq!(s.context_from_flags(), InputContext::InlineEdit);
    }

    #[test]
    fn test_enforce_invariants_corrects_drift() {
        let mut s = SessionState::new();
        s.inline_edit_mode = true;
        s.active_context = InputContext::GridNavigation; // drifted
        s.enforce_invariants();
        assert_eq!(s.active_context, InputContext::InlineEdit);
    }

    #[test]
    fn test_sticky_grid_browse_is_not_drift() {
        let mut s = SessionState::new();
        s.grid_browse_mode = true;
        s.active_context = InputContext::CommandLine; // after Escape
        s.enforce_invariants();
        assert_eq!(s.active_context, InputContext::CommandLine);
        assert!(s.grid_browse_mode);
    }

    #[test]
    fn test_force_command_line_discards_edit_keeps_grid_flag() {
        let mut s = SessionState::new();
        s.grid_browse_mode = true;
        s.enter_inline_edit("abc".into(), 3);
        s.modal_active = true;
        s.force_command_line();
        assert_eq!(s.active_context, InputContext::CommandLine);
        assert!(!s.inline_edit_mode);
        assert!(!s.modal_active);
        assert!(s.grid_editing_value.is_empty());
        assert!(s.grid_browse_mode, "grid browse stays sticky");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = SessionState::new();
        s.command_buffer = "task add".into();
        s.command_cursor = 4;
        s.grid_browse_mode = true;
        s.grid_selected_row = 7;
        s.reset();
        assert_eq!(s.active_context, InputContext::CommandLine);
        assert!(s.command_buffer.is_empty());
        assert_eq!(s.grid_selected_row, 0);
        assert!(!s.grid_browse_mode);
    }
}
