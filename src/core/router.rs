//! # Input Router
//!
//! Arbitrates every incoming key event between four contexts: the command
//! line, grid navigation, inline cell editing, and modal dialogs. Exactly
//! one handler processes each key; no key is ever silently lost without
//! either falling through to the command line's insertion behavior or being
//! dropped by a documented rule.
//!
//! Classification runs in priority order, first match wins:
//!
//! 1. Escape, Ctrl+*, Alt+*, and F-keys force focus back to the command
//!    line regardless of prior state, so no mode can trap the user. F2 is
//!    the one carve-out: while grid browse is active it is the grid's
//!    edit-cell binding, not a function-key override.
//! 2. An open modal owns all remaining input.
//! 3. An in-progress inline edit owns text keys.
//! 4. Grid browse claims navigation keys and plain alphanumerics
//!    (quick-edit entry).
//! 5. Everything else lands on the command line — the "home" context.
//!    Navigation and editing are opt-in overlays, not replacements.
//!
//! The router never renders. Handlers report through the injected
//! [`RouterHooks`], and hook failures are absorbed at the `handle_key`
//! boundary: log, reset to command-line defaults, keep the session alive.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent};
use log::{debug, warn};

use crate::core::key::{
    is_grid_nav_key, is_priority_key, next_char_boundary, prev_char_boundary, printable_char,
};
use crate::core::session::{InputContext, SessionState};

/// Rows jumped by PageUp/PageDown in grid navigation.
const GRID_PAGE_ROWS: i32 = 10;

/// Failure reported by an injected hook. Absorbed at the `handle_key`
/// boundary; never propagates to the terminal read loop.
#[derive(Debug)]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hook failed: {}", self.message)
    }
}

impl std::error::Error for HookError {}

/// Callbacks the router consumes from its host.
///
/// Every method has a default no-op body so partial hosts (tests exercising
/// only the command line, say) stub nothing. Commit-style hooks are
/// fallible; render requests are fire-and-forget.
pub trait RouterHooks {
    /// A non-blank command was committed with Enter.
    fn execute_command(&mut self, command: &str) -> Result<(), HookError> {
        let _ = command;
        Ok(())
    }

    /// Tab was pressed on the command line.
    fn request_completion(&mut self, buffer: &str, cursor: usize) -> Result<(), HookError> {
        let _ = (buffer, cursor);
        Ok(())
    }

    /// An inline cell edit was committed with Enter.
    fn commit_cell_edit(&mut self, value: &str) -> Result<(), HookError> {
        let _ = value;
        Ok(())
    }

    /// A key arrived while a modal dialog owns input.
    fn handle_modal_key(&mut self, key: &KeyEvent) -> Result<(), HookError> {
        let _ = key;
        Ok(())
    }

    /// Current value of the selected cell, used to seed an inline edit
    /// entered via Enter/F2 (quick edit seeds from the typed character
    /// instead and never calls this).
    fn current_cell_value(&mut self) -> String {
        String::new()
    }

    fn render_command_line(&mut self, buffer: &str, cursor: usize) {
        let _ = (buffer, cursor);
    }

    fn render_grid_selection(&mut self, row: i32, col: i32) {
        let _ = (row, col);
    }

    fn render_inline_edit(&mut self, value: &str, cursor: usize) {
        let _ = (value, cursor);
    }
}

/// The input router. Owns the session state exclusively; hosts observe it
/// through [`InputRouter::state`] and the render hooks.
pub struct InputRouter {
    session: SessionState,
}

impl InputRouter {
    pub fn new() -> Self {
        Self {
            session: SessionState::new(),
        }
    }

    /// Read-only snapshot of the session state, for diagnostics and tests.
    pub fn state(&self) -> &SessionState {
        &self.session
    }

    /// Explicit mode control for the owning shell. Enabling moves focus to
    /// the grid immediately (unless an edit or modal is in progress);
    /// disabling returns focus to the command line.
    pub fn set_grid_browse_mode(&mut self, enabled: bool) {
        self.session.grid_browse_mode = enabled;
        if self.session.inline_edit_mode || self.session.modal_active {
            return;
        }
        self.session.active_context = if enabled {
            InputContext::GridNavigation
        } else {
            InputContext::CommandLine
        };
    }

    /// Open or close a modal dialog. While open, every key goes to
    /// [`RouterHooks::handle_modal_key`] except the priority keys, which
    /// bypass the modal and force the command line.
    pub fn set_modal_active(&mut self, active: bool) {
        self.session.modal_active = active;
        if active {
            self.session.active_context = InputContext::Modal;
        } else {
            self.session.enforce_invariants();
            if !self.session.inline_edit_mode {
                self.session.active_context = if self.session.grid_browse_mode {
                    InputContext::GridNavigation
                } else {
                    InputContext::CommandLine
                };
            }
        }
    }

    /// Force the session back to command-line defaults. Safe at any time.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// The sole entry point: route one key event to exactly one handler.
    pub fn handle_key(&mut self, key: &KeyEvent, hooks: &mut dyn RouterHooks) {
        self.session.touch();
        self.session.enforce_invariants();

        let context = self.classify(key);
        debug!("route {:?} ({:?}) -> {:?}", key.code, key.modifiers, context);

        let result = match context {
            InputContext::CommandLine => self.handle_command_line(key, hooks),
            InputContext::GridNavigation => self.handle_grid(key, hooks),
            InputContext::InlineEdit => self.handle_inline_edit(key, hooks),
            InputContext::Modal => hooks.handle_modal_key(key),
        };

        if let Err(e) = result {
            warn!("{e} while handling {:?}; resetting to command line", key.code);
            self.session.reset();
            hooks.render_command_line(&self.session.command_buffer, self.session.command_cursor);
        }
    }

    /// Decide which context handles `key`, updating mode flags on the way.
    fn classify(&mut self, key: &KeyEvent) -> InputContext {
        // F2 belongs to the grid's edit binding while browsing, not to the
        // function-key override.
        let grid_f2 = key.code == KeyCode::F(2)
            && self.session.grid_browse_mode
            && !self.session.inline_edit_mode
            && !self.session.modal_active;

        if is_priority_key(key) && !grid_f2 {
            self.session.force_command_line();
            return InputContext::CommandLine;
        }
        if self.session.modal_active {
            self.session.active_context = InputContext::Modal;
            return InputContext::Modal;
        }
        if self.session.inline_edit_mode {
            self.session.active_context = InputContext::InlineEdit;
            return InputContext::InlineEdit;
        }
        if self.session.grid_browse_mode
            && (grid_f2
                || is_grid_nav_key(key)
                || printable_char(key).is_some_and(|c| c.is_alphanumeric()))
        {
            self.session.active_context = InputContext::GridNavigation;
            return InputContext::GridNavigation;
        }
        self.session.active_context = InputContext::CommandLine;
        InputContext::CommandLine
    }

    fn handle_command_line(
        &mut self,
        key: &KeyEvent,
        hooks: &mut dyn RouterHooks,
    ) -> Result<(), HookError> {
        let s = &mut self.session;
        match key.code {
            KeyCode::Enter => {
                let command = s.command_buffer.trim().to_string();
                if !command.is_empty() {
                    hooks.execute_command(&command)?;
                    s.command_buffer.clear();
                    s.command_cursor = 0;
                }
                // Blank buffer: no execute, no clear.
            }
            KeyCode::Backspace => {
                if s.command_cursor > 0 {
                    let prev = prev_char_boundary(&s.command_buffer, s.command_cursor);
                    s.command_buffer.drain(prev..s.command_cursor);
                    s.command_cursor = prev;
                }
            }
            KeyCode::Left => {
                if s.command_cursor > 0 {
                    s.command_cursor = prev_char_boundary(&s.command_buffer, s.command_cursor);
                }
            }
            KeyCode::Right => {
                if s.command_cursor < s.command_buffer.len() {
                    s.command_cursor = next_char_boundary(&s.command_buffer, s.command_cursor);
                }
            }
            KeyCode::Tab => {
                hooks.request_completion(&s.command_buffer, s.command_cursor)?;
            }
            _ => {
                if let Some(c) = printable_char(key) {
                    s.command_buffer.insert(s.command_cursor, c);
                    s.command_cursor += c.len_utf8();
                }
                // Remaining control keys (Escape, F-keys, ...) are dropped.
            }
        }
        hooks.render_command_line(&s.command_buffer, s.command_cursor);
        Ok(())
    }

    fn handle_grid(
        &mut self,
        key: &KeyEvent,
        hooks: &mut dyn RouterHooks,
    ) -> Result<(), HookError> {
        match key.code {
            KeyCode::Up => self.move_selection(0, -1, hooks),
            KeyCode::Down => self.move_selection(0, 1, hooks),
            KeyCode::Left => self.move_selection(-1, 0, hooks),
            KeyCode::Right => self.move_selection(1, 0, hooks),
            KeyCode::PageUp => self.move_selection(0, -GRID_PAGE_ROWS, hooks),
            KeyCode::PageDown => self.move_selection(0, GRID_PAGE_ROWS, hooks),
            KeyCode::Home => {
                self.session.grid_selected_col = 0;
                hooks.render_grid_selection(
                    self.session.grid_selected_row,
                    self.session.grid_selected_col,
                );
            }
            KeyCode::End => {
                // The far edge depends on the dataset; the collaborator
                // clamps, this core just re-renders.
                hooks.render_grid_selection(
                    self.session.grid_selected_row,
                    self.session.grid_selected_col,
                );
            }
            KeyCode::Enter | KeyCode::F(2) => {
                let seed = hooks.current_cell_value();
                let cursor = seed.len();
                self.session.enter_inline_edit(seed, cursor);
                hooks.render_inline_edit(
                    &self.session.grid_editing_value,
                    self.session.grid_edit_cursor,
                );
            }
            _ => {
                // Quick edit: a typed alphanumeric overwrites the cell with
                // that single character and starts editing.
                if let Some(c) = printable_char(key).filter(|c| c.is_alphanumeric()) {
                    self.session.enter_inline_edit(c.to_string(), c.len_utf8());
                    hooks.render_inline_edit(
                        &self.session.grid_editing_value,
                        self.session.grid_edit_cursor,
                    );
                }
            }
        }
        Ok(())
    }

    /// Step the grid selection. Lower-bounded at zero; the upper bound is
    /// the grid-data collaborator's to enforce.
    fn move_selection(&mut self, delta_col: i32, delta_row: i32, hooks: &mut dyn RouterHooks) {
        let s = &mut self.session;
        s.grid_selected_row = (s.grid_selected_row + delta_row).max(0);
        s.grid_selected_col = (s.grid_selected_col + delta_col).max(0);
        hooks.render_grid_selection(s.grid_selected_row, s.grid_selected_col);
    }

    fn handle_inline_edit(
        &mut self,
        key: &KeyEvent,
        hooks: &mut dyn RouterHooks,
    ) -> Result<(), HookError> {
        // Escape never reaches this handler: the priority override cancels
        // the edit (discard, no commit) and lands on the command line.
        let s = &mut self.session;
        match key.code {
            KeyCode::Enter => {
                let value = s.grid_editing_value.clone();
                hooks.commit_cell_edit(&value)?;
                s.exit_inline_edit_to_grid();
                hooks.render_grid_selection(s.grid_selected_row, s.grid_selected_col);
                return Ok(());
            }
            KeyCode::Backspace => {
                if s.grid_edit_cursor > 0 {
                    let prev = prev_char_boundary(&s.grid_editing_value, s.grid_edit_cursor);
                    s.grid_editing_value.drain(prev..s.grid_edit_cursor);
                    s.grid_edit_cursor = prev;
                }
            }
            KeyCode::Left => {
                if s.grid_edit_cursor > 0 {
                    s.grid_edit_cursor = prev_char_boundary(&s.grid_editing_value, s.grid_edit_cursor);
                }
            }
            KeyCode::Right => {
                if s.grid_edit_cursor < s.grid_editing_value.len() {
                    s.grid_edit_cursor = next_char_boundary(&s.grid_editing_value, s.grid_edit_cursor);
                }
            }
            _ => {
                if let Some(c) = printable_char(key) {
                    s.grid_editing_value.insert(s.grid_edit_cursor, c);
                    s.grid_edit_cursor += c.len_utf8();
                }
            }
        }
        hooks.render_inline_edit(&s.grid_editing_value, s.grid_edit_cursor);
        Ok(())
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}
