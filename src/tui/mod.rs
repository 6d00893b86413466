//! # TUI Shell
//!
//! The ratatui-specific layer and demo host for the input core. Owns the
//! terminal, a small in-memory task grid, and an output log; the core owns
//! classification and state.
//!
//! Control flow per key, as the core requires: the menu state machine gets
//! first refusal (F10 / Alt opens menu mode and then owns input until commit
//! or cancel), everything else goes to the [`InputRouter`]. Keys are
//! processed strictly in arrival order, one at a time — each `handle_key`
//! completes, render requests included, before the next key is read.

pub mod event;
pub mod ui;

use std::time::Duration;

use crossterm::event::KeyEvent;
use log::{info, warn};

use crate::core::config::ResolvedConfig;
use crate::core::key::is_menu_trigger;
use crate::core::menu::{MenuDefinition, MenuHooks, MenuStateMachine};
use crate::core::router::{HookError, InputRouter, RouterHooks};
use crate::core::session::SessionState;
use crate::tui::event::{ShellEvent, poll_event_timeout, read_key_blocking};
use crate::tui::ui::MenuView;

/// Commands the demo shell understands, used for Tab completion.
const COMMANDS: &[&str] = &["clear", "grid", "grid off", "help", "quit"];

/// Host-side state: the dataset the grid collaborator would own in a real
/// application, plus the output log the command executor writes to.
pub struct AppShell {
    pub headers: [&'static str; 4],
    pub grid: Vec<Vec<String>>,
    pub output: Vec<String>,
    pub prompt: String,
    pub menu_names: Vec<String>,
    /// Last selection reported through `render_grid_selection`.
    pub selected: (i32, i32),
    pub should_quit: bool,
    /// Grid-mode change requested by an executed command, applied by the
    /// main loop after `handle_key` returns (hooks never touch the router).
    pub pending_grid_mode: Option<bool>,
}

impl AppShell {
    pub fn new(config: &ResolvedConfig) -> Self {
        Self {
            headers: ["ID", "Title", "Status", "Due"],
            grid: sample_tasks(),
            output: vec!["Welcome to keymux. Type 'help' or press F10.".into()],
            prompt: config.prompt.clone(),
            menu_names: config
                .menu_model
                .menus
                .iter()
                .map(|m| m.name.clone())
                .collect(),
            selected: (0, 0),
            should_quit: false,
            pending_grid_mode: None,
        }
    }

    /// A shell with default config, for render tests.
    #[doc(hidden)]
    pub fn sample() -> Self {
        let config = ResolvedConfig {
            start_in_grid: false,
            prompt: crate::core::config::DEFAULT_PROMPT.to_string(),
            menu_model: crate::core::config::default_menu_model(),
        };
        Self::new(&config)
    }

    /// Selection clamped to the dataset, the bounding this host owes the
    /// core in exchange for unbounded `move_selection`.
    pub fn clamped_selection(&self, session: &SessionState) -> (usize, usize) {
        let rows = self.grid.len().saturating_sub(1);
        let cols = self.headers.len().saturating_sub(1);
        (
            (session.grid_selected_row.max(0) as usize).min(rows),
            (session.grid_selected_col.max(0) as usize).min(cols),
        )
    }

    fn dispatch_command(&mut self, command: &str) {
        info!("executing command: {command}");
        self.output.push(format!("{} {command}", self.prompt));
        match command {
            "help" => {
                self.output.push("commands: clear, grid, grid off, help, quit".into());
                self.output
                    .push("keys: F10/Alt menu, Esc command line, Enter/F2 edit cell".into());
            }
            "quit" => self.should_quit = true,
            "clear" => self.output.clear(),
            "grid" => self.pending_grid_mode = Some(true),
            "grid off" => self.pending_grid_mode = Some(false),
            _ => self.output.push(format!("unknown command: {command}")),
        }
    }

    /// Map a committed menu action id onto shell/router effects.
    pub fn apply_menu_action(&mut self, action: &str, router: &mut InputRouter) {
        info!("menu action: {action}");
        match action {
            "app.quit" => self.should_quit = true,
            "view.grid" => router.set_grid_browse_mode(true),
            "view.command" => router.set_grid_browse_mode(false),
            "log.clear" => self.output.clear(),
            "help.keys" => self.dispatch_command("help"),
            other => {
                warn!("unmapped menu action: {other}");
                self.output.push(format!("unmapped menu action: {other}"));
            }
        }
    }
}

impl RouterHooks for AppShell {
    fn execute_command(&mut self, command: &str) -> Result<(), HookError> {
        self.dispatch_command(command);
        Ok(())
    }

    fn request_completion(&mut self, buffer: &str, _cursor: usize) -> Result<(), HookError> {
        let matches: Vec<&str> = COMMANDS
            .iter()
            .copied()
            .filter(|c| c.starts_with(buffer.trim_start()))
            .collect();
        if !matches.is_empty() {
            self.output.push(format!("completions: {}", matches.join(", ")));
        }
        Ok(())
    }

    fn commit_cell_edit(&mut self, value: &str) -> Result<(), HookError> {
        let (row, col) = self.selected;
        let row = (row.max(0) as usize).min(self.grid.len().saturating_sub(1));
        let col = (col.max(0) as usize).min(self.headers.len().saturating_sub(1));
        if let Some(cell) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value.to_string();
            Ok(())
        } else {
            Err(HookError::new(format!("no cell at row {row} col {col}")))
        }
    }

    fn current_cell_value(&mut self) -> String {
        let (row, col) = self.selected;
        self.grid
            .get(row.max(0) as usize)
            .and_then(|r| r.get(col.max(0) as usize))
            .cloned()
            .unwrap_or_default()
    }

    fn render_grid_selection(&mut self, row: i32, col: i32) {
        self.selected = (row, col);
    }
}

fn sample_tasks() -> Vec<Vec<String>> {
    [
        ["1", "Wire up the menu bar", "active", "2026-09-02"],
        ["2", "Port the grid view", "active", "2026-09-05"],
        ["3", "Write interaction tests", "pending", "2026-09-09"],
        ["4", "Document key bindings", "pending", "2026-09-12"],
        ["5", "Cut the first release", "blocked", "2026-09-20"],
    ]
    .iter()
    .map(|row| row.iter().map(|s| s.to_string()).collect())
    .collect()
}

/// Renders full frames during a menu interaction, so the dropdown overlays
/// the live UI rather than a blank screen.
struct ShellMenuHooks<'a> {
    terminal: &'a mut ratatui::DefaultTerminal,
    shell: &'a AppShell,
    session: SessionState,
}

impl MenuHooks for ShellMenuHooks<'_> {
    fn render_menu_bar(&mut self, selected: usize) {
        let view = MenuView {
            selected,
            dropdown: None,
        };
        let _ = self
            .terminal
            .draw(|f| ui::draw_ui(f, self.shell, &self.session, Some(&view)));
    }

    fn render_dropdown(&mut self, menu: &MenuDefinition, selected_item: Option<usize>) {
        let selected = self
            .shell
            .menu_names
            .iter()
            .position(|n| *n == menu.name)
            .unwrap_or(0);
        let view = MenuView {
            selected,
            dropdown: Some((menu, selected_item)),
        };
        let _ = self
            .terminal
            .draw(|f| ui::draw_ui(f, self.shell, &self.session, Some(&view)));
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut shell = AppShell::new(&config);
    let mut router = InputRouter::new();
    let mut menu = MenuStateMachine::new(config.menu_model.clone());
    if config.start_in_grid {
        router.set_grid_browse_mode(true);
    }

    let mut terminal = ratatui::init();
    let mut needs_redraw = true;

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &shell, router.state(), None))?;
            needs_redraw = false;
        }

        let Some(event) = poll_event_timeout(Duration::from_millis(500)) else {
            continue;
        };
        match event {
            ShellEvent::Resize => needs_redraw = true,
            ShellEvent::Key(key) => {
                needs_redraw = true;
                handle_shell_key(&key, &mut shell, &mut router, &mut menu, &mut terminal);
                if shell.should_quit {
                    break;
                }
            }
        }
    }

    ratatui::restore();
    Ok(())
}

fn handle_shell_key(
    key: &KeyEvent,
    shell: &mut AppShell,
    router: &mut InputRouter,
    menu: &mut MenuStateMachine,
    terminal: &mut ratatui::DefaultTerminal,
) {
    // Menu gets first refusal. While its interaction runs it owns input
    // completely; router dispatch is suspended.
    if is_menu_trigger(key) {
        let action = {
            let mut hooks = ShellMenuHooks {
                terminal,
                shell,
                session: router.state().clone(),
            };
            menu.run_interaction(key, &mut read_key_blocking, &mut hooks)
        };
        if !action.is_empty() {
            shell.apply_menu_action(&action, router);
        }
        return;
    }

    router.handle_key(key, shell);
    if let Some(enabled) = shell.pending_grid_mode.take() {
        router.set_grid_browse_mode(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_command_sets_flag() {
        let mut shell = AppShell::sample();
        shell.dispatch_command("quit");
        assert!(shell.should_quit);
    }

    #[test]
    fn test_unknown_command_logged_to_output() {
        let mut shell = AppShell::sample();
        shell.dispatch_command("frobnicate");
        assert!(shell.output.last().unwrap().contains("unknown command"));
    }

    #[test]
    fn test_grid_command_requests_mode_change() {
        let mut shell = AppShell::sample();
        shell.dispatch_command("grid");
        assert_eq!(shell.pending_grid_mode, Some(true));
        shell.dispatch_command("grid off");
        assert_eq!(shell.pending_grid_mode, Some(false));
    }

    #[test]
    fn test_completion_suggestions() {
        let mut shell = AppShell::sample();
        shell.request_completion("gr", 2).unwrap();
        let line = shell.output.last().unwrap();
        assert!(line.contains("grid"));
        assert!(!line.contains("quit"));
    }

    #[test]
    fn test_commit_writes_selected_cell() {
        let mut shell = AppShell::sample();
        shell.render_grid_selection(1, 2);
        shell.commit_cell_edit("done").unwrap();
        assert_eq!(shell.grid[1][2], "done");
    }

    #[test]
    fn test_current_cell_value_reads_selection() {
        let mut shell = AppShell::sample();
        shell.render_grid_selection(0, 1);
        assert_eq!(shell.current_cell_value(), "Wire up the menu bar");
    }

    #[test]
    fn test_clamped_selection_bounds_against_dataset() {
        let shell = AppShell::sample();
        let mut session = SessionState::new();
        session.grid_selected_row = 99;
        session.grid_selected_col = 99;
        let (row, col) = shell.clamped_selection(&session);
        assert_eq!(row, shell.grid.len() - 1);
        assert_eq!(col, shell.headers.len() - 1);
    }

    #[test]
    fn test_menu_actions_drive_router_mode() {
        let mut shell = AppShell::sample();
        let mut router = InputRouter::new();
        shell.apply_menu_action("view.grid", &mut router);
        assert!(router.state().grid_browse_mode);
        shell.apply_menu_action("view.command", &mut router);
        assert!(!router.state().grid_browse_mode);
        shell.apply_menu_action("app.quit", &mut router);
        assert!(shell.should_quit);
    }

    #[test]
    fn test_full_command_round_trip_through_router() {
        let mut shell = AppShell::sample();
        let mut router = InputRouter::new();
        for c in "help".chars() {
            router.handle_key(&key(KeyCode::Char(c)), &mut shell);
        }
        router.handle_key(&key(KeyCode::Enter), &mut shell);
        assert!(shell.output.iter().any(|l| l.contains("commands:")));
        assert!(router.state().command_buffer.is_empty());
    }
}
