//! # Menu State Machine
//!
//! Keyboard-only menu bar: `Idle` → `MenuBar` (top-level menu highlighted)
//! → `Dropdown` (items visible) → back to `Idle` on commit or cancel.
//!
//! Runtime state is a closed enum, so a dropdown existing without a selected
//! menu is unrepresentable. Separators and disabled items are never valid
//! selection targets; navigation skips them, bounded by one full cycle so a
//! menu made entirely of separators/disabled items is a no-op rather than an
//! infinite loop.
//!
//! While a menu interaction is running it owns input completely (menu
//! navigation uses the same arrow keys the grid would otherwise claim), so
//! the host suspends router dispatch for the duration of
//! [`MenuStateMachine::run_interaction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::core::key::is_menu_trigger;

/// One entry in a dropdown. Separators carry no hotkey or action.
#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub hotkey: Option<char>,
    pub action: String,
    pub enabled: bool,
    pub separator: bool,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, hotkey: char, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            hotkey: Some(hotkey),
            action: action.into(),
            enabled: true,
            separator: false,
        }
    }

    pub fn separator() -> Self {
        Self {
            label: String::new(),
            hotkey: None,
            action: String::new(),
            enabled: false,
            separator: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this item can be highlighted or committed.
    pub fn selectable(&self) -> bool {
        self.enabled && !self.separator
    }

    fn hotkey_matches(&self, c: char) -> bool {
        self.selectable() && self.hotkey.is_some_and(|h| h.eq_ignore_ascii_case(&c))
    }
}

/// A top-level menu and its dropdown items.
#[derive(Debug, Clone)]
pub struct MenuDefinition {
    pub name: String,
    pub hotkey: char,
    pub items: Vec<MenuItem>,
}

impl MenuDefinition {
    pub fn new(name: impl Into<String>, hotkey: char, items: Vec<MenuItem>) -> Self {
        Self {
            name: name.into(),
            hotkey,
            items,
        }
    }

    fn first_selectable(&self) -> Option<usize> {
        self.items.iter().position(MenuItem::selectable)
    }
}

/// The full menu bar, built once at startup and read-mostly after.
#[derive(Debug, Clone, Default)]
pub struct MenuModel {
    pub menus: Vec<MenuDefinition>,
}

impl MenuModel {
    pub fn new(menus: Vec<MenuDefinition>) -> Self {
        Self { menus }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuState {
    Idle,
    MenuBar { selected: usize },
    /// `item` is `None` only when the dropdown has no selectable item at
    /// all (the degenerate case): nothing is highlighted and Enter is inert.
    Dropdown { menu: usize, item: Option<usize> },
}

/// Result of feeding one key to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Still navigating; re-render and keep feeding keys.
    Pending,
    /// An enabled, non-separator item was committed.
    Committed(String),
    /// Menu mode was left without committing.
    Cancelled,
}

/// Render requests emitted during a menu interaction. Default no-ops so
/// tests drive the machine without a terminal.
pub trait MenuHooks {
    fn render_menu_bar(&mut self, selected: usize) {
        let _ = selected;
    }

    fn render_dropdown(&mut self, menu: &MenuDefinition, selected_item: Option<usize>) {
        let _ = (menu, selected_item);
    }
}

/// No-op hooks for hosts that render elsewhere.
pub struct NullMenuHooks;

impl MenuHooks for NullMenuHooks {}

pub struct MenuStateMachine {
    model: MenuModel,
    state: MenuState,
}

impl MenuStateMachine {
    pub fn new(model: MenuModel) -> Self {
        Self {
            model,
            state: MenuState::Idle,
        }
    }

    pub fn model(&self) -> &MenuModel {
        &self.model
    }

    // Diagnostics accessors mirroring the runtime-state fields.

    pub fn in_menu_mode(&self) -> bool {
        self.state != MenuState::Idle
    }

    pub fn selected_menu(&self) -> Option<usize> {
        match self.state {
            MenuState::Idle => None,
            MenuState::MenuBar { selected } => Some(selected),
            MenuState::Dropdown { menu, .. } => Some(menu),
        }
    }

    pub fn dropdown_open(&self) -> bool {
        matches!(self.state, MenuState::Dropdown { .. })
    }

    pub fn selected_item(&self) -> Option<usize> {
        match self.state {
            MenuState::Dropdown { item, .. } => item,
            _ => None,
        }
    }

    /// Force back to idle. Safe at any time.
    pub fn reset(&mut self) {
        self.state = MenuState::Idle;
    }

    /// Try to enter menu mode from `key`. F10 and Alt+anything activate;
    /// Alt combined with a menu's hotkey short-circuits straight into that
    /// menu's dropdown since the target is already unambiguous.
    pub fn activate(&mut self, key: &KeyEvent) -> bool {
        if self.model.menus.is_empty() || !is_menu_trigger(key) {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::ALT)
            && let KeyCode::Char(c) = key.code
            && let Some(idx) = self
                .model
                .menus
                .iter()
                .position(|m| m.hotkey.eq_ignore_ascii_case(&c))
        {
            debug!("menu: Alt+{c} opens '{}' directly", self.model.menus[idx].name);
            self.open_dropdown(idx);
            return true;
        }
        self.state = MenuState::MenuBar { selected: 0 };
        true
    }

    /// Feed one key while in menu mode.
    pub fn handle_key(&mut self, key: &KeyEvent) -> MenuOutcome {
        match self.state {
            MenuState::Idle => MenuOutcome::Cancelled,
            MenuState::MenuBar { selected } => self.handle_menu_bar(selected, key),
            MenuState::Dropdown { menu, item } => self.handle_dropdown(menu, item, key),
        }
    }

    /// Run one full menu interaction to completion. Blocks within the menu
    /// subsystem's own read loop (`next_key`), rendering through `hooks`
    /// before each read. Returns the committed action id, or an empty
    /// string when cancelled (also when `next_key` runs dry).
    pub fn run_interaction(
        &mut self,
        trigger: &KeyEvent,
        next_key: &mut dyn FnMut() -> Option<KeyEvent>,
        hooks: &mut dyn MenuHooks,
    ) -> String {
        if !self.activate(trigger) {
            return String::new();
        }
        loop {
            self.render(hooks);
            let Some(key) = next_key() else {
                self.reset();
                return String::new();
            };
            match self.handle_key(&key) {
                MenuOutcome::Pending => {}
                MenuOutcome::Committed(action) => {
                    debug!("menu: committed '{action}'");
                    return action;
                }
                MenuOutcome::Cancelled => return String::new(),
            }
        }
    }

    fn render(&self, hooks: &mut dyn MenuHooks) {
        match self.state {
            MenuState::Idle => {}
            MenuState::MenuBar { selected } => hooks.render_menu_bar(selected),
            MenuState::Dropdown { menu, item } => {
                hooks.render_dropdown(&self.model.menus[menu], item);
            }
        }
    }

    fn open_dropdown(&mut self, menu: usize) {
        let item = self.model.menus[menu].first_selectable();
        self.state = MenuState::Dropdown { menu, item };
    }

    fn handle_menu_bar(&mut self, selected: usize, key: &KeyEvent) -> MenuOutcome {
        let count = self.model.menus.len();
        match key.code {
            KeyCode::Left => {
                self.state = MenuState::MenuBar {
                    selected: (selected + count - 1) % count,
                };
                MenuOutcome::Pending
            }
            KeyCode::Right => {
                self.state = MenuState::MenuBar {
                    selected: (selected + 1) % count,
                };
                MenuOutcome::Pending
            }
            KeyCode::Enter | KeyCode::Down => {
                self.open_dropdown(selected);
                MenuOutcome::Pending
            }
            KeyCode::Esc => {
                self.reset();
                MenuOutcome::Cancelled
            }
            KeyCode::Char(c) => {
                if let Some(idx) = self
                    .model
                    .menus
                    .iter()
                    .position(|m| m.hotkey.eq_ignore_ascii_case(&c))
                {
                    self.open_dropdown(idx);
                }
                MenuOutcome::Pending
            }
            _ => MenuOutcome::Pending,
        }
    }

    fn handle_dropdown(&mut self, menu: usize, item: Option<usize>, key: &KeyEvent) -> MenuOutcome {
        let items = &self.model.menus[menu].items;
        match key.code {
            KeyCode::Up => {
                self.state = MenuState::Dropdown {
                    menu,
                    item: step_selectable(items, item, -1),
                };
                MenuOutcome::Pending
            }
            KeyCode::Down => {
                self.state = MenuState::Dropdown {
                    menu,
                    item: step_selectable(items, item, 1),
                };
                MenuOutcome::Pending
            }
            KeyCode::Enter => match item {
                Some(i) if items[i].selectable() => {
                    let action = items[i].action.clone();
                    self.reset();
                    MenuOutcome::Committed(action)
                }
                _ => MenuOutcome::Pending,
            },
            // Faithful reference behavior: Escape from an open dropdown
            // exits menu mode entirely, not just back to the menu bar.
            KeyCode::Esc => {
                self.reset();
                MenuOutcome::Cancelled
            }
            KeyCode::Char(c) => {
                if let Some(i) = items.iter().position(|it| it.hotkey_matches(c)) {
                    let action = items[i].action.clone();
                    self.reset();
                    MenuOutcome::Committed(action)
                } else {
                    MenuOutcome::Pending
                }
            }
            _ => MenuOutcome::Pending,
        }
    }
}

/// Step the dropdown selection by `dir`, wrapping and skipping separators
/// and disabled items. Bounded by one full cycle; with no selectable item
/// the selection is left unchanged.
fn step_selectable(items: &[MenuItem], from: Option<usize>, dir: i32) -> Option<usize> {
    let count = items.len();
    if count == 0 {
        return None;
    }
    let start = match from {
        Some(i) => i,
        // Nothing highlighted yet: scan from the edge in the move direction.
        None => {
            return if dir > 0 {
                items.iter().position(MenuItem::selectable)
            } else {
                items.iter().rposition(MenuItem::selectable)
            };
        }
    };
    let mut idx = start;
    for _ in 0..count {
        idx = if dir < 0 {
            (idx + count - 1) % count
        } else {
            (idx + 1) % count
        };
        if items[idx].selectable() {
            return Some(idx);
        }
    }
    from
}
