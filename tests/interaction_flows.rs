//! End-to-end interaction flows driving the router and menu state machine
//! together, the way the shell's event loop does.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use keymux::core::menu::{MenuDefinition, MenuItem, MenuModel, MenuStateMachine, NullMenuHooks};
use keymux::core::router::{HookError, InputRouter, RouterHooks};
use keymux::core::session::InputContext;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn alt(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
}

/// Records hook invocations, playing the role of the excluded collaborators.
#[derive(Default)]
struct Host {
    commands: Vec<String>,
    commits: Vec<String>,
    cell_value: String,
}

impl RouterHooks for Host {
    fn execute_command(&mut self, command: &str) -> Result<(), HookError> {
        self.commands.push(command.to_string());
        Ok(())
    }

    fn commit_cell_edit(&mut self, value: &str) -> Result<(), HookError> {
        self.commits.push(value.to_string());
        Ok(())
    }

    fn current_cell_value(&mut self) -> String {
        self.cell_value.clone()
    }
}

fn feed(router: &mut InputRouter, host: &mut Host, keys: &[KeyEvent]) {
    for k in keys {
        router.handle_key(k, host);
    }
}

fn menu_model() -> MenuModel {
    MenuModel::new(vec![
        MenuDefinition::new(
            "File",
            'F',
            vec![
                MenuItem::new("New", 'N', "task.new"),
                MenuItem::separator(),
                MenuItem::new("Delete", 'X', "task.delete"),
                MenuItem::new("Exit", 'E', "app.quit"),
            ],
        ),
        MenuDefinition::new(
            "View",
            'V',
            vec![MenuItem::new("Grid", 'G', "view.grid")],
        ),
    ])
}

#[test]
fn command_then_grid_then_edit_then_back() {
    let mut router = InputRouter::new();
    let mut host = Host {
        cell_value: "old".into(),
        ..Default::default()
    };

    // Type and run a command from the home context.
    feed(
        &mut router,
        &mut host,
        &[
            key(KeyCode::Char('g')),
            key(KeyCode::Char('o')),
            key(KeyCode::Enter),
        ],
    );
    assert_eq!(host.commands, vec!["go"]);

    // Host flips the session into grid browse, navigates, edits a cell.
    router.set_grid_browse_mode(true);
    feed(
        &mut router,
        &mut host,
        &[
            key(KeyCode::Down),
            key(KeyCode::Right),
            key(KeyCode::Enter), // seed edit from cell value
            key(KeyCode::Backspace),
            key(KeyCode::Char('k')),
            key(KeyCode::Enter), // commit
        ],
    );
    assert_eq!(host.commits, vec!["olk"]);
    assert_eq!(router.state().active_context, InputContext::GridNavigation);
    assert_eq!(router.state().grid_selected_row, 1);
    assert_eq!(router.state().grid_selected_col, 1);

    // Escape returns focus to the command line but grid mode stays sticky.
    router.handle_key(&key(KeyCode::Esc), &mut host);
    assert_eq!(router.state().active_context, InputContext::CommandLine);
    assert!(router.state().grid_browse_mode);
    router.handle_key(&key(KeyCode::Up), &mut host);
    assert_eq!(router.state().active_context, InputContext::GridNavigation);
    assert_eq!(router.state().grid_selected_row, 0);
}

#[test]
fn quick_edit_overwrites_not_appends() {
    let mut router = InputRouter::new();
    let mut host = Host {
        cell_value: "42".into(),
        ..Default::default()
    };
    router.set_grid_browse_mode(true);
    router.handle_key(&key(KeyCode::Char('7')), &mut host);
    assert_eq!(router.state().active_context, InputContext::InlineEdit);
    assert_eq!(router.state().grid_editing_value, "7");
    assert_eq!(router.state().grid_edit_cursor, 1);

    router.handle_key(&key(KeyCode::Enter), &mut host);
    assert_eq!(host.commits, vec!["7"]);
}

#[test]
fn priority_keys_always_reach_command_line() {
    let priority = [
        key(KeyCode::Esc),
        KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL),
        KeyEvent::new(KeyCode::Char('k'), KeyModifiers::ALT),
        key(KeyCode::F(7)),
    ];
    for pk in &priority {
        let mut router = InputRouter::new();
        let mut host = Host::default();
        router.set_grid_browse_mode(true);
        // Deep in an inline edit when the priority key lands.
        router.handle_key(&key(KeyCode::Enter), &mut host);
        router.handle_key(&key(KeyCode::Char('z')), &mut host);
        router.handle_key(pk, &mut host);
        assert_eq!(
            router.state().active_context,
            InputContext::CommandLine,
            "{pk:?} must force the command line"
        );
        assert!(host.commits.is_empty(), "cancelled edit never commits");
    }
}

#[test]
fn menu_interaction_suspends_router_and_commits_action() {
    let mut menu = MenuStateMachine::new(menu_model());

    // F10, Right to "View", Enter to open, Enter to commit "view.grid".
    let script = vec![
        key(KeyCode::Right),
        key(KeyCode::Enter),
        key(KeyCode::Enter),
    ];
    let mut iter = script.into_iter();
    let action = menu.run_interaction(&key(KeyCode::F(10)), &mut || iter.next(), &mut NullMenuHooks);
    assert_eq!(action, "view.grid");
    assert!(!menu.in_menu_mode());
}

#[test]
fn alt_hotkey_plus_item_hotkey_is_two_keys_total() {
    let mut menu = MenuStateMachine::new(menu_model());
    // Alt+F opens File directly; 'x' commits Delete case-insensitively.
    let mut iter = vec![key(KeyCode::Char('x'))].into_iter();
    let action = menu.run_interaction(&alt('f'), &mut || iter.next(), &mut NullMenuHooks);
    assert_eq!(action, "task.delete");
}

#[test]
fn menu_cancel_returns_empty_string() {
    let mut menu = MenuStateMachine::new(menu_model());
    let mut iter = vec![key(KeyCode::Enter), key(KeyCode::Esc)].into_iter();
    let action = menu.run_interaction(&key(KeyCode::F(10)), &mut || iter.next(), &mut NullMenuHooks);
    assert_eq!(action, "");
    assert!(!menu.in_menu_mode());
}

#[test]
fn menu_wraparound_with_three_menus() {
    let model = MenuModel::new(vec![
        MenuDefinition::new("A", 'A', vec![MenuItem::new("a", 'a', "a")]),
        MenuDefinition::new("B", 'B', vec![MenuItem::new("b", 'b', "b")]),
        MenuDefinition::new("C", 'C', vec![MenuItem::new("c", 'c', "c")]),
    ]);
    let mut menu = MenuStateMachine::new(model);
    menu.activate(&key(KeyCode::F(10)));
    assert_eq!(menu.selected_menu(), Some(0));
    menu.handle_key(&key(KeyCode::Left));
    assert_eq!(menu.selected_menu(), Some(2));
    menu.handle_key(&key(KeyCode::Right));
    assert_eq!(menu.selected_menu(), Some(0));
}

#[test]
fn separator_and_disabled_skip_with_wrap() {
    let model = MenuModel::new(vec![MenuDefinition::new(
        "M",
        'M',
        vec![
            MenuItem::new("A", 'A', "a"),
            MenuItem::separator(),
            MenuItem::new("B", 'B', "b").disabled(),
            MenuItem::new("C", 'C', "c"),
        ],
    )]);
    let mut menu = MenuStateMachine::new(model);
    menu.activate(&alt('m'));
    assert_eq!(menu.selected_item(), Some(0));
    menu.handle_key(&key(KeyCode::Down));
    assert_eq!(menu.selected_item(), Some(3), "down from A selects C");
    menu.handle_key(&key(KeyCode::Down));
    assert_eq!(menu.selected_item(), Some(0), "down from C wraps to A");
}

#[test]
fn session_reset_is_safe_mid_flow() {
    let mut router = InputRouter::new();
    let mut host = Host {
        cell_value: "seed".into(),
        ..Default::default()
    };
    router.set_grid_browse_mode(true);
    router.handle_key(&key(KeyCode::Enter), &mut host);
    assert_eq!(router.state().active_context, InputContext::InlineEdit);

    router.reset();
    let s = router.state();
    assert_eq!(s.active_context, InputContext::CommandLine);
    assert!(!s.inline_edit_mode);
    assert!(s.grid_editing_value.is_empty());

    // The session keeps working after a reset.
    router.handle_key(&key(KeyCode::Char('x')), &mut host);
    router.handle_key(&key(KeyCode::Enter), &mut host);
    assert_eq!(host.commands, vec!["x"]);
}
