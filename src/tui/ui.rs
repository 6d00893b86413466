//! Rendering for the demo shell: menu bar, task grid, output log, command
//! line, plus the dropdown and inline-edit overlays.
//!
//! Everything here is driven by read-only snapshots — the core never draws.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, Padding, Paragraph, Row, Table};
use unicode_width::UnicodeWidthStr;

use crate::core::menu::MenuDefinition;
use crate::core::session::{InputContext, SessionState};
use crate::tui::AppShell;

/// Snapshot of menu state for one frame. `None` dropdown means only the bar
/// highlight is shown.
pub struct MenuView<'a> {
    pub selected: usize,
    pub dropdown: Option<(&'a MenuDefinition, Option<usize>)>,
}

pub fn draw_ui(
    frame: &mut Frame,
    shell: &AppShell,
    session: &SessionState,
    menu: Option<&MenuView<'_>>,
) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(3), Length(7), Length(3), Length(1)]);
    let [bar_area, grid_area, output_area, command_area, status_area] =
        layout.areas(frame.area());

    draw_menu_bar(frame, bar_area, shell, menu);
    draw_grid(frame, grid_area, shell, session);
    draw_output(frame, output_area, shell);
    draw_command_line(frame, command_area, shell, session, menu.is_none());
    draw_status(frame, status_area, session);

    if session.inline_edit_mode {
        draw_inline_edit_overlay(frame, grid_area, session);
    }
    if let Some(MenuView {
        selected,
        dropdown: Some((def, item)),
    }) = menu
    {
        draw_dropdown(frame, bar_area, shell, *selected, def, *item);
    }
}

fn draw_menu_bar(frame: &mut Frame, area: Rect, shell: &AppShell, menu: Option<&MenuView<'_>>) {
    let selected = menu.map(|m| m.selected);
    let mut spans = vec![Span::raw(" ")];
    for (i, name) in shell.menu_names.iter().enumerate() {
        let style = if selected == Some(i) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {name} "), style));
        spans.push(Span::raw(" "));
    }
    if selected.is_none() {
        spans.push(Span::styled(
            "  F10/Alt Menu",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Line::from(spans), area);
}

fn draw_grid(frame: &mut Frame, area: Rect, shell: &AppShell, session: &SessionState) {
    let (sel_row, sel_col) = shell.clamped_selection(session);
    let grid_focused = session.active_context == InputContext::GridNavigation
        || session.inline_edit_mode
        || (session.grid_browse_mode && session.active_context == InputContext::CommandLine);

    let header = Row::new(
        shell
            .headers
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD))),
    );

    let rows = shell.grid.iter().enumerate().map(|(r, cells)| {
        Row::new(cells.iter().enumerate().map(|(c, value)| {
            let style = if grid_focused && (r, c) == (sel_row, sel_col) {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::Gray)
            };
            Cell::from(value.as_str()).style(style)
        }))
    });

    let title = if session.grid_browse_mode {
        " Tasks (grid browse) "
    } else {
        " Tasks "
    };
    let border_style = if grid_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(table, area);
}

fn draw_output(frame: &mut Frame, area: Rect, shell: &AppShell) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = shell.output.len().saturating_sub(visible);
    let items: Vec<ListItem> = shell.output[start..]
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Output "),
    );
    frame.render_widget(list, area);
}

fn draw_command_line(
    frame: &mut Frame,
    area: Rect,
    shell: &AppShell,
    session: &SessionState,
    show_cursor: bool,
) {
    let focused = session.active_context == InputContext::CommandLine;
    let border_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text = format!("{} {}", shell.prompt, session.command_buffer);
    let input = Paragraph::new(text)
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Command "),
        );
    frame.render_widget(input, area);

    if focused && show_cursor {
        let before_cursor = &session.command_buffer[..session.command_cursor];
        let x = area.x
            + 1
            + shell.prompt.width() as u16
            + 1
            + before_cursor.width() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_status(frame: &mut Frame, area: Rect, session: &SessionState) {
    let context = match session.active_context {
        InputContext::CommandLine => "COMMAND",
        InputContext::GridNavigation => "GRID",
        InputContext::InlineEdit => "EDIT",
        InputContext::Modal => "MODAL",
    };
    let status = format!(
        " {context} | row {} col {} | Esc Command  Enter/F2 Edit  F10 Menu",
        session.grid_selected_row, session.grid_selected_col
    );
    frame.render_widget(
        Span::styled(status, Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_inline_edit_overlay(frame: &mut Frame, around: Rect, session: &SessionState) {
    let width = (session.grid_editing_value.width() as u16 + 6)
        .max(24)
        .min(around.width);
    let overlay = Rect {
        x: around.x + (around.width.saturating_sub(width)) / 2,
        y: around.y + around.height / 2,
        width,
        height: 3,
    };
    frame.render_widget(Clear, overlay);

    let edit = Paragraph::new(session.grid_editing_value.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Edit Cell ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(edit, overlay);

    let before_cursor = &session.grid_editing_value[..session.grid_edit_cursor];
    let x = overlay.x + 2 + before_cursor.width() as u16;
    frame.set_cursor_position((x.min(overlay.right().saturating_sub(2)), overlay.y + 1));
}

fn draw_dropdown(
    frame: &mut Frame,
    bar_area: Rect,
    shell: &AppShell,
    menu_index: usize,
    def: &MenuDefinition,
    selected_item: Option<usize>,
) {
    // Anchor the dropdown under its menu name in the bar.
    let x_offset: u16 = shell
        .menu_names
        .iter()
        .take(menu_index)
        .map(|n| n.width() as u16 + 3)
        .sum();
    let inner_width = def
        .items
        .iter()
        .map(|i| i.label.width() + 6)
        .max()
        .unwrap_or(10)
        .max(def.name.width() + 4) as u16;
    let height = def.items.len() as u16 + 2;

    let frame_area = frame.area();
    let overlay = Rect {
        x: (bar_area.x + 1 + x_offset).min(frame_area.width.saturating_sub(inner_width)),
        y: bar_area.y + 1,
        width: inner_width.min(frame_area.width),
        height: height.min(frame_area.height.saturating_sub(1)),
    };
    frame.render_widget(Clear, overlay);

    let items: Vec<ListItem> = def
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if item.separator {
                let rule = "─".repeat(overlay.width.saturating_sub(2) as usize);
                return ListItem::new(Span::styled(rule, Style::default().fg(Color::DarkGray)));
            }
            let hotkey = item
                .hotkey
                .map(|h| format!(" ({h})"))
                .unwrap_or_default();
            let style = if selected_item == Some(i) {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if !item.enabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Span::styled(format!("{}{hotkey}", item.label), style))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", def.name)),
    );
    frame.render_widget(list, overlay);
}
