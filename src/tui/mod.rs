// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Espalier-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Espalier and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The interactive shell (ratatui + crossterm) over the tree-state
//! controller: a tree pane on the left, the detail form on the right, an
//! error banner, and a footer with key hints. The tree pane is driven by
//! [`flatten_visible`], a pure flattening of the nested node list plus the
//! expansion set into an ordered row list.
//!
//! Remote calls are driven through `Runtime::block_on` from the event
//! loop, so state mutation stays strictly sequential.

use std::collections::BTreeSet;
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::runtime::Runtime;

use crate::controller::{DraftPatch, MenuController};
use crate::model::{find_node, MenuNode};

const FOCUS_COLOR: Color = Color::LightGreen;
const DIRTY_COLOR: Color = Color::Yellow;
const ERROR_COLOR: Color = Color::LightRed;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const TOAST_TTL: Duration = Duration::from_millis(2500);

/// Runs the interactive terminal UI until the user quits.
pub fn run(
    controller: MenuController,
    runtime: Runtime,
    initial_tree: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(controller, runtime);
    app.initial_load(initial_tree);

    while !app.should_quit {
        app.expire_toast();
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

/// One visible row of the tree pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: i64,
    pub name: String,
    pub level: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Flattens a nested node list into the ordered visible row list: a
/// depth-first walk that descends into children only when the node's id is
/// in the expansion set. Each row keeps its nesting level for indentation.
pub fn flatten_visible(nodes: &[MenuNode], expanded: &BTreeSet<i64>) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    flatten_level(nodes, expanded, 0, &mut rows);
    rows
}

fn flatten_level(
    nodes: &[MenuNode],
    expanded: &BTreeSet<i64>,
    level: usize,
    rows: &mut Vec<VisibleRow>,
) {
    for node in nodes {
        let is_expanded = expanded.contains(&node.id);
        rows.push(VisibleRow {
            id: node.id,
            name: node.name.clone(),
            level,
            has_children: node.has_children(),
            expanded: is_expanded,
        });
        if is_expanded {
            flatten_level(node.child_slice(), expanded, level + 1, rows);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    EditName,
    ConfirmDelete,
    NewTree,
}

struct Toast {
    message: String,
    expires_at: Instant,
}

struct App {
    controller: MenuController,
    runtime: Runtime,
    mode: Mode,
    tree_prompt: String,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(controller: MenuController, runtime: Runtime) -> Self {
        Self {
            controller,
            runtime,
            mode: Mode::Browse,
            tree_prompt: String::new(),
            toast: None,
            should_quit: false,
        }
    }

    /// Mount sequence: fetch the tree list (auto-selecting the first tree
    /// unless one was requested), then the selected tree's nodes.
    fn initial_load(&mut self, initial_tree: Option<String>) {
        if let Some(tree_id) = initial_tree {
            self.controller.state_mut().set_tree(Some(tree_id));
        }
        let Self { controller, runtime, .. } = self;
        runtime.block_on(controller.load_trees());
        if controller.state().selected_tree_id().is_some() {
            runtime.block_on(controller.load_tree());
        }
    }

    fn rows(&self) -> Vec<VisibleRow> {
        let state = self.controller.state();
        flatten_visible(state.nodes(), state.expanded_node_ids())
    }

    fn selected_row_index(&self, rows: &[VisibleRow]) -> Option<usize> {
        let selected = self.controller.state().selected_node_id()?;
        rows.iter().position(|row| row.id == selected)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key.code),
            Mode::EditName => self.handle_edit_key(key.code),
            Mode::ConfirmDelete => self.handle_confirm_key(key.code),
            Mode::NewTree => self.handle_new_tree_key(key.code),
        }
    }

    fn handle_browse_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => self.controller.state_mut().clear_error(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Right | KeyCode::Char('l') => self.expand_or_descend(),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_focused(),
            KeyCode::Enter => self.select_and_toggle(),
            KeyCode::Char(' ') => self.select_focused(),
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('a') => self.begin_add_child(),
            KeyCode::Char('n') => self.begin_add_root(),
            KeyCode::Char('N') => {
                self.tree_prompt.clear();
                self.mode = Mode::NewTree;
            }
            KeyCode::Char('t') => self.cycle_tree(),
            KeyCode::Char('E') => self.controller.state_mut().expand_all(),
            KeyCode::Char('C') => self.controller.state_mut().collapse_all(),
            KeyCode::Char('R') => self.reload(),
            KeyCode::Char('d') => {
                if self.controller.state().selected_node_id().is_some() {
                    self.mode = Mode::ConfirmDelete;
                }
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => self.save_edit(),
            KeyCode::Backspace => {
                let Some(draft) = self.controller.state().editing_node() else {
                    return;
                };
                let mut name = draft.name.clone();
                if name.pop().is_some() {
                    self.controller.state_mut().update_draft(DraftPatch { name: Some(name) });
                }
            }
            KeyCode::Char(c) => {
                let Some(draft) = self.controller.state().editing_node() else {
                    return;
                };
                let mut name = draft.name.clone();
                name.push(c);
                self.controller.state_mut().update_draft(DraftPatch { name: Some(name) });
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                self.mode = Mode::Browse;
                let Self { controller, runtime, .. } = self;
                runtime.block_on(controller.delete_selected());
                if self.controller.state().error().is_none() {
                    self.set_toast("Deleted");
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Browse,
            _ => {}
        }
    }

    fn handle_new_tree_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.tree_prompt.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => {
                if self.tree_prompt.trim().is_empty() {
                    return;
                }
                let name = self.tree_prompt.clone();
                self.tree_prompt.clear();
                self.mode = Mode::Browse;
                let Self { controller, runtime, .. } = self;
                runtime.block_on(controller.create_tree(&name));
                if self.controller.state().error().is_none() {
                    self.set_toast("Tree created");
                }
            }
            KeyCode::Backspace => {
                self.tree_prompt.pop();
            }
            KeyCode::Char(c) => self.tree_prompt.push(c),
            _ => {}
        }
    }

    /// Down/Up move selection to the next/previous visible row; no-op at
    /// the ends. With nothing selected, the first row is selected.
    fn move_selection(&mut self, delta: i64) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let target = match self.selected_row_index(&rows) {
            Some(index) => {
                let next = index as i64 + delta;
                if next < 0 || next >= rows.len() as i64 {
                    return;
                }
                next as usize
            }
            None => 0,
        };
        self.controller.state_mut().select_node(rows[target].id);
    }

    /// Right: expand a collapsed node with children, or move to its first
    /// child (the immediately following row) when already expanded.
    fn expand_or_descend(&mut self) {
        let rows = self.rows();
        let Some(index) = self.selected_row_index(&rows) else {
            return;
        };
        let row = &rows[index];
        if !row.has_children {
            return;
        }
        if row.expanded {
            if let Some(child) = rows.get(index + 1) {
                self.controller.state_mut().select_node(child.id);
            }
        } else {
            self.controller.state_mut().toggle_expand(row.id);
        }
    }

    /// Left: collapse an expanded node with children.
    fn collapse_focused(&mut self) {
        let rows = self.rows();
        let Some(index) = self.selected_row_index(&rows) else {
            return;
        };
        let row = &rows[index];
        if row.has_children && row.expanded {
            self.controller.state_mut().toggle_expand(row.id);
        }
    }

    /// Enter mirrors the pointer contract: select, and toggle expansion
    /// when the row has children.
    fn select_and_toggle(&mut self) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let index = self.selected_row_index(&rows).unwrap_or(0);
        let row = rows[index].clone();
        self.controller.state_mut().select_node(row.id);
        if row.has_children {
            self.controller.state_mut().toggle_expand(row.id);
        }
    }

    fn select_focused(&mut self) {
        let rows = self.rows();
        if let Some(index) = self.selected_row_index(&rows) {
            let id = rows[index].id;
            self.controller.state_mut().select_node(id);
        } else if let Some(first) = rows.first() {
            let id = first.id;
            self.controller.state_mut().select_node(id);
        }
    }

    fn begin_edit(&mut self) {
        let state = self.controller.state();
        if state.editing_node().is_some() && !state.is_adding_child() {
            self.mode = Mode::EditName;
        }
    }

    fn begin_add_child(&mut self) {
        let Some(parent_id) = self.controller.state().selected_node_id() else {
            return;
        };
        self.controller.state_mut().start_adding_child(parent_id);
        self.mode = Mode::EditName;
    }

    fn begin_add_root(&mut self) {
        self.controller.state_mut().start_adding_root();
        self.mode = Mode::EditName;
    }

    fn save_edit(&mut self) {
        let was_adding = self.controller.state().is_adding_child();
        if !was_adding && !self.controller.state().is_dirty() {
            // Nothing changed; leave the form without a request.
            self.mode = Mode::Browse;
            return;
        }
        if !self.controller.state().can_save() {
            self.set_toast("Name cannot be empty");
            return;
        }
        let Self { controller, runtime, .. } = self;
        runtime.block_on(controller.save_draft());
        if self.controller.state().error().is_none() {
            self.mode = Mode::Browse;
            self.set_toast(if was_adding { "Created" } else { "Saved" });
        }
    }

    fn cancel_edit(&mut self) {
        if self.controller.state().is_adding_child() {
            self.controller.state_mut().cancel_adding();
        } else if let Some(id) = self.controller.state().selected_node_id() {
            // Re-selecting reverts the draft to the persisted node.
            self.controller.state_mut().select_node(id);
        }
        self.mode = Mode::Browse;
    }

    fn cycle_tree(&mut self) {
        let state = self.controller.state();
        let trees: Vec<String> =
            state.available_trees().iter().map(|tree| tree.tree_id.clone()).collect();
        if trees.len() < 2 {
            return;
        }
        let current = state.selected_tree_id();
        let index = current
            .and_then(|selected| trees.iter().position(|tree_id| tree_id == selected))
            .map_or(0, |index| (index + 1) % trees.len());
        let next = trees[index].clone();
        let Self { controller, runtime, .. } = self;
        runtime.block_on(controller.select_tree(next));
    }

    fn reload(&mut self) {
        let Self { controller, runtime, .. } = self;
        runtime.block_on(controller.load_trees());
        runtime.block_on(controller.load_tree());
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast { message: message.into(), expires_at: Instant::now() + TOAST_TTL });
    }

    fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|toast| Instant::now() >= toast.expires_at) {
            self.toast = None;
        }
    }
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let state = app.controller.state();
    let error_height = u16::from(state.error().is_some());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(error_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let banner_area = layout[0];
    let main_area = layout[1];
    let footer_area = layout[2];

    if let Some(error) = state.error() {
        let banner = Paragraph::new(Line::from(vec![
            Span::styled("Error: ", Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD)),
            Span::styled(error.to_owned(), Style::default().fg(ERROR_COLOR)),
            Span::styled("  (Esc to dismiss)", Style::default().fg(FOOTER_LABEL_COLOR)),
        ]));
        frame.render_widget(banner, banner_area);
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_area);
    draw_tree_pane(frame, app, panes[0]);
    draw_detail_pane(frame, app, panes[1]);

    frame.render_widget(Paragraph::new(footer_line(app)), footer_area);
}

fn draw_tree_pane(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.controller.state();
    let rows = app.rows();

    let tree_label = state
        .selected_tree_id()
        .and_then(|selected| {
            state.available_trees().iter().find(|tree| tree.tree_id == selected)
        })
        .map(|tree| tree.label())
        .unwrap_or_else(|| "no tree".to_owned());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Menus — {tree_label} "))
        .border_style(Style::default().fg(FOCUS_COLOR));

    if rows.is_empty() {
        let placeholder = if state.selected_tree_id().is_some() {
            "No menu items in this tree — press n to add a root item"
        } else {
            "No trees available — press N to create one"
        };
        let paragraph = Paragraph::new(placeholder)
            .style(Style::default().fg(FOOTER_LABEL_COLOR))
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem<'_>> = rows
        .iter()
        .map(|row| {
            let marker = if row.has_children {
                if row.expanded {
                    "▾ "
                } else {
                    "▸ "
                }
            } else {
                "  "
            };
            let text = format!("{}{marker}{}", "  ".repeat(row.level), row.name);
            ListItem::new(text)
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(app.selected_row_index(&rows));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_detail_pane(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.controller.state();
    let editing_name = app.mode == Mode::EditName;

    let (title, lines) = match state.editing_node() {
        Some(draft) if state.is_adding_child() => {
            let context = match state.parent_for_new_child() {
                Some(parent_id) => {
                    let parent = find_node(state.nodes(), parent_id)
                        .map(|node| node.name.clone())
                        .unwrap_or_else(|| "unknown".to_owned());
                    format!("child of {parent} at depth {}", draft.depth)
                }
                None => "new root item (depth 0)".to_owned(),
            };
            let lines = vec![
                Line::from(Span::styled(context, Style::default().fg(FOOTER_LABEL_COLOR))),
                Line::default(),
                name_line(&draft.name, editing_name, state.is_dirty()),
            ];
            (" Add menu item ", lines)
        }
        Some(draft) => {
            let parent_name = match draft.parent_id {
                Some(parent_id) => find_node(state.nodes(), parent_id)
                    .map(|node| node.name.clone())
                    .unwrap_or_else(|| "Unknown".to_owned()),
                None => "None (root)".to_owned(),
            };
            let lines = vec![
                Line::from(Span::styled(
                    state.breadcrumb().join(" / "),
                    Style::default().fg(FOOTER_LABEL_COLOR),
                )),
                Line::default(),
                name_line(&draft.name, editing_name, state.is_dirty()),
                Line::from(format!("Uuid    {}", draft.uuid)),
                Line::from(format!("Depth   {}", draft.depth)),
                Line::from(format!("Parent  {parent_name}")),
                Line::from(format!("Created {}", draft.created_at)),
                Line::from(format!("Updated {}", draft.updated_at)),
            ];
            (" Menu details ", lines)
        }
        None => {
            let lines = vec![Line::from(Span::styled(
                "Select a node to edit it",
                Style::default().fg(FOOTER_LABEL_COLOR),
            ))];
            (" Menu details ", lines)
        }
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}

fn name_line(name: &str, editing: bool, dirty: bool) -> Line<'static> {
    let mut spans = vec![Span::raw("Name    "), Span::raw(name.to_owned())];
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(FOCUS_COLOR)));
    }
    if dirty {
        spans.push(Span::styled(" *", Style::default().fg(DIRTY_COLOR)));
    }
    Line::from(spans)
}

fn footer_line(app: &App) -> Line<'static> {
    match app.mode {
        Mode::ConfirmDelete => {
            let name = app
                .controller
                .state()
                .editing_node()
                .map(|node| node.name.clone())
                .unwrap_or_default();
            return Line::from(Span::styled(
                format!("Delete '{name}' and all of its descendants? (y/n)"),
                Style::default().fg(ERROR_COLOR),
            ));
        }
        Mode::NewTree => {
            return Line::from(vec![
                Span::styled("New tree name: ", Style::default().fg(FOOTER_LABEL_COLOR)),
                Span::raw(app.tree_prompt.clone()),
                Span::styled("▏", Style::default().fg(FOCUS_COLOR)),
            ]);
        }
        Mode::EditName => {
            return hint_line(&[("Enter", "save"), ("Esc", "cancel")]);
        }
        Mode::Browse => {}
    }

    let mut line = hint_line(&[
        ("↑↓", "move"),
        ("←→", "fold"),
        ("e", "edit"),
        ("a", "add child"),
        ("n", "add root"),
        ("d", "delete"),
        ("t", "tree"),
        ("N", "new tree"),
        ("E/C", "un/fold all"),
        ("R", "reload"),
        ("q", "quit"),
    ]);
    if app.controller.state().loading() {
        line.spans.push(Span::styled("  loading…", Style::default().fg(DIRTY_COLOR)));
    }
    if let Some(toast) = &app.toast {
        line.spans.push(Span::styled(
            format!("  {}", toast.message),
            Style::default().fg(FOCUS_COLOR),
        ));
    }
    line
}

fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, (key, label)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(FOOTER_LABEL_COLOR)));
        }
        spans.push(Span::styled((*key).to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
        spans.push(Span::styled(format!(" {label}"), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    Line::from(spans)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}
