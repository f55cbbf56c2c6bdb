use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use crate::board::view::{self, Column};
use crate::board::{ProjectField, ProjectForm, TaskField, TaskForm};
use crate::models::PROJECT_PALETTE;
use crate::tui::app::{App, DeleteTarget, FocusedPanel, InputMode};
use crate::tui::theme;

const SIDEBAR_WIDTH: u16 = 30;
const PROGRESS_WIDTH: usize = 20;

pub fn draw(frame: &mut Frame, app: &App) {
    // Fill the entire background
    let bg_block = Block::default().style(Style::default().bg(theme::BG));
    frame.render_widget(bg_block, frame.area());

    if let Some(err) = &app.board.error {
        draw_error_screen(frame, err);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);
    draw_sidebar(frame, app, body[0]);
    draw_board(frame, app, body[1]);

    draw_footer(frame, app, chunks[2]);

    if let Some(form) = &app.board.task_editor {
        draw_task_editor(frame, form);
    } else if let Some(form) = &app.board.project_editor {
        draw_project_editor(frame, form);
    }

    match app.mode {
        InputMode::Normal => {}
        InputMode::HelpOverlay => draw_help(frame),
        InputMode::ConfirmDelete(target) => draw_confirm(frame, app, target),
    }
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let title_fg = if focused {
        theme::BORDER_BRIGHT
    } else {
        theme::TEXT_DIM
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(Span::styled(
            title,
            Style::default().fg(title_fg).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::BG))
}

fn dim(text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(theme::TEXT_DIM))
}

// ── Error screen ───────────────────────────────────────────────────

fn draw_error_screen(frame: &mut Frame, err: &str) {
    let area = centered_rect(64, 9, frame.area());
    let lines = vec![
        Line::from(Span::styled(
            "Cannot connect to the TaskFlow backend",
            Style::default()
                .fg(theme::RED)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(dim(err.to_string())),
        Line::from(""),
        Line::from(vec![
            Span::raw("Start it with "),
            Span::styled("taskflow serve", Style::default().fg(theme::ACCENT)),
            Span::raw(", then relaunch."),
        ]),
        Line::from(dim("q: Quit")),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel(" Connection error ", true));
    frame.render_widget(paragraph, area);
}

// ── Header ─────────────────────────────────────────────────────────

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = panel("", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(PROGRESS_WIDTH as u16 + 16),
        ])
        .split(inner);

    let mut title = vec![
        Span::styled(
            format!(" {} ", theme::HEADER_ART),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme::BORDER_DIM)),
    ];
    match &app.board.selected_project {
        Some(project) => {
            title.push(Span::styled(
                "● ",
                Style::default().fg(theme::hex_color(&project.color)),
            ));
            title.push(Span::styled(
                project.name.clone(),
                Style::default()
                    .fg(theme::TEXT_BRIGHT)
                    .add_modifier(Modifier::BOLD),
            ));
            if let Some(desc) = project.description.as_deref().filter(|d| !d.is_empty()) {
                title.push(dim(format!("  {desc}")));
            }
        }
        None => title.push(dim("No project selected")),
    }
    frame.render_widget(Paragraph::new(Line::from(title)), parts[0]);

    if let Some(project) = &app.board.selected_project {
        let pct = view::progress_percent(&app.board.tasks);
        let progress = Line::from(vec![
            Span::styled(
                theme::progress_bar(pct, PROGRESS_WIDTH),
                Style::default().fg(theme::hex_color(&project.color)),
            ),
            Span::styled(
                format!(" {pct}% complete"),
                Style::default().fg(theme::TEXT_BRIGHT),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(progress).alignment(Alignment::Right),
            parts[1],
        );
    }
}

// ── Sidebar ────────────────────────────────────────────────────────

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focused_panel == FocusedPanel::Projects;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let selected = app.board.selected_id();
    let name_width = usize::from(SIDEBAR_WIDTH).saturating_sub(12);

    let items: Vec<ListItem> = if app.board.projects.is_empty() {
        vec![ListItem::new(Line::from(dim("  No projects yet")))]
    } else {
        app.board
            .projects
            .iter()
            .enumerate()
            .map(|(i, project)| {
                let is_cursor = focused && i == app.sidebar_idx;
                let is_selected = selected == Some(project.id);
                let marker = if is_cursor { "▸ " } else { "  " };
                let name_style = if is_selected {
                    Style::default()
                        .fg(theme::TEXT_BRIGHT)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT_DIM)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(theme::ACCENT)),
                    Span::styled("● ", Style::default().fg(theme::hex_color(&project.color))),
                    Span::styled(
                        format!(
                            "{:<name_width$}",
                            truncate_with_ellipsis(&project.name, name_width)
                        ),
                        name_style,
                    ),
                    dim(format!(" {:>3}", project.task_count())),
                ]))
            })
            .collect()
    };
    // Selecting the cursor row lets the list scroll it into view.
    let cursor = (!app.board.projects.is_empty()).then_some(app.sidebar_idx);
    let mut state = ListState::default().with_selected(cursor);
    frame.render_stateful_widget(
        List::new(items).block(panel(" Projects ", focused)),
        chunks[0],
        &mut state,
    );

    let stats = Line::from(vec![
        Span::styled(
            format!(" {}", app.board.projects.len()),
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        dim(" Projects  "),
        Span::styled(
            view::total_task_count(&app.board.projects).to_string(),
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        dim(" Tasks"),
    ]);
    frame.render_widget(Paragraph::new(stats).block(panel("", false)), chunks[1]);
}

// ── Board ──────────────────────────────────────────────────────────

fn draw_board(frame: &mut Frame, app: &App, area: Rect) {
    if app.board.booting {
        let text = Paragraph::new(Line::from(dim("Loading projects…")))
            .alignment(Alignment::Center)
            .block(panel(" Board ", false));
        frame.render_widget(text, area);
        return;
    }

    if app.board.selected_project.is_none() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No project selected",
                Style::default()
                    .fg(theme::TEXT_BRIGHT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(dim("Pick a project from the sidebar or create one with N.")),
        ];
        let text = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel(" Board ", false));
        frame.render_widget(text, area);
        return;
    }

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (idx, column) in view::columns(&app.board.tasks).iter().enumerate() {
        draw_column(frame, app, column, idx, areas[idx]);
    }
}

fn draw_column(frame: &mut Frame, app: &App, column: &Column<'_>, idx: usize, area: Rect) {
    let focused = app.focused_panel == FocusedPanel::Board && app.column_idx == idx;
    let color = theme::status_color(column.status);
    let block = panel("", focused).title(Line::from(vec![
        Span::styled(
            format!(" {} ", theme::status_symbol(column.status)),
            Style::default().fg(color),
        ),
        Span::styled(
            column.status.label(),
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        dim(format!(" ({}) ", column.tasks.len())),
    ]));

    if app.board.loading {
        let skeleton = Style::default().fg(theme::BORDER_DIM);
        let lines = vec![
            Line::from(Span::styled("░░░░░░░░░░░░░░░░", skeleton)),
            Line::from(Span::styled("░░░░░░░░░░", skeleton)),
            Line::from(""),
            Line::from(dim("Loading…")),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    if column.tasks.is_empty() {
        let text = Paragraph::new(Line::from(dim("No tasks")))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let width = usize::from(area.width.saturating_sub(4));
    let items: Vec<ListItem> = column
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let is_cursor = focused && i == app.card_idx;
            let marker = if is_cursor { "▸ " } else { "  " };
            let title_style = if is_cursor {
                Style::default()
                    .fg(theme::TEXT_BRIGHT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::TEXT_BRIGHT)
            };
            let tag = format!("[{}] ", task.priority);

            let mut lines = vec![Line::from(vec![
                Span::styled(marker, Style::default().fg(theme::ACCENT)),
                Span::styled(tag.clone(), theme::priority_style(task.priority)),
                Span::styled(
                    truncate_with_ellipsis(&task.title, width.saturating_sub(tag.len() + 2)),
                    title_style,
                ),
            ])];
            if let Some(desc) = task.description.as_deref().filter(|d| !d.is_empty()) {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    dim(truncate_with_ellipsis(desc, width.saturating_sub(2))),
                ]));
            }
            lines.push(Line::from(""));
            ListItem::new(lines)
        })
        .collect();

    let mut state = ListState::default().with_selected(focused.then_some(app.card_idx));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

// ── Footer ─────────────────────────────────────────────────────────

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(notice) = &app.board.notice {
        Line::from(vec![
            Span::styled(
                format!("  ⚠ {notice}"),
                Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
            ),
            dim("  (Esc to dismiss)"),
        ])
    } else if app.is_busy() {
        Line::from(Span::styled("  Working…", Style::default().fg(theme::AMBER)))
    } else {
        let hints = match app.focused_panel {
            FocusedPanel::Board => {
                "  n: New task  e: Edit  d: Delete  s/</>: Move  Tab: Projects  ?: Help  q: Quit"
            }
            FocusedPanel::Projects => {
                "  Enter: Open  N: New project  e: Edit  d: Delete  Tab: Board  ?: Help  q: Quit"
            }
        };
        Line::from(dim(hints))
    };
    frame.render_widget(Paragraph::new(line).block(panel(" Help ", false)), area);
}

// ── Modals ─────────────────────────────────────────────────────────

fn field_line(label: &str, value: Vec<Span<'static>>, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT_DIM)
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme::ACCENT)),
        Span::styled(format!("{label:<12}"), label_style),
    ];
    spans.extend(value);
    Line::from(spans)
}

fn text_value(text: &str, focused: bool) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(
        text.to_string(),
        Style::default().fg(theme::TEXT_BRIGHT),
    )];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(theme::ACCENT)));
    }
    spans
}

fn choice_value(label: &str, style: Style, focused: bool) -> Vec<Span<'static>> {
    let arrow = Style::default().fg(if focused {
        theme::ACCENT
    } else {
        theme::BORDER_DIM
    });
    vec![
        Span::styled("◂ ", arrow),
        Span::styled(label.to_string(), style),
        Span::styled(" ▸", arrow),
    ]
}

fn modal_footer(lines: &mut Vec<Line<'static>>, error: Option<&str>) {
    lines.push(Line::from(""));
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(theme::RED),
        )));
    }
    lines.push(Line::from(dim(
        "  Tab: Next field  ←/→: Change  Enter: Save  Esc: Cancel",
    )));
}

fn draw_modal(frame: &mut Frame, title: &str, lines: Vec<Line<'static>>) {
    let area = centered_rect(68, lines.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel(title, true)),
        area,
    );
}

fn draw_task_editor(frame: &mut Frame, form: &TaskForm) {
    let f = form.focus;
    let mut lines = vec![
        Line::from(""),
        field_line("Title", text_value(&form.title, f == TaskField::Title), f == TaskField::Title),
        field_line(
            "Description",
            text_value(&form.description, f == TaskField::Description),
            f == TaskField::Description,
        ),
        field_line(
            "Status",
            choice_value(
                form.status.label(),
                Style::default().fg(theme::status_color(form.status)),
                f == TaskField::Status,
            ),
            f == TaskField::Status,
        ),
        field_line(
            "Priority",
            choice_value(
                form.priority.label(),
                theme::priority_style(form.priority),
                f == TaskField::Priority,
            ),
            f == TaskField::Priority,
        ),
    ];
    modal_footer(&mut lines, form.error.as_deref());
    let title = if form.is_edit() { " Edit Task " } else { " New Task " };
    draw_modal(frame, title, lines);
}

fn draw_project_editor(frame: &mut Frame, form: &ProjectForm) {
    let f = form.focus;
    let current = form.palette_index();
    let mut swatches: Vec<Span<'static>> = PROJECT_PALETTE
        .iter()
        .enumerate()
        .map(|(i, hex)| {
            let symbol = if current == Some(i) { "[●]" } else { " ● " };
            Span::styled(symbol, Style::default().fg(theme::hex_color(hex)))
        })
        .collect();
    if current.is_none() {
        swatches.push(dim(format!(" {}", form.color)));
    }

    let mut lines = vec![
        Line::from(""),
        field_line("Name", text_value(&form.name, f == ProjectField::Name), f == ProjectField::Name),
        field_line(
            "Description",
            text_value(&form.description, f == ProjectField::Description),
            f == ProjectField::Description,
        ),
        field_line("Color", swatches, f == ProjectField::Color),
    ];
    modal_footer(&mut lines, form.error.as_deref());
    let title = if form.is_edit() {
        " Edit Project "
    } else {
        " New Project "
    };
    draw_modal(frame, title, lines);
}

const HELP_KEYS: [(&str, &str); 13] = [
    ("Tab", "Switch between projects and board"),
    ("j / k", "Move cursor"),
    ("h / l", "Previous / next column"),
    ("Enter", "Open project / edit task"),
    ("n", "New task in the selected project"),
    ("N", "New project"),
    ("e", "Edit task or project"),
    ("d", "Delete task or project"),
    ("s / >", "Move task to the next column"),
    ("<", "Move task to the previous column"),
    ("1 / 2 / 3", "Move task to To Do / In Progress / Done"),
    ("Esc", "Dismiss message / close"),
    ("q", "Quit"),
];

fn draw_help(frame: &mut Frame) {
    let mut lines = vec![Line::from("")];
    lines.extend(HELP_KEYS.iter().map(|(keys, what)| {
        Line::from(vec![
            Span::styled(
                format!("  {keys:<10}"),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(*what, Style::default().fg(theme::TEXT_BRIGHT)),
        ])
    }));
    let area = centered_rect(56, lines.len() as u16 + 2, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(panel(" Keys ", true)), area);
}

fn draw_confirm(frame: &mut Frame, app: &App, target: DeleteTarget) {
    let question = match target {
        DeleteTarget::Task(id) => {
            let title = app.board.task(id).map(|t| t.title.as_str()).unwrap_or("?");
            format!("Delete task \"{title}\"?")
        }
        DeleteTarget::Project(id) => {
            let name = app.board.project(id).map(|p| p.name.as_str()).unwrap_or("?");
            format!("Delete project \"{name}\" and all its tasks?")
        }
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            question,
            Style::default()
                .fg(theme::TEXT_BRIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(dim("y: Delete  any other key: Cancel")),
    ];
    let area = centered_rect(60, 6, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel(" Confirm ", true)),
        area,
    );
}

// ── Helpers ────────────────────────────────────────────────────────

/// A `width` x `height` rectangle centred in `area`, clipped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Truncate `s` to at most `max_chars` characters, appending an ellipsis if needed.
fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        let mut result: String = s.chars().take(max_chars - 1).collect();
        result.push('\u{2026}');
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::{KeyCode, KeyEvent};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::models::TaskStatus;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn app_with(backend: FakeBackend) -> App {
        let mut app = App::new(Arc::new(backend));
        app.settle().await;
        app
    }

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate_with_ellipsis("abc", 5), "abc");
    }

    #[test]
    fn truncate_long_string_adds_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 4), "abc\u{2026}");
    }

    #[test]
    fn truncate_zero_budget() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "");
    }

    #[test]
    fn centered_rect_clips_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(80, 40, area), area);
    }

    #[tokio::test]
    async fn board_shows_columns_cards_and_progress() {
        let backend = FakeBackend::with_projects(&["Alpha", "Beta"]);
        backend.add_task(1, "Wireframes", TaskStatus::Todo);
        backend.add_task(1, "Copy", TaskStatus::InProgress);
        backend.add_task(1, "Kickoff", TaskStatus::Done);
        let app = app_with(backend).await;

        let screen = render(&app);
        for text in [
            "TaskFlow",
            "Alpha",
            "Beta",
            "To Do",
            "In Progress",
            "Done",
            "Wireframes",
            "Kickoff",
            "[medium]",
            "33% complete",
            "2 Projects",
            "3 Tasks",
        ] {
            assert!(screen.contains(text), "missing {text:?} in\n{screen}");
        }
    }

    #[tokio::test]
    async fn empty_columns_say_no_tasks() {
        let app = app_with(FakeBackend::with_projects(&["Solo"])).await;
        let screen = render(&app);
        assert_eq!(screen.matches("No tasks").count(), 3);
        assert!(screen.contains("0% complete"));
    }

    #[tokio::test]
    async fn no_projects_shows_empty_state() {
        let app = app_with(FakeBackend::default()).await;
        let screen = render(&app);
        assert!(screen.contains("No project selected"));
        assert!(screen.contains("No projects yet"));
    }

    #[tokio::test]
    async fn loading_columns_show_placeholder() {
        let backend = FakeBackend::with_projects(&["Alpha", "Beta"]);
        let mut app = app_with(backend).await;
        app.handle_key(KeyEvent::from(KeyCode::Tab));
        app.handle_key(KeyEvent::from(KeyCode::Char('j')));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(app.board.loading);
        assert_eq!(render(&app).matches("Loading…").count(), 3);
    }

    #[tokio::test]
    async fn offline_shows_connection_error_only() {
        let app = app_with(FakeBackend::offline()).await;
        let screen = render(&app);
        assert!(screen.contains("Cannot connect to the TaskFlow backend"));
        assert!(screen.contains("taskflow serve"));
        assert!(!screen.contains("Projects"));
    }

    #[tokio::test]
    async fn task_editor_renders_draft_and_error() {
        let mut app = app_with(FakeBackend::with_projects(&["Alpha"])).await;
        app.handle_key(KeyEvent::from(KeyCode::Char('n')));
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        let screen = render(&app);
        assert!(screen.contains("New Task"));
        assert!(screen.contains("To Do"));
        assert!(screen.contains("Medium"));
        assert!(screen.contains("Title is required"));
    }

    #[tokio::test]
    async fn notice_replaces_key_hints() {
        let backend = FakeBackend::with_projects(&["Alpha"]);
        backend.add_task(1, "Wireframes", TaskStatus::Todo);
        let backend = Arc::new(backend);
        let mut app = App::new(backend.clone());
        app.settle().await;

        backend.fail_next();
        app.handle_key(KeyEvent::from(KeyCode::Char('d')));
        assert!(render(&app).contains("Delete task \"Wireframes\"?"));
        app.handle_key(KeyEvent::from(KeyCode::Char('y')));
        app.settle().await;

        let screen = render(&app);
        assert!(screen.contains("Failed to delete task: Internal server error"));
        assert!(!screen.contains("n: New task"));
    }

    #[tokio::test]
    async fn long_column_scrolls_to_cursor() {
        let backend = FakeBackend::with_projects(&["Alpha"]);
        for i in 0..15 {
            backend.add_task(1, &format!("Card{i:02}"), TaskStatus::Todo);
        }
        let mut app = app_with(backend).await;

        assert!(render(&app).contains("Card00"));
        for _ in 0..14 {
            app.handle_key(KeyEvent::from(KeyCode::Char('j')));
        }
        assert_eq!(app.selected_task().unwrap().title, "Card14");

        let screen = render(&app);
        assert!(screen.contains("▸ [medium] Card14"), "cursor card hidden in\n{screen}");
        assert!(!screen.contains("Card00"));
    }

    #[tokio::test]
    async fn long_sidebar_scrolls_to_cursor() {
        let names: Vec<String> = (0..30).map(|i| format!("Proj{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut app = app_with(FakeBackend::with_projects(&refs)).await;

        app.handle_key(KeyEvent::from(KeyCode::Tab));
        for _ in 0..29 {
            app.handle_key(KeyEvent::from(KeyCode::Char('j')));
        }
        assert_eq!(app.cursor_project().unwrap().name, "Proj29");

        let screen = render(&app);
        assert!(screen.contains("▸ ● Proj29"), "cursor project hidden in\n{screen}");
    }
}
