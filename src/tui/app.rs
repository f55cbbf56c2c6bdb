use std::collections::VecDeque;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::api::Backend;
use crate::board::view::columns;
use crate::board::{Action, BoardState, EditorForm, Effect, perform};
use crate::models::{Project, Task, TaskStatus};
use crate::tui::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    HelpOverlay,
    ConfirmDelete(DeleteTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Task(i64),
    Project(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Projects,
    Board,
}

/// What an editor keystroke asks of the app.
enum EditorKey {
    Submit,
    Cancel,
    Handled,
}

/// Feeds one key to an open editor.
fn edit_form<F: EditorForm>(form: &mut F, key: KeyEvent) -> EditorKey {
    match key.code {
        KeyCode::Esc => return EditorKey::Cancel,
        KeyCode::Enter => return EditorKey::Submit,
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
    EditorKey::Handled
}

/// Wraps an index by `delta` within `len`, returning `None` when the list is empty.
fn wrap_index(current: usize, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(((current as isize + delta).rem_euclid(len as isize)) as usize)
}

pub struct App {
    pub board: BoardState,
    backend: Arc<dyn Backend>,
    /// API calls waiting to run, oldest first.
    pending: VecDeque<Effect>,
    pub running: bool,
    pub mode: InputMode,
    pub focused_panel: FocusedPanel,
    /// Cursor in the project sidebar.
    pub sidebar_idx: usize,
    /// Focused board column (status order).
    pub column_idx: usize,
    /// Cursor within the focused column.
    pub card_idx: usize,
}

impl App {
    /// Creates the app and queues the startup sequence.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let mut app = Self {
            board: BoardState::default(),
            backend,
            pending: VecDeque::new(),
            running: true,
            mode: InputMode::Normal,
            focused_panel: FocusedPanel::Board,
            sidebar_idx: 0,
            column_idx: 0,
            card_idx: 0,
        };
        app.dispatch(Action::Boot);
        app
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while self.running {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // Keys are only read once every queued call has finished.
            if self.step().await {
                continue;
            }

            if event::poll(Duration::from_millis(250))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Runs the oldest pending effect. Returns false when nothing was queued.
    pub async fn step(&mut self) -> bool {
        let Some(effect) = self.pending.pop_front() else {
            return false;
        };
        debug!(?effect, "running effect");
        let backend = Arc::clone(&self.backend);
        let action = perform(backend.as_ref(), effect).await;
        self.dispatch(action);
        true
    }

    /// Drains the effect queue, including effects queued by results.
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    fn dispatch(&mut self, action: Action) {
        let before = self.board.selected_id();
        let effects = self.board.apply(action);
        self.pending.extend(effects);

        let after = self.board.selected_id();
        if before != after {
            if let Some(idx) = after.and_then(|id| self.board.projects.iter().position(|p| p.id == id)) {
                self.sidebar_idx = idx;
            }
            self.card_idx = 0;
        }
        self.clamp_cursors();
    }

    fn clamp_cursors(&mut self) {
        self.sidebar_idx = self
            .sidebar_idx
            .min(self.board.projects.len().saturating_sub(1));
        let len = self.focused_column_len();
        self.card_idx = self.card_idx.min(len.saturating_sub(1));
    }

    fn focused_column_len(&self) -> usize {
        columns(&self.board.tasks)[self.column_idx].tasks.len()
    }

    /// The project under the sidebar cursor.
    pub fn cursor_project(&self) -> Option<&Project> {
        self.board.projects.get(self.sidebar_idx)
    }

    /// The card under the board cursor.
    pub fn selected_task(&self) -> Option<&Task> {
        columns(&self.board.tasks)[self.column_idx]
            .tasks
            .get(self.card_idx)
            .copied()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if self.board.error.is_some() {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                self.running = false;
            }
            return;
        }

        if let Some(form) = self.board.task_editor.as_mut() {
            match edit_form(form, key) {
                EditorKey::Submit => self.dispatch(Action::SubmitTask),
                EditorKey::Cancel => self.dispatch(Action::CloseTaskEditor),
                EditorKey::Handled => {}
            }
            return;
        }
        if let Some(form) = self.board.project_editor.as_mut() {
            match edit_form(form, key) {
                EditorKey::Submit => self.dispatch(Action::SubmitProject),
                EditorKey::Cancel => self.dispatch(Action::CloseProjectEditor),
                EditorKey::Handled => {}
            }
            return;
        }

        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::HelpOverlay => self.handle_help_key(key),
            InputMode::ConfirmDelete(target) => self.handle_confirm_key(key, target),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.mode = InputMode::HelpOverlay,
            KeyCode::Esc => self.dispatch(Action::DismissNotice),
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Char('n') => self.dispatch(Action::OpenNewTask),
            KeyCode::Char('N') => self.dispatch(Action::OpenNewProject),
            _ => match self.focused_panel {
                FocusedPanel::Projects => self.handle_projects_key(key),
                FocusedPanel::Board => self.handle_board_key(key),
            },
        }
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.navigate_projects(1),
            KeyCode::Char('k') | KeyCode::Up => self.navigate_projects(-1),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(id) = self.cursor_project().map(|p| p.id) {
                    self.dispatch(Action::SelectProject(id));
                    self.focused_panel = FocusedPanel::Board;
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.cursor_project().map(|p| p.id) {
                    self.dispatch(Action::OpenEditProject(id));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.cursor_project().map(|p| p.id) {
                    self.mode = InputMode::ConfirmDelete(DeleteTarget::Project(id));
                }
            }
            _ => {}
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.move_column(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_column(1),
            KeyCode::Char('j') | KeyCode::Down => self.navigate_cards(1),
            KeyCode::Char('k') | KeyCode::Up => self.navigate_cards(-1),
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    self.dispatch(Action::OpenEditTask(id));
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    self.mode = InputMode::ConfirmDelete(DeleteTarget::Task(id));
                }
            }
            KeyCode::Char('s') | KeyCode::Char('>') => self.shift_status(true),
            KeyCode::Char('<') => self.shift_status(false),
            KeyCode::Char(c @ '1'..='3') => {
                let status = TaskStatus::ALL[usize::from(c as u8 - b'1')];
                if let Some(task_id) = self.selected_task().map(|t| t.id) {
                    self.dispatch(Action::ChangeStatus { task_id, status });
                }
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            self.mode = InputMode::Normal;
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, target: DeleteTarget) {
        self.mode = InputMode::Normal;
        if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            return;
        }
        match target {
            DeleteTarget::Task(id) => self.dispatch(Action::DeleteTask(id)),
            DeleteTarget::Project(id) => self.dispatch(Action::DeleteProject(id)),
        }
    }

    fn toggle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Projects => FocusedPanel::Board,
            FocusedPanel::Board => FocusedPanel::Projects,
        };
    }

    fn navigate_projects(&mut self, delta: isize) {
        if let Some(next) = wrap_index(self.sidebar_idx, self.board.projects.len(), delta) {
            self.sidebar_idx = next;
        }
    }

    fn navigate_cards(&mut self, delta: isize) {
        if let Some(next) = wrap_index(self.card_idx, self.focused_column_len(), delta) {
            self.card_idx = next;
        }
    }

    /// Columns do not wrap.
    fn move_column(&mut self, delta: isize) {
        let next = (self.column_idx as isize + delta).clamp(0, 2) as usize;
        if next != self.column_idx {
            self.column_idx = next;
            self.card_idx = 0;
        }
    }

    /// Moves the selected card one column forward or back, wrapping.
    fn shift_status(&mut self, forward: bool) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let status = if forward {
            task.status.next()
        } else {
            task.status.prev()
        };
        let task_id = task.id;
        self.dispatch(Action::ChangeStatus { task_id, status });
    }
}
