//! Editor drafts for the task and project modals.
//!
//! A draft is always built from the entity being edited (or from defaults for
//! a new one) when the editor opens. Nothing carries over between subjects.

use crate::models::{
    CreateProjectInput, CreateTaskInput, DEFAULT_PROJECT_COLOR, PROJECT_PALETTE, Priority, Project,
    Task, TaskStatus, UpdateProjectInput, UpdateTaskInput,
};

/// Keyboard-level editing shared by both editors.
pub trait EditorForm {
    fn next_field(&mut self);
    fn prev_field(&mut self);
    /// Types into the focused text field. Ignored on choice fields.
    fn input_char(&mut self, c: char);
    fn backspace(&mut self);
    /// Steps the focused choice field. Ignored on text fields.
    fn cycle(&mut self, forward: bool);
}

fn blank_to_none(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ── Task form ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    Status,
    Priority,
}

impl TaskField {
    const ORDER: [TaskField; 4] = [Self::Title, Self::Description, Self::Status, Self::Priority];

    fn step(self, forward: bool) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ORDER[next]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub focus: TaskField,
    /// Validation message shown inside the editor.
    pub error: Option<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            focus: TaskField::Title,
            error: None,
        }
    }
}

impl TaskForm {
    pub fn for_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        Ok(())
    }

    /// The create payload, bound to `project_id`.
    pub fn to_create(&self, project_id: i64) -> CreateTaskInput {
        CreateTaskInput {
            title: self.title.trim().to_string(),
            description: blank_to_none(&self.description),
            status: self.status,
            priority: self.priority,
            project_id,
        }
    }

    /// Full update payload. The description is always sent so that clearing
    /// it in the editor clears it on the server.
    pub fn to_update(&self) -> UpdateTaskInput {
        UpdateTaskInput {
            title: Some(self.title.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            status: Some(self.status),
            priority: Some(self.priority),
        }
    }
}

impl EditorForm for TaskForm {
    fn next_field(&mut self) {
        self.focus = self.focus.step(true);
    }

    fn prev_field(&mut self) {
        self.focus = self.focus.step(false);
    }

    fn input_char(&mut self, c: char) {
        match self.focus {
            TaskField::Title => self.title.push(c),
            TaskField::Description => self.description.push(c),
            TaskField::Status | TaskField::Priority => return,
        }
        self.error = None;
    }

    fn backspace(&mut self) {
        match self.focus {
            TaskField::Title => {
                self.title.pop();
            }
            TaskField::Description => {
                self.description.pop();
            }
            TaskField::Status | TaskField::Priority => {}
        }
    }

    fn cycle(&mut self, forward: bool) {
        match self.focus {
            TaskField::Status => {
                self.status = if forward { self.status.next() } else { self.status.prev() };
            }
            TaskField::Priority => {
                self.priority = if forward { self.priority.next() } else { self.priority.prev() };
            }
            TaskField::Title | TaskField::Description => {}
        }
    }
}

// ── Project form ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Name,
    Description,
    Color,
}

impl ProjectField {
    const ORDER: [ProjectField; 3] = [Self::Name, Self::Description, Self::Color];

    fn step(self, forward: bool) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let len = Self::ORDER.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ORDER[next]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub color: String,
    pub focus: ProjectField,
    pub error: Option<String>,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            color: DEFAULT_PROJECT_COLOR.to_string(),
            focus: ProjectField::Name,
            error: None,
        }
    }
}

impl ProjectForm {
    pub fn for_project(project: &Project) -> Self {
        Self {
            id: Some(project.id),
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            color: project.color.clone(),
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Project name is required".to_string());
        }
        Ok(())
    }

    pub fn to_create(&self) -> CreateProjectInput {
        CreateProjectInput {
            name: self.name.trim().to_string(),
            description: blank_to_none(&self.description),
            color: self.color.clone(),
        }
    }

    pub fn to_update(&self) -> UpdateProjectInput {
        UpdateProjectInput {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            color: Some(self.color.clone()),
        }
    }

    /// Index of the current colour in the palette, if it is one of the swatches.
    pub fn palette_index(&self) -> Option<usize> {
        PROJECT_PALETTE.iter().position(|c| c.eq_ignore_ascii_case(&self.color))
    }
}

impl EditorForm for ProjectForm {
    fn next_field(&mut self) {
        self.focus = self.focus.step(true);
    }

    fn prev_field(&mut self) {
        self.focus = self.focus.step(false);
    }

    fn input_char(&mut self, c: char) {
        match self.focus {
            ProjectField::Name => self.name.push(c),
            ProjectField::Description => self.description.push(c),
            ProjectField::Color => return,
        }
        self.error = None;
    }

    fn backspace(&mut self) {
        match self.focus {
            ProjectField::Name => {
                self.name.pop();
            }
            ProjectField::Description => {
                self.description.pop();
            }
            ProjectField::Color => {}
        }
    }

    fn cycle(&mut self, forward: bool) {
        if self.focus != ProjectField::Color {
            return;
        }
        let len = PROJECT_PALETTE.len();
        let next = match (self.palette_index(), forward) {
            (Some(idx), true) => (idx + 1) % len,
            (Some(idx), false) => (idx + len - 1) % len,
            (None, _) => 0,
        };
        self.color = PROJECT_PALETTE[next].to_string();
    }
}
