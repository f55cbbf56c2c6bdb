//! Client-side board state and its transitions.
//!
//! [`BoardState::apply`] is the only way the state changes. User intents and
//! API results both arrive as [`Action`]s; the API calls a transition needs
//! are returned as [`Effect`]s for the caller to run with [`perform`].

pub mod action;
pub mod form;
pub mod view;

pub use action::{Action, Effect, perform};
pub use form::{EditorForm, ProjectField, ProjectForm, TaskField, TaskForm};

use tracing::{info, warn};

use crate::api::ClientError;
use crate::models::{Project, Task};

#[derive(Debug, Clone)]
pub struct BoardState {
    pub projects: Vec<Project>,
    pub selected_project: Option<Project>,
    /// Tasks of the selected project, in server order.
    pub tasks: Vec<Task>,
    pub loading: bool,
    /// True until the initial project list arrives or startup fails.
    pub booting: bool,
    /// Startup failure. Once set the board is unusable.
    pub error: Option<String>,
    /// Last per-action failure, shown until dismissed or replaced.
    pub notice: Option<String>,
    pub task_editor: Option<TaskForm>,
    pub project_editor: Option<ProjectForm>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            selected_project: None,
            tasks: Vec::new(),
            loading: false,
            booting: true,
            error: None,
            notice: None,
            task_editor: None,
            project_editor: None,
        }
    }
}

impl BoardState {
    pub fn selected_id(&self) -> Option<i64> {
        self.selected_project.as_ref().map(|p| p.id)
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Applies one action and returns the API calls it requires.
    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        if self.error.is_some() {
            return Vec::new();
        }

        match action {
            Action::Boot => vec![Effect::Seed],
            Action::Seeded(Ok(())) => vec![Effect::LoadProjects],
            Action::Seeded(Err(err)) => {
                self.fail_startup("seed", err);
                Vec::new()
            }
            Action::ProjectsLoaded(Ok(projects)) => {
                info!(count = projects.len(), "projects loaded");
                self.booting = false;
                self.projects = projects;
                if let Some(id) = self.selected_id() {
                    if let Some(fresh) = self.project(id).cloned() {
                        self.selected_project = Some(fresh);
                    }
                    return Vec::new();
                }
                match self.projects.first().map(|p| p.id) {
                    Some(first) => self.select(first),
                    None => Vec::new(),
                }
            }
            Action::ProjectsLoaded(Err(err)) => {
                self.fail_startup("load projects", err);
                Vec::new()
            }

            Action::SelectProject(id) => self.select(id),
            Action::TasksLoaded { project_id, result } => {
                if self.selected_id() != Some(project_id) {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(tasks) => {
                        self.tasks = tasks;
                        self.sync_embedded_tasks();
                    }
                    Err(err) => self.notify("Failed to load tasks", err),
                }
                Vec::new()
            }

            Action::ChangeStatus { task_id, status } => match self.task(task_id) {
                Some(task) if task.status != status => {
                    vec![Effect::UpdateTaskStatus { task_id, status }]
                }
                _ => Vec::new(),
            },
            Action::StatusChanged {
                task_id,
                status,
                result,
            } => {
                match result {
                    Ok(()) => {
                        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                            task.status = status;
                        }
                        self.sync_embedded_tasks();
                    }
                    Err(err) => self.notify("Failed to update task", err),
                }
                Vec::new()
            }

            Action::OpenNewTask => {
                if self.selected_project.is_none() {
                    self.notice = Some("Select a project first".to_string());
                } else {
                    self.task_editor = Some(TaskForm::default());
                }
                Vec::new()
            }
            Action::OpenEditTask(id) => {
                if let Some(task) = self.task(id) {
                    self.task_editor = Some(TaskForm::for_task(task));
                }
                Vec::new()
            }
            Action::CloseTaskEditor => {
                self.task_editor = None;
                Vec::new()
            }
            Action::SubmitTask => self.submit_task(),
            Action::TaskCreated(result) => {
                match result {
                    Ok(task) => {
                        if self.selected_id() == Some(task.project_id) {
                            self.tasks.push(task);
                            self.sync_embedded_tasks();
                        }
                        self.task_editor = None;
                    }
                    Err(err) => self.notify("Failed to save task", err),
                }
                Vec::new()
            }
            Action::TaskUpdated(result) => {
                match result {
                    Ok(task) => {
                        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                            *slot = task;
                        }
                        self.sync_embedded_tasks();
                        self.task_editor = None;
                    }
                    Err(err) => self.notify("Failed to save task", err),
                }
                Vec::new()
            }
            Action::DeleteTask(task_id) => vec![Effect::DeleteTask { task_id }],
            Action::TaskDeleted { task_id, result } => {
                match result {
                    Ok(()) => {
                        self.tasks.retain(|t| t.id != task_id);
                        self.sync_embedded_tasks();
                    }
                    Err(err) => self.notify("Failed to delete task", err),
                }
                Vec::new()
            }

            Action::OpenNewProject => {
                self.project_editor = Some(ProjectForm::default());
                Vec::new()
            }
            Action::OpenEditProject(id) => {
                if let Some(project) = self.project(id) {
                    self.project_editor = Some(ProjectForm::for_project(project));
                }
                Vec::new()
            }
            Action::CloseProjectEditor => {
                self.project_editor = None;
                Vec::new()
            }
            Action::SubmitProject => self.submit_project(),
            Action::ProjectCreated(result) => match result {
                Ok(project) => {
                    let id = project.id;
                    self.projects.push(project);
                    self.project_editor = None;
                    self.select(id)
                }
                Err(err) => {
                    self.notify("Failed to save project", err);
                    Vec::new()
                }
            },
            Action::ProjectUpdated(result) => {
                match result {
                    Ok(mut project) => {
                        // Keep the list when a backend omits `tasks` from the update response.
                        if let Some(slot) = self.projects.iter_mut().find(|p| p.id == project.id) {
                            if project.tasks.is_empty() {
                                project.tasks = std::mem::take(&mut slot.tasks);
                            }
                            *slot = project.clone();
                        }
                        if self.selected_id() == Some(project.id) {
                            self.selected_project = Some(project);
                        }
                        self.project_editor = None;
                    }
                    Err(err) => self.notify("Failed to save project", err),
                }
                Vec::new()
            }
            Action::DeleteProject(project_id) => vec![Effect::DeleteProject { project_id }],
            Action::ProjectDeleted { project_id, result } => match result {
                Ok(()) => {
                    self.projects.retain(|p| p.id != project_id);
                    if self.selected_id() != Some(project_id) {
                        return Vec::new();
                    }
                    self.selected_project = None;
                    self.tasks.clear();
                    match self.projects.first().map(|p| p.id) {
                        Some(first) => self.select(first),
                        None => {
                            self.loading = false;
                            Vec::new()
                        }
                    }
                }
                Err(err) => {
                    self.notify("Failed to delete project", err);
                    Vec::new()
                }
            },

            Action::DismissNotice => {
                self.notice = None;
                Vec::new()
            }
        }
    }

    fn select(&mut self, id: i64) -> Vec<Effect> {
        let Some(project) = self.project(id).cloned() else {
            return Vec::new();
        };
        self.selected_project = Some(project);
        self.tasks.clear();
        self.loading = true;
        vec![Effect::FetchTasks { project_id: id }]
    }

    fn submit_task(&mut self) -> Vec<Effect> {
        let selected = self.selected_id();
        let Some(form) = self.task_editor.as_mut() else {
            return Vec::new();
        };
        if let Err(msg) = form.validate() {
            form.error = Some(msg);
            return Vec::new();
        }
        form.error = None;
        match (form.id, selected) {
            (Some(task_id), _) => vec![Effect::UpdateTask {
                task_id,
                input: form.to_update(),
            }],
            (None, Some(project_id)) => vec![Effect::CreateTask(form.to_create(project_id))],
            (None, None) => {
                form.error = Some("Select a project first".to_string());
                Vec::new()
            }
        }
    }

    fn submit_project(&mut self) -> Vec<Effect> {
        let Some(form) = self.project_editor.as_mut() else {
            return Vec::new();
        };
        if let Err(msg) = form.validate() {
            form.error = Some(msg);
            return Vec::new();
        }
        form.error = None;
        match form.id {
            Some(project_id) => vec![Effect::UpdateProject {
                project_id,
                input: form.to_update(),
            }],
            None => vec![Effect::CreateProject(form.to_create())],
        }
    }

    /// Keeps the sidebar's embedded task list in step with the board.
    fn sync_embedded_tasks(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if let Some(project) = self.projects.iter_mut().find(|p| p.id == id) {
            project.tasks = self.tasks.clone();
        }
        if let Some(project) = self.selected_project.as_mut() {
            project.tasks = self.tasks.clone();
        }
    }

    fn notify(&mut self, what: &str, err: ClientError) {
        warn!(status = ?err.status(), error = %err, "{what}");
        self.notice = Some(format!("{what}: {err}"));
    }

    fn fail_startup(&mut self, step: &str, err: ClientError) {
        warn!(status = ?err.status(), error = %err, step, "startup failed");
        self.booting = false;
        self.loading = false;
        self.error = Some(err.to_string());
    }
}
