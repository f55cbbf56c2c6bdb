//! In-memory [`Backend`] for controller and TUI tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{Backend, ClientError};
use crate::models::{
    CreateProjectInput, CreateTaskInput, DEFAULT_PROJECT_COLOR, Priority, Project, Task,
    TaskStatus, UpdateProjectInput, UpdateTaskInput,
};

#[derive(Default)]
struct FakeState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    next_id: i64,
    calls: Vec<String>,
    offline: bool,
    fail_next: bool,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Records the call and applies the configured failure mode.
    fn enter(&mut self, call: String) -> Result<(), ClientError> {
        self.calls.push(call);
        if self.offline {
            return Err(ClientError::Status {
                status: 503,
                detail: "backend offline".to_string(),
            });
        }
        if std::mem::take(&mut self.fail_next) {
            return Err(ClientError::Status {
                status: 500,
                detail: "Internal server error".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Status {
        status: 404,
        detail: format!("{what} not found"),
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn with_projects(names: &[&str]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            for name in names {
                let id = state.next_id();
                state.projects.push(Project {
                    id,
                    name: name.to_string(),
                    description: None,
                    color: DEFAULT_PROJECT_COLOR.to_string(),
                    created_at: None,
                    updated_at: None,
                    tasks: Vec::new(),
                });
            }
        }
        fake
    }

    pub fn offline() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().offline = true;
        fake
    }

    pub fn add_task(&self, project_id: i64, title: &str, status: TaskStatus) -> Task {
        let mut state = self.state.lock().unwrap();
        let task = Task {
            id: state.next_id(),
            title: title.to_string(),
            description: None,
            status,
            priority: Priority::Medium,
            project_id,
            created_at: None,
            updated_at: None,
        };
        state.tasks.push(task.clone());
        task
    }

    /// Makes the next call fail with a 500.
    pub fn fail_next(&self) {
        self.state.lock().unwrap().fail_next = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn task(&self, id: i64) -> Option<Task> {
        let state = self.state.lock().unwrap();
        state.tasks.iter().find(|t| t.id == id).cloned()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn seed(&self) -> Result<(), ClientError> {
        self.state.lock().unwrap().enter("seed".to_string())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter("list_projects".to_string())?;
        let projects = state
            .projects
            .iter()
            .map(|p| Project {
                tasks: state
                    .tasks
                    .iter()
                    .filter(|t| t.project_id == p.id)
                    .cloned()
                    .collect(),
                ..p.clone()
            })
            .collect();
        Ok(projects)
    }

    async fn create_project(&self, input: &CreateProjectInput) -> Result<Project, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("create_project({})", input.name))?;
        let project = Project {
            id: state.next_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            color: input.color.clone(),
            created_at: None,
            updated_at: None,
            tasks: Vec::new(),
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: i64,
        input: &UpdateProjectInput,
    ) -> Result<Project, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("update_project({id})"))?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("Project"))?;
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = Some(description.clone());
        }
        if let Some(color) = &input.color {
            project.color = color.clone();
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, id: i64) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("delete_project({id})"))?;
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        if state.projects.len() == before {
            return Err(not_found("Project"));
        }
        state.tasks.retain(|t| t.project_id != id);
        Ok(())
    }

    async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("list_tasks({project_id})"))?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("create_task({})", input.project_id))?;
        if !state.projects.iter().any(|p| p.id == input.project_id) {
            return Err(not_found("Project"));
        }
        let task = Task {
            id: state.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            project_id: input.project_id,
            created_at: None,
            updated_at: None,
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: i64, input: &UpdateTaskInput) -> Result<Task, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("update_task({id})"))?;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Task"))?;
        if let Some(title) = &input.title {
            task.title = title.clone();
        }
        if let Some(description) = &input.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = input.status {
            task.status = status;
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        let mut state = self.state.lock().unwrap();
        state.enter(format!("delete_task({id})"))?;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(not_found("Task"));
        }
        Ok(())
    }
}
