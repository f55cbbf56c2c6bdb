use crate::api::{Backend, ClientError};
use crate::models::{
    CreateProjectInput, CreateTaskInput, Project, Task, TaskStatus, UpdateProjectInput,
    UpdateTaskInput,
};

/// Everything that can happen to the board: user intents and the results of
/// the API calls those intents triggered.
#[derive(Debug)]
pub enum Action {
    Boot,
    Seeded(Result<(), ClientError>),
    ProjectsLoaded(Result<Vec<Project>, ClientError>),

    SelectProject(i64),
    TasksLoaded {
        project_id: i64,
        result: Result<Vec<Task>, ClientError>,
    },

    ChangeStatus {
        task_id: i64,
        status: TaskStatus,
    },
    StatusChanged {
        task_id: i64,
        status: TaskStatus,
        result: Result<(), ClientError>,
    },

    OpenNewTask,
    OpenEditTask(i64),
    CloseTaskEditor,
    SubmitTask,
    TaskCreated(Result<Task, ClientError>),
    TaskUpdated(Result<Task, ClientError>),
    DeleteTask(i64),
    TaskDeleted {
        task_id: i64,
        result: Result<(), ClientError>,
    },

    OpenNewProject,
    OpenEditProject(i64),
    CloseProjectEditor,
    SubmitProject,
    ProjectCreated(Result<Project, ClientError>),
    ProjectUpdated(Result<Project, ClientError>),
    DeleteProject(i64),
    ProjectDeleted {
        project_id: i64,
        result: Result<(), ClientError>,
    },

    DismissNotice,
}

/// An API call requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Seed,
    LoadProjects,
    FetchTasks { project_id: i64 },
    UpdateTaskStatus { task_id: i64, status: TaskStatus },
    CreateTask(CreateTaskInput),
    UpdateTask { task_id: i64, input: UpdateTaskInput },
    DeleteTask { task_id: i64 },
    CreateProject(CreateProjectInput),
    UpdateProject { project_id: i64, input: UpdateProjectInput },
    DeleteProject { project_id: i64 },
}

/// Runs one effect against the backend and reports the outcome as an action.
pub async fn perform(backend: &dyn Backend, effect: Effect) -> Action {
    match effect {
        Effect::Seed => Action::Seeded(backend.seed().await),
        Effect::LoadProjects => Action::ProjectsLoaded(backend.list_projects().await),
        Effect::FetchTasks { project_id } => Action::TasksLoaded {
            project_id,
            result: backend.list_tasks(project_id).await,
        },
        Effect::UpdateTaskStatus { task_id, status } => {
            let input = UpdateTaskInput {
                status: Some(status),
                ..Default::default()
            };
            Action::StatusChanged {
                task_id,
                status,
                result: backend.update_task(task_id, &input).await.map(|_| ()),
            }
        }
        Effect::CreateTask(input) => Action::TaskCreated(backend.create_task(&input).await),
        Effect::UpdateTask { task_id, input } => {
            Action::TaskUpdated(backend.update_task(task_id, &input).await)
        }
        Effect::DeleteTask { task_id } => Action::TaskDeleted {
            task_id,
            result: backend.delete_task(task_id).await,
        },
        Effect::CreateProject(input) => {
            Action::ProjectCreated(backend.create_project(&input).await)
        }
        Effect::UpdateProject { project_id, input } => {
            Action::ProjectUpdated(backend.update_project(project_id, &input).await)
        }
        Effect::DeleteProject { project_id } => Action::ProjectDeleted {
            project_id,
            result: backend.delete_project(project_id).await,
        },
    }
}
