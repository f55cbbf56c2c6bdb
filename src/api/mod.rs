//! HTTP client for the board's REST backend.

mod error;
#[cfg(test)]
pub(crate) mod fake;

pub use error::ClientError;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{
    CreateProjectInput, CreateTaskInput, Project, Task, UpdateProjectInput, UpdateTaskInput,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// The operations the board needs from its backend.
///
/// [`ApiClient`] is the real implementation; the TUI holds a `Box<dyn Backend>`
/// so it can be driven by an in-memory fake in tests.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn seed(&self) -> Result<(), ClientError>;
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;
    async fn create_project(&self, input: &CreateProjectInput) -> Result<Project, ClientError>;
    async fn update_project(
        &self,
        id: i64,
        input: &UpdateProjectInput,
    ) -> Result<Project, ClientError>;
    async fn delete_project(&self, id: i64) -> Result<(), ClientError>;
    async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ClientError>;
    async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ClientError>;
    async fn update_task(&self, id: i64, input: &UpdateTaskInput) -> Result<Task, ClientError>;
    async fn delete_task(&self, id: i64) -> Result<(), ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "api request");
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Sends the request. A 204 or an empty success body yields `None`; any
    /// non-success status becomes [`ClientError::Status`].
    async fn execute(&self, request: RequestBuilder) -> Result<Option<Vec<u8>>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let err = ClientError::from_response(status.as_u16(), &body);
            debug!(status = status.as_u16(), error = %err, "api request failed");
            return Err(err);
        }
        if body.is_empty() {
            return Ok(None);
        }
        Ok(Some(body.to_vec()))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let body = self.execute(request).await?.unwrap_or_default();
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn seed(&self) -> Result<(), ClientError> {
        self.execute(self.request(Method::POST, "/seed")).await?;
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        self.fetch(self.request(Method::GET, "/projects")).await
    }

    async fn create_project(&self, input: &CreateProjectInput) -> Result<Project, ClientError> {
        self.fetch(self.request(Method::POST, "/projects").json(input))
            .await
    }

    async fn update_project(
        &self,
        id: i64,
        input: &UpdateProjectInput,
    ) -> Result<Project, ClientError> {
        self.fetch(
            self.request(Method::PUT, &format!("/projects/{id}"))
                .json(input),
        )
        .await
    }

    async fn delete_project(&self, id: i64) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/projects/{id}")))
            .await?;
        Ok(())
    }

    async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ClientError> {
        self.fetch(
            self.request(Method::GET, "/tasks")
                .query(&[("project_id", project_id)]),
        )
        .await
    }

    async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ClientError> {
        self.fetch(self.request(Method::POST, "/tasks").json(input))
            .await
    }

    async fn update_task(&self, id: i64, input: &UpdateTaskInput) -> Result<Task, ClientError> {
        self.fetch(self.request(Method::PUT, &format!("/tasks/{id}")).json(input))
            .await
    }

    async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        self.execute(self.request(Method::DELETE, &format!("/tasks/{id}")))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::error::FALLBACK_MESSAGE;
    use super::*;
    use crate::models::{DEFAULT_PROJECT_COLOR, Priority, TaskStatus};
    use crate::server::{spawn_router, spawn_test_server};
    use axum::Router;
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{delete, get};

    async fn client() -> ApiClient {
        ApiClient::new(spawn_test_server().await).unwrap()
    }

    fn project_input(name: &str) -> CreateProjectInput {
        CreateProjectInput {
            name: name.to_string(),
            description: None,
            color: DEFAULT_PROJECT_COLOR.to_string(),
        }
    }

    fn task_input(project_id: i64, title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            description: Some("details".to_string()),
            status: TaskStatus::Todo,
            priority: Priority::High,
            project_id,
        }
    }

    #[test]
    fn new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[tokio::test]
    async fn seed_then_list_projects() {
        let api = client().await;
        api.seed().await.unwrap();
        api.seed().await.unwrap();

        let projects = api.list_projects().await.unwrap();
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].name, "Website Redesign");
        assert_eq!(projects[0].task_count(), 4);
    }

    #[tokio::test]
    async fn project_crud_round_trip() {
        let api = client().await;

        let created = api.create_project(&project_input("Launch")).await.unwrap();
        assert_eq!(created.name, "Launch");

        let updated = api
            .update_project(
                created.id,
                &UpdateProjectInput {
                    description: Some("Q3 launch".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Launch");
        assert_eq!(updated.description.as_deref(), Some("Q3 launch"));

        api.delete_project(created.id).await.unwrap();
        assert!(api.list_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn task_crud_round_trip() {
        let api = client().await;
        let project = api.create_project(&project_input("P")).await.unwrap();
        let other = api.create_project(&project_input("Other")).await.unwrap();

        let task = api.create_task(&task_input(project.id, "First")).await.unwrap();
        api.create_task(&task_input(other.id, "Elsewhere")).await.unwrap();
        assert_eq!(task.project_id, project.id);
        assert_eq!(task.priority, Priority::High);

        let tasks = api.list_tasks(project.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "First");

        let moved = api
            .update_task(
                task.id,
                &UpdateTaskInput {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.status, TaskStatus::Done);
        assert_eq!(moved.description.as_deref(), Some("details"));

        api.delete_task(task.id).await.unwrap();
        assert!(api.list_tasks(project.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn not_found_carries_server_detail() {
        let api = client().await;
        let err = api.delete_task(404).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Task not found");

        let err = api.create_task(&task_input(77, "Orphan")).await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found");
    }

    #[tokio::test]
    async fn unparsable_error_body_uses_fallback() {
        let router = Router::new().route(
            "/api/projects",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "<h1>boom</h1>") }),
        );
        let api = ApiClient::new(spawn_router(router).await).unwrap();
        let err = api.list_projects().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn delete_with_empty_ok_body_is_not_an_error() {
        let router = Router::new().route("/api/tasks/{id}", delete(|| async { AxumStatus::OK }));
        let api = ApiClient::new(spawn_router(router).await).unwrap();
        api.delete_task(1).await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let api = ApiClient::new("http://127.0.0.1:1/api").unwrap();
        let err = api.list_projects().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
