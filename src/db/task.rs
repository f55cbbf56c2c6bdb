use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::db::Database;
use crate::models::{CreateTaskInput, Priority, Task, TaskStatus, UpdateTaskInput};

const SELECT_COLUMNS: &str =
    "id, project_id, title, description, status, priority, created_at, updated_at";

fn parse_column<T>(row: &Row, idx: usize, name: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    let raw: String = row.get(name)?;
    raw.parse().map_err(|e: anyhow::Error| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())),
        )
    })
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let status: TaskStatus = parse_column(row, 4, "status")?;
    let priority: Priority = parse_column(row, 5, "priority")?;

    Ok(Task {
        id: row.get("id")?,
        project_id: row.get("project_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        priority,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn create_task(db: &Database, input: CreateTaskInput) -> Result<Task> {
    db.conn()
        .execute(
            "INSERT INTO tasks (project_id, title, description, status, priority) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                input.project_id,
                input.title,
                input.description,
                input.status.as_str(),
                input.priority.as_str(),
            ],
        )
        .context("failed to insert task (check that project_id is valid)")?;

    let id = db.conn().last_insert_rowid();
    get_task(db, id)?.context("task not found after insert")
}

pub fn get_task(db: &Database, id: i64) -> Result<Option<Task>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM tasks WHERE id = ?1");
    db.conn()
        .prepare(&sql)?
        .query_row([id], row_to_task)
        .optional()
        .context("failed to query task")
}

/// Tasks in insertion order, optionally restricted to one project.
pub fn list_tasks(db: &Database, project_id: Option<i64>) -> Result<Vec<Task>> {
    let base = format!("SELECT {SELECT_COLUMNS} FROM tasks");
    let tail = "ORDER BY id ASC";

    let mut stmt;
    let rows = match project_id {
        Some(pid) => {
            stmt = db
                .conn()
                .prepare(&format!("{base} WHERE project_id = ?1 {tail}"))?;
            stmt.query_map([pid], row_to_task)?
        }
        None => {
            stmt = db.conn().prepare(&format!("{base} {tail}"))?;
            stmt.query_map([], row_to_task)?
        }
    };

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to list tasks")
}

/// Applies the set fields of `input`. Returns `None` when the task does not exist.
pub fn update_task(db: &Database, id: i64, input: UpdateTaskInput) -> Result<Option<Task>> {
    let mut set_clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    let mut bind = |column: &str, value: Box<dyn rusqlite::types::ToSql>| {
        params.push(value);
        set_clauses.push(format!("\"{column}\" = ?{}", params.len()));
    };

    if let Some(title) = input.title {
        bind("title", Box::new(title));
    }
    if let Some(description) = input.description {
        bind("description", Box::new(description));
    }
    if let Some(status) = input.status {
        bind("status", Box::new(status.as_str()));
    }
    if let Some(priority) = input.priority {
        bind("priority", Box::new(priority.as_str()));
    }

    set_clauses.push("updated_at = datetime('now')".to_string());
    params.push(Box::new(id));

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ?{}",
        set_clauses.join(", "),
        params.len(),
    );

    let rows_affected = db
        .conn()
        .execute(&sql, params_from_iter(params.iter()))
        .context("failed to update task")?;

    if rows_affected == 0 {
        return Ok(None);
    }

    get_task(db, id)
}

pub fn delete_task(db: &Database, id: i64) -> Result<bool> {
    let rows_affected = db
        .conn()
        .execute("DELETE FROM tasks WHERE id = ?1", [id])
        .context("failed to delete task")?;

    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::project::create_project;
    use crate::models::CreateProjectInput;
    use tempfile::TempDir;

    fn open_temp_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        (db, dir)
    }

    fn make_project(db: &Database, name: &str) -> i64 {
        create_project(
            db,
            CreateProjectInput {
                name: name.to_string(),
                description: None,
                color: "#10b981".to_string(),
            },
        )
        .unwrap()
        .id
    }

    fn task_input(project_id: i64, title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            project_id,
        }
    }

    #[test]
    fn test_create_task_defaults() {
        let (db, _dir) = open_temp_db();
        let pid = make_project(&db, "P");
        let task = create_task(&db, task_input(pid, "Write docs")).unwrap();

        assert!(task.id > 0);
        assert_eq!(task.project_id, pid);
        assert_eq!(task.title, "Write docs");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.created_at.is_some());
    }

    #[test]
    fn test_create_task_invalid_project_fails() {
        let (db, _dir) = open_temp_db();
        assert!(create_task(&db, task_input(42, "Orphan")).is_err());
    }

    #[test]
    fn test_get_task_not_found() {
        let (db, _dir) = open_temp_db();
        assert!(get_task(&db, 7).unwrap().is_none());
    }

    #[test]
    fn test_list_tasks_filters_by_project_in_insertion_order() {
        let (db, _dir) = open_temp_db();
        let a = make_project(&db, "A");
        let b = make_project(&db, "B");
        create_task(&db, task_input(a, "a1")).unwrap();
        create_task(&db, task_input(b, "b1")).unwrap();
        create_task(&db, task_input(a, "a2")).unwrap();

        let titles: Vec<String> = list_tasks(&db, Some(a))
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["a1", "a2"]);
        assert_eq!(list_tasks(&db, None).unwrap().len(), 3);
    }

    #[test]
    fn test_update_task_partial() {
        let (db, _dir) = open_temp_db();
        let pid = make_project(&db, "P");
        let task = create_task(
            &db,
            CreateTaskInput {
                description: Some("details".to_string()),
                priority: Priority::High,
                ..task_input(pid, "Original")
            },
        )
        .unwrap();

        let updated = update_task(
            &db,
            task.id,
            UpdateTaskInput {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description.as_deref(), Some("details"));
        assert_eq!(updated.priority, Priority::High);
    }

    #[test]
    fn test_update_task_not_found() {
        let (db, _dir) = open_temp_db();
        let result = update_task(
            &db,
            99,
            UpdateTaskInput {
                title: Some("x".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_task() {
        let (db, _dir) = open_temp_db();
        let pid = make_project(&db, "P");
        let task = create_task(&db, task_input(pid, "Gone soon")).unwrap();

        assert!(delete_task(&db, task.id).unwrap());
        assert!(!delete_task(&db, task.id).unwrap());
        assert!(get_task(&db, task.id).unwrap().is_none());
    }
}
