use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::db::Database;
use crate::db::task::list_tasks;
use crate::models::{CreateProjectInput, Project, Task, UpdateProjectInput};

const SELECT_COLUMNS: &str = "id, name, description, color, created_at, updated_at";

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tasks: Vec::new(),
    })
}

pub fn create_project(db: &Database, input: CreateProjectInput) -> Result<Project> {
    db.conn()
        .execute(
            "INSERT INTO projects (name, description, color) VALUES (?1, ?2, ?3)",
            params![input.name, input.description, input.color],
        )
        .context("failed to insert project")?;

    let id = db.conn().last_insert_rowid();
    get_project(db, id)?.context("project not found after insert")
}

/// Fetches a project with its tasks embedded.
pub fn get_project(db: &Database, id: i64) -> Result<Option<Project>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM projects WHERE id = ?1");
    let project = db
        .conn()
        .prepare(&sql)?
        .query_row([id], row_to_project)
        .optional()
        .context("failed to query project")?;

    let Some(mut project) = project else {
        return Ok(None);
    };
    project.tasks = list_tasks(db, Some(id))?;
    Ok(Some(project))
}

/// All projects in insertion order, each with its tasks embedded.
pub fn list_projects(db: &Database) -> Result<Vec<Project>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM projects ORDER BY id ASC");
    let mut stmt = db.conn().prepare(&sql)?;
    let mut projects = stmt
        .query_map([], row_to_project)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to list projects")?;

    let mut by_project: HashMap<i64, Vec<Task>> = HashMap::new();
    for task in list_tasks(db, None)? {
        by_project.entry(task.project_id).or_default().push(task);
    }
    for project in &mut projects {
        project.tasks = by_project.remove(&project.id).unwrap_or_default();
    }

    Ok(projects)
}

pub fn count_projects(db: &Database) -> Result<i64> {
    db.conn()
        .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
        .context("failed to count projects")
}

/// Applies the set fields of `input`. Returns `None` when the project does not exist.
pub fn update_project(
    db: &Database,
    id: i64,
    input: UpdateProjectInput,
) -> Result<Option<Project>> {
    let mut set_clauses: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    let mut bind = |column: &str, value: Box<dyn rusqlite::types::ToSql>| {
        params.push(value);
        set_clauses.push(format!("\"{column}\" = ?{}", params.len()));
    };

    if let Some(name) = input.name {
        bind("name", Box::new(name));
    }
    if let Some(description) = input.description {
        bind("description", Box::new(description));
    }
    if let Some(color) = input.color {
        bind("color", Box::new(color));
    }

    set_clauses.push("updated_at = datetime('now')".to_string());
    params.push(Box::new(id));

    let sql = format!(
        "UPDATE projects SET {} WHERE id = ?{}",
        set_clauses.join(", "),
        params.len(),
    );

    let rows_affected = db
        .conn()
        .execute(&sql, params_from_iter(params.iter()))
        .context("failed to update project")?;

    if rows_affected == 0 {
        return Ok(None);
    }

    get_project(db, id)
}

/// Deletes the project; its tasks go with it through the foreign key cascade.
pub fn delete_project(db: &Database, id: i64) -> Result<bool> {
    let rows_affected = db
        .conn()
        .execute("DELETE FROM projects WHERE id = ?1", [id])
        .context("failed to delete project")?;

    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::task::create_task;
    use crate::models::{CreateTaskInput, Priority, TaskStatus};
    use tempfile::TempDir;

    fn open_temp_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        (db, dir)
    }

    fn input(name: &str) -> CreateProjectInput {
        CreateProjectInput {
            name: name.to_string(),
            description: None,
            color: "#6366f1".to_string(),
        }
    }

    fn add_task(db: &Database, project_id: i64, title: &str) {
        create_task(
            db,
            CreateTaskInput {
                title: title.to_string(),
                description: None,
                status: TaskStatus::Todo,
                priority: Priority::Low,
                project_id,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_create_project() {
        let (db, _dir) = open_temp_db();
        let project = create_project(
            &db,
            CreateProjectInput {
                description: Some("desc".to_string()),
                ..input("Website")
            },
        )
        .unwrap();

        assert!(project.id > 0);
        assert_eq!(project.name, "Website");
        assert_eq!(project.description.as_deref(), Some("desc"));
        assert_eq!(project.color, "#6366f1");
        assert!(project.tasks.is_empty());
        assert!(project.created_at.is_some());
    }

    #[test]
    fn test_get_project_not_found() {
        let (db, _dir) = open_temp_db();
        assert!(get_project(&db, 1).unwrap().is_none());
    }

    #[test]
    fn test_list_projects_insertion_order_with_tasks() {
        let (db, _dir) = open_temp_db();
        let first = create_project(&db, input("First")).unwrap();
        let second = create_project(&db, input("Second")).unwrap();
        add_task(&db, second.id, "s1");
        add_task(&db, second.id, "s2");
        add_task(&db, first.id, "f1");

        let projects = list_projects(&db).unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
        assert_eq!(projects[0].task_count(), 1);
        assert_eq!(projects[1].task_count(), 2);
    }

    #[test]
    fn test_count_projects() {
        let (db, _dir) = open_temp_db();
        assert_eq!(count_projects(&db).unwrap(), 0);
        create_project(&db, input("One")).unwrap();
        assert_eq!(count_projects(&db).unwrap(), 1);
    }

    #[test]
    fn test_update_project_partial() {
        let (db, _dir) = open_temp_db();
        let project = create_project(&db, input("Before")).unwrap();

        let updated = update_project(
            &db,
            project.id,
            UpdateProjectInput {
                color: Some("#ef4444".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.name, "Before");
        assert_eq!(updated.color, "#ef4444");
    }

    #[test]
    fn test_update_project_not_found() {
        let (db, _dir) = open_temp_db();
        let result = update_project(
            &db,
            5,
            UpdateProjectInput {
                name: Some("x".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_project_cascades_to_tasks() {
        let (db, _dir) = open_temp_db();
        let project = create_project(&db, input("Doomed")).unwrap();
        add_task(&db, project.id, "t");

        assert!(delete_project(&db, project.id).unwrap());
        assert!(get_project(&db, project.id).unwrap().is_none());
        assert!(list_tasks(&db, None).unwrap().is_empty());
        assert!(!delete_project(&db, project.id).unwrap());
    }
}
