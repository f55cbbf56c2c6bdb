use anyhow::{Context, Result};
use rusqlite::params;

use crate::db::Database;
use crate::db::project::count_projects;
use crate::models::{Priority, TaskStatus};

struct SeedProject {
    name: &'static str,
    description: &'static str,
    color: &'static str,
    tasks: &'static [SeedTask],
}

struct SeedTask {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: Priority,
}

const fn task(
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: Priority,
) -> SeedTask {
    SeedTask {
        title,
        description,
        status,
        priority,
    }
}

const DEMO_PROJECTS: &[SeedProject] = &[
    SeedProject {
        name: "Website Redesign",
        description: "Redesign the company website with modern UI",
        color: "#6366f1",
        tasks: &[
            task("Create wireframes", "Design wireframes for all pages", TaskStatus::Done, Priority::High),
            task("Design UI mockups", "Create high-fidelity Figma mockups", TaskStatus::InProgress, Priority::High),
            task("Implement homepage", "Code the responsive homepage", TaskStatus::Todo, Priority::Medium),
            task("SEO optimisation", "Add meta tags and structured data", TaskStatus::Todo, Priority::Low),
        ],
    },
    SeedProject {
        name: "Mobile App",
        description: "Build a cross-platform mobile application",
        color: "#f59e0b",
        tasks: &[
            task("Setup React Native", "Initialise the project with Expo", TaskStatus::Done, Priority::High),
            task("User authentication", "Implement login / signup flow", TaskStatus::InProgress, Priority::High),
            task("Push notifications", "Integrate Firebase Cloud Messaging", TaskStatus::Todo, Priority::Low),
        ],
    },
    SeedProject {
        name: "API Development",
        description: "Develop RESTful microservices",
        color: "#10b981",
        tasks: &[
            task("Database schema", "Design normalised SQL schema", TaskStatus::Done, Priority::High),
            task("CRUD endpoints", "Implement all resource endpoints", TaskStatus::InProgress, Priority::High),
            task("API documentation", "Write OpenAPI / Swagger docs", TaskStatus::Todo, Priority::Medium),
        ],
    },
];

/// Populates the demo projects when the database has none.
/// Returns `false` without touching anything if projects already exist.
pub fn seed_demo_data(db: &Database) -> Result<bool> {
    if count_projects(db)? > 0 {
        return Ok(false);
    }

    let tx = db
        .conn()
        .unchecked_transaction()
        .context("failed to begin seed transaction")?;

    for project in DEMO_PROJECTS {
        tx.execute(
            "INSERT INTO projects (name, description, color) VALUES (?1, ?2, ?3)",
            params![project.name, project.description, project.color],
        )
        .context("failed to insert demo project")?;
        let project_id = tx.last_insert_rowid();

        for task in project.tasks {
            tx.execute(
                "INSERT INTO tasks (project_id, title, description, status, priority) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    project_id,
                    task.title,
                    task.description,
                    task.status.as_str(),
                    task.priority.as_str(),
                ],
            )
            .context("failed to insert demo task")?;
        }
    }

    tx.commit().context("failed to commit seed transaction")?;
    Ok(true)
}
