use crate::models::{Project, Task, TaskStatus};

/// One board column: the tasks whose status matches, in list order.
#[derive(Debug)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

/// Partitions `tasks` into the three status columns.
pub fn columns(tasks: &[Task]) -> [Column<'_>; 3] {
    TaskStatus::ALL.map(|status| Column {
        status,
        tasks: tasks.iter().filter(|t| t.status == status).collect(),
    })
}

pub fn count_done(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.status == TaskStatus::Done).count()
}

/// Completion percentage, rounded half up. Zero for an empty list.
pub fn progress_percent(tasks: &[Task]) -> u8 {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }
    let done = count_done(tasks);
    ((done * 100 + total / 2) / total) as u8
}

/// Sum of the embedded task counts, for the sidebar footer.
pub fn total_task_count(projects: &[Project]) -> usize {
    projects.iter().map(Project::task_count).sum()
}
