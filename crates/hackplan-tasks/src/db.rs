use std::str::FromStr;

use hackplan_core::types::{TaskPhase, TaskPriority, TaskStatus};
use rusqlite::{Connection, Result};

use crate::types::Task;

pub(crate) const TASK_COLUMNS: &str = "id, hackathon_id, title, phase, estimated_hours, \
     priority, status, required_skill, created_at, updated_at";

/// Map a SELECT row (column order from TASK_COLUMNS) to a Task.
/// Unknown enum strings fall back to defaults rather than failing the row.
pub(crate) fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let phase = TaskPhase::from_str(&row.get::<_, String>(3)?).unwrap_or(TaskPhase::Build);
    let priority =
        TaskPriority::from_str(&row.get::<_, String>(5)?).unwrap_or(TaskPriority::Medium);
    let status = TaskStatus::from_str(&row.get::<_, String>(6)?).unwrap_or(TaskStatus::Todo);
    Ok(Task {
        id: row.get(0)?,
        hackathon_id: row.get(1)?,
        title: row.get(2)?,
        phase,
        estimated_hours: row.get(4)?,
        priority,
        status,
        required_skill: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Initialise task, dependency, and assignment tables. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (
            id              TEXT PRIMARY KEY NOT NULL,
            hackathon_id    TEXT NOT NULL REFERENCES hackathons(id) ON DELETE CASCADE,
            title           TEXT NOT NULL,
            phase           TEXT NOT NULL DEFAULT 'build',
            estimated_hours REAL NOT NULL,
            priority        TEXT NOT NULL DEFAULT 'medium',
            status          TEXT NOT NULL DEFAULT 'todo',
            required_skill  TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_tasks_hackathon ON tasks (hackathon_id);

        CREATE TABLE IF NOT EXISTS task_dependencies (
            task_id     TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            depends_on  TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            PRIMARY KEY (task_id, depends_on)
        );

        CREATE TABLE IF NOT EXISTS task_assignments (
            task_id    TEXT PRIMARY KEY NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            member_id  TEXT NOT NULL REFERENCES team_members(id) ON DELETE CASCADE
        );",
    )
}
