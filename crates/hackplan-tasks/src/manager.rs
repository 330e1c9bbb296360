use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use hackplan_core::types::{TaskPhase, TaskPriority, TaskStatus};
use rusqlite::Connection;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::{row_to_task, TASK_COLUMNS};
use crate::error::{Result, TaskError};
use crate::types::{Assignment, DependencyEdge, Task};

/// Fields accepted when creating or updating a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub phase: TaskPhase,
    pub estimated_hours: f64,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub required_skill: Option<String>,
}

/// Thread-safe store for tasks, dependency edges, and assignments.
pub struct TaskManager {
    db: Mutex<Connection>,
}

impl TaskManager {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    // ── Tasks ───────────────────────────────────────────────────────────────

    #[instrument(skip(self, draft), fields(hackathon_id, title = %draft.title))]
    pub fn create(&self, hackathon_id: &str, draft: TaskDraft) -> Result<Task> {
        validate(&draft)?;
        let id = Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO tasks
             (id, hackathon_id, title, phase, estimated_hours, priority, status,
              required_skill, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            rusqlite::params![
                id,
                hackathon_id,
                draft.title,
                draft.phase.to_string(),
                draft.estimated_hours,
                draft.priority.to_string(),
                draft.status.to_string(),
                draft.required_skill,
                now
            ],
        )?;
        info!(task_id = %id, "task created");
        Ok(Task {
            id,
            hackathon_id: hackathon_id.to_string(),
            title: draft.title,
            phase: draft.phase,
            estimated_hours: draft.estimated_hours,
            priority: draft.priority,
            status: draft.status,
            required_skill: draft.required_skill,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Task> {
        let db = self.db.lock().unwrap();
        get_locked(&db, id)
    }

    /// All tasks in a hackathon in creation order (stable scheduler tie-break).
    #[instrument(skip(self))]
    pub fn list_for_hackathon(&self, hackathon_id: &str) -> Result<Vec<Task>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE hackathon_id = ?1 ORDER BY created_at, id"
        ))?;
        let rows = stmt.query_map(rusqlite::params![hackathon_id], row_to_task)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    #[instrument(skip(self, draft), fields(id))]
    pub fn update(&self, id: &str, draft: TaskDraft) -> Result<Task> {
        validate(&draft)?;
        let now = chrono::Utc::now().to_rfc3339();
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "UPDATE tasks
             SET title = ?1, phase = ?2, estimated_hours = ?3, priority = ?4,
                 status = ?5, required_skill = ?6, updated_at = ?7
             WHERE id = ?8",
            rusqlite::params![
                draft.title,
                draft.phase.to_string(),
                draft.estimated_hours,
                draft.priority.to_string(),
                draft.status.to_string(),
                draft.required_skill,
                now,
                id
            ],
        )?;
        if n == 0 {
            return Err(TaskError::NotFound(id.to_string()));
        }
        get_locked(&db, id)
    }

    /// Delete a task. Dependency edges and the assignment row cascade.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])?;
        if n == 0 {
            return Err(TaskError::NotFound(id.to_string()));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    // ── Dependencies ────────────────────────────────────────────────────────

    /// Record that `task_id` cannot start before `depends_on` finishes.
    ///
    /// Rejects self-edges, duplicates, unknown tasks, and any edge that would
    /// close a cycle through the existing graph.
    #[instrument(skip(self))]
    pub fn add_dependency(&self, task_id: &str, depends_on: &str) -> Result<DependencyEdge> {
        if task_id == depends_on {
            return Err(TaskError::SelfDependency(task_id.to_string()));
        }

        let db = self.db.lock().unwrap();
        // Both endpoints must exist (FKs would also catch this, but the error
        // would be an opaque constraint failure).
        get_locked(&db, task_id)?;
        get_locked(&db, depends_on)?;

        // A cycle exists iff task_id is already reachable from depends_on.
        let edges = edges_locked(&db, None)?;
        if let Some(mut path) = reachable_path(&edges, depends_on, task_id) {
            path.push(depends_on.to_string());
            return Err(TaskError::DependencyCycle { path });
        }

        let inserted = db.execute(
            "INSERT OR IGNORE INTO task_dependencies (task_id, depends_on) VALUES (?1, ?2)",
            rusqlite::params![task_id, depends_on],
        )?;
        if inserted == 0 {
            return Err(TaskError::DuplicateDependency {
                task_id: task_id.to_string(),
                depends_on: depends_on.to_string(),
            });
        }
        info!(task_id, depends_on, "dependency added");
        Ok(DependencyEdge {
            task_id: task_id.to_string(),
            depends_on: depends_on.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn remove_dependency(&self, task_id: &str, depends_on: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "DELETE FROM task_dependencies WHERE task_id = ?1 AND depends_on = ?2",
            rusqlite::params![task_id, depends_on],
        )?;
        if n == 0 {
            return Err(TaskError::NotFound(format!("{task_id} -> {depends_on}")));
        }
        Ok(())
    }

    /// Direct prerequisites of one task.
    pub fn dependencies_of(&self, task_id: &str) -> Result<Vec<String>> {
        let db = self.db.lock().unwrap();
        let mut stmt =
            db.prepare("SELECT depends_on FROM task_dependencies WHERE task_id = ?1")?;
        let rows = stmt.query_map(rusqlite::params![task_id], |row| row.get(0))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Every dependency edge between tasks of one hackathon.
    #[instrument(skip(self))]
    pub fn dependency_edges(&self, hackathon_id: &str) -> Result<Vec<DependencyEdge>> {
        let db = self.db.lock().unwrap();
        edges_locked(&db, Some(hackathon_id))
    }

    // ── Assignments ─────────────────────────────────────────────────────────

    /// Assign a member to a task. REPLACE semantics: a second assign moves
    /// the task to the new member.
    #[instrument(skip(self))]
    pub fn assign(&self, task_id: &str, member_id: &str) -> Result<Assignment> {
        let db = self.db.lock().unwrap();
        get_locked(&db, task_id)?;
        db.execute(
            "INSERT OR REPLACE INTO task_assignments (task_id, member_id) VALUES (?1, ?2)",
            rusqlite::params![task_id, member_id],
        )?;
        info!(task_id, member_id, "task assigned");
        Ok(Assignment {
            task_id: task_id.to_string(),
            member_id: member_id.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub fn unassign(&self, task_id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "DELETE FROM task_assignments WHERE task_id = ?1",
            rusqlite::params![task_id],
        )?;
        if n == 0 {
            return Err(TaskError::NotFound(task_id.to_string()));
        }
        Ok(())
    }

    /// All assignments across one hackathon's tasks.
    #[instrument(skip(self))]
    pub fn assignments_for(&self, hackathon_id: &str) -> Result<Vec<Assignment>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(
            "SELECT a.task_id, a.member_id
             FROM task_assignments a
             JOIN tasks t ON t.id = a.task_id
             WHERE t.hackathon_id = ?1",
        )?;
        let rows = stmt.query_map(rusqlite::params![hackathon_id], |row| {
            Ok(Assignment {
                task_id: row.get(0)?,
                member_id: row.get(1)?,
            })
        })?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }
}

fn validate(draft: &TaskDraft) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(TaskError::Validation("title cannot be empty".into()));
    }
    if !(draft.estimated_hours > 0.0) || draft.estimated_hours > 1000.0 {
        return Err(TaskError::Validation(
            "estimated_hours must be positive and sane".into(),
        ));
    }
    Ok(())
}

fn get_locked(db: &Connection, id: &str) -> Result<Task> {
    match db.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        rusqlite::params![id],
        row_to_task,
    ) {
        Ok(t) => Ok(t),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(TaskError::NotFound(id.to_string())),
        Err(e) => Err(TaskError::Database(e)),
    }
}

fn edges_locked(db: &Connection, hackathon_id: Option<&str>) -> Result<Vec<DependencyEdge>> {
    let map = |row: &rusqlite::Row<'_>| {
        Ok(DependencyEdge {
            task_id: row.get(0)?,
            depends_on: row.get(1)?,
        })
    };
    let edges = match hackathon_id {
        Some(hid) => {
            let mut stmt = db.prepare(
                "SELECT d.task_id, d.depends_on
                 FROM task_dependencies d
                 JOIN tasks t ON t.id = d.task_id
                 WHERE t.hackathon_id = ?1",
            )?;
            let rows = stmt.query_map(rusqlite::params![hid], map)?;
            rows.filter_map(|r| r.ok()).collect()
        }
        None => {
            let mut stmt = db.prepare("SELECT task_id, depends_on FROM task_dependencies")?;
            let rows = stmt.query_map([], map)?;
            rows.filter_map(|r| r.ok()).collect()
        }
    };
    Ok(edges)
}

/// DFS from `from` along dependency edges; returns the path when `to` is
/// reachable. Used to reject cycle-closing edges before they are stored.
fn reachable_path(edges: &[DependencyEdge], from: &str, to: &str) -> Option<Vec<String>> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for e in edges {
        adjacency
            .entry(e.task_id.as_str())
            .or_default()
            .push(e.depends_on.as_str());
    }

    let mut stack = vec![vec![from.to_string()]];
    let mut seen: HashSet<String> = HashSet::new();
    while let Some(path) = stack.pop() {
        let node = path.last().cloned().unwrap_or_default();
        if node == to {
            return Some(path);
        }
        if !seen.insert(node.clone()) {
            continue;
        }
        for next in adjacency.get(node.as_str()).into_iter().flatten() {
            let mut p = path.clone();
            p.push((*next).to_string());
            stack.push(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TaskManager {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
        // stub parent tables so the FKs hold in isolation
        conn.execute_batch(
            "CREATE TABLE hackathons (id TEXT PRIMARY KEY);
             CREATE TABLE team_members (id TEXT PRIMARY KEY);
             INSERT INTO hackathons (id) VALUES ('h1');
             INSERT INTO team_members (id) VALUES ('m1');
             INSERT INTO team_members (id) VALUES ('m2');",
        )
        .unwrap();
        crate::db::init_db(&conn).unwrap();
        TaskManager::new(conn)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            phase: TaskPhase::Build,
            estimated_hours: 2.0,
            priority: TaskPriority::Medium,
            status: TaskStatus::Todo,
            required_skill: None,
        }
    }

    #[test]
    fn crud_round_trip() {
        let m = manager();
        let t = m.create("h1", draft("API skeleton")).unwrap();
        assert_eq!(m.get(&t.id).unwrap().title, "API skeleton");

        let mut d = draft("API skeleton");
        d.status = TaskStatus::Done;
        assert_eq!(m.update(&t.id, d).unwrap().status, TaskStatus::Done);

        m.delete(&t.id).unwrap();
        assert!(matches!(m.get(&t.id), Err(TaskError::NotFound(_))));
    }

    #[test]
    fn self_dependency_is_rejected() {
        let m = manager();
        let t = m.create("h1", draft("a")).unwrap();
        assert!(matches!(
            m.add_dependency(&t.id, &t.id),
            Err(TaskError::SelfDependency(_))
        ));
    }

    #[test]
    fn duplicate_dependency_is_rejected() {
        let m = manager();
        let a = m.create("h1", draft("a")).unwrap();
        let b = m.create("h1", draft("b")).unwrap();
        m.add_dependency(&b.id, &a.id).unwrap();
        assert!(matches!(
            m.add_dependency(&b.id, &a.id),
            Err(TaskError::DuplicateDependency { .. })
        ));
    }

    #[test]
    fn cycle_is_rejected() {
        let m = manager();
        let a = m.create("h1", draft("a")).unwrap();
        let b = m.create("h1", draft("b")).unwrap();
        let c = m.create("h1", draft("c")).unwrap();
        m.add_dependency(&b.id, &a.id).unwrap(); // b after a
        m.add_dependency(&c.id, &b.id).unwrap(); // c after b
        // a after c would close a → b → c → a
        assert!(matches!(
            m.add_dependency(&a.id, &c.id),
            Err(TaskError::DependencyCycle { .. })
        ));
        // and the edge must not have been stored
        assert!(m.dependencies_of(&a.id).unwrap().is_empty());
    }

    #[test]
    fn deleting_a_task_drops_its_edges_and_assignment() {
        let m = manager();
        let a = m.create("h1", draft("a")).unwrap();
        let b = m.create("h1", draft("b")).unwrap();
        m.add_dependency(&b.id, &a.id).unwrap();
        m.assign(&a.id, "m1").unwrap();

        m.delete(&a.id).unwrap();
        assert!(m.dependencies_of(&b.id).unwrap().is_empty());
        assert!(m.assignments_for("h1").unwrap().is_empty());
    }

    #[test]
    fn assign_replaces_previous_member() {
        let m = manager();
        let t = m.create("h1", draft("t")).unwrap();
        m.assign(&t.id, "m1").unwrap();
        m.assign(&t.id, "m2").unwrap();
        let assignments = m.assignments_for("h1").unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].member_id, "m2");
    }

    #[test]
    fn estimated_hours_must_be_positive() {
        let m = manager();
        let mut d = draft("zero");
        d.estimated_hours = 0.0;
        assert!(matches!(m.create("h1", d), Err(TaskError::Validation(_))));
    }
}
