use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::{
    row_to_hackathon, row_to_member, HACKATHON_COLUMNS, MEMBER_COLUMNS,
};
use crate::error::{EventError, Result};
use crate::types::{Hackathon, TeamMember, MAX_DURATION_HOURS, MINUTES_PER_DAY};

/// Fields accepted when creating or updating a hackathon.
#[derive(Debug, Clone)]
pub struct HackathonDraft {
    pub name: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub duration_hours: u32,
}

/// Fields accepted when creating or updating a team member.
#[derive(Debug, Clone)]
pub struct MemberDraft {
    pub name: String,
    pub sleep_start_min: u32,
    pub sleep_end_min: u32,
    pub skills: Vec<String>,
}

/// Thread-safe store for hackathons and their team members.
pub struct EventManager {
    db: Mutex<Connection>,
}

impl EventManager {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    // ── Hackathons ──────────────────────────────────────────────────────────

    #[instrument(skip(self, draft), fields(owner_id, name = %draft.name))]
    pub fn create_hackathon(&self, owner_id: &str, draft: HackathonDraft) -> Result<Hackathon> {
        validate_hackathon(&draft)?;
        let id = Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO hackathons
             (id, owner_id, name, description, starts_at, duration_hours, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            rusqlite::params![
                id,
                owner_id,
                draft.name,
                draft.description,
                draft.starts_at.to_rfc3339(),
                draft.duration_hours,
                now
            ],
        )?;
        info!(hackathon_id = %id, "hackathon created");
        Ok(Hackathon {
            id,
            owner_id: owner_id.to_string(),
            name: draft.name,
            description: draft.description,
            starts_at: draft.starts_at,
            duration_hours: draft.duration_hours,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    #[instrument(skip(self))]
    pub fn get_hackathon(&self, id: &str) -> Result<Hackathon> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE id = ?1"),
            rusqlite::params![id],
            row_to_hackathon,
        ) {
            Ok(h) => Ok(h),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(EventError::HackathonNotFound(id.to_string()))
            }
            Err(e) => Err(EventError::Database(e)),
        }
    }

    /// All hackathons owned by `owner_id`, newest first.
    #[instrument(skip(self))]
    pub fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Hackathon>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons
             WHERE owner_id = ?1 ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(rusqlite::params![owner_id], row_to_hackathon)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    #[instrument(skip(self, draft), fields(id))]
    pub fn update_hackathon(&self, id: &str, draft: HackathonDraft) -> Result<Hackathon> {
        validate_hackathon(&draft)?;
        let now = chrono::Utc::now().to_rfc3339();
        {
            let db = self.db.lock().unwrap();
            let n = db.execute(
                "UPDATE hackathons
                 SET name = ?1, description = ?2, starts_at = ?3,
                     duration_hours = ?4, updated_at = ?5
                 WHERE id = ?6",
                rusqlite::params![
                    draft.name,
                    draft.description,
                    draft.starts_at.to_rfc3339(),
                    draft.duration_hours,
                    now,
                    id
                ],
            )?;
            if n == 0 {
                return Err(EventError::HackathonNotFound(id.to_string()));
            }
        }
        self.get_hackathon(id)
    }

    /// Delete a hackathon. Members cascade via foreign keys; task rows live
    /// in another subsystem and are cascaded by the gateway.
    #[instrument(skip(self))]
    pub fn delete_hackathon(&self, id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute("DELETE FROM hackathons WHERE id = ?1", rusqlite::params![id])?;
        if n == 0 {
            return Err(EventError::HackathonNotFound(id.to_string()));
        }
        info!(hackathon_id = %id, "hackathon deleted");
        Ok(())
    }

    // ── Team members ────────────────────────────────────────────────────────

    #[instrument(skip(self, draft), fields(hackathon_id, name = %draft.name))]
    pub fn add_member(&self, hackathon_id: &str, draft: MemberDraft) -> Result<TeamMember> {
        validate_member(&draft)?;
        self.get_hackathon(hackathon_id)?;

        let id = Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let skills_json = serde_json::to_string(&draft.skills)
            .map_err(|e| EventError::Validation(e.to_string()))?;

        let db = self.db.lock().unwrap();
        db.execute(
            "INSERT INTO team_members
             (id, hackathon_id, name, sleep_start_min, sleep_end_min, skills, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                id,
                hackathon_id,
                draft.name,
                draft.sleep_start_min,
                draft.sleep_end_min,
                skills_json,
                now
            ],
        )?;
        info!(member_id = %id, "team member added");
        Ok(TeamMember {
            id,
            hackathon_id: hackathon_id.to_string(),
            name: draft.name,
            sleep_start_min: draft.sleep_start_min,
            sleep_end_min: draft.sleep_end_min,
            skills: draft.skills,
            created_at: now,
        })
    }

    #[instrument(skip(self))]
    pub fn get_member(&self, id: &str) -> Result<TeamMember> {
        let db = self.db.lock().unwrap();
        match db.query_row(
            &format!("SELECT {MEMBER_COLUMNS} FROM team_members WHERE id = ?1"),
            rusqlite::params![id],
            row_to_member,
        ) {
            Ok(m) => Ok(m),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(EventError::MemberNotFound(id.to_string()))
            }
            Err(e) => Err(EventError::Database(e)),
        }
    }

    /// All members of a hackathon in insertion order.
    #[instrument(skip(self))]
    pub fn list_members(&self, hackathon_id: &str) -> Result<Vec<TeamMember>> {
        let db = self.db.lock().unwrap();
        let mut stmt = db.prepare(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members
             WHERE hackathon_id = ?1 ORDER BY created_at"
        ))?;
        let rows = stmt.query_map(rusqlite::params![hackathon_id], row_to_member)?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    #[instrument(skip(self, draft), fields(id))]
    pub fn update_member(&self, id: &str, draft: MemberDraft) -> Result<TeamMember> {
        validate_member(&draft)?;
        let skills_json = serde_json::to_string(&draft.skills)
            .map_err(|e| EventError::Validation(e.to_string()))?;
        {
            let db = self.db.lock().unwrap();
            let n = db.execute(
                "UPDATE team_members
                 SET name = ?1, sleep_start_min = ?2, sleep_end_min = ?3, skills = ?4
                 WHERE id = ?5",
                rusqlite::params![
                    draft.name,
                    draft.sleep_start_min,
                    draft.sleep_end_min,
                    skills_json,
                    id
                ],
            )?;
            if n == 0 {
                return Err(EventError::MemberNotFound(id.to_string()));
            }
        }
        self.get_member(id)
    }

    #[instrument(skip(self))]
    pub fn remove_member(&self, id: &str) -> Result<()> {
        let db = self.db.lock().unwrap();
        let n = db.execute(
            "DELETE FROM team_members WHERE id = ?1",
            rusqlite::params![id],
        )?;
        if n == 0 {
            return Err(EventError::MemberNotFound(id.to_string()));
        }
        info!(member_id = %id, "team member removed");
        Ok(())
    }
}

fn validate_hackathon(draft: &HackathonDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(EventError::Validation("name cannot be empty".into()));
    }
    if draft.duration_hours == 0 || draft.duration_hours > MAX_DURATION_HOURS {
        return Err(EventError::Validation(format!(
            "duration_hours must be 1..={MAX_DURATION_HOURS}"
        )));
    }
    Ok(())
}

fn validate_member(draft: &MemberDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(EventError::Validation("name cannot be empty".into()));
    }
    if draft.sleep_start_min >= MINUTES_PER_DAY || draft.sleep_end_min >= MINUTES_PER_DAY {
        return Err(EventError::Validation(
            "sleep window minutes must be 0..1440".into(),
        ));
    }
    Ok(())
}
