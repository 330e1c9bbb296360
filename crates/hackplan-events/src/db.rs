use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result};

use crate::types::{Hackathon, TeamMember};

pub(crate) const HACKATHON_COLUMNS: &str =
    "id, owner_id, name, description, starts_at, duration_hours, created_at, updated_at";

pub(crate) const MEMBER_COLUMNS: &str =
    "id, hackathon_id, name, sleep_start_min, sleep_end_min, skills, created_at";

/// Map a SELECT row (column order from HACKATHON_COLUMNS) to a Hackathon.
pub(crate) fn row_to_hackathon(row: &rusqlite::Row<'_>) -> rusqlite::Result<Hackathon> {
    let starts_at: String = row.get(4)?;
    let starts_at = DateTime::parse_from_rfc3339(&starts_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(Hackathon {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        starts_at,
        duration_hours: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Map a SELECT row (column order from MEMBER_COLUMNS) to a TeamMember.
/// Skills are stored as a JSON array column.
pub(crate) fn row_to_member(row: &rusqlite::Row<'_>) -> rusqlite::Result<TeamMember> {
    let skills: Vec<String> =
        serde_json::from_str(&row.get::<_, String>(5)?).unwrap_or_default();
    Ok(TeamMember {
        id: row.get(0)?,
        hackathon_id: row.get(1)?,
        name: row.get(2)?,
        sleep_start_min: row.get(3)?,
        sleep_end_min: row.get(4)?,
        skills,
        created_at: row.get(6)?,
    })
}

/// Initialise hackathon and team member tables. Idempotent.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS hackathons (
            id             TEXT PRIMARY KEY NOT NULL,
            owner_id       TEXT NOT NULL REFERENCES users(id),
            name           TEXT NOT NULL,
            description    TEXT NOT NULL DEFAULT '',
            starts_at      TEXT NOT NULL,
            duration_hours INTEGER NOT NULL,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_hackathons_owner ON hackathons (owner_id);

        CREATE TABLE IF NOT EXISTS team_members (
            id              TEXT PRIMARY KEY NOT NULL,
            hackathon_id    TEXT NOT NULL REFERENCES hackathons(id) ON DELETE CASCADE,
            name            TEXT NOT NULL,
            sleep_start_min INTEGER NOT NULL DEFAULT 0,
            sleep_end_min   INTEGER NOT NULL DEFAULT 0,
            skills          TEXT NOT NULL DEFAULT '[]',  -- JSON array
            created_at      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_members_hackathon ON team_members (hackathon_id);",
    )
}
