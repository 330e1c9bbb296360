use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u32 = 1440;
/// Hard cap on event length: two weeks.
pub const MAX_DURATION_HOURS: u32 = 336;

/// A time-boxed hackathon event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hackathon {
    /// UUIDv7 string — primary key.
    pub id: String,
    /// Owning user id.
    pub owner_id: String,
    pub name: String,
    pub description: String,
    /// Event start instant (RFC3339).
    pub starts_at: DateTime<Utc>,
    /// Event length in whole hours (1..=336).
    pub duration_hours: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Hackathon {
    /// Exclusive end of the event window.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.starts_at + chrono::Duration::hours(i64::from(self.duration_hours))
    }
}

/// A participant with a nightly sleep window and a skill set.
///
/// The sleep window is expressed as minutes-from-midnight on the event's
/// wall clock. `sleep_start > sleep_end` means the window wraps midnight
/// (e.g. 23:00 → 07:00). `sleep_start == sleep_end` means no sleep window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    /// UUIDv7 string — primary key.
    pub id: String,
    pub hackathon_id: String,
    pub name: String,
    /// Minutes from midnight, 0..1440.
    pub sleep_start_min: u32,
    /// Minutes from midnight, 0..1440.
    pub sleep_end_min: u32,
    pub skills: Vec<String>,
    pub created_at: String,
}

impl TeamMember {
    /// True while `minute_of_day` falls inside the sleep window.
    pub fn is_asleep_at(&self, minute_of_day: u32) -> bool {
        let m = minute_of_day % MINUTES_PER_DAY;
        if self.sleep_start_min == self.sleep_end_min {
            return false;
        }
        if self.sleep_start_min < self.sleep_end_min {
            m >= self.sleep_start_min && m < self.sleep_end_min
        } else {
            // wraps midnight
            m >= self.sleep_start_min || m < self.sleep_end_min
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(start: u32, end: u32) -> TeamMember {
        TeamMember {
            id: "m".into(),
            hackathon_id: "h".into(),
            name: "Ada".into(),
            sleep_start_min: start,
            sleep_end_min: end,
            skills: vec!["Rust".into()],
            created_at: String::new(),
        }
    }

    #[test]
    fn plain_window() {
        let m = member(60, 480); // 01:00-08:00
        assert!(!m.is_asleep_at(0));
        assert!(m.is_asleep_at(60));
        assert!(m.is_asleep_at(479));
        assert!(!m.is_asleep_at(480));
    }

    #[test]
    fn window_wrapping_midnight() {
        let m = member(1380, 420); // 23:00-07:00
        assert!(m.is_asleep_at(1380));
        assert!(m.is_asleep_at(0));
        assert!(m.is_asleep_at(419));
        assert!(!m.is_asleep_at(420));
        assert!(!m.is_asleep_at(720));
    }

    #[test]
    fn empty_window_never_sleeps() {
        let m = member(300, 300);
        for minute in [0, 299, 300, 301, 1439] {
            assert!(!m.is_asleep_at(minute));
        }
    }

    #[test]
    fn skill_match_is_case_insensitive() {
        let m = member(0, 0);
        assert!(m.has_skill("rust"));
        assert!(!m.has_skill("frontend"));
    }
}
