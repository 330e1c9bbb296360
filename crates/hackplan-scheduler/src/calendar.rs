//! Day and week groupings over a computed schedule.
//!
//! Blocks are grouped by the UTC date they touch; a block spanning midnight
//! shows up on both days (the HTTP layer serves these as-is, clients clip
//! to the visible day).

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use crate::types::{Block, Schedule};

/// All blocks overlapping the 24h window starting at `date` 00:00 UTC.
pub fn day_view(schedule: &Schedule, date: NaiveDate) -> Vec<Block> {
    let day_start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is valid"));
    let day_end = day_start + Duration::days(1);
    schedule
        .blocks
        .iter()
        .filter(|b| b.start < day_end && b.end > day_start)
        .cloned()
        .collect()
}

/// Seven consecutive day views starting at `start_date`.
pub fn week_view(schedule: &Schedule, start_date: NaiveDate) -> [Vec<Block>; 7] {
    std::array::from_fn(|i| day_view(schedule, start_date + Duration::days(i as i64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn block(task: &str, start: &str, end: &str) -> Block {
        Block {
            task_id: task.into(),
            member_id: "m".into(),
            start: start.parse::<DateTime<Utc>>().unwrap(),
            end: end.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    fn schedule() -> Schedule {
        Schedule {
            blocks: vec![
                block("t1", "2026-09-04T09:00:00Z", "2026-09-04T14:00:00Z"),
                block("t2", "2026-09-04T22:00:00Z", "2026-09-05T02:00:00Z"),
                block("t3", "2026-09-06T10:00:00Z", "2026-09-06T12:00:00Z"),
            ],
            unplaced: vec![],
        }
    }

    #[test]
    fn day_view_includes_only_overlapping_blocks() {
        let s = schedule();
        let day = day_view(&s, "2026-09-04".parse().unwrap());
        let ids: Vec<&str> = day.iter().map(|b| b.task_id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[test]
    fn midnight_spanning_block_appears_on_both_days() {
        let s = schedule();
        let next = day_view(&s, "2026-09-05".parse().unwrap());
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].task_id, "t2");
    }

    #[test]
    fn week_view_covers_seven_days() {
        let s = schedule();
        let week = week_view(&s, "2026-09-04".parse().unwrap());
        assert_eq!(week[0].len(), 2); // t1 + t2
        assert_eq!(week[1].len(), 1); // tail of t2
        assert_eq!(week[2].len(), 1); // t3
        assert!(week[3..].iter().all(|d| d.is_empty()));
    }

    #[test]
    fn empty_day_is_empty() {
        let s = schedule();
        assert!(day_view(&s, "2026-10-01".parse().unwrap()).is_empty());
    }
}
