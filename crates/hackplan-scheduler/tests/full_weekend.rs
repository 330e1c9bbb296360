//! End-to-end placement of a realistic 48-hour weekend hackathon:
//! three people with staggered sleep windows, a phased task list with
//! dependencies and one explicit assignment.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hackplan_core::types::{TaskPhase, TaskPriority, TaskStatus};
use hackplan_events::TeamMember;
use hackplan_scheduler::{build_schedule, calendar, ScheduleInput};
use hackplan_tasks::{Assignment, DependencyEdge, Task};

fn member(id: &str, sleep_start: u32, sleep_end: u32, skills: &[&str]) -> TeamMember {
    TeamMember {
        id: id.into(),
        hackathon_id: "h".into(),
        name: id.to_uppercase(),
        sleep_start_min: sleep_start,
        sleep_end_min: sleep_end,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        created_at: String::new(),
    }
}

fn task(id: &str, phase: TaskPhase, hours: f64, priority: TaskPriority, skill: Option<&str>) -> Task {
    Task {
        id: id.into(),
        hackathon_id: "h".into(),
        title: id.replace('-', " "),
        phase,
        estimated_hours: hours,
        priority,
        status: TaskStatus::Todo,
        required_skill: skill.map(String::from),
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn weekend() -> ScheduleInput {
    let starts_at: DateTime<Utc> = "2026-09-04T18:00:00Z".parse().unwrap();
    ScheduleInput {
        starts_at,
        duration_hours: 48,
        members: vec![
            member("ada", 1380, 420, &["backend", "rust"]), // 23:00-07:00
            member("lin", 120, 600, &["frontend"]),         // 02:00-10:00
            member("sam", 0, 0, &["design", "pitch"]),      // powers through
        ],
        tasks: vec![
            task("scope", TaskPhase::Planning, 2.0, TaskPriority::High, None),
            task("api", TaskPhase::Build, 10.0, TaskPriority::High, Some("backend")),
            task("ui", TaskPhase::Build, 8.0, TaskPriority::Medium, Some("frontend")),
            task("styling", TaskPhase::Polish, 4.0, TaskPriority::Low, Some("design")),
            task("pitch-deck", TaskPhase::Demo, 3.0, TaskPriority::Medium, None),
        ],
        edges: vec![
            DependencyEdge { task_id: "api".into(), depends_on: "scope".into() },
            DependencyEdge { task_id: "ui".into(), depends_on: "scope".into() },
            DependencyEdge { task_id: "styling".into(), depends_on: "ui".into() },
            DependencyEdge { task_id: "pitch-deck".into(), depends_on: "api".into() },
            DependencyEdge { task_id: "pitch-deck".into(), depends_on: "styling".into() },
        ],
        assignments: vec![Assignment {
            task_id: "pitch-deck".into(),
            member_id: "sam".into(),
        }],
        slot_minutes: 30,
    }
}

#[test]
fn every_task_lands_on_the_calendar() {
    let inp = weekend();
    let s = build_schedule(&inp).unwrap();
    assert!(s.unplaced.is_empty(), "unplaced: {:?}", s.unplaced);
    for t in &inp.tasks {
        assert!(
            !s.blocks_for_task(&t.id).is_empty(),
            "task {} has no blocks",
            t.id
        );
    }
}

#[test]
fn schedule_honours_all_invariants() {
    let inp = weekend();
    let s = build_schedule(&inp).unwrap();
    let members: HashMap<&str, &TeamMember> =
        inp.members.iter().map(|m| (m.id.as_str(), m)).collect();
    let ends_at = inp.starts_at + chrono::Duration::hours(48);
    let start_mod = 18 * 60;

    // within window, awake only
    for b in &s.blocks {
        assert!(b.start >= inp.starts_at && b.end <= ends_at);
        let m = members[b.member_id.as_str()];
        let s_off = (b.start - inp.starts_at).num_minutes() as u32;
        let e_off = (b.end - inp.starts_at).num_minutes() as u32;
        for minute in s_off..e_off {
            assert!(!m.is_asleep_at((start_mod + minute) % 1440));
        }
    }

    // no per-member overlap
    for m in &inp.members {
        let blocks = s.blocks_for_member(&m.id);
        for pair in blocks.windows(2) {
            assert!(pair[0].end <= pair[1].start, "overlap for member {}", m.id);
        }
    }

    // dependency order
    let finish: HashMap<&str, DateTime<Utc>> = inp
        .tasks
        .iter()
        .filter_map(|t| {
            s.blocks_for_task(&t.id)
                .last()
                .map(|b| (t.id.as_str(), b.end))
        })
        .collect();
    for e in &inp.edges {
        let dep_end = finish[e.depends_on.as_str()];
        let start = s.blocks_for_task(&e.task_id)[0].start;
        assert!(
            start >= dep_end,
            "{} starts before {} ends",
            e.task_id,
            e.depends_on
        );
    }
}

#[test]
fn skill_and_assignment_routing() {
    let s = build_schedule(&weekend()).unwrap();
    assert!(s.blocks_for_task("api").iter().all(|b| b.member_id == "ada"));
    assert!(s.blocks_for_task("ui").iter().all(|b| b.member_id == "lin"));
    assert!(s
        .blocks_for_task("styling")
        .iter()
        .all(|b| b.member_id == "sam"));
    assert!(s
        .blocks_for_task("pitch-deck")
        .iter()
        .all(|b| b.member_id == "sam"));
}

#[test]
fn week_view_accounts_for_every_block() {
    let inp = weekend();
    let s = build_schedule(&inp).unwrap();
    let week = calendar::week_view(&s, "2026-09-04".parse().unwrap());
    // every block overlaps at least one of the seven days
    let total: usize = week.iter().map(|d| d.len()).sum();
    assert!(total >= s.blocks.len());
}
