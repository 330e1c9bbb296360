//! Project idea → phased task list.
//!
//! Builds the drafting prompt, then parses the model's reply back into
//! structured tasks. Models wrap JSON in markdown fences or chat around it,
//! so parsing extracts the first JSON array found anywhere in the reply.

use serde::{Deserialize, Serialize};

use crate::provider::{LlmProvider, ProviderError};

/// Hours clamp for a single drafted task; anything outside is model noise.
const MIN_HOURS: f64 = 0.5;
const MAX_HOURS: f64 = 40.0;

/// One task as drafted by the model, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftTask {
    pub title: String,
    /// planning | build | polish | demo (free-form input is normalised later).
    pub phase: String,
    pub estimated_hours: f64,
    /// low | medium | high.
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub required_skill: Option<String>,
}

fn default_priority() -> String {
    "medium".to_string()
}

/// Drafting prompt for one project idea.
pub fn build_prompt(idea: &str, duration_hours: u32, team_size: usize) -> String {
    format!(
        "You are planning a {duration_hours}-hour hackathon project for a team of {team_size}.\n\
         Break this project idea into 6-12 concrete tasks:\n\n{idea}\n\n\
         Reply with ONLY a JSON array. Each element:\n\
         {{\"title\": string, \"phase\": \"planning\"|\"build\"|\"polish\"|\"demo\", \
         \"estimated_hours\": number, \"priority\": \"low\"|\"medium\"|\"high\", \
         \"required_skill\": string or null}}\n\
         Phases must cover planning through demo prep. Keep estimates realistic \
         for the event length."
    )
}

/// Ask the provider for a plan and parse the reply.
pub async fn generate_plan(
    provider: &dyn LlmProvider,
    idea: &str,
    duration_hours: u32,
    team_size: usize,
) -> Result<Vec<DraftTask>, ProviderError> {
    let prompt = build_prompt(idea, duration_hours, team_size);
    let reply = provider.generate(&prompt).await?;
    parse_reply(&reply)
}

/// Extract and validate the task array from a model reply.
pub fn parse_reply(reply: &str) -> Result<Vec<DraftTask>, ProviderError> {
    let json = extract_json_array(reply)
        .ok_or_else(|| ProviderError::Parse("no JSON array in model reply".into()))?;
    let mut tasks: Vec<DraftTask> = serde_json::from_str(json)
        .map_err(|e| ProviderError::Parse(format!("bad task array: {e}")))?;

    tasks.retain(|t| !t.title.trim().is_empty());
    if tasks.is_empty() {
        return Err(ProviderError::Parse("model returned no usable tasks".into()));
    }
    for t in &mut tasks {
        t.estimated_hours = t.estimated_hours.clamp(MIN_HOURS, MAX_HOURS);
    }
    Ok(tasks)
}

/// Find the first top-level `[...]` in the text, tolerating markdown fences
/// and prose around it. Tracks string literals so brackets inside titles
/// don't unbalance the scan.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let tasks = parse_reply(
            r#"[{"title": "Set up repo", "phase": "planning", "estimated_hours": 1}]"#,
        )
        .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Set up repo");
        assert_eq!(tasks[0].priority, "medium"); // default fills in
    }

    #[test]
    fn parses_fenced_array_with_prose() {
        let reply = "Sure! Here is your plan:\n```json\n[\n  {\"title\": \"API [v1]\", \
                     \"phase\": \"build\", \"estimated_hours\": 6, \"priority\": \"high\"}\n]\n```\nGood luck!";
        let tasks = parse_reply(reply).unwrap();
        assert_eq!(tasks[0].title, "API [v1]");
        assert_eq!(tasks[0].priority, "high");
    }

    #[test]
    fn clamps_silly_estimates() {
        let reply = r#"[
            {"title": "tiny", "phase": "build", "estimated_hours": 0.01},
            {"title": "huge", "phase": "build", "estimated_hours": 900}
        ]"#;
        let tasks = parse_reply(reply).unwrap();
        assert_eq!(tasks[0].estimated_hours, MIN_HOURS);
        assert_eq!(tasks[1].estimated_hours, MAX_HOURS);
    }

    #[test]
    fn drops_untitled_tasks_and_rejects_empty_result() {
        let reply = r#"[{"title": "  ", "phase": "build", "estimated_hours": 2}]"#;
        assert!(matches!(
            parse_reply(reply),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn no_array_is_a_parse_error() {
        assert!(matches!(
            parse_reply("I cannot help with that."),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn prompt_mentions_event_parameters() {
        let p = build_prompt("AI recipe app", 48, 4);
        assert!(p.contains("48-hour"));
        assert!(p.contains("team of 4"));
        assert!(p.contains("AI recipe app"));
    }
}
