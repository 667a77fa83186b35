use crate::client::GenClient;
use crate::error::Result;
use crate::flows::{decode, require};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const FLOW: &str = "task-prioritization";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A board task as presented to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizeTasksInput {
    pub tasks: Vec<TaskSummary>,
    /// Real-time threat intelligence to weigh against the backlog.
    pub threat_intelligence: String,
    /// Current roster availability.
    pub team_capacity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedTask {
    pub id: String,
    /// New priority as free text ("Critical", "High", ...). The caller
    /// normalizes it at the store boundary.
    pub priority: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizeTasksOutput {
    pub prioritized_tasks: Vec<PrioritizedTask>,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

pub fn prompt(input: &PrioritizeTasksInput) -> String {
    let mut task_lines = String::new();
    for task in &input.tasks {
        let _ = writeln!(
            task_lines,
            "- ID: {}\n  Title: {}\n  Description: {}\n  Priority: {}",
            task.id,
            task.title,
            task.description,
            task.priority.as_deref().unwrap_or("unset"),
        );
    }

    format!(
        r#"You are an AI-powered task prioritization expert for cybersecurity teams. Based on real-time threat intelligence and team capacity, you will re-prioritize tasks on the Kanban board.

The current tasks are:
{task_lines}
Threat Intelligence:
{threat}

Team Capacity:
{capacity}

Based on the threat intelligence and team capacity, re-prioritize the tasks. Provide a clear reason for each priority assignment. The available priorities are: Critical, High, Medium, Low.

Respond with a single JSON object with the key "prioritizedTasks": an array where each element contains the task "id", the new "priority", and the "reason" for the assignment."#,
        threat = input.threat_intelligence,
        capacity = input.team_capacity,
    )
}

/// Re-prioritize the given tasks. An empty task list short-circuits to an
/// empty result without touching the API.
pub async fn run(
    client: &GenClient,
    input: &PrioritizeTasksInput,
) -> Result<PrioritizeTasksOutput> {
    if input.tasks.is_empty() {
        return Ok(PrioritizeTasksOutput {
            prioritized_tasks: Vec::new(),
        });
    }
    require(FLOW, "threatIntelligence", &input.threat_intelligence)?;
    require(FLOW, "teamCapacity", &input.team_capacity)?;

    let value = client.generate_json(&prompt(input), &[]).await?;
    decode(FLOW, value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenAiError;
    use serde_json::json;

    fn input() -> PrioritizeTasksInput {
        PrioritizeTasksInput {
            tasks: vec![
                TaskSummary {
                    id: "task-1".to_string(),
                    title: "Network Vulnerability Scan".to_string(),
                    description: "Scan the perimeter.".to_string(),
                    priority: Some("High".to_string()),
                },
                TaskSummary {
                    id: "task-2".to_string(),
                    title: "Update SIEM rules".to_string(),
                    description: "New IOCs.".to_string(),
                    priority: None,
                },
            ],
            threat_intelligence: "CVE-2024-XXXX under active exploitation.".to_string(),
            team_capacity: "Blue Team at 95% capacity.".to_string(),
        }
    }

    #[test]
    fn prompt_lists_every_task() {
        let p = prompt(&input());
        assert!(p.contains("- ID: task-1"));
        assert!(p.contains("- ID: task-2"));
        assert!(p.contains("Priority: unset"));
        assert!(p.contains("CVE-2024-XXXX"));
    }

    #[tokio::test]
    async fn empty_task_list_returns_empty_output_without_calling() {
        // Unroutable endpoint proves no request is made.
        let client = GenClient::new("http://127.0.0.1:1", "m", "k");
        let empty = PrioritizeTasksInput {
            tasks: Vec::new(),
            threat_intelligence: String::new(),
            team_capacity: String::new(),
        };
        let output = run(&client, &empty).await.unwrap();
        assert!(output.prioritized_tasks.is_empty());
    }

    #[tokio::test]
    async fn missing_threat_intel_is_rejected() {
        let client = GenClient::new("http://127.0.0.1:1", "m", "k");
        let mut bad = input();
        bad.threat_intelligence = String::new();
        assert!(matches!(
            run(&client, &bad).await.unwrap_err(),
            GenAiError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn decodes_valid_output() {
        let output = json!({
            "prioritizedTasks": [
                { "id": "task-1", "priority": "Critical", "reason": "Directly mitigates the active CVE." },
                { "id": "task-2", "priority": "Medium", "reason": "Blue Team has no spare capacity." }
            ]
        });

        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/models/gemini-test:generateContent")
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": output.to_string() }] },
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GenClient::new(server.url(), "gemini-test", "k");
        let result = run(&client, &input()).await.unwrap();
        assert_eq!(result.prioritized_tasks.len(), 2);
        assert_eq!(result.prioritized_tasks[0].priority, "Critical");
    }
}
