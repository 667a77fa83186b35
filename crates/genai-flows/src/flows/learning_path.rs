use crate::client::GenClient;
use crate::error::Result;
use crate::flows::{decode, require};
use serde::{Deserialize, Serialize};

const FLOW: &str = "learning-path";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathInput {
    /// e.g. "Security Analyst", "Penetration Tester".
    pub role: String,
    /// e.g. "Beginner", "Intermediate", "Advanced".
    pub skill_level: String,
    /// e.g. "Become a Security Architect".
    pub career_goals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    pub step_title: String,
    pub step_description: String,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPathOutput {
    pub learning_path: String,
    pub roadmap: Vec<RoadmapStep>,
    pub content_recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

pub fn prompt(input: &LearningPathInput) -> String {
    format!(
        r#"You are an AI expert in cybersecurity training and development. Your task is to create a comprehensive, personalized learning plan for a cybersecurity professional.

The user will provide their current role, skill level, and career aspirations. Based on this, you will generate:
1. A high-level summary of the learning path.
2. A detailed, step-by-step roadmap with clear modules. Each step in the roadmap should have a title, a description of the topics covered, and a list of specific, recommended courses or certifications.
3. A list of supplementary learning resources like articles, videos, or hands-on labs.

User details:
Role: {role}
Skill Level: {skill}
Career Goals: {goals}

Please provide the output in a valid JSON format that adheres to the following structure:
- "learningPath": A string summarizing the overall strategy.
- "roadmap": An array of objects. Each object must have:
    - "stepTitle": A string for the module title.
    - "stepDescription": A string describing the module's content.
    - "courses": An array of strings with specific course or certification names.
- "contentRecommendations": A JSON array of strings for supplementary content."#,
        role = input.role,
        skill = input.skill_level,
        goals = input.career_goals,
    )
}

pub async fn run(client: &GenClient, input: &LearningPathInput) -> Result<LearningPathOutput> {
    require(FLOW, "role", &input.role)?;
    require(FLOW, "skillLevel", &input.skill_level)?;
    require(FLOW, "careerGoals", &input.career_goals)?;

    let value = client.generate_json(&prompt(input), &[]).await?;
    decode(FLOW, value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
