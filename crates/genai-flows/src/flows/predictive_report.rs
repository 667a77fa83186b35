use crate::client::GenClient;
use crate::error::{GenAiError, Result};
use crate::flows::{decode, require};
use serde::{Deserialize, Serialize};

const FLOW: &str = "predictive-report";

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveReportInput {
    /// Key performance indicators to analyze.
    pub kpis: Vec<String>,
    /// e.g. "last week", "last quarter".
    pub timeframe: String,
    /// e.g. "threat detection", "vulnerability assessment".
    pub report_type: String,
    #[serde(default)]
    pub additional_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictiveReportOutput {
    pub report_title: String,
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub conclusion: String,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

pub fn prompt(input: &PredictiveReportInput) -> String {
    format!(
        r#"You are an AI-powered security analyst specializing in generating custom reports with predictive insights.

Based on the provided key performance indicators (KPIs), timeframe, report type, and additional context, generate a comprehensive report with the following sections:

1. Report Title: A concise and descriptive title for the report.
2. Executive Summary: A brief overview of the report's key findings and predictive insights.
3. Key Findings: A detailed analysis of the KPIs, including predictive insights and trends.
4. Recommendations: Actionable recommendations for improving performance based on the predictive insights.
5. Conclusion: A concluding statement summarizing the report and its implications.

KPIs: {kpis}
Timeframe: {timeframe}
Report Type: {report_type}
Additional Context: {context}

Respond with a single JSON object using the keys "reportTitle", "executiveSummary", "keyFindings", "recommendations", and "conclusion"; "keyFindings" and "recommendations" are arrays of strings."#,
        kpis = input.kpis.join(", "),
        timeframe = input.timeframe,
        report_type = input.report_type,
        context = input.additional_context.as_deref().unwrap_or("none"),
    )
}

pub async fn run(
    client: &GenClient,
    input: &PredictiveReportInput,
) -> Result<PredictiveReportOutput> {
    if input.kpis.iter().all(|k| k.trim().is_empty()) {
        return Err(GenAiError::InvalidInput {
            flow: FLOW,
            reason: "at least one KPI is required".to_string(),
        });
    }
    require(FLOW, "timeframe", &input.timeframe)?;
    require(FLOW, "reportType", &input.report_type)?;

    let value = client.generate_json(&prompt(input), &[]).await?;
    decode(FLOW, value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
