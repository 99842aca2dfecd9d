//! AI insight client
//!
//! Calls the Gemini generateContent API to turn a month of team data into a
//! short natural-language summary. The model is an opaque collaborator: we
//! build a prompt, send it, and surface whatever text comes back. Any
//! failure (missing key, timeout, non-2xx, malformed body) degrades to a
//! fixed fallback string so the dashboard never breaks over an AI hiccup.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, warn};

use crate::report::aggregate::KpiMetric;
use crate::types::PulseError;

/// Returned when the upstream call fails for any reason
pub const FALLBACK_INSIGHT: &str = "Failed to generate insight. Please try again later.";

/// Returned when no API key is configured
pub const MISSING_KEY_INSIGHT: &str = "Configuration Error: GEMINI_API_KEY is missing.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Flattened per-member snapshot for one month, used to build the prompt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kpi: Option<KpiMetric>,
    /// Number of projects reported for the month
    pub active_project_count: usize,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the Gemini generateContent endpoint
#[derive(Clone)]
pub struct InsightClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl InsightClient {
    pub fn new(
        api_key: Option<String>,
        model: String,
        timeout_ms: u64,
    ) -> Result<Self, PulseError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| PulseError::Insight(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Override the upstream base URL (used by tests)
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a summary for one month of team data
    ///
    /// Never returns an error: every failure path yields a fallback string,
    /// and the caller maps fallback to an error status if it wants to.
    pub async fn generate_summary(&self, month_key: &str, members: &[MemberSummary]) -> String {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                warn!("Insight requested but GEMINI_API_KEY is not configured");
                return MISSING_KEY_INSIGHT.to_string();
            }
        };

        let prompt = build_prompt(month_key, members);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("Insight request failed: {}", e);
                return FALLBACK_INSIGHT.to_string();
            }
        };

        if !response.status().is_success() {
            error!("Insight upstream returned status {}", response.status());
            return FALLBACK_INSIGHT.to_string();
        }

        let body: GenerateResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to parse insight response: {}", e);
                return FALLBACK_INSIGHT.to_string();
            }
        };

        match extract_text(&body) {
            Some(text) => text,
            None => {
                error!("Insight response contained no candidate text");
                FALLBACK_INSIGHT.to_string()
            }
        }
    }
}

/// Build the analyst prompt from the month's member summaries
fn build_prompt(month_key: &str, members: &[MemberSummary]) -> String {
    let data = serde_json::to_string(members).unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an expert Business Intelligence Analyst for a company called Keditech. \
         Analyze the following team performance data for {month_key}. \
         Provide a concise executive summary (max 3 sentences) highlighting the team's \
         overall health, standout performers, and any projects at risk. \
         Data: {data}"
    )
}

fn extract_text(body: &GenerateResponse) -> Option<String> {
    body.candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summaries() -> Vec<MemberSummary> {
        vec![
            MemberSummary {
                name: "Kevin".to_string(),
                role: "CEO".to_string(),
                kpi: Some(KpiMetric {
                    label: "Revenue".to_string(),
                    value: 92.0,
                    previous_value: 85.0,
                }),
                active_project_count: 1,
            },
            MemberSummary {
                name: "Dion".to_string(),
                role: "CMO".to_string(),
                kpi: None,
                active_project_count: 0,
            },
        ]
    }

    #[test]
    fn test_prompt_contains_month_and_data() {
        let prompt = build_prompt("2026-02", &summaries());
        assert!(prompt.contains("Business Intelligence Analyst"));
        assert!(prompt.contains("Keditech"));
        assert!(prompt.contains("2026-02"));
        assert!(prompt.contains("Kevin"));
        assert!(prompt.contains("Revenue"));
        assert!(prompt.contains("max 3 sentences"));
    }

    #[test]
    fn test_summary_serializes_project_count() {
        let json = serde_json::to_value(&summaries()[0]).unwrap();
        assert_eq!(json["activeProjectCount"], 1);
        assert_eq!(json["kpi"]["value"], 92.0);
    }

    #[test]
    fn test_extract_text_happy_path() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  Team is healthy.  " }] }
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&body), Some("Team is healthy.".to_string()));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(extract_text(&body), None);
    }

    #[test]
    fn test_extract_text_blank_text() {
        let body: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        }))
        .unwrap();
        assert_eq!(extract_text(&body), None);
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = InsightClient::new(None, "gemini-1.5-pro".to_string(), 1000).unwrap();
        let result = client.generate_summary("2026-02", &summaries()).await;
        assert_eq!(result, MISSING_KEY_INSIGHT);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_falls_back() {
        let client = InsightClient::new(
            Some("test-key".to_string()),
            "gemini-1.5-pro".to_string(),
            500,
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:1/models".to_string());
        let result = client.generate_summary("2026-02", &summaries()).await;
        assert_eq!(result, FALLBACK_INSIGHT);
    }
}
