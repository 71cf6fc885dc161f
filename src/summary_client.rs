// src/summary_client.rs
//
// Optional prose polishing of scene summaries.
//
// The raw summary ("vehicle.bus is ahead and to the right. ...") can be
// handed to any `Summarizer`. `LlmSummarizer` posts it to an LLM HTTP
// endpoint. `quick_summary` never fails: with no summarizer, or when the
// summarizer errors, it falls back to the raw summary cut to a display
// length.

use crate::scene::Scene;
use crate::types::SummaryConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

pub trait Summarizer {
    fn summarize(&self, text: &str) -> Result<String>;
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SummaryRequest {
    pub model: String,
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    pub output_text: String,
}

pub struct LlmSummarizer {
    server_url: String,
    model: String,
    api_key: Option<String>,
    http_client: reqwest::blocking::Client,
}

impl LlmSummarizer {
    pub fn new(config: &SummaryConfig, api_key: Option<String>) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            server_url: config.server_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            http_client,
        })
    }

    fn build_request(&self, text: &str) -> SummaryRequest {
        SummaryRequest {
            model: self.model.clone(),
            input: format!(
                "Summarize this in one short sentence for an autonomous driving report: {}",
                text
            ),
        }
    }
}

impl Summarizer for LlmSummarizer {
    fn summarize(&self, text: &str) -> Result<String> {
        let url = format!("{}/v1/responses", self.server_url);
        info!("Sending summary request: {} chars to {}", text.len(), url);

        let mut request = self.http_client.post(&url).json(&self.build_request(text));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().context("Failed to reach summary server")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            anyhow::bail!("Summary server error {}: {}", status, body);
        }

        let parsed: SummaryResponse = resp.json().context("Failed to parse summary response")?;
        Ok(parsed.output_text)
    }
}

// ============================================================================
// DISPLAY SUMMARY
// ============================================================================

/// Cuts `text` to at most `max_chars` characters, marking the cut with "...".
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn quick_summary(
    scene: &Scene,
    summarizer: Option<&dyn Summarizer>,
    max_chars: usize,
) -> String {
    let raw = scene.summarize();
    let Some(summarizer) = summarizer else {
        return truncate_for_display(&raw, max_chars);
    };

    match summarizer.summarize(&raw) {
        Ok(polished) => polished,
        Err(e) => {
            warn!("Summarizer failed, using raw summary: {:#}", e);
            truncate_for_display(&raw, max_chars)
        }
    }
}
