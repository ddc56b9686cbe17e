//! Gemini `generateContent` client with Google Search grounding

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use crate::analysis::{
    prompt, ContextAnalyzer, GroundingSource, LocationAnalysis, ANALYSIS_FAILED,
    FALLBACK_DESCRIPTION,
};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebChunk {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, or the fallback description when empty
    pub fn description(&self) -> String {
        let text: String = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            FALLBACK_DESCRIPTION.to_string()
        } else {
            text
        }
    }

    /// Web citations of the first candidate that carry both a URI and a title
    pub fn sources(&self) -> Vec<GroundingSource> {
        self.candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|meta| {
                meta.grounding_chunks
                    .iter()
                    .filter_map(|chunk| {
                        let web = chunk.web.as_ref()?;
                        let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
                        let title = web.title.as_deref().filter(|t| !t.is_empty())?;
                        Some(GroundingSource {
                            uri: uri.to_string(),
                            title: title.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn into_analysis(self) -> LocationAnalysis {
        LocationAnalysis {
            description: self.description(),
            sources: self.sources(),
        }
    }
}

/// Talks to the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAnalyzer {
    /// Creates a client; fails when no API key is configured
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    async fn request(&self, latitude: f64, longitude: f64) -> Result<LocationAnalysis> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt(latitude, longitude) }] }],
            "tools": [{ "google_search": {} }],
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        debug!(%status, model = %self.model, "generateContent answered");
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(Error::Analysis(format!("HTTP {}: {}", status, detail)));
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        Ok(parsed.into_analysis())
    }
}

impl ContextAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, latitude: f64, longitude: f64) -> Result<LocationAnalysis> {
        self.request(latitude, longitude).await.map_err(|e| {
            error!(latitude, longitude, error = %e, "Gemini API error");
            Error::Analysis(ANALYSIS_FAILED.to_string())
        })
    }
}
