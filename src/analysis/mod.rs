//! AI generated context for a location

pub mod gemini;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use gemini::GeminiAnalyzer;

/// Used when the service answers without any text
pub const FALLBACK_DESCRIPTION: &str = "Nu s-a putut analiza contextul locației.";

/// Error message surfaced for any analysis failure
pub const ANALYSIS_FAILED: &str = "Failed to analyze location with AI.";

/// A web page the service cited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// Short description of a place plus its citations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAnalysis {
    pub description: String,
    pub sources: Vec<GroundingSource>,
}

/// Produces a natural-language description of the surroundings of a point
pub trait ContextAnalyzer {
    fn analyze(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<LocationAnalysis>> + Send;
}

/// Prompt sent for a coordinate; answers are requested in Romanian
pub fn prompt(latitude: f64, longitude: f64) -> String {
    format!(
        "Mă aflu la Latitudine: {}, Longitudine: {}.\n\n\
         Te rog să faci următoarele folosind Google Search:\n\
         1. Identifică adresa aproximativă sau numele locului (ex: parc, clădire, cartier) pentru aceste coordonate.\n\
         2. Oferă un scurt rezumat de 2-3 propoziții despre ce este acest loc sau ce se află în apropiere.\n\
         3. Dacă există fapte interesante sau locuri bine cotate în apropiere, menționează unul.\n\n\
         Răspunde DOAR în limba română. Păstrează un ton util și concis.",
        latitude, longitude
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_coordinates() {
        let text = prompt(44.4268, 26.1025);
        assert!(text.starts_with("Mă aflu la Latitudine: 44.4268, Longitudine: 26.1025."));
        assert!(text.contains("Google Search"));
        assert!(text.ends_with("Păstrează un ton util și concis."));
    }

    #[test]
    fn test_analysis_serialization() {
        let analysis = LocationAnalysis {
            description: "Centrul Vechi".to_string(),
            sources: vec![GroundingSource {
                uri: "https://example.ro".to_string(),
                title: "Example".to_string(),
            }],
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["sources"][0]["uri"], "https://example.ro");
        assert_eq!(json["description"], "Centrul Vechi");
    }
}
