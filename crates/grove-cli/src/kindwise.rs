//! Kindwise plant.id adapter for the identification interface.
//!
//! Sends the photo to the Kindwise identification and health-assessment
//! endpoints and maps the responses into [`PlantAnalysis`]. Transport and
//! payload errors surface as `GroveError::Identification`; nothing is
//! retried here.

use base64::Engine as _;
use grove_core::{
    identify::{DISEASED_SCORE, HEALTHY_SCORE},
    Disease, GroveError, HealthStatus, PlantAnalysis, PlantIdentifier, SpeciesSuggestion,
};
use log::debug;
use serde_json::{json, Value};

const IDENTIFY_URL: &str = "https://api.plant.id/v3/identification?details=common_names";
const HEALTH_URL: &str = "https://api.plant.id/v3/health_assessment?details=description,treatment";

/// HTTP client for the Kindwise plant.id API.
pub struct KindwiseClient {
    api_key: String,
    agent: ureq::Agent,
}

impl KindwiseClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    fn post(&self, url: &str, payload: &Value) -> grove_core::Result<Value> {
        let mut response = self
            .agent
            .post(url)
            .header("Api-Key", &self.api_key)
            .send_json(payload)
            .map_err(|e| GroveError::Identification(format!("request to {url} failed: {e}")))?;
        response
            .body_mut()
            .read_json()
            .map_err(|e| GroveError::Identification(format!("bad response from {url}: {e}")))
    }
}

fn suggestions_from(value: &Value) -> Vec<SpeciesSuggestion> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| SpeciesSuggestion {
            name: item["name"].as_str().unwrap_or("Unknown").to_string(),
            probability: item["probability"].as_f64().unwrap_or(0.0),
            common_names: item["details"]["common_names"]
                .as_array()
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

fn diseases_from(value: &Value) -> Vec<Disease> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| Disease {
            name: item["name"].as_str().unwrap_or("Unknown").to_string(),
            probability: item["probability"].as_f64().unwrap_or(0.0),
            description: item["details"]["description"].as_str().map(String::from),
            treatment: item["details"]["treatment"]
                .as_str()
                .map(String::from)
                .or_else(|| {
                    // Treatment may come back as a structured object.
                    item["details"]["treatment"]
                        .is_object()
                        .then(|| item["details"]["treatment"].to_string())
                }),
        })
        .collect()
}

impl PlantIdentifier for KindwiseClient {
    fn analyze(&self, image: &[u8]) -> grove_core::Result<PlantAnalysis> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let payload = json!({ "images": [encoded] });

        let identification = self.post(IDENTIFY_URL, &payload)?;
        let is_plant = identification["result"]["is_plant"]["binary"]
            .as_bool()
            .unwrap_or(false);
        if !is_plant {
            return Err(GroveError::Identification(
                "Image does not appear to be a plant".to_string(),
            ));
        }
        let suggestions = suggestions_from(&identification["result"]["classification"]["suggestions"]);
        debug!("identification returned {} suggestions", suggestions.len());

        let health = self.post(HEALTH_URL, &payload)?;
        let is_healthy = health["result"]["is_healthy"]["binary"]
            .as_bool()
            .unwrap_or(true);
        let diseases = diseases_from(&health["result"]["disease"]["suggestions"]);

        let mut analysis = PlantAnalysis {
            suggestions,
            health_status: if is_healthy {
                HealthStatus::Healthy
            } else {
                HealthStatus::Diseased
            },
            health_score: if is_healthy {
                HEALTHY_SCORE
            } else {
                DISEASED_SCORE
            },
            diseases,
        };
        analysis.truncate_diseases();
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_parse_names_and_probabilities() {
        let value = json!([
            {
                "name": "Ocimum basilicum",
                "probability": 0.97,
                "details": { "common_names": ["Basil", "Sweet basil"] }
            },
            { "name": "Ocimum tenuiflorum", "probability": 0.02 }
        ]);
        let suggestions = suggestions_from(&value);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].name, "Ocimum basilicum");
        assert_eq!(suggestions[0].common_names, vec!["Basil", "Sweet basil"]);
        assert!(suggestions[1].common_names.is_empty());
    }

    #[test]
    fn diseases_parse_optional_details() {
        let value = json!([
            {
                "name": "powdery mildew",
                "probability": 0.8,
                "details": { "description": "White powdery spots" }
            }
        ]);
        let diseases = diseases_from(&value);
        assert_eq!(diseases.len(), 1);
        assert_eq!(
            diseases[0].description.as_deref(),
            Some("White powdery spots")
        );
        assert!(diseases[0].treatment.is_none());
    }

    #[test]
    fn malformed_payloads_yield_empty_lists() {
        assert!(suggestions_from(&json!(null)).is_empty());
        assert!(diseases_from(&json!("oops")).is_empty());
    }
}
