use serde_json::{Value, json};
use tracing::debug;

/// Client for the external text-recognition API (Google Cloud Vision,
/// `images:annotate`). The core treats its output as an opaque string.
#[derive(Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(thiserror::Error, Debug)]
pub enum OcrError {
    #[error("ocr request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ocr service returned status {0}")]
    Status(u16),
}

impl OcrClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Runs TEXT_DETECTION over the image and returns the recognized text,
    /// `None` when the service detected nothing. There is no timeout and no
    /// retry on this call.
    pub async fn recognize_text(&self, image_base64: &str) -> Result<Option<String>, OcrError> {
        let body = json!({
            "requests": [{
                "image": { "content": image_base64 },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(OcrError::Status(resp.status().as_u16()));
        }
        let payload: Value = resp.json().await?;
        let text = payload["responses"][0]["textAnnotations"][0]["description"]
            .as_str()
            .map(|s| s.to_string());
        debug!(detected = text.is_some(), "ocr response parsed");
        Ok(text)
    }
}

/// Case-insensitive substring match of the medicine name within the
/// recognized prescription text.
pub fn medicine_matches(recognized: &str, medicine_name: &str) -> bool {
    recognized
        .to_lowercase()
        .contains(&medicine_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_is_case_insensitive() {
        let text = "Dr. Smith\nRx: AMOXICILLIN 500mg\ntwice daily";
        assert!(medicine_matches(text, "amoxicillin"));
        assert!(medicine_matches(text, "Amoxicillin 500mg"));
        assert!(!medicine_matches(text, "ibuprofen"));
    }

    #[test]
    fn empty_text_never_matches() {
        assert!(!medicine_matches("", "amoxicillin"));
    }
}
