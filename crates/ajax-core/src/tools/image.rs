//! OpenAI image generation

use super::ImageGenerator;
use ajax_common::{AjaxError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const IMAGES_URL: &str = "https://api.openai.com/v1/images/generations";

pub struct OpenAiImageTool {
    api_key: String,
    size: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

impl OpenAiImageTool {
    pub fn new(api_key: impl Into<String>, size: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AjaxError::Config("OpenAI API key is required".to_string()));
        }
        Ok(Self {
            api_key,
            size: size.into(),
            client: reqwest::Client::new(),
        })
    }

    /// Build from `OPENAI_API_KEY`
    pub fn from_env(size: impl Into<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AjaxError::Config("OPENAI_API_KEY is not set".to_string()))?;
        Self::new(api_key, size)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageTool {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest {
            prompt,
            n: 1,
            size: &self.size,
        };

        let response = self
            .client
            .post(IMAGES_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AjaxError::Tool(format!("Image request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AjaxError::Tool(format!("OpenAI API error: {}", error_text)));
        }

        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| AjaxError::Tool(format!("Bad image response: {}", e)))?;
        let url = body
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| AjaxError::Tool("No image returned".to_string()))?;

        debug!("Generated image for prompt '{}'", prompt);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_key_is_rejected() {
        let result = OpenAiImageTool::new("  ", "1024x1024");
        assert!(matches!(result, Err(AjaxError::Config(_))));
    }

    #[test]
    fn test_request_shape() {
        let request = ImageRequest {
            prompt: "a red fox",
            n: 1,
            size: "1024x1024",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["prompt"], "a red fox");
        assert_eq!(value["n"], 1);
        assert_eq!(value["size"], "1024x1024");
    }

    #[test]
    fn test_response_parsing_takes_first_url() {
        let body: ImageResponse = serde_json::from_str(
            r#"{"created": 1, "data": [{"url": "https://img.example/1.png"}, {"url": "https://img.example/2.png"}]}"#,
        )
        .unwrap();
        let url = body.data.into_iter().find_map(|d| d.url);
        assert_eq!(url.as_deref(), Some("https://img.example/1.png"));
    }
}
