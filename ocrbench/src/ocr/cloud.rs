use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::CloudVisionConfig;
use crate::error::OcrError;
use crate::models::{ConfidenceScale, Recognition};

use super::engine::OcrEngine;
use super::input::ImageInput;

pub const CLOUD_VISION_ENGINE: &str = "GoogleCloudVision";

const DEFAULT_BASE_URL: &str = "https://vision.googleapis.com/v1";

#[derive(Clone, Debug)]
enum Credential {
    ApiKey(String),
    Bearer(String),
}

/// Cloud document text detection over the Vision `images:annotate` endpoint.
#[derive(Clone, Debug)]
pub struct CloudVisionEngine {
    client: Client,
    credential: Credential,
    base_url: String,
    language_hints: Vec<String>,
    timeout_secs: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageRequest {
    image: RequestImage,
    features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_context: Option<ImageContext>,
}

#[derive(Debug, Serialize)]
struct RequestImage {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageContext {
    language_hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(default)]
    paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    #[serde(default)]
    words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct Word {
    confidence: Option<f64>,
}

impl TextAnnotation {
    fn word_confidences(&self) -> Vec<f64> {
        self.pages
            .iter()
            .flat_map(|p| &p.blocks)
            .flat_map(|b| &b.paragraphs)
            .flat_map(|p| &p.words)
            .filter_map(|w| w.confidence)
            .collect()
    }
}

impl CloudVisionEngine {
    pub fn new(config: &CloudVisionConfig) -> Result<Self, OcrError> {
        let credential = match (&config.api_key, &config.access_token) {
            (Some(key), _) => Credential::ApiKey(key.clone()),
            (None, Some(token)) => Credential::Bearer(token.clone()),
            (None, None) => {
                return Err(OcrError::EngineUnavailable(
                    "no Vision credentials configured (set VISION_API_KEY or VISION_ACCESS_TOKEN)"
                        .to_string(),
                ))
            }
        };

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&base_url).map_err(|e| {
            OcrError::EngineUnavailable(format!("invalid Vision base URL {base_url}: {e}"))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                OcrError::EngineUnavailable(format!("Failed to create HTTP client: {e}"))
            })?;

        info!(base_url = %base_url, "Cloud Vision engine initialized");

        Ok(Self {
            client,
            credential,
            base_url,
            language_hints: config.language_hints.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn build_request(&self, image: &ImageInput) -> AnnotateRequest {
        let image_context = (!self.language_hints.is_empty()).then(|| ImageContext {
            language_hints: self.language_hints.clone(),
        });

        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: RequestImage {
                    content: STANDARD.encode(image.bytes()),
                },
                features: vec![Feature {
                    kind: "DOCUMENT_TEXT_DETECTION",
                }],
                image_context,
            }],
        }
    }

    async fn annotate(&self, request: &AnnotateRequest) -> Result<AnnotateResponse, OcrError> {
        let builder = self
            .client
            .post(format!("{}/images:annotate", self.base_url))
            .json(request);
        let builder = match &self.credential {
            Credential::ApiKey(key) => builder.query(&[("key", key)]),
            Credential::Bearer(token) => builder.bearer_auth(token),
        };

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                OcrError::Timeout(self.timeout_secs)
            } else {
                OcrError::EngineUnavailable(format!("Vision request failed: {e}"))
            }
        })?;

        let status = resp.status();
        if status.is_success() {
            return resp.json().await.map_err(|e| {
                OcrError::DecodeFailure(format!("Failed to parse Vision response: {e}"))
            });
        }

        let body = resp.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                OcrError::EngineUnavailable(format!("Vision rejected credentials: {status}"))
            }
            _ => OcrError::Engine(format!("Vision request failed: {status} - {body}")),
        })
    }
}

#[async_trait]
impl OcrEngine for CloudVisionEngine {
    fn name(&self) -> &str {
        CLOUD_VISION_ENGINE
    }

    async fn recognize(&self, image: &ImageInput) -> Result<Recognition, OcrError> {
        let request = self.build_request(image);
        let response = self.annotate(&request).await?;

        let first = response.responses.into_iter().next().unwrap_or_default();
        if let Some(status) = first.error {
            return Err(OcrError::Engine(format!(
                "Vision error {}: {}",
                status.code, status.message
            )));
        }

        let Some(annotation) = first.full_text_annotation else {
            debug!("Vision returned no text annotation");
            return Ok(Recognition::empty());
        };

        let scores = annotation.word_confidences();
        Ok(Recognition::from_scores(
            annotation.text.trim(),
            &scores,
            ConfidenceScale::Unit,
        ))
    }
}
