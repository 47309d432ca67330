//! Gemini API連携
//!
//! 画像（inline_data）と固定指示文を1リクエストで送り、
//! `responseSchema` 付きでJSONのみを返させる。

use super::NutritionAnalyzer;
use crate::capture::EncodedImage;
use crate::config::Config;
use crate::error::{AnalysisFailure, NutriScanError, Result};
use async_trait::async_trait;
use nutri_scan_common::{build_analysis_prompt, nutrition_schema, parse_nutrition_response, NutritionRecord};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// APIキーはURLに載せずヘッダで送る
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: serde_json::Value,
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// 画像・指示文・スキーマをまとめたリクエストを構築
pub fn build_request(image: &EncodedImage, prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
                Part::Text { text: prompt.to_string() },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: nutrition_schema(),
        },
    }
}

/// 同時に1件だけ解析を許可するためのガード
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    prompt: String,
    in_flight: AtomicBool,
}

impl GeminiClient {
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| NutriScanError::ApiCall(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            api_key,
            prompt: build_analysis_prompt(&config.language),
            in_flight: AtomicBool::new(false),
        })
    }

    /// 設定と環境変数からクライアントを生成
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Self::new(config, api_key)
    }

    /// 解析中かどうか
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// API呼び出し、先頭候補のテキストを返す
    async fn call_api(&self, request: &GeminiRequest) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| NutriScanError::ApiCall(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NutriScanError::ApiCall(format!("API error: {} {}", status, body)));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| NutriScanError::ApiParse(e.without_url().to_string()))?;

        payload
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| NutriScanError::ApiParse("Empty response".into()))
    }
}

#[async_trait]
impl NutritionAnalyzer for GeminiClient {
    async fn analyze(&self, image: &EncodedImage) -> std::result::Result<NutritionRecord, AnalysisFailure> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("解析中に2件目のリクエストを拒否");
            AnalysisFailure::new(NutriScanError::SessionBusy)
        })?;

        if image.data.is_empty() {
            return Err(AnalysisFailure::new(NutriScanError::EmptyImage));
        }

        let request = build_request(image, &self.prompt);
        info!(mime_type = %image.mime_type, size = image.data.len(), "Gemini APIへ送信");

        let text = self.call_api(&request).await.map_err(|e| {
            warn!(error = %e, "Gemini API呼び出し失敗");
            AnalysisFailure::new(e)
        })?;
        debug!(response_len = text.len(), "レスポンス受信");

        parse_nutrition_response(&text).map_err(|e| {
            warn!(error = %e, "レスポンスのパース失敗");
            AnalysisFailure::new(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> EncodedImage {
        EncodedImage {
            mime_type: "image/jpeg".to_string(),
            data: "/9j/4AAQ".to_string(),
        }
    }

    #[test]
    fn test_build_request_shape() {
        let request = build_request(&sample_image(), "analyze");
        let value = serde_json::to_value(&request).unwrap();

        let parts = &value["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[0]["inline_data"]["data"], "/9j/4AAQ");
        assert_eq!(parts[1]["text"], "analyze");

        let config = &value["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["type"], "OBJECT");
        assert_eq!(config["responseSchema"]["required"][0], "isFoodLabel");
    }

    #[test]
    fn test_in_flight_guard() {
        let flag = AtomicBool::new(false);
        let guard = InFlightGuard::acquire(&flag).unwrap();
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":1}"}]}}]}"#;
        let payload: GeminiResponse = serde_json::from_str(json).unwrap();
        let text = payload.candidates[0].content.as_ref().unwrap().parts[0].text.clone();
        assert_eq!(text.as_deref(), Some(r#"{"a":1}"#));

        let empty: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_analysis_failure() {
        let config = Config {
            api_base: "http://127.0.0.1:9".into(),
            timeout_seconds: 5,
            ..Config::default()
        };
        let client = GeminiClient::new(&config, "test-key".into()).unwrap();

        let failure = client.analyze(&sample_image()).await.unwrap_err();
        assert_eq!(failure.to_string(), crate::error::ANALYSIS_FAILURE_MESSAGE);
        assert!(matches!(failure.cause(), NutriScanError::ApiCall(_)));
        assert!(!client.is_busy());
    }
}
