//! 栄養解析クライアント
//!
//! 画像 → NutritionRecord の契約を `NutritionAnalyzer` トレイトで表す。
//! 実装は Gemini API（`gemini`）。テストではモックを差し込む。

mod gemini;

pub use gemini::{build_request, GeminiClient, GeminiRequest};

use crate::capture::EncodedImage;
use crate::error::AnalysisFailure;
use async_trait::async_trait;
use nutri_scan_common::NutritionRecord;

#[async_trait]
pub trait NutritionAnalyzer: Send + Sync {
    /// 画像を解析。失敗理由はすべて AnalysisFailure に集約される
    async fn analyze(&self, image: &EncodedImage) -> Result<NutritionRecord, AnalysisFailure>;
}
