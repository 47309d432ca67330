//! 画面状態マシン
//!
//! Idle → Analyzing → Result / Error → Idle を繰り返す。終端状態はない。
//! 撮影ごとにリクエストトークンを発行し、現在のトークンと一致しない
//! 解析結果（リセット後に遅れて届いたもの）は破棄する。

use crate::analyzer::NutritionAnalyzer;
use crate::capture::EncodedImage;
use crate::error::{AnalysisFailure, NutriScanError, Result};
use nutri_scan_common::NutritionRecord;
use std::fmt;
use tracing::{debug, info, warn};

/// アプリケーションの状態（常にいずれか1つ）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppPhase {
    #[default]
    Idle,
    Analyzing,
    Result(NutritionRecord),
    Error(String),
}

impl AppPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppPhase::Idle => "idle",
            AppPhase::Analyzing => "analyzing",
            AppPhase::Result(_) => "result",
            AppPhase::Error(_) => "error",
        }
    }
}

impl fmt::Display for AppPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解析リクエストの識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// 表示する画面
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    /// 撮影ボタンのあるホーム
    Home,
    /// 解析中インジケータ
    Loading,
    /// 栄養成分の表示
    Nutrition(&'a NutritionRecord),
    /// 食品ラベルとして認識できなかった
    NotRecognized { product_name: &'a str },
    Failure(&'a str),
}

#[derive(Debug, Default)]
pub struct ScanSession {
    phase: AppPhase,
    next_token: u64,
    in_flight: Option<RequestToken>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &AppPhase {
        &self.phase
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, AppPhase::Analyzing)
    }

    /// 撮影ボタンを有効にしてよいか
    pub fn can_capture(&self) -> bool {
        matches!(self.phase, AppPhase::Idle)
    }

    /// 撮影完了: Idle → Analyzing
    ///
    /// Idle 以外では状態を変えずにエラーを返す。
    pub fn begin_capture(&mut self) -> Result<RequestToken> {
        match &self.phase {
            AppPhase::Idle => {}
            AppPhase::Analyzing => return Err(NutriScanError::SessionBusy),
            other => return Err(NutriScanError::CaptureRejected(other.to_string())),
        }

        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.in_flight = Some(token);
        self.phase = AppPhase::Analyzing;
        debug!(token = token.0, "Idle → Analyzing");
        Ok(token)
    }

    /// 解析結果を反映: Analyzing → Result / Error
    ///
    /// トークンが現在の解析と一致しない場合は何もせず `false` を返す。
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: std::result::Result<NutritionRecord, AnalysisFailure>,
    ) -> bool {
        if self.in_flight != Some(token) {
            warn!(token = token.0, "古い解析結果を破棄");
            return false;
        }
        self.in_flight = None;

        self.phase = match outcome {
            Ok(record) => {
                info!(is_food_label = record.is_food_label, product = %record.product_name, "解析完了");
                AppPhase::Result(record)
            }
            Err(failure) => {
                warn!(cause = %failure.cause(), "解析失敗");
                AppPhase::Error(failure.user_message().to_string())
            }
        };
        true
    }

    /// Idle に戻す。保持していた結果・メッセージ・解析中トークンはすべて破棄
    pub fn reset(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("解析中にリセット");
        }
        self.phase = AppPhase::Idle;
    }

    /// 「再扫一个」: Result → Idle
    pub fn scan_again(&mut self) {
        self.reset();
    }

    /// 「重试」: Error → Idle
    pub fn retry(&mut self) {
        self.reset();
    }

    /// 撮影から結果反映までを一括実行
    pub async fn submit(
        &mut self,
        analyzer: &dyn NutritionAnalyzer,
        image: &EncodedImage,
    ) -> Result<&AppPhase> {
        let token = self.begin_capture()?;
        let outcome = analyzer.analyze(image).await;
        self.complete(token, outcome);
        Ok(&self.phase)
    }

    pub fn view(&self) -> View<'_> {
        match &self.phase {
            AppPhase::Idle => View::Home,
            AppPhase::Analyzing => View::Loading,
            AppPhase::Result(record) if record.is_food_label => View::Nutrition(record),
            AppPhase::Result(record) => View::NotRecognized {
                product_name: &record.product_name,
            },
            AppPhase::Error(message) => View::Failure(message),
        }
    }
}
