use thiserror::Error;

/// 解析失敗時にユーザーへ表示する固定メッセージ
pub const ANALYSIS_FAILURE_MESSAGE: &str = "发生了一些错误，请检查网络连接并重试。";

#[derive(Error, Debug)]
pub enum NutriScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 GEMINI_API_KEY か `nutri-scan config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像データが空です")]
    EmptyImage,

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] nutri_scan_common::Error),

    #[error("解析中のため新しい撮影は受け付けられません")]
    SessionBusy,

    #[error("現在の状態では撮影できません: {0}")]
    CaptureRejected(String),
}

pub type Result<T> = std::result::Result<T, NutriScanError>;

/// 画像送信から有効なレスポンス受信までの失敗
///
/// 原因（通信・JSON不正・スキーマ違反）はログ用に保持し、
/// 表示メッセージは常に [`ANALYSIS_FAILURE_MESSAGE`]。
#[derive(Error, Debug)]
#[error("{}", ANALYSIS_FAILURE_MESSAGE)]
pub struct AnalysisFailure {
    #[source]
    cause: NutriScanError,
}

impl AnalysisFailure {
    pub fn new(cause: impl Into<NutriScanError>) -> Self {
        Self { cause: cause.into() }
    }

    /// ユーザー向けメッセージ
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILURE_MESSAGE
    }

    /// ログ用の元エラー
    pub fn cause(&self) -> &NutriScanError {
        &self.cause
    }
}

impl From<NutriScanError> for AnalysisFailure {
    fn from(cause: NutriScanError) -> Self {
        Self::new(cause)
    }
}

impl From<nutri_scan_common::Error> for AnalysisFailure {
    fn from(cause: nutri_scan_common::Error) -> Self {
        Self::new(cause)
    }
}
