use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "nutri-scan")]
#[command(about = "知食 - 食品ラベルを撮影してAIで栄養成分を解析", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 食品ラベル画像を解析して結果を表示
    Scan {
        /// 画像ファイルのパス（--data-url 指定時はData URL文字列）
        #[arg(required = true)]
        image: String,

        /// 引数をData URL（またはBase64文字列）として扱う
        #[arg(long)]
        data_url: bool,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデル名を設定
        #[arg(long)]
        set_model: Option<String>,

        /// 出力言語を設定
        #[arg(long)]
        set_language: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 送信する指示文とレスポンススキーマを表示
    Schema,

    /// ホーム画面への追加手順を表示
    Install {
        /// User-Agent（端末種別の判定に使用）
        #[arg(long)]
        user_agent: Option<String>,
    },
}
