use clap::Parser;
use nutri_scan::{cli, config, error, install, render};
use nutri_scan::{capture, GeminiClient, ScanSession};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use nutri_scan::{AppPhase, View};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scan { image, data_url, json } => {
            let encoded = if data_url {
                capture::EncodedImage::from_data_url(&image)?
            } else {
                capture::capture_image(Path::new(&image))?
            };

            let config = Config::load()?;
            let client = GeminiClient::from_config(&config)?;
            let mut session = ScanSession::new();

            if !json {
                print!("{}", render::render_view(View::Loading));
            }

            session.submit(&client, &encoded).await?;

            match (json, session.phase()) {
                (true, AppPhase::Result(record)) => {
                    println!("{}", serde_json::to_string_pretty(record)?);
                }
                (true, AppPhase::Error(message)) => {
                    eprintln!("{}", message);
                }
                _ => {
                    println!();
                    print!("{}", render::render_view(session.view()));
                }
            }

            if matches!(session.phase(), AppPhase::Error(_)) {
                std::process::exit(1);
            }
        }

        Commands::Config { set_api_key, set_model, set_language, show } => {
            let config_path = Config::config_path()?;
            let mut config = Config::load_or_default_from(&config_path);
            let mut changed = false;

            if let Some(key) = set_api_key {
                config.api_key = Some(key);
                changed = true;
                println!("✔ APIキーを設定しました");
            }

            if let Some(model) = set_model {
                println!("✔ モデルを設定しました: {}", model);
                config.model = model;
                changed = true;
            }

            if let Some(language) = set_language {
                println!("✔ 出力言語を設定しました: {}", language);
                config.language = language;
                changed = true;
            }

            if changed {
                config.save_to(&config_path)?;
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  エンドポイント: {}", config.endpoint());
                println!("  出力言語: {}", config.language);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Schema => {
            let config = Config::load()?;
            println!("# 指示文\n{}\n", nutri_scan_common::build_analysis_prompt(&config.language));
            println!(
                "# responseSchema\n{}",
                serde_json::to_string_pretty(&nutri_scan_common::nutrition_schema())?
            );
        }

        Commands::Install { user_agent } => {
            let kind = user_agent
                .as_deref()
                .map(install::DeviceKind::from_user_agent)
                .unwrap_or_default();

            // 端末ではプラットフォームのプロンプトは届かないため常に手動手順
            let mut advisory = install::InstallAdvisory::new(kind);
            if let install::InstallAction::ShowInstructions(lines) = advisory.request_install().await {
                println!("安装“知食”");
                for line in lines {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
