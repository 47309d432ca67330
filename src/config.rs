use crate::error::{NutriScanError, Result};
use nutri_scan_common::DEFAULT_LANGUAGE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// APIキーを読む環境変数（先頭が優先）
const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// 自由記述フィールドの出力言語
    pub language: String,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".into(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".into(),
            language: DEFAULT_LANGUAGE.into(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読み込みに失敗したらデフォルト（設定を書き直すコマンド用）
    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "設定ファイルを読めないためデフォルトを使用");
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| NutriScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("nutri-scan").join("config.json"))
    }

    pub fn get_api_key(&self) -> Result<String> {
        // 環境変数を優先
        let from_env = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty());

        Self::resolve_api_key(from_env, self.api_key.as_deref())
    }

    fn resolve_api_key(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
        from_env
            .or_else(|| from_file.filter(|k| !k.trim().is_empty()).map(str::to_string))
            .ok_or(NutriScanError::MissingApiKey)
    }

    /// generateContent エンドポイント（キーなし）
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert_eq!(config.timeout_seconds, 60);
    }

    #[test]
    fn test_endpoint() {
        let config = Config {
            api_base: "https://example.com/v1beta/".into(),
            model: "gemini-test".into(),
            ..Config::default()
        };
        assert_eq!(
            config.endpoint(),
            "https://example.com/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_resolve_api_key_env_first() {
        let key = Config::resolve_api_key(Some("env-key".into()), Some("file-key")).unwrap();
        assert_eq!(key, "env-key");

        let key = Config::resolve_api_key(None, Some("file-key")).unwrap();
        assert_eq!(key, "file-key");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let result = Config::resolve_api_key(None, Some("   "));
        assert!(matches!(result, Err(NutriScanError::MissingApiKey)));
        assert!(matches!(Config::resolve_api_key(None, None), Err(NutriScanError::MissingApiKey)));
    }
}
