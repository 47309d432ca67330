//! 画像取得モジュール
//!
//! ファイル（カメラ/ファイル選択の代替）またはData URLから1枚の静止画を取得し、
//! 送信用のBase64文字列に変換する。内容の検証はしない（食品ラベルかどうかはモデル側で判定）。

use crate::error::{NutriScanError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::ImageFormat;
use std::path::Path;
use tracing::debug;

/// MIMEタイプが判定できない場合の既定値
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// 送信用にエンコードされた画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    /// Base64（Data URLプレフィックスなし）
    pub data: String,
}

impl EncodedImage {
    /// 生バイト列からエンコード
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(NutriScanError::EmptyImage);
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Data URL（"data:image/png;base64,iVBOR..."）または素のBase64文字列から生成
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let data_url = data_url.trim();
        let (mime_type, data) = match data_url.split_once(',') {
            Some((header, data)) if header.starts_with("data:") => {
                (extract_mime_type_from_header(header), data)
            }
            _ => (DEFAULT_MIME_TYPE, data_url),
        };

        if data.is_empty() {
            return Err(NutriScanError::EmptyImage);
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }
}

/// "data:image/jpeg;base64" からMIMEタイプを抽出
fn extract_mime_type_from_header(header: &str) -> &str {
    header
        .strip_prefix("data:")
        .and_then(|s| s.split(';').next())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// 先頭バイト、拡張子の順でMIMEタイプを推定
pub fn detect_mime_type(bytes: &[u8], path: Option<&Path>) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }

    path.and_then(|p| ImageFormat::from_path(p).ok())
        .map(|format| format.to_mime_type())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// 画像ファイルを読み込んで送信用に変換
///
/// 何度でも呼び出し可能。ファイルへの書き込みは行わない。
pub fn capture_image(path: &Path) -> Result<EncodedImage> {
    if !path.is_file() {
        return Err(NutriScanError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| NutriScanError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let mime_type = detect_mime_type(&bytes, Some(path));
    debug!(path = %path.display(), mime_type, size = bytes.len(), "画像を取得");

    EncodedImage::from_bytes(&bytes, mime_type)
}
