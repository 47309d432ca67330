//! 画像取得テスト

use base64::{engine::general_purpose::STANDARD, Engine as _};
use nutri_scan::capture::{capture_image, DEFAULT_MIME_TYPE};
use nutri_scan::NutriScanError;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイル
#[test]
fn test_capture_missing_file() {
    let result = capture_image(Path::new("/nonexistent/label-12345.jpg"));
    assert!(matches!(result, Err(NutriScanError::FileNotFound(_))));
}

/// 空ファイルは送信しない
#[test]
fn test_capture_empty_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("empty.jpg");
    std::fs::write(&path, b"").unwrap();

    assert!(matches!(capture_image(&path), Err(NutriScanError::EmptyImage)));
}

/// PNGの先頭バイトからMIMEタイプを判定し、Base64化する
#[test]
fn test_capture_png_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    // 拡張子は .jpg だが中身はPNG
    let path = dir.path().join("label.jpg");
    let bytes = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];
    std::fs::write(&path, bytes).unwrap();

    let image = capture_image(&path).unwrap();
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(STANDARD.decode(&image.data).unwrap(), bytes);
    assert!(!image.data.starts_with("data:"));
}

/// 判定できない中身は拡張子、それもなければ既定値
#[test]
fn test_capture_unknown_content() {
    let dir = tempdir().expect("Failed to create temp dir");

    let webp_named = dir.path().join("photo.webp");
    std::fs::write(&webp_named, b"not really an image").unwrap();
    assert_eq!(capture_image(&webp_named).unwrap().mime_type, "image/webp");

    let no_ext = dir.path().join("photo");
    std::fs::write(&no_ext, b"not really an image").unwrap();
    assert_eq!(capture_image(&no_ext).unwrap().mime_type, DEFAULT_MIME_TYPE);
}

/// 同じファイルを何度でも取得でき、ファイルは変更されない
#[test]
fn test_capture_is_repeatable() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("label.jpg");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]).unwrap();

    let first = capture_image(&path).unwrap();
    let second = capture_image(&path).unwrap();
    assert_eq!(first, second);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
