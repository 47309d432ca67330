//! APIレスポンスパーサー
//!
//! モデルの返答テキストからJSONオブジェクトを抽出し、
//! スキーマ検証を通したうえで NutritionRecord に変換する

use crate::error::{Error, Result};
use crate::schema;
use crate::types::NutritionRecord;
use serde_json::Value;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use nutri_scan_common::extract_json;
///
/// let response = "result: {\"isFoodLabel\": true}";
/// let json = extract_json(response).unwrap();
/// assert_eq!(json, "{\"isFoodLabel\": true}");
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    if let Some(start) = response.find('{') {
        if let Some(end) = response.rfind('}') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 栄養解析レスポンスをパース
///
/// # Arguments
/// * `response` - モデルの返答テキスト
///
/// # Returns
/// * `Ok(NutritionRecord)` - パース・検証成功
/// * `Err` - JSONなし、JSON不正、スキーマ違反
pub fn parse_nutrition_response(response: &str) -> Result<NutritionRecord> {
    let json_str = extract_json(response)?;
    let mut value: Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("JSONパースエラー: {}", e)))?;

    schema::validate(&value)?;

    // 任意フィールドの null は欠落と同じ扱い
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }

    let record: NutritionRecord = serde_json::from_value(value)
        .map_err(|e| Error::Schema(format!("NutritionRecord変換エラー: {}", e)))?;
    Ok(record)
}
