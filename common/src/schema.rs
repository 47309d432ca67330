//! レスポンススキーマ定義
//!
//! Gemini の `generationConfig.responseSchema` に渡すスキーマと、
//! 受信JSONの形状チェック。

use crate::error::{Error, Result};
use serde_json::{json, Map, Value};

/// 必須フィールド
pub const REQUIRED_FIELDS: &[&str] = &["isFoodLabel", "productName", "calories", "healthSummary"];

/// スキーマの型名（Gemini OpenAPIサブセット）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Boolean,
    String,
    Number,
    StringArray,
}

/// (フィールド名, 型) の一覧。NutritionRecord と同じ並び
pub const FIELDS: &[(&str, FieldType)] = &[
    ("isFoodLabel", FieldType::Boolean),
    ("productName", FieldType::String),
    ("calories", FieldType::Number),
    ("protein", FieldType::Number),
    ("carbs", FieldType::Number),
    ("fat", FieldType::Number),
    ("ingredients", FieldType::StringArray),
    ("healthSummary", FieldType::String),
    ("pros", FieldType::StringArray),
    ("cons", FieldType::StringArray),
];

impl FieldType {
    fn to_schema(self) -> Value {
        match self {
            FieldType::Boolean => json!({ "type": "BOOLEAN" }),
            FieldType::String => json!({ "type": "STRING" }),
            FieldType::Number => json!({ "type": "NUMBER" }),
            FieldType::StringArray => json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }),
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::Boolean => value.is_boolean(),
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::StringArray => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
        }
    }
}

/// responseSchema を生成
pub fn nutrition_schema() -> Value {
    let properties: Map<String, Value> = FIELDS
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.to_schema()))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": REQUIRED_FIELDS,
    })
}

/// 受信JSONがスキーマに沿っているか検証
///
/// - オブジェクトでなければエラー
/// - 必須フィールド欠落はエラー
/// - 存在するフィールドの型不一致はエラー（任意フィールドの `null` は欠落扱い）
/// - 未知のフィールドは無視
pub fn validate(value: &Value) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::Schema("レスポンスがJSONオブジェクトではありません".into()))?;

    for field in REQUIRED_FIELDS {
        match object.get(*field) {
            None | Some(Value::Null) => {
                return Err(Error::Schema(format!("必須フィールドがありません: {}", field)));
            }
            Some(_) => {}
        }
    }

    for (name, ty) in FIELDS {
        match object.get(*name) {
            None | Some(Value::Null) => continue,
            Some(v) if ty.matches(v) => continue,
            Some(v) => {
                return Err(Error::Schema(format!(
                    "フィールドの型が不正: {} ({:?} 期待, 実際 {})",
                    name, ty, v
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = nutrition_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"]["isFoodLabel"]["type"], "BOOLEAN");
        assert_eq!(schema["properties"]["calories"]["type"], "NUMBER");
        assert_eq!(schema["properties"]["pros"]["type"], "ARRAY");
        assert_eq!(schema["properties"]["pros"]["items"]["type"], "STRING");
        assert_eq!(schema["properties"].as_object().unwrap().len(), 10);
        assert_eq!(
            schema["required"],
            json!(["isFoodLabel", "productName", "calories", "healthSummary"])
        );
    }

    #[test]
    fn test_validate_minimal() {
        let value = json!({
            "isFoodLabel": false,
            "productName": "一张椅子",
            "calories": 0,
            "healthSummary": ""
        });
        assert!(validate(&value).is_ok());
    }

    #[test]
    fn test_validate_missing_required() {
        let value = json!({
            "isFoodLabel": true,
            "productName": "饼干",
            "healthSummary": "一般"
        });
        let err = validate(&value).unwrap_err();
        assert!(matches!(err, Error::Schema(ref msg) if msg.contains("calories")));
    }

    #[test]
    fn test_validate_wrong_type() {
        let value = json!({
            "isFoodLabel": "yes",
            "productName": "饼干",
            "calories": 100,
            "healthSummary": "一般"
        });
        assert!(validate(&value).is_err());

        let value = json!({
            "isFoodLabel": true,
            "productName": "饼干",
            "calories": 100,
            "healthSummary": "一般",
            "ingredients": ["面粉", 3]
        });
        assert!(validate(&value).is_err());
    }

    #[test]
    fn test_validate_not_object() {
        assert!(validate(&json!([1, 2, 3])).is_err());
        assert!(validate(&json!("text")).is_err());
    }

    #[test]
    fn test_validate_ignores_unknown_and_null_optional() {
        let value = json!({
            "isFoodLabel": true,
            "productName": "饼干",
            "calories": 100,
            "healthSummary": "一般",
            "protein": null,
            "servingSize": "30g"
        });
        assert!(validate(&value).is_ok());
    }
}
