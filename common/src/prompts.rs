//! プロンプト生成モジュール
//!
//! - DEFAULT_LANGUAGE: 自由記述フィールドの既定出力言語
//! - build_analysis_prompt: 食品ラベル解析用の固定指示文

/// 既定の出力言語
pub const DEFAULT_LANGUAGE: &str = "Simplified Chinese (简体中文)";

/// 出力言語を指定すべき自由記述フィールド
pub const FREE_TEXT_FIELDS: &[&str] = &[
    "productName",
    "ingredients",
    "healthSummary",
    "pros",
    "cons",
];

/// 食品ラベル解析プロンプト生成
///
/// # Arguments
/// * `language` - 自由記述フィールドの出力言語（例: "Simplified Chinese (简体中文)"）
///
/// # Returns
/// 画像と一緒に送信する指示文
pub fn build_analysis_prompt(language: &str) -> String {
    let text_fields = FREE_TEXT_FIELDS.join(", ");

    format!(
        r#"Analyze this image. If it is a food packaging label or ingredient list, extract the nutritional information.
If it is NOT a food label, set 'isFoodLabel' to false and provide a generic product name describing what you see.

IMPORTANT: Return all text fields ({text_fields}) in {language}.

Return the data in JSON format with the following fields:
- isFoodLabel: boolean
- productName: string (guess the product name from the package, in {language})
- calories: number (per serving, if available, estimate if not)
- protein: number (grams)
- carbs: number (grams)
- fat: number (grams)
- ingredients: array of strings (list main ingredients)
- healthSummary: string (1-2 sentences summarizing if this is healthy)
- pros: array of strings (short positive points, e.g. "高蛋白")
- cons: array of strings (short negative points, e.g. "高糖")"#
    )
}
