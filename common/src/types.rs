//! 解析結果の型定義
//!
//! CLIとテストで共有される型:
//! - NutritionRecord: 栄養解析の結果（1回の解析ごとに生成）
//! - MacroShare: 三大栄養素の構成比

use serde::{Deserialize, Serialize};

/// 栄養解析結果
///
/// 必須フィールド（`isFoodLabel`, `productName`, `calories`, `healthSummary`）が
/// 欠けたJSONはデシリアライズに失敗する。任意フィールドは0/空で補完。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    pub is_food_label: bool,

    /// 食品ラベルでない場合は写っている物の一般的な説明
    pub product_name: String,

    pub calories: f64,            // 千卡

    #[serde(default)]
    pub protein: f64,             // 克

    #[serde(default)]
    pub carbs: f64,               // 克

    #[serde(default)]
    pub fat: f64,                 // 克

    #[serde(default)]
    pub ingredients: Vec<String>,

    pub health_summary: String,

    #[serde(default)]
    pub pros: Vec<String>,

    #[serde(default)]
    pub cons: Vec<String>,
}

/// 三大栄養素の1項目
#[derive(Debug, Clone, PartialEq)]
pub struct MacroShare {
    pub label: &'static str,
    pub grams: f64,
    /// 三大栄養素合計に対する割合（0.0-1.0）
    pub ratio: f64,
}

impl NutritionRecord {
    /// 蛋白质・脂肪・碳水の順で、0の項目を除いた構成比
    pub fn macro_breakdown(&self) -> Vec<MacroShare> {
        let items = [
            ("蛋白质", self.protein),
            ("脂肪", self.fat),
            ("碳水", self.carbs),
        ];

        let total: f64 = items.iter().map(|(_, g)| g.max(0.0)).sum();

        items
            .iter()
            .filter(|(_, grams)| *grams > 0.0)
            .map(|&(label, grams)| MacroShare {
                label,
                grams,
                ratio: if total > 0.0 { grams / total } else { 0.0 },
            })
            .collect()
    }
}
