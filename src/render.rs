//! 画面のテキスト描画
//!
//! モバイル版の各画面（ホーム・解析中・結果・認識不可・エラー）を端末向けの文字列にする。

use crate::session::View;
use nutri_scan_common::NutritionRecord;

/// 配料の表示上限
pub const MAX_INGREDIENTS: usize = 8;

pub fn render_view(view: View<'_>) -> String {
    match view {
        View::Home => render_home(),
        View::Loading => "正在分析...\n识别成分与营养信息中\n".to_string(),
        View::Nutrition(record) => render_nutrition(record),
        View::NotRecognized { product_name } => render_not_recognized(product_name),
        View::Failure(message) => format!("抱歉\n{}\n[重试]\n", message),
    }
}

fn render_home() -> String {
    "知食\n读懂你的食物\n一键扫描食品标签，快速获取热量、成分与健康建议。\n".to_string()
}

fn render_not_recognized(product_name: &str) -> String {
    format!(
        "无法识别？\n未能检测到营养成分表。图片看起来像是 {}。\n请尝试更清晰地拍摄配料表或营养成分表。\n[重试]\n",
        product_name
    )
}

fn render_nutrition(record: &NutritionRecord) -> String {
    let mut lines = vec![
        record.product_name.clone(),
        "✔ 分析完成".to_string(),
        String::new(),
        format!("能量: {} 千卡", record.calories),
    ];

    let shares = record.macro_breakdown();
    if !shares.is_empty() {
        let parts: Vec<String> = shares
            .iter()
            .map(|s| format!("{} {:.0}%", s.label, s.ratio * 100.0))
            .collect();
        lines.push(format!("营养占比: {}", parts.join(" / ")));
    }

    lines.push(format!(
        "蛋白质 {} 克 | 碳水 {} 克 | 脂肪 {} 克",
        record.protein, record.carbs, record.fat
    ));

    lines.push(String::new());
    lines.push("AI 健康简评".to_string());
    lines.push(record.health_summary.clone());
    lines.extend(record.pros.iter().map(|pro| format!("👍 {}", pro)));
    lines.extend(record.cons.iter().map(|con| format!("⚠️ {}", con)));

    lines.push(String::new());
    lines.push("主要配料".to_string());
    lines.extend(
        record
            .ingredients
            .iter()
            .take(MAX_INGREDIENTS)
            .map(|ingredient| format!("・{}", ingredient)),
    );
    if record.ingredients.len() > MAX_INGREDIENTS {
        lines.push(format!(
            "+ 还有 {} 种配料...",
            record.ingredients.len() - MAX_INGREDIENTS
        ));
    }

    lines.push(String::new());
    lines.push("[再扫一个]".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
