//! nutri-scan Common Library
//!
//! CLI・テストで共有される型、プロンプト、レスポンススキーマ、パーサー

pub mod types;
pub mod error;
pub mod prompts;
pub mod schema;
pub mod parser;

pub use types::{MacroShare, NutritionRecord};
pub use error::{Error, Result};
pub use prompts::{build_analysis_prompt, DEFAULT_LANGUAGE};
pub use schema::{nutrition_schema, REQUIRED_FIELDS};
pub use parser::{extract_json, parse_nutrition_response};
