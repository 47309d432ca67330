pub mod analyzer;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod render;
pub mod session;

pub use analyzer::{GeminiClient, NutritionAnalyzer};
pub use capture::{capture_image, EncodedImage};
pub use error::{AnalysisFailure, NutriScanError, Result, ANALYSIS_FAILURE_MESSAGE};
pub use install::{DeviceKind, InstallAdvisory, InstallOutcome, InstallPrompt};
pub use session::{AppPhase, ScanSession, View};
