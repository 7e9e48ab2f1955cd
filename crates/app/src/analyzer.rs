use betslip_core::{AiModel, AnalysisResult, LlmProvider};
use betslip_db::now_rfc3339;
use serde_json::Value;

use crate::error::AnalyzerError;

/// Everything an analyzer backend gets to see for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub user_id: &'a str,
    pub model: &'a AiModel,
    pub provider: Option<&'a LlmProvider>,
    pub input: &'a Value,
}

/// Produces betting insight for a betslip. Implementations must be cheap to
/// share across request threads.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult, AnalyzerError>;
}

pub const STUB_ANALYSIS: &str = "This is a simulated analysis result. In a real implementation, this would contain the actual AI-generated insights.";

pub const STUB_CONFIDENCE: f64 = 0.85;

pub const STUB_RECOMMENDATIONS: [&str; 3] = [
    "Based on historical data, this bet has a 65% success rate",
    "Consider the weather conditions for outdoor sports",
    "Player injury reports suggest caution on this selection",
];

/// Placeholder backend used until a provider integration is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAnalyzer;

impl Analyzer for StubAnalyzer {
    fn analyze(&self, request: &AnalysisRequest<'_>) -> Result<AnalysisResult, AnalyzerError> {
        Ok(AnalysisResult {
            model_name: request.model.name.clone(),
            analysis: STUB_ANALYSIS.to_string(),
            confidence: STUB_CONFIDENCE,
            recommendations: STUB_RECOMMENDATIONS
                .iter()
                .map(|item| item.to_string())
                .collect(),
            processed_at: now_rfc3339(),
        })
    }
}
