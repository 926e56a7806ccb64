// Investment and risk analysis tools.
// Both are placeholders: they only check that usable document text exists.

use super::{ToolKind, ToolOutput};

pub fn analyze_investment_data(document: &ToolOutput) -> ToolOutput {
    match document.usable_text() {
        Some(_) => ToolOutput::Text("Investment analysis pipeline not yet implemented.".to_string()),
        None => ToolOutput::failed(
            ToolKind::AnalyzeInvestmentData,
            "No valid document text to analyze.",
        ),
    }
}

pub fn assess_risk(document: &ToolOutput) -> ToolOutput {
    match document.usable_text() {
        Some(_) => ToolOutput::Text("Risk assessment pipeline not yet implemented.".to_string()),
        None => ToolOutput::failed(
            ToolKind::CreateRiskAssessment,
            "No valid document text to analyze.",
        ),
    }
}
