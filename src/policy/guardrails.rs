// src/policy/guardrails.rs
use crate::config::LEGAL_THREAT_KEYWORDS;
use crate::models::GuardrailResult;

pub const FORCED_DECISION: &str = "Hold/Manual";

/// Hard business rules checked before any model runs. A hit replaces the
/// entire model-driven decision for the request; it is a valid terminal
/// outcome, not an error. First matching phrase wins.
pub fn check_guardrails(text: Option<&str>, case_id: Option<&str>) -> Option<GuardrailResult> {
    if let Some(text) = text {
        let lowered = text.to_lowercase();
        for keyword in LEGAL_THREAT_KEYWORDS {
            if lowered.contains(keyword) {
                return Some(GuardrailResult {
                    forced_decision: FORCED_DECISION,
                    reason: format!("guardrail:legal_threat:{}", keyword),
                    recommendation: "Legal threat detected - requires immediate manual review",
                });
            }
        }
    }

    if let Some(case_id) = case_id {
        if case_id.trim().is_empty() {
            return Some(GuardrailResult {
                forced_decision: FORCED_DECISION,
                reason: "guardrail:missing_case_id".to_string(),
                recommendation: "Missing case ID - cannot process",
            });
        }
    }

    None
}
