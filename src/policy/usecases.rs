// src/policy/usecases.rs
// One pure decision function per use case. Each is total over well-formed
// probabilities and free of side effects; thresholds live in config so
// they can be tuned without touching the rules. Conditions are checked
// highest-risk first.
use crate::config::*;
use crate::models::{
    CasePriorityDecision, CasePriorityProbabilities, CheckinDecision, ComplianceBand,
    ComplianceDecision, DocCompletenessDecision, DocCompletenessOutcome, EmailDecision,
    EmailStrategyDecision, FraudDecision, IncidentRoute, InherentRequirementsDecision,
    PhishingDecision, PriorityBand, RecoveryTimelineDecision, RiskBand, RiskProbabilities,
    WorkRelatednessBand,
};

fn band_score(probability: f64) -> i64 {
    (probability * 100.0).round() as i64
}

/// UC-1: Case Priority - red/yellow/green with a 0-100 score taken from
/// the matched band's probability.
pub fn uc1_policy(probs: &CasePriorityProbabilities) -> CasePriorityDecision {
    if probs.high >= UC1_HIGH_THRESHOLD {
        CasePriorityDecision {
            band: PriorityBand::Red,
            score: band_score(probs.high),
            recommendation: "Review today; high priority case",
        }
    } else if probs.medium >= UC1_MEDIUM_THRESHOLD {
        CasePriorityDecision {
            band: PriorityBand::Yellow,
            score: band_score(probs.medium),
            recommendation: "Review this week; medium priority",
        }
    } else {
        CasePriorityDecision {
            band: PriorityBand::Green,
            score: band_score(probs.low),
            recommendation: "Routine monitoring; low priority",
        }
    }
}

/// UC-2: Check-in Escalation - Escalate/Monitor.
pub fn uc2_policy(escalate_probability: f64) -> (CheckinDecision, &'static str) {
    if escalate_probability >= UC2_ESCALATE_THRESHOLD {
        (
            CheckinDecision::Escalate,
            "Immediate case manager intervention required",
        )
    } else {
        (CheckinDecision::Monitor, "Continue routine monitoring")
    }
}

/// UC-3: Incident Routing - Incident/Prevention.
pub fn uc3_policy(incident_probability: f64) -> (IncidentRoute, &'static str) {
    if incident_probability >= UC3_INCIDENT_THRESHOLD {
        (
            IncidentRoute::Incident,
            "Route to injury management workflow",
        )
    } else {
        (
            IncidentRoute::Prevention,
            "Route to pre-employment/prevention workflow",
        )
    }
}

/// UC-4: Document Completeness. Rule-only: derived from presence flags,
/// independent of any model probability. An imaging referral is required
/// only at injury severity 3 and above.
pub fn uc4_policy(
    has_medical_cert: bool,
    has_incident_report: bool,
    has_imaging_referral: bool,
    injury_severity_scale: i64,
) -> DocCompletenessOutcome {
    let mut missing = Vec::new();

    if !has_medical_cert {
        missing.push("Medical certificate".to_string());
    }
    if !has_incident_report {
        missing.push("Incident report".to_string());
    }
    if !has_imaging_referral && injury_severity_scale >= 3 {
        missing.push("Imaging referral".to_string());
    }

    if missing.is_empty() {
        DocCompletenessOutcome {
            decision: DocCompletenessDecision::Complete,
            missing_documents: missing,
            recommendation: "All critical documents present".to_string(),
        }
    } else {
        let recommendation = format!("Request: {}", missing.join(", "));
        DocCompletenessOutcome {
            decision: DocCompletenessDecision::MissingCritical,
            missing_documents: missing,
            recommendation,
        }
    }
}

/// UC-5: Email Auto-Send - Send/Hold with template and tone suggestions.
pub fn uc5_policy(safe_probability: f64, confidence: f64) -> EmailStrategyDecision {
    if safe_probability >= UC5_SEND_THRESHOLD && confidence >= UC5_CONFIDENCE_THRESHOLD {
        EmailStrategyDecision {
            decision: EmailDecision::Send,
            recommendation: "Safe to auto-send",
            template_suggestion: "Standard",
            tone_recommendation: "Professional",
        }
    } else {
        EmailStrategyDecision {
            decision: EmailDecision::Hold,
            recommendation: "Hold for review; potential complaint risk",
            template_suggestion: "Safer Alternative",
            tone_recommendation: "Empathetic",
        }
    }
}

/// UC-6: Complaint Risk - high/medium/low.
pub fn uc6_policy(probs: &RiskProbabilities) -> (RiskBand, &'static str) {
    if probs.high_risk >= UC6_HIGH_RISK_THRESHOLD {
        (
            RiskBand::HighRisk,
            "Rewrite with empathetic tone; avoid accusatory language",
        )
    } else if probs.medium_risk >= UC6_MEDIUM_RISK_THRESHOLD {
        (
            RiskBand::MediumRisk,
            "Review tone and phrasing before sending",
        )
    } else {
        (RiskBand::LowRisk, "Proceed with standard communication")
    }
}

/// UC-7: Fraud Detection. A single threshold on the fraudulent-class
/// probability gates the quarantine flag.
pub fn uc7_policy(fraudulent_probability: f64) -> (bool, FraudDecision, &'static str) {
    if fraudulent_probability >= UC7_QUARANTINE_THRESHOLD {
        (
            true,
            FraudDecision::Fraudulent,
            "Quarantine document; request verified re-upload",
        )
    } else {
        (
            false,
            FraudDecision::Legitimate,
            "Document appears legitimate",
        )
    }
}

/// UC-8: Phishing Detection - Quarantine/Allow.
pub fn uc8_policy(phishing_probability: f64) -> (bool, PhishingDecision, &'static str) {
    if phishing_probability >= UC8_QUARANTINE_THRESHOLD {
        (
            true,
            PhishingDecision::PhishingCoached,
            "Quarantine and route to security review",
        )
    } else {
        (
            false,
            PhishingDecision::Legitimate,
            "Email appears legitimate",
        )
    }
}

/// Typical recovery duration in weeks per injury type; unknown types use
/// the middle-of-the-road default.
fn recovery_benchmark_weeks(injury_type: &str) -> f64 {
    match injury_type {
        "back" => 8.0,
        "shoulder" => 10.0,
        "knee" => 12.0,
        "psychological" => 16.0,
        _ => 10.0,
    }
}

/// UC-9: Recovery Timeline. A regression output, not a classification:
/// the predicted weeks carry a fixed +/-20% interval, and recovery is
/// flagged delayed when the prediction exceeds 1.3x the injury-type
/// benchmark.
pub fn uc9_policy(predicted_weeks: f64, injury_type: &str) -> RecoveryTimelineDecision {
    let benchmark = recovery_benchmark_weeks(injury_type);
    let delayed = predicted_weeks > benchmark * UC9_DELAY_FACTOR;

    let recommendation = if delayed {
        "Expedite imaging/specialist referral; review treatment plan"
    } else {
        "On track with typical recovery timeline"
    };

    RecoveryTimelineDecision {
        expected_weeks: predicted_weeks,
        ci_lower: predicted_weeks * UC9_CI_LOWER_FACTOR,
        ci_upper: predicted_weeks * UC9_CI_UPPER_FACTOR,
        delayed_recovery_risk: delayed,
        recommendation,
    }
}

/// UC-10: Inherent Requirements Non-Fit.
pub fn uc10_policy(nonfit_probability: f64) -> (InherentRequirementsDecision, &'static str) {
    if nonfit_probability >= UC10_NONFIT_THRESHOLD {
        (
            InherentRequirementsDecision::NonFit,
            "Recommend redeployment or vocational pathway",
        )
    } else {
        (
            InherentRequirementsDecision::FitProgressing,
            "Worker can meet role requirements with current restrictions",
        )
    }
}

/// UC-11: Work-Relatedness. Three-way band; the unclear range is
/// inclusive on both ends, below it the claim reads as non-occupational.
pub fn uc11_policy(work_related_probability: f64) -> (WorkRelatednessBand, &'static str) {
    if work_related_probability >= UC11_WORK_THRESHOLD {
        (
            WorkRelatednessBand::WorkRelated,
            "Proceed with workers' compensation pathway",
        )
    } else if (UC11_UNCLEAR_LOW..=UC11_UNCLEAR_HIGH).contains(&work_related_probability) {
        (
            WorkRelatednessBand::Unclear,
            "Request GP notes + witness statement for clarification",
        )
    } else {
        (
            WorkRelatednessBand::NonWork,
            "Likely non-occupational injury",
        )
    }
}

/// Heuristic for whether a case sits under the WorkCover claim scheme:
/// identifier prefix or repeated missed appointments within the week.
pub fn is_workcover_case(case_id: &str, missed_appts_7d: i64) -> bool {
    case_id.starts_with("WC") || missed_appts_7d > 2
}

/// UC-12: Obligation Compliance. High risk flags the entitlement and
/// opens an evidence checklist; the recommendation branches on the claim
/// scheme.
pub fn uc12_policy(probs: &RiskProbabilities, is_workcover: bool) -> ComplianceDecision {
    if probs.high_risk >= UC12_HIGH_RISK_THRESHOLD {
        let recommendation = if is_workcover {
            "Flag entitlement at risk; prepare evidence for insurer"
        } else {
            "Generate reasonable directives checklist"
        };
        ComplianceDecision {
            band: ComplianceBand::HighRisk,
            entitlement_at_risk: true,
            evidence_log: vec![
                "Compile missed appointment log".to_string(),
                "Document refused suitable duties".to_string(),
                "Record communication delays".to_string(),
            ],
            recommendation,
        }
    } else if probs.medium_risk >= UC12_MEDIUM_RISK_THRESHOLD {
        ComplianceDecision {
            band: ComplianceBand::MediumRisk,
            entitlement_at_risk: false,
            evidence_log: Vec::new(),
            recommendation: "Increase monitoring; document all interactions",
        }
    } else {
        ComplianceDecision {
            band: ComplianceBand::Compliant,
            entitlement_at_risk: false,
            evidence_log: Vec::new(),
            recommendation: "Worker is meeting obligations",
        }
    }
}

/// UC-13: Claim Escalation Risk - high/medium/low.
pub fn uc13_policy(probs: &RiskProbabilities) -> (RiskBand, &'static str) {
    if probs.high_risk >= UC13_HIGH_RISK_THRESHOLD {
        (
            RiskBand::HighRisk,
            "Likely to become WorkCover claim - early intervention critical",
        )
    } else if probs.medium_risk >= UC13_MEDIUM_RISK_THRESHOLD {
        (
            RiskBand::MediumRisk,
            "Monitor closely; supportive communication recommended",
        )
    } else {
        (RiskBand::LowRisk, "Unlikely to escalate to formal claim")
    }
}
