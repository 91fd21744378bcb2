// src/models.rs
// Request/response contracts for the decision endpoints plus the typed
// bands and decision payloads shared with the policy engine.
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_one_f64() -> f64 {
    1.0
}

fn default_severity() -> i64 {
    1
}

fn default_worker_age() -> i64 {
    30
}

fn default_cognitive_load() -> i64 {
    1
}

// ---------------------------------------------------------------------------
// Requests. One shape per use case; every optional field carries the
// default the bundles were trained against. Serialized back to a JSON map
// before feature extraction, so field names double as feature names.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasePriorityRequest {
    pub case_id: String,
    #[serde(default)]
    pub latest_message_id: Option<String>,
    #[serde(default)]
    pub days_open: i64,
    #[serde(default)]
    pub sla_breaches: i64,
    #[serde(default)]
    pub sentiment_compound: f64,
    #[serde(default)]
    pub injury_terms_count: i64,
    #[serde(default)]
    pub prior_escalations: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinEscalationRequest {
    pub case_id: String,
    pub checkin_id: String,
    #[serde(default)]
    pub pain_delta: f64,
    #[serde(default)]
    pub fatigue_delta: f64,
    #[serde(default)]
    pub sleep_decline_flag: bool,
    #[serde(default)]
    pub refused_duties_flag: bool,
    #[serde(default)]
    pub sentiment_compound: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRoutingRequest {
    pub case_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub incident_logged: bool,
    #[serde(default)]
    pub injury_register_logged: bool,
    #[serde(default)]
    pub witness_present: bool,
    #[serde(default)]
    pub injury_terms_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocCompletenessRequest {
    pub case_id: String,
    #[serde(default)]
    pub has_medical_cert: bool,
    #[serde(default)]
    pub has_incident_report: bool,
    #[serde(default)]
    pub has_imaging_referral: bool,
    #[serde(default)]
    pub cert_late_days: i64,
    #[serde(default = "default_severity")]
    pub injury_severity_scale: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailStrategyRequest {
    pub thread_id: String,
    pub draft_type: String,
    pub text: String,
    #[serde(default)]
    pub complaint_keywords_count: i64,
    #[serde(default)]
    pub prior_human_overrides: i64,
    #[serde(default)]
    pub sentiment_compound: f64,
    #[serde(default)]
    pub thread_depth: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintRiskRequest {
    pub thread_id: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub sentiment_compound: f64,
    #[serde(default)]
    pub anger_score: f64,
    #[serde(default)]
    pub accusatory_phrase_count: i64,
    #[serde(default)]
    pub question_density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudDocRequest {
    pub case_id: String,
    pub doc_id: String,
    pub ocr_text: String,
    #[serde(default)]
    pub ocr_text_mismatch_rate: f64,
    #[serde(default)]
    pub doc_hash_repeat: bool,
    #[serde(default)]
    pub font_anomaly_flag: bool,
    #[serde(default = "default_true")]
    pub provider_abn_match: bool,
    #[serde(default)]
    pub doctor_changes_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhishingRequest {
    pub thread_id: String,
    pub subject: String,
    pub body: String,
    pub sender: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default = "default_one_f64")]
    pub sender_domain_reputation: f64,
    #[serde(default)]
    pub url_count: i64,
    #[serde(default = "default_one_f64")]
    pub url_reputation_min: f64,
    #[serde(default)]
    pub caps_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryTimelineRequest {
    pub case_id: String,
    #[serde(default)]
    pub injury_type_back: bool,
    #[serde(default)]
    pub injury_type_shoulder: bool,
    #[serde(default)]
    pub injury_type_knee: bool,
    #[serde(default)]
    pub injury_type_psychological: bool,
    #[serde(default = "default_severity")]
    pub injury_severity_scale: i64,
    #[serde(default = "default_worker_age")]
    pub worker_age: i64,
    #[serde(default)]
    pub comorbidities_count: i64,
    #[serde(default)]
    pub treatment_sessions_total: i64,
    #[serde(default)]
    pub imaging_delay_days: i64,
    #[serde(default)]
    pub psychosocial_flags_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InherentRequirementsRequest {
    pub case_id: String,
    #[serde(default)]
    pub restrictions_lift_kg: i64,
    #[serde(default)]
    pub restrictions_stand_hours: f64,
    #[serde(default)]
    pub cognitive_restrict_flag: bool,
    #[serde(default)]
    pub role_lift_req_kg: i64,
    #[serde(default)]
    pub role_stand_req_hours: f64,
    #[serde(default = "default_cognitive_load")]
    pub role_cognitive_load: i64,
    #[serde(default)]
    pub rtw_attempts_count: i64,
    #[serde(default)]
    pub progress_weeks: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkRelatednessRequest {
    pub case_id: String,
    #[serde(default)]
    pub incident_logged: bool,
    #[serde(default)]
    pub injury_register_logged: bool,
    #[serde(default)]
    pub witness_present: bool,
    #[serde(default)]
    pub report_delay_days: i64,
    #[serde(default)]
    pub preexisting_same_bodypart: bool,
    #[serde(default)]
    pub gradual_onset_flag: bool,
    #[serde(default)]
    pub cctv_available: bool,
    #[serde(default)]
    pub cert_wording_nonoccupational: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObligationComplianceRequest {
    pub case_id: String,
    #[serde(default)]
    pub missed_appts_7d: i64,
    #[serde(default)]
    pub missed_appts_30d: i64,
    #[serde(default)]
    pub consecutive_missed_appts: i64,
    #[serde(default)]
    pub refused_duties_flag: bool,
    #[serde(default)]
    pub avg_response_latency_mins: f64,
    #[serde(default = "default_one_f64")]
    pub checkin_completion_rate: f64,
    #[serde(default)]
    pub communication_breakdown_flag: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimEscalationRequest {
    pub case_id: String,
    #[serde(default)]
    pub keyword_lawyer: i64,
    #[serde(default)]
    pub keyword_claim: i64,
    #[serde(default)]
    pub neg_sentiment_trend_7d: f64,
    #[serde(default)]
    pub diagnostic_delay_flag: bool,
    #[serde(default)]
    pub refused_duties_flag: bool,
    #[serde(default = "default_severity")]
    pub injury_severity_scale: i64,
    #[serde(default)]
    pub imaging_delay_days: i64,
    #[serde(default)]
    pub doctor_changes_count: i64,
    #[serde(default)]
    pub psychosocial_flags_count: i64,
    #[serde(default)]
    pub communication_breakdown_flag: bool,
}

// ---------------------------------------------------------------------------
// Bands and decisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityBand {
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "green")]
    Green,
}

impl PriorityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityBand::Red => "red",
            PriorityBand::Yellow => "yellow",
            PriorityBand::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckinDecision {
    Escalate,
    Monitor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncidentRoute {
    Incident,
    Prevention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocCompletenessDecision {
    Complete,
    #[serde(rename = "Missing Critical")]
    MissingCritical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmailDecision {
    Send,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskBand {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::HighRisk => "High Risk",
            RiskBand::MediumRisk => "Medium Risk",
            RiskBand::LowRisk => "Low Risk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FraudDecision {
    Fraudulent,
    Legitimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhishingDecision {
    #[serde(rename = "Phishing/Coached")]
    PhishingCoached,
    Legitimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InherentRequirementsDecision {
    #[serde(rename = "Non-Fit")]
    NonFit,
    #[serde(rename = "Fit/Progressing")]
    FitProgressing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkRelatednessBand {
    #[serde(rename = "Work-Related")]
    WorkRelated,
    Unclear,
    #[serde(rename = "Non-Work")]
    NonWork,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComplianceBand {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    Compliant,
}

impl ComplianceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceBand::HighRisk => "High Risk",
            ComplianceBand::MediumRisk => "Medium Risk",
            ComplianceBand::Compliant => "Compliant",
        }
    }
}

// ---------------------------------------------------------------------------
// Calibrated probability payloads, keyed the way each use case reports them
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CasePriorityProbabilities {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FraudProbabilities {
    pub fraudulent: f64,
    pub legitimate: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiskProbabilities {
    pub high_risk: f64,
    pub medium_risk: f64,
    pub low_risk: f64,
}

// ---------------------------------------------------------------------------
// Attribution and guardrail payloads
// ---------------------------------------------------------------------------

/// One ranked explainability entry. `value` is the feature's value in the
/// scored vector, `contribution` the signed attribution toward the
/// positive class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributionItem {
    pub feature: String,
    pub value: f64,
    pub contribution: f64,
}

/// A hard business rule fired. Replaces the model-driven decision outright.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GuardrailResult {
    pub forced_decision: &'static str,
    pub reason: String,
    pub recommendation: &'static str,
}

// ---------------------------------------------------------------------------
// Policy decision payloads (multi-field outcomes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CasePriorityDecision {
    pub band: PriorityBand,
    pub score: i64,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone)]
pub struct DocCompletenessOutcome {
    pub decision: DocCompletenessDecision,
    pub missing_documents: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone)]
pub struct EmailStrategyDecision {
    pub decision: EmailDecision,
    pub recommendation: &'static str,
    pub template_suggestion: &'static str,
    pub tone_recommendation: &'static str,
}

#[derive(Debug, Clone)]
pub struct RecoveryTimelineDecision {
    pub expected_weeks: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub delayed_recovery_risk: bool,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone)]
pub struct ComplianceDecision {
    pub band: ComplianceBand,
    pub entitlement_at_risk: bool,
    pub evidence_log: Vec<String>,
    pub recommendation: &'static str,
}

// ---------------------------------------------------------------------------
// Responses. A shared core plus one variant per use case; the enum is the
// full closed set of shapes a decision endpoint can produce.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ResponseCore {
    pub model_version: String,
    pub recommendation: String,
    pub top_attributions: Vec<AttributionItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CasePriorityResponse {
    #[serde(flatten)]
    pub core: ResponseCore,
    pub band: PriorityBand,
    pub score: i64,
    pub probabilities: CasePriorityProbabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct FraudDocResponse {
    #[serde(flatten)]
    pub core: ResponseCore,
    pub decision: FraudDecision,
    pub quarantine: bool,
    pub probabilities: FraudProbabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObligationComplianceResponse {
    #[serde(flatten)]
    pub core: ResponseCore,
    pub band: ComplianceBand,
    pub probabilities: RiskProbabilities,
    pub entitlement_at_risk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_log: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimEscalationResponse {
    #[serde(flatten)]
    pub core: ResponseCore,
    pub band: RiskBand,
    pub probabilities: RiskProbabilities,
}

/// A guardrail fired: the model never ran, so there are no attributions.
#[derive(Debug, Clone, Serialize)]
pub struct GuardrailResponse {
    pub model_version: String,
    pub decision: String,
    pub reason: String,
    pub recommendation: String,
    pub top_attributions: Vec<AttributionItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScoreResponse {
    Guardrail(GuardrailResponse),
    CasePriority(CasePriorityResponse),
    Fraud(FraudDocResponse),
    Compliance(ObligationComplianceResponse),
    ClaimEscalation(ClaimEscalationResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_fill_missing_fields() {
        let request: CasePriorityRequest =
            serde_json::from_str(r#"{"case_id": "C-1001"}"#).unwrap();
        assert_eq!(request.case_id, "C-1001");
        assert_eq!(request.days_open, 0);
        assert_eq!(request.sla_breaches, 0);
        assert_eq!(request.sentiment_compound, 0.0);
        assert!(request.latest_message_id.is_none());
    }

    #[test]
    fn test_fraud_request_abn_defaults_true() {
        let request: FraudDocRequest = serde_json::from_str(
            r#"{"case_id": "C-1", "doc_id": "D-1", "ocr_text": "certificate"}"#,
        )
        .unwrap();
        assert!(request.provider_abn_match);
        assert!(!request.doc_hash_repeat);
    }

    #[test]
    fn test_recovery_request_carries_trained_defaults() {
        let request: RecoveryTimelineRequest =
            serde_json::from_str(r#"{"case_id": "C-9", "injury_type_knee": true}"#).unwrap();
        assert!(request.injury_type_knee);
        assert_eq!(request.injury_severity_scale, 1);
        assert_eq!(request.worker_age, 30);
    }

    #[test]
    fn test_phishing_request_reputation_defaults() {
        let request: PhishingRequest = serde_json::from_str(
            r#"{"thread_id": "T-1", "subject": "hi", "body": "click here", "sender": "a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(request.sender_domain_reputation, 1.0);
        assert_eq!(request.url_reputation_min, 1.0);
        assert!(request.urls.is_empty());
    }

    #[test]
    fn test_band_serialization_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&PriorityBand::Red).unwrap(),
            "\"red\""
        );
        assert_eq!(
            serde_json::to_string(&ComplianceBand::HighRisk).unwrap(),
            "\"High Risk\""
        );
        assert_eq!(
            serde_json::to_string(&WorkRelatednessBand::NonWork).unwrap(),
            "\"Non-Work\""
        );
        assert_eq!(
            serde_json::to_string(&DocCompletenessDecision::MissingCritical).unwrap(),
            "\"Missing Critical\""
        );
    }

    #[test]
    fn test_response_core_flattens_into_variant() {
        let response = ClaimEscalationResponse {
            core: ResponseCore {
                model_version: "v1.0".to_string(),
                recommendation: "Monitor closely".to_string(),
                top_attributions: vec![],
            },
            band: RiskBand::MediumRisk,
            probabilities: RiskProbabilities {
                high_risk: 0.2,
                medium_risk: 0.32,
                low_risk: 0.48,
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["model_version"], "v1.0");
        assert_eq!(json["band"], "Medium Risk");
        assert_eq!(json["probabilities"]["low_risk"], 0.48);
    }
}
