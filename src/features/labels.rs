// src/features/labels.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Human-readable labels for the v3 schema features, used when assembling
/// ranked attribution lists. Unlabeled features fall back to the raw name.
static FEATURE_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("days_open", "Days case open"),
        ("sla_breaches", "SLA breaches"),
        ("sentiment_compound", "Overall sentiment"),
        ("anger_score", "Anger level"),
        ("fear_score", "Fear level"),
        ("text_length", "Message length"),
        ("keyword_doctor", "Doctor mentions"),
        ("keyword_claim", "Claim mentions"),
        ("keyword_lawyer", "Lawyer mentions"),
        ("injury_terms_count", "Injury terms"),
        ("prior_escalations", "Prior escalations"),
        ("checkin_completion_rate", "Check-in completion"),
        ("missed_appts_7d", "Missed appointments (7d)"),
        ("missed_appts_30d", "Missed appointments (30d)"),
        ("refused_duties_flag", "Refused suitable duties"),
        ("cert_late_days", "Certificate delay (days)"),
        ("incident_logged", "Incident logged"),
        ("witness_present", "Witness present"),
        ("report_delay_days", "Report delay (days)"),
        ("injury_severity_scale", "Injury severity"),
        ("comorbidities_count", "Comorbidities"),
        ("treatment_sessions_total", "Treatment sessions"),
        ("imaging_delay_days", "Imaging delay (days)"),
        ("doctor_changes_count", "Doctor changes"),
        ("ocr_text_mismatch_rate", "OCR mismatch rate"),
        ("doc_hash_repeat", "Duplicate document"),
        ("font_anomaly_flag", "Font anomaly"),
        ("provider_abn_match", "Provider ABN match"),
        ("sender_domain_reputation", "Sender reputation"),
        ("url_count", "URL count"),
        ("url_reputation_min", "URL reputation"),
        ("preexisting_same_bodypart", "Prior same injury"),
        ("gradual_onset_flag", "Gradual onset"),
        ("neg_sentiment_trend_7d", "Negative trend (7d)"),
        ("diagnostic_delay_flag", "Diagnostic delay"),
        ("pain_delta", "Pain change"),
        ("fatigue_delta", "Fatigue change"),
        ("sleep_decline_flag", "Sleep declining"),
        ("has_medical_cert", "Medical certificate"),
        ("has_incident_report", "Incident report"),
        ("has_imaging_referral", "Imaging referral"),
        ("complaint_keywords_count", "Complaint keywords"),
        ("prior_human_overrides", "Prior overrides"),
        ("thread_depth", "Email thread depth"),
        ("accusatory_phrase_count", "Accusatory phrases"),
        ("worker_age", "Worker age"),
        ("psychosocial_flags_count", "Psychosocial flags"),
        ("rtw_attempts_count", "RTW attempts"),
        ("progress_weeks", "Recovery weeks"),
        ("restrictions_lift_kg", "Lifting restriction"),
        ("restrictions_stand_hours", "Standing restriction"),
        ("cognitive_restrict_flag", "Cognitive restriction"),
        ("role_lift_req_kg", "Role lifting requirement"),
        ("role_stand_req_hours", "Role standing requirement"),
        ("role_cognitive_load", "Role cognitive load"),
        ("cctv_available", "CCTV available"),
        ("cert_wording_nonoccupational", "Non-occupational wording"),
        ("communication_breakdown_flag", "Communication breakdown"),
        ("injury_type_back", "Back injury"),
        ("injury_type_shoulder", "Shoulder injury"),
        ("injury_type_knee", "Knee injury"),
        ("injury_type_psychological", "Psychological injury"),
        ("caps_ratio", "Uppercase ratio"),
        ("question_density", "Question density"),
        ("consecutive_missed_appts", "Consecutive missed"),
        ("avg_response_latency_mins", "Response latency"),
        ("injury_register_logged", "Injury register"),
        ("channel_email", "Email channel"),
        ("channel_whatsapp", "WhatsApp channel"),
        ("channel_web", "Web channel"),
    ])
});

/// Label for a feature name, falling back to the raw name when no label
/// is registered.
pub fn label_for<'a>(name: &'a str) -> &'a str {
    FEATURE_LABELS.get(name).copied().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_label() {
        assert_eq!(label_for("days_open"), "Days case open");
    }

    #[test]
    fn test_unregistered_name_falls_back_to_raw() {
        assert_eq!(label_for("some_new_feature"), "some_new_feature");
    }
}
