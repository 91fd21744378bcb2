// src/api/handlers.rs
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{
    ATTRIBUTION_TOP_K, MODEL_VERSION, UC12_NEGATIVE_SPLIT, UC13_NEGATIVE_SPLIT, UC1_NEGATIVE_SPLIT,
};
use crate::errors::ScoringError;
use crate::models::{
    CasePriorityProbabilities, CasePriorityRequest, CasePriorityResponse, ClaimEscalationRequest,
    ClaimEscalationResponse, FraudDocRequest, FraudDocResponse, FraudProbabilities,
    GuardrailResponse, GuardrailResult, ObligationComplianceRequest, ObligationComplianceResponse,
    ResponseCore, RiskProbabilities, ScoreResponse,
};
use crate::policy::guardrails::check_guardrails;
use crate::policy::split_negative_mass;
use crate::policy::usecases::{is_workcover_case, uc12_policy, uc13_policy, uc1_policy, uc7_policy};

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Every pipeline failure surfaces as this one uniform transport error;
/// subtypes are only distinguished in the carried message.
pub type ApiError = (StatusCode, Json<ErrorDetail>);

fn prediction_failed(err: ScoringError) -> ApiError {
    warn!("Prediction failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDetail {
            detail: format!("Prediction failed: {}", err),
        }),
    )
}

fn guardrail_response(result: GuardrailResult) -> ScoreResponse {
    ScoreResponse::Guardrail(GuardrailResponse {
        model_version: MODEL_VERSION.to_string(),
        decision: result.forced_decision.to_string(),
        reason: result.reason,
        recommendation: result.recommendation.to_string(),
        top_attributions: Vec::new(),
    })
}

fn core(recommendation: String, top_attributions: Vec<crate::models::AttributionItem>) -> ResponseCore {
    ResponseCore {
        model_version: MODEL_VERSION.to_string(),
        recommendation,
        top_attributions,
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub models_loaded: Vec<String>,
    pub version: &'static str,
    pub schema_version: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        models_loaded: state.store.loaded().await,
        version: MODEL_VERSION,
        schema_version: state.extractor.schema().version.clone(),
        started_at: state.started_at,
    })
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        service: "Case Scoring Service",
        version: MODEL_VERSION,
        endpoints: vec![
            "/health",
            "/ml/score/case-priority",
            "/ml/score/fraud",
            "/ml/score/compliance",
            "/ml/score/claim-escalation",
        ],
    })
}

/// UC-1: case priority banding with score and decomposed probabilities.
pub async fn score_case_priority(
    State(state): State<AppState>,
    Json(request): Json<CasePriorityRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let trace_id = Uuid::new_v4();
    debug!("[{}] Scoring case priority for '{}'", trace_id, request.case_id);

    if let Some(guardrail) = check_guardrails(None, Some(&request.case_id)) {
        info!("[{}] Guardrail fired: {}", trace_id, guardrail.reason);
        return Ok(Json(guardrail_response(guardrail)));
    }

    let vector = state.extractor.extract_from(&request);
    let prediction = state
        .store
        .predict("uc_1", &vector)
        .await
        .map_err(prediction_failed)?;

    let (medium, low) = split_negative_mass(prediction.negative(), UC1_NEGATIVE_SPLIT);
    let probabilities = CasePriorityProbabilities {
        high: prediction.positive(),
        medium,
        low,
    };

    let decision = uc1_policy(&probabilities);
    info!(
        "[{}] Case '{}' banded {} with score {}",
        trace_id,
        request.case_id,
        decision.band.as_str(),
        decision.score
    );
    let top_attributions = state
        .store
        .top_attributions("uc_1", &prediction.attributions, &vector, ATTRIBUTION_TOP_K)
        .await
        .map_err(prediction_failed)?;

    Ok(Json(ScoreResponse::CasePriority(CasePriorityResponse {
        core: core(decision.recommendation.to_string(), top_attributions),
        band: decision.band,
        score: decision.score,
        probabilities,
    })))
}

/// UC-7: fraud screening over an uploaded document. The OCR text is the
/// guardrail-scanned free-text field for this use case.
pub async fn score_fraud(
    State(state): State<AppState>,
    Json(request): Json<FraudDocRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let trace_id = Uuid::new_v4();
    debug!(
        "[{}] Scoring fraud for document '{}' on case '{}'",
        trace_id, request.doc_id, request.case_id
    );

    if let Some(guardrail) = check_guardrails(Some(&request.ocr_text), Some(&request.case_id)) {
        info!("[{}] Guardrail fired: {}", trace_id, guardrail.reason);
        return Ok(Json(guardrail_response(guardrail)));
    }

    let vector = state.extractor.extract_from(&request);
    let prediction = state
        .store
        .predict("uc_7", &vector)
        .await
        .map_err(prediction_failed)?;

    let probabilities = FraudProbabilities {
        fraudulent: prediction.positive(),
        legitimate: prediction.negative(),
    };

    let (quarantine, decision, recommendation) = uc7_policy(probabilities.fraudulent);
    info!(
        "[{}] Document '{}' fraud probability {:.4}, quarantine: {}",
        trace_id, request.doc_id, probabilities.fraudulent, quarantine
    );
    let top_attributions = state
        .store
        .top_attributions("uc_7", &prediction.attributions, &vector, ATTRIBUTION_TOP_K)
        .await
        .map_err(prediction_failed)?;

    Ok(Json(ScoreResponse::Fraud(FraudDocResponse {
        core: core(recommendation.to_string(), top_attributions),
        decision,
        quarantine,
        probabilities,
    })))
}

/// UC-12: obligation compliance with the WorkCover recommendation branch.
pub async fn score_compliance(
    State(state): State<AppState>,
    Json(request): Json<ObligationComplianceRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let trace_id = Uuid::new_v4();
    debug!("[{}] Scoring compliance for '{}'", trace_id, request.case_id);

    if let Some(guardrail) = check_guardrails(None, Some(&request.case_id)) {
        info!("[{}] Guardrail fired: {}", trace_id, guardrail.reason);
        return Ok(Json(guardrail_response(guardrail)));
    }

    let vector = state.extractor.extract_from(&request);
    let prediction = state
        .store
        .predict("uc_12", &vector)
        .await
        .map_err(prediction_failed)?;

    let (medium_risk, low_risk) = split_negative_mass(prediction.negative(), UC12_NEGATIVE_SPLIT);
    let probabilities = RiskProbabilities {
        high_risk: prediction.positive(),
        medium_risk,
        low_risk,
    };

    let is_workcover = is_workcover_case(&request.case_id, request.missed_appts_7d);
    let decision = uc12_policy(&probabilities, is_workcover);
    info!(
        "[{}] Case '{}' compliance band {} (workcover: {})",
        trace_id,
        request.case_id,
        decision.band.as_str(),
        is_workcover
    );
    let top_attributions = state
        .store
        .top_attributions("uc_12", &prediction.attributions, &vector, ATTRIBUTION_TOP_K)
        .await
        .map_err(prediction_failed)?;

    let evidence_log = if decision.evidence_log.is_empty() {
        None
    } else {
        Some(decision.evidence_log)
    };

    Ok(Json(ScoreResponse::Compliance(
        ObligationComplianceResponse {
            core: core(decision.recommendation.to_string(), top_attributions),
            band: decision.band,
            probabilities,
            entitlement_at_risk: decision.entitlement_at_risk,
            evidence_log,
        },
    )))
}

/// UC-13: claim escalation risk banding.
pub async fn score_claim_escalation(
    State(state): State<AppState>,
    Json(request): Json<ClaimEscalationRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let trace_id = Uuid::new_v4();
    debug!(
        "[{}] Scoring claim escalation for '{}'",
        trace_id, request.case_id
    );

    if let Some(guardrail) = check_guardrails(None, Some(&request.case_id)) {
        info!("[{}] Guardrail fired: {}", trace_id, guardrail.reason);
        return Ok(Json(guardrail_response(guardrail)));
    }

    let vector = state.extractor.extract_from(&request);
    let prediction = state
        .store
        .predict("uc_13", &vector)
        .await
        .map_err(prediction_failed)?;

    let (medium_risk, low_risk) = split_negative_mass(prediction.negative(), UC13_NEGATIVE_SPLIT);
    let probabilities = RiskProbabilities {
        high_risk: prediction.positive(),
        medium_risk,
        low_risk,
    };

    let (band, recommendation) = uc13_policy(&probabilities);
    info!(
        "[{}] Case '{}' escalation band {}",
        trace_id,
        request.case_id,
        band.as_str()
    );
    let top_attributions = state
        .store
        .top_attributions("uc_13", &prediction.attributions, &vector, ATTRIBUTION_TOP_K)
        .await
        .map_err(prediction_failed)?;

    Ok(Json(ScoreResponse::ClaimEscalation(
        ClaimEscalationResponse {
            core: core(recommendation.to_string(), top_attributions),
            band,
            probabilities,
        },
    )))
}
