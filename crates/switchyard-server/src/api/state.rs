//! State route handlers: load on GET, save-then-notify on PUT.
//!
//! A PUT emits the matching `<kind>Changed` envelope only after the store
//! reports success; a failed save emits nothing.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use tracing::instrument;

use switchyard_store::{
    AuthCredential, Certificate, ProxyConfig, Settings, StateKind, ValidationRule,
};

use super::errors::ApiError;
use crate::server::AppState;

fn require_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::InvalidParams {
            message: rejection.body_text(),
        }),
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// GET `/api/settings`
#[instrument(skip_all, fields(route = "settings.get"))]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, ApiError> {
    Ok(Json(state.store.load_settings()?))
}

/// PUT `/api/settings`
#[instrument(skip_all, fields(route = "settings.save"))]
pub async fn put_settings(
    State(state): State<AppState>,
    payload: Result<Json<Settings>, JsonRejection>,
) -> Result<Json<Settings>, ApiError> {
    let settings = require_body(payload)?;
    let saved = state.store.save_settings(&settings)?;
    state
        .broadcast
        .emit_state_change(StateKind::Settings.as_str())
        .await;
    Ok(Json(saved))
}

// ── Auths ───────────────────────────────────────────────────────────

/// GET `/api/auths`
#[instrument(skip_all, fields(route = "auths.get"))]
pub async fn get_auths(
    State(state): State<AppState>,
) -> Result<Json<Vec<AuthCredential>>, ApiError> {
    Ok(Json(state.store.load_auths()?))
}

/// PUT `/api/auths`
#[instrument(skip_all, fields(route = "auths.save"))]
pub async fn put_auths(
    State(state): State<AppState>,
    payload: Result<Json<Vec<AuthCredential>>, JsonRejection>,
) -> Result<Json<Vec<AuthCredential>>, ApiError> {
    let auths = require_body(payload)?;
    let saved = state.store.save_auths(&auths)?;
    state
        .broadcast
        .emit_state_change(StateKind::Auths.as_str())
        .await;
    Ok(Json(saved))
}

// ── Proxies ─────────────────────────────────────────────────────────

/// GET `/api/proxies`
#[instrument(skip_all, fields(route = "proxies.get"))]
pub async fn get_proxies(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProxyConfig>>, ApiError> {
    Ok(Json(state.store.load_proxies()?))
}

/// PUT `/api/proxies`
#[instrument(skip_all, fields(route = "proxies.save"))]
pub async fn put_proxies(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ProxyConfig>>, JsonRejection>,
) -> Result<Json<Vec<ProxyConfig>>, ApiError> {
    let proxies = require_body(payload)?;
    let saved = state.store.save_proxies(&proxies)?;
    state
        .broadcast
        .emit_state_change(StateKind::Proxies.as_str())
        .await;
    Ok(Json(saved))
}

// ── Certs ───────────────────────────────────────────────────────────

/// GET `/api/certs`
#[instrument(skip_all, fields(route = "certs.get"))]
pub async fn get_certs(
    State(state): State<AppState>,
) -> Result<Json<Vec<Certificate>>, ApiError> {
    Ok(Json(state.store.load_certs()?))
}

/// PUT `/api/certs`
#[instrument(skip_all, fields(route = "certs.save"))]
pub async fn put_certs(
    State(state): State<AppState>,
    payload: Result<Json<Vec<Certificate>>, JsonRejection>,
) -> Result<Json<Vec<Certificate>>, ApiError> {
    let certs = require_body(payload)?;
    let saved = state.store.save_certs(&certs)?;
    state
        .broadcast
        .emit_state_change(StateKind::Certs.as_str())
        .await;
    Ok(Json(saved))
}

// ── Validation rules ────────────────────────────────────────────────

/// GET `/api/validation-rules`
#[instrument(skip_all, fields(route = "validationRules.get"))]
pub async fn get_validation_rules(
    State(state): State<AppState>,
) -> Result<Json<Vec<ValidationRule>>, ApiError> {
    Ok(Json(state.store.load_validation_rules()?))
}

/// PUT `/api/validation-rules`
#[instrument(skip_all, fields(route = "validationRules.save"))]
pub async fn put_validation_rules(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ValidationRule>>, JsonRejection>,
) -> Result<Json<Vec<ValidationRule>>, ApiError> {
    let rules = require_body(payload)?;
    let saved = state.store.save_validation_rules(&rules)?;
    state
        .broadcast
        .emit_state_change(StateKind::ValidationRules.as_str())
        .await;
    Ok(Json(saved))
}
