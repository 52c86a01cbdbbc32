use axum::{
    Json,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::AppState;
use pkg_constants::state::SCALER_PREFIX;
use pkg_types::scaler::ScheduledPodAutoscaler;
use pkg_types::validate::{validate_name, validate_scaler};

/// Admission defaulting step: a blank resource type becomes `deployment`.
pub fn apply_defaults(spa: &mut ScheduledPodAutoscaler) {
    if spa.spec.resource.kind.trim().is_empty() {
        spa.spec.resource.kind = "deployment".to_string();
    }
}

pub async fn create_scaler(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
    Json(mut spa): Json<ScheduledPodAutoscaler>,
) -> impl IntoResponse {
    if let Err(e) = validate_name(&spa.name) {
        return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
    }
    apply_defaults(&mut spa);
    let errors = validate_scaler(&spa.spec);
    if !errors.is_empty() {
        warn!(
            "Rejected scaler {}/{}: {} validation error(s)",
            ns,
            spa.name,
            errors.len()
        );
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response();
    }

    spa.namespace = ns.clone();
    spa.created_at = Utc::now();
    let key = format!("{SCALER_PREFIX}{}/{}", ns, spa.name);
    if let Err(e) = state.store.put_json(&key, &spa).await {
        warn!("Failed to create scaler: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create scaler").into_response();
    }
    info!("Created scaler: {}/{}", ns, spa.name);
    (StatusCode::CREATED, Json(spa)).into_response()
}

pub async fn update_scaler(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
    Json(mut spa): Json<ScheduledPodAutoscaler>,
) -> impl IntoResponse {
    apply_defaults(&mut spa);
    let errors = validate_scaler(&spa.spec);
    if !errors.is_empty() {
        warn!(
            "Rejected scaler update {}/{}: {} validation error(s)",
            ns,
            name,
            errors.len()
        );
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response();
    }

    let key = format!("{SCALER_PREFIX}{ns}/{name}");
    let existing = match state.store.get_json::<ScheduledPodAutoscaler>(&key).await {
        Ok(Some(existing)) => existing,
        Ok(None) => return (StatusCode::NOT_FOUND, "Scaler not found").into_response(),
        Err(e) => {
            warn!("Failed to load scaler {}/{}: {}", ns, name, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load scaler").into_response();
        }
    };

    // Only the spec is writable through this endpoint.
    spa.name = existing.name;
    spa.namespace = existing.namespace;
    spa.status = existing.status;
    spa.created_at = existing.created_at;

    if let Err(e) = state.store.put_json(&key, &spa).await {
        warn!("Failed to update scaler: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to update scaler").into_response();
    }
    info!("Updated scaler: {}/{}", ns, name);
    (StatusCode::OK, Json(spa)).into_response()
}

pub async fn list_scalers(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
) -> impl IntoResponse {
    let prefix = format!("{SCALER_PREFIX}{ns}/");
    let scalers: Vec<ScheduledPodAutoscaler> = state
        .store
        .list_json(&prefix)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|(_, s)| s)
        .collect();
    (StatusCode::OK, Json(scalers)).into_response()
}

pub async fn get_scaler(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{SCALER_PREFIX}{ns}/{name}");
    match state.store.get_json::<ScheduledPodAutoscaler>(&key).await {
        Ok(Some(spa)) => (StatusCode::OK, Json(spa)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Scaler not found").into_response(),
        Err(e) => {
            warn!("Failed to get scaler {}/{}: {}", ns, name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get scaler").into_response()
        }
    }
}

/// Deletes skip validation: a broken policy must still be removable.
pub async fn delete_scaler(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{SCALER_PREFIX}{ns}/{name}");
    match state.store.delete(&key).await {
        Ok(()) => {
            info!("Deleted scaler: {}/{}", ns, name);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            warn!("Failed to delete scaler {}/{}: {}", ns, name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete scaler").into_response()
        }
    }
}
