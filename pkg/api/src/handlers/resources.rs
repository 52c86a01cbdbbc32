use axum::{
    Json,
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::AppState;
use pkg_constants::state::{DEPLOYMENT_PREFIX, HPA_PREFIX, NAMESPACE_PREFIX};
use pkg_types::deployment::Deployment;
use pkg_types::hpa::HorizontalPodAutoscaler;
use pkg_types::namespace::Namespace;
use pkg_types::validate::validate_name;

// ============================================================
// Namespaces
// ============================================================

pub async fn create_namespace(
    State(state): State<AppState>,
    Json(mut ns): Json<Namespace>,
) -> impl IntoResponse {
    if let Err(e) = validate_name(&ns.name) {
        return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
    }
    ns.created_at = Utc::now();
    let key = format!("{NAMESPACE_PREFIX}{}", ns.name);
    if let Err(e) = state.store.put_json(&key, &ns).await {
        warn!("Failed to create namespace: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create namespace",
        )
            .into_response();
    }
    info!("Created namespace: {}", ns.name);
    (StatusCode::CREATED, Json(ns)).into_response()
}

pub async fn list_namespaces(State(state): State<AppState>) -> impl IntoResponse {
    let namespaces: Vec<Namespace> = state
        .store
        .list_json(NAMESPACE_PREFIX)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|(_, ns)| ns)
        .collect();
    (StatusCode::OK, Json(namespaces)).into_response()
}

// ============================================================
// Deployments
// ============================================================

pub async fn create_deployment(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
    Json(mut deploy): Json<Deployment>,
) -> impl IntoResponse {
    if let Err(e) = validate_name(&deploy.name) {
        return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
    }
    deploy.namespace = ns.clone();
    deploy.created_at = Utc::now();
    let key = format!("{DEPLOYMENT_PREFIX}{}/{}", ns, deploy.name);
    if let Err(e) = state.store.put_json(&key, &deploy).await {
        warn!("Failed to create deployment: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create deployment",
        )
            .into_response();
    }
    info!("Created deployment: {}/{}", ns, deploy.name);
    (StatusCode::CREATED, Json(deploy)).into_response()
}

pub async fn list_deployments(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
) -> impl IntoResponse {
    let prefix = format!("{DEPLOYMENT_PREFIX}{ns}/");
    let deployments: Vec<Deployment> = state
        .store
        .list_json(&prefix)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|(_, d)| d)
        .collect();
    (StatusCode::OK, Json(deployments)).into_response()
}

pub async fn get_deployment(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{DEPLOYMENT_PREFIX}{ns}/{name}");
    match state.store.get_json::<Deployment>(&key).await {
        Ok(Some(deploy)) => (StatusCode::OK, Json(deploy)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Deployment not found").into_response(),
        Err(e) => {
            warn!("Failed to get deployment {}/{}: {}", ns, name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get deployment").into_response()
        }
    }
}

pub async fn delete_deployment(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{DEPLOYMENT_PREFIX}{ns}/{name}");
    match state.store.delete(&key).await {
        Ok(()) => {
            info!("Deleted deployment: {}/{}", ns, name);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            warn!("Failed to delete deployment {}/{}: {}", ns, name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete deployment",
            )
                .into_response()
        }
    }
}

// ============================================================
// HorizontalPodAutoscalers
// ============================================================

pub async fn create_hpa(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
    Json(mut hpa): Json<HorizontalPodAutoscaler>,
) -> impl IntoResponse {
    if let Err(e) = validate_name(&hpa.name) {
        return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response();
    }
    if hpa.spec.min_replicas > hpa.spec.max_replicas {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "min_replicas ({}) must not exceed max_replicas ({})",
                hpa.spec.min_replicas, hpa.spec.max_replicas
            ),
        )
            .into_response();
    }
    hpa.namespace = ns.clone();
    hpa.created_at = Utc::now();
    let key = format!("{HPA_PREFIX}{}/{}", ns, hpa.name);
    if let Err(e) = state.store.put_json(&key, &hpa).await {
        warn!("Failed to create HPA: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create HPA").into_response();
    }
    info!("Created HPA: {}/{}", ns, hpa.name);
    (StatusCode::CREATED, Json(hpa)).into_response()
}

pub async fn list_hpas(
    State(state): State<AppState>,
    AxumPath(ns): AxumPath<String>,
) -> impl IntoResponse {
    let prefix = format!("{HPA_PREFIX}{ns}/");
    let hpas: Vec<HorizontalPodAutoscaler> = state
        .store
        .list_json(&prefix)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|(_, h)| h)
        .collect();
    (StatusCode::OK, Json(hpas)).into_response()
}

pub async fn get_hpa(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{HPA_PREFIX}{ns}/{name}");
    match state.store.get_json::<HorizontalPodAutoscaler>(&key).await {
        Ok(Some(hpa)) => (StatusCode::OK, Json(hpa)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "HPA not found").into_response(),
        Err(e) => {
            warn!("Failed to get HPA {}/{}: {}", ns, name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to get HPA").into_response()
        }
    }
}

pub async fn delete_hpa(
    State(state): State<AppState>,
    AxumPath((ns, name)): AxumPath<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{HPA_PREFIX}{ns}/{name}");
    match state.store.delete(&key).await {
        Ok(()) => {
            info!("Deleted HPA: {}/{}", ns, name);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            warn!("Failed to delete HPA {}/{}: {}", ns, name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete HPA").into_response()
        }
    }
}
