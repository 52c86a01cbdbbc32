use axum::{
    Router, middleware,
    routing::{get, post},
};
use chrono::Utc;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::AppState;
use crate::handlers::{resources, scalers};
use crate::request_id::request_id_middleware;
use pkg_constants::state::NAMESPACE_PREFIX;
use pkg_controllers::scaler::ScheduledScalerController;
use pkg_state::StateStore;
use pkg_types::namespace::Namespace;

/// Server configuration passed from the binary's CLI.
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_dir: String,
    pub reconcile_interval: Duration,
}

pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = StateStore::new(&config.data_dir).await?;
    let state = AppState {
        store: store.clone(),
    };

    seed_default_namespace(&store).await?;

    // Start the scheduled scaler background task
    ScheduledScalerController::with_interval(store.clone(), config.reconcile_interval).start();

    let app = Router::new()
        .route(
            "/api/v1/namespaces",
            post(resources::create_namespace).get(resources::list_namespaces),
        )
        .route(
            "/api/v1/namespaces/{ns}/deployments",
            post(resources::create_deployment).get(resources::list_deployments),
        )
        .route(
            "/api/v1/namespaces/{ns}/deployments/{name}",
            get(resources::get_deployment).delete(resources::delete_deployment),
        )
        .route(
            "/api/v1/namespaces/{ns}/horizontalpodautoscalers",
            post(resources::create_hpa).get(resources::list_hpas),
        )
        .route(
            "/api/v1/namespaces/{ns}/horizontalpodautoscalers/{name}",
            get(resources::get_hpa).delete(resources::delete_hpa),
        )
        .route(
            "/api/v1/namespaces/{ns}/scheduledscalers",
            post(scalers::create_scaler).get(scalers::list_scalers),
        )
        .route(
            "/api/v1/namespaces/{ns}/scheduledscalers/{name}",
            get(scalers::get_scaler)
                .put(scalers::update_scaler)
                .delete(scalers::delete_scaler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state);

    info!("Starting API server on {}", config.addr);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Make sure the `default` namespace exists so fresh clusters are usable.
async fn seed_default_namespace(store: &StateStore) -> anyhow::Result<()> {
    let key = format!("{NAMESPACE_PREFIX}default");
    if store.get(&key).await?.is_none() {
        store
            .put_json(
                &key,
                &Namespace {
                    name: "default".to_string(),
                    created_at: Utc::now(),
                },
            )
            .await?;
        info!("Seeded default namespace");
    }
    Ok(())
}
