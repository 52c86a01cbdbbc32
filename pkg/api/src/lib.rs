pub mod handlers;
pub mod request_id;
pub mod server;

use pkg_state::StateStore;

/// Shared application state injected into all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: StateStore,
}
