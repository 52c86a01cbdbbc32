use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- Deployment spec ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub replicas: u32,
}

// --- Deployment ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub spec: DeploymentSpec,
    /// Metadata annotations. For annotation-driven deployments these carry
    /// the external HPA operator's scaling hints.
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    /// Monotonically increasing generation; bumped on spec changes
    #[serde(default)]
    pub generation: u64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
