use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- HPA status ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HPAStatus {
    #[serde(default)]
    pub last_scale_time: Option<DateTime<Utc>>,
}

// --- HPA spec ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HPASpec {
    /// Lower replica bound. Scheduled scaling acts on this field.
    pub min_replicas: u32,
    /// Upper replica bound; never automatically lowered.
    pub max_replicas: u32,
}

// --- HPA ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizontalPodAutoscaler {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub spec: HPASpec,
    #[serde(default)]
    pub status: HPAStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
