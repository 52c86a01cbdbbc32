use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registry namespace. Workloads and scaling policies are both scoped
/// to exactly one namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
