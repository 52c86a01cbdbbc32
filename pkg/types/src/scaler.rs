use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::parse_clock_time;

// --- Resource reference ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Name of the workload to manage (a deployment or HPA name).
    pub name: String,
    /// Workload kind: `deployment`, `annotatedDeployment`, or `HPA`
    /// (synonyms accepted case-insensitively). Blank is defaulted to
    /// `deployment` before validation.
    #[serde(rename = "type", default)]
    pub kind: String,
}

// --- Scale spec ---

/// One time-of-day / replica-count pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleSpec {
    /// 12-hour clock time of day, e.g. `"6:00PM"`.
    pub time: String,
    /// Replica count to scale to. Required in practice; a missing value
    /// is rejected by validation and never dereferenced.
    #[serde(default)]
    pub value: Option<u32>,
}

impl ScaleSpec {
    /// Parsed (time of day, value) pair, if both fields are well-formed.
    pub fn point(&self) -> Option<(NaiveTime, u32)> {
        Some((parse_clock_time(&self.time).ok()?, self.value?))
    }
}

// --- Scaler status ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalerStatus {
    /// Last time a scaling action was applied to the target workload.
    #[serde(default)]
    pub last_schedule_time: Option<DateTime<Utc>>,
}

// --- Scaler spec ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalerSpec {
    pub resource: ResourceRef,
    pub scale_up: ScaleSpec,
    pub scale_down: ScaleSpec,
}

// --- ScheduledPodAutoscaler ---

/// User-declared scaling policy: a target workload paired with two daily
/// time points, each bound to the replica count in force from that point on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledPodAutoscaler {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub spec: ScalerSpec,
    #[serde(default)]
    pub status: ScalerStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
