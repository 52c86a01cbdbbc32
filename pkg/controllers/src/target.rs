use chrono::{DateTime, Utc};
use pkg_constants::state::{DEPLOYMENT_PREFIX, HPA_PREFIX};
use pkg_state::StateStore;
use pkg_types::deployment::Deployment;
use pkg_types::hpa::HorizontalPodAutoscaler;
use tracing::info;

use crate::error::ReconcileError;

/// Canonical workload kinds a scaling policy may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Deployment,
    /// A deployment whose HPA is managed by an external annotation-driven
    /// operator. Mechanically identical to `Deployment` here: the replica
    /// field is written and the operator reads the annotations on its own
    /// schedule.
    AnnotatedDeployment,
    HorizontalPodAutoscaler,
}

impl ResourceKind {
    /// Normalize a policy's resource-type string. Synonyms are accepted
    /// case-insensitively; anything unrecognized is an error surfaced at
    /// reconcile time rather than by the policy validator.
    pub fn parse(s: &str) -> Result<Self, ReconcileError> {
        match s.to_ascii_lowercase().as_str() {
            "deployment" => Ok(Self::Deployment),
            "annotateddeployment" => Ok(Self::AnnotatedDeployment),
            "hpa" | "horizontalpodautoscaler" => Ok(Self::HorizontalPodAutoscaler),
            _ => Err(ReconcileError::UnknownKind(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::AnnotatedDeployment => "annotatedDeployment",
            Self::HorizontalPodAutoscaler => "horizontalPodAutoscaler",
        }
    }
}

/// A fetched snapshot of the workload a policy scales, with the per-kind
/// scale field behind one surface.
#[derive(Debug, Clone)]
pub enum ScaleTarget {
    Deployment {
        key: String,
        deployment: Deployment,
    },
    Hpa {
        key: String,
        hpa: HorizontalPodAutoscaler,
    },
}

impl ScaleTarget {
    /// Fetch the named workload fresh from the registry. Deployment and
    /// annotatedDeployment kinds resolve to the deployment representation,
    /// HPA to its own.
    pub async fn fetch(
        store: &StateStore,
        namespace: &str,
        name: &str,
        kind: ResourceKind,
    ) -> Result<Self, ReconcileError> {
        match kind {
            ResourceKind::Deployment | ResourceKind::AnnotatedDeployment => {
                let key = format!("{DEPLOYMENT_PREFIX}{namespace}/{name}");
                let deployment = store.get_json::<Deployment>(&key).await?.ok_or_else(|| {
                    ReconcileError::TargetNotFound {
                        kind: "deployment",
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                    }
                })?;
                Ok(Self::Deployment { key, deployment })
            }
            ResourceKind::HorizontalPodAutoscaler => {
                let key = format!("{HPA_PREFIX}{namespace}/{name}");
                let hpa = store
                    .get_json::<HorizontalPodAutoscaler>(&key)
                    .await?
                    .ok_or_else(|| ReconcileError::TargetNotFound {
                        kind: "hpa",
                        namespace: namespace.to_string(),
                        name: name.to_string(),
                    })?;
                Ok(Self::Hpa { key, hpa })
            }
        }
    }

    /// Replica count currently configured on the scale field.
    pub fn current_scale(&self) -> u32 {
        match self {
            Self::Deployment { deployment, .. } => deployment.spec.replicas,
            Self::Hpa { hpa, .. } => hpa.spec.min_replicas,
        }
    }

    /// Point the scale field at `replicas`.
    ///
    /// For an HPA the minimum bound is written; a maximum below the new
    /// minimum is raised to match so the persisted object stays valid.
    /// The maximum is never lowered here.
    pub fn set_scale(&mut self, replicas: u32) {
        match self {
            Self::Deployment { deployment, .. } => {
                deployment.spec.replicas = replicas;
                deployment.generation += 1;
            }
            Self::Hpa { hpa, .. } => {
                hpa.spec.min_replicas = replicas;
                if replicas > hpa.spec.max_replicas {
                    info!(
                        "HPA {}/{}: raising max_replicas to new min_replicas {}",
                        hpa.namespace, hpa.name, replicas
                    );
                    hpa.spec.max_replicas = replicas;
                }
            }
        }
    }

    /// Record that a scaling action landed on this snapshot.
    pub fn on_applied(&mut self, now: DateTime<Utc>) {
        if let Self::Hpa { hpa, .. } = self {
            hpa.status.last_scale_time = Some(now);
        }
    }

    /// Write the snapshot back to the registry.
    pub async fn persist(&self, store: &StateStore) -> anyhow::Result<()> {
        match self {
            Self::Deployment { key, deployment } => store.put_json(key, deployment).await,
            Self::Hpa { key, hpa } => store.put_json(key, hpa).await,
        }
    }
}
