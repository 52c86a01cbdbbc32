use chrono::{Local, NaiveDateTime, Utc};
use pkg_constants::state::{NAMESPACE_PREFIX, SCALER_PREFIX};
use pkg_state::StateStore;
use pkg_types::config;
use pkg_types::scaler::ScheduledPodAutoscaler;
use pkg_types::validate::validate_scaler;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ReconcileError;
use crate::target::{ResourceKind, ScaleTarget};
use crate::window::required_replicas;

/// Apply `required` to the target if it differs from the current scale.
///
/// Returns whether a write was issued. Repeated calls with an unchanged
/// required value and snapshot are no-ops; no locking is done, the handed
/// snapshot is trusted.
pub async fn apply_scale(
    store: &StateStore,
    target: &mut ScaleTarget,
    required: u32,
) -> Result<bool, ReconcileError> {
    if target.current_scale() == required {
        return Ok(false);
    }
    target.set_scale(required);
    target.on_applied(Utc::now());
    target.persist(store).await?;
    Ok(true)
}

/// Scheduled scaler controller.
/// Once per interval, resolves each policy's required replica count from
/// the wall clock and applies it to the targeted workload.
pub struct ScheduledScalerController {
    store: StateStore,
    check_interval: Duration,
}

impl ScheduledScalerController {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            check_interval: config::reconcile_interval(None),
        }
    }

    pub fn with_interval(store: StateStore, check_interval: Duration) -> Self {
        Self {
            store,
            check_interval,
        }
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "ScheduledScalerController started (interval={}s)",
                self.check_interval.as_secs()
            );
            let mut interval = tokio::time::interval(self.check_interval);
            loop {
                interval.tick().await;
                if let Err(e) = self.reconcile().await {
                    warn!("ScheduledScalerController reconcile error: {}", e);
                }
            }
        })
    }

    async fn reconcile(&self) -> anyhow::Result<()> {
        let ns_entries = self.store.list_prefix(NAMESPACE_PREFIX).await?;
        for (ns_key, _) in ns_entries {
            let ns = ns_key
                .strip_prefix(NAMESPACE_PREFIX)
                .unwrap_or_default()
                .to_string();
            if ns.is_empty() {
                continue;
            }
            self.reconcile_namespace(&ns).await?;
        }
        Ok(())
    }

    async fn reconcile_namespace(&self, ns: &str) -> anyhow::Result<()> {
        let prefix = format!("{SCALER_PREFIX}{ns}/");
        let scalers: Vec<(String, ScheduledPodAutoscaler)> = self.store.list_json(&prefix).await?;
        let now = Local::now().naive_local();

        for (key, spa) in scalers {
            let name = spa.name.clone();
            if let Err(e) = self.reconcile_scaler(ns, &key, spa, now).await {
                // One bad policy must not block the rest; the next tick retries.
                warn!("Scaler {}/{}: {}", ns, name, e);
            }
        }
        Ok(())
    }

    /// One reconcile pass over a single policy: default, validate, resolve
    /// the window for `now`, fetch the target, and apply the required scale.
    async fn reconcile_scaler(
        &self,
        ns: &str,
        key: &str,
        mut spa: ScheduledPodAutoscaler,
        now: NaiveDateTime,
    ) -> Result<(), ReconcileError> {
        // Defaulting normally happens at admission; re-apply it here for
        // objects written before the defaulting step existed.
        if spa.spec.resource.kind.trim().is_empty() {
            spa.spec.resource.kind = "deployment".to_string();
        }

        let errors = validate_scaler(&spa.spec);
        if !errors.is_empty() {
            return Err(ReconcileError::InvalidSpec(errors));
        }

        let kind = ResourceKind::parse(&spa.spec.resource.kind)?;

        let (Some(scale_up), Some(scale_down)) =
            (spa.spec.scale_up.point(), spa.spec.scale_down.point())
        else {
            // Validation guarantees both points parse; a miss means the
            // spec changed under us.
            return Err(ReconcileError::InvalidSpec(validate_scaler(&spa.spec)));
        };

        let decision = required_replicas(now, scale_up, scale_down);
        debug!(
            "Scaler {}/{}: {:?} window requires {} replicas",
            ns, spa.name, decision.window, decision.replicas
        );

        let mut target =
            ScaleTarget::fetch(&self.store, ns, &spa.spec.resource.name, kind).await?;
        let current = target.current_scale();
        let mutated = apply_scale(&self.store, &mut target, decision.replicas).await?;

        if mutated {
            info!(
                "Scaler {}/{}: scaled {} {} from {} to {} replicas",
                ns,
                spa.name,
                kind.as_str(),
                spa.spec.resource.name,
                current,
                decision.replicas
            );
            spa.status.last_schedule_time = Some(Utc::now());
            self.store.put_json(key, &spa).await?;
        } else {
            debug!(
                "Scaler {}/{}: {} {} already at {} replicas",
                ns,
                spa.name,
                kind.as_str(),
                spa.spec.resource.name,
                decision.replicas
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pkg_constants::state::{DEPLOYMENT_PREFIX, HPA_PREFIX};
    use pkg_types::deployment::{Deployment, DeploymentSpec};
    use pkg_types::hpa::{HPASpec, HPAStatus, HorizontalPodAutoscaler};
    use pkg_types::scaler::{ResourceRef, ScaleSpec, ScalerSpec, ScalerStatus};

    async fn scratch_store() -> StateStore {
        let dir = format!("/tmp/schedscale-test-{}", uuid::Uuid::new_v4());
        StateStore::new(&dir).await.expect("open scratch store")
    }

    fn deployment(ns: &str, name: &str, replicas: u32) -> Deployment {
        Deployment {
            name: name.to_string(),
            namespace: ns.to_string(),
            spec: DeploymentSpec { replicas },
            annotations: Default::default(),
            generation: 0,
            created_at: Utc::now(),
        }
    }

    fn hpa(ns: &str, name: &str, min: u32, max: u32) -> HorizontalPodAutoscaler {
        HorizontalPodAutoscaler {
            name: name.to_string(),
            namespace: ns.to_string(),
            spec: HPASpec {
                min_replicas: min,
                max_replicas: max,
            },
            status: HPAStatus::default(),
            created_at: Utc::now(),
        }
    }

    fn scaler(ns: &str, target: &str, kind: &str) -> ScheduledPodAutoscaler {
        ScheduledPodAutoscaler {
            name: format!("{target}-schedule"),
            namespace: ns.to_string(),
            spec: ScalerSpec {
                resource: ResourceRef {
                    name: target.to_string(),
                    kind: kind.to_string(),
                },
                scale_up: ScaleSpec {
                    time: "9:00AM".to_string(),
                    value: Some(6),
                },
                scale_down: ScaleSpec {
                    time: "6:00PM".to_string(),
                    value: Some(2),
                },
            },
            status: ScalerStatus::default(),
            created_at: Utc::now(),
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn apply_is_idempotent() {
        let store = scratch_store().await;
        let key = format!("{DEPLOYMENT_PREFIX}default/web");
        store
            .put_json(&key, &deployment("default", "web", 5))
            .await
            .unwrap();

        let mut target = ScaleTarget::fetch(&store, "default", "web", ResourceKind::Deployment)
            .await
            .unwrap();
        assert!(apply_scale(&store, &mut target, 10).await.unwrap());

        let mut target = ScaleTarget::fetch(&store, "default", "web", ResourceKind::Deployment)
            .await
            .unwrap();
        assert!(!apply_scale(&store, &mut target, 10).await.unwrap());
    }

    #[tokio::test]
    async fn matching_scale_issues_no_write() {
        let store = scratch_store().await;
        let key = format!("{DEPLOYMENT_PREFIX}default/web");
        store
            .put_json(&key, &deployment("default", "web", 5))
            .await
            .unwrap();
        let before = store.get(&key).await.unwrap().unwrap();

        let mut target = ScaleTarget::fetch(&store, "default", "web", ResourceKind::Deployment)
            .await
            .unwrap();
        assert!(!apply_scale(&store, &mut target, 5).await.unwrap());

        let after = store.get(&key).await.unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn hpa_apply_round_trips_through_store() {
        let store = scratch_store().await;
        let key = format!("{HPA_PREFIX}default/api");
        store.put_json(&key, &hpa("default", "api", 5, 10)).await.unwrap();

        let mut target = ScaleTarget::fetch(
            &store,
            "default",
            "api",
            ResourceKind::HorizontalPodAutoscaler,
        )
        .await
        .unwrap();
        assert!(apply_scale(&store, &mut target, 12).await.unwrap());

        let stored: HorizontalPodAutoscaler =
            store.get_json(&key).await.unwrap().expect("hpa persisted");
        assert_eq!(stored.spec.min_replicas, 12);
        assert_eq!(stored.spec.max_replicas, 12);
        assert!(stored.status.last_scale_time.is_some());
    }

    #[tokio::test]
    async fn tick_scales_deployment_to_window_value() {
        let store = scratch_store().await;
        let deploy_key = format!("{DEPLOYMENT_PREFIX}prod/web");
        store
            .put_json(&deploy_key, &deployment("prod", "web", 2))
            .await
            .unwrap();
        let spa = scaler("prod", "web", "deployment");
        let spa_key = format!("{SCALER_PREFIX}prod/{}", spa.name);
        store.put_json(&spa_key, &spa).await.unwrap();

        let controller =
            ScheduledScalerController::with_interval(store.clone(), Duration::from_secs(10));
        // Noon sits inside business hours: scaleUp's value applies.
        controller
            .reconcile_scaler("prod", &spa_key, spa, noon())
            .await
            .unwrap();

        let scaled: Deployment = store
            .get_json(&deploy_key)
            .await
            .unwrap()
            .expect("deployment persisted");
        assert_eq!(scaled.spec.replicas, 6);

        let spa: ScheduledPodAutoscaler = store
            .get_json(&spa_key)
            .await
            .unwrap()
            .expect("scaler persisted");
        assert!(spa.status.last_schedule_time.is_some());
    }

    #[tokio::test]
    async fn blank_kind_defaults_to_deployment() {
        let store = scratch_store().await;
        let deploy_key = format!("{DEPLOYMENT_PREFIX}prod/web");
        store
            .put_json(&deploy_key, &deployment("prod", "web", 2))
            .await
            .unwrap();
        let spa = scaler("prod", "web", "");
        let spa_key = format!("{SCALER_PREFIX}prod/{}", spa.name);
        store.put_json(&spa_key, &spa).await.unwrap();

        let controller =
            ScheduledScalerController::with_interval(store.clone(), Duration::from_secs(10));
        controller
            .reconcile_scaler("prod", &spa_key, spa, noon())
            .await
            .unwrap();

        let scaled: Deployment = store.get_json(&deploy_key).await.unwrap().unwrap();
        assert_eq!(scaled.spec.replicas, 6);
    }

    #[tokio::test]
    async fn unknown_kind_aborts_without_mutation() {
        let store = scratch_store().await;
        let deploy_key = format!("{DEPLOYMENT_PREFIX}prod/web");
        store
            .put_json(&deploy_key, &deployment("prod", "web", 2))
            .await
            .unwrap();
        let spa = scaler("prod", "web", "statefulset");
        let spa_key = format!("{SCALER_PREFIX}prod/{}", spa.name);

        let controller =
            ScheduledScalerController::with_interval(store.clone(), Duration::from_secs(10));
        let err = controller
            .reconcile_scaler("prod", &spa_key, spa, noon())
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::UnknownKind(_)));

        let untouched: Deployment = store.get_json(&deploy_key).await.unwrap().unwrap();
        assert_eq!(untouched.spec.replicas, 2);
    }

    #[tokio::test]
    async fn invalid_spec_aborts_tick() {
        let store = scratch_store().await;
        let mut spa = scaler("prod", "web", "deployment");
        spa.spec.scale_down.time = "9:00AM".to_string();
        let spa_key = format!("{SCALER_PREFIX}prod/{}", spa.name);

        let controller =
            ScheduledScalerController::with_interval(store.clone(), Duration::from_secs(10));
        let err = controller
            .reconcile_scaler("prod", &spa_key, spa, noon())
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidSpec(_)));
    }

    #[tokio::test]
    async fn missing_target_is_reported() {
        let store = scratch_store().await;
        let spa = scaler("prod", "ghost", "deployment");
        let spa_key = format!("{SCALER_PREFIX}prod/{}", spa.name);

        let controller =
            ScheduledScalerController::with_interval(store.clone(), Duration::from_secs(10));
        let err = controller
            .reconcile_scaler("prod", &spa_key, spa, noon())
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::TargetNotFound { .. }));
    }
}
