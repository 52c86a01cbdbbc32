//! Registry key layout.
//!
//! Every resource is stored as JSON under an etcd-style key:
//! `<prefix><namespace>/<name>`.

pub const NAMESPACE_PREFIX: &str = "/registry/namespaces/";
pub const DEPLOYMENT_PREFIX: &str = "/registry/deployments/";
pub const HPA_PREFIX: &str = "/registry/hpa/";
pub const SCALER_PREFIX: &str = "/registry/scheduledscalers/";
