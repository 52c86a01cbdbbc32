use pkg_types::validate::FieldError;
use thiserror::Error;

/// Failure modes of one reconcile pass over a single scaling policy.
///
/// A failed pass is logged and retried on the next interval; it never
/// aborts the controller loop or blocks other policies.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The policy's resource type does not normalize to a known kind.
    #[error("unrecognizable resource type '{0}'")]
    UnknownKind(String),

    /// The managed workload is missing from the registry.
    #[error("{kind} {namespace}/{name} not found")]
    TargetNotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    /// The policy failed reconcile-time re-validation.
    #[error("invalid scaler spec: {}", format_field_errors(.0))]
    InvalidSpec(Vec<FieldError>),

    /// Fetch or persist against the registry failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
