use anyhow::{Result, bail};
use chrono::NaiveTime;
use serde::Serialize;
use std::fmt;

use crate::scaler::ScalerSpec;

/// 12-hour clock format accepted for scale times, e.g. `"9:00AM"`, `"6:30PM"`.
pub const CLOCK_FORMAT: &str = "%I:%M%p";

/// Maximum length for a managed resource name. Scaled workloads get hash
/// suffixes appended by their own controllers, so the budget is tighter
/// than the usual 63-character object name limit.
pub const MAX_RESOURCE_NAME_LEN: usize = 52;

/// Parse a 12-hour clock time of day. Seconds are always zero.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, CLOCK_FORMAT)
}

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a scheduled scaling policy.
///
/// Returns field-scoped errors; an empty list means the policy is accepted.
/// Structural checks run in order and report only the first violation;
/// temporal checks run independently and may add one error per time field.
/// Kind-string checks are left to the resource adapter, which owns kind
/// normalization and surfaces unknown kinds at reconcile time.
pub fn validate_scaler(spec: &ScalerSpec) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(e) = structural_error(spec) {
        errors.push(e);
    }
    errors.extend(temporal_errors(spec));
    errors
}

fn structural_error(spec: &ScalerSpec) -> Option<FieldError> {
    let name = spec.resource.name.trim();
    if name.is_empty() {
        return Some(FieldError::new(
            "spec.resource.name",
            "name must not be blank",
        ));
    }
    if name.len() > MAX_RESOURCE_NAME_LEN {
        return Some(FieldError::new(
            "spec.resource.name",
            format!(
                "name '{}' exceeds {} characters (got {})",
                name,
                MAX_RESOURCE_NAME_LEN,
                name.len()
            ),
        ));
    }
    let down = match spec.scale_down.value {
        Some(v) => v,
        None => {
            return Some(FieldError::new("spec.scaleDown.value", "value is required"));
        }
    };
    let up = match spec.scale_up.value {
        Some(v) => v,
        None => {
            return Some(FieldError::new("spec.scaleUp.value", "value is required"));
        }
    };
    if down < 1 {
        return Some(FieldError::new(
            "spec.scaleDown.value",
            "value must be at least 1",
        ));
    }
    if up <= down {
        return Some(FieldError::new(
            "spec.scaleUp.value",
            format!("value ({up}) must be greater than scaleDown.value ({down})"),
        ));
    }
    None
}

fn temporal_errors(spec: &ScalerSpec) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let up = parse_clock_time(&spec.scale_up.time);
    if up.is_err() {
        errors.push(FieldError::new(
            "spec.scaleUp.time",
            format!(
                "'{}' is not a 12-hour clock time (expected e.g. \"9:00AM\")",
                spec.scale_up.time
            ),
        ));
    }
    let down = parse_clock_time(&spec.scale_down.time);
    if down.is_err() {
        errors.push(FieldError::new(
            "spec.scaleDown.time",
            format!(
                "'{}' is not a 12-hour clock time (expected e.g. \"6:00PM\")",
                spec.scale_down.time
            ),
        ));
    }
    if let (Ok(u), Ok(d)) = (up, down)
        && u == d
    {
        errors.push(FieldError::new(
            "spec.scaleDown.time",
            format!("scaleDown.time equals scaleUp.time ({})", spec.scale_up.time),
        ));
    }
    errors
}

/// Validate a Kubernetes-style object name.
/// Rules: lowercase `[a-z0-9-]`, max 63 chars, no leading/trailing hyphens.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("name must not be empty");
    }
    if name.len() > 63 {
        bail!("name '{}' exceeds 63 characters (got {})", name, name.len());
    }
    if name.starts_with('-') || name.ends_with('-') {
        bail!("name '{}' must not start or end with a hyphen", name);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        bail!(
            "name '{}' must contain only lowercase letters, digits, and hyphens [a-z0-9-]",
            name
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaler::{ResourceRef, ScaleSpec};

    fn spec(
        name: &str,
        up_time: &str,
        up_value: Option<u32>,
        down_time: &str,
        down_value: Option<u32>,
    ) -> ScalerSpec {
        ScalerSpec {
            resource: ResourceRef {
                name: name.to_string(),
                kind: "deployment".to_string(),
            },
            scale_up: ScaleSpec {
                time: up_time.to_string(),
                value: up_value,
            },
            scale_down: ScaleSpec {
                time: down_time.to_string(),
                value: down_value,
            },
        }
    }

    #[test]
    fn accepts_well_formed_spec() {
        let errors = validate_scaler(&spec("web", "9:00AM", Some(10), "6:00PM", Some(2)));
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn rejects_blank_name() {
        let errors = validate_scaler(&spec("  ", "9:00AM", Some(10), "6:00PM", Some(2)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.resource.name");
    }

    #[test]
    fn rejects_overlong_name() {
        let errors = validate_scaler(&spec(
            &"a".repeat(53),
            "9:00AM",
            Some(10),
            "6:00PM",
            Some(2),
        ));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.resource.name");
    }

    #[test]
    fn rejects_missing_values() {
        let errors = validate_scaler(&spec("web", "9:00AM", Some(10), "6:00PM", None));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.scaleDown.value");

        let errors = validate_scaler(&spec("web", "9:00AM", None, "6:00PM", Some(2)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.scaleUp.value");
    }

    #[test]
    fn rejects_scale_down_below_one() {
        let errors = validate_scaler(&spec("web", "9:00AM", Some(10), "6:00PM", Some(0)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.scaleDown.value");
    }

    #[test]
    fn rejects_scale_up_not_above_scale_down() {
        let errors = validate_scaler(&spec("web", "9:00AM", Some(2), "6:00PM", Some(2)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.scaleUp.value");

        let errors = validate_scaler(&spec("web", "9:00AM", Some(1), "6:00PM", Some(5)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.scaleUp.value");
    }

    #[test]
    fn structural_first_violation_wins() {
        // Blank name and a bad value: only the name error is reported.
        let errors = validate_scaler(&spec("", "9:00AM", Some(1), "6:00PM", Some(5)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.resource.name");
    }

    #[test]
    fn reports_each_unparseable_time() {
        let errors = validate_scaler(&spec("web", "25:00", Some(10), "not-a-time", Some(2)));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "spec.scaleUp.time");
        assert_eq!(errors[1].field, "spec.scaleDown.time");
    }

    #[test]
    fn rejects_equal_times() {
        let errors = validate_scaler(&spec("web", "9:00AM", Some(10), "9:00AM", Some(2)));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.scaleDown.time");
    }

    #[test]
    fn structural_and_temporal_errors_merge() {
        let errors = validate_scaler(&spec("web", "bogus", Some(1), "6:00PM", Some(5)));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "spec.scaleUp.value");
        assert_eq!(errors[1].field, "spec.scaleUp.time");
    }

    #[test]
    fn parses_kitchen_times() {
        assert!(parse_clock_time("9:00AM").is_ok());
        assert!(parse_clock_time("12:30PM").is_ok());
        assert!(parse_clock_time("6:00pm").is_ok());
        assert!(parse_clock_time("18:00").is_err());
        assert!(parse_clock_time("9:00").is_err());
        assert!(parse_clock_time("").is_err());
    }

    #[test]
    fn valid_names() {
        assert!(validate_name("nginx").is_ok());
        assert!(validate_name("my-app").is_ok());
        assert!(validate_name("app-123").is_ok());
    }

    #[test]
    fn invalid_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("My-App").is_err());
        assert!(validate_name("my_app").is_err());
        assert!(validate_name("-leading").is_err());
        assert!(validate_name("trailing-").is_err());
        assert!(validate_name(&"a".repeat(64)).is_err());
    }
}
