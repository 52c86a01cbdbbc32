//! Typed resource objects stored in the schedscale registry,
//! plus policy validation and configuration loading.

pub mod config;
pub mod deployment;
pub mod hpa;
pub mod namespace;
pub mod scaler;
pub mod validate;
