//! Reconciliation core for scheduled scaling: time-window resolution,
//! workload adapters, and the tick-driving controller.

pub mod error;
pub mod scaler;
pub mod target;
pub mod window;
