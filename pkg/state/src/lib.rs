//! Persistent registry store for schedscale resources.

pub mod client;

pub use client::StateStore;
