//! Beacon Advertising Packet-Loss Estimator

#![forbid(unsafe_code, unused_must_use)]
#![warn(clippy::all, missing_docs)]

/// Reference link-layer configuration.
pub mod common;

/// Poisson probability mass function.
pub mod poisson;

/// Advertising packet-loss estimator.
pub mod estimator;
