//! Core data types for ir-triage.
//!
//! This crate defines the values that flow through the pipeline:
//! - [`Notification`] - One "object created" record parsed from a queue message
//! - [`ResultArtifact`] / [`ResultSet`] - Named, typed outputs of processing one archive
//! - [`Payload`] and [`SideData`] - Inputs handed to the analysis capability

pub mod artifact;
pub mod notification;
pub mod payload;

pub use artifact::*;
pub use notification::*;
pub use payload::*;
