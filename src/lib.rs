//! kubedoctor -- one-shot Kubernetes cluster checkup.
//!
//! This crate evaluates a point-in-time snapshot of cluster resources against a
//! fixed catalog of known problems and renders a report grouped by severity
//! and problem.

pub mod checkup;
pub mod config;
pub mod render;
pub mod resources;
pub mod source;
