//! Detection functions backing the problem catalog, grouped by resource kind.

pub mod hpa;
pub mod pod;
