//! Python bindings (feature `pyo3`)

pub mod calculator;
pub mod types;
