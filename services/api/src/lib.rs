//! services/api/src/lib.rs
//!
//! The HTTP service around `doc_simplifier_core`: concrete adapters for the
//! core ports, configuration, and the Axum web layer.

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod web;
