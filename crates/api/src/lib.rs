//! HTTP API: server wiring, request binding, and response mapping for the
//! product resource.

pub mod app;
pub mod config;
pub mod middleware;
