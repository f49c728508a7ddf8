//! HTTP request handlers
//!
//! - `api` - Liveness greeting
//! - `assets` - Static bundle fallback
//! - `functions` - Named function dispatch

pub mod api;
pub mod assets;
pub mod functions;
