//! Passthrough routes mounted next to the font routes.
//!
//! # Data Flow
//! ```text
//! /{*path}?branch=  → {raw_content_base}/{branch}{path} → mirrored response
//! /favicon.ico      → favicon_url                        → mirrored response
//! /view-source      → 301 source_url
//! ```
//!
//! # Design Decisions
//! - No caching layer: responses only advertise `Cache-Control` to clients
//! - Only `Content-Type` is copied from upstream

pub mod content;

pub use content::{content, favicon, view_source};
