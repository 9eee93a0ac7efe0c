//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs
//!         /api/font/...   → cache gate → fonts::handlers
//!         /favicon.ico    → proxy::favicon
//!         /view-source    → proxy::view_source
//!         / , /{*path}    → proxy::content
//!         anything else   → 404
//! ```
//!
//! # Design Decisions
//! - Routes are built once at startup and immutable at runtime
//! - Whether the cache gate stores anything is decided per request from the
//!   environment, not by mounting different routers

pub mod router;

pub use router::{routes, UNROUTED_BODY};
