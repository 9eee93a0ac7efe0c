//! Font resolution subsystem.
//!
//! # Data Flow
//! ```text
//! /api/font/{family}/{weight}[/{text}]
//!     → handlers.rs (decoded path segments, request origin)
//!     → request.rs (FontRequest: normalized family)
//!     → resolver.rs
//!         1. GET css API (legacy User-Agent, text filter)
//!         2. css.rs: first opentype/truetype src url
//!         3. GET font binary (buffered)
//!     → binary response, upstream status and headers
//! ```
//!
//! # Design Decisions
//! - Weight tokens are not validated locally; an unknown weight produces CSS
//!   without a usable source and therefore a 404
//! - No retries: a failed fetch fails the request

pub mod css;
pub mod handlers;
pub mod request;
pub mod resolver;

pub use css::{extract_font_source, FontFormat, FontSource};
pub use request::FontRequest;
pub use resolver::FontResolver;
