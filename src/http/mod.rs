//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, host, request origin)
//!     → [routing layer picks a handler]
//!     → middleware/ (error presentation, pretty JSON)
//!     → response.rs (header stripping, cache directives)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestOrigin, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};
