//! Edge asset relay library.
//!
//! Serves files from the asset repository and resolves Google Fonts requests
//! into TrueType/OpenType binaries, caching font responses where the
//! environment allows it.

pub mod cache;
pub mod config;
pub mod error;
pub mod fonts;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod upstream;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;
