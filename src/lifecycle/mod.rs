//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → server stops accepting → in-flight requests finish
//!
//! Background work (background.rs):
//!     handlers spawn detached tasks → drained after the server stops
//! ```
//!
//! # Design Decisions
//! - Listener stops first, then background tasks are drained, then exit

pub mod background;
pub mod shutdown;
pub mod signals;

pub use background::BackgroundTasks;
pub use shutdown::Shutdown;
