//! Cross-cutting response middleware.

pub mod deadline;
pub mod errors;
pub mod pretty_json;

pub use deadline::deadline;
pub use errors::present_errors;
pub use pretty_json::pretty_json;
