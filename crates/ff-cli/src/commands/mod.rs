//! CLI command implementations.

pub mod habit;
pub mod list;
pub mod note;
pub mod report;
pub mod resource;
pub mod session;
pub mod status;
pub mod task;
pub mod watch;
