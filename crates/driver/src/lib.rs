//! Sharescope driver crate root
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cognitive_complexity)]

pub mod driver;
pub mod probe;
pub mod state;

pub use driver::{Driver, MESSAGE_SERVICE_DOWN, MESSAGE_SERVICE_RESTORED};
pub use state::{FileStatusStore, ServiceStatus, StatusStore};
