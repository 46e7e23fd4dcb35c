//! Utility modules for k8s-inspect

pub mod errors;
pub mod logger;
pub mod prereqs;

// Re-export commonly used items
pub use errors::{InspectError, Result};
pub use logger::{log_error, log_info, log_warn};
pub use prereqs::{CommonPrereqs, Prerequisite};
