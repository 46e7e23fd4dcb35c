//! Configuration for the k8s-inspect binary

pub mod settings;

pub use settings::{OutputStyle, Settings};
