//! Utility functions module
//!
//! Small helpers shared by the screens and the command line front end.

pub mod format;

pub use format::{describe_params, mask_secret};
