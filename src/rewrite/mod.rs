//! Offline maintenance rewriter
//!
//! Guarded find-and-replace over screen source files, driven by a TOML
//! rules file. Not part of the running app.

pub mod rules;
pub mod walker;

pub use rules::{RewriteRule, RuleSet};
pub use walker::{FileOutcome, RewriteReport, Rewriter};
