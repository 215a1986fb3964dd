//! Integration test suite for yaml-tmpl
//!
//! End-to-end tests driving the `yaml-tmpl` binary and the library API.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render_command**: `yaml-tmpl render` input, output, formats and failures
//! - **variables**: configuration file, `--vars-file` and `--var` layering
//! - **expansion**: whole-document expansion through the library

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod expansion;
mod render_command;
mod variables;
