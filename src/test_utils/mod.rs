//! Test utilities for yaml-tmpl
//!
//! Helpers shared by unit tests and the integration suite (enable the `test-utils` feature
//! to use them from `tests/`).
//!
//! # Example
//!
//! ```rust,no_run
//! use yaml_tmpl::test_utils::{init_test_logging, yaml};
//!
//! init_test_logging(None);
//! let node = yaml("ports: {_range: 3}");
//! assert!(node.is_mapping());
//! ```

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::document::{self, Node};
use crate::namespace::ScopedNamespace;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. Uses `level` when given, otherwise `RUST_LOG`; with
/// neither, logging stays off.
///
/// ```bash
/// RUST_LOG=yaml_tmpl=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer() // Captured per test by the harness
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}

/// Decode a YAML fixture, panicking on invalid input.
pub fn yaml(text: &str) -> Node {
    match document::from_str(text) {
        Ok(node) => node,
        Err(e) => panic!("Invalid YAML fixture: {e}\n{text}"),
    }
}

/// Namespace with the given root-level bindings, e.g. `context(&[("env", "prod".into())])`.
pub fn context(bindings: &[(&str, Node)]) -> ScopedNamespace {
    let mut context = ScopedNamespace::new();
    for (path, value) in bindings {
        context.set(path, value.clone());
    }
    context
}
