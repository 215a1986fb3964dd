//! Core types shared by the library and the command line.
//!
//! The error module provides:
//! - [`TmplError`] - failures of the layer around the expansion core (files, decoding,
//!   configuration, variables, output)
//! - [`ErrorContext`] - user-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - convert any error reaching the CLI into an [`ErrorContext`]

pub mod error;

pub use error::{ErrorContext, TmplError, user_friendly_error};
