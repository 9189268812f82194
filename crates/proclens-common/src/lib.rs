//! # proclens-common
//!
//! Shared types for the proclens workspace.
//!
//! This crate holds the error taxonomy every other proclens crate builds
//! upon: the `ProcError` enum and the `ProcResult` alias.

pub mod errors;

pub use errors::{ProcError, ProcResult};
