//! Command-line front end for `webjars-extractor`.
//!
//! The `webjars-extract` binary copies WebJar resources out of archives on a
//! search path into a destination directory, or lists the packages it can
//! see. Argument parsing and error types live here so the binary stays small.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Errors surfaced to the user

pub mod cli;
pub mod error;
