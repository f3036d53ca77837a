//! Core types for sqlweave.
//!
//! This crate provides the foundations shared by the statement builder and
//! every dialect adapter:
//!
//! - `Value` for dynamically typed literals and bound arguments
//! - `Error` / `Result` for statement generation failures
//! - identifier quoting helpers

pub mod error;
pub mod identifiers;
pub mod value;

pub use error::{
    BuildError, BuildErrorKind, ConfigError, Error, Feature, Result, UnsupportedError,
};
pub use identifiers::{quote_ident, quote_ident_with};
pub use value::Value;
