//! Dialect-pluggable SQL statement builder.
//!
//! `sqlweave-query` assembles SELECT, INSERT, UPDATE and DELETE statements
//! from a [`Dataset`] and hands every dialect-specific fragment to an
//! [`Adapter`]:
//!
//! - [`Expr`] trees for conditions, select lists and assignments
//! - [`AdapterConfig`], the spelling/capability table of a dialect
//! - [`Adapter`] with base callbacks, and [`DefaultAdapter`]
//! - a process-wide registry mapping dialect names to adapter factories
//!
//! Every statement is rendered either with inline literals or, when the
//! dataset is prepared, with placeholders and an argument list.

pub mod adapter;
pub mod base;
pub mod builder;
pub mod config;
pub mod dataset;
pub mod expr;
pub mod registry;
pub mod render;

pub use adapter::{Adapter, DefaultAdapter};
pub use builder::SqlBuilder;
pub use config::AdapterConfig;
pub use dataset::{Dataset, Dialect};
pub use expr::{
    BooleanOp, ConflictExpr, Expr, Identifier, NullSortType, OrderedExpr, RangeOp, Record,
    SortDirection,
};
pub use registry::{
    AdapterFactory, has_adapter, new_adapter, register_adapter, register_config,
    registered_adapters,
};
