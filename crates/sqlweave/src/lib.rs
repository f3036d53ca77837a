//! sqlweave - SQL statement generation with pluggable dialect adapters.
//!
//! sqlweave builds SELECT, INSERT, UPDATE and DELETE statements from a
//! fluent dataset and lets a per-dialect adapter decide how each clause is
//! spelled:
//!
//! - Expression trees for conditions, select lists and assignments
//! - Inline literals or placeholders with an argument list
//! - A registry of dialect adapters keyed by name
//! - A SQL Server adapter that pages with `OFFSET ... FETCH NEXT`
//!
//! # Quick Start
//!
//! ```
//! use sqlweave::prelude::*;
//!
//! sqlweave::init();
//!
//! let ds = Dialect::named("mssql").from("entry");
//! let (sql, args) = ds
//!     .prepared(true)
//!     .where_(Expr::col("int").eq(10))
//!     .order(vec![Expr::col("id").asc()])
//!     .to_select_sql()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM \"entry\" WHERE (\"int\" = ?1) ORDER BY \"id\" ASC");
//! assert_eq!(args, vec![Value::Int(10)]);
//! ```
//!
//! Dialects nobody registered fall back to the default adapter, which uses
//! ANSI quoting with `LIMIT`/`OFFSET` and `RETURNING`.

use std::sync::Once;

pub use sqlweave_core::{
    BuildError, BuildErrorKind, ConfigError, Error, Feature, Result, UnsupportedError, Value,
    quote_ident, quote_ident_with,
};

pub use sqlweave_query::{
    Adapter, AdapterConfig, AdapterFactory, BooleanOp, ConflictExpr, Dataset, DefaultAdapter,
    Dialect, Expr, Identifier, NullSortType, OrderedExpr, RangeOp, Record, SortDirection,
    SqlBuilder, base, has_adapter, new_adapter, register_adapter, register_config,
    registered_adapters,
};

pub use sqlweave_mssql::{MssqlAdapter, mssql_config};

/// The SQL Server dialect.
pub mod mssql {
    pub use sqlweave_mssql::{MssqlAdapter, NAME, mssql_config, register};
}

static INIT: Once = Once::new();

/// Register every built-in dialect adapter. Later calls do nothing.
pub fn init() {
    INIT.call_once(|| {
        sqlweave_mssql::register();
        tracing::debug!(adapters = ?registered_adapters(), "Built-in adapters registered");
    });
}

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        Adapter, AdapterConfig, ConflictExpr, Dataset, Dialect, Error, Expr, OrderedExpr, Record,
        Result, Value,
    };
}
