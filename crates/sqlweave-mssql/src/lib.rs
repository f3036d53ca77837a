//! Microsoft SQL Server dialect for sqlweave.
//!
//! SQL Server lacks `LIMIT`, `RETURNING` and `ON CONFLICT`. This crate
//! supplies the configuration table and the callback overrides that turn
//! the builder's generic clauses into T-SQL:
//!
//! - paging becomes `OFFSET n ROWS FETCH NEXT m ROWS ONLY`, with a synthetic
//!   `ORDER BY 1` when the statement has no ordering
//! - booleans render as `1`/`0` and `IS TRUE` becomes `= 1`
//! - RETURNING and ON CONFLICT (including insert-ignore) are refused with
//!   an unsupported-feature error
//!
//! # Example
//!
//! ```
//! use sqlweave_query::{Dialect, Expr};
//!
//! sqlweave_mssql::register();
//!
//! let (sql, _) = Dialect::named(sqlweave_mssql::NAME)
//!     .from("entry")
//!     .where_(Expr::col("int").neq(1))
//!     .limit(10)
//!     .to_select_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM \"entry\" WHERE (\"int\" <> 1) ORDER BY 1 OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
//! );
//! ```

pub mod adapter;
pub mod config;

pub use adapter::MssqlAdapter;
pub use config::mssql_config;

/// Dialect name the adapter registers under.
pub const NAME: &str = "mssql";

/// Register the SQL Server adapter. Calling this again re-registers the
/// same factory.
pub fn register() {
    sqlweave_query::register_adapter(NAME, || Box::new(MssqlAdapter::new()));
    tracing::debug!(dialect = NAME, "SQL Server adapter ready");
}
