//! The dialect seam.
//!
//! Statement assembly in [`Dataset`](crate::Dataset) is dialect neutral; for
//! every clause whose spelling differs between databases it calls back into
//! an [`Adapter`]. The provided methods implement the base behaviour from
//! [`base`](crate::base) and the adapter's [`AdapterConfig`], so a dialect
//! only overrides the callbacks it spells differently.

use std::fmt;

use sqlweave_core::{Result, Value};

use crate::base;
use crate::builder::SqlBuilder;
use crate::config::AdapterConfig;
use crate::expr::{ConflictExpr, Expr, OrderedExpr};
use crate::render;

/// Fragment generation for one SQL dialect.
///
/// One adapter instance serves one statement, so callbacks take `&mut self`
/// and may carry state from one clause to the next (for example whether an
/// ORDER BY has already been written).
pub trait Adapter: Send + fmt::Debug {
    /// Dialect name used in error messages.
    fn name(&self) -> &str;

    fn config(&self) -> &AdapterConfig;

    fn supports_returning(&self) -> bool {
        self.config().supports_returning
    }

    fn supports_limit_on_update(&self) -> bool {
        self.config().supports_limit_on_update
    }

    fn supports_limit_on_delete(&self) -> bool {
        self.config().supports_limit_on_delete
    }

    fn supports_order_by_on_update(&self) -> bool {
        self.config().supports_order_by_on_update
    }

    fn supports_order_by_on_delete(&self) -> bool {
        self.config().supports_order_by_on_delete
    }

    fn supports_conflict_target(&self) -> bool {
        self.config().conflict_target_supported
    }

    fn supports_conflict_update_where(&self) -> bool {
        self.config().conflict_update_where_supported
    }

    fn supports_insert_ignore_syntax(&self) -> bool {
        self.config().insert_ignore_syntax_supported
    }

    /// Render an expression.
    fn literal(&self, buf: &mut SqlBuilder, expr: &Expr) -> Result<()> {
        render::write_expr(self.config(), buf, expr)
    }

    /// Render a single value, bound as an argument in prepared mode.
    fn literal_value(&self, buf: &mut SqlBuilder, value: &Value) -> Result<()> {
        render::write_value(self.config(), buf, value)
    }

    fn insert_begin_sql(
        &mut self,
        buf: &mut SqlBuilder,
        conflict: Option<&ConflictExpr>,
    ) -> Result<()> {
        base::insert_begin_sql(&*self, buf, conflict)
    }

    fn order_sql(&mut self, buf: &mut SqlBuilder, order: &[OrderedExpr]) -> Result<()> {
        base::order_sql(&*self, buf, order)
    }

    fn limit_sql(&mut self, buf: &mut SqlBuilder, limit: Option<u64>) -> Result<()> {
        base::limit_sql(&*self, buf, limit)
    }

    /// Called after [`limit_sql`](Adapter::limit_sql) whenever a limit may
    /// have been passed, with `0` when no offset is set.
    fn offset_sql(&mut self, buf: &mut SqlBuilder, offset: u64) -> Result<()> {
        base::offset_sql(&*self, buf, offset)
    }

    fn returning_sql(&mut self, buf: &mut SqlBuilder, returning: &[Expr]) -> Result<()> {
        base::returning_sql(&*self, buf, returning)
    }

    fn on_conflict_sql(
        &mut self,
        buf: &mut SqlBuilder,
        conflict: Option<&ConflictExpr>,
    ) -> Result<()> {
        base::on_conflict_sql(&*self, buf, conflict)
    }
}

/// An adapter that is nothing but a configuration table.
#[derive(Debug, Clone)]
pub struct DefaultAdapter {
    name: String,
    config: AdapterConfig,
}

impl DefaultAdapter {
    /// Adapter with the ANSI/Postgres defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, AdapterConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: AdapterConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

impl Adapter for DefaultAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }
}
