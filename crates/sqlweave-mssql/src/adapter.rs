//! The SQL Server adapter.
//!
//! SQL Server (2012 and later) pages results with
//!
//! ```text
//! SELECT ... ORDER BY <cols> OFFSET <offset> ROWS FETCH NEXT <limit> ROWS ONLY
//! ```
//!
//! where `OFFSET` requires an `ORDER BY` and `FETCH NEXT` requires `OFFSET`.
//! The builder emits ORDER BY, then LIMIT, then OFFSET, so the adapter
//! remembers the first two and writes the whole paging clause from
//! [`offset_sql`](Adapter::offset_sql), ordering by the first column when
//! the statement has no ORDER BY of its own.

use sqlweave_core::{Error, Feature, Result, Value};
use sqlweave_query::{Adapter, AdapterConfig, ConflictExpr, Expr, OrderedExpr, SqlBuilder, base};

use crate::config::mssql_config;
use crate::NAME;

/// Fragment callbacks for SQL Server. Create one per statement.
#[derive(Debug, Clone)]
pub struct MssqlAdapter {
    config: AdapterConfig,
    /// A non-empty ORDER BY has been written
    ordered: bool,
    limit: Option<u64>,
}

impl MssqlAdapter {
    pub fn new() -> Self {
        Self::with_config(mssql_config())
    }

    /// An adapter with the SQL Server callbacks over a custom table.
    pub fn with_config(config: AdapterConfig) -> Self {
        Self {
            config,
            ordered: false,
            limit: None,
        }
    }
}

impl Default for MssqlAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for MssqlAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn order_sql(&mut self, buf: &mut SqlBuilder, order: &[OrderedExpr]) -> Result<()> {
        self.ordered = !order.is_empty();
        base::order_sql(&*self, buf, order)
    }

    fn limit_sql(&mut self, _buf: &mut SqlBuilder, limit: Option<u64>) -> Result<()> {
        self.limit = limit;
        Ok(())
    }

    fn offset_sql(&mut self, buf: &mut SqlBuilder, offset: u64) -> Result<()> {
        if self.limit.is_none() && offset == 0 {
            return Ok(());
        }

        if !self.ordered {
            buf.write_str(&self.config.order_by_fragment);
            buf.write_char('1');
        }

        buf.write_str(" OFFSET ");
        self.literal_value(buf, &Value::from_u64_clamped(offset))?;
        buf.write_str(" ROWS");

        if let Some(limit) = self.limit {
            buf.write_str(" FETCH NEXT ");
            self.literal_value(buf, &Value::from_u64_clamped(limit))?;
            buf.write_str(" ROWS ONLY");
        }
        Ok(())
    }

    fn returning_sql(&mut self, _buf: &mut SqlBuilder, returning: &[Expr]) -> Result<()> {
        if returning.is_empty() {
            Ok(())
        } else {
            Err(Error::unsupported(NAME, Feature::Returning))
        }
    }

    fn on_conflict_sql(
        &mut self,
        _buf: &mut SqlBuilder,
        conflict: Option<&ConflictExpr>,
    ) -> Result<()> {
        match conflict {
            Some(_) => Err(Error::unsupported(NAME, Feature::OnConflict)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlweave_query::Record;

    fn paging(order: &[OrderedExpr], limit: Option<u64>, offset: u64) -> String {
        let mut adapter = MssqlAdapter::new();
        let mut buf = SqlBuilder::new(false);
        adapter.order_sql(&mut buf, order).unwrap();
        adapter.limit_sql(&mut buf, limit).unwrap();
        adapter.offset_sql(&mut buf, offset).unwrap();
        buf.finish().0
    }

    #[test]
    fn limit_without_order_orders_by_first_column() {
        assert_eq!(
            paging(&[], Some(10), 0),
            " ORDER BY 1 OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn offset_without_limit() {
        assert_eq!(paging(&[], None, 5), " ORDER BY 1 OFFSET 5 ROWS");
    }

    #[test]
    fn existing_order_is_kept() {
        let order = [Expr::col("col6").desc()];
        assert_eq!(
            paging(&order, Some(10), 20),
            " ORDER BY \"col6\" DESC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn offset_without_limit_keeps_existing_order() {
        let order = [Expr::col("id").asc()];
        assert_eq!(paging(&order, None, 5), " ORDER BY \"id\" ASC OFFSET 5 ROWS");
    }

    #[test]
    fn no_paging_emits_only_the_order() {
        assert_eq!(paging(&[], None, 0), "");
        let order = [Expr::col("id").asc()];
        assert_eq!(paging(&order, None, 0), " ORDER BY \"id\" ASC");
    }

    #[test]
    fn limit_alone_writes_nothing() {
        let mut adapter = MssqlAdapter::new();
        let mut buf = SqlBuilder::new(false);
        adapter.limit_sql(&mut buf, Some(3)).unwrap();
        assert_eq!(buf.sql(), "");
    }

    #[test]
    fn prepared_paging_binds_offset_and_limit() {
        let mut adapter = MssqlAdapter::new();
        let mut buf = SqlBuilder::new(true);
        adapter.limit_sql(&mut buf, Some(10)).unwrap();
        adapter.offset_sql(&mut buf, 0).unwrap();

        let (sql, args) = buf.finish();
        assert_eq!(sql, " ORDER BY 1 OFFSET ?1 ROWS FETCH NEXT ?2 ROWS ONLY");
        assert_eq!(args, vec![Value::BigInt(0), Value::BigInt(10)]);
    }

    #[test]
    fn returning_is_rejected() {
        let mut adapter = MssqlAdapter::new();
        let mut buf = SqlBuilder::new(false);
        assert!(adapter.returning_sql(&mut buf, &[]).is_ok());

        let err = adapter
            .returning_sql(&mut buf, &[Expr::star()])
            .unwrap_err();
        assert_eq!(err.to_string(), "mssql-adapter does not support \"RETURNING\"");
        assert_eq!(buf.sql(), "");
    }

    #[test]
    fn every_conflict_is_rejected() {
        let mut adapter = MssqlAdapter::new();
        let mut buf = SqlBuilder::new(false);
        assert!(adapter.on_conflict_sql(&mut buf, None).is_ok());

        let update = ConflictExpr::do_update("int", Record::new().set("a", 1));
        for conflict in [ConflictExpr::do_nothing(), update] {
            let err = adapter
                .on_conflict_sql(&mut buf, Some(&conflict))
                .unwrap_err();
            assert!(err.is_unsupported());
            assert_eq!(
                err.to_string(),
                "mssql-adapter does not support \"ON CONFLICT\""
            );
        }
    }
}
