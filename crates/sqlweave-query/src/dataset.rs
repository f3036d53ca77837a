//! Statement assembly.
//!
//! A [`Dataset`] records the clauses of a statement against one table and
//! renders SELECT, INSERT, UPDATE and DELETE statements through the adapter
//! registered for its dialect. Builder methods take `self` and return a new
//! dataset, so a base dataset can be cloned and specialized freely.
//!
//! # Example
//!
//! ```
//! use sqlweave_query::{Dialect, Expr};
//!
//! let ds = Dialect::named("default").from("entry");
//! let (sql, args) = ds
//!     .where_(Expr::col("int").gt(4))
//!     .order(vec![Expr::col("id").asc()])
//!     .limit(10)
//!     .to_select_sql()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM \"entry\" WHERE (\"int\" > 4) ORDER BY \"id\" ASC LIMIT 10"
//! );
//! assert!(args.is_empty());
//! ```

use std::fmt;

use sqlweave_core::{BuildErrorKind, Error, Result, Value};

use crate::adapter::Adapter;
use crate::builder::SqlBuilder;
use crate::expr::{ConflictExpr, Expr, Identifier, OrderedExpr, Record};
use crate::registry::new_adapter;

/// Handle on a registered dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    name: String,
}

impl Dialect {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a dataset over `table`.
    pub fn from(&self, table: &str) -> Dataset {
        Dataset::new(self.clone(), table)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Clauses of a statement against one table.
#[derive(Debug, Clone)]
pub struct Dataset {
    dialect: Dialect,
    table: Identifier,
    select: Vec<Expr>,
    conditions: Vec<Expr>,
    order: Vec<OrderedExpr>,
    limit: Option<u64>,
    offset: u64,
    returning: Vec<Expr>,
    prepared: bool,
}

impl Dataset {
    pub fn new(dialect: Dialect, table: &str) -> Self {
        Self {
            dialect,
            table: Identifier::new(table),
            select: Vec::new(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
            returning: Vec::new(),
            prepared: false,
        }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Replace the select list. An empty list selects `*`.
    pub fn select(mut self, columns: Vec<Expr>) -> Self {
        self.select = columns;
        self
    }

    /// Add a condition; repeated calls are ANDed together.
    pub fn where_(mut self, condition: Expr) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Replace the ORDER BY list.
    pub fn order(mut self, order: Vec<OrderedExpr>) -> Self {
        self.order = order;
        self
    }

    /// Append to the ORDER BY list.
    pub fn order_append(mut self, order: Vec<OrderedExpr>) -> Self {
        self.order.extend(order);
        self
    }

    pub fn clear_order(mut self) -> Self {
        self.order.clear();
        self
    }

    /// Limit the number of rows. `0` removes the limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn clear_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn returning(mut self, columns: Vec<Expr>) -> Self {
        self.returning = columns;
        self
    }

    /// Bind values as arguments instead of rendering them inline.
    pub fn prepared(mut self, prepared: bool) -> Self {
        self.prepared = prepared;
        self
    }

    fn start(&self) -> (Box<dyn Adapter>, SqlBuilder) {
        (new_adapter(&self.dialect.name), SqlBuilder::new(self.prepared))
    }

    fn write_table(&self, adapter: &dyn Adapter, buf: &mut SqlBuilder) -> Result<()> {
        adapter.literal(buf, &Expr::Ident(self.table.clone()))
    }

    fn write_where(&self, adapter: &dyn Adapter, buf: &mut SqlBuilder) -> Result<()> {
        if self.conditions.is_empty() {
            return Ok(());
        }
        buf.write_str(" WHERE ");
        adapter.literal(buf, &Expr::And(self.conditions.clone()))
    }

    fn write_select(&self, columns: &[Expr]) -> Result<(String, Vec<Value>)> {
        let (mut adapter, mut buf) = self.start();

        buf.write_str("SELECT ");
        if columns.is_empty() {
            buf.write_char('*');
        } else {
            crate::base::write_expr_list(&*adapter, &mut buf, columns)?;
        }
        buf.write_str(" FROM ");
        self.write_table(&*adapter, &mut buf)?;
        self.write_where(&*adapter, &mut buf)?;
        adapter.order_sql(&mut buf, &self.order)?;
        adapter.limit_sql(&mut buf, self.limit)?;
        adapter.offset_sql(&mut buf, self.offset)?;

        Ok(finish(&self.dialect, buf))
    }

    /// `SELECT ... FROM ...` with WHERE, ORDER BY, LIMIT and OFFSET.
    #[tracing::instrument(level = "trace", skip(self), fields(dialect = %self.dialect))]
    pub fn to_select_sql(&self) -> Result<(String, Vec<Value>)> {
        self.write_select(&self.select)
    }

    /// `SELECT COUNT(*) AS "count" FROM ...` with the dataset's clauses.
    #[tracing::instrument(level = "trace", skip(self), fields(dialect = %self.dialect))]
    pub fn to_count_sql(&self) -> Result<(String, Vec<Value>)> {
        self.write_select(&[Expr::count_star()])
    }

    #[tracing::instrument(level = "trace", skip(self, rows), fields(dialect = %self.dialect))]
    pub fn to_insert_sql(&self, rows: &[Record]) -> Result<(String, Vec<Value>)> {
        self.write_insert(None, rows)
    }

    /// Insert, skipping rows that hit a uniqueness conflict.
    #[tracing::instrument(level = "trace", skip(self, rows), fields(dialect = %self.dialect))]
    pub fn to_insert_ignore_sql(&self, rows: &[Record]) -> Result<(String, Vec<Value>)> {
        self.write_insert(Some(&ConflictExpr::DoNothing), rows)
    }

    #[tracing::instrument(level = "trace", skip(self, conflict, rows), fields(dialect = %self.dialect))]
    pub fn to_insert_conflict_sql(
        &self,
        conflict: &ConflictExpr,
        rows: &[Record],
    ) -> Result<(String, Vec<Value>)> {
        self.write_insert(Some(conflict), rows)
    }

    fn write_insert(
        &self,
        conflict: Option<&ConflictExpr>,
        rows: &[Record],
    ) -> Result<(String, Vec<Value>)> {
        let (mut adapter, mut buf) = self.start();

        adapter.insert_begin_sql(&mut buf, conflict)?;
        buf.write_char(' ');
        self.write_table(&*adapter, &mut buf)?;

        match rows.first() {
            Some(first) if !first.is_empty() => {
                let columns: Vec<&str> = first.columns().collect();
                buf.write_str(" (");
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        buf.write_str(", ");
                    }
                    adapter.literal(&mut buf, &Expr::Ident(Identifier::new(column)))?;
                }
                buf.write_str(") VALUES ");

                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        buf.write_str(", ");
                    }
                    let values = row_values(&columns, row, i)?;
                    buf.write_char('(');
                    crate::base::write_expr_list(&*adapter, &mut buf, &values)?;
                    buf.write_char(')');
                }
            }
            _ => {
                if rows.iter().any(|row| !row.is_empty()) {
                    return Err(mismatched_rows(0));
                }
                buf.write_str(&adapter.config().default_values_fragment);
            }
        }

        adapter.on_conflict_sql(&mut buf, conflict)?;
        adapter.returning_sql(&mut buf, &self.returning)?;

        Ok(finish(&self.dialect, buf))
    }

    /// `UPDATE ... SET "a"=1` with WHERE, and ORDER BY / LIMIT where the
    /// dialect allows them.
    #[tracing::instrument(level = "trace", skip(self, record), fields(dialect = %self.dialect))]
    pub fn to_update_sql(&self, record: &Record) -> Result<(String, Vec<Value>)> {
        if record.is_empty() {
            return Err(Error::build(
                BuildErrorKind::EmptyUpdate,
                "update requires at least one column",
            ));
        }
        let (mut adapter, mut buf) = self.start();

        buf.write_str("UPDATE ");
        self.write_table(&*adapter, &mut buf)?;
        buf.write_str(" SET ");
        crate::base::update_values_sql(&*adapter, &mut buf, record)?;
        self.write_where(&*adapter, &mut buf)?;

        if adapter.supports_order_by_on_update() {
            adapter.order_sql(&mut buf, &self.order)?;
        }
        if adapter.supports_limit_on_update() {
            adapter.limit_sql(&mut buf, self.limit)?;
            adapter.offset_sql(&mut buf, 0)?;
        }
        adapter.returning_sql(&mut buf, &self.returning)?;

        Ok(finish(&self.dialect, buf))
    }

    /// `DELETE FROM ...` with WHERE, and ORDER BY / LIMIT where the dialect
    /// allows them.
    #[tracing::instrument(level = "trace", skip(self), fields(dialect = %self.dialect))]
    pub fn to_delete_sql(&self) -> Result<(String, Vec<Value>)> {
        let (mut adapter, mut buf) = self.start();

        buf.write_str("DELETE FROM ");
        self.write_table(&*adapter, &mut buf)?;
        self.write_where(&*adapter, &mut buf)?;

        if adapter.supports_order_by_on_delete() {
            adapter.order_sql(&mut buf, &self.order)?;
        }
        if adapter.supports_limit_on_delete() {
            adapter.limit_sql(&mut buf, self.limit)?;
            adapter.offset_sql(&mut buf, 0)?;
        }
        adapter.returning_sql(&mut buf, &self.returning)?;

        Ok(finish(&self.dialect, buf))
    }
}

/// Values of `row` in the order of the first row's columns.
fn row_values(columns: &[&str], row: &Record, index: usize) -> Result<Vec<Expr>> {
    if row.len() != columns.len() {
        return Err(mismatched_rows(index));
    }
    columns
        .iter()
        .map(|column| {
            row.iter()
                .find(|(c, _)| c == column)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| mismatched_rows(index))
        })
        .collect()
}

fn mismatched_rows(index: usize) -> Error {
    Error::build(
        BuildErrorKind::MismatchedRows,
        format!("insert row {index} does not have the same columns as the first row"),
    )
}

fn finish(dialect: &Dialect, buf: SqlBuilder) -> (String, Vec<Value>) {
    let (sql, args) = buf.finish();
    tracing::trace!(dialect = %dialect, sql = %sql, args = args.len(), "Generated SQL");
    (sql, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds() -> Dataset {
        Dialect::named("dataset-test-default").from("entry")
    }

    #[test]
    fn select_star_and_columns() {
        let (sql, _) = ds().to_select_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM \"entry\"");

        let (sql, _) = ds()
            .select(vec![Expr::col("id"), Expr::col("float")])
            .to_select_sql()
            .unwrap();
        assert_eq!(sql, "SELECT \"id\", \"float\" FROM \"entry\"");
    }

    #[test]
    fn where_calls_are_anded() {
        let (sql, _) = ds()
            .where_(Expr::col("a").eq(1))
            .where_(Expr::col("b").eq(2))
            .to_select_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM \"entry\" WHERE ((\"a\" = 1) AND (\"b\" = 2))");
    }

    #[test]
    fn order_limit_offset() {
        let (sql, _) = ds()
            .order(vec![Expr::col("id").asc()])
            .order_append(vec![Expr::col("int").desc()])
            .limit(10)
            .offset(20)
            .to_select_sql()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"entry\" ORDER BY \"id\" ASC, \"int\" DESC LIMIT 10 OFFSET 20"
        );

        let (sql, _) = ds().limit(10).limit(0).to_select_sql().unwrap();
        assert_eq!(sql, "SELECT * FROM \"entry\"");
    }

    #[test]
    fn count() {
        let (sql, _) = ds().where_(Expr::col("int").gt(4)).to_count_sql().unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS \"count\" FROM \"entry\" WHERE (\"int\" > 4)"
        );
    }

    #[test]
    fn prepared_select() {
        let (sql, args) = ds()
            .prepared(true)
            .where_(Expr::col("int").eq(10))
            .limit(5)
            .to_select_sql()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM \"entry\" WHERE (\"int\" = ?) LIMIT ?");
        assert_eq!(args, vec![Value::Int(10), Value::BigInt(5)]);
    }

    #[test]
    fn insert_rows() {
        let rows = [
            Record::new().set("int", 10).set("string", "a"),
            Record::new().set("string", "b").set("int", 11),
        ];
        let (sql, _) = ds().to_insert_sql(&rows).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"entry\" (\"int\", \"string\") VALUES (10, 'a'), (11, 'b')"
        );
    }

    #[test]
    fn insert_without_columns_uses_default_values() {
        let (sql, _) = ds().to_insert_sql(&[]).unwrap();
        assert_eq!(sql, "INSERT INTO \"entry\" DEFAULT VALUES");
    }

    #[test]
    fn insert_rows_must_match() {
        let rows = [
            Record::new().set("int", 10),
            Record::new().set("float", 1.5),
        ];
        let err = ds().to_insert_sql(&rows).unwrap_err();
        assert!(matches!(err, Error::Build(ref e) if e.kind == BuildErrorKind::MismatchedRows));
    }

    #[test]
    fn insert_conflict_and_returning() {
        let rows = [Record::new().set("int", 10)];
        let (sql, _) = ds()
            .returning(vec![Expr::col("id")])
            .to_insert_ignore_sql(&rows)
            .unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"entry\" (\"int\") VALUES (10) ON CONFLICT DO NOTHING RETURNING \"id\""
        );
    }

    #[test]
    fn update_and_delete() {
        let (sql, _) = ds()
            .where_(Expr::col("id").eq(9))
            .order(vec![Expr::col("id").asc()])
            .limit(1)
            .to_update_sql(&Record::new().set("int", 11).set("bool", true))
            .unwrap();
        assert_eq!(
            sql,
            "UPDATE \"entry\" SET \"int\"=11,\"bool\"=TRUE WHERE (\"id\" = 9)"
        );

        let (sql, _) = ds().where_(Expr::col("id").eq(9)).to_delete_sql().unwrap();
        assert_eq!(sql, "DELETE FROM \"entry\" WHERE (\"id\" = 9)");
    }

    #[test]
    fn update_requires_assignments() {
        let err = ds().to_update_sql(&Record::new()).unwrap_err();
        assert!(matches!(err, Error::Build(ref e) if e.kind == BuildErrorKind::EmptyUpdate));
    }
}
