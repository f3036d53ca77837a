//! Base fragment callbacks.
//!
//! These are the behaviours every [`Adapter`] inherits. They are free
//! functions so an adapter that overrides a callback can still fall back to
//! the base rendering for the cases it does not change.

use sqlweave_core::{Error, Feature, Result, Value};

use crate::adapter::Adapter;
use crate::builder::SqlBuilder;
use crate::expr::{ConflictExpr, Expr, Identifier, OrderedExpr, Record};
use crate::render;

/// `INSERT INTO`, or the insert-ignore clause when the dialect spells
/// `DO NOTHING` that way.
pub fn insert_begin_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    conflict: Option<&ConflictExpr>,
) -> Result<()> {
    let config = adapter.config();
    if adapter.supports_insert_ignore_syntax() && matches!(conflict, Some(ConflictExpr::DoNothing)) {
        buf.write_str(&config.insert_ignore_clause);
    } else {
        buf.write_str(&config.insert_clause);
    }
    Ok(())
}

/// ` ORDER BY a ASC, b DESC`; nothing for an empty list.
pub fn order_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    order: &[OrderedExpr],
) -> Result<()> {
    if order.is_empty() {
        return Ok(());
    }
    let config = adapter.config();
    buf.write_str(&config.order_by_fragment);
    for (i, term) in order.iter().enumerate() {
        if i > 0 {
            buf.write_str(", ");
        }
        render::write_ordered(config, buf, term)?;
    }
    Ok(())
}

/// ` LIMIT n` when a limit is set.
pub fn limit_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    limit: Option<u64>,
) -> Result<()> {
    if let Some(limit) = limit {
        buf.write_str(&adapter.config().limit_fragment);
        adapter.literal_value(buf, &Value::from_u64_clamped(limit))?;
    }
    Ok(())
}

/// ` OFFSET n` when `n > 0`.
pub fn offset_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    offset: u64,
) -> Result<()> {
    if offset > 0 {
        buf.write_str(&adapter.config().offset_fragment);
        adapter.literal_value(buf, &Value::from_u64_clamped(offset))?;
    }
    Ok(())
}

/// ` RETURNING a, b`; an error when the dialect has no RETURNING.
pub fn returning_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    returning: &[Expr],
) -> Result<()> {
    if returning.is_empty() {
        return Ok(());
    }
    if !adapter.supports_returning() {
        return Err(Error::unsupported(adapter.name(), Feature::Returning));
    }
    buf.write_str(&adapter.config().returning_fragment);
    write_expr_list(adapter, buf, returning)
}

/// ` ON CONFLICT [(target)] DO NOTHING | DO UPDATE SET ... [WHERE ...]`.
pub fn on_conflict_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    conflict: Option<&ConflictExpr>,
) -> Result<()> {
    let Some(conflict) = conflict else {
        return Ok(());
    };
    let config = adapter.config();

    match conflict {
        ConflictExpr::DoNothing => {
            // Already expressed by the insert-ignore clause.
            if adapter.supports_insert_ignore_syntax() {
                return Ok(());
            }
            buf.write_str(&config.conflict_fragment);
            buf.write_str(&config.conflict_do_nothing_fragment);
        }
        ConflictExpr::DoUpdate {
            target,
            set,
            where_clause,
        } => {
            if target.is_some() && !adapter.supports_conflict_target() {
                return Err(Error::unsupported(adapter.name(), Feature::ConflictTarget));
            }
            if where_clause.is_some() && !adapter.supports_conflict_update_where() {
                return Err(Error::unsupported(
                    adapter.name(),
                    Feature::ConflictUpdateWhere,
                ));
            }

            buf.write_str(&config.conflict_fragment);
            if let Some(target) = target {
                buf.write_str(" (");
                buf.write_str(target);
                buf.write_char(')');
            }
            buf.write_str(&config.conflict_do_update_fragment);
            update_values_sql(adapter, buf, set)?;
            if let Some(condition) = where_clause {
                buf.write_str(" WHERE ");
                adapter.literal(buf, condition)?;
            }
        }
    }
    Ok(())
}

/// `"a"=1,"b"=2`
pub fn update_values_sql<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    set: &Record,
) -> Result<()> {
    for (i, (column, value)) in set.iter().enumerate() {
        if i > 0 {
            buf.write_char(',');
        }
        adapter.literal(buf, &Expr::Ident(Identifier::new(column)))?;
        buf.write_char('=');
        adapter.literal(buf, value)?;
    }
    Ok(())
}

/// `a, b, c` through the adapter's literal rendering.
pub fn write_expr_list<A: Adapter + ?Sized>(
    adapter: &A,
    buf: &mut SqlBuilder,
    exprs: &[Expr],
) -> Result<()> {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            buf.write_str(", ");
        }
        adapter.literal(buf, expr)?;
    }
    Ok(())
}
