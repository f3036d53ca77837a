//! Literal rendering of expressions and values for a dialect configuration.

use std::fmt::{self, Write as _};

use chrono::NaiveTime;
use sqlweave_core::{BuildErrorKind, Error, Result, Value, quote_ident_with};

use crate::builder::SqlBuilder;
use crate::config::AdapterConfig;
use crate::expr::{BooleanOp, Expr, Identifier, NullSortType, OrderedExpr, SortDirection};

/// Render an expression into the buffer.
pub fn write_expr(config: &AdapterConfig, buf: &mut SqlBuilder, expr: &Expr) -> Result<()> {
    match expr {
        Expr::Ident(ident) => {
            write_identifier(config, buf, ident);
            Ok(())
        }
        Expr::Value(value) => write_value(config, buf, value),
        Expr::Literal { sql, args } => write_literal(config, buf, sql, args),
        Expr::Boolean { op, lhs, rhs } => write_boolean(config, buf, *op, lhs, rhs),
        Expr::Range {
            op,
            lhs,
            start,
            end,
        } => {
            buf.write_char('(');
            write_expr(config, buf, lhs)?;
            buf.write_char(' ');
            buf.write_str(op.token());
            buf.write_char(' ');
            write_expr(config, buf, start)?;
            buf.write_str(" AND ");
            write_expr(config, buf, end)?;
            buf.write_char(')');
            Ok(())
        }
        Expr::List(items) => {
            buf.write_char('(');
            write_list(config, buf, items)?;
            buf.write_char(')');
            Ok(())
        }
        Expr::And(items) => write_junction(config, buf, items, " AND "),
        Expr::Or(items) => write_junction(config, buf, items, " OR "),
        Expr::Aliased { expr, alias } => {
            write_expr(config, buf, expr)?;
            buf.write_str(" AS ");
            write_identifier(config, buf, alias);
            Ok(())
        }
        Expr::Star => {
            buf.write_char('*');
            Ok(())
        }
    }
}

/// Render `a, b, c`.
pub fn write_list(config: &AdapterConfig, buf: &mut SqlBuilder, items: &[Expr]) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.write_str(", ");
        }
        write_expr(config, buf, item)?;
    }
    Ok(())
}

/// Render one ORDER BY term.
pub fn write_ordered(
    config: &AdapterConfig,
    buf: &mut SqlBuilder,
    ordered: &OrderedExpr,
) -> Result<()> {
    write_expr(config, buf, &ordered.expr)?;
    buf.write_str(match ordered.direction {
        SortDirection::Asc => " ASC",
        SortDirection::Desc => " DESC",
    });
    if let Some(nulls) = ordered.nulls {
        buf.write_str(match nulls {
            NullSortType::First => " NULLS FIRST",
            NullSortType::Last => " NULLS LAST",
        });
    }
    Ok(())
}

pub fn write_identifier(config: &AdapterConfig, buf: &mut SqlBuilder, ident: &Identifier) {
    for (i, part) in ident.parts().iter().enumerate() {
        if i > 0 {
            buf.write_char('.');
        }
        if part == "*" {
            buf.write_char('*');
        } else {
            buf.write_str(&quote_ident_with(part, config.quote_rune));
        }
    }
}

/// Render a value inline, or as a placeholder when the buffer is prepared.
///
/// `NULL` and `DEFAULT` are always written as keywords.
pub fn write_value(config: &AdapterConfig, buf: &mut SqlBuilder, value: &Value) -> Result<()> {
    if let Value::Array(items) = value {
        buf.write_char('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                buf.write_str(", ");
            }
            write_value(config, buf, item)?;
        }
        buf.write_char(')');
        return Ok(());
    }

    if buf.is_prepared() && !value.is_keyword() {
        let index = buf.push_arg(value.clone());
        write_placeholder(config, buf, index);
        return Ok(());
    }

    write_inline_value(config, buf, value)
}

pub fn write_placeholder(config: &AdapterConfig, buf: &mut SqlBuilder, index: usize) {
    buf.write_char(config.placeholder_rune);
    if config.include_placeholder_num {
        buf.write_str(&index.to_string());
    }
}

fn write_inline_value(config: &AdapterConfig, buf: &mut SqlBuilder, value: &Value) -> Result<()> {
    match value {
        Value::Null => buf.write_str(&config.null_literal),
        Value::Default => buf.write_str("DEFAULT"),
        Value::Bool(b) => buf.write_str(config.bool_literal(*b)),
        Value::TinyInt(v) => buf.write_str(&v.to_string()),
        Value::SmallInt(v) => buf.write_str(&v.to_string()),
        Value::Int(v) => buf.write_str(&v.to_string()),
        Value::BigInt(v) => buf.write_str(&v.to_string()),
        Value::Float(v) => write_float(buf, f64::from(*v), &v.to_string())?,
        Value::Double(v) => write_float(buf, *v, &v.to_string())?,
        Value::Decimal(s) => buf.write_str(s),
        Value::Text(s) => write_string(config, buf, s),
        Value::Bytes(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                Error::build(
                    BuildErrorKind::InvalidValue,
                    format!("bytes value is not valid UTF-8: {e}"),
                )
            })?;
            write_string(config, buf, text);
        }
        Value::Date(_) => {
            let date = value.as_date().ok_or_else(|| invalid(value))?;
            let text = format_temporal(value, date.format(&config.date_format))?;
            write_string(config, buf, &text);
        }
        Value::Time(micros) => {
            let time = time_of_day(*micros).ok_or_else(|| invalid(value))?;
            write_string(config, buf, &time.format("%H:%M:%S%.f").to_string());
        }
        Value::Timestamp(_) => {
            let ts = value.as_datetime().ok_or_else(|| invalid(value))?;
            let text = format_temporal(value, ts.format(&config.time_format))?;
            write_string(config, buf, &text);
        }
        Value::Uuid(bytes) => write_string(config, buf, &format_uuid(bytes)),
        Value::Array(items) => {
            buf.write_char('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.write_str(", ");
                }
                write_inline_value(config, buf, item)?;
            }
            buf.write_char(')');
        }
    }
    Ok(())
}

/// Chrono reports an unusable pattern as a formatting error at write time.
fn format_temporal(value: &Value, formatted: impl fmt::Display) -> Result<String> {
    let mut text = String::new();
    write!(text, "{formatted}").map_err(|_| {
        Error::build(
            BuildErrorKind::InvalidValue,
            format!(
                "cannot format {} value {value:?} with the configured pattern",
                value.type_name()
            ),
        )
    })?;
    Ok(text)
}

fn write_float(buf: &mut SqlBuilder, v: f64, text: &str) -> Result<()> {
    if !v.is_finite() {
        return Err(Error::build(
            BuildErrorKind::InvalidValue,
            format!("cannot render non-finite float {text}"),
        ));
    }
    buf.write_str(text);
    Ok(())
}

/// Quote a string literal, replacing every configured escape rune.
pub fn write_string(config: &AdapterConfig, buf: &mut SqlBuilder, s: &str) {
    buf.write_char(config.string_quote);
    for c in s.chars() {
        match config.escaped_runes.get(&c) {
            Some(escaped) => buf.write_str(escaped),
            None => buf.write_char(c),
        }
    }
    buf.write_char(config.string_quote);
}

/// Placeholders inside quoted strings of the raw SQL are left alone.
fn write_literal(
    config: &AdapterConfig,
    buf: &mut SqlBuilder,
    sql: &str,
    args: &[Expr],
) -> Result<()> {
    let positions = placeholder_positions(sql, config.string_quote);
    let expected = positions.len();
    if expected != args.len() {
        return Err(Error::build(
            BuildErrorKind::LiteralArity,
            format!(
                "literal {sql:?} has {expected} placeholder(s) but {} argument(s)",
                args.len()
            ),
        ));
    }

    let mut last = 0;
    for (pos, arg) in positions.into_iter().zip(args) {
        buf.write_str(&sql[last..pos]);
        write_expr(config, buf, arg)?;
        last = pos + 1;
    }
    buf.write_str(&sql[last..]);
    Ok(())
}

/// Byte offsets of `?` outside quoted strings. A doubled quote stays quoted.
fn placeholder_positions(sql: &str, quote: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut quoted = false;
    for (pos, c) in sql.char_indices() {
        if c == quote {
            quoted = !quoted;
        } else if c == '?' && !quoted {
            positions.push(pos);
        }
    }
    positions
}

fn write_boolean(
    config: &AdapterConfig,
    buf: &mut SqlBuilder,
    op: BooleanOp,
    lhs: &Expr,
    rhs: &Expr,
) -> Result<()> {
    buf.write_char('(');
    write_expr(config, buf, lhs)?;
    buf.write_char(' ');

    match (op, rhs) {
        (BooleanOp::Is | BooleanOp::IsNot, Expr::Value(Value::Bool(b))) => {
            if config.use_literal_is_bools {
                buf.write_str(config.operator_token(op));
                buf.write_str(if *b { " TRUE" } else { " FALSE" });
            } else {
                // Dialects without boolean IS compare against their literal.
                let cmp = if op == BooleanOp::Is {
                    BooleanOp::Eq
                } else {
                    BooleanOp::Neq
                };
                buf.write_str(config.operator_token(cmp));
                buf.write_char(' ');
                buf.write_str(config.bool_literal(*b));
            }
        }
        _ => {
            buf.write_str(config.operator_token(op));
            buf.write_char(' ');
            write_expr(config, buf, rhs)?;
        }
    }

    buf.write_char(')');
    Ok(())
}

fn write_junction(
    config: &AdapterConfig,
    buf: &mut SqlBuilder,
    items: &[Expr],
    joiner: &str,
) -> Result<()> {
    match items {
        [] => Ok(()),
        [single] => write_expr(config, buf, single),
        _ => {
            buf.write_char('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.write_str(joiner);
                }
                write_expr(config, buf, item)?;
            }
            buf.write_char(')');
            Ok(())
        }
    }
}

fn time_of_day(micros: i64) -> Option<NaiveTime> {
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok()?;
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
}

fn format_uuid(bytes: &[u8; 16]) -> String {
    let mut out = String::with_capacity(36);
    for (i, b) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        out.push_str(&format!("{b:02x}"));
    }
    out
}

fn invalid(value: &Value) -> Error {
    Error::build(
        BuildErrorKind::InvalidValue,
        format!("{} value {value:?} is out of range", value.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(config: &AdapterConfig, expr: &Expr) -> String {
        let mut buf = SqlBuilder::new(false);
        write_expr(config, &mut buf, expr).unwrap();
        buf.finish().0
    }

    #[test]
    fn boolean_expressions_are_parenthesized() {
        let config = AdapterConfig::default();
        assert_eq!(render(&config, &Expr::col("int").eq(10)), "(\"int\" = 10)");
        assert_eq!(
            render(&config, &Expr::col("e.id").gte(3)),
            "(\"e\".\"id\" >= 3)"
        );
    }

    #[test]
    fn or_of_two_conditions() {
        let config = AdapterConfig::default();
        let expr = Expr::or_all(vec![
            Expr::col("col1").neq(1),
            Expr::col("col2").not_in(vec!["a", "b", "c"]),
        ]);
        assert_eq!(
            render(&config, &expr),
            "((\"col1\" != 1) OR (\"col2\" NOT IN ('a', 'b', 'c')))"
        );
    }

    #[test]
    fn single_element_junction_is_bare() {
        let config = AdapterConfig::default();
        let expr = Expr::and_all(vec![Expr::col("a").is_null()]);
        assert_eq!(render(&config, &expr), "(\"a\" IS NULL)");
    }

    #[test]
    fn between_and_alias() {
        let config = AdapterConfig::default();
        assert_eq!(
            render(&config, &Expr::col("int").between(3, 6)),
            "(\"int\" BETWEEN 3 AND 6)"
        );
        assert_eq!(render(&config, &Expr::count_star()), "COUNT(*) AS \"count\"");
        assert_eq!(render(&config, &Expr::col("entry.*")), "\"entry\".*");
    }

    #[test]
    fn is_true_uses_keywords_by_default() {
        let config = AdapterConfig::default();
        assert_eq!(render(&config, &Expr::col("bool").is_true()), "(\"bool\" IS TRUE)");
        assert_eq!(
            render(&config, &Expr::col("bool").is_not_false()),
            "(\"bool\" IS NOT FALSE)"
        );
    }

    #[test]
    fn is_true_compares_against_literal_without_keyword_support() {
        let config = AdapterConfig {
            use_literal_is_bools: false,
            true_literal: "1".to_string(),
            false_literal: "0".to_string(),
            ..AdapterConfig::default()
        };
        assert_eq!(render(&config, &Expr::col("bool").is_true()), "(\"bool\" = 1)");
        assert_eq!(render(&config, &Expr::col("bool").is_not_false()), "(\"bool\" != 0)");
        assert_eq!(render(&config, &Expr::col("bool").is_null()), "(\"bool\" IS NULL)");
    }

    #[test]
    fn strings_are_escaped() {
        let config = AdapterConfig::default();
        assert_eq!(render(&config, &Expr::value("it's")), "'it''s'");
    }

    #[test]
    fn temporal_values_use_configured_formats() {
        let config = AdapterConfig {
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            ..AdapterConfig::default()
        };
        let ts = Value::Timestamp(1_424_629_195_000_000);
        assert_eq!(render(&config, &Expr::Value(ts)), "'2015-02-22 18:19:55'");
        assert_eq!(render(&config, &Expr::Value(Value::Date(0))), "'1970-01-01'");
        assert_eq!(
            render(&config, &Expr::Value(Value::Time(3_600_000_000))),
            "'01:00:00'"
        );
    }

    #[test]
    fn unusable_temporal_patterns_are_build_errors() {
        let config = AdapterConfig {
            time_format: "%Y-%Q".to_string(),
            date_format: "%Y-%m-%d %H".to_string(),
            ..AdapterConfig::default()
        };
        for value in [Value::Timestamp(0), Value::Date(0)] {
            let mut buf = SqlBuilder::new(false);
            let err = write_value(&config, &mut buf, &value).unwrap_err();
            assert!(matches!(err, Error::Build(ref e) if e.kind == BuildErrorKind::InvalidValue));
            assert!(err.to_string().contains("configured pattern"));
        }
    }

    #[test]
    fn bytes_must_be_utf8() {
        let config = AdapterConfig::default();
        assert_eq!(render(&config, &Expr::value(b"0.1".to_vec())), "'0.1'");

        let mut buf = SqlBuilder::new(false);
        let err = write_value(&config, &mut buf, &Value::Bytes(vec![0xff, 0x41])).unwrap_err();
        assert!(matches!(err, Error::Build(ref e) if e.kind == BuildErrorKind::InvalidValue));
    }

    #[test]
    fn floats_and_uuids() {
        let config = AdapterConfig::default();
        assert_eq!(render(&config, &Expr::value(0.1_f64)), "0.1");
        assert_eq!(render(&config, &Expr::value(1.0_f64)), "1");
        let uuid = Value::Uuid([
            0x67, 0xe5, 0x50, 0x44, 0x10, 0xb1, 0x42, 0x6f, 0x92, 0x47, 0xbb, 0x68, 0x0e, 0x5f,
            0xe0, 0xc8,
        ]);
        assert_eq!(
            render(&config, &Expr::Value(uuid)),
            "'67e55044-10b1-426f-9247-bb680e5fe0c8'"
        );

        let mut buf = SqlBuilder::new(false);
        let err = write_value(&config, &mut buf, &Value::Double(f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::Build(ref e) if e.kind == BuildErrorKind::InvalidValue));
    }

    #[test]
    fn prepared_values_become_numbered_placeholders() {
        let config = AdapterConfig {
            include_placeholder_num: true,
            ..AdapterConfig::default()
        };
        let mut buf = SqlBuilder::new(true);
        let expr = Expr::col("int")
            .in_list(vec![1, 2])
            .and(Expr::col("name").is_null());
        write_expr(&config, &mut buf, &expr).unwrap();

        let (sql, args) = buf.finish();
        assert_eq!(sql, "((\"int\" IN (?1, ?2)) AND (\"name\" IS NULL))");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn literal_substitutes_arguments() {
        let config = AdapterConfig::default();
        let expr = Expr::literal("? = ?", vec![Expr::col("int"), 10.into()]);
        assert_eq!(render(&config, &expr), "\"int\" = 10");
    }

    #[test]
    fn literal_arity_mismatch_is_an_error() {
        let config = AdapterConfig::default();
        let mut buf = SqlBuilder::new(false);
        let err = write_expr(
            &config,
            &mut buf,
            &Expr::literal("? = ?", vec![Expr::col("int")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Build(ref e) if e.kind == BuildErrorKind::LiteralArity));
    }

    #[test]
    fn literal_skips_question_marks_in_strings() {
        let config = AdapterConfig::default();
        assert_eq!(render(&config, &Expr::raw("x = '?'")), "x = '?'");
        let expr = Expr::literal(
            "a = 'it''s?' AND b = ?",
            vec![Expr::value(2)],
        );
        assert_eq!(render(&config, &expr), "a = 'it''s?' AND b = 2");
    }
}
