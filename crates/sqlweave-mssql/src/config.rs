//! SQL Server spelling table.

use std::collections::BTreeMap;

use sqlweave_query::{AdapterConfig, BooleanOp};

/// The configuration the SQL Server adapter hands to the base callbacks.
///
/// SQL Server has no boolean type, so `TRUE`/`FALSE` are the bit literals
/// `1`/`0` and `IS TRUE` is rewritten to a comparison. Conflict clauses are
/// blanked and their capabilities switched off. Returning, limit and
/// order-by capabilities stay on so the statement builder always routes
/// those clauses through [`MssqlAdapter`](crate::MssqlAdapter).
pub fn mssql_config() -> AdapterConfig {
    AdapterConfig {
        placeholder_rune: '?',
        include_placeholder_num: true,
        quote_rune: '"',
        string_quote: '\'',
        true_literal: "1".to_string(),
        false_literal: "0".to_string(),
        time_format: "%Y-%m-%d %H:%M:%S".to_string(),
        operator_lookup: operator_lookup(),
        escaped_runes: escaped_runes(),
        use_literal_is_bools: false,
        limit_fragment: " TOP ".to_string(),
        default_values_fragment: String::new(),
        insert_ignore_clause: String::new(),
        conflict_fragment: String::new(),
        conflict_do_nothing_fragment: String::new(),
        conflict_do_update_fragment: String::new(),
        supports_returning: true,
        supports_limit_on_delete: true,
        supports_limit_on_update: true,
        supports_order_by_on_delete: true,
        supports_order_by_on_update: true,
        conflict_target_supported: false,
        conflict_update_where_supported: false,
        insert_ignore_syntax_supported: false,
        ..AdapterConfig::default()
    }
}

fn operator_lookup() -> BTreeMap<BooleanOp, String> {
    [
        (BooleanOp::Eq, "="),
        (BooleanOp::Neq, "<>"),
        (BooleanOp::Gt, ">"),
        (BooleanOp::Gte, ">="),
        (BooleanOp::Lt, "<"),
        (BooleanOp::Lte, "<="),
        (BooleanOp::In, "IN"),
        (BooleanOp::NotIn, "NOT IN"),
        (BooleanOp::Is, "IS"),
        (BooleanOp::IsNot, "IS NOT"),
        (BooleanOp::Like, "LIKE"),
        (BooleanOp::NotLike, "NOT LIKE"),
        // Case sensitivity follows the column collation.
        (BooleanOp::ILike, "LIKE"),
        (BooleanOp::NotILike, "NOT LIKE"),
        // T-SQL has no regexp operator; these fail on the server.
        (BooleanOp::RegexpLike, "REGEXP"),
        (BooleanOp::RegexpNotLike, "NOT REGEXP"),
        (BooleanOp::RegexpILike, "REGEXP"),
        (BooleanOp::RegexpNotILike, "NOT REGEXP"),
    ]
    .into_iter()
    .map(|(op, token)| (op, token.to_string()))
    .collect()
}

fn escaped_runes() -> BTreeMap<char, String> {
    [
        ('\'', "\\'"),
        ('"', "\\\""),
        ('\\', "\\\\"),
        ('\n', "\\n"),
        ('\r', "\\r"),
        ('\0', "\\x00"),
        ('\x1a', "\\x1a"),
    ]
    .into_iter()
    .map(|(c, escaped)| (c, escaped.to_string()))
    .collect()
}
