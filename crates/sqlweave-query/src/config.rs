//! Per-dialect configuration table consumed by the base adapter.
//!
//! Every field has a default matching ANSI/Postgres conventions, and the
//! struct deserializes with `#[serde(default)]`, so a JSON document only
//! needs to name the fields a dialect changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlweave_core::{ConfigError, Error, Result};

use crate::expr::BooleanOp;

/// Spelling and capability table for a SQL dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Character written for a bound argument
    pub placeholder_rune: char,
    /// Append the 1-based argument index after the placeholder rune (`?1`)
    pub include_placeholder_num: bool,
    /// Identifier quote character
    pub quote_rune: char,
    /// String literal quote character
    pub string_quote: char,
    pub true_literal: String,
    pub false_literal: String,
    pub null_literal: String,
    /// strftime pattern for `Timestamp` literals
    pub time_format: String,
    /// strftime pattern for `Date` literals
    pub date_format: String,
    /// Operator tokens; operators missing here use [`BooleanOp::default_token`]
    pub operator_lookup: BTreeMap<BooleanOp, String>,
    /// Characters replaced inside string literals
    pub escaped_runes: BTreeMap<char, String>,

    pub insert_clause: String,
    pub insert_ignore_clause: String,
    pub order_by_fragment: String,
    pub limit_fragment: String,
    pub offset_fragment: String,
    pub returning_fragment: String,
    pub default_values_fragment: String,
    pub conflict_fragment: String,
    pub conflict_do_nothing_fragment: String,
    pub conflict_do_update_fragment: String,

    /// Render `IS TRUE` / `IS FALSE` with keywords instead of the boolean literals
    pub use_literal_is_bools: bool,
    pub supports_returning: bool,
    pub supports_limit_on_delete: bool,
    pub supports_limit_on_update: bool,
    pub supports_order_by_on_delete: bool,
    pub supports_order_by_on_update: bool,
    pub conflict_target_supported: bool,
    pub conflict_update_where_supported: bool,
    pub insert_ignore_syntax_supported: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            placeholder_rune: '?',
            include_placeholder_num: false,
            quote_rune: '"',
            string_quote: '\'',
            true_literal: "TRUE".to_string(),
            false_literal: "FALSE".to_string(),
            null_literal: "NULL".to_string(),
            time_format: "%Y-%m-%dT%H:%M:%S%.f%:z".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            operator_lookup: BooleanOp::ALL
                .iter()
                .map(|op| (*op, op.default_token().to_string()))
                .collect(),
            escaped_runes: BTreeMap::from([('\'', "''".to_string())]),
            insert_clause: "INSERT INTO".to_string(),
            insert_ignore_clause: "INSERT IGNORE INTO".to_string(),
            order_by_fragment: " ORDER BY ".to_string(),
            limit_fragment: " LIMIT ".to_string(),
            offset_fragment: " OFFSET ".to_string(),
            returning_fragment: " RETURNING ".to_string(),
            default_values_fragment: " DEFAULT VALUES".to_string(),
            conflict_fragment: " ON CONFLICT".to_string(),
            conflict_do_nothing_fragment: " DO NOTHING".to_string(),
            conflict_do_update_fragment: " DO UPDATE SET ".to_string(),
            use_literal_is_bools: true,
            supports_returning: true,
            supports_limit_on_delete: false,
            supports_limit_on_update: false,
            supports_order_by_on_delete: false,
            supports_order_by_on_update: false,
            conflict_target_supported: true,
            conflict_update_where_supported: true,
            insert_ignore_syntax_supported: false,
        }
    }
}

impl AdapterConfig {
    /// Decode a configuration from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid adapter configuration: {e}"),
                source: Some(Box::new(e)),
            })
        })
    }

    /// Token for an operator, falling back to the ANSI spelling.
    pub fn operator_token(&self, op: BooleanOp) -> &str {
        self.operator_lookup
            .get(&op)
            .map_or(op.default_token(), String::as_str)
    }

    /// Boolean literal for this dialect.
    pub fn bool_literal(&self, value: bool) -> &str {
        if value {
            &self.true_literal
        } else {
            &self.false_literal
        }
    }
}
