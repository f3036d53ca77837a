//! SQL text buffer shared by the statement assembler and the adapters.

use sqlweave_core::Value;

/// Accumulates SQL text and, for prepared statements, the bound arguments.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    sql: String,
    args: Vec<Value>,
    prepared: bool,
}

impl SqlBuilder {
    /// Create a buffer. When `prepared` is set, values are bound as
    /// arguments instead of being rendered inline.
    pub fn new(prepared: bool) -> Self {
        Self {
            sql: String::new(),
            args: Vec::new(),
            prepared,
        }
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub fn write_char(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Bind an argument and return its 1-based position.
    pub fn push_arg(&mut self, value: Value) -> usize {
        self.args.push(value);
        self.args.len()
    }

    /// SQL written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}
