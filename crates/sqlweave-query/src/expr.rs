//! Expression tree for WHERE clauses, select lists and assignments.
//!
//! Expressions carry no dialect knowledge; an [`Adapter`](crate::Adapter)
//! decides how each node is spelled.

use serde::{Deserialize, Serialize};
use sqlweave_core::Value;

/// A possibly qualified identifier such as `schema.table.column`.
///
/// A `*` part renders unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    parts: Vec<String>,
}

impl Identifier {
    /// Parse a dotted name into its parts.
    pub fn new(name: &str) -> Self {
        Self {
            parts: name.split('.').map(str::to_string).collect(),
        }
    }

    /// Build an identifier from explicit parts (no splitting on `.`).
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

/// Comparison operators whose dialect spelling comes from the adapter's
/// operator lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
    NotLike,
    ILike,
    NotILike,
    RegexpLike,
    RegexpNotLike,
    RegexpILike,
    RegexpNotILike,
}

impl BooleanOp {
    pub const ALL: [BooleanOp; 18] = [
        BooleanOp::Eq,
        BooleanOp::Neq,
        BooleanOp::Gt,
        BooleanOp::Gte,
        BooleanOp::Lt,
        BooleanOp::Lte,
        BooleanOp::In,
        BooleanOp::NotIn,
        BooleanOp::Is,
        BooleanOp::IsNot,
        BooleanOp::Like,
        BooleanOp::NotLike,
        BooleanOp::ILike,
        BooleanOp::NotILike,
        BooleanOp::RegexpLike,
        BooleanOp::RegexpNotLike,
        BooleanOp::RegexpILike,
        BooleanOp::RegexpNotILike,
    ];

    /// The Postgres-flavoured token used by the default adapter.
    pub const fn default_token(self) -> &'static str {
        match self {
            BooleanOp::Eq => "=",
            BooleanOp::Neq => "!=",
            BooleanOp::Gt => ">",
            BooleanOp::Gte => ">=",
            BooleanOp::Lt => "<",
            BooleanOp::Lte => "<=",
            BooleanOp::In => "IN",
            BooleanOp::NotIn => "NOT IN",
            BooleanOp::Is => "IS",
            BooleanOp::IsNot => "IS NOT",
            BooleanOp::Like => "LIKE",
            BooleanOp::NotLike => "NOT LIKE",
            BooleanOp::ILike => "ILIKE",
            BooleanOp::NotILike => "NOT ILIKE",
            BooleanOp::RegexpLike => "~",
            BooleanOp::RegexpNotLike => "!~",
            BooleanOp::RegexpILike => "~*",
            BooleanOp::RegexpNotILike => "!~*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    Between,
    NotBetween,
}

impl RangeOp {
    pub const fn token(self) -> &'static str {
        match self {
            RangeOp::Between => "BETWEEN",
            RangeOp::NotBetween => "NOT BETWEEN",
        }
    }
}

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Quoted identifier
    Ident(Identifier),

    /// Value rendered as a literal or bound as an argument
    Value(Value),

    /// Raw SQL; each `?` outside quotes is replaced by the next argument
    Literal { sql: String, args: Vec<Expr> },

    /// `(lhs <op> rhs)`
    Boolean {
        op: BooleanOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// `(lhs BETWEEN start AND end)`
    Range {
        op: RangeOp,
        lhs: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },

    /// `(a, b, c)`
    List(Vec<Expr>),

    /// Conjunction of conditions
    And(Vec<Expr>),

    /// Disjunction of conditions
    Or(Vec<Expr>),

    /// `expr AS alias`
    Aliased { expr: Box<Expr>, alias: Identifier },

    /// `*`
    Star,
}

impl Expr {
    /// Column (or any identifier) reference; dots separate qualifiers.
    pub fn col(name: &str) -> Self {
        Expr::Ident(Identifier::new(name))
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Expr::Value(value.into())
    }

    /// Raw SQL with `?` placeholders filled from `args`. A `?` inside a
    /// quoted string is kept as text.
    pub fn literal(sql: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Literal {
            sql: sql.into(),
            args,
        }
    }

    /// Raw SQL without arguments.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::literal(sql, Vec::new())
    }

    pub fn star() -> Self {
        Expr::Star
    }

    /// `COUNT(*) AS "count"`
    pub fn count_star() -> Self {
        Self::raw("COUNT(*)").as_("count")
    }

    /// Combine conditions with AND.
    pub fn and_all(exprs: Vec<Expr>) -> Self {
        Expr::And(exprs)
    }

    /// Combine conditions with OR.
    pub fn or_all(exprs: Vec<Expr>) -> Self {
        Expr::Or(exprs)
    }

    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(other);
                Expr::And(exprs)
            }
            this => Expr::And(vec![this, other]),
        }
    }

    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(other);
                Expr::Or(exprs)
            }
            this => Expr::Or(vec![this, other]),
        }
    }

    fn boolean(self, op: BooleanOp, rhs: Expr) -> Self {
        Expr::Boolean {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn eq(self, other: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Eq, other.into())
    }

    pub fn neq(self, other: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Neq, other.into())
    }

    pub fn gt(self, other: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Gt, other.into())
    }

    pub fn gte(self, other: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Gte, other.into())
    }

    pub fn lt(self, other: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Lt, other.into())
    }

    pub fn lte(self, other: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Lte, other.into())
    }

    /// `IN (...)`
    pub fn in_list(self, values: Vec<impl Into<Expr>>) -> Self {
        let list = Expr::List(values.into_iter().map(Into::into).collect());
        self.boolean(BooleanOp::In, list)
    }

    /// `NOT IN (...)`
    pub fn not_in(self, values: Vec<impl Into<Expr>>) -> Self {
        let list = Expr::List(values.into_iter().map(Into::into).collect());
        self.boolean(BooleanOp::NotIn, list)
    }

    pub fn is_null(self) -> Self {
        self.boolean(BooleanOp::Is, Expr::Value(Value::Null))
    }

    pub fn is_not_null(self) -> Self {
        self.boolean(BooleanOp::IsNot, Expr::Value(Value::Null))
    }

    pub fn is_true(self) -> Self {
        self.boolean(BooleanOp::Is, Expr::Value(Value::Bool(true)))
    }

    pub fn is_not_true(self) -> Self {
        self.boolean(BooleanOp::IsNot, Expr::Value(Value::Bool(true)))
    }

    pub fn is_false(self) -> Self {
        self.boolean(BooleanOp::Is, Expr::Value(Value::Bool(false)))
    }

    pub fn is_not_false(self) -> Self {
        self.boolean(BooleanOp::IsNot, Expr::Value(Value::Bool(false)))
    }

    pub fn like(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::Like, pattern.into())
    }

    pub fn not_like(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::NotLike, pattern.into())
    }

    pub fn ilike(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::ILike, pattern.into())
    }

    pub fn not_ilike(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::NotILike, pattern.into())
    }

    pub fn regexp_like(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::RegexpLike, pattern.into())
    }

    pub fn regexp_not_like(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::RegexpNotLike, pattern.into())
    }

    pub fn regexp_ilike(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::RegexpILike, pattern.into())
    }

    pub fn regexp_not_ilike(self, pattern: impl Into<Expr>) -> Self {
        self.boolean(BooleanOp::RegexpNotILike, pattern.into())
    }

    pub fn between(self, start: impl Into<Expr>, end: impl Into<Expr>) -> Self {
        Expr::Range {
            op: RangeOp::Between,
            lhs: Box::new(self),
            start: Box::new(start.into()),
            end: Box::new(end.into()),
        }
    }

    pub fn not_between(self, start: impl Into<Expr>, end: impl Into<Expr>) -> Self {
        Expr::Range {
            op: RangeOp::NotBetween,
            lhs: Box::new(self),
            start: Box::new(start.into()),
            end: Box::new(end.into()),
        }
    }

    /// Alias this expression in a select list.
    pub fn as_(self, alias: &str) -> Self {
        Expr::Aliased {
            expr: Box::new(self),
            alias: Identifier::from_parts([alias]),
        }
    }

    pub fn asc(self) -> OrderedExpr {
        OrderedExpr::new(self, SortDirection::Asc)
    }

    pub fn desc(self) -> OrderedExpr {
        OrderedExpr::new(self, SortDirection::Desc)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// NULLS FIRST/LAST ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullSortType {
    First,
    Last,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedExpr {
    pub expr: Expr,
    pub direction: SortDirection,
    pub nulls: Option<NullSortType>,
}

impl OrderedExpr {
    pub fn new(expr: Expr, direction: SortDirection) -> Self {
        Self {
            expr,
            direction,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullSortType::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullSortType::Last);
        self
    }
}

/// The action requested when an INSERT hits a uniqueness conflict.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictExpr {
    /// `ON CONFLICT DO NOTHING`, also used for insert-ignore
    DoNothing,
    /// `ON CONFLICT (target) DO UPDATE SET ... [WHERE ...]`
    DoUpdate {
        target: Option<String>,
        set: Record,
        where_clause: Option<Expr>,
    },
}

impl ConflictExpr {
    pub fn do_nothing() -> Self {
        ConflictExpr::DoNothing
    }

    pub fn do_update(target: &str, set: Record) -> Self {
        ConflictExpr::DoUpdate {
            target: (!target.is_empty()).then(|| target.to_string()),
            set,
            where_clause: None,
        }
    }

    /// Restrict the `DO UPDATE` with a condition.
    pub fn with_where(self, condition: Expr) -> Self {
        match self {
            ConflictExpr::DoUpdate { target, set, .. } => ConflictExpr::DoUpdate {
                target,
                set,
                where_clause: Some(condition),
            },
            other => other,
        }
    }
}

/// Ordered column/value pairs for INSERT rows and UPDATE assignments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Expr)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; a repeated column replaces the earlier value.
    pub fn set(mut self, column: &str, value: impl Into<Expr>) -> Self {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(c, _)| c == column) {
            slot.1 = value;
        } else {
            self.entries.push((column.to_string(), value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Expr> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Value(v)
    }
}

impl From<Identifier> for Expr {
    fn from(ident: Identifier) -> Self {
        Expr::Ident(ident)
    }
}

macro_rules! impl_expr_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Expr {
                fn from(v: $ty) -> Self {
                    Expr::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_expr_from_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    Vec<u8>,
    chrono::NaiveDateTime,
    chrono::NaiveDate,
);

impl From<u64> for Expr {
    fn from(v: u64) -> Self {
        Expr::Value(Value::from_u64_clamped(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_splits_on_dots() {
        let ident = Identifier::new("dbo.entry.id");
        assert_eq!(ident.parts(), ["dbo", "entry", "id"]);

        let ident = Identifier::from_parts(["a.b"]);
        assert_eq!(ident.parts(), ["a.b"]);
    }

    #[test]
    fn and_flattens_chains() {
        let e = Expr::col("a").eq(1).and(Expr::col("b").eq(2)).and(Expr::col("c").eq(3));
        match e {
            Expr::And(items) => assert_eq!(items.len(), 3),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn in_list_wraps_values_in_list() {
        let e = Expr::col("col2").not_in(vec!["a", "b"]);
        let Expr::Boolean { op, rhs, .. } = e else {
            panic!("expected boolean expression");
        };
        assert_eq!(op, BooleanOp::NotIn);
        assert_eq!(*rhs, Expr::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn record_replaces_repeated_columns() {
        let r = Record::new().set("int", 1).set("float", 0.5).set("int", 2);
        assert_eq!(r.len(), 2);
        assert_eq!(r.columns().collect::<Vec<_>>(), ["int", "float"]);
        assert_eq!(r.values().next(), Some(&Expr::from(2)));
    }

    #[test]
    fn do_update_without_target() {
        let c = ConflictExpr::do_update("", Record::new().set("a", 1));
        let ConflictExpr::DoUpdate { target, .. } = c else {
            panic!("expected DoUpdate");
        };
        assert!(target.is_none());
    }

    #[test]
    fn boolean_ops_are_all_listed_once() {
        let mut ops = BooleanOp::ALL.to_vec();
        ops.sort();
        ops.dedup();
        assert_eq!(ops.len(), BooleanOp::ALL.len());
    }
}
