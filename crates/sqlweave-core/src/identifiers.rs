//! SQL identifier quoting utilities.
//!
//! Adapters configure their own quote character; the helpers here do the
//! quoting and escape embedded quote characters by doubling them, which
//! keeps any input string safe to splice into a statement.

/// Quote a SQL identifier using ANSI double-quoting.
///
/// # Examples
///
/// ```
/// use sqlweave_core::quote_ident;
///
/// assert_eq!(quote_ident("entry"), "\"entry\"");
/// assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    quote_ident_with(name, '"')
}

/// Quote a SQL identifier with an arbitrary quote character.
///
/// A `[` quote closes with `]`, so bracket-quoting dialects can use this too.
///
/// # Examples
///
/// ```
/// use sqlweave_core::quote_ident_with;
///
/// assert_eq!(quote_ident_with("users", '`'), "`users`");
/// assert_eq!(quote_ident_with("a]b", '['), "[a]]b]");
/// ```
pub fn quote_ident_with(name: &str, quote: char) -> String {
    let close = if quote == '[' { ']' } else { quote };
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for c in name.chars() {
        if c == close {
            out.push(close);
        }
        out.push(c);
    }
    out.push(close);
    out
}
