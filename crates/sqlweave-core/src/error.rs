//! Error types for statement generation.

use std::fmt;

/// The primary error type for all sqlweave operations.
#[derive(Debug)]
pub enum Error {
    /// The dialect cannot express a requested clause
    Unsupported(UnsupportedError),
    /// The statement is malformed and cannot be rendered
    Build(BuildError),
    /// Adapter configuration errors
    Config(ConfigError),
    /// Custom error with message
    Custom(String),
}

/// A SQL clause that a dialect may refuse to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// `RETURNING` on INSERT/UPDATE/DELETE
    Returning,
    /// `ON CONFLICT` (including insert-ignore)
    OnConflict,
    /// A conflict target column list
    ConflictTarget,
    /// A WHERE clause on `DO UPDATE`
    ConflictUpdateWhere,
}

impl Feature {
    /// The SQL keyword used when reporting the feature.
    pub const fn keyword(self) -> &'static str {
        match self {
            Feature::Returning => "RETURNING",
            Feature::OnConflict => "ON CONFLICT",
            Feature::ConflictTarget => "ON CONFLICT target",
            Feature::ConflictUpdateWhere => "ON CONFLICT DO UPDATE WHERE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnsupportedError {
    /// Registered name of the adapter that refused
    pub adapter: String,
    pub feature: Feature,
}

#[derive(Debug, Clone)]
pub struct BuildError {
    pub kind: BuildErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// Literal placeholder count does not match its arguments
    LiteralArity,
    /// INSERT rows disagree on their column set
    MismatchedRows,
    /// UPDATE without any assignment
    EmptyUpdate,
    /// A value that the dialect cannot render
    InvalidValue,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Build an unsupported-feature error for the named adapter.
    pub fn unsupported(adapter: impl Into<String>, feature: Feature) -> Self {
        Error::Unsupported(UnsupportedError {
            adapter: adapter.into(),
            feature,
        })
    }

    /// Build a statement-construction error.
    pub fn build(kind: BuildErrorKind, message: impl Into<String>) -> Self {
        Error::Build(BuildError {
            kind,
            message: message.into(),
        })
    }

    /// Is this a refusal by the dialect rather than a malformed statement?
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }

    /// The refused feature, if this is an unsupported-feature error.
    pub fn unsupported_feature(&self) -> Option<Feature> {
        match self {
            Error::Unsupported(e) => Some(e.feature),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unsupported(e) => write!(f, "{}", e),
            Error::Build(e) => write!(f, "Build error: {}", e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for UnsupportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-adapter does not support \"{}\"", self.adapter, self.feature)
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<UnsupportedError> for Error {
    fn from(err: UnsupportedError) -> Self {
        Error::Unsupported(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::Build(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for sqlweave operations.
pub type Result<T> = std::result::Result<T, Error>;
