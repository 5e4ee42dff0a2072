//! Column data types and column definitions.

use core::fmt;

use super::{Expression, Identifier};

/// PostgreSQL column data types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    // Integer types
    /// Small integer (2 bytes).
    Smallint,
    /// Integer (4 bytes).
    Integer,
    /// Big integer (8 bytes).
    Bigint,
    /// Auto-incrementing integer.
    Serial,
    /// Auto-incrementing big integer.
    Bigserial,

    /// Arbitrary precision number.
    Numeric {
        /// Total number of digits.
        precision: Option<u32>,
        /// Number of digits after the decimal point.
        scale: Option<u32>,
    },

    // String types
    /// `character [varying] [(n)]`.
    Character {
        /// Whether `VARYING` was given.
        varying: bool,
        /// Maximum length.
        length: Option<u32>,
    },
    /// Text (variable length, no limit).
    Text,

    /// Boolean.
    Boolean,
    /// Binary string.
    Bytea,
    /// Binary JSON.
    Jsonb,
    /// Text search document.
    Tsvector,
    /// UUID.
    Uuid,

    // Date/time types
    /// Date.
    Date,
    /// Timestamp, with or without time zone.
    Timestamp {
        /// Whether the timestamp carries a time zone.
        with_time_zone: bool,
    },
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smallint => f.write_str("smallint"),
            Self::Integer => f.write_str("integer"),
            Self::Bigint => f.write_str("bigint"),
            Self::Serial => f.write_str("serial"),
            Self::Bigserial => f.write_str("bigserial"),
            Self::Numeric { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => write!(f, "numeric({p},{s})"),
                (Some(p), None) => write!(f, "numeric({p})"),
                _ => f.write_str("numeric"),
            },
            Self::Character { varying, length } => {
                f.write_str("character")?;
                if *varying {
                    f.write_str(" varying")?;
                }
                if let Some(n) = length {
                    write!(f, "({n})")?;
                }
                Ok(())
            }
            Self::Text => f.write_str("text"),
            Self::Boolean => f.write_str("boolean"),
            Self::Bytea => f.write_str("bytea"),
            Self::Jsonb => f.write_str("jsonb"),
            Self::Tsvector => f.write_str("tsvector"),
            Self::Uuid => f.write_str("uuid"),
            Self::Date => f.write_str("date"),
            Self::Timestamp { with_time_zone } => {
                if *with_time_zone {
                    f.write_str("timestamp with time zone")
                } else {
                    f.write_str("timestamp without time zone")
                }
            }
        }
    }
}

/// An inline column constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnConstraint {
    /// `NOT NULL`.
    NotNull,
    /// `NULL`. Redundant in PostgreSQL, so it renders as nothing.
    Null,
    /// `DEFAULT expr`.
    Default(Expression),
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNull => f.write_str("NOT NULL"),
            Self::Null => Ok(()),
            Self::Default(expr) => write!(f, "DEFAULT {expr}"),
        }
    }
}

/// A column definition inside `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: Identifier,
    /// Data type.
    pub data_type: DataType,
    /// Inline constraints, in source order.
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    /// Creates a new column definition without constraints.
    #[must_use]
    pub fn new(name: impl Into<Identifier>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Returns true if a `NOT NULL` constraint is present.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| matches!(c, ColumnConstraint::NotNull))
    }

    /// Returns the last `DEFAULT` expression, if any.
    #[must_use]
    pub fn default_expression(&self) -> Option<&Expression> {
        self.constraints.iter().rev().find_map(|c| match c {
            ColumnConstraint::Default(expr) => Some(expr),
            _ => None,
        })
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)?;
        for constraint in &self.constraints {
            if !matches!(constraint, ColumnConstraint::Null) {
                write!(f, " {constraint}")?;
            }
        }
        Ok(())
    }
}
