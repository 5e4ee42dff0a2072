//! Token types for the DDL lexer.

use core::fmt;

/// PostgreSQL keywords understood by the parser.
///
/// Each keyword is either reserved or non-reserved, following the
/// PostgreSQL keyword appendix. Non-reserved keywords may still be used
/// as plain identifiers (e.g. a column called `date`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Statements
    Alter,
    Comment,
    Create,
    Grant,
    Revoke,
    Select,
    Set,

    // Objects
    Column,
    Database,
    Extension,
    Function,
    Index,
    Operator,
    Role,
    Schema,
    Sequence,
    Table,
    Trigger,
    View,

    // Clauses
    Add,
    As,
    Asc,
    By,
    Cache,
    Check,
    Concurrently,
    Constraint,
    Default,
    Desc,
    Exclude,
    Exists,
    Foreign,
    If,
    Increment,
    Key,
    Maxvalue,
    Minvalue,
    No,
    On,
    Only,
    Owned,
    Owner,
    Primary,
    Start,
    To,
    Unique,
    Using,
    Varying,
    With,
    Without,
    Time,
    Zone,

    // Predicates and literals
    False,
    Is,
    Not,
    Null,
    True,

    // Data types
    Bigint,
    Bigserial,
    Boolean,
    Bytea,
    Character,
    Date,
    Integer,
    Jsonb,
    Numeric,
    Serial,
    Smallint,
    Text,
    Timestamp,
    Tsvector,
    Uuid,
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let keyword = match s.to_ascii_uppercase().as_str() {
            "ALTER" => Self::Alter,
            "COMMENT" => Self::Comment,
            "CREATE" => Self::Create,
            "GRANT" => Self::Grant,
            "REVOKE" => Self::Revoke,
            "SELECT" => Self::Select,
            "SET" => Self::Set,
            "COLUMN" => Self::Column,
            "DATABASE" => Self::Database,
            "EXTENSION" => Self::Extension,
            "FUNCTION" => Self::Function,
            "INDEX" => Self::Index,
            "OPERATOR" => Self::Operator,
            "ROLE" => Self::Role,
            "SCHEMA" => Self::Schema,
            "SEQUENCE" => Self::Sequence,
            "TABLE" => Self::Table,
            "TRIGGER" => Self::Trigger,
            "VIEW" => Self::View,
            "ADD" => Self::Add,
            "AS" => Self::As,
            "ASC" => Self::Asc,
            "BY" => Self::By,
            "CACHE" => Self::Cache,
            "CHECK" => Self::Check,
            "CONCURRENTLY" => Self::Concurrently,
            "CONSTRAINT" => Self::Constraint,
            "DEFAULT" => Self::Default,
            "DESC" => Self::Desc,
            "EXCLUDE" => Self::Exclude,
            "EXISTS" => Self::Exists,
            "FOREIGN" => Self::Foreign,
            "IF" => Self::If,
            "INCREMENT" => Self::Increment,
            "KEY" => Self::Key,
            "MAXVALUE" => Self::Maxvalue,
            "MINVALUE" => Self::Minvalue,
            "NO" => Self::No,
            "ON" => Self::On,
            "ONLY" => Self::Only,
            "OWNED" => Self::Owned,
            "OWNER" => Self::Owner,
            "PRIMARY" => Self::Primary,
            "START" => Self::Start,
            "TO" => Self::To,
            "UNIQUE" => Self::Unique,
            "USING" => Self::Using,
            "VARYING" => Self::Varying,
            "WITH" => Self::With,
            "WITHOUT" => Self::Without,
            "TIME" => Self::Time,
            "ZONE" => Self::Zone,
            "FALSE" => Self::False,
            "IS" => Self::Is,
            "NOT" => Self::Not,
            "NULL" => Self::Null,
            "TRUE" => Self::True,
            "BIGINT" => Self::Bigint,
            "BIGSERIAL" => Self::Bigserial,
            "BOOLEAN" => Self::Boolean,
            "BYTEA" => Self::Bytea,
            "CHARACTER" => Self::Character,
            "DATE" => Self::Date,
            "INTEGER" => Self::Integer,
            "JSONB" => Self::Jsonb,
            "NUMERIC" => Self::Numeric,
            "SERIAL" => Self::Serial,
            "SMALLINT" => Self::Smallint,
            "TEXT" => Self::Text,
            "TIMESTAMP" => Self::Timestamp,
            "TSVECTOR" => Self::Tsvector,
            "UUID" => Self::Uuid,
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns the keyword as an upper-case string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alter => "ALTER",
            Self::Comment => "COMMENT",
            Self::Create => "CREATE",
            Self::Grant => "GRANT",
            Self::Revoke => "REVOKE",
            Self::Select => "SELECT",
            Self::Set => "SET",
            Self::Column => "COLUMN",
            Self::Database => "DATABASE",
            Self::Extension => "EXTENSION",
            Self::Function => "FUNCTION",
            Self::Index => "INDEX",
            Self::Operator => "OPERATOR",
            Self::Role => "ROLE",
            Self::Schema => "SCHEMA",
            Self::Sequence => "SEQUENCE",
            Self::Table => "TABLE",
            Self::Trigger => "TRIGGER",
            Self::View => "VIEW",
            Self::Add => "ADD",
            Self::As => "AS",
            Self::Asc => "ASC",
            Self::By => "BY",
            Self::Cache => "CACHE",
            Self::Check => "CHECK",
            Self::Concurrently => "CONCURRENTLY",
            Self::Constraint => "CONSTRAINT",
            Self::Default => "DEFAULT",
            Self::Desc => "DESC",
            Self::Exclude => "EXCLUDE",
            Self::Exists => "EXISTS",
            Self::Foreign => "FOREIGN",
            Self::If => "IF",
            Self::Increment => "INCREMENT",
            Self::Key => "KEY",
            Self::Maxvalue => "MAXVALUE",
            Self::Minvalue => "MINVALUE",
            Self::No => "NO",
            Self::On => "ON",
            Self::Only => "ONLY",
            Self::Owned => "OWNED",
            Self::Owner => "OWNER",
            Self::Primary => "PRIMARY",
            Self::Start => "START",
            Self::To => "TO",
            Self::Unique => "UNIQUE",
            Self::Using => "USING",
            Self::Varying => "VARYING",
            Self::With => "WITH",
            Self::Without => "WITHOUT",
            Self::Time => "TIME",
            Self::Zone => "ZONE",
            Self::False => "FALSE",
            Self::Is => "IS",
            Self::Not => "NOT",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::Bigint => "BIGINT",
            Self::Bigserial => "BIGSERIAL",
            Self::Boolean => "BOOLEAN",
            Self::Bytea => "BYTEA",
            Self::Character => "CHARACTER",
            Self::Date => "DATE",
            Self::Integer => "INTEGER",
            Self::Jsonb => "JSONB",
            Self::Numeric => "NUMERIC",
            Self::Serial => "SERIAL",
            Self::Smallint => "SMALLINT",
            Self::Text => "TEXT",
            Self::Timestamp => "TIMESTAMP",
            Self::Tsvector => "TSVECTOR",
            Self::Uuid => "UUID",
        }
    }

    /// Returns true if the keyword can never stand in identifier position.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::As
                | Self::Asc
                | Self::Check
                | Self::Column
                | Self::Concurrently
                | Self::Constraint
                | Self::Create
                | Self::Default
                | Self::Desc
                | Self::False
                | Self::Foreign
                | Self::Grant
                | Self::Is
                | Self::Not
                | Self::Null
                | Self::On
                | Self::Only
                | Self::Primary
                | Self::Select
                | Self::Table
                | Self::To
                | Self::True
                | Self::Unique
                | Self::Using
                | Self::With
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A character sequence the lexer cannot make sense of.
    Illegal,
    /// End of input.
    Eof,

    // Literals
    /// Identifier, quoted (`"users"`) or not (`users`).
    Identifier,
    /// String literal, single- or dollar-quoted.
    String,
    /// Numeric literal (e.g. `42`, `3.5`, `.001`).
    Number,
    /// psql meta-command such as `\connect db`, up to end of line.
    MetaCommand,
    /// SQL keyword.
    Keyword(Keyword),

    // Punctuation
    /// .
    Dot,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// =
    Equal,

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Asterisk,
    /// /
    Slash,
    /// ::
    Typecast,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Illegal => f.write_str("illegal token"),
            Self::Eof => f.write_str("end of input"),
            Self::Identifier => f.write_str("identifier"),
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::MetaCommand => f.write_str("meta-command"),
            Self::Keyword(kw) => write!(f, "{kw}"),
            Self::Dot => f.write_str("."),
            Self::Semicolon => f.write_str(";"),
            Self::Comma => f.write_str(","),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::Equal => f.write_str("="),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Asterisk => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Typecast => f.write_str("::"),
        }
    }
}

/// A token with its literal text and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of the token, verbatim.
    pub literal: String,
    /// 1-based line number where the token starts.
    pub line: usize,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
        }
    }

    /// Creates an end-of-input token.
    #[must_use]
    pub const fn eof(line: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            literal: String::new(),
            line,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    /// Returns true if the token may be used as an identifier: either a
    /// generic identifier or a non-reserved keyword.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        match self.kind {
            TokenKind::Identifier => true,
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            _ => false,
        }
    }

    /// Describes the token for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.literal.is_empty() {
            self.kind.to_string()
        } else {
            self.literal.clone()
        }
    }
}
