//! # pgconverge-core
//!
//! Computes the DDL patch that turns one PostgreSQL schema into another.
//!
//! This crate provides:
//! - A hand-written lexer for PostgreSQL DDL, as produced by `pg_dump`
//! - A recursive descent parser with Pratt expression parsing that recovers
//!   from errors one statement at a time
//! - An AST that renders back to canonical SQL
//! - A diff engine that compares two schemas table by table
//!
//! ```rust
//! use pgconverge_core::{process, Input};
//!
//! let source = Input::new("old.sql", b"CREATE TABLE users (id bigint);");
//! let desired = Input::new("new.sql", b"CREATE TABLE users (id bigint, name text);");
//!
//! let patch = process(source, desired).unwrap();
//! assert_eq!(
//!     patch,
//!     "-- Table: \"public\".\"users\"\n\
//!      ALTER TABLE \"public\".\"users\" ADD COLUMN \"name\" text;\n\n"
//! );
//! ```

pub mod ast;
pub mod diff;
pub mod lexer;
pub mod parser;

use tracing::debug;

pub use ast::{DataDefinition, Statement};
pub use diff::{generate_patch, Catalog, DiffError, SideErrors};
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser, StatementOutcome};

/// Schema that unqualified names resolve to until a `SET search_path`
/// says otherwise.
pub const DEFAULT_SCHEMA: &str = "public";

/// One schema dump to compare.
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    /// Display name used in error messages, usually the file path.
    pub name: &'a str,
    /// Raw contents. Invalid UTF-8 is replaced, not rejected.
    pub bytes: &'a [u8],
}

impl<'a> Input<'a> {
    /// Creates an input from a display name and its contents.
    #[must_use]
    pub const fn new(name: &'a str, bytes: &'a [u8]) -> Self {
        Self { name, bytes }
    }
}

/// Parses one input, returning its statements and its parse errors.
#[must_use]
pub fn parse_input(input: Input<'_>) -> (DataDefinition, SideErrors) {
    let text = String::from_utf8_lossy(input.bytes);
    let mut parser = Parser::new(input.name, &text);
    let ddl = parser.parse_data_definition();
    debug!(
        input = input.name,
        statements = ddl.statements.len(),
        errors = parser.errors().len(),
        "Parsed input"
    );
    (ddl, SideErrors::new(input.name, parser.into_errors()))
}

/// Computes the patch that turns `source` into `desired`.
///
/// The two inputs are parsed independently. The patch is empty when both
/// describe the same schema.
///
/// # Errors
///
/// Returns a `DiffError` carrying every parse error of both inputs if
/// either input has any. No partial patch is produced in that case.
pub fn process(source: Input<'_>, desired: Input<'_>) -> Result<String, DiffError> {
    let (source_ddl, source_errors) = parse_input(source);
    let (desired_ddl, desired_errors) = parse_input(desired);

    if !source_errors.is_empty() || !desired_errors.is_empty() {
        return Err(DiffError::new(source_errors, desired_errors));
    }

    let source_catalog = Catalog::build(&source_ddl);
    let desired_catalog = Catalog::build(&desired_ddl);
    debug!(
        source_tables = source_catalog.len(),
        desired_tables = desired_catalog.len(),
        "Comparing catalogs"
    );

    Ok(generate_patch(&source_catalog, &desired_catalog))
}
