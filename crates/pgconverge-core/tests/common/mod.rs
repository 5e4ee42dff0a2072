#![allow(dead_code)]

use pgconverge_core::ast::{DataDefinition, Statement};
use pgconverge_core::{process, Catalog, DiffError, Input, ParseError, Parser};

pub fn parse(sql: &str) -> DataDefinition {
    let mut parser = Parser::new("test.sql", sql);
    let ddl = parser.parse_data_definition();
    assert!(
        parser.errors().is_empty(),
        "Failed to parse: {sql}\nErrors: {:?}",
        parser.errors()
    );
    ddl
}

pub fn parse_errors(sql: &str) -> Vec<ParseError> {
    let mut parser = Parser::new("test.sql", sql);
    parser.parse_data_definition();
    parser.into_errors()
}

pub fn parse_one(sql: &str) -> Statement {
    let mut statements = parse(sql).statements;
    assert_eq!(statements.len(), 1, "Expected one statement for: {sql}");
    statements.remove(0)
}

pub fn catalog(sql: &str) -> Catalog {
    Catalog::build(&parse(sql))
}

/// Verifies that rendering is a fixed point: the rendered text re-parses
/// and renders to the same string again.
pub fn round_trip(sql: &str) {
    let rendered1 = parse(sql).to_string();
    let rendered2 = parse(&rendered1).to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

pub fn try_patch(source: &str, desired: &str) -> Result<String, DiffError> {
    process(
        Input::new("source.sql", source.as_bytes()),
        Input::new("desired.sql", desired.as_bytes()),
    )
}

pub fn patch(source: &str, desired: &str) -> String {
    try_patch(source, desired).unwrap_or_else(|e| panic!("Diff failed:\n{}", e.detail()))
}
