//! Patch generation: compares two catalogs and emits DDL.

use super::catalog::{Catalog, Column, Table};

/// Types a column can only be converted from with an explicit cast.
const CAST_FROM: &[&str] = &["character varying", "character", "text"];

/// Types that need `USING` when converting from one of [`CAST_FROM`].
const CAST_TO: &[&str] = &["bytea", "jsonb", "uuid"];

/// Generates the DDL that turns `source` into `desired`.
///
/// Tables present in `source` are visited first, then tables only present
/// in `desired`, each pass in identifier order. Every table with changes
/// gets a `-- Table: <id>` header and a trailing blank line. Identical
/// catalogs produce an empty patch.
#[must_use]
pub fn generate_patch(source: &Catalog, desired: &Catalog) -> String {
    let mut patch = String::new();

    for table in source.tables() {
        match desired.table(&table.id) {
            Some(target) => {
                let statements = diff_table(table, target);
                if !statements.is_empty() {
                    push_block(&mut patch, &table.id, &statements);
                }
            }
            None => push_block(&mut patch, &table.id, &[format!("DROP TABLE {};", table.id)]),
        }
    }

    for table in desired.tables() {
        if source.table(&table.id).is_none() {
            push_block(&mut patch, &table.id, &create_table(table));
        }
    }

    patch
}

fn push_block(patch: &mut String, id: &str, statements: &[String]) {
    patch.push_str("-- Table: ");
    patch.push_str(id);
    patch.push('\n');
    for statement in statements {
        patch.push_str(statement);
        patch.push('\n');
    }
    patch.push('\n');
}

// ================================================================
// New tables
// ================================================================

/// Everything needed to create a table that only exists in `desired`.
fn create_table(table: &Table) -> Vec<String> {
    let id = &table.id;
    let mut statements = vec![table.statement.to_string()];

    for column in table.columns.values() {
        if let Some(sequence) = &column.sequence {
            statements.push(format!(
                "CREATE SEQUENCE {}.{sequence} START WITH 1 INCREMENT BY 1 NO MINVALUE NO MAXVALUE CACHE 1;",
                table.schema
            ));
            statements.push(format!(
                "ALTER SEQUENCE {}.{sequence} OWNED BY {}.{};",
                table.schema, table.statement.table_name.table, column.name
            ));
        }
    }

    for index in table.indexes.values() {
        statements.push(index.statement.to_string());
    }

    for constraint in table.constraints.values() {
        statements.push(format!(
            "ALTER TABLE ONLY {id} ADD CONSTRAINT {} {} ({});",
            constraint.name,
            constraint.kind.as_str(),
            join(&constraint.columns)
        ));
    }

    for default in table.defaults.values() {
        statements.push(format!(
            "ALTER TABLE ONLY {id} ALTER COLUMN {} SET DEFAULT {};",
            default.column, default.expr
        ));
    }

    statements
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ================================================================
// Table-level diff
// ================================================================

/// Compares a table present on both sides.
///
/// Emission order is fixed: columns, indexes, table constraints, explicit
/// column defaults. Indexes, constraints and explicit defaults are
/// compared by name only; a changed definition under the same name is not
/// detected.
fn diff_table(source: &Table, desired: &Table) -> Vec<String> {
    let id = &desired.id;
    let mut statements = Vec::new();

    // ---- Columns -----------------------------------------------
    for (name, column) in &source.columns {
        if !desired.columns.contains_key(name) {
            statements.push(format!("ALTER TABLE {id} DROP COLUMN {};", column.name));
        }
    }
    for (name, column) in &source.columns {
        if let Some(target) = desired.columns.get(name) {
            alter_column(id, column, target, &mut statements);
        }
    }
    for (name, column) in &desired.columns {
        if !source.columns.contains_key(name) {
            statements.push(add_column(id, column));
        }
    }

    // ---- Indexes -----------------------------------------------
    for (name, index) in &source.indexes {
        if !desired.indexes.contains_key(name) {
            statements.push(format!("DROP INDEX {};", index.name));
        }
    }
    for (name, index) in &desired.indexes {
        if !source.indexes.contains_key(name) {
            statements.push(index.statement.to_string());
        }
    }

    // ---- Table constraints -------------------------------------
    for (name, constraint) in &source.constraints {
        if !desired.constraints.contains_key(name) {
            statements.push(format!(
                "ALTER TABLE ONLY {id} DROP CONSTRAINT {};",
                constraint.name
            ));
        }
    }
    for (name, constraint) in &desired.constraints {
        if !source.constraints.contains_key(name) {
            statements.push(format!(
                "ALTER TABLE ONLY {id} ADD CONSTRAINT {} {} ({});",
                constraint.name,
                constraint.kind.as_str(),
                join(&constraint.columns)
            ));
        }
    }

    // ---- Explicit column defaults ------------------------------
    for (name, default) in &source.defaults {
        if !desired.defaults.contains_key(name) {
            statements.push(format!(
                "ALTER TABLE ONLY {id} ALTER COLUMN {} DROP DEFAULT;",
                default.column
            ));
        }
    }
    for (name, default) in &desired.defaults {
        if !source.defaults.contains_key(name) {
            statements.push(format!(
                "ALTER TABLE ONLY {id} ALTER COLUMN {} SET DEFAULT {};",
                default.column, default.expr
            ));
        }
    }

    statements
}

/// Emits type, nullability and default changes, in that order.
fn alter_column(id: &str, source: &Column, desired: &Column, statements: &mut Vec<String>) {
    let name = &desired.name;

    if source.data_type != desired.data_type {
        let using = if needs_cast(&source.data_type, &desired.data_type) {
            format!(" USING {name}::{}", desired.data_type)
        } else {
            String::new()
        };
        statements.push(format!(
            "ALTER TABLE {id} ALTER COLUMN {name} TYPE {}{using};",
            desired.data_type
        ));
    }

    if source.not_null != desired.not_null {
        let action = if desired.not_null { "SET" } else { "DROP" };
        statements.push(format!(
            "ALTER TABLE {id} ALTER COLUMN {name} {action} NOT NULL;"
        ));
    }

    if source.default != desired.default {
        match &desired.default {
            Some(expr) => statements.push(format!(
                "ALTER TABLE {id} ALTER COLUMN {name} SET DEFAULT {expr};"
            )),
            None => statements.push(format!("ALTER TABLE {id} ALTER COLUMN {name} DROP DEFAULT;")),
        }
    }
}

fn add_column(id: &str, column: &Column) -> String {
    let mut statement = format!("ALTER TABLE {id} ADD COLUMN {} {}", column.name, column.data_type);
    if let Some(expr) = &column.default {
        statement.push_str(" DEFAULT ");
        statement.push_str(expr);
    }
    if column.not_null {
        statement.push_str(" NOT NULL");
    }
    statement.push(';');
    statement
}

/// Returns true if PostgreSQL cannot convert `from` to `to` implicitly.
fn needs_cast(from: &str, to: &str) -> bool {
    CAST_FROM.iter().any(|base| is_type(from, base)) && CAST_TO.iter().any(|t| *t == to)
}

/// Matches a rendered type against a base name, ignoring modifiers such as
/// the `(50)` in `character varying(50)`.
fn is_type(rendered: &str, base: &str) -> bool {
    rendered
        .strip_prefix(base)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('('))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn catalog(sql: &str) -> Catalog {
        let mut parser = Parser::new("test.sql", sql);
        let ddl = parser.parse_data_definition();
        assert!(parser.errors().is_empty(), "{:?}", parser.errors());
        Catalog::build(&ddl)
    }

    fn patch(source: &str, desired: &str) -> String {
        generate_patch(&catalog(source), &catalog(desired))
    }

    #[test]
    fn identical_catalogs_produce_empty_patch() {
        let sql = "CREATE TABLE t (id bigint NOT NULL);\nCREATE INDEX t_idx ON t (id);";
        assert_eq!(patch(sql, sql), "");
    }

    #[test]
    fn dropped_table_detected() {
        assert_eq!(
            patch("CREATE TABLE old (id bigint);", ""),
            "-- Table: \"public\".\"old\"\nDROP TABLE \"public\".\"old\";\n\n"
        );
    }

    #[test]
    fn new_table_detected() {
        assert_eq!(
            patch("", "CREATE TABLE x (id bigint);"),
            "-- Table: \"public\".\"x\"\nCREATE TABLE \"public\".\"x\" (\n    \"id\" bigint\n);\n\n"
        );
    }

    #[test]
    fn new_table_with_attachments() {
        let desired = "CREATE TABLE users (id integer NOT NULL, email text);\n\
             CREATE SEQUENCE users_id_seq;\n\
             ALTER SEQUENCE users_id_seq OWNED BY users.id;\n\
             CREATE INDEX users_email_idx ON users (email);\n\
             ALTER TABLE ONLY users ADD CONSTRAINT users_pkey PRIMARY KEY (id);\n\
             ALTER TABLE ONLY users ALTER COLUMN id SET DEFAULT nextval('users_id_seq'::regclass);";
        let expected = [
            "-- Table: \"public\".\"users\"",
            "CREATE TABLE \"public\".\"users\" (",
            "    \"id\" integer NOT NULL,",
            "    \"email\" text",
            ");",
            "CREATE SEQUENCE \"public\".\"users_id_seq\" START WITH 1 INCREMENT BY 1 NO MINVALUE NO MAXVALUE CACHE 1;",
            "ALTER SEQUENCE \"public\".\"users_id_seq\" OWNED BY \"users\".\"id\";",
            "CREATE INDEX \"users_email_idx\" ON \"public\".\"users\" (\"email\");",
            "ALTER TABLE ONLY \"public\".\"users\" ADD CONSTRAINT \"users_pkey\" PRIMARY KEY (\"id\");",
            "ALTER TABLE ONLY \"public\".\"users\" ALTER COLUMN \"id\" SET DEFAULT \"nextval\"('users_id_seq'::\"regclass\");",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(patch("", desired), expected);
    }

    #[test]
    fn column_changes_in_fixed_order() {
        let source = "CREATE TABLE t (a bigint, b text, c integer NOT NULL DEFAULT 1);";
        let desired = "CREATE TABLE t (b text NOT NULL, c bigint DEFAULT 2, d uuid DEFAULT gen_random_uuid() NOT NULL);";
        let expected = [
            "-- Table: \"public\".\"t\"",
            "ALTER TABLE \"public\".\"t\" DROP COLUMN \"a\";",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"b\" SET NOT NULL;",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"c\" TYPE bigint;",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"c\" DROP NOT NULL;",
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"c\" SET DEFAULT 2;",
            "ALTER TABLE \"public\".\"t\" ADD COLUMN \"d\" uuid DEFAULT \"gen_random_uuid\"() NOT NULL;",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(patch(source, desired), expected);
    }

    #[test]
    fn default_removed() {
        assert_eq!(
            patch(
                "CREATE TABLE t (a text DEFAULT 'x');",
                "CREATE TABLE t (a text);"
            ),
            "-- Table: \"public\".\"t\"\nALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" DROP DEFAULT;\n\n"
        );
    }

    #[test]
    fn type_change_with_cast() {
        let out = patch(
            "CREATE TABLE t (a character varying(10), b text, c integer);",
            "CREATE TABLE t (a bytea, b jsonb, c text);",
        );
        assert!(out.contains(
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"a\" TYPE bytea USING \"a\"::bytea;"
        ));
        assert!(out.contains(
            "ALTER TABLE \"public\".\"t\" ALTER COLUMN \"b\" TYPE jsonb USING \"b\"::jsonb;"
        ));
        assert!(out.contains("ALTER TABLE \"public\".\"t\" ALTER COLUMN \"c\" TYPE text;"));
    }

    #[test]
    fn needs_cast_allow_list() {
        assert!(needs_cast("character varying", "bytea"));
        assert!(needs_cast("character varying(255)", "uuid"));
        assert!(needs_cast("character(2)", "jsonb"));
        assert!(!needs_cast("character varying", "text"));
        assert!(!needs_cast("integer", "bytea"));
        assert!(!needs_cast("texts", "bytea"));
    }

    #[test]
    fn index_constraint_and_default_presence() {
        let source = "CREATE TABLE t (id bigint, email text);\n\
             CREATE INDEX old_idx ON t (email);\n\
             ALTER TABLE ONLY t ADD CONSTRAINT old_key UNIQUE (email);\n\
             ALTER TABLE ONLY t ALTER COLUMN email SET DEFAULT 'a';";
        let desired = "CREATE TABLE t (id bigint, email text);\n\
             CREATE INDEX new_idx ON t (email, id);\n\
             ALTER TABLE ONLY t ADD CONSTRAINT t_pkey PRIMARY KEY (id);\n\
             ALTER TABLE ONLY t ALTER COLUMN id SET DEFAULT 0;";
        let expected = [
            "-- Table: \"public\".\"t\"",
            "DROP INDEX \"old_idx\";",
            "CREATE INDEX \"new_idx\" ON \"public\".\"t\" (\"email\", \"id\");",
            "ALTER TABLE ONLY \"public\".\"t\" DROP CONSTRAINT \"old_key\";",
            "ALTER TABLE ONLY \"public\".\"t\" ADD CONSTRAINT \"t_pkey\" PRIMARY KEY (\"id\");",
            "ALTER TABLE ONLY \"public\".\"t\" ALTER COLUMN \"email\" DROP DEFAULT;",
            "ALTER TABLE ONLY \"public\".\"t\" ALTER COLUMN \"id\" SET DEFAULT 0;",
            "",
            "",
        ]
        .join("\n");
        assert_eq!(patch(source, desired), expected);
    }

    #[test]
    fn changed_index_under_same_name_is_not_detected() {
        let source = "CREATE TABLE t (a text, b text);\nCREATE INDEX i ON t (a);";
        let desired = "CREATE TABLE t (a text, b text);\nCREATE INDEX i ON t (b);";
        assert_eq!(patch(source, desired), "");
    }

    #[test]
    fn tables_are_sorted_within_each_pass() {
        let source = "CREATE TABLE b (id bigint);\nCREATE TABLE a (id bigint);\nCREATE TABLE z (id bigint);";
        let desired = "CREATE TABLE z (id bigint);\nCREATE TABLE y (id bigint);\nCREATE TABLE c (id bigint);";
        let headers: Vec<String> = patch(source, desired)
            .lines()
            .filter(|l| l.starts_with("-- Table:"))
            .map(String::from)
            .collect();
        assert_eq!(
            headers,
            vec![
                "-- Table: \"public\".\"a\"",
                "-- Table: \"public\".\"b\"",
                "-- Table: \"public\".\"c\"",
                "-- Table: \"public\".\"y\"",
            ]
        );
    }
}
