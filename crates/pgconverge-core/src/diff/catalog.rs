//! Catalog construction: folds one side's statements into tables.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::ast::{
    AlterSequenceOwnedBy, AlterTable, AlterTableAction, ConstraintKind, CreateIndex, CreateTable,
    DataDefinition, Identifier, Statement,
};
use crate::DEFAULT_SCHEMA;

/// A column as the diff sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: Identifier,
    /// The rendered data type, e.g. `character varying(50)`.
    pub data_type: String,
    pub not_null: bool,
    /// The rendered inline `DEFAULT` expression.
    pub default: Option<String>,
    /// Sequence attached through `ALTER SEQUENCE ... OWNED BY`.
    pub sequence: Option<Identifier>,
}

/// An index, compared by name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: Identifier,
    /// The defining statement, with its table name schema-qualified.
    pub statement: CreateIndex,
}

/// A named `UNIQUE` or `PRIMARY KEY` table constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: Identifier,
    pub kind: ConstraintKind,
    pub columns: Vec<Identifier>,
}

/// A default set through `ALTER TABLE ... ALTER COLUMN ... SET DEFAULT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefault {
    pub column: Identifier,
    /// The rendered expression.
    pub expr: String,
}

/// A table and everything attached to it, keyed by unquoted names in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// The quoted `"schema"."table"` identifier.
    pub id: String,
    /// The schema the table lives in.
    pub schema: Identifier,
    /// The defining statement with its schema filled in.
    pub statement: CreateTable,
    pub columns: IndexMap<String, Column>,
    pub indexes: IndexMap<String, Index>,
    pub constraints: IndexMap<String, Constraint>,
    pub defaults: IndexMap<String, ColumnDefault>,
}

impl Table {
    fn from_statement(create: &CreateTable, schema: &Identifier) -> Self {
        let mut statement = create.clone();
        statement.set_schema(schema);
        let schema = statement
            .table_name
            .schema
            .clone()
            .unwrap_or_else(|| schema.clone());

        let columns = statement
            .columns
            .iter()
            .map(|definition| {
                let column = Column {
                    name: definition.name.clone(),
                    data_type: definition.data_type.to_string(),
                    not_null: definition.is_not_null(),
                    default: definition.default_expression().map(ToString::to_string),
                    sequence: None,
                };
                (definition.name.value.clone(), column)
            })
            .collect();

        Self {
            id: statement.table_name.to_string(),
            schema,
            statement,
            columns,
            indexes: IndexMap::new(),
            constraints: IndexMap::new(),
            defaults: IndexMap::new(),
        }
    }

    /// Returns the column with the given unquoted name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }
}

/// All tables of one side, ordered by their quoted identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tables: BTreeMap<String, Table>,
}

impl Catalog {
    /// Builds a catalog by walking the statements in document order.
    ///
    /// Unqualified names resolve against the schema named by the latest
    /// preceding `SET search_path`, or `public`. References to unknown
    /// tables or columns are logged and skipped.
    #[must_use]
    pub fn build(ddl: &DataDefinition) -> Self {
        let mut catalog = Self::default();
        let mut schema = Identifier::new(DEFAULT_SCHEMA);

        for statement in &ddl.statements {
            match statement {
                Statement::SetSearchPath(set) => {
                    if let Some(first) = set.first_schema() {
                        schema = first;
                    }
                }
                Statement::CreateSchema(create) => {
                    debug!(schema = %create.name, "CREATE SCHEMA has no catalog effect");
                }
                Statement::CreateTable(create) => catalog.add_table(create, &schema),
                Statement::CreateIndex(index) => catalog.add_index(index, &schema),
                Statement::CreateSequence(sequence) => {
                    debug!(
                        sequence = %sequence.name,
                        "CREATE SEQUENCE is linked through OWNED BY only"
                    );
                }
                Statement::AlterSequenceOwnedBy(owned) => catalog.link_sequence(owned, &schema),
                Statement::AlterTable(alter) => catalog.alter_table(alter, &schema),
            }
        }

        catalog
    }

    /// Returns the table with the given quoted identifier.
    #[must_use]
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.get(id)
    }

    /// Iterates over tables in identifier order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the catalog has no tables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn add_table(&mut self, create: &CreateTable, schema: &Identifier) {
        let table = Table::from_statement(create, schema);
        if self.tables.contains_key(&table.id) {
            warn!(table = %table.id, "Table defined twice, keeping the last definition");
        }
        self.tables.insert(table.id.clone(), table);
    }

    fn add_index(&mut self, index: &CreateIndex, schema: &Identifier) {
        let table_name = index.table_name.with_default_schema(schema);
        let id = table_name.to_string();

        let Some(name) = index.name.clone() else {
            warn!(table = %id, "Index has no name, skipping");
            return;
        };
        let Some(table) = self.tables.get_mut(&id) else {
            warn!(index = %name, table = %id, "Index references unknown table, skipping");
            return;
        };

        let mut statement = index.clone();
        statement.table_name = table_name;
        table
            .indexes
            .insert(name.value.clone(), Index { name, statement });
    }

    fn link_sequence(&mut self, owned: &AlterSequenceOwnedBy, schema: &Identifier) {
        let id = owned.table_name.with_default_schema(schema).to_string();
        let sequence = &owned.sequence_name.name;

        let Some(table) = self.tables.get_mut(&id) else {
            warn!(sequence = %sequence, table = %id, "Sequence owned by unknown table, skipping");
            return;
        };
        let Some(column) = table.columns.get_mut(owned.column.as_str()) else {
            warn!(
                sequence = %sequence,
                table = %id,
                column = %owned.column,
                "Sequence owned by unknown column, skipping"
            );
            return;
        };

        column.sequence = Some(sequence.clone());
    }

    fn alter_table(&mut self, alter: &AlterTable, schema: &Identifier) {
        let id = alter.table_name.with_default_schema(schema).to_string();
        let Some(table) = self.tables.get_mut(&id) else {
            warn!(table = %id, "ALTER TABLE references unknown table, skipping");
            return;
        };

        for action in &alter.actions {
            match action {
                AlterTableAction::AddConstraint(constraint) => {
                    let Some(name) = constraint.name.clone() else {
                        warn!(table = %id, "Table constraint has no name, skipping");
                        continue;
                    };
                    table.constraints.insert(
                        name.value.clone(),
                        Constraint {
                            name,
                            kind: constraint.kind,
                            columns: constraint.columns.clone(),
                        },
                    );
                }
                AlterTableAction::AlterColumnSetDefault { column, expr } => {
                    table.defaults.insert(
                        column.value.clone(),
                        ColumnDefault {
                            column: column.clone(),
                            expr: expr.to_string(),
                        },
                    );
                }
            }
        }
    }
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

    #[test]
    fn unqualified_table_defaults_to_public() {
        let catalog = catalog("CREATE TABLE x (id bigint);");
        let table = catalog.table(r#""public"."x""#).unwrap();
        assert_eq!(table.schema.as_str(), "public");
        assert_eq!(
            table.statement.to_string(),
            "CREATE TABLE \"public\".\"x\" (\n    \"id\" bigint\n);"
        );
    }

    #[test]
    fn search_path_scopes_following_statements() {
        let catalog = catalog(
            "CREATE TABLE a (id bigint);\n\
             SET search_path = myschema, pg_catalog;\n\
             CREATE TABLE b (id bigint);\n\
             CREATE TABLE other.c (id bigint);",
        );
        let ids: Vec<&str> = catalog.tables().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![r#""myschema"."b""#, r#""other"."c""#, r#""public"."a""#]
        );
    }

    #[test]
    fn empty_search_path_keeps_schema() {
        let catalog = catalog("SET search_path = '';\nCREATE TABLE a (id bigint);");
        assert!(catalog.table(r#""public"."a""#).is_some());
    }

    #[test]
    fn columns_are_derived_from_definitions() {
        let catalog = catalog(
            "CREATE TABLE t (id bigint NOT NULL DEFAULT 0, name character varying(20) NULL);",
        );
        let table = catalog.table(r#""public"."t""#).unwrap();
        let id = table.column("id").unwrap();
        assert!(id.not_null);
        assert_eq!(id.default.as_deref(), Some("0"));
        let name = table.column("name").unwrap();
        assert!(!name.not_null);
        assert_eq!(name.data_type, "character varying(20)");
        assert_eq!(name.default, None);
    }

    #[test]
    fn indexes_constraints_and_defaults_attach_to_tables() {
        let catalog = catalog(
            "SET search_path = app;\n\
             CREATE TABLE users (id integer, email text);\n\
             CREATE SEQUENCE users_id_seq;\n\
             ALTER SEQUENCE users_id_seq OWNED BY users.id;\n\
             CREATE UNIQUE INDEX users_email_idx ON users (email);\n\
             ALTER TABLE ONLY users ADD CONSTRAINT users_pkey PRIMARY KEY (id);\n\
             ALTER TABLE ONLY app.users ALTER COLUMN id SET DEFAULT nextval('users_id_seq'::regclass);",
        );
        let table = catalog.table(r#""app"."users""#).unwrap();
        assert_eq!(
            table.column("id").unwrap().sequence,
            Some(Identifier::new("users_id_seq"))
        );
        assert_eq!(
            table.indexes["users_email_idx"].statement.to_string(),
            r#"CREATE UNIQUE INDEX "users_email_idx" ON "app"."users" ("email");"#
        );
        assert_eq!(table.constraints["users_pkey"].kind, ConstraintKind::PrimaryKey);
        assert_eq!(
            table.defaults["id"].expr,
            r#""nextval"('users_id_seq'::"regclass")"#
        );
    }

    #[test]
    fn unknown_references_are_skipped() {
        let catalog = catalog(
            "CREATE TABLE t (id bigint);\n\
             CREATE INDEX i ON missing (id);\n\
             CREATE INDEX ON t (id);\n\
             ALTER SEQUENCE s OWNED BY t.missing;\n\
             ALTER SEQUENCE s OWNED BY other.t.id;\n\
             ALTER TABLE missing ADD CONSTRAINT c UNIQUE (id);\n\
             ALTER TABLE t ADD UNIQUE (id);",
        );
        assert_eq!(catalog.len(), 1);
        let table = catalog.table(r#""public"."t""#).unwrap();
        assert!(table.indexes.is_empty());
        assert!(table.constraints.is_empty());
        assert_eq!(table.column("id").unwrap().sequence, None);
    }

    #[test]
    fn later_definition_wins() {
        let catalog = catalog("CREATE TABLE t (a bigint);\nCREATE TABLE public.t (b bigint);");
        assert_eq!(catalog.len(), 1);
        let table = catalog.table(r#""public"."t""#).unwrap();
        assert!(table.column("b").is_some());
        assert!(table.column("a").is_none());
    }
}
