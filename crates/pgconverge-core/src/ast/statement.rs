//! DDL statement AST types.
//!
//! Every statement renders itself (through `Display`) as canonical SQL
//! terminated by `;`. That rendering is what the diff engine compares and
//! emits.

use core::fmt;

use super::{ColumnDefinition, DataType, Expression, Identifier};

/// Writes `items` separated by `", "`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    /// Schema, when written `schema.table`.
    pub schema: Option<Identifier>,
    /// Table name.
    pub table: Identifier,
}

impl TableName {
    /// Creates an unqualified table name.
    #[must_use]
    pub fn new(table: impl Into<Identifier>) -> Self {
        Self {
            schema: None,
            table: table.into(),
        }
    }

    /// Creates a schema-qualified table name.
    #[must_use]
    pub fn qualified(schema: impl Into<Identifier>, table: impl Into<Identifier>) -> Self {
        Self {
            schema: Some(schema.into()),
            table: table.into(),
        }
    }

    /// Sets the schema if none was written.
    pub fn set_schema(&mut self, schema: &Identifier) {
        if self.schema.is_none() {
            self.schema = Some(schema.clone());
        }
    }

    /// Returns a copy qualified with `schema` if none was written.
    #[must_use]
    pub fn with_default_schema(&self, schema: &Identifier) -> Self {
        let mut name = self.clone();
        name.set_schema(schema);
        name
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.table)
    }
}

/// A possibly schema-qualified sequence name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceName {
    /// Schema, when written `schema.sequence`.
    pub schema: Option<Identifier>,
    /// Sequence name.
    pub name: Identifier,
}

impl SequenceName {
    /// Creates an unqualified sequence name.
    #[must_use]
    pub fn new(name: impl Into<Identifier>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for SequenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.name)
    }
}

/// `CREATE SCHEMA name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSchema {
    pub name: Identifier,
}

impl fmt::Display for CreateSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE SCHEMA {};", self.name)
    }
}

/// `CREATE TABLE name (columns...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    /// The table name.
    pub table_name: TableName,
    /// Column definitions, in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl CreateTable {
    /// Sets the table's schema if none was written.
    pub fn set_schema(&mut self, schema: &Identifier) {
        self.table_name.set_schema(schema);
    }
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CREATE TABLE {} (", self.table_name)?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "    {column}")?;
        }
        if !self.columns.is_empty() {
            f.write_str("\n")?;
        }
        f.write_str(");")
    }
}

/// Sort direction of an index target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

/// One entry of an index's target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTarget {
    /// A column identifier, a function call or a grouped expression.
    pub expr: Expression,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl IndexTarget {
    /// Creates an ascending target on a column.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            expr: Expression::identifier(name),
            direction: OrderDirection::Asc,
        }
    }
}

impl fmt::Display for IndexTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if self.direction == OrderDirection::Desc {
            f.write_str(" DESC")?;
        }
        Ok(())
    }
}

/// `CREATE [UNIQUE] INDEX ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CreateIndex {
    pub unique: bool,
    pub concurrently: bool,
    pub if_not_exists: bool,
    /// Index name; PostgreSQL generates one when omitted.
    pub name: Option<Identifier>,
    pub table_name: TableName,
    /// Access method (`btree`, `gin`, ...).
    pub using: Option<Identifier>,
    pub targets: Vec<IndexTarget>,
}

impl fmt::Display for CreateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.unique {
            f.write_str("UNIQUE ")?;
        }
        f.write_str("INDEX ")?;
        if self.concurrently {
            f.write_str("CONCURRENTLY ")?;
        }
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        if let Some(name) = &self.name {
            write!(f, "{name} ")?;
        }
        write!(f, "ON {}", self.table_name)?;
        if let Some(method) = &self.using {
            write!(f, " USING {method}")?;
        }
        f.write_str(" (")?;
        write_list(f, &self.targets)?;
        f.write_str(");")
    }
}

/// `CREATE SEQUENCE name [options]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSequence {
    pub name: SequenceName,
    /// `AS data_type`.
    pub data_type: Option<DataType>,
    pub start_with: Option<i64>,
    pub increment_by: Option<i64>,
    pub no_minvalue: bool,
    pub no_maxvalue: bool,
    pub cache: Option<i64>,
}

impl CreateSequence {
    /// Creates a sequence with no options.
    #[must_use]
    pub const fn new(name: SequenceName) -> Self {
        Self {
            name,
            data_type: None,
            start_with: None,
            increment_by: None,
            no_minvalue: false,
            no_maxvalue: false,
            cache: None,
        }
    }
}

impl fmt::Display for CreateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE SEQUENCE {}", self.name)?;
        if let Some(data_type) = &self.data_type {
            write!(f, "\n    AS {data_type}")?;
        }
        if let Some(start) = self.start_with {
            write!(f, "\n    START WITH {start}")?;
        }
        if let Some(increment) = self.increment_by {
            write!(f, "\n    INCREMENT BY {increment}")?;
        }
        if self.no_minvalue {
            f.write_str("\n    NO MINVALUE")?;
        }
        if self.no_maxvalue {
            f.write_str("\n    NO MAXVALUE")?;
        }
        if let Some(cache) = self.cache {
            write!(f, "\n    CACHE {cache}")?;
        }
        f.write_str(";")
    }
}

/// `ALTER SEQUENCE name OWNED BY [schema.]table.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterSequenceOwnedBy {
    pub sequence_name: SequenceName,
    pub table_name: TableName,
    pub column: Identifier,
}

impl fmt::Display for AlterSequenceOwnedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ALTER SEQUENCE {} OWNED BY {}.{};",
            self.sequence_name, self.table_name, self.column
        )
    }
}

/// Table constraint kinds that take part in diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    PrimaryKey,
}

impl ConstraintKind {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unique => "UNIQUE",
            Self::PrimaryKey => "PRIMARY KEY",
        }
    }
}

/// `[CONSTRAINT name] {UNIQUE | PRIMARY KEY} (columns...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub name: Option<Identifier>,
    pub kind: ConstraintKind,
    pub columns: Vec<Identifier>,
}

impl fmt::Display for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {name} ")?;
        }
        write!(f, "{} (", self.kind.as_str())?;
        write_list(f, &self.columns)?;
        f.write_str(")")
    }
}

/// A single `ALTER TABLE` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction {
    /// `ADD [CONSTRAINT name] ...`.
    AddConstraint(TableConstraint),
    /// `ALTER [COLUMN] col SET DEFAULT expr`.
    AlterColumnSetDefault { column: Identifier, expr: Expression },
}

impl fmt::Display for AlterTableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddConstraint(constraint) => write!(f, "ADD {constraint}"),
            Self::AlterColumnSetDefault { column, expr } => {
                write!(f, "ALTER COLUMN {column} SET DEFAULT {expr}")
            }
        }
    }
}

/// `ALTER TABLE [ONLY] name action, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTable {
    pub only: bool,
    pub table_name: TableName,
    pub actions: Vec<AlterTableAction>,
}

impl fmt::Display for AlterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ALTER TABLE ")?;
        if self.only {
            f.write_str("ONLY ")?;
        }
        write!(f, "{} ", self.table_name)?;
        write_list(f, &self.actions)?;
        f.write_str(";")
    }
}

/// `SET search_path = value, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSearchPath {
    pub values: Vec<Expression>,
}

impl SetSearchPath {
    /// Returns the first schema named by the path, if it is an identifier
    /// or a non-empty string literal.
    #[must_use]
    pub fn first_schema(&self) -> Option<Identifier> {
        match self.values.first()? {
            Expression::Identifier(ident) => Some(ident.clone()),
            Expression::String(literal) => {
                let value = literal
                    .strip_prefix('\'')
                    .and_then(|rest| rest.strip_suffix('\''))?
                    .replace("''", "'");
                (!value.is_empty()).then(|| Identifier::new(value))
            }
            _ => None,
        }
    }
}

impl fmt::Display for SetSearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SET search_path = ")?;
        write_list(f, &self.values)?;
        f.write_str(";")
    }
}

/// A parsed DDL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateSchema(CreateSchema),
    CreateTable(CreateTable),
    CreateIndex(CreateIndex),
    CreateSequence(CreateSequence),
    AlterSequenceOwnedBy(AlterSequenceOwnedBy),
    AlterTable(AlterTable),
    SetSearchPath(SetSearchPath),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateSchema(s) => write!(f, "{s}"),
            Self::CreateTable(s) => write!(f, "{s}"),
            Self::CreateIndex(s) => write!(f, "{s}"),
            Self::CreateSequence(s) => write!(f, "{s}"),
            Self::AlterSequenceOwnedBy(s) => write!(f, "{s}"),
            Self::AlterTable(s) => write!(f, "{s}"),
            Self::SetSearchPath(s) => write!(f, "{s}"),
        }
    }
}

/// The statements of one DDL document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataDefinition {
    pub statements: Vec<Statement>,
}

impl fmt::Display for DataDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}
