//! Abstract Syntax Tree (AST) types for DDL statements.
//!
//! Nodes render themselves as canonical SQL through `Display`: identifiers
//! are always double-quoted and types use their lower-case PostgreSQL
//! spelling, so two inputs that differ only in quoting or case render the
//! same.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expression, Identifier, UnaryOp};
pub use statement::{
    AlterSequenceOwnedBy, AlterTable, AlterTableAction, ConstraintKind, CreateIndex,
    CreateSchema, CreateSequence, CreateTable, DataDefinition, IndexTarget, OrderDirection,
    SequenceName, SetSearchPath, Statement, TableConstraint, TableName,
};
pub use types::{ColumnConstraint, ColumnDefinition, DataType};
