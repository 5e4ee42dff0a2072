//! Schema diff engine.
//!
//! Each side's [`DataDefinition`](crate::ast::DataDefinition) is folded into
//! a [`Catalog`] of tables; [`generate_patch`] then compares the two
//! catalogs and renders the DDL that turns the source into the desired
//! schema.

mod catalog;
mod error;
mod patch;

pub use catalog::{Catalog, Column, ColumnDefault, Constraint, Index, Table};
pub use error::{DiffError, SideErrors};
pub use patch::generate_patch;
