//! DDL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! It recovers from errors at statement granularity.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::{Parser, StatementOutcome};
