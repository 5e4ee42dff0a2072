//! Error type returned when either input fails to parse.

use thiserror::Error;

use crate::parser::ParseError;

/// The parse errors of one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideErrors {
    /// Display name of the input.
    pub input_name: String,
    pub errors: Vec<ParseError>,
}

impl SideErrors {
    /// Creates the error list for one input.
    #[must_use]
    pub fn new(input_name: impl Into<String>, errors: Vec<ParseError>) -> Self {
        Self {
            input_name: input_name.into(),
            errors,
        }
    }

    /// Returns true if the input parsed cleanly.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parsing failed on at least one side, so no patch was produced.
///
/// `Display` gives a one-line summary; [`DiffError::detail`] lists every
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.source_side, .desired_side))]
pub struct DiffError {
    source_side: SideErrors,
    desired_side: SideErrors,
}

fn summarize(source: &SideErrors, desired: &SideErrors) -> String {
    let parts: Vec<String> = [("source", source), ("desired", desired)]
        .into_iter()
        .filter(|(_, side)| !side.is_empty())
        .map(|(label, side)| format!("{label} has {} errors", side.errors.len()))
        .collect();
    if parts.is_empty() {
        String::from("no parse errors")
    } else {
        parts.join("; ")
    }
}

impl DiffError {
    /// Creates an error from both sides' parse errors.
    #[must_use]
    pub const fn new(source: SideErrors, desired: SideErrors) -> Self {
        Self {
            source_side: source,
            desired_side: desired,
        }
    }

    /// Errors found in the source input.
    #[must_use]
    pub fn source_errors(&self) -> &[ParseError] {
        &self.source_side.errors
    }

    /// Errors found in the desired input.
    #[must_use]
    pub fn desired_errors(&self) -> &[ParseError] {
        &self.desired_side.errors
    }

    /// Total number of errors on both sides.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.source_side.errors.len() + self.desired_side.errors.len()
    }

    /// Multi-line report: for each input with errors, a count line followed
    /// by one indented line per error.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut lines = Vec::new();
        for side in [&self.source_side, &self.desired_side] {
            if side.is_empty() {
                continue;
            }
            lines.push(format!("{} has {} errors", side.input_name, side.errors.len()));
            lines.extend(side.errors.iter().map(|error| format!("    {error}")));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(input: &str, line: usize, message: &str) -> ParseError {
        ParseError::new(input, line, message)
    }

    #[test]
    fn summary_lists_both_sides() {
        let err = DiffError::new(
            SideErrors::new("old.sql", vec![error("old.sql", 1, "a")]),
            SideErrors::new("new.sql", vec![error("new.sql", 2, "b"), error("new.sql", 3, "c")]),
        );
        assert_eq!(err.to_string(), "source has 1 errors; desired has 2 errors");
        assert_eq!(err.error_count(), 3);
        assert_eq!(err.source_errors().len(), 1);
        assert_eq!(err.desired_errors().len(), 2);
    }

    #[test]
    fn summary_omits_clean_side() {
        let err = DiffError::new(
            SideErrors::new("old.sql", vec![]),
            SideErrors::new("new.sql", vec![error("new.sql", 2, "b")]),
        );
        assert_eq!(err.to_string(), "desired has 1 errors");
    }

    #[test]
    fn detail_lists_every_error() {
        let err = DiffError::new(
            SideErrors::new("old.sql", vec![error("old.sql", 4, "unknown statement DROP")]),
            SideErrors::new(
                "new.sql",
                vec![
                    error("new.sql", 1, "expected identifier, found ,"),
                    error("new.sql", 7, "illegal token @"),
                ],
            ),
        );
        assert_eq!(
            err.detail(),
            "old.sql has 1 errors\n    old.sql:4: unknown statement DROP\nnew.sql has 2 errors\n    new.sql:1: expected identifier, found ,\n    new.sql:7: illegal token @"
        );
    }
}
