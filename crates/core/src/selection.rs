//! Operator selection of one record from a parsed table.
//!
//! The table is rendered once, then the operator is asked for the `Index` of the
//! record to act on. With the default settings a single bad answer aborts the
//! selection; [`Selector::with_max_attempts`] allows re-prompting against the
//! same rendered table.

use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};

use log::debug;

use crate::error::{Error, Result};
use crate::table::{render, ParsedTable, INDEX_FIELD};

/// Column used to identify a record when nothing else is configured.
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "Name";

/// Progress of one selection flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    AwaitingQuery,
    AwaitingSelection { attempt: usize },
    Resolved(String),
    Aborted,
}

impl Display for SelectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionState::AwaitingQuery => f.write_str("awaiting query"),
            SelectionState::AwaitingSelection { attempt } => {
                write!(f, "awaiting selection (attempt {attempt})")
            }
            SelectionState::Resolved(identifier) => write!(f, "resolved `{identifier}`"),
            SelectionState::Aborted => f.write_str("aborted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    identifier_column: String,
    max_attempts: usize,
}

impl Default for Selector {
    fn default() -> Self {
        Self {
            identifier_column: DEFAULT_IDENTIFIER_COLUMN.to_string(),
            max_attempts: 1,
        }
    }
}

impl Selector {
    #[must_use]
    pub fn new(identifier_column: impl Into<String>) -> Self {
        Self {
            identifier_column: identifier_column.into(),
            ..Self::default()
        }
    }

    /// Allows up to `max_attempts` answers before giving up. Zero is treated as one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    #[must_use]
    pub fn identifier_column(&self) -> &str {
        &self.identifier_column
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Renders `table` to `output`, prompts for an index and returns the identifier
    /// of the chosen record.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyTable`] if there is nothing to choose from
    /// - [`Error::Input`] if the answer is not an integer (or input is exhausted)
    /// - [`Error::Index`] if the answer is outside `1..=table.len()`
    /// - [`Error::MissingField`] if the chosen record has no identifier column
    /// - [`Error::Stdio`] if reading or writing fails
    pub fn select<R: BufRead, W: Write>(
        &self,
        table: &ParsedTable,
        input: &mut R,
        output: &mut W,
    ) -> Result<String> {
        if table.is_empty() {
            debug!("Selection state: {}", SelectionState::Aborted);
            return Err(Error::EmptyTable);
        }

        writeln!(output, "{}", render(table))?;

        let mut attempt = 1;
        loop {
            debug!(
                "Selection state: {}",
                SelectionState::AwaitingSelection { attempt }
            );

            write!(output, "Enter the {INDEX_FIELD} to select: ")?;
            output.flush()?;

            let mut response = String::new();
            input.read_line(&mut response)?;

            match self.resolve(table, &response) {
                Ok(identifier) => {
                    debug!(
                        "Selection state: {}",
                        SelectionState::Resolved(identifier.clone())
                    );
                    return Ok(identifier);
                }
                Err(e) if e.is_selection_error() && attempt < self.max_attempts => {
                    writeln!(output, "{e}")?;
                    attempt += 1;
                }
                Err(e) => {
                    debug!("Selection state: {}", SelectionState::Aborted);
                    return Err(e);
                }
            }
        }
    }

    /// Resolves an operator response against `table` without any I/O.
    ///
    /// # Errors
    ///
    /// Same selection errors as [`Selector::select`].
    pub fn resolve(&self, table: &ParsedTable, response: &str) -> Result<String> {
        let index = parse_selection(response)?;

        let record = usize::try_from(index)
            .ok()
            .and_then(|i| table.by_index(i))
            .ok_or(Error::Index {
                index,
                len: table.len(),
            })?;

        record
            .get(&self.identifier_column)
            .map(ToString::to_string)
            .ok_or_else(|| Error::MissingField {
                index: record.index(),
                field: self.identifier_column.clone(),
            })
    }
}

/// Parses one line of operator input as an integer.
///
/// # Errors
///
/// Returns [`Error::Input`] if the trimmed response is not an integer.
pub fn parse_selection(response: &str) -> Result<i64> {
    let trimmed = response.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| Error::Input(trimmed.to_string()))
}

/// Selects by the `Name` column with a single attempt.
///
/// # Errors
///
/// See [`Selector::select`].
pub fn select<R: BufRead, W: Write>(
    table: &ParsedTable,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    Selector::default().select(table, input, output)
}
