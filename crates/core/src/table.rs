//! Parsing of whitespace-aligned tables printed by remote listing commands.
//!
//! The expected shape is the one PowerShell's `Format-Table` produces:
//!
//! ```text
//! Name State   CPUUsage Status
//! ---- -----   -------- ------
//! vm1  Running 5        Operating normally
//! ```
//!
//! Line 1 holds the column headers, line 2 is a rule line that is skipped, and
//! every following line becomes one [`Record`]. Columns are split on runs of
//! whitespace, so values containing spaces are only safe when a
//! [`StatusRule`] collapses them into a single token first.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the synthetic 1-based position field every record carries.
pub const INDEX_FIELD: &str = "Index";

/// Literal phrase-to-code substitution applied to a data line before it is tokenized.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusRule {
    pub phrase: String,
    pub code: String,
}

impl StatusRule {
    pub fn new(phrase: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            code: code.into(),
        }
    }
}

/// The rules applied when nothing else is configured.
#[must_use]
pub fn default_status_rules() -> Vec<StatusRule> {
    vec![StatusRule::new("Operating normally", "OK")]
}

/// Checks that a rule set can be applied repeatedly without changing its result.
///
/// # Errors
///
/// Returns [`Error::InvalidStatusRule`] if a phrase is empty, a code is empty or
/// contains whitespace, a code is not shorter than its phrase, or a code contains
/// any configured phrase.
pub fn validate_status_rules(rules: &[StatusRule]) -> Result<()> {
    let invalid = |rule: &StatusRule, reason: &str| Error::InvalidStatusRule {
        phrase: rule.phrase.clone(),
        code: rule.code.clone(),
        reason: reason.to_string(),
    };

    for rule in rules {
        if rule.phrase.is_empty() {
            return Err(invalid(rule, "phrase may not be empty"));
        }

        if rule.code.is_empty() || rule.code.chars().any(char::is_whitespace) {
            return Err(invalid(rule, "code must be a single non-empty token"));
        }

        if rule.code.len() >= rule.phrase.len() {
            return Err(invalid(rule, "code must be shorter than its phrase"));
        }

        if let Some(other) = rules.iter().find(|other| rule.code.contains(&other.phrase)) {
            return Err(invalid(
                rule,
                &format!("code contains the phrase \"{}\"", other.phrase),
            ));
        }
    }

    Ok(())
}

/// Replaces every occurrence of every rule's phrase in `line` with its code,
/// repeating until no phrase is left.
///
/// A replacement can join with its neighbours into another phrase, so one pass
/// is not enough. Validated rules only ever shorten the line, so this stops.
#[must_use]
pub fn normalize_status(line: &str, rules: &[StatusRule]) -> String {
    let mut current = line.to_string();

    loop {
        let next = rules.iter().fold(current.clone(), |line, rule| {
            if line.contains(&rule.phrase) {
                line.replace(&rule.phrase, &rule.code)
            } else {
                line
            }
        });

        if next.len() >= current.len() {
            return next;
        }
        current = next;
    }
}

/// One data row of a parsed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    index: usize,
    fields: IndexMap<String, String>,
}

impl Record {
    /// 1-based position of this record in the table it was parsed into.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw value of a header column. Never returns the synthetic index.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of any key including [`INDEX_FIELD`], formatted for display.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        if key == INDEX_FIELD {
            Some(self.index.to_string())
        } else {
            self.get(key).map(ToString::to_string)
        }
    }

    /// All keys in display order: [`INDEX_FIELD`] followed by the header columns.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(INDEX_FIELD).chain(self.fields.keys().map(String::as_str))
    }

    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }
}

/// Ordered records produced by a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTable {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl ParsedTable {
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by its 1-based index.
    #[must_use]
    pub fn by_index(&self, index: usize) -> Option<&Record> {
        index.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Column order used for display. The first record is authoritative; an empty
    /// table falls back to the parsed headers.
    #[must_use]
    pub fn display_columns(&self) -> Vec<String> {
        match self.records.first() {
            Some(first) => first.keys().map(ToString::to_string).collect(),
            None => std::iter::once(INDEX_FIELD.to_string())
                .chain(self.headers.iter().cloned())
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ParsedTable {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Converts listing output into a [`ParsedTable`].
#[derive(Debug, Clone)]
pub struct TableParser {
    status_rules: Vec<StatusRule>,
    strict_separator: bool,
}

impl Default for TableParser {
    fn default() -> Self {
        Self {
            status_rules: default_status_rules(),
            strict_separator: false,
        }
    }
}

impl TableParser {
    #[must_use]
    pub fn new(status_rules: Vec<StatusRule>, strict_separator: bool) -> Self {
        Self {
            status_rules,
            strict_separator,
        }
    }

    /// Parses `raw_text`: headers from line 1, line 2 skipped, one record per
    /// remaining line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if there are fewer than two lines, if a header is
    /// named like the synthetic [`INDEX_FIELD`], or if strict separator checking
    /// is on and line 2 is not a rule of dashes.
    pub fn parse(&self, raw_text: &str) -> Result<ParsedTable> {
        let lines: Vec<&str> = raw_text.split('\n').collect();

        let [header_line, separator_line, data_lines @ ..] = lines.as_slice() else {
            return Err(Error::format_error(format!(
                "expected a header line and a separator line, got {} line(s)",
                lines.len()
            )));
        };

        if self.strict_separator && !is_separator(separator_line) {
            return Err(Error::format_error(format!(
                "line 2 is not a separator: \"{}\"",
                separator_line.trim()
            )));
        }

        let headers: Vec<String> = header_line
            .split_whitespace()
            .map(ToString::to_string)
            .collect();

        if headers.iter().any(|header| header == INDEX_FIELD) {
            return Err(Error::format_error(format!(
                "header line has a column named `{INDEX_FIELD}`, which is reserved"
            )));
        }

        let records: Vec<Record> = data_lines
            .iter()
            .enumerate()
            .map(|(position, line)| self.parse_record(position + 1, &headers, line))
            .collect();

        debug!(
            "Parsed {} record(s) with columns {:?}",
            records.len(),
            headers
        );

        Ok(ParsedTable { headers, records })
    }

    fn parse_record(&self, index: usize, headers: &[String], line: &str) -> Record {
        let normalized = normalize_status(line, &self.status_rules);
        let mut tokens = normalized.split_whitespace();

        let fields = headers
            .iter()
            .map(|header| (header.clone(), tokens.next().unwrap_or_default().to_string()))
            .collect();

        Record { index, fields }
    }
}

fn is_separator(line: &str) -> bool {
    !line.trim().is_empty() && line.chars().all(|c| c == '-' || c.is_whitespace())
}

/// Parses with the default status rules and no separator check.
///
/// # Errors
///
/// See [`TableParser::parse`].
pub fn parse(raw_text: &str) -> Result<ParsedTable> {
    TableParser::default().parse(raw_text)
}

/// Renders a table as aligned text: a header row, a dash rule, then one row per record.
#[must_use]
pub fn render(table: &ParsedTable) -> String {
    let columns = table.display_columns();

    let rows: Vec<Vec<String>> = table
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| record.value(column).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_row = |cells: &[String]| -> String {
        let line = cells
            .iter()
            .zip(&widths)
            .zip(&columns)
            .map(|((cell, &width), column)| {
                if column == INDEX_FIELD {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let rule: Vec<String> = columns
        .iter()
        .map(|column| "-".repeat(column.chars().count()))
        .collect();

    let mut lines = vec![format_row(&columns), format_row(&rule)];
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines.join("\n")
}
