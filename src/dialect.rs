//! Dialect configuration for delimited text.
//!
//! A [`Dialect`] bundles every rule the tokenizer, reader and writer need:
//! delimiter (one or more characters), quote character, doubled-quote
//! escaping, trim set, line terminator, header handling, empty-row policy and
//! column filtering/naming. Builder methods are chainable so a dialect can be
//! configured in place through a registry handle:
//!
//! ```
//! use csv_dialect::Reader;
//!
//! let mut reader = Reader::new();
//! reader
//!     .configure_dialect("logs")
//!     .delimiter("::")
//!     .trim_characters([' ', '\t'])
//!     .skip_empty_rows(true);
//! ```
//!
//! Dialects also deserialize from YAML; every field is optional and falls
//! back to [`Dialect::default`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

pub const DEFAULT_DELIMITER: &str = ",";
pub const DEFAULT_QUOTE: char = '"';
pub const DEFAULT_LINE_TERMINATOR: char = '\n';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    pub delimiter: String,
    pub skip_initial_space: bool,
    pub line_terminator: char,
    pub quote_character: char,
    pub double_quote: bool,
    pub trim_characters: Vec<char>,
    pub header: bool,
    pub skip_empty_rows: bool,
    pub ignore_columns: BTreeSet<String>,
    pub column_names: Vec<String>,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            skip_initial_space: false,
            line_terminator: DEFAULT_LINE_TERMINATOR,
            quote_character: DEFAULT_QUOTE,
            double_quote: true,
            trim_characters: Vec::new(),
            header: true,
            skip_empty_rows: false,
            ignore_columns: BTreeSet::new(),
            column_names: Vec::new(),
        }
    }
}

impl Dialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(&mut self, delimiter: impl Into<String>) -> &mut Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn skip_initial_space(&mut self, skip: bool) -> &mut Self {
        self.skip_initial_space = skip;
        self
    }

    pub fn line_terminator(&mut self, terminator: char) -> &mut Self {
        self.line_terminator = terminator;
        self
    }

    pub fn quote_character(&mut self, quote: char) -> &mut Self {
        self.quote_character = quote;
        self
    }

    pub fn double_quote(&mut self, enabled: bool) -> &mut Self {
        self.double_quote = enabled;
        self
    }

    /// Appends characters to the trim set. Trimming is active whenever the
    /// set is non-empty.
    pub fn trim_characters<I>(&mut self, characters: I) -> &mut Self
    where
        I: IntoIterator<Item = char>,
    {
        self.trim_characters.extend(characters);
        self
    }

    pub fn header(&mut self, header: bool) -> &mut Self {
        self.header = header;
        self
    }

    pub fn skip_empty_rows(&mut self, skip: bool) -> &mut Self {
        self.skip_empty_rows = skip;
        self
    }

    pub fn ignore_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Appends explicit column names. Used as headers for headerless input
    /// and as the header line (and mapping order) when writing.
    pub fn column_names<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_names.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn trimming_enabled(&self) -> bool {
        !self.trim_characters.is_empty()
    }

    pub fn is_ignored(&self, column: &str) -> bool {
        self.ignore_columns.contains(column)
    }

    /// Strips trim-set characters from both ends of `value`.
    pub fn trim<'a>(&self, value: &'a str) -> &'a str {
        if !self.trimming_enabled() {
            return value;
        }
        value.trim_matches(|ch| self.trim_characters.contains(&ch))
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(DialectError::InvalidDialect(
                "delimiter cannot be empty".to_string(),
            ));
        }
        if !self.line_terminator.is_ascii() {
            return Err(DialectError::InvalidDialect(format!(
                "line terminator {:?} must be an ASCII character",
                self.line_terminator
            )));
        }
        Ok(())
    }

    pub(crate) fn terminator_byte(&self) -> u8 {
        // validate() guarantees the terminator is ASCII
        self.line_terminator as u8
    }
}
