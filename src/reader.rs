//! Row reader: turns a line source into a [`Table`] of keyed [`Record`]s.
//!
//! A read session freezes a copy of the active dialect, determines how many
//! records to expect (explicit hint, or a counting pre-scan followed by a
//! rewind), derives the headers from the first line (or from explicit /
//! positional names for headerless input) and then tokenizes each following
//! line against the fixed column count.
//!
//! Records are keyed by integer slots into a [`Schema`] shared by every record
//! of the table, so header strings are stored once and never borrowed.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader, Cursor, Seek, SeekFrom},
    path::Path,
    sync::Arc,
};

use log::{debug, info};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    dialect::Dialect,
    error::{DialectError, Result},
    registry::DialectRegistry,
    tokenizer::tokenize,
};

/// Column layout of one read session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    headers: Vec<String>,
    names: Vec<String>,
    slots: Vec<Option<usize>>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Builds the layout for `headers`, dropping ignored columns. Repeated
    /// header names share one slot.
    pub fn new(headers: Vec<String>, dialect: &Dialect) -> Self {
        let mut names = Vec::new();
        let mut index = HashMap::new();
        let mut slots = Vec::with_capacity(headers.len());
        for header in &headers {
            if dialect.is_ignored(header) {
                slots.push(None);
                continue;
            }
            let slot = *index.entry(header.clone()).or_insert_with(|| {
                names.push(header.clone());
                names.len() - 1
            });
            slots.push(Some(slot));
        }
        Self {
            headers,
            names,
            slots,
            index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Names present in every record, in header order.
    pub fn record_columns(&self) -> &[String] {
        &self.names
    }

    pub fn slot_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn empty_values(&self) -> Vec<String> {
        vec![String::new(); self.names.len()]
    }
}

/// One row keyed by column name.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<String>,
}

impl Record {
    fn from_fields(schema: &Arc<Schema>, fields: Vec<String>) -> Self {
        let mut values = schema.empty_values();
        for (position, value) in fields.into_iter().enumerate() {
            if let Some(Some(slot)) = schema.slots.get(position) {
                values[*slot] = value;
            }
        }
        Self {
            schema: Arc::clone(schema),
            values,
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.schema
            .slot_of(column)
            .map(|slot| self.values[slot].as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.schema.slot_of(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        self.schema.record_columns()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.schema
            .record_columns()
            .iter()
            .zip(&self.values)
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.columns() == other.columns() && self.values == other.values
    }
}

impl Eq for Record {}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Reader output: headers, records and the expected row count.
#[derive(Debug, Clone, Default)]
pub struct Table {
    schema: Arc<Schema>,
    records: Vec<Record>,
    expected_row_count: usize,
}

impl Table {
    pub fn headers(&self) -> &[String] {
        self.schema.headers()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn expected_row_count(&self) -> usize {
        self.expected_row_count
    }

    /// `(expected_row_count, column_count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.expected_row_count, self.schema.column_count())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for Table {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Reads delimited text through a dialect registry it owns.
#[derive(Debug, Clone, Default)]
pub struct Reader {
    registry: DialectRegistry,
    table: Table,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: DialectRegistry) -> Self {
        Self {
            registry,
            table: Table::default(),
        }
    }

    pub fn configure_dialect(&mut self, name: &str) -> &mut Dialect {
        self.registry.configure_dialect(name)
    }

    pub fn configure_default_dialect(&mut self) -> &mut Dialect {
        self.registry.configure_default_dialect()
    }

    pub fn use_dialect(&mut self, name: &str) -> Result<()> {
        self.registry.use_dialect(name)
    }

    pub fn list_dialects(&self) -> Vec<String> {
        self.registry.list_dialects()
    }

    pub fn get_dialect(&self, name: &str) -> Result<&Dialect> {
        self.registry.get_dialect(name)
    }

    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DialectRegistry {
        &mut self.registry
    }

    /// Reads `path` with the active dialect. A `rows` value of zero means
    /// "count the rows first".
    ///
    /// Input must be UTF-8; a leading byte order mark is dropped. Other
    /// encodings fail with [`DialectError::Io`] of kind
    /// [`io::ErrorKind::InvalidData`]. Decode such sources first (for example
    /// with `encoding_rs_io::DecodeReaderBytesBuilder`) and pass the text to
    /// [`Reader::read_str`].
    pub fn read(&mut self, path: impl AsRef<Path>, rows: usize) -> Result<&Table> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DialectError::IoOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Reading {path:?} with dialect '{}'", self.registry.current_name());
        self.read_from(BufReader::new(file), rows)
    }

    pub fn read_str(&mut self, input: &str, rows: usize) -> Result<&Table> {
        self.read_from(Cursor::new(input.as_bytes()), rows)
    }

    /// Reads from any seekable source; see [`Reader::read`] for the encoding
    /// requirements. The source is rewound to its starting position after the
    /// row pre-count.
    pub fn read_from<R>(&mut self, mut source: R, rows: usize) -> Result<&Table>
    where
        R: BufRead + Seek,
    {
        let dialect = self.registry.current()?.clone();
        dialect.validate()?;
        debug!("Frozen dialect for session: {dialect:?}");

        let expected_row_count = if rows > 0 {
            rows
        } else {
            let start = source.stream_position()?;
            let counted = count_rows(&mut source, &dialect)?;
            source.seek(SeekFrom::Start(start))?;
            if dialect.header {
                counted.saturating_sub(1)
            } else {
                counted
            }
        };
        debug!("Expecting {expected_row_count} row(s)");

        let mut lines = Lines::new(source, dialect.terminator_byte());
        let first_line = lines.next().transpose()?.map(strip_bom);
        let first_fields = tokenize(first_line.as_deref().unwrap_or(""), &dialect, 0);

        let (headers, pending) = if dialect.header {
            (first_fields, None)
        } else if !dialect.column_names.is_empty() {
            (dialect.column_names.clone(), first_line)
        } else {
            let positional: Vec<String> =
                (0..first_fields.len()).map(|idx| idx.to_string()).collect();
            (positional, first_line)
        };
        debug!("Headers: {headers:?}");

        let schema = Arc::new(Schema::new(headers, &dialect));
        let column_count = schema.column_count();
        let mut records = Vec::new();

        for line in pending.into_iter().map(Ok).chain(lines) {
            if records.len() == expected_row_count {
                break;
            }
            let line = line?;
            if line.is_empty() && dialect.skip_empty_rows {
                continue;
            }
            let fields = tokenize(&line, &dialect, column_count);
            records.push(Record::from_fields(&schema, fields));
        }

        info!(
            "Read {} record(s) across {} column(s)",
            records.len(),
            column_count
        );
        self.table = Table {
            schema,
            records,
            expected_row_count,
        };
        Ok(&self.table)
    }

    pub fn rows(&self) -> &[Record] {
        self.table.records()
    }

    pub fn cols(&self) -> &[String] {
        self.table.headers()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.table.shape()
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

fn count_rows<R: BufRead>(source: &mut R, dialect: &Dialect) -> Result<usize> {
    let mut count = 0;
    for line in Lines::new(source, dialect.terminator_byte()) {
        let line = line?;
        if !line.is_empty() || !dialect.skip_empty_rows {
            count += 1;
        }
    }
    Ok(count)
}

fn strip_bom(line: String) -> String {
    match line.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => line,
    }
}

/// Splits a byte source on the line terminator and strips a trailing `\r`.
struct Lines<R> {
    source: R,
    terminator: u8,
}

impl<R> Lines<R> {
    fn new(source: R, terminator: u8) -> Self {
        Self { source, terminator }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = Vec::new();
        match self.source.read_until(self.terminator, &mut buffer) {
            Ok(0) => None,
            Ok(_) => {
                if buffer.last() == Some(&self.terminator) {
                    buffer.pop();
                }
                if buffer.last() == Some(&b'\r') {
                    buffer.pop();
                }
                Some(
                    String::from_utf8(buffer)
                        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err)),
                )
            }
            Err(err) => Some(Err(err)),
        }
    }
}
