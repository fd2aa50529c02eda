//! Row writer: serializes rows under the active dialect.
//!
//! The first [`Writer::write_row`] call freezes a copy of the active dialect
//! for the rest of the session and, when the dialect names columns, emits the
//! header line once. Values are joined with the delimiter verbatim; no quoting
//! or escaping is applied, so callers pass pre-escaped text.

use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use itertools::Itertools;
use log::debug;

use crate::{
    dialect::Dialect,
    error::{DialectError, Result},
    reader::Record,
    registry::DialectRegistry,
};

/// Input accepted by [`Writer::write_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Values in output order.
    List(Vec<String>),
    /// Values keyed by column name, emitted in the dialect's `column_names`
    /// order. Missing names produce empty text.
    Mapping(HashMap<String, String>),
}

impl From<Vec<String>> for Row {
    fn from(values: Vec<String>) -> Self {
        Row::List(values)
    }
}

impl From<Vec<&str>> for Row {
    fn from(values: Vec<&str>) -> Self {
        Row::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Row {
    fn from(values: [&str; N]) -> Self {
        Row::List(values.iter().map(|value| value.to_string()).collect())
    }
}

impl From<HashMap<String, String>> for Row {
    fn from(values: HashMap<String, String>) -> Self {
        Row::Mapping(values)
    }
}

impl From<BTreeMap<String, String>> for Row {
    fn from(values: BTreeMap<String, String>) -> Self {
        Row::Mapping(values.into_iter().collect())
    }
}

impl From<&Record> for Row {
    fn from(record: &Record) -> Self {
        Row::Mapping(
            record
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }
}

pub struct Writer<W: Write> {
    sink: W,
    registry: DialectRegistry,
    session: Option<Dialect>,
    header_written: bool,
    pending: Vec<String>,
}

impl Writer<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| DialectError::IoOpenFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Writing to {path:?}");
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> Writer<W> {
    pub fn from_writer(sink: W) -> Self {
        Self::with_registry(sink, DialectRegistry::new())
    }

    pub fn with_registry(sink: W, registry: DialectRegistry) -> Self {
        Self {
            sink,
            registry,
            session: None,
            header_written: false,
            pending: Vec::new(),
        }
    }

    /// Changes made after the first row is written do not affect the
    /// running session.
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

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    pub fn write_row(&mut self, row: impl Into<Row>) -> Result<()> {
        let dialect = match self.session.take() {
            Some(dialect) => dialect,
            None => self.start_session()?,
        };
        let result = self.emit(&dialect, row.into());
        self.session = Some(dialect);
        result
    }

    pub fn write_list<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write_row(Row::List(values.into_iter().map(Into::into).collect()))
    }

    pub fn write_map(&mut self, values: HashMap<String, String>) -> Result<()> {
        self.write_row(Row::Mapping(values))
    }

    /// Flushes buffered output and hands back the sink.
    pub fn close(mut self) -> Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }

    fn start_session(&self) -> Result<Dialect> {
        let dialect = self.registry.current()?.clone();
        dialect.validate()?;
        debug!(
            "Frozen dialect '{}' for writing: {dialect:?}",
            self.registry.current_name()
        );
        Ok(dialect)
    }

    fn emit(&mut self, dialect: &Dialect, row: Row) -> Result<()> {
        if !self.header_written {
            if !dialect.column_names.is_empty() {
                let header = format_line(dialect, &dialect.column_names);
                self.sink.write_all(header.as_bytes())?;
            }
            self.header_written = true;
        }

        match row {
            Row::List(values) => self.pending = values,
            Row::Mapping(values) => {
                self.pending.extend(
                    dialect
                        .column_names
                        .iter()
                        .map(|name| values.get(name).cloned().unwrap_or_default()),
                );
            }
        }

        let line = format_line(dialect, &self.pending);
        self.pending.clear();
        self.sink.write_all(line.as_bytes())?;
        Ok(())
    }
}

fn format_line(dialect: &Dialect, values: &[String]) -> String {
    let mut line = values.iter().join(&dialect.delimiter);
    line.push(dialect.line_terminator);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(writer: Writer<Vec<u8>>) -> String {
        String::from_utf8(writer.close().unwrap()).unwrap()
    }

    #[test]
    fn header_is_emitted_once_before_data() {
        let mut writer = Writer::from_writer(Vec::new());
        writer.configure_dialect("excel").column_names(["c1", "c2"]);
        writer.write_row(["x", "y"]).unwrap();
        writer.write_row(["x", "y"]).unwrap();
        assert!(writer.header_written());
        assert_eq!(output(writer), "c1,c2\nx,y\nx,y\n");
    }

    #[test]
    fn no_header_without_column_names() {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_list(["1", "2", "3"]).unwrap();
        assert_eq!(output(writer), "1,2,3\n");
    }

    #[test]
    fn mapping_rows_follow_column_name_order() {
        let mut writer = Writer::from_writer(Vec::new());
        writer.configure_dialect("excel").column_names(["b", "a", "c"]);
        let mut row = HashMap::new();
        row.insert("a".to_string(), "1".to_string());
        row.insert("b".to_string(), "2".to_string());
        row.insert("extra".to_string(), "ignored".to_string());
        writer.write_map(row).unwrap();
        assert_eq!(output(writer), "b,a,c\n2,1,\n");
    }

    #[test]
    fn uses_selected_dialect_delimiter_and_terminator() {
        let mut writer = Writer::from_writer(Vec::new());
        writer
            .configure_dialect("log")
            .delimiter("::")
            .line_terminator(';');
        writer.write_row(vec!["1", "DEBUG", "started"]).unwrap();
        assert_eq!(output(writer), "1::DEBUG::started;");
    }

    #[test]
    fn values_are_written_without_escaping() {
        let mut writer = Writer::from_writer(Vec::new());
        writer.use_dialect("excel_tab").unwrap();
        writer.write_row(["\"quoted\"", "a,b"]).unwrap();
        assert_eq!(output(writer), "\"quoted\"\ta,b\n");
    }

    #[test]
    fn dialect_is_frozen_after_first_row() {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_row(["a", "b"]).unwrap();
        writer.configure_dialect("excel").delimiter(";");
        writer.use_dialect("excel_tab").unwrap();
        writer.write_row(["c", "d"]).unwrap();
        assert_eq!(output(writer), "a,b\nc,d\n");
    }

    #[test]
    fn default_dialect_is_configurable_without_a_name() {
        let mut writer = Writer::from_writer(Vec::new());
        writer.configure_default_dialect().delimiter("|").column_names(["a", "b"]);
        writer.write_row(["1", "2"]).unwrap();
        assert_eq!(output(writer), "a|b\n1|2\n");
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        let mut writer = Writer::from_writer(Vec::new());
        assert!(matches!(
            writer.use_dialect("missing"),
            Err(DialectError::UnknownDialect(_))
        ));
        assert!(writer.get_dialect("missing").is_err());
        assert_eq!(writer.list_dialects(), vec!["excel", "excel_tab", "unix"]);
    }

    #[test]
    fn create_fails_for_unwritable_path() {
        let err = Writer::create("/definitely/not/a/dir/out.csv")
            .err()
            .unwrap();
        assert!(matches!(err, DialectError::IoOpenFailure { .. }));
    }
}
