use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::info;

use crate::{
    cli::{DialectArgs, OutputFormat, ReadArgs, ShapeArgs},
    io_utils, options,
    reader::{Reader, Table},
    table,
};

pub fn execute(args: &ReadArgs) -> Result<()> {
    let parsed = load_table(&args.input, &args.dialect, args.rows)?;
    let shown = args.limit.unwrap_or(usize::MAX).min(parsed.len());
    let records = &parsed.records()[..shown];

    match args.format {
        OutputFormat::Table => {
            let columns = parsed.schema().record_columns();
            let rows = records
                .iter()
                .map(|record| record.values().to_vec())
                .collect::<Vec<_>>();
            table::print_table(columns, &rows);
        }
        OutputFormat::Json => {
            for record in records {
                let line = serde_json::to_string(record).context("Serializing record as JSON")?;
                println!("{line}");
            }
        }
    }
    info!(
        "Displayed {} of {} record(s) from {:?}",
        shown,
        parsed.len(),
        args.input
    );
    Ok(())
}

pub fn execute_shape(args: &ShapeArgs) -> Result<()> {
    let (rows, columns) = load_table(&args.input, &args.dialect, 0)?.shape();
    println!("{rows}x{columns}");
    Ok(())
}

/// Reads `input` with the dialect described by `dialect`. Stdin and
/// non-UTF-8 inputs are decoded into memory first.
pub fn load_table(input: &Path, dialect: &DialectArgs, rows: usize) -> Result<Table> {
    let encoding = io_utils::resolve_encoding(dialect.input_encoding.as_deref())?;
    let registry = options::build_registry(dialect, Some(input))?;
    let mut reader = Reader::with_registry(registry);
    read_into(&mut reader, input, encoding, rows)?;
    Ok(reader.into_table())
}

fn read_into(
    reader: &mut Reader,
    input: &Path,
    encoding: &'static Encoding,
    rows: usize,
) -> Result<()> {
    if io_utils::is_dash(input) || encoding != UTF_8 {
        let text = io_utils::read_decoded(input, encoding)?;
        reader
            .read_str(&text, rows)
            .with_context(|| format!("Reading {input:?}"))?;
    } else {
        reader
            .read(input, rows)
            .with_context(|| format!("Reading {input:?}"))?;
    }
    Ok(())
}
