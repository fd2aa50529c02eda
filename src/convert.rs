use anyhow::{Context, Result};
use log::info;

use crate::{cli::ConvertArgs, io_utils, options, read, writer::Writer};

pub fn execute(args: &ConvertArgs) -> Result<()> {
    let table = read::load_table(&args.input, &args.dialect, 0)?;
    let output_encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
    let sink = io_utils::open_output(args.output.as_deref(), output_encoding)?;

    let registry = options::load_registry(args.dialect.dialects_file.as_deref())?;
    let mut writer = Writer::with_registry(sink, registry);
    writer
        .use_dialect(&args.output_dialect)
        .with_context(|| format!("Selecting output dialect '{}'", args.output_dialect))?;

    let columns = table.schema().record_columns().to_vec();
    let dialect = writer.configure_dialect(&args.output_dialect);
    if let Some(delimiter) = &args.output_delimiter {
        dialect.delimiter(delimiter.as_str());
    }
    dialect.column_names.clear();
    if !args.no_output_header {
        dialect.column_names(columns);
    }

    for (idx, record) in table.records().iter().enumerate() {
        let written = if args.no_output_header {
            writer.write_list(record.values().iter().cloned())
        } else {
            writer.write_row(record)
        };
        written.with_context(|| format!("Writing record {}", idx + 1))?;
    }

    writer.close().context("Flushing output")?;
    info!(
        "Converted {} record(s) from {:?} using dialect '{}'",
        table.len(),
        args.input,
        args.output_dialect
    );
    Ok(())
}
