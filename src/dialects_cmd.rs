//! Listing and exporting registered dialects.

use anyhow::{Context, Result};
use log::info;

use crate::{cli::DialectsArgs, config::DialectsFile, io_utils::printable, options, table};

pub fn execute(args: &DialectsArgs) -> Result<()> {
    let registry = options::load_registry(args.dialects_file.as_deref())?;

    let headers = [
        "name",
        "delimiter",
        "quote",
        "double_quote",
        "header",
        "skip_empty_rows",
        "trim",
    ]
    .map(String::from);
    let mut rows = Vec::new();
    let mut export = DialectsFile::default();
    for name in registry.list_dialects() {
        let dialect = registry.get_dialect(&name)?;
        let marker = if name == registry.current_name() { "*" } else { "" };
        rows.push(vec![
            format!("{name}{marker}"),
            printable(&dialect.delimiter),
            dialect.quote_character.to_string(),
            dialect.double_quote.to_string(),
            dialect.header.to_string(),
            dialect.skip_empty_rows.to_string(),
            printable(&dialect.trim_characters.iter().collect::<String>()),
        ]);
        export.dialects.insert(name, dialect.clone());
    }
    table::print_table(&headers, &rows);

    if let Some(path) = &args.export {
        export
            .save(path)
            .with_context(|| format!("Exporting dialects to {path:?}"))?;
        info!("Exported {} dialect(s) to {:?}", export.dialects.len(), path);
    }
    Ok(())
}
