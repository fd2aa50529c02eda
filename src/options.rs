//! Turns command-line dialect flags into a configured registry.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::DialectArgs,
    io_utils,
    registry::{DEFAULT_DIALECT, DialectRegistry},
};

/// Builds a registry with the requested dialect active and the command-line
/// overrides applied to it. A `.tsv` input read through the default dialect
/// switches to a tab delimiter unless one was given explicitly.
pub fn build_registry(args: &DialectArgs, input: Option<&Path>) -> Result<DialectRegistry> {
    let mut registry = load_registry(args.dialects_file.as_deref())?;

    let name = args.dialect.as_deref().unwrap_or(DEFAULT_DIALECT);
    registry
        .use_dialect(name)
        .with_context(|| format!("Selecting dialect '{name}'"))?;

    let dialect = registry.configure_dialect(name);
    let inferred = match args.dialect {
        None => input.and_then(io_utils::delimiter_for_path),
        Some(_) => None,
    };
    if let Some(delimiter) = &args.delimiter {
        dialect.delimiter(delimiter.as_str());
    } else if let Some(delimiter) = inferred {
        debug!("Using delimiter {:?} inferred from {input:?}", delimiter);
        dialect.delimiter(delimiter);
    }
    if let Some(quote) = args.quote {
        dialect.quote_character(quote);
    }
    if args.no_double_quote {
        dialect.double_quote(false);
    }
    if let Some(trim) = &args.trim {
        dialect.trim_characters(trim.chars());
    }
    if args.no_header {
        dialect.header(false);
    }
    if args.skip_empty_rows {
        dialect.skip_empty_rows(true);
    }
    if args.skip_initial_space {
        dialect.skip_initial_space(true);
    }
    dialect
        .ignore_columns(non_blank(&args.ignore_columns))
        .column_names(non_blank(&args.column_names));
    dialect
        .validate()
        .with_context(|| format!("Validating dialect '{name}'"))?;

    Ok(registry)
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().map(|value| value.trim()).filter(|value| !value.is_empty())
}

pub fn load_registry(dialects_file: Option<&Path>) -> Result<DialectRegistry> {
    let mut registry = DialectRegistry::new();
    if let Some(path) = dialects_file {
        let loaded = registry
            .extend_from_file(path)
            .with_context(|| format!("Loading dialects from {path:?}"))?;
        info!("Loaded {} dialect(s) from {:?}", loaded.len(), path);
    }
    Ok(registry)
}
