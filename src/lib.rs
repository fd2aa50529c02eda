//! Dialect-driven reading and writing of delimited text.
//!
//! The library is built around a quote-aware [`tokenize()`] function, a
//! [`Reader`] that assembles keyed [`Record`]s from a line source, and a
//! [`Writer`] that serializes rows. Both own a [`DialectRegistry`] holding the
//! `unix`, `excel` and `excel_tab` presets plus any dialects configured at
//! runtime or loaded from YAML.
//!
//! ```
//! use csv_dialect::Reader;
//!
//! let mut reader = Reader::new();
//! let table = reader.read_str("name,note\n\"Doe, John\",hello\n", 0).unwrap();
//! assert_eq!(table.records()[0].get("name"), Some("Doe, John"));
//! assert_eq!(table.shape(), (1, 2));
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod dialect;
pub mod dialects_cmd;
pub mod error;
pub mod io_utils;
pub mod options;
pub mod read;
pub mod reader;
pub mod registry;
pub mod table;
pub mod tokenizer;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    dialect::Dialect,
    error::DialectError,
    reader::{Reader, Record, Schema, Table},
    registry::DialectRegistry,
    tokenizer::tokenize,
    writer::{Row, Writer},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_dialect", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Read(args) => read::execute(&args),
        Commands::Shape(args) => read::execute_shape(&args),
        Commands::Convert(args) => convert::execute(&args),
        Commands::Dialects(args) => dialects_cmd::execute(&args),
    }
}
