use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::io_utils::{parse_char, parse_delimiter};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Read and write delimited text under configurable dialects",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a delimited file and print its records
    Read(ReadArgs),
    /// Print the row and column counts of a delimited file
    Shape(ShapeArgs),
    /// Re-serialize a delimited file under another dialect
    Convert(ConvertArgs),
    /// List the registered dialects and their settings
    Dialects(DialectsArgs),
}

/// Dialect selection and per-run overrides shared by the reading commands.
#[derive(Debug, Clone, Default, Args)]
pub struct DialectArgs {
    /// Dialect to use (unix, excel, excel_tab, or one from --dialects-file)
    #[arg(long)]
    pub dialect: Option<String>,
    /// YAML file defining additional named dialects
    #[arg(long = "dialects-file")]
    pub dialects_file: Option<PathBuf>,
    /// Field delimiter; accepts multi-character strings and the aliases tab, comma, pipe, semicolon, space
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<String>,
    /// Quote character
    #[arg(long, value_parser = parse_char)]
    pub quote: Option<char>,
    /// Disable doubled-quote escaping
    #[arg(long = "no-double-quote")]
    pub no_double_quote: bool,
    /// Characters to trim from both ends of every field
    #[arg(long)]
    pub trim: Option<String>,
    /// Treat the first line as data rather than a header
    #[arg(long = "no-header")]
    pub no_header: bool,
    /// Skip blank lines instead of producing empty records
    #[arg(long = "skip-empty-rows")]
    pub skip_empty_rows: bool,
    /// Drop a single space following each delimiter
    #[arg(long = "skip-initial-space")]
    pub skip_initial_space: bool,
    /// Comma-separated columns to leave out of records
    #[arg(long = "ignore-columns", value_delimiter = ',')]
    pub ignore_columns: Vec<String>,
    /// Comma-separated column names for headerless input
    #[arg(long = "column-names", value_delimiter = ',')]
    pub column_names: Vec<String>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// Input file to parse ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to read (0 counts the rows in the input)
    #[arg(long, default_value_t = 0)]
    pub rows: usize,
    /// Maximum number of records to print
    #[arg(long)]
    pub limit: Option<usize>,
    /// Output format for records
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
    #[command(flatten)]
    pub dialect: DialectArgs,
}

#[derive(Debug, Args)]
pub struct ShapeArgs {
    /// Input file to inspect ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    #[command(flatten)]
    pub dialect: DialectArgs,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file to read ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Dialect used for writing
    #[arg(long = "output-dialect", default_value = "excel")]
    pub output_dialect: String,
    /// Delimiter used for writing (overrides the output dialect)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<String>,
    /// Write records without a header line
    #[arg(long = "no-output-header")]
    pub no_output_header: bool,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
    #[command(flatten)]
    pub dialect: DialectArgs,
}

#[derive(Debug, Args)]
pub struct DialectsArgs {
    /// YAML file defining additional named dialects
    #[arg(long = "dialects-file")]
    pub dialects_file: Option<PathBuf>,
    /// Write every registered dialect to this YAML file
    #[arg(long)]
    pub export: Option<PathBuf>,
}
