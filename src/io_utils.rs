//! I/O helpers for the command layer.
//!
//! - **Paths**: `-` routes through stdin/stdout.
//! - **Encoding**: input is decoded to UTF-8 (BOM-aware) via `encoding_rs_io`;
//!   output can be transcoded from UTF-8 to any `encoding_rs` label.
//! - **Delimiters**: named aliases (`tab`, `comma`, ...) and extension-based
//!   defaults for `.tsv` files.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Expands delimiter aliases. Anything else is taken literally, so
/// multi-character delimiters such as `::` pass through unchanged.
pub fn parse_delimiter(value: &str) -> Result<String, String> {
    match value {
        "" => Err("Delimiter cannot be empty".to_string()),
        "tab" | "\\t" => Ok("\t".to_string()),
        "comma" => Ok(",".to_string()),
        "pipe" => Ok("|".to_string()),
        "semicolon" => Ok(";".to_string()),
        "space" => Ok(" ".to_string()),
        other => Ok(other.to_string()),
    }
}

pub fn parse_char(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        (None, _) => Err("Expected a single character, got an empty value".to_string()),
        _ => Err(format!("Expected a single character, got '{value}'")),
    }
}

/// Default delimiter for an input path when none is configured.
pub fn delimiter_for_path(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some("\t"),
        _ => None,
    }
}

pub fn printable(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\t' => "\\t".to_string(),
            '\n' => "\\n".to_string(),
            '\r' => "\\r".to_string(),
            other => other.to_string(),
        })
        .collect()
}

/// Reads the whole input (file or stdin) and decodes it to UTF-8.
pub fn read_decoded(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let source: Box<dyn Read> = if is_dash(path) {
        Box::new(io::stdin().lock())
    } else {
        Box::new(File::open(path).with_context(|| format!("Opening input file {path:?}"))?)
    };
    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(source);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .with_context(|| format!("Decoding {path:?} as {}", encoding.name()))?;
    Ok(text)
}

pub fn open_output(path: Option<&Path>, encoding: &'static Encoding) -> Result<Box<dyn Write>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    if encoding == UTF_8 {
        Ok(base)
    } else {
        Ok(Box::new(TranscodingWriter::new(base, encoding)))
    }
}

/// Re-encodes UTF-8 output. Bytes of a character split across `write` calls
/// are held back until the character is complete.
pub struct TranscodingWriter<W: Write> {
    inner: W,
    encoding: &'static Encoding,
    pending: Vec<u8>,
}

impl<W: Write> TranscodingWriter<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
        }
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.inner)
    }

    fn drain_complete(&mut self) -> io::Result<()> {
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(err) if err.error_len().is_some() => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Invalid UTF-8 sequence in output stream",
                ));
            }
            Err(err) => err.valid_up_to(),
        };
        if complete == 0 {
            return Ok(());
        }
        let bytes: Vec<u8> = self.pending.drain(..complete).collect();
        let text = String::from_utf8(bytes)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let (encoded, _, had_errors) = self.encoding.encode(&text);
        if had_errors {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to encode text using {}", self.encoding.name()),
            ));
        }
        self.inner.write_all(&encoded)
    }
}

impl<W: Write> Write for TranscodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_complete()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_complete()?;
        if !self.pending.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Incomplete UTF-8 sequence at end of output stream",
            ));
        }
        self.inner.flush()
    }
}
