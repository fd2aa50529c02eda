//! Quote-aware field tokenizer.
//!
//! [`tokenize()`] splits one line into fields under a [`Dialect`]. The scan is
//! a single pass that tracks *quote parity*: the number of quote characters
//! seen in the current field. A delimiter match only ends a field while the
//! parity is even, so delimiters inside a quoted span are kept as text.
//!
//! With doubled-quote escaping enabled, a quote that immediately follows the
//! quote which closed a span is treated as an escaped literal and parity drops
//! back to odd. Quote characters are otherwise kept as text. Only a field that
//! is enclosed entirely by one span (opening at its first character, closing at
//! its last) is unquoted: the enclosing pair is removed and doubled quotes
//! inside it collapse to one. A field that still has odd parity at its end
//! (unterminated quote) is emitted verbatim; malformed input never fails.
//!
//! The result is normalized to the expected column count: short lines are
//! padded with empty fields and long lines truncated. A column count of zero
//! means no schema has been established yet and disables normalization.

use crate::dialect::Dialect;

/// Splits `line` into exactly `column_count` fields (any count when
/// `column_count` is zero).
pub fn tokenize(line: &str, dialect: &Dialect, column_count: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new(); column_count];
    }

    let delimiter = dialect.delimiter.as_str();
    let mut fields = Vec::with_capacity(column_count);
    let mut field = FieldBuffer::default();
    let mut position = 0;

    while position < line.len() {
        let rest = &line[position..];
        if field.outside_quotes() && !delimiter.is_empty() && rest.starts_with(delimiter) {
            fields.push(field.finish(dialect));
            position += delimiter.len();
            if dialect.skip_initial_space && line[position..].starts_with(' ') {
                position += 1;
            }
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        field.push(ch, dialect);
        position += ch.len_utf8();
    }

    if !field.is_empty() {
        fields.push(field.finish(dialect));
    }

    normalize(fields, column_count)
}

fn normalize(mut fields: Vec<String>, column_count: usize) -> Vec<String> {
    if fields.len() < column_count {
        fields.resize(column_count, String::new());
    } else if column_count != 0 {
        fields.truncate(column_count);
    }
    fields
}

#[derive(Debug, Default)]
struct FieldBuffer {
    raw: String,
    quote_parity: usize,
    just_closed: bool,
}

impl FieldBuffer {
    fn outside_quotes(&self) -> bool {
        self.quote_parity % 2 == 0
    }

    fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn push(&mut self, ch: char, dialect: &Dialect) {
        self.raw.push(ch);
        if ch != dialect.quote_character {
            self.just_closed = false;
            return;
        }
        if dialect.double_quote && self.just_closed {
            // second half of a doubled quote: back inside the span
            self.quote_parity -= 1;
            self.just_closed = false;
        } else {
            self.quote_parity += 1;
            self.just_closed = self.outside_quotes();
        }
    }

    fn finish(&mut self, dialect: &Dialect) -> String {
        let raw = std::mem::take(&mut self.raw);
        let balanced = self.outside_quotes();
        self.quote_parity = 0;
        self.just_closed = false;

        let trimmed = dialect.trim(&raw);
        if !balanced {
            return trimmed.to_string();
        }
        match unquote(trimmed, dialect) {
            Some(value) => dialect.trim(&value).to_string(),
            None => trimmed.to_string(),
        }
    }
}

/// Strips the quotes enclosing `text` when a single span covers all of it.
/// Returns `None` when the text is not enclosed, or when a quote inside the
/// span is anything other than a doubled-quote escape.
fn unquote(text: &str, dialect: &Dialect) -> Option<String> {
    let quote = dialect.quote_character;
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == quote {
            if !dialect.double_quote || chars.next() != Some(quote) {
                return None;
            }
        }
        value.push(ch);
    }
    Some(value)
}
