//! Plain-text table rendering for terminal output.

use std::borrow::Cow;

use itertools::Itertools;

const GAP: &str = "  ";

pub fn render_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| display_width(header.as_ref()).max(3))
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell.as_ref()));
        }
    }

    let mut output = String::new();
    push_line(&mut output, headers, &widths);
    let rule = widths.iter().map(|width| "-".repeat(*width)).collect_vec();
    push_line(&mut output, &rule, &widths);
    for row in rows {
        push_line(&mut output, row, &widths);
    }
    output
}

pub fn print_table<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) {
    print!("{}", render_table(headers, rows));
}

fn push_line<S: AsRef<str>>(output: &mut String, cells: &[S], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let text = sanitize(cell.as_ref());
            let padding = width.saturating_sub(display_width(&text));
            format!("{text}{}", " ".repeat(padding))
        })
        .join(GAP);
    output.push_str(line.trim_end_matches(' '));
    output.push('\n');
}

/// Character count, ignoring ANSI colour sequences.
fn display_width(value: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for ch in value.chars() {
        match (in_escape, ch) {
            (false, '\u{1b}') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }
    width
}

fn sanitize(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
