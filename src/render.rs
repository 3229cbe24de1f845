//   Copyright (c) 2024-2026 Anton Kundenko <singaraiona@gmail.com>
//   All rights reserved.
//
//   Permission is hereby granted, free of charge, to any person obtaining a copy
//   of this software and associated documentation files (the "Software"), to deal
//   in the Software without restriction, including without limitation the rights
//   to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//   copies of the Software, and to permit persons to whom the Software is
//   furnished to do so, subject to the following conditions:
//
//   The above copyright notice and this permission notice shall be included in all
//   copies or substantial portions of the Software.
//
//   THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//   IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//   FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//   AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//   LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//   OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//   SOFTWARE.

//! Result rendering: horizontal table and vertical key/value layouts.
//!
//! Rows are fully materialized (up to the row cap) before anything is
//! written, so a failure while reading rows never leaves partial output.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

use crate::driver::{Column, Row, Rowset};
use crate::error::{Error, Result};
use crate::value::Value;

pub const MIN_COLUMN_WIDTH: usize = 4;
pub const MAX_COLUMN_WIDTH: usize = 50;
pub const VERTICAL_RULE_WIDTH: usize = 50;

const ELLIPSIS: &str = "...";
const COLUMN_SEPARATOR: &str = " \u{2502} ";
const RULE_JOINT: &str = "\u{2500}\u{253c}\u{2500}";
const RULE: &str = "\u{2500}";

/// Materialized result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        ResultSet { columns, rows }
    }

    /// Read at most `max_rows` rows. Rows past the cap are never pulled.
    pub fn collect<R: Rowset + ?Sized>(rowset: &mut R, max_rows: usize) -> Result<ResultSet> {
        let columns = rowset.columns().to_vec();
        let mut rows = Vec::new();
        while rows.len() < max_rows {
            let Some(row) = rowset.next_row()? else {
                break;
            };
            if row.len() != columns.len() {
                return Err(Error::RowShape {
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            rows.push(row);
        }
        Ok(ResultSet { columns, rows })
    }
}

/// Clip a cell to the maximum column width, marking the cut with an ellipsis.
pub fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_COLUMN_WIDTH {
        return s.to_string();
    }
    let keep = MAX_COLUMN_WIDTH - ELLIPSIS.len();
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Per-column width: header (floor 4) and every cell, capped at 50.
pub fn column_widths(headers: &[String], cells: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(c, header)| {
            let mut w = header.chars().count().max(MIN_COLUMN_WIDTH);
            for row in cells {
                w = w.max(row.get(c).map_or(0, |cell| cell.chars().count()));
            }
            w.min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

pub fn render<W: Write + ?Sized>(
    out: &mut W,
    result: &ResultSet,
    vertical: bool,
    elapsed: Option<Duration>,
) -> io::Result<()> {
    if vertical {
        write_vertical(out, result, elapsed)
    } else {
        write_table(out, result, elapsed)
    }
}

pub fn write_table<W: Write + ?Sized>(
    out: &mut W,
    result: &ResultSet,
    elapsed: Option<Duration>,
) -> io::Result<()> {
    let headers: Vec<String> = result.columns.iter().map(|c| truncate(&c.name)).collect();
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(|v| truncate(&v.to_string())).collect())
        .collect();
    let widths = column_widths(&headers, &cells);

    let mut buf = String::with_capacity(4096);
    push_line(&mut buf, &headers, &widths);

    let rule: Vec<String> = widths.iter().map(|&w| RULE.repeat(w)).collect();
    buf.push_str(&rule.join(RULE_JOINT));
    buf.push('\n');

    for row in &cells {
        push_line(&mut buf, row, &widths);
    }
    buf.push('\n');
    push_footer(&mut buf, result.rows.len(), elapsed);

    // Single write; the terminal sees the whole table at once
    out.write_all(buf.as_bytes())
}

pub fn write_vertical<W: Write + ?Sized>(
    out: &mut W,
    result: &ResultSet,
    elapsed: Option<Duration>,
) -> io::Result<()> {
    let name_width = result
        .columns
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut buf = String::with_capacity(4096);
    for (i, row) in result.rows.iter().enumerate() {
        let _ = writeln!(buf, "Row {}:", i + 1);
        let _ = writeln!(buf, "{}", RULE.repeat(VERTICAL_RULE_WIDTH));
        for (c, col) in result.columns.iter().enumerate() {
            let value = row.get(c).map(Value::to_string).unwrap_or_default();
            let _ = writeln!(buf, "{:<width$}: {value}", col.name, width = name_width);
        }
        buf.push('\n');
    }
    push_footer(&mut buf, result.rows.len(), elapsed);

    out.write_all(buf.as_bytes())
}

/// `Ok. N rows affected.` line for statements that return no rows.
pub fn write_affected<W: Write + ?Sized>(
    out: &mut W,
    affected: u64,
    elapsed: Option<Duration>,
) -> io::Result<()> {
    let mut buf = format!("Ok. {affected} rows affected.");
    push_elapsed(&mut buf, elapsed);
    buf.push_str("\n\n");
    out.write_all(buf.as_bytes())
}

pub fn write_error<W: Write + ?Sized>(out: &mut W, err: &Error) -> io::Result<()> {
    write!(out, "Code: 0. DB::Exception: {err}\n\n")
}

/// One padded line. Missing cells render empty; cells past the header are dropped.
fn push_line(buf: &mut String, cells: &[String], widths: &[usize]) {
    for (c, &width) in widths.iter().enumerate() {
        if c > 0 {
            buf.push_str(COLUMN_SEPARATOR);
        }
        let cell = cells.get(c).map_or("", String::as_str);
        let _ = write!(buf, "{cell:<width$}");
    }
    buf.push('\n');
}

fn push_footer(buf: &mut String, rows: usize, elapsed: Option<Duration>) {
    let _ = write!(buf, "{rows} rows in set.");
    push_elapsed(buf, elapsed);
    buf.push_str("\n\n");
}

fn push_elapsed(buf: &mut String, elapsed: Option<Duration>) {
    if let Some(elapsed) = elapsed {
        let _ = write!(buf, " Elapsed: {:.3} sec.", elapsed.as_secs_f64());
    }
}
