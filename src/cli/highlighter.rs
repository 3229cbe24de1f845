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

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use chq::Command;

const SQL_KEYWORDS: &[&str] = &[
    "SELECT",
    "FROM",
    "WHERE",
    "PREWHERE",
    "GROUP",
    "BY",
    "ORDER",
    "LIMIT",
    "AS",
    "ON",
    "JOIN",
    "LEFT",
    "RIGHT",
    "INNER",
    "OUTER",
    "CROSS",
    "ARRAY",
    "HAVING",
    "DISTINCT",
    "UNION",
    "ALL",
    "INSERT",
    "INTO",
    "VALUES",
    "FORMAT",
    "SETTINGS",
    "UPDATE",
    "SET",
    "DELETE",
    "CREATE",
    "DATABASE",
    "TABLE",
    "DROP",
    "ALTER",
    "RENAME",
    "TRUNCATE",
    "OPTIMIZE",
    "FINAL",
    "ENGINE",
    "PARTITION",
    "PRIMARY",
    "KEY",
    "TTL",
    "VIEW",
    "MATERIALIZED",
    "IF",
    "CASE",
    "WHEN",
    "THEN",
    "ELSE",
    "END",
    "IN",
    "BETWEEN",
    "LIKE",
    "ILIKE",
    "IS",
    "NULL",
    "EXISTS",
    "ASC",
    "DESC",
    "DESCRIBE",
    "SHOW",
    "TABLES",
    "DATABASES",
    "EXPLAIN",
    "OFFSET",
    "WITH",
    "USE",
    "OVER",
];

const FUNCTIONS: &[&str] = &[
    "SUM",
    "AVG",
    "MIN",
    "MAX",
    "COUNT",
    "UNIQ",
    "ANY",
    "ARGMAX",
    "ARGMIN",
    "QUANTILE",
    "GROUPARRAY",
    "TOSTRING",
    "TODATE",
    "NOW",
    "VERSION",
    "UPTIME",
];

const OPERATORS: &[&str] = &["AND", "OR", "NOT"];

fn keyword_style() -> Style {
    Style::new().bold().fg(Color::Blue)
}
fn function_style() -> Style {
    Style::new().bold().fg(Color::Cyan)
}
fn string_style() -> Style {
    Style::new().fg(Color::Green)
}
fn number_style() -> Style {
    Style::new().fg(Color::Magenta)
}
fn operator_style() -> Style {
    Style::new().bold().fg(Color::Blue)
}
fn command_style() -> Style {
    Style::new().fg(Color::Yellow)
}
fn comment_style() -> Style {
    Style::new().italic().fg(Color::DarkGray)
}
fn format_name_style() -> Style {
    Style::new().fg(Color::LightPurple)
}

pub struct SqlHighlighter;

impl Highlighter for SqlHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        // Client commands: style the whole line
        if !matches!(Command::parse(line), Command::Sql(_)) {
            styled.push((command_style(), line.to_string()));
            return styled;
        }

        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut i = 0;
        // Set after `FORMAT`; the next word names an output format.
        let mut expect_format = false;

        while i < len {
            let b = bytes[i];

            // `--` comment runs to the end of the line
            if b == b'-' && bytes.get(i + 1) == Some(&b'-') {
                styled.push((comment_style(), line[i..].to_string()));
                break;
            }

            // `/* ... */` comment, possibly unterminated
            if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
                let end = line[i + 2..].find("*/").map_or(len, |p| i + 2 + p + 2);
                styled.push((comment_style(), line[i..end].to_string()));
                i = end;
                continue;
            }

            // Quoted string literal or identifier
            if b == b'\'' || b == b'`' {
                let start = i;
                i += 1;
                while i < len && bytes[i] != b {
                    i += 1;
                }
                if i < len {
                    i += 1;
                }
                styled.push((string_style(), line[start..i].to_string()));
                continue;
            }

            // Number literal
            if b.is_ascii_digit() || (b == b'-' && i + 1 < len && bytes[i + 1].is_ascii_digit()) {
                let start = i;
                if b == b'-' {
                    i += 1;
                }
                while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                if i < len && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
                    styled.push((Style::default(), line[start..i].to_string()));
                } else {
                    styled.push((number_style(), line[start..i].to_string()));
                }
                continue;
            }

            // Word (identifier or keyword)
            if b.is_ascii_alphabetic() || b == b'_' {
                let start = i;
                while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let word = &line[start..i];
                let upper = word.to_ascii_uppercase();

                if expect_format {
                    expect_format = false;
                    styled.push((format_name_style(), word.to_string()));
                    continue;
                }
                expect_format = upper == "FORMAT";

                if FUNCTIONS.contains(&upper.as_str()) {
                    styled.push((function_style(), word.to_string()));
                } else if OPERATORS.contains(&upper.as_str()) {
                    styled.push((operator_style(), word.to_string()));
                } else if SQL_KEYWORDS.contains(&upper.as_str()) {
                    styled.push((keyword_style(), word.to_string()));
                } else {
                    styled.push((Style::default(), word.to_string()));
                }
                continue;
            }

            if b == b'=' || b == b'<' || b == b'>' || b == b'!' {
                let start = i;
                i += 1;
                if i < len && bytes[i] == b'=' {
                    i += 1;
                }
                styled.push((operator_style(), line[start..i].to_string()));
                continue;
            }

            // Everything else; copy the whole UTF-8 sequence
            let ch_len = line[i..].chars().next().map_or(1, char::len_utf8);
            styled.push((Style::default(), line[i..i + ch_len].to_string()));
            i += ch_len;
        }

        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(line: &str) -> Vec<(Style, String)> {
        SqlHighlighter.highlight(line, 0).buffer
    }

    #[test]
    fn line_comment_runs_to_end() {
        let out = spans("SELECT 1 -- answer; not a terminator");
        let last = out.last().unwrap();
        assert_eq!(last.0, comment_style());
        assert_eq!(last.1, "-- answer; not a terminator");
    }

    #[test]
    fn block_comment_is_one_span() {
        let out = spans("SELECT /* hint */ 1");
        assert!(out.contains(&(comment_style(), "/* hint */".to_string())));
        assert!(out.contains(&(number_style(), "1".to_string())));
    }

    #[test]
    fn format_name_after_format() {
        let out = spans("SELECT 1 FORMAT JSONEachRow");
        assert!(out.contains(&(keyword_style(), "FORMAT".to_string())));
        assert!(out.contains(&(format_name_style(), "JSONEachRow".to_string())));
    }

    #[test]
    fn commands_are_one_span() {
        assert_eq!(spans("\\G"), vec![(command_style(), "\\G".to_string())]);
    }
}
