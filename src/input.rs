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

//! Statement accumulation: turns successive input lines into complete
//! statements or single-line client commands.

use std::io::{self, BufRead};

use crate::error::{Error, Result};

pub const TERMINATOR: char = ';';
pub const CONTINUATION_PROMPT: &str = ":-] ";

/// Commands accepted on a first line without a terminator.
const IMMEDIATE_COMMANDS: &[&str] = &["exit", "quit", "\\q", "help", "\\h", "timing", "\\timing"];

/// One event from a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    Line(String),
    /// The user cancelled the current line (Ctrl-C).
    Interrupted,
    Eof,
}

/// A source of input lines with a mutable prompt.
pub trait LineReader {
    fn read_line(&mut self) -> io::Result<ReadEvent>;
    /// Prompt shown on the next read.
    fn set_prompt(&mut self, prompt: &str);
}

/// Outcome of one accumulation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A statement without its terminator, or a single-line command.
    Complete(String),
    /// Nothing to do; read again.
    Empty,
    /// The line source is exhausted.
    Eof,
}

pub fn is_immediate_command(line: &str) -> bool {
    IMMEDIATE_COMMANDS
        .iter()
        .any(|cmd| cmd.eq_ignore_ascii_case(line))
}

/// Buffers lines until a statement terminator is seen.
#[derive(Debug, Default)]
pub struct Accumulator {
    lines: Vec<String>,
}

impl Accumulator {
    pub fn new() -> Self {
        Accumulator::default()
    }

    pub fn accumulate<R: LineReader + ?Sized>(&mut self, reader: &mut R) -> Result<Input> {
        self.lines.clear();

        loop {
            let line = match reader.read_line() {
                Ok(ReadEvent::Line(line)) => line,
                Ok(ReadEvent::Interrupted) => {
                    self.lines.clear();
                    return Ok(Input::Empty);
                }
                Ok(ReadEvent::Eof) => {
                    if !self.lines.is_empty() {
                        tracing::debug!(
                            lines = self.lines.len(),
                            "discarding unterminated statement at end of input"
                        );
                    }
                    self.lines.clear();
                    return Ok(Input::Eof);
                }
                Err(e) => {
                    self.lines.clear();
                    return Err(Error::Input(e));
                }
            };

            let trimmed = line.trim();
            if self.lines.is_empty() {
                if trimmed.is_empty() {
                    return Ok(Input::Empty);
                }
                if is_immediate_command(trimmed) {
                    return Ok(Input::Complete(trimmed.to_string()));
                }
            }

            let terminated = trimmed.ends_with(TERMINATOR);
            self.lines.push(line);
            if terminated {
                let statement = join_statement(&self.lines);
                self.lines.clear();
                return Ok(Input::Complete(statement));
            }

            reader.set_prompt(CONTINUATION_PROMPT);
        }
    }
}

/// Join buffered lines, drop one trailing terminator and outer whitespace.
fn join_statement(lines: &[String]) -> String {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    trimmed
        .strip_suffix(TERMINATOR)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Reads lines from a script or pipe. Prompts are ignored.
pub struct ScriptReader<R> {
    inner: R,
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(inner: R) -> Self {
        ScriptReader { inner }
    }
}

impl<R: BufRead> LineReader for ScriptReader<R> {
    fn read_line(&mut self) -> io::Result<ReadEvent> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(ReadEvent::Eof);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(ReadEvent::Line(line))
    }

    fn set_prompt(&mut self, _prompt: &str) {}
}
