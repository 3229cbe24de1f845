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

//! Client-local special commands.

use std::io::{self, Write};

use crate::session::Session;

/// Escape sequence that clears the terminal and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// A classified complete input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    ToggleTiming,
    ToggleVertical,
    Clear,
    Use(String),
    /// Anything else goes to the server verbatim.
    Sql(String),
}

impl Command {
    /// Case-insensitive match of the whole trimmed input.
    pub fn parse(input: &str) -> Command {
        let trimmed = input.trim();

        if matches_any(trimmed, &["exit", "quit", "\\q"]) {
            return Command::Exit;
        }
        if matches_any(trimmed, &["help", "\\h"]) {
            return Command::Help;
        }
        if matches_any(trimmed, &["timing", "\\timing"]) {
            return Command::ToggleTiming;
        }
        if matches_any(trimmed, &["vertical", "\\G"]) {
            return Command::ToggleVertical;
        }
        if matches_any(trimmed, &["clear", "cls"]) {
            return Command::Clear;
        }

        let mut words = trimmed.split_whitespace();
        if let (Some(first), Some(name)) = (words.next(), words.next()) {
            if first.eq_ignore_ascii_case("use") {
                return Command::Use(name.to_string());
            }
        }

        Command::Sql(trimmed.to_string())
    }
}

fn matches_any(input: &str, names: &[&str]) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(input))
}

/// What the caller should do after dispatching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Handled { terminate: bool },
    Forward(String),
}

/// Run a special command against the session, or hand SQL back to the caller.
pub fn dispatch<W: Write + ?Sized>(
    input: &str,
    session: &mut Session,
    out: &mut W,
) -> io::Result<Dispatch> {
    let handled = Dispatch::Handled { terminate: false };

    match Command::parse(input) {
        Command::Exit => {
            writeln!(out, "Bye")?;
            Ok(Dispatch::Handled { terminate: true })
        }
        Command::Help => {
            write_help(out)?;
            Ok(handled)
        }
        Command::ToggleTiming => {
            if session.toggle_timing() {
                writeln!(out, "Timing is on.")?;
            } else {
                writeln!(out, "Timing is off.")?;
            }
            Ok(handled)
        }
        Command::ToggleVertical => {
            if session.toggle_vertical() {
                writeln!(out, "Vertical output mode enabled.")?;
            } else {
                writeln!(out, "Vertical output mode disabled.")?;
            }
            Ok(handled)
        }
        Command::Clear => {
            write!(out, "{CLEAR_SCREEN}")?;
            Ok(handled)
        }
        Command::Use(name) => {
            session.use_database(&name);
            tracing::debug!(database = %name, "active database changed locally");
            writeln!(out, "Ok.")?;
            Ok(handled)
        }
        Command::Sql(sql) => Ok(Dispatch::Forward(sql)),
    }
}

pub fn write_help<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "ClickHouse Commands")?;
    writeln!(out, "===================")?;
    writeln!(out)?;
    writeln!(out, "General:")?;
    writeln!(out, "  help, \\h               Show this help")?;
    writeln!(out, "  exit, quit, \\q         Exit")?;
    writeln!(out, "  clear, cls              Clear screen")?;
    writeln!(out, "  timing, \\timing        Toggle timing")?;
    writeln!(out, "  vertical, \\G           Toggle vertical output")?;
    writeln!(out)?;
    writeln!(out, "Database:")?;
    writeln!(out, "  USE <database>          Change database")?;
    writeln!(out, "  SHOW DATABASES          List databases")?;
    writeln!(out, "  SHOW TABLES             List tables")?;
    writeln!(out, "  SHOW CREATE TABLE t     Show table DDL")?;
    writeln!(out)?;
    writeln!(out, "Query Commands:")?;
    writeln!(out, "  SELECT ...              Query data")?;
    writeln!(out, "  INSERT INTO ...         Insert data")?;
    writeln!(out)?;
    writeln!(out, "DDL Commands:")?;
    writeln!(out, "  CREATE TABLE ...        Create table")?;
    writeln!(out, "  CREATE DATABASE ...     Create database")?;
    writeln!(out, "  DROP TABLE ...          Drop table")?;
    writeln!(out, "  ALTER TABLE ...         Alter table")?;
    writeln!(out, "  OPTIMIZE TABLE ...      Optimize table")?;
    writeln!(out)?;
    writeln!(out, "System Tables:")?;
    writeln!(out, "  SELECT * FROM system.databases")?;
    writeln!(out, "  SELECT * FROM system.tables")?;
    writeln!(out, "  SELECT * FROM system.columns WHERE database='db' AND table='t'")?;
    writeln!(out, "  SELECT * FROM system.processes      -- Show running queries")?;
    writeln!(out, "  SELECT * FROM system.query_log      -- Query log")?;
    writeln!(out)?;
    writeln!(out, "ClickHouse Specific:")?;
    writeln!(out, "  DESCRIBE TABLE t        Describe table structure")?;
    writeln!(out, "  EXISTS TABLE t          Check if table exists")?;
    writeln!(out, "  TRUNCATE TABLE t        Truncate table")?;
    writeln!(out, "  RENAME TABLE old TO new Rename table")?;
    writeln!(out)?;
    writeln!(out, "Statements end with ';' and may span several lines.")?;
    writeln!(out, "For more: https://clickhouse.com/docs/")
}
