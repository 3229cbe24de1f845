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

use std::io::{self, Write};
use std::time::Instant;

use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::render::{self, ResultSet};
use crate::session::Session;

/// Statements that return rows. Everything else reports affected rows.
const QUERY_PREFIXES: &[&str] = &[
    "SELECT", "SHOW", "DESC", "DESCRIBE", "EXISTS", "EXPLAIN", "WITH",
];

pub fn is_query(sql: &str) -> bool {
    let upper = sql.trim().to_ascii_uppercase();
    QUERY_PREFIXES.iter().any(|prefix| upper.starts_with(prefix))
}

/// Run one statement and write its result or error to `out`.
///
/// Driver failures are rendered and swallowed; only failures to write the
/// output are returned.
pub fn execute<D, W>(driver: &mut D, session: &Session, sql: &str, out: &mut W) -> io::Result<()>
where
    D: Driver + ?Sized,
    W: Write + ?Sized,
{
    let sql = sql.trim();
    if sql.is_empty() {
        return Ok(());
    }

    let started = Instant::now();
    let deadline = started + session.query_timeout;
    let query = is_query(sql);
    tracing::debug!(query, sql, "executing statement");

    let outcome = if query {
        run_query(driver, session, sql, started, deadline, out)
    } else {
        run_command(driver, session, sql, started, deadline, out)
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(Error::Io(e)) => Err(e),
        Err(e) => {
            tracing::debug!(error = %e, elapsed = ?started.elapsed(), "statement failed");
            render::write_error(out, &e)
        }
    }
}

fn run_query<D, W>(
    driver: &mut D,
    session: &Session,
    sql: &str,
    started: Instant,
    deadline: Instant,
    out: &mut W,
) -> Result<()>
where
    D: Driver + ?Sized,
    W: Write + ?Sized,
{
    let result = {
        let mut rowset = driver.query(sql, deadline)?;
        ResultSet::collect(&mut *rowset, session.max_rows)?
    };
    let elapsed = started.elapsed();
    tracing::debug!(rows = result.rows.len(), ?elapsed, "query finished");

    render::render(out, &result, session.vertical, session.timing.then_some(elapsed))?;
    Ok(())
}

fn run_command<D, W>(
    driver: &mut D,
    session: &Session,
    sql: &str,
    started: Instant,
    deadline: Instant,
    out: &mut W,
) -> Result<()>
where
    D: Driver + ?Sized,
    W: Write + ?Sized,
{
    let affected = driver.exec(sql, deadline)?;
    let elapsed = started.elapsed();
    tracing::debug!(affected, ?elapsed, "command finished");

    render::write_affected(out, affected, session.timing.then_some(elapsed))?;
    Ok(())
}
