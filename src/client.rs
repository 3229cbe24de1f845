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

//! The interactive session loop.

use std::io::{self, Write};
use std::time::Instant;

use crate::command::{self, Dispatch};
use crate::driver::Driver;
use crate::error::Result;
use crate::executor;
use crate::input::{Accumulator, Input, LineReader};
use crate::session::{ServerInfo, Session};
use crate::value::Value;

/// One connected session: driver, session state and the pending statement.
pub struct Client<D> {
    driver: D,
    session: Session,
    accumulator: Accumulator,
}

impl<D: Driver> Client<D> {
    pub fn new(driver: D, session: Session) -> Self {
        Client {
            driver,
            session,
            accumulator: Accumulator::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// End the session and hand back the driver. Dropping it closes the connection.
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Ask the server for its version and uptime. Failures keep the defaults.
    pub fn fetch_server_info(&mut self) -> &ServerInfo {
        let deadline = Instant::now() + self.session.query_timeout;

        match query_scalar(&mut self.driver, "SELECT version()", deadline) {
            Ok(Some(version)) => self.session.server.version = version.to_string(),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cannot fetch server version"),
        }
        match query_scalar(&mut self.driver, "SELECT uptime()", deadline) {
            Ok(Some(uptime)) => {
                self.session.server.uptime = uptime.to_string().trim().parse().unwrap_or(0)
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "cannot fetch server uptime"),
        }

        &self.session.server
    }

    /// Handle one complete input. Returns `true` when the session should end.
    pub fn handle<W: Write + ?Sized>(&mut self, input: &str, out: &mut W) -> io::Result<bool> {
        match command::dispatch(input, &mut self.session, out)? {
            Dispatch::Handled { terminate } => Ok(terminate),
            Dispatch::Forward(sql) => {
                executor::execute(&mut self.driver, &self.session, &sql, out)?;
                Ok(false)
            }
        }
    }

    /// Read, dispatch and execute until an exit command or end of input.
    pub fn run<R, W>(&mut self, reader: &mut R, out: &mut W) -> Result<()>
    where
        R: LineReader + ?Sized,
        W: Write + ?Sized,
    {
        loop {
            reader.set_prompt(&self.session.prompt());

            let text = match self.accumulator.accumulate(reader)? {
                Input::Eof => break,
                Input::Empty => continue,
                Input::Complete(text) => text,
            };

            let terminate = self.handle(&text, out)?;
            out.flush()?;
            if terminate {
                break;
            }
        }
        Ok(())
    }
}

fn query_scalar<D: Driver + ?Sized>(
    driver: &mut D,
    sql: &str,
    deadline: Instant,
) -> Result<Option<Value>> {
    let mut rowset = driver.query(sql, deadline)?;
    Ok(rowset.next_row()?.and_then(|row| row.into_iter().next()))
}
