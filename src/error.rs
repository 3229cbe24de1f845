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

use std::io;

use thiserror::Error;

/// Errors produced by the client, its configuration and the driver boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection parameters that cannot be turned into a connection string.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Opening or pinging the server failed.
    #[error("cannot connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },
    /// The server rejected a statement.
    #[error("{0}")]
    Server(String),
    /// Transport or protocol failure inside the driver.
    #[error("{0}")]
    Driver(tokio_postgres::Error),
    #[error("Timeout exceeded: statement did not complete before the deadline")]
    Timeout,
    /// A value could not be converted while materializing a row.
    #[error("cannot read column '{column}': {reason}")]
    Scan { column: String, reason: String },
    #[error("row has {found} values, expected {expected}")]
    RowShape { expected: usize, found: usize },
    #[error("TLS setup failed: {0}")]
    Tls(String),
    /// Reading from the line editor failed for a reason other than end-of-input.
    #[error("cannot read input: {0}")]
    Input(#[source] io::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db) => Error::Server(db.message().to_string()),
            None => Error::Driver(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
