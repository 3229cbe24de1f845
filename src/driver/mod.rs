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

//! The driver boundary.
//!
//! The client only talks to the database through [`Driver`] and reads results
//! through [`Rowset`]. Every call carries a deadline; a call that misses it
//! fails with [`Error::Timeout`](crate::Error::Timeout).

pub mod pg;

use std::time::Instant;

use crate::error::Result;
use crate::value::Value;

pub use pg::PgDriver;

/// Column descriptor of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column { name: name.into() }
    }
}

pub type Row = Vec<Value>;

/// A result set being read from the driver.
pub trait Rowset {
    fn columns(&self) -> &[Column];
    /// Next row, or `None` once the result set is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>>;
}

pub trait Driver {
    fn ping(&mut self, deadline: Instant) -> Result<()>;
    /// Run a row-returning statement.
    fn query(&mut self, sql: &str, deadline: Instant) -> Result<Box<dyn Rowset + '_>>;
    /// Run a statement and report the number of affected rows.
    fn exec(&mut self, sql: &str, deadline: Instant) -> Result<u64>;
}
