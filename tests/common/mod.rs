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

//! Scripted driver and line source shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::time::Instant;

use chq::render::ResultSet;
use chq::{Column, Driver, Error, LineReader, ReadEvent, Result, Row, Rowset};

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Canned answer for the next driver call.
pub enum Reply {
    Rows(ResultSet),
    /// Columns plus a row stream that fails after the given rows.
    Broken(ResultSet, Error),
    Affected(u64),
    Fail(Error),
}

#[derive(Default)]
pub struct FakeDriver {
    replies: VecDeque<Reply>,
    /// Every statement received, tagged by the call that received it.
    pub calls: Vec<(&'static str, String)>,
    /// Number of rows pulled out of the last rowset.
    pub pulled: usize,
}

impl FakeDriver {
    pub fn new() -> Self {
        FakeDriver::default()
    }

    pub fn reply(mut self, reply: Reply) -> Self {
        self.replies.push_back(reply);
        self
    }

    fn next_reply(&mut self) -> Result<Reply> {
        self.replies
            .pop_front()
            .ok_or_else(|| Error::Server("no reply scripted".into()))
    }
}

impl Driver for FakeDriver {
    fn ping(&mut self, _deadline: Instant) -> Result<()> {
        Ok(())
    }

    fn query(&mut self, sql: &str, _deadline: Instant) -> Result<Box<dyn Rowset + '_>> {
        self.calls.push(("query", sql.to_string()));
        self.pulled = 0;
        match self.next_reply()? {
            Reply::Rows(result) => Ok(Box::new(VecRowset::new(result, None, &mut self.pulled))),
            Reply::Broken(result, err) => {
                Ok(Box::new(VecRowset::new(result, Some(err), &mut self.pulled)))
            }
            Reply::Affected(_) => Ok(Box::new(VecRowset::new(
                ResultSet::default(),
                None,
                &mut self.pulled,
            ))),
            Reply::Fail(err) => Err(err),
        }
    }

    fn exec(&mut self, sql: &str, _deadline: Instant) -> Result<u64> {
        self.calls.push(("exec", sql.to_string()));
        match self.next_reply()? {
            Reply::Affected(n) => Ok(n),
            Reply::Fail(err) => Err(err),
            Reply::Rows(_) | Reply::Broken(..) => Ok(0),
        }
    }
}

pub struct VecRowset<'a> {
    columns: Vec<Column>,
    rows: VecDeque<Row>,
    error: Option<Error>,
    pulled: &'a mut usize,
}

impl<'a> VecRowset<'a> {
    fn new(result: ResultSet, error: Option<Error>, pulled: &'a mut usize) -> Self {
        VecRowset {
            columns: result.columns,
            rows: result.rows.into(),
            error,
            pulled,
        }
    }
}

impl Rowset for VecRowset<'_> {
    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        match self.rows.pop_front() {
            Some(row) => {
                *self.pulled += 1;
                Ok(Some(row))
            }
            None => match self.error.take() {
                Some(err) => Err(err),
                None => Ok(None),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Line source
// ---------------------------------------------------------------------------

/// Replays scripted read events and records every prompt set.
pub struct ScriptedReader {
    events: VecDeque<io::Result<ReadEvent>>,
    pub prompts: Vec<String>,
}

impl ScriptedReader {
    pub fn lines(lines: &[&str]) -> Self {
        ScriptedReader::events(
            lines
                .iter()
                .map(|l| Ok(ReadEvent::Line(l.to_string())))
                .collect(),
        )
    }

    pub fn events(events: Vec<io::Result<ReadEvent>>) -> Self {
        ScriptedReader {
            events: events.into(),
            prompts: Vec::new(),
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self) -> io::Result<ReadEvent> {
        self.events.pop_front().unwrap_or(Ok(ReadEvent::Eof))
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompts.push(prompt.to_string());
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn columns(names: &[&str]) -> Vec<Column> {
    names.iter().map(|n| Column::new(*n)).collect()
}

pub fn result(names: &[&str], rows: Vec<Row>) -> ResultSet {
    ResultSet::new(columns(names), rows)
}

pub fn utf8(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("output is UTF-8")
}
