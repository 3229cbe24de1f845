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

use std::time::Duration;

use crate::config::Settings;

/// Prompt used when no database is selected.
pub const DEFAULT_PROMPT: &str = "clickhouse :) ";

/// What the server reported about itself at connect time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub version: String,
    /// Server uptime in seconds.
    pub uptime: i64,
}

/// Mutable state of one interactive session.
///
/// Only the command dispatcher changes it; the executor and the renderer
/// read the display toggles and limits.
#[derive(Debug, Clone)]
pub struct Session {
    pub database: String,
    pub timing: bool,
    pub vertical: bool,
    pub max_rows: usize,
    pub query_timeout: Duration,
    pub server: ServerInfo,
}

impl Session {
    pub fn new(database: impl Into<String>, settings: Settings) -> Self {
        Session {
            database: database.into(),
            timing: false,
            vertical: false,
            max_rows: settings.max_rows,
            query_timeout: settings.query_timeout,
            server: ServerInfo::default(),
        }
    }

    pub fn prompt(&self) -> String {
        if self.database.is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            format!("{} :) ", self.database)
        }
    }

    /// Flip timing and return the new state.
    pub fn toggle_timing(&mut self) -> bool {
        self.timing = !self.timing;
        self.timing
    }

    /// Flip vertical output and return the new state.
    pub fn toggle_vertical(&mut self) -> bool {
        self.vertical = !self.vertical;
        self.vertical
    }

    /// Switch the active database. Only the local state changes.
    pub fn use_database(&mut self, name: &str) {
        self.database = name.to_string();
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(String::new(), Settings::default())
    }
}
