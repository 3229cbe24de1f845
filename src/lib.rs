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

//! chq: interactive SQL client for ClickHouse.
//!
//! The crate splits the client into a line accumulator, a special-command
//! dispatcher, a query executor and a result renderer. The database driver
//! and the line editor sit behind the [`Driver`] and [`LineReader`] traits.

pub mod client;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod input;
pub mod render;
pub mod session;
pub mod value;

pub use client::Client;
pub use command::{dispatch, Command, Dispatch};
pub use config::{Compression, ConnectConfig, Settings};
pub use driver::{Column, Driver, Row, Rowset};
pub use error::{Error, Result};
pub use input::{Accumulator, Input, LineReader, ReadEvent, ScriptReader};
pub use session::{ServerInfo, Session};
pub use value::Value;
