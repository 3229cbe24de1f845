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

//! Statement accumulation over scripted line sources.

mod common;

use std::io::{self, Cursor, Write};

use chq::input::{Accumulator, Input, ReadEvent, ScriptReader, CONTINUATION_PROMPT};
use chq::Error;

use common::ScriptedReader;

fn accumulate(reader: &mut ScriptedReader) -> Input {
    Accumulator::new().accumulate(reader).expect("accumulate")
}

#[test]
fn single_line_statement() {
    let mut reader = ScriptedReader::lines(&["SELECT 1;"]);
    assert_eq!(accumulate(&mut reader), Input::Complete("SELECT 1".into()));
    assert!(reader.prompts.is_empty());
}

#[test]
fn multi_line_statement_joins_with_newlines() {
    let mut reader = ScriptedReader::lines(&["SELECT a,", "  b", "FROM t;"]);
    assert_eq!(
        accumulate(&mut reader),
        Input::Complete("SELECT a,\n  b\nFROM t".into())
    );
    assert_eq!(reader.prompts, vec![CONTINUATION_PROMPT, CONTINUATION_PROMPT]);
}

#[test]
fn terminator_followed_by_whitespace() {
    let mut reader = ScriptedReader::lines(&["  SELECT 1 ;   "]);
    assert_eq!(accumulate(&mut reader), Input::Complete("SELECT 1".into()));
}

#[test]
fn only_one_terminator_is_stripped() {
    let mut reader = ScriptedReader::lines(&["SELECT 1;;"]);
    assert_eq!(accumulate(&mut reader), Input::Complete("SELECT 1;".into()));
}

#[test]
fn immediate_commands_need_no_terminator() {
    for cmd in ["exit", "QUIT", "\\q", "help", "\\h", "Timing", "\\timing"] {
        let mut reader = ScriptedReader::lines(&[&format!("  {cmd}  ")]);
        assert_eq!(accumulate(&mut reader), Input::Complete(cmd.into()), "{cmd}");
    }
}

#[test]
fn vertical_toggle_needs_terminator() {
    let mut reader = ScriptedReader::lines(&["vertical", ";"]);
    assert_eq!(accumulate(&mut reader), Input::Complete("vertical".into()));
}

#[test]
fn immediate_command_only_on_first_line() {
    let mut reader = ScriptedReader::lines(&["SELECT", "exit", ";"]);
    assert_eq!(accumulate(&mut reader), Input::Complete("SELECT\nexit".into()));
}

#[test]
fn blank_first_line_is_empty() {
    let mut reader = ScriptedReader::lines(&["   "]);
    assert_eq!(accumulate(&mut reader), Input::Empty);
}

#[test]
fn blank_continuation_line_is_kept() {
    let mut reader = ScriptedReader::lines(&["SELECT 1", "", "+ 1;"]);
    assert_eq!(accumulate(&mut reader), Input::Complete("SELECT 1\n\n+ 1".into()));
}

#[test]
fn eof_is_distinct_from_empty() {
    let mut reader = ScriptedReader::lines(&[]);
    assert_eq!(accumulate(&mut reader), Input::Eof);
}

#[test]
fn eof_discards_unterminated_statement() {
    let mut reader = ScriptedReader::lines(&["SELECT 1"]);
    let mut acc = Accumulator::new();
    assert_eq!(acc.accumulate(&mut reader).unwrap(), Input::Eof);
    // Nothing leaks into the next pass.
    let mut reader = ScriptedReader::lines(&["SELECT 2;"]);
    assert_eq!(
        acc.accumulate(&mut reader).unwrap(),
        Input::Complete("SELECT 2".into())
    );
}

#[test]
fn interrupt_discards_pending_lines() {
    let mut reader = ScriptedReader::events(vec![
        Ok(ReadEvent::Line("SELECT".into())),
        Ok(ReadEvent::Interrupted),
        Ok(ReadEvent::Line("SELECT 3;".into())),
    ]);
    let mut acc = Accumulator::new();
    assert_eq!(acc.accumulate(&mut reader).unwrap(), Input::Empty);
    assert_eq!(
        acc.accumulate(&mut reader).unwrap(),
        Input::Complete("SELECT 3".into())
    );
}

#[test]
fn read_error_is_reported() {
    let mut reader = ScriptedReader::events(vec![Err(io::Error::new(
        io::ErrorKind::BrokenPipe,
        "terminal gone",
    ))]);
    let err = Accumulator::new().accumulate(&mut reader).unwrap_err();
    assert!(matches!(err, Error::Input(_)), "{err:?}");
}

#[test]
fn script_reader_strips_line_endings() {
    let mut reader = ScriptReader::new(Cursor::new("SELECT 1\r\n;\nexit"));
    let mut acc = Accumulator::new();
    assert_eq!(
        acc.accumulate(&mut reader).unwrap(),
        Input::Complete("SELECT 1".into())
    );
    assert_eq!(acc.accumulate(&mut reader).unwrap(), Input::Complete("exit".into()));
    assert_eq!(acc.accumulate(&mut reader).unwrap(), Input::Eof);
}

#[test]
fn script_reader_over_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "CREATE TABLE t (x UInt8)").unwrap();
    writeln!(file, "ENGINE = Memory;").unwrap();
    file.flush().unwrap();

    let reader = io::BufReader::new(std::fs::File::open(file.path()).unwrap());
    let mut reader = ScriptReader::new(reader);
    assert_eq!(
        Accumulator::new().accumulate(&mut reader).unwrap(),
        Input::Complete("CREATE TABLE t (x UInt8)\nENGINE = Memory".into())
    );
}
