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

//! Reedline-backed line source for the interactive loop.

use std::io;
use std::path::PathBuf;

use nu_ansi_term::{Color, Style};
use reedline::{default_emacs_keybindings, DefaultHinter, Emacs, FileBackedHistory, Reedline, Signal};

use chq::{LineReader, ReadEvent};

use crate::highlighter::SqlHighlighter;
use crate::prompt::SqlPrompt;

const HISTORY_FILE: &str = ".chq_history";
const HISTORY_SIZE: usize = 1000;

pub struct EditorReader {
    editor: Reedline,
    prompt: SqlPrompt,
}

impl EditorReader {
    pub fn new() -> Self {
        let hinter = DefaultHinter::default().with_style(Style::new().fg(Color::DarkGray));
        let keybindings = default_emacs_keybindings();

        let history_path = dirs_or_home().join(HISTORY_FILE);
        let history = match FileBackedHistory::with_file(HISTORY_SIZE, history_path.clone()) {
            Ok(history) => Some(history),
            Err(e) => {
                tracing::warn!(path = %history_path.display(), error = %e, "history disabled");
                None
            }
        };

        let editor = Reedline::create()
            .with_highlighter(Box::new(SqlHighlighter))
            .with_hinter(Box::new(hinter))
            .with_edit_mode(Box::new(Emacs::new(keybindings)));
        let editor = if let Some(history) = history {
            editor.with_history(Box::new(history))
        } else {
            editor
        };

        EditorReader {
            editor,
            prompt: SqlPrompt::new(),
        }
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self) -> io::Result<ReadEvent> {
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(ReadEvent::Line(line)),
            Signal::CtrlC => Ok(ReadEvent::Interrupted),
            Signal::CtrlD => Ok(ReadEvent::Eof),
        }
    }

    fn set_prompt(&mut self, prompt: &str) {
        self.prompt.set(prompt);
    }
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
