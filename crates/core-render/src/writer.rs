//! Terminal writer: batches primitive terminal operations for one frame and
//! flushes them in order with a single `flush`.
//!
//! * Commands preserve ordering; nothing is flushed mid-frame.
//! * Positions are absolute with a (0,0) origin; the caller ensures bounds.
//! * The writer is short-lived, one per frame.

use crate::style::StyleAttr;
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{Write, stdout};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    Print(String, StyleAttr),
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }
    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }
    /// Clears the row the cursor is on; pair with a preceding `move_to(0, y)`.
    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }
    pub fn print<S: Into<String>>(&mut self, s: S, attr: StyleAttr) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s, attr));
        }
    }
    pub fn commands(&self) -> &[Command] {
        &self.cmds
    }

    pub fn flush(self) -> Result<()> {
        self.flush_into(&mut stdout())
    }

    pub fn flush_into<W: Write>(self, out: &mut W) -> Result<()> {
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::ClearLine => {
                    queue!(out, Clear(ClearType::CurrentLine))?;
                }
                Command::Print(s, StyleAttr::Plain) => {
                    queue!(out, Print(s))?;
                }
                Command::Print(s, StyleAttr::Cursor) => {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reverse),
                        Print(s),
                        SetAttribute(Attribute::Reset)
                    )?;
                }
                Command::Print(s, StyleAttr::Highlight) => {
                    queue!(
                        out,
                        SetBackgroundColor(Color::DarkGrey),
                        Print(s),
                        ResetColor
                    )?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}
