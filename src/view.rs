//! Plain terminal view for the local demo.
//!
//! Every frame is a full redraw: clear, the visible rows of the board with one
//! coloured glyph per cell, then the score line. Row 0 is rotation headroom and
//! is not drawn.

use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::core::Board;
use crate::types::{Cell, PieceKind, TOP_PLAYABLE_ROW};

/// Foreground colour for a piece kind
pub fn piece_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::I => Color::Cyan,
        PieceKind::O => Color::Yellow,
        PieceKind::S => Color::Green,
        PieceKind::Z => Color::Red,
        PieceKind::L => Color::AnsiValue(208),
        PieceKind::J => Color::Blue,
        PieceKind::T => Color::Magenta,
    }
}

fn queue_cell(out: &mut Vec<u8>, cell: Cell) -> Result<()> {
    match cell {
        Some(kind) => {
            out.queue(SetForegroundColor(piece_color(kind)))?;
            out.queue(Print(" ■ "))?;
        }
        None => {
            out.queue(SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(" - "))?;
        }
    }
    Ok(())
}

/// Encode one frame into `out` without touching the terminal.
pub fn encode_frame(board: &Board, score: u32, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    for row in TOP_PLAYABLE_ROW..board.height() {
        for col in 0..board.width() {
            queue_cell(out, board.get(row as i8, col as i8).flatten())?;
        }
        out.queue(ResetColor)?;
        out.queue(Print("\r\n"))?;
    }

    out.queue(Print("\r\n "))?;
    out.queue(SetAttribute(Attribute::Bold))?;
    out.queue(Print("Score"))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(Print(format!(": {}\r\n", score)))?;
    Ok(())
}

/// Writes frames to a terminal, reusing one buffer
pub struct FrameWriter<W: Write> {
    out: W,
    buf: Vec<u8>,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode and the alternate screen, for live play
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn draw(&mut self, board: &Board, score: u32) -> Result<()> {
        self.buf.clear();
        encode_frame(board, score, &mut self.buf)?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}
