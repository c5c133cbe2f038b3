//! Terminal stand-ins for the lamp grid and the button matrix.
//!
//! [`TerminalIndicators`] collects the lamps lit during one refresh cycle
//! and draws the frame when the cycle ends, the way the eye integrates the
//! multiplexed pulses. It redraws only when the lit set changes.
//! [`VirtualMatrix`] reads contacts closed from the keyboard: typing a digit
//! `1`-`9` holds the matching cell's button for a short time.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use strictly_ledgrid::{Position, location_of};
use tracing::{debug, instrument, warn};

use crate::hardware::{ButtonMatrix, IndicatorLine, IndicatorSurface, Lamp};

/// Lamps lit during one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LampFrame {
    cells: [Option<Lamp>; 9],
    status: [bool; 2],
}

impl LampFrame {
    /// The lamp lit behind a cell, if any.
    pub fn cell(&self, pos: Position) -> Option<Lamp> {
        self.cells[pos.index()]
    }

    /// Whether a status lamp is lit.
    pub fn status(&self, lamp: Lamp) -> bool {
        self.status[lamp_slot(lamp)]
    }

    fn light(&mut self, line: IndicatorLine, lamp: Lamp) {
        match line {
            IndicatorLine::Cell(pos) => self.cells[pos.index()] = Some(lamp),
            IndicatorLine::Status => self.status[lamp_slot(lamp)] = true,
        }
    }
}

fn lamp_slot(lamp: Lamp) -> usize {
    match lamp {
        Lamp::Player1 => 0,
        Lamp::Player2 => 1,
    }
}

/// An [`IndicatorSurface`] that draws the lamp grid in a terminal.
///
/// Pulses are recorded, not timed: the terminal keeps a frame lit until the
/// next redraw, so there is nothing to hold.
#[derive(Debug)]
pub struct TerminalIndicators<W> {
    out: W,
    selected: Option<IndicatorLine>,
    frame: LampFrame,
    shown: Option<LampFrame>,
    redraws: usize,
}

impl<W: Write + Send> TerminalIndicators<W> {
    /// Creates a surface drawing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            selected: None,
            frame: LampFrame::default(),
            shown: None,
            redraws: 0,
        }
    }

    /// The last frame drawn.
    pub fn shown(&self) -> Option<&LampFrame> {
        self.shown.as_ref()
    }

    /// How many times the frame has been drawn.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: &LampFrame) -> std::io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        for row in 0..3 {
            for col in 0..3 {
                let lamp = location_of(row, col).and_then(|pos| frame.cell(pos));
                queue!(self.out, PrintStyledContent(glyph(lamp)), Print(" "))?;
            }
            queue!(self.out, Print("\r\n"))?;
        }
        queue!(self.out, Print("\r\n"))?;
        for lamp in [Lamp::Player1, Lamp::Player2] {
            let lit = frame.status(lamp).then_some(lamp);
            queue!(self.out, PrintStyledContent(glyph(lit)), Print(" "))?;
        }
        queue!(self.out, Print("\r\n"))?;
        self.out.flush()
    }
}

fn glyph(lamp: Option<Lamp>) -> crossterm::style::StyledContent<&'static str> {
    match lamp {
        Some(Lamp::Player1) => "●".green(),
        Some(Lamp::Player2) => "●".red(),
        None => "·".dark_grey(),
    }
}

impl<W: Write + Send> IndicatorSurface for TerminalIndicators<W> {
    fn select(&mut self, line: IndicatorLine) {
        self.selected = Some(line);
    }

    fn pulse(&mut self, lamp: Lamp, _width: Duration) {
        if let Some(line) = self.selected {
            self.frame.light(line, lamp);
        }
    }

    fn deselect(&mut self) {
        self.selected = None;
    }

    fn blank(&mut self) {
        self.selected = None;
        let frame = std::mem::take(&mut self.frame);
        if self.shown == Some(frame) {
            return;
        }
        match self.draw(&frame) {
            Ok(()) => {
                self.redraws += 1;
                self.shown = Some(frame);
            }
            Err(e) => warn!(error = %e, "Failed to draw lamp frame"),
        }
    }
}

/// The nine button contacts, shared with whatever closes them.
#[derive(Debug, Clone)]
pub struct Contacts {
    closed: Arc<[AtomicBool; 9]>,
}

impl Contacts {
    /// Creates a set of open contacts.
    pub fn new() -> Self {
        Self {
            closed: Arc::new(std::array::from_fn(|_| AtomicBool::new(false))),
        }
    }

    /// Closes the contact under `pos`.
    pub fn press(&self, pos: Position) {
        self.closed[pos.index()].store(true, Ordering::Release);
    }

    /// Opens the contact under `pos`.
    pub fn release(&self, pos: Position) {
        self.closed[pos.index()].store(false, Ordering::Release);
    }

    /// Whether the contact under `pos` is closed.
    pub fn is_closed(&self, pos: Position) -> bool {
        self.closed[pos.index()].load(Ordering::Acquire)
    }
}

impl Default for Contacts {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`ButtonMatrix`] over shared [`Contacts`].
#[derive(Debug, Clone)]
pub struct VirtualMatrix {
    contacts: Contacts,
    driven: Option<usize>,
}

impl VirtualMatrix {
    /// Creates a matrix reading `contacts`.
    pub fn new(contacts: Contacts) -> Self {
        Self {
            contacts,
            driven: None,
        }
    }
}

impl ButtonMatrix for VirtualMatrix {
    fn drive(&mut self, column: usize) {
        self.driven = Some(column);
    }

    fn is_active(&self, row: usize) -> bool {
        self.driven
            .and_then(|col| location_of(row, col))
            .is_some_and(|pos| self.contacts.is_closed(pos))
    }

    fn release(&mut self) {
        self.driven = None;
    }
}

/// Maps a typed key to a cell: `1` is the top left, `9` the bottom right.
pub fn key_position(key: char) -> Option<Position> {
    let digit = key.to_digit(10)?;
    let index = usize::try_from(digit).ok()?.checked_sub(1)?;
    Position::from_index(index)
}

/// Presses buttons from digits typed on stdin.
///
/// Each digit closes its contact for `hold`, long enough to pass the
/// debounce. Other characters are ignored. The thread ends with stdin.
#[instrument(skip(contacts))]
pub fn spawn_keyboard(contacts: Contacts, hold: Duration) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Stopped reading keyboard");
                    break;
                }
            };
            for pos in line.chars().filter_map(key_position) {
                debug!(position = %pos, "Key pressed");
                contacts.press(pos);
                std::thread::sleep(hold);
                contacts.release(pos);
            }
        }
        debug!("Keyboard closed");
    })
}
