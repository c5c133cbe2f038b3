//! Recording and scripted stand-ins for the hardware traits.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use strictly_ledgrid::{Position, location_of};
use strictly_ledgrid_device::{ButtonMatrix, IndicatorLine, IndicatorSurface, Lamp, SharedGame};

/// One call on an [`IndicatorSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Select(IndicatorLine),
    Pulse(Lamp),
    Deselect,
    Blank,
}

/// Records every surface call into a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().expect("Surface log poisoned").clone()
    }

    pub fn clear(&self) {
        self.events.lock().expect("Surface log poisoned").clear();
    }

    pub fn cycles(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == SurfaceEvent::Blank)
            .count()
    }

    /// Lamps pulsed on the status line, one list per refresh cycle.
    pub fn status_pulses(&self) -> Vec<Vec<Lamp>> {
        let mut cycles = Vec::new();
        let mut current = None;
        for event in self.events() {
            match event {
                SurfaceEvent::Select(IndicatorLine::Status) => current = Some(Vec::new()),
                SurfaceEvent::Pulse(lamp) => {
                    if let Some(lamps) = current.as_mut() {
                        lamps.push(lamp);
                    }
                }
                SurfaceEvent::Deselect => {
                    if let Some(lamps) = current.take() {
                        cycles.push(lamps);
                    }
                }
                _ => {}
            }
        }
        cycles
    }

    fn push(&self, event: SurfaceEvent) {
        self.events.lock().expect("Surface log poisoned").push(event);
    }
}

impl IndicatorSurface for RecordingSurface {
    fn select(&mut self, line: IndicatorLine) {
        self.push(SurfaceEvent::Select(line));
    }

    fn pulse(&mut self, lamp: Lamp, _width: Duration) {
        self.push(SurfaceEvent::Pulse(lamp));
    }

    fn deselect(&mut self) {
        self.push(SurfaceEvent::Deselect);
    }

    fn blank(&mut self) {
        self.push(SurfaceEvent::Blank);
    }
}

/// A matrix whose contacts close for a fixed number of reads.
#[derive(Debug, Default)]
pub struct BouncyMatrix {
    reads: Mutex<HashMap<Position, usize>>,
    driven: Option<usize>,
    pub drives: Vec<usize>,
    pub released: bool,
}

impl BouncyMatrix {
    /// Holds `pos` closed for every read.
    pub fn hold(self, pos: Position) -> Self {
        self.bounce(pos, usize::MAX)
    }

    /// Closes `pos` for the next `reads` reads only.
    pub fn bounce(self, pos: Position, reads: usize) -> Self {
        self.reads
            .lock()
            .expect("Matrix poisoned")
            .insert(pos, reads);
        self
    }
}

impl ButtonMatrix for BouncyMatrix {
    fn drive(&mut self, column: usize) {
        self.driven = Some(column);
        self.drives.push(column);
        self.released = false;
    }

    fn is_active(&self, row: usize) -> bool {
        let Some(pos) = self.driven.and_then(|col| location_of(row, col)) else {
            return false;
        };
        let mut reads = self.reads.lock().expect("Matrix poisoned");
        match reads.get_mut(&pos) {
            Some(left) if *left > 0 => {
                *left = left.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn release(&mut self) {
        self.driven = None;
        self.released = true;
    }
}

/// A player pressing scripted cells in order, skipping any already taken.
///
/// The first unplayed cell in the script is held down until it is played.
#[derive(Debug)]
pub struct ScriptedPlayer {
    game: Arc<SharedGame>,
    script: VecDeque<Position>,
    driven: Option<usize>,
}

impl ScriptedPlayer {
    pub fn new(game: Arc<SharedGame>, script: impl IntoIterator<Item = Position>) -> Self {
        Self {
            game,
            script: script.into_iter().collect(),
            driven: None,
        }
    }

    fn held(&self) -> Option<Position> {
        self.script
            .iter()
            .copied()
            .find(|pos| self.game.board().is_empty(*pos))
    }
}

impl ButtonMatrix for ScriptedPlayer {
    fn drive(&mut self, column: usize) {
        self.driven = Some(column);
    }

    fn is_active(&self, row: usize) -> bool {
        let pressed = self.driven.and_then(|col| location_of(row, col));
        pressed.is_some() && pressed == self.held()
    }

    fn release(&mut self) {
        self.driven = None;
    }
}
