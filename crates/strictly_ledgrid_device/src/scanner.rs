//! Debounced button-matrix scan.

use std::time::Duration;
use strictly_ledgrid::{Position, location_of};
use tracing::{debug, instrument, trace};

use crate::config::TimingConfig;
use crate::hardware::ButtonMatrix;
use crate::shared::SharedBoard;

/// Scans a [`ButtonMatrix`] for a press on an unplayed cell.
#[derive(Debug)]
pub struct Scanner<M> {
    matrix: M,
    debounce: Duration,
}

impl<M: ButtonMatrix> Scanner<M> {
    /// Creates a scanner with the configured debounce hold.
    pub fn new(matrix: M, config: &TimingConfig) -> Self {
        Self {
            matrix,
            debounce: config.debounce(),
        }
    }

    /// Returns the first debounced press on an empty cell, if any.
    ///
    /// Columns are driven 0, 1, 2 and under each the rows are sensed 0, 1,
    /// 2. A closed contact on a played cell is ignored. A candidate is held
    /// for the debounce interval and accepted only if it still reads
    /// closed; a bounce is dropped and the scan continues. The hold is an
    /// async sleep, so the display refresh keeps running through it.
    #[instrument(skip_all)]
    pub async fn poll_pressed_cell(&mut self, board: &SharedBoard) -> Option<Position> {
        for col in 0..3 {
            self.matrix.drive(col);
            for row in 0..3 {
                let Some(pos) = location_of(row, col) else {
                    continue;
                };
                if !self.matrix.is_active(row) || !board.is_empty(pos) {
                    continue;
                }
                trace!(position = %pos, "Candidate press, debouncing");
                tokio::time::sleep(self.debounce).await;
                if self.matrix.is_active(row) {
                    self.matrix.release();
                    debug!(position = %pos, "Press accepted");
                    return Some(pos);
                }
                trace!(position = %pos, "Bounce rejected");
            }
        }
        self.matrix.release();
        None
    }

    /// Returns the matrix.
    pub fn matrix(&self) -> &M {
        &self.matrix
    }
}
