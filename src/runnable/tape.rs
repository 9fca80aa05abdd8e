use std::num::NonZeroUsize;

use super::PointerOverflow;
use crate::error::{Direction, RuntimeError};

/// Fixed-length, zero-initialized memory of wrapping byte cells.
pub struct Tape {
    cells: Vec<u8>,
    /// Data pointer
    dp: usize,
    overflow: PointerOverflow,
}

impl Tape {
    pub fn new(length: NonZeroUsize, overflow: PointerOverflow) -> Result<Self, RuntimeError> {
        let length = length.get();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(length)
            .map_err(|_| RuntimeError::ResourceExhausted { length })?;
        cells.resize(length, 0);

        Ok(Tape {
            cells,
            dp: 0,
            overflow,
        })
    }

    pub fn pointer(&self) -> usize {
        self.dp
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub fn get(&self) -> u8 {
        self.cells[self.dp]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.dp] = value;
    }

    pub fn add(&mut self, n: usize) {
        // Only the low byte matters modulo 256.
        #[allow(clippy::cast_possible_truncation)]
        let n = n as u8;
        self.cells[self.dp] = self.cells[self.dp].wrapping_add(n);
    }

    pub fn sub(&mut self, n: usize) {
        #[allow(clippy::cast_possible_truncation)]
        let n = n as u8;
        self.cells[self.dp] = self.cells[self.dp].wrapping_sub(n);
    }

    /// Move the data pointer. `index` is the opcode responsible, for errors.
    pub fn shift(
        &mut self,
        direction: Direction,
        n: usize,
        index: usize,
    ) -> Result<(), RuntimeError> {
        let length = self.cells.len();

        let target = match (direction, self.overflow) {
            (Direction::Right, PointerOverflow::Abort) => {
                self.dp.checked_add(n).filter(|&dp| dp < length)
            }
            (Direction::Left, PointerOverflow::Abort) => self.dp.checked_sub(n),
            (Direction::Right, PointerOverflow::Wrap) => Some((self.dp + n % length) % length),
            (Direction::Left, PointerOverflow::Wrap) => {
                Some((self.dp + length - n % length) % length)
            }
        };

        self.dp = target.ok_or_else(|| RuntimeError::TapeOverrun {
            index,
            pointer: self.dp,
            offset: n,
            direction,
            length,
        })?;

        Ok(())
    }
}
