//! Inclusive integer ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RuntimeError, RuntimeResult};

/// An inclusive range `start..step..end`.
///
/// The step may be negative, in which case the range counts down. A range
/// whose end lies behind its start (in step direction) is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QirRange {
    start: i64,
    step: i64,
    end: i64,
}

impl QirRange {
    /// Create a range, rejecting a zero step.
    pub fn new(start: i64, step: i64, end: i64) -> RuntimeResult<Self> {
        if step == 0 {
            return Err(RuntimeError::InvalidRange { start, end });
        }
        Ok(Self { start, step, end })
    }

    /// The range `start..1..end`.
    pub fn inclusive(start: i64, end: i64) -> Self {
        Self {
            start,
            step: 1,
            end,
        }
    }

    /// First element.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Distance between consecutive elements.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Inclusive bound.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        let span = if self.step > 0 {
            self.end.checked_sub(self.start)
        } else {
            self.start.checked_sub(self.end)
        };
        match span {
            Some(span) if span >= 0 => {
                (span.unsigned_abs() / self.step.unsigned_abs() + 1) as usize
            }
            _ => 0,
        }
    }

    /// Whether the range has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the elements in step order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len() as i64).map(move |i| self.start + i * self.step)
    }
}

impl fmt::Display for QirRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}..{}", self.start, self.step, self.end)
    }
}
