//! Timing anchors and intervals for durative actions and timed goals.

use std::fmt;

/// The reference point a [`Timing`] is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timepoint {
    /// Absolute problem time zero.
    GlobalStart,
    /// The start of the enclosing durative action.
    Start,
    /// The end of the enclosing durative action.
    End,
}

/// A timepoint plus an integer delay, in problem time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timing {
    pub timepoint: Timepoint,
    pub delay: i64,
}

impl Timing {
    /// The start of the enclosing durative action.
    pub fn start() -> Self {
        Timing {
            timepoint: Timepoint::Start,
            delay: 0,
        }
    }

    /// The end of the enclosing durative action.
    pub fn end() -> Self {
        Timing {
            timepoint: Timepoint::End,
            delay: 0,
        }
    }

    /// `delay` units after the action start.
    pub fn start_delayed(delay: i64) -> Self {
        Timing {
            timepoint: Timepoint::Start,
            delay,
        }
    }

    /// Absolute problem time `t`.
    pub fn global(t: i64) -> Self {
        Timing {
            timepoint: Timepoint::GlobalStart,
            delay: t,
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.timepoint {
            Timepoint::GlobalStart => "global",
            Timepoint::Start => "start",
            Timepoint::End => "end",
        };
        if self.delay == 0 {
            write!(f, "{}", base)
        } else {
            write!(f, "{} + {}", base, self.delay)
        }
    }
}

/// An interval between two timings, with open or closed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub lower: Timing,
    pub upper: Timing,
    pub left_open: bool,
    pub right_open: bool,
}

impl TimeInterval {
    /// The degenerate point interval `[t, t]`.
    pub fn at(t: Timing) -> Self {
        TimeInterval {
            lower: t,
            upper: t,
            left_open: false,
            right_open: false,
        }
    }

    /// The closed interval `[lower, upper]`.
    pub fn closed(lower: Timing, upper: Timing) -> Self {
        TimeInterval {
            lower,
            upper,
            left_open: false,
            right_open: false,
        }
    }

    /// The open interval `(lower, upper)`.
    pub fn open(lower: Timing, upper: Timing) -> Self {
        TimeInterval {
            lower,
            upper,
            left_open: true,
            right_open: true,
        }
    }

    pub fn is_point(&self) -> bool {
        self.lower == self.upper && !self.left_open && !self.right_open
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_point() {
            return write!(f, "[{}]", self.lower);
        }
        let l = if self.left_open { '(' } else { '[' };
        let r = if self.right_open { ')' } else { ']' };
        write!(f, "{}{}, {}{}", l, self.lower, self.upper, r)
    }
}
