//! Evaluation hooks and counters.

use crate::error::OffsetError;

/// Which generator entry point ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// Live preview evaluation (cached).
    Preview,
    /// Contour/export evaluation (never cached).
    Contour,
}

/// How an evaluation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The cached result was copied out.
    Reused,
    /// A new result was computed.
    Recomputed,
    /// The empty placeholder was returned.
    Empty(OffsetError),
}

/// Hook called around each generator entry point.
///
/// All methods default to doing nothing.
pub trait EvalObserver {
    /// Called before an entry point does any work.
    fn before_eval(&mut self, _entry: EntryPoint) {}

    /// Called with the outcome just before an entry point returns.
    fn after_eval(&mut self, _entry: EntryPoint, _outcome: &Outcome) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EvalObserver for NoopObserver {}

/// Counters kept by every generator, independent of the observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Preview evaluations answered from the cache.
    pub reused: usize,
    /// Preview evaluations that recomputed.
    pub recomputed: usize,
    /// Contour evaluations that produced geometry.
    pub contours: usize,
    /// Evaluations of either kind that returned the empty placeholder.
    pub empty: usize,
}

impl EvalStats {
    /// Records one finished evaluation.
    pub fn record(&mut self, entry: EntryPoint, outcome: &Outcome) {
        match (entry, outcome) {
            (_, Outcome::Empty(_)) => self.empty += 1,
            (EntryPoint::Preview, Outcome::Reused) => self.reused += 1,
            (EntryPoint::Preview, Outcome::Recomputed) => self.recomputed += 1,
            (EntryPoint::Contour, _) => self.contours += 1,
        }
    }

    /// Total evaluations recorded.
    pub fn total(&self) -> usize {
        self.reused + self.recomputed + self.contours + self.empty
    }
}
