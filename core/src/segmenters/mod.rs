//! Sub-segmenters that turn the scan cursor into candidate lexemes.
//!
//! Each one is driven one unit at a time by the scan loop, keeps its own
//! in-flight state between steps, and holds a bit of the context's buffer
//! lock while that state would be lost by a refill.

mod cjk;
mod letter;
mod quantifier;

pub use cjk::CjkSegmenter;
pub use letter::LetterSegmenter;
pub use quantifier::QuantifierSegmenter;

use crate::context::AnalyzeContext;
use crate::dictionary::DictSnapshot;

/// Identity of a sub-segmenter, used as its bit in the buffer lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmenterKind {
    Letter,
    Quantifier,
    Cjk,
}

impl SegmenterKind {
    pub(crate) fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Debug, Clone)]
pub enum SubSegmenter {
    Letter(LetterSegmenter),
    Quantifier(QuantifierSegmenter),
    Cjk(CjkSegmenter),
}

impl SubSegmenter {
    /// The standard chain, in scan order. Latin runs go first so a numeral
    /// run ending at the cursor is visible to the quantifier matcher in the
    /// same step. Ties between a count word and a dictionary word found in
    /// the same step go to the count word; see [`crate::LexemeSet::add`].
    pub fn standard_chain() -> Vec<SubSegmenter> {
        vec![
            SubSegmenter::Letter(LetterSegmenter::default()),
            SubSegmenter::Quantifier(QuantifierSegmenter::default()),
            SubSegmenter::Cjk(CjkSegmenter::default()),
        ]
    }

    pub fn kind(&self) -> SegmenterKind {
        match self {
            SubSegmenter::Letter(_) => SegmenterKind::Letter,
            SubSegmenter::Quantifier(_) => SegmenterKind::Quantifier,
            SubSegmenter::Cjk(_) => SegmenterKind::Cjk,
        }
    }

    /// Examine the unit under the cursor.
    pub fn analyze(&mut self, ctx: &mut AnalyzeContext, dict: &DictSnapshot) {
        match self {
            SubSegmenter::Letter(s) => s.analyze(ctx),
            SubSegmenter::Quantifier(s) => s.analyze(ctx, dict),
            SubSegmenter::Cjk(s) => s.analyze(ctx, dict),
        }
    }

    /// Earliest buffer index still needed by in-flight state.
    pub fn anchor(&self) -> Option<usize> {
        match self {
            SubSegmenter::Letter(s) => s.anchor(),
            SubSegmenter::Quantifier(s) => s.anchor(),
            SubSegmenter::Cjk(s) => s.anchor(),
        }
    }

    /// Emit whatever is complete at the end of the buffer, then reset.
    pub fn flush(&mut self, ctx: &mut AnalyzeContext) {
        match self {
            SubSegmenter::Letter(s) => s.flush(ctx),
            SubSegmenter::Quantifier(s) => s.flush(ctx),
            SubSegmenter::Cjk(s) => s.reset(),
        }
        ctx.unlock_buffer(self.kind());
    }

    /// Drop in-flight state without emitting anything.
    pub fn reset(&mut self, ctx: &mut AnalyzeContext) {
        match self {
            SubSegmenter::Letter(s) => s.reset(),
            SubSegmenter::Quantifier(s) => s.reset(),
            SubSegmenter::Cjk(s) => s.reset(),
        }
        ctx.unlock_buffer(self.kind());
    }
}
