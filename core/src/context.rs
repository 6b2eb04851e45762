//! Scan session state for one input stream.
//!
//! `AnalyzeContext` owns the unit buffer and everything derived from it during
//! a pass: the classified char types, the cursor, the buffer lock, the
//! candidate set, the arbitrated paths and the output queue. The driver in
//! [`crate::segmenter`] moves it through
//! `Empty -> Scanning -> ... -> Exhausted`; `reset` returns it to `Empty`.
//!
//! Positions handed out by the context are buffer-relative. `buffer_offset`
//! is the stream position of buffer index 0 and only grows by the number of
//! units a pass finalized.

use crate::char_util::{self, CharType};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::input_buffer::InputBuffer;
use crate::lexeme::{Lexeme, LexemeType};
use crate::lexeme_set::LexemeSet;
use crate::path::LexemePath;
use crate::segmenters::SegmenterKind;
use ahash::AHashMap;
use std::collections::VecDeque;
use std::io::Read;
use tracing::debug;

/// Capacity of the scan buffer, in units.
pub const BUFF_SIZE: usize = 4096;

/// Distance from the end of a full buffer inside which an unlocked pass stops
/// early so the next fill can shift the tail to the front.
pub const BUFF_EXHAUST_CRITICAL: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing read yet (or reset).
    Empty,
    /// A buffer is loaded and being scanned or drained.
    Scanning,
    /// The last fill returned no units.
    Exhausted,
}

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Everything up to the cursor is final; pending runs must be flushed.
    Whole,
    /// Only `[0, cut)` is final; the rest is scanned again after the refill.
    Cut(usize),
}

#[derive(Debug)]
pub struct AnalyzeContext {
    buffer: Vec<char>,
    char_types: Vec<CharType>,
    cursor: usize,
    available: usize,
    buffer_offset: usize,
    /// Units finalized by the current pass.
    consumed: usize,
    locks: u8,
    candidates: LexemeSet,
    path_map: AHashMap<usize, LexemePath>,
    results: VecDeque<Lexeme>,
    use_smart: bool,
    state: ScanState,
    /// End of the most recent numeral lexeme found in this pass; 0 when one
    /// ended exactly at the previous cut.
    numeral_end: Option<usize>,
}

impl AnalyzeContext {
    pub fn new(use_smart: bool) -> Self {
        Self {
            buffer: vec!['\0'; BUFF_SIZE],
            char_types: vec![CharType::Useless; BUFF_SIZE],
            cursor: 0,
            available: 0,
            buffer_offset: 0,
            consumed: 0,
            locks: 0,
            candidates: LexemeSet::new(),
            path_map: AHashMap::new(),
            results: VecDeque::new(),
            use_smart,
            state: ScanState::Empty,
            numeral_end: None,
        }
    }

    /// Load the next batch of units.
    ///
    /// The first fill reads up to capacity. Later fills move the units the
    /// previous pass did not finalize to the front and read behind them.
    /// Returns the number of valid units; 0 means the stream is done.
    pub fn fill_buffer<R: Read>(&mut self, input: &mut InputBuffer<R>) -> Result<usize> {
        let kept = match self.state {
            ScanState::Scanning if self.consumed < self.available => {
                self.buffer.copy_within(self.consumed..self.available, 0);
                self.char_types
                    .copy_within(self.consumed..self.available, 0);
                self.available - self.consumed
            }
            _ => 0,
        };
        // a numeral ending exactly at the cut still opens a count-word scan
        // on the first carried unit
        let numeral_end = self
            .numeral_end
            .filter(|&end| kept > 0 && end == self.consumed)
            .map(|_| 0);
        let read = input.read_chars(&mut self.buffer[kept..])?;

        self.available = kept + read;
        self.cursor = 0;
        self.consumed = 0;
        self.numeral_end = numeral_end;
        self.state = if self.available == 0 {
            ScanState::Exhausted
        } else {
            ScanState::Scanning
        };
        Ok(self.available)
    }

    /// Put the cursor on the first unit and classify it.
    pub fn init_cursor(&mut self) {
        self.cursor = 0;
        if self.available > 0 {
            self.classify(0);
        }
    }

    /// Advance one unit. Returns `false` on the last valid unit.
    pub fn move_cursor(&mut self) -> bool {
        if self.cursor + 1 < self.available {
            self.cursor += 1;
            self.classify(self.cursor);
            true
        } else {
            false
        }
    }

    fn classify(&mut self, index: usize) {
        let ch = char_util::regularize(self.buffer[index]);
        self.buffer[index] = ch;
        self.char_types[index] = char_util::identify(ch);
    }

    /// Whether the pass should stop here so the buffer can be refilled: the
    /// buffer is full, the cursor is inside the critical zone but not on the
    /// last unit, and no sub-segmenter holds the lock.
    pub fn need_refill_buffer(&self) -> bool {
        self.available == BUFF_SIZE
            && self.cursor + 1 < self.available
            && self.cursor + BUFF_EXHAUST_CRITICAL > self.available
            && !self.is_buffer_locked()
    }

    pub fn lock_buffer(&mut self, kind: SegmenterKind) {
        self.locks |= kind.bit();
    }

    pub fn unlock_buffer(&mut self, kind: SegmenterKind) {
        self.locks &= !kind.bit();
    }

    pub fn is_buffer_locked(&self) -> bool {
        self.locks != 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn available(&self) -> usize {
        self.available
    }

    pub fn buffer_offset(&self) -> usize {
        self.buffer_offset
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn use_smart(&self) -> bool {
        self.use_smart
    }

    /// Valid units of the current buffer.
    pub fn buffer(&self) -> &[char] {
        &self.buffer[..self.available]
    }

    pub fn current_char_type(&self) -> CharType {
        self.char_types[self.cursor]
    }

    pub fn char_type(&self, index: usize) -> CharType {
        self.char_types[index]
    }

    pub fn numeral_end(&self) -> Option<usize> {
        self.numeral_end
    }

    /// Record a candidate. Returns `false` if its span is already taken.
    pub fn add_lexeme(&mut self, lexeme: Lexeme) -> bool {
        if lexeme.lexeme_type().is_numeral() {
            self.numeral_end = Some(lexeme.end());
        }
        self.candidates.add(lexeme)
    }

    pub fn candidates(&self) -> &LexemeSet {
        &self.candidates
    }

    pub(crate) fn pop_candidate(&mut self) -> Option<Lexeme> {
        self.candidates.pop_first()
    }

    /// Store an arbitrated path, keyed by where it starts.
    pub fn add_lexeme_path(&mut self, path: LexemePath) {
        if !path.is_empty() {
            self.path_map.insert(path.path_begin(), path);
        }
    }

    /// Decide how much of the buffer this pass finalizes.
    ///
    /// `anchor` is the earliest buffer index still needed by a sub-segmenter.
    /// With `more_input`, the pass is cut at the anchor, moved left past any
    /// candidate that would straddle the cut, and candidates from the cut on
    /// are dropped. A cut at 0 would make no progress, so the whole buffer is
    /// taken instead.
    pub fn settle(&mut self, anchor: Option<usize>, more_input: bool) -> Settlement {
        let end = self.cursor + 1;
        let mut cut = match anchor {
            Some(anchor) if more_input => anchor.min(end),
            _ => end,
        };
        if more_input {
            while let Some(begin) = self.candidates.straddling(cut) {
                cut = begin;
            }
        }

        if cut == 0 || cut == end {
            self.consumed = end;
            Settlement::Whole
        } else {
            self.candidates.truncate_from(cut);
            self.consumed = cut;
            debug!(
                buffer_offset = self.buffer_offset,
                cut,
                carried = self.available - cut,
                "pass cut before in-flight matches"
            );
            Settlement::Cut(cut)
        }
    }

    /// Move arbitrated paths into the output queue in position order, filling
    /// CJK units no path covers with single-unit lexemes. Delimiters are not
    /// emitted.
    pub fn output_to_result(&mut self) {
        let mut index = 0;
        while index < self.consumed {
            if self.char_types[index] == CharType::Useless {
                index += 1;
                continue;
            }
            match self.path_map.remove(&index) {
                Some(path) => {
                    let mut covered = index;
                    for lexeme in path.into_lexemes() {
                        while covered < lexeme.begin() {
                            self.output_single(covered);
                            covered += 1;
                        }
                        covered = covered.max(lexeme.end());
                        self.results.push_back(lexeme);
                    }
                    index = covered;
                }
                None => {
                    self.output_single(index);
                    index += 1;
                }
            }
        }
        self.path_map.clear();
    }

    fn output_single(&mut self, index: usize) {
        let lexeme_type = match self.char_types[index] {
            CharType::Chinese | CharType::ChineseNumeral => LexemeType::CjkChar,
            CharType::OtherCjk => LexemeType::OtherCjk,
            _ => return,
        };
        self.results
            .push_back(Lexeme::new(self.buffer_offset, index, 1, lexeme_type));
    }

    /// Pop the next output lexeme, compounding numerals in smart mode and
    /// skipping stop words. The returned lexeme carries its text.
    pub fn next_lexeme(&mut self, dict: &Dictionary) -> Option<Lexeme> {
        while let Some(mut lexeme) = self.results.pop_front() {
            self.compound(&mut lexeme);
            if dict.is_stop_word(&self.buffer, lexeme.begin(), lexeme.length()) {
                continue;
            }
            let text = self.buffer[lexeme.begin()..lexeme.end()].iter().collect();
            lexeme.set_text(text);
            return Some(lexeme);
        }
        None
    }

    fn compound(&mut self, lexeme: &mut Lexeme) {
        if !self.use_smart {
            return;
        }
        if lexeme.lexeme_type() == LexemeType::Arabic {
            let merged = match self.results.front() {
                Some(next) if next.lexeme_type() == LexemeType::ChineseNumeral => {
                    lexeme.append(next, LexemeType::CombinedNumeral)
                }
                Some(next) if next.lexeme_type() == LexemeType::Count => {
                    lexeme.append(next, LexemeType::CombinedQuantifier)
                }
                _ => false,
            };
            if merged {
                self.results.pop_front();
            }
        }
        if matches!(
            lexeme.lexeme_type(),
            LexemeType::ChineseNumeral | LexemeType::CombinedNumeral
        ) {
            let merged = match self.results.front() {
                Some(next) if next.lexeme_type() == LexemeType::Count => {
                    lexeme.append(next, LexemeType::CombinedQuantifier)
                }
                _ => false,
            };
            if merged {
                self.results.pop_front();
            }
        }
    }

    /// Account for the units finalized by this pass.
    pub fn mark_buffer_offset(&mut self) {
        self.buffer_offset += self.consumed;
    }

    /// Back to `Empty`, dropping all buffered and derived state.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.available = 0;
        self.buffer_offset = 0;
        self.consumed = 0;
        self.locks = 0;
        self.candidates.clear();
        self.path_map.clear();
        self.results.clear();
        self.state = ScanState::Empty;
        self.numeral_end = None;
    }
}
