//! LexemePath: a chain of lexemes with the span it covers.
//!
//! The same type serves two roles. While the arbitrator collects a crossing
//! group it is filled with [`LexemePath::add_cross_lexeme`], which accepts any
//! lexeme overlapping the span so far. While it builds a candidate
//! segmentation it is filled with [`LexemePath::add_not_cross_lexeme`], which
//! only accepts lexemes outside the span.
use crate::lexeme::Lexeme;
use std::cmp::Ordering;

#[derive(Debug, Clone, Default)]
pub struct LexemePath {
    lexemes: Vec<Lexeme>,
    path_begin: usize,
    path_end: usize,
    /// Units covered by lexemes: the span length for crossing groups, the sum
    /// of lexeme lengths for non-crossing paths.
    payload_length: usize,
}

impl LexemePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `lexeme` overlaps `[path_begin, path_end)`.
    pub fn check_cross(&self, lexeme: &Lexeme) -> bool {
        !self.lexemes.is_empty()
            && ((lexeme.begin() >= self.path_begin && lexeme.begin() < self.path_end)
                || (self.path_begin >= lexeme.begin() && self.path_begin < lexeme.end()))
    }

    /// Grow a crossing group. Accepts the lexeme when the path is empty or the
    /// lexeme overlaps the current span.
    pub fn add_cross_lexeme(&mut self, lexeme: Lexeme) -> bool {
        if self.lexemes.is_empty() {
            self.start_with(lexeme);
            true
        } else if self.check_cross(&lexeme) {
            self.path_end = self.path_end.max(lexeme.end());
            self.payload_length = self.path_end - self.path_begin;
            self.insert(lexeme);
            true
        } else {
            false
        }
    }

    /// Grow a non-crossing path. Rejects lexemes overlapping the span.
    pub fn add_not_cross_lexeme(&mut self, lexeme: Lexeme) -> bool {
        if self.lexemes.is_empty() {
            self.start_with(lexeme);
            true
        } else if self.check_cross(&lexeme) {
            false
        } else {
            self.payload_length += lexeme.length();
            self.insert(lexeme);
            self.refresh_bounds();
            true
        }
    }

    /// Drop the last lexeme and shrink the span accordingly.
    pub fn remove_tail(&mut self) -> Option<Lexeme> {
        let tail = self.lexemes.pop()?;
        if self.lexemes.is_empty() {
            self.path_begin = 0;
            self.path_end = 0;
            self.payload_length = 0;
        } else {
            self.payload_length -= tail.length();
            self.refresh_bounds();
        }
        Some(tail)
    }

    pub fn lexemes(&self) -> &[Lexeme] {
        &self.lexemes
    }

    pub fn into_lexemes(self) -> Vec<Lexeme> {
        self.lexemes
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    pub fn path_begin(&self) -> usize {
        self.path_begin
    }

    pub fn path_end(&self) -> usize {
        self.path_end
    }

    /// Length of the covered span, gaps included.
    pub fn path_length(&self) -> usize {
        self.path_end - self.path_begin
    }

    pub fn payload_length(&self) -> usize {
        self.payload_length
    }

    fn start_with(&mut self, lexeme: Lexeme) {
        self.path_begin = lexeme.begin();
        self.path_end = lexeme.end();
        self.payload_length = lexeme.length();
        self.lexemes.push(lexeme);
    }

    fn insert(&mut self, lexeme: Lexeme) {
        if let Err(pos) = self
            .lexemes
            .binary_search_by_key(&lexeme.key(), Lexeme::key)
        {
            self.lexemes.insert(pos, lexeme);
        }
    }

    fn refresh_bounds(&mut self) {
        if let (Some(head), Some(tail)) = (self.lexemes.first(), self.lexemes.last()) {
            self.path_begin = head.begin();
            self.path_end = tail.end();
        }
    }

    fn tail_length(&self) -> usize {
        self.lexemes.last().map(Lexeme::length).unwrap_or(0)
    }

    fn square_sum(&self) -> usize {
        self.lexemes.iter().map(|l| l.length() * l.length()).sum()
    }

    fn position_weight(&self) -> usize {
        self.lexemes
            .iter()
            .enumerate()
            .map(|(i, l)| (i + 1) * l.length())
            .sum()
    }
}

/// Best path first: fewer lexemes, more payload, longer final lexeme, more
/// even lengths, later end, heavier tail positions, then plain key order.
impl Ord for LexemePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lexemes
            .len()
            .cmp(&other.lexemes.len())
            .then_with(|| other.payload_length.cmp(&self.payload_length))
            .then_with(|| other.tail_length().cmp(&self.tail_length()))
            .then_with(|| self.square_sum().cmp(&other.square_sum()))
            .then_with(|| other.path_end.cmp(&self.path_end))
            .then_with(|| other.position_weight().cmp(&self.position_weight()))
            .then_with(|| {
                self.lexemes
                    .iter()
                    .map(Lexeme::key)
                    .cmp(other.lexemes.iter().map(Lexeme::key))
            })
    }
}

impl PartialOrd for LexemePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LexemePath {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LexemePath {}
