//! Ordered, duplicate-free candidate set for one buffer pass.
use crate::lexeme::{Lexeme, LexemeType};
use std::collections::VecDeque;

/// Candidates ordered by `(begin asc, length asc)`.
///
/// No two entries share the same `(begin, length)`. The first lexeme inserted
/// for a key wins, except that a numeral or count word replaces a plain
/// dictionary word on the same span: the numeral matcher only reports a run
/// once it has ended, after the word matcher has already claimed it.
#[derive(Debug, Clone, Default)]
pub struct LexemeSet {
    items: VecDeque<Lexeme>,
}

impl LexemeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert in order. Returns `false` if the key is already present and the
    /// existing entry was kept.
    pub fn add(&mut self, lexeme: Lexeme) -> bool {
        match self.items.binary_search_by_key(&lexeme.key(), Lexeme::key) {
            Ok(pos) => {
                let slot = &mut self.items[pos];
                if slot.lexeme_type() == LexemeType::CjkWord && lexeme.lexeme_type().is_quantity() {
                    *slot = lexeme;
                    true
                } else {
                    false
                }
            }
            Err(pos) => {
                self.items.insert(pos, lexeme);
                true
            }
        }
    }

    /// Remove and return the smallest lexeme.
    pub fn pop_first(&mut self) -> Option<Lexeme> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Lexeme> + '_ {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop every lexeme starting at or after `cut`.
    pub fn truncate_from(&mut self, cut: usize) {
        let keep = self.items.partition_point(|l| l.begin() < cut);
        self.items.truncate(keep);
    }

    /// Smallest begin among lexemes that start before `cut` and end after it.
    pub fn straddling(&self, cut: usize) -> Option<usize> {
        self.items
            .iter()
            .take_while(|l| l.begin() < cut)
            .filter(|l| l.end() > cut)
            .map(Lexeme::begin)
            .min()
    }
}
