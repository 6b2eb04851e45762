//! Lexeme: one matched token span.
use serde::{Deserialize, Serialize};

/// Classified type of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexemeType {
    /// Single CJK ideograph not covered by any dictionary word.
    CjkChar,
    /// Single kana/hangul unit not covered by any dictionary word.
    OtherCjk,
    /// Dictionary word.
    CjkWord,
    /// Run of Latin letters, possibly mixed with digits.
    Letter,
    /// Run of Arabic digits.
    Arabic,
    /// Run of Chinese numeral characters.
    ChineseNumeral,
    /// Quantifier (count word) following a numeral.
    Count,
    /// Arabic digits followed by Chinese numerals, e.g. `5千`.
    CombinedNumeral,
    /// Numeral followed by a count word, e.g. `三个`.
    CombinedQuantifier,
}

impl LexemeType {
    pub fn is_numeral(self) -> bool {
        matches!(
            self,
            LexemeType::Arabic | LexemeType::ChineseNumeral | LexemeType::CombinedNumeral
        )
    }

    /// Numerals and count words.
    pub fn is_quantity(self) -> bool {
        self.is_numeral() || self == LexemeType::Count
    }
}

/// A token span inside one scan buffer.
///
/// `begin` is relative to the buffer the lexeme was found in; `buffer_offset`
/// is the stream position of that buffer's first unit, so the absolute start
/// is `buffer_offset + begin`. Within one buffer pass lexemes are identified
/// by `(begin, length)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    buffer_offset: usize,
    begin: usize,
    length: usize,
    lexeme_type: LexemeType,
    text: String,
}

impl Lexeme {
    pub fn new(buffer_offset: usize, begin: usize, length: usize, lexeme_type: LexemeType) -> Self {
        Self {
            buffer_offset,
            begin,
            length,
            lexeme_type,
            text: String::new(),
        }
    }

    /// Buffer-relative start.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Buffer-relative end (exclusive).
    pub fn end(&self) -> usize {
        self.begin + self.length
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn buffer_offset(&self) -> usize {
        self.buffer_offset
    }

    /// Absolute start position in the input stream, in units.
    pub fn begin_position(&self) -> usize {
        self.buffer_offset + self.begin
    }

    /// Absolute end position in the input stream (exclusive).
    pub fn end_position(&self) -> usize {
        self.begin_position() + self.length
    }

    pub fn lexeme_type(&self) -> LexemeType {
        self.lexeme_type
    }

    /// Realized text; empty until the lexeme leaves the output queue.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Ordering key within one buffer pass.
    pub(crate) fn key(&self) -> (usize, usize) {
        (self.begin, self.length)
    }

    /// Absorb `next` when it starts exactly where `self` ends, taking the
    /// combined type. Returns `false` (and leaves `self` untouched) otherwise.
    pub fn append(&mut self, next: &Lexeme, combined: LexemeType) -> bool {
        if next.length == 0 || self.end() != next.begin {
            return false;
        }
        self.length += next.length;
        self.lexeme_type = combined;
        true
    }
}

impl std::fmt::Display for Lexeme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{} : {} : {:?}",
            self.begin_position(),
            self.end_position(),
            self.text,
            self.lexeme_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_include_buffer_offset() {
        let l = Lexeme::new(4000, 10, 3, LexemeType::CjkWord);
        assert_eq!(l.begin_position(), 4010);
        assert_eq!(l.end_position(), 4013);
        assert_eq!(l.end(), 13);
    }

    #[test]
    fn append_requires_adjacency() {
        let mut num = Lexeme::new(0, 0, 1, LexemeType::ChineseNumeral);
        let gap = Lexeme::new(0, 2, 1, LexemeType::Count);
        assert!(!num.append(&gap, LexemeType::CombinedQuantifier));
        assert_eq!(num.lexeme_type(), LexemeType::ChineseNumeral);

        let count = Lexeme::new(0, 1, 1, LexemeType::Count);
        assert!(num.append(&count, LexemeType::CombinedQuantifier));
        assert_eq!(num.length(), 2);
        assert_eq!(num.lexeme_type(), LexemeType::CombinedQuantifier);
    }
}
