//! Character classification and normalization.
//!
//! Every unit read into the scan buffer is regularized once (full-width forms
//! folded to ASCII, upper case folded to lower case) and then classified into
//! one of the closed set of [`CharType`]s. Dictionary entries go through the
//! same [`regularize`] so buffer text and trie keys always agree.

use serde::{Deserialize, Serialize};

/// Class of a single input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharType {
    /// Punctuation, whitespace and anything else that delimits tokens.
    #[default]
    Useless,
    /// ASCII digit `0-9` (after regularization).
    Arabic,
    /// ASCII letter `a-z` (after regularization).
    Letter,
    /// CJK ideograph.
    Chinese,
    /// CJK ideograph that also spells a number (`三`, `万`, `廿`, ...).
    ChineseNumeral,
    /// Kana, hangul and the remaining half-width/full-width forms.
    OtherCjk,
}

impl CharType {
    /// Letters and digits are merged into Latin runs.
    pub fn is_letter_or_digit(self) -> bool {
        matches!(self, CharType::Arabic | CharType::Letter)
    }

    /// Units the CJK matcher and the single-character fallback care about.
    pub fn is_cjk(self) -> bool {
        matches!(
            self,
            CharType::Chinese | CharType::ChineseNumeral | CharType::OtherCjk
        )
    }
}

const CHINESE_NUMERALS: &str = "一二两三四五六七八九十零〇壹贰叁肆伍陆柒捌玖拾百千万亿佰仟萬億兆卅廿";

/// Whether `ch` is one of the characters that form Chinese numerals.
pub fn is_chinese_numeral(ch: char) -> bool {
    CHINESE_NUMERALS.contains(ch)
}

/// Fold full-width forms and the ideographic space to ASCII, and upper case
/// ASCII letters to lower case. All other units pass through unchanged.
pub fn regularize(ch: char) -> char {
    let folded = match ch {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(ch as u32 - 0xFEE0).unwrap_or(ch),
        _ => ch,
    };
    folded.to_ascii_lowercase()
}

/// Classify an already regularized unit.
pub fn identify(ch: char) -> CharType {
    match ch {
        '0'..='9' => CharType::Arabic,
        'a'..='z' | 'A'..='Z' => CharType::Letter,
        _ if is_chinese_ideograph(ch) => {
            if is_chinese_numeral(ch) {
                CharType::ChineseNumeral
            } else {
                CharType::Chinese
            }
        }
        // the numeral zero lives in CJK Symbols and Punctuation
        '〇' => CharType::ChineseNumeral,
        _ if is_other_cjk(ch) => CharType::OtherCjk,
        _ => CharType::Useless,
    }
}

/// Regularize a whole dictionary entry: trim, then fold unit by unit.
pub fn regularize_str(s: &str) -> String {
    s.trim().chars().map(regularize).collect()
}

fn is_chinese_ideograph(ch: char) -> bool {
    matches!(ch,
        '\u{4E00}'..='\u{9FFF}'     // unified ideographs
        | '\u{3400}'..='\u{4DBF}'   // extension A
        | '\u{F900}'..='\u{FAFF}'   // compatibility ideographs
        | '\u{20000}'..='\u{2A6DF}' // extension B
    )
}

fn is_other_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{3040}'..='\u{309F}'     // hiragana
        | '\u{30A0}'..='\u{30FF}'   // katakana
        | '\u{31F0}'..='\u{31FF}'   // katakana phonetic extensions
        | '\u{1100}'..='\u{11FF}'   // hangul jamo
        | '\u{3130}'..='\u{318F}'   // hangul compatibility jamo
        | '\u{AC00}'..='\u{D7AF}'   // hangul syllables
        | '\u{FF00}'..='\u{FFEF}'   // half-width and full-width forms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regularize_folds_full_width_and_case() {
        assert_eq!(regularize('Ａ'), 'a');
        assert_eq!(regularize('Z'), 'z');
        assert_eq!(regularize('９'), '9');
        assert_eq!(regularize('，'), ',');
        assert_eq!(regularize('\u{3000}'), ' ');
        assert_eq!(regularize('中'), '中');
        assert_eq!(regularize_str("  ＡＢc "), "abc");
    }

    #[test]
    fn classify_basic_classes() {
        assert_eq!(identify('7'), CharType::Arabic);
        assert_eq!(identify('q'), CharType::Letter);
        assert_eq!(identify('中'), CharType::Chinese);
        assert_eq!(identify('三'), CharType::ChineseNumeral);
        assert_eq!(identify('〇'), CharType::ChineseNumeral);
        assert_eq!(identify('の'), CharType::OtherCjk);
        assert_eq!(identify('한'), CharType::OtherCjk);
        assert_eq!(identify('ｶ'), CharType::OtherCjk);
        assert_eq!(identify(','), CharType::Useless);
        assert_eq!(identify(' '), CharType::Useless);
    }

    #[test]
    fn classify_after_regularize() {
        assert_eq!(identify(regularize('Ｑ')), CharType::Letter);
        assert_eq!(identify(regularize('１')), CharType::Arabic);
        assert!(identify('个').is_cjk());
        assert!(identify('x').is_letter_or_digit());
        assert!(!identify('!').is_cjk());
    }
}
