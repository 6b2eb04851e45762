use crate::char_util::CharType;
use crate::context::AnalyzeContext;
use crate::dictionary::DictSnapshot;
use crate::lexeme::{Lexeme, LexemeType};
use crate::segmenters::SegmenterKind;
use crate::trie::Hit;

/// Chinese numeral runs and the count words that follow a numeral.
///
/// Numerals and count words are emitted as separate lexemes; merging them is
/// left to the output stage.
#[derive(Debug, Clone, Default)]
pub struct QuantifierSegmenter {
    numeral_start: Option<usize>,
    count_hits: Vec<Hit>,
}

impl QuantifierSegmenter {
    pub(crate) fn analyze(&mut self, ctx: &mut AnalyzeContext, dict: &DictSnapshot) {
        self.process_numeral(ctx);
        self.process_count(ctx, dict);

        if self.numeral_start.is_none() && self.count_hits.is_empty() {
            ctx.unlock_buffer(SegmenterKind::Quantifier);
        } else {
            ctx.lock_buffer(SegmenterKind::Quantifier);
        }
    }

    fn process_numeral(&mut self, ctx: &mut AnalyzeContext) {
        let cursor = ctx.cursor();
        if ctx.current_char_type() == CharType::ChineseNumeral {
            self.numeral_start.get_or_insert(cursor);
        } else if let Some(start) = self.numeral_start.take() {
            ctx.add_lexeme(Lexeme::new(
                ctx.buffer_offset(),
                start,
                cursor - start,
                LexemeType::ChineseNumeral,
            ));
        }
    }

    /// Count words are only looked up while a numeral is open, a count word
    /// is in flight, or a numeral lexeme ends right at the cursor.
    fn need_count_scan(&self, ctx: &AnalyzeContext) -> bool {
        self.numeral_start.is_some()
            || !self.count_hits.is_empty()
            || ctx.numeral_end() == Some(ctx.cursor())
    }

    fn process_count(&mut self, ctx: &mut AnalyzeContext, dict: &DictSnapshot) {
        if !matches!(
            ctx.current_char_type(),
            CharType::Chinese | CharType::ChineseNumeral
        ) {
            self.count_hits.clear();
            return;
        }
        if !self.need_count_scan(ctx) {
            return;
        }

        let cursor = ctx.cursor();
        let offset = ctx.buffer_offset();
        let text = ctx.buffer();
        let mut found = Vec::new();

        self.count_hits.retain_mut(|hit| {
            *hit = dict.match_with_hit(text, cursor, *hit);
            if hit.is_match() {
                let begin = hit.begin();
                found.push(Lexeme::new(offset, begin, cursor - begin + 1, LexemeType::Count));
            }
            hit.is_prefix()
        });

        let single = dict.match_in_quantifier_dict(text, cursor, 1);
        if single.is_match() {
            found.push(Lexeme::new(offset, cursor, 1, LexemeType::Count));
        }
        if single.is_prefix() {
            self.count_hits.push(single);
        }

        for lexeme in found {
            ctx.add_lexeme(lexeme);
        }
    }

    pub(crate) fn anchor(&self) -> Option<usize> {
        self.count_hits
            .iter()
            .map(Hit::begin)
            .chain(self.numeral_start)
            .min()
    }

    pub(crate) fn flush(&mut self, ctx: &mut AnalyzeContext) {
        if let Some(start) = self.numeral_start.take() {
            let end = ctx.cursor() + 1;
            ctx.add_lexeme(Lexeme::new(
                ctx.buffer_offset(),
                start,
                end - start,
                LexemeType::ChineseNumeral,
            ));
        }
        self.count_hits.clear();
    }

    pub(crate) fn reset(&mut self) {
        self.numeral_start = None;
        self.count_hits.clear();
    }
}
