use crate::context::AnalyzeContext;
use crate::dictionary::DictSnapshot;
use crate::lexeme::{Lexeme, LexemeType};
use crate::segmenters::SegmenterKind;
use crate::trie::Hit;

/// Main-dictionary matcher. Every CJK unit starts a new descent, and all
/// descents that are still prefixes advance together.
#[derive(Debug, Clone, Default)]
pub struct CjkSegmenter {
    hits: Vec<Hit>,
}

impl CjkSegmenter {
    pub(crate) fn analyze(&mut self, ctx: &mut AnalyzeContext, dict: &DictSnapshot) {
        if ctx.current_char_type().is_cjk() {
            let cursor = ctx.cursor();
            let offset = ctx.buffer_offset();
            let text = ctx.buffer();
            let mut found = Vec::new();

            self.hits.retain_mut(|hit| {
                *hit = dict.match_with_hit(text, cursor, *hit);
                if hit.is_match() {
                    let begin = hit.begin();
                    found.push(Lexeme::new(offset, begin, cursor - begin + 1, LexemeType::CjkWord));
                }
                hit.is_prefix()
            });

            let single = dict.match_in_main_dict(text, cursor, 1);
            if single.is_match() {
                found.push(Lexeme::new(offset, cursor, 1, LexemeType::CjkWord));
            }
            if single.is_prefix() {
                self.hits.push(single);
            }

            for lexeme in found {
                ctx.add_lexeme(lexeme);
            }
        } else {
            self.hits.clear();
        }

        if self.hits.is_empty() {
            ctx.unlock_buffer(SegmenterKind::Cjk);
        } else {
            ctx.lock_buffer(SegmenterKind::Cjk);
        }
    }

    pub(crate) fn anchor(&self) -> Option<usize> {
        self.hits.iter().map(Hit::begin).min()
    }

    pub(crate) fn reset(&mut self) {
        self.hits.clear();
    }
}
