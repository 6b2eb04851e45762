use crate::char_util::CharType;
use crate::context::AnalyzeContext;
use crate::lexeme::{Lexeme, LexemeType};
use crate::segmenters::SegmenterKind;

/// Merges consecutive letters and digits into one run. Runs are never split.
#[derive(Debug, Clone, Default)]
pub struct LetterSegmenter {
    start: Option<usize>,
}

impl LetterSegmenter {
    pub(crate) fn analyze(&mut self, ctx: &mut AnalyzeContext) {
        if ctx.current_char_type().is_letter_or_digit() {
            if self.start.is_none() {
                self.start = Some(ctx.cursor());
                ctx.lock_buffer(SegmenterKind::Letter);
            }
        } else if let Some(start) = self.start.take() {
            emit_run(ctx, start, ctx.cursor());
            ctx.unlock_buffer(SegmenterKind::Letter);
        }
    }

    pub(crate) fn anchor(&self) -> Option<usize> {
        self.start
    }

    pub(crate) fn flush(&mut self, ctx: &mut AnalyzeContext) {
        if let Some(start) = self.start.take() {
            emit_run(ctx, start, ctx.cursor() + 1);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.start = None;
    }
}

fn emit_run(ctx: &mut AnalyzeContext, start: usize, end: usize) {
    let lexeme_type = if (start..end).all(|i| ctx.char_type(i) == CharType::Arabic) {
        LexemeType::Arabic
    } else {
        LexemeType::Letter
    };
    ctx.add_lexeme(Lexeme::new(ctx.buffer_offset(), start, end - start, lexeme_type));
}
