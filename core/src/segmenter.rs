//! The segmentation driver.
//!
//! A `Segmenter` pulls units from any `Read`, runs the sub-segmenter chain
//! over one buffer at a time, arbitrates the candidates and hands out
//! lexemes lazily. Each buffer pass pins one dictionary snapshot.

use crate::arbitrator::Arbitrator;
use crate::context::{AnalyzeContext, Settlement, BUFF_SIZE};
use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::input_buffer::InputBuffer;
use crate::lexeme::Lexeme;
use crate::segmenters::SubSegmenter;
use crate::Config;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Segmenter<R> {
    input: InputBuffer<R>,
    dict: Arc<Dictionary>,
    context: AnalyzeContext,
    segmenters: Vec<SubSegmenter>,
    arbitrator: Arbitrator,
    /// Set after a read error; the stream reports its end until `reset`.
    failed: bool,
}

impl<R: Read> Segmenter<R> {
    /// `use_smart` enables ambiguity resolution and numeral compounding;
    /// without it every candidate is emitted.
    pub fn new(input: R, dict: Arc<Dictionary>, use_smart: bool) -> Self {
        Self {
            input: InputBuffer::new(input),
            dict,
            context: AnalyzeContext::new(use_smart),
            segmenters: SubSegmenter::standard_chain(),
            arbitrator: Arbitrator::new(),
            failed: false,
        }
    }

    pub fn with_config(input: R, dict: Arc<Dictionary>, config: &Config) -> Self {
        Self::new(input, dict, config.use_smart)
    }

    pub fn use_smart(&self) -> bool {
        self.context.use_smart()
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.dict
    }

    /// Next lexeme of the stream, or `None` once the input is exhausted.
    pub fn next_lexeme(&mut self) -> Result<Option<Lexeme>> {
        if self.failed {
            return Ok(None);
        }
        loop {
            if let Some(lexeme) = self.context.next_lexeme(&self.dict) {
                return Ok(Some(lexeme));
            }
            let available = match self.context.fill_buffer(&mut self.input) {
                Ok(available) => available,
                Err(e) => {
                    warn!(error = %e, "input failed, ending stream");
                    self.failed = true;
                    self.clear_state();
                    return Err(e);
                }
            };
            if available == 0 {
                self.clear_state();
                return Ok(None);
            }
            self.scan_pass();
        }
    }

    /// Start over on a new input. The dictionary and mode are kept.
    pub fn reset(&mut self, input: R) {
        self.input = InputBuffer::new(input);
        self.failed = false;
        self.clear_state();
    }

    fn clear_state(&mut self) {
        self.context.reset();
        for s in &mut self.segmenters {
            s.reset(&mut self.context);
        }
    }

    fn scan_pass(&mut self) {
        let dict = self.dict.snapshot();
        let ctx = &mut self.context;

        ctx.init_cursor();
        loop {
            for s in &mut self.segmenters {
                s.analyze(ctx, &dict);
            }
            if ctx.need_refill_buffer() || !ctx.move_cursor() {
                break;
            }
        }

        let more_input = ctx.available() == BUFF_SIZE && !self.input.is_exhausted();
        let anchor = self.segmenters.iter().filter_map(SubSegmenter::anchor).min();
        match ctx.settle(anchor, more_input) {
            Settlement::Whole => {
                for s in &mut self.segmenters {
                    s.flush(ctx);
                }
            }
            Settlement::Cut(_) => {
                for s in &mut self.segmenters {
                    s.reset(ctx);
                }
            }
        }

        self.arbitrator.process(ctx);
        ctx.output_to_result();
        debug!(
            buffer_offset = ctx.buffer_offset(),
            consumed = ctx.consumed(),
            available = ctx.available(),
            "pass settled"
        );
        ctx.mark_buffer_offset();
    }
}

impl<R: Read> Iterator for Segmenter<R> {
    type Item = Result<Lexeme>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_lexeme().transpose()
    }
}

/// Segment a whole string.
pub fn segment_str(text: &str, dict: &Arc<Dictionary>, use_smart: bool) -> Result<Vec<Lexeme>> {
    Segmenter::new(text.as_bytes(), Arc::clone(dict), use_smart).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegmentError;
    use crate::lexeme::LexemeType;
    use std::io::Cursor;

    fn dict() -> Arc<Dictionary> {
        Dictionary::from_words(
            ["三", "人", "三个人", "中国", "中国人", "人民"],
            ["个"],
            ["的"],
        )
    }

    fn texts(lexemes: &[Lexeme]) -> Vec<&str> {
        lexemes.iter().map(Lexeme::text).collect()
    }

    #[test]
    fn smart_mode_picks_single_token() {
        let out = segment_str("三个人", &dict(), true).unwrap();
        assert_eq!(texts(&out), vec!["三个人"]);
        assert_eq!(out[0].lexeme_type(), LexemeType::CjkWord);
    }

    #[test]
    fn non_smart_mode_exposes_candidates() {
        let out = segment_str("三个人", &dict(), false).unwrap();
        assert_eq!(texts(&out), vec!["三", "三个人", "个", "人"]);
    }

    #[test]
    fn arabic_count_compound() {
        let out = segment_str("2个", &dict(), true).unwrap();
        assert_eq!(texts(&out), vec!["2个"]);
        assert_eq!(out[0].lexeme_type(), LexemeType::CombinedQuantifier);
        assert_eq!((out[0].begin_position(), out[0].length()), (0, 2));
    }

    #[test]
    fn numeral_in_main_dictionary_still_compounds() {
        let dict = Dictionary::from_words(["三", "一二", "苹果"], ["个"], Vec::<&str>::new());
        for (text, expected) in [
            ("三个", vec!["三个"]),
            ("三个苹果", vec!["三个", "苹果"]),
            ("一二个", vec!["一二个"]),
        ] {
            let out = segment_str(text, &dict, true).unwrap();
            assert_eq!(texts(&out), expected, "{text}");
            assert_eq!(out[0].lexeme_type(), LexemeType::CombinedQuantifier, "{text}");
        }
    }

    #[test]
    fn stop_words_and_delimiters_are_skipped() {
        let out = segment_str("我的书，ok!", &dict(), true).unwrap();
        assert_eq!(texts(&out), vec!["我", "书", "ok"]);
        assert_eq!(out[2].begin_position(), 4);
    }

    #[test]
    fn iterator_reports_input_error_once() {
        let bytes = vec![b'a', 0xFF, b'b'];
        let mut seg = Segmenter::new(Cursor::new(bytes), dict(), true);
        assert!(matches!(seg.next(), Some(Err(SegmentError::Decode { .. }))));
        assert!(seg.next().is_none());

        seg.reset(Cursor::new("人民".as_bytes().to_vec()));
        let out: Vec<Lexeme> = seg.collect::<Result<_>>().unwrap();
        assert_eq!(texts(&out), vec!["人民"]);
    }

    #[test]
    fn reset_replays_identically() {
        let text = "中国人民2024年";
        let mut seg = Segmenter::new(Cursor::new(text.as_bytes().to_vec()), dict(), true);
        let first: Vec<Lexeme> = seg.by_ref().collect::<Result<_>>().unwrap();
        seg.reset(Cursor::new(text.as_bytes().to_vec()));
        let second: Vec<Lexeme> = seg.collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
