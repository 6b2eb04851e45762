// core/tests/segmentation.rs
//
// End-to-end segmentation behaviour:
// - smart mode covers the input exactly, across many buffers
// - smart mode never emits more tokens than fine-grained mode
// - full-width and upper-case Latin input is normalized
// - results do not depend on how the reader chunks its bytes

use libchinese_segmenter::{segment_str, Dictionary, Lexeme, LexemeType, Segmenter};
use std::io::Read;
use std::sync::Arc;

fn sample_dict() -> Arc<Dictionary> {
    Dictionary::from_words(
        [
            "中华",
            "中华人民",
            "中华人民共和国",
            "人民",
            "共和国",
            "是",
            "一个",
            "伟大",
            "大的",
            "国家",
        ],
        ["个", "千克"],
        Vec::<&str>::new(),
    )
}

const SENTENCE: &str = "中华人民共和国是一个伟大的国家";

fn assert_exact_cover(lexemes: &[Lexeme], total: usize) {
    let mut expected = 0;
    for l in lexemes {
        assert_eq!(
            l.begin_position(),
            expected,
            "gap or overlap before {l}"
        );
        expected = l.end_position();
    }
    assert_eq!(expected, total);
}

/// Reader that returns at most `n` bytes per call.
struct Chunked<'a> {
    data: &'a [u8],
    n: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let len = self.n.min(buf.len()).min(self.data.len());
        buf[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        Ok(len)
    }
}

#[test]
fn smart_mode_sentence() {
    let out = segment_str(SENTENCE, &sample_dict(), true).unwrap();
    let words: Vec<&str> = out.iter().map(Lexeme::text).collect();
    assert_eq!(words, vec!["中华人民共和国", "是", "一个", "伟", "大的", "国家"]);
    assert_eq!(out[3].lexeme_type(), LexemeType::CjkChar);
}

#[test]
fn smart_mode_covers_long_input_exactly() {
    let text = SENTENCE.repeat(700);
    let total = text.chars().count();
    assert!(total > 2 * 4096);

    let out = segment_str(&text, &sample_dict(), true).unwrap();
    assert_exact_cover(&out, total);
    assert_eq!(
        out.iter().filter(|l| l.text() == "中华人民共和国").count(),
        700
    );
}

#[test]
fn smart_mode_reduces_token_count() {
    let dict = sample_dict();
    let smart = segment_str(SENTENCE, &dict, true).unwrap();
    let fine = segment_str(SENTENCE, &dict, false).unwrap();
    assert!(smart.len() < fine.len());
    let fine_words: Vec<&str> = fine.iter().map(Lexeme::text).collect();
    for word in ["中华", "中华人民", "人民", "共和国", "中华人民共和国"] {
        assert!(fine_words.contains(&word), "missing {word}");
    }
}

#[test]
fn three_people_example() {
    let dict = Dictionary::from_words(["三", "人", "三个人"], ["个"], Vec::<&str>::new());
    let smart: Vec<String> = segment_str("三个人", &dict, true)
        .unwrap()
        .into_iter()
        .map(|l| l.text().to_string())
        .collect();
    assert_eq!(smart, vec!["三个人"]);

    let fine: Vec<String> = segment_str("三个人", &dict, false)
        .unwrap()
        .into_iter()
        .map(|l| l.text().to_string())
        .collect();
    assert!(fine.len() > 1);
    assert!(fine.contains(&"三个人".to_string()));
}

#[test]
fn numerals_compound_in_smart_mode_only() {
    let dict = sample_dict();
    let smart = segment_str("5千克", &dict, true).unwrap();
    assert_eq!(smart.len(), 1);
    assert_eq!(smart[0].text(), "5千克");
    assert_eq!(smart[0].lexeme_type(), LexemeType::CombinedQuantifier);

    let fine: Vec<LexemeType> = segment_str("5千克", &dict, false)
        .unwrap()
        .iter()
        .map(Lexeme::lexeme_type)
        .collect();
    assert_eq!(
        fine,
        vec![LexemeType::Arabic, LexemeType::ChineseNumeral, LexemeType::Count]
    );
}

#[test]
fn full_width_latin_is_normalized() {
    let out = segment_str("ＡＢＣ１２３ Rust", &sample_dict(), true).unwrap();
    let words: Vec<(&str, LexemeType)> = out.iter().map(|l| (l.text(), l.lexeme_type())).collect();
    assert_eq!(
        words,
        vec![("abc123", LexemeType::Letter), ("rust", LexemeType::Letter)]
    );
}

#[test]
fn long_latin_run_stays_contiguous() {
    let text = "a".repeat(5000);
    let out = segment_str(&text, &sample_dict(), true).unwrap();
    assert!(out.iter().all(|l| l.lexeme_type() == LexemeType::Letter));
    assert_exact_cover(&out, 5000);
}

#[test]
fn reader_chunking_does_not_change_output() {
    let text = format!("{}ok 2个{}", SENTENCE.repeat(300), SENTENCE);
    let dict = sample_dict();
    let whole = segment_str(&text, &dict, true).unwrap();

    let reader = Chunked {
        data: text.as_bytes(),
        n: 7,
    };
    let chunked: Vec<Lexeme> = Segmenter::new(reader, Arc::clone(&dict), true)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(whole, chunked);
}

#[test]
fn segmentation_is_repeatable() {
    let dict = sample_dict();
    let text = SENTENCE.repeat(10);
    let first = segment_str(&text, &dict, true).unwrap();
    let second = segment_str(&text, &dict, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(segment_str("", &sample_dict(), true).unwrap().is_empty());
    assert!(segment_str(" ，。", &sample_dict(), true).unwrap().is_empty());
}
