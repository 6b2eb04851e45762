// core/tests/buffer_boundary.rs
//
// Words that straddle the end of the 4096-unit scan buffer must come out
// whole, with stream positions that account for every refill.

use libchinese_segmenter::context::BUFF_SIZE;
use libchinese_segmenter::{segment_str, Dictionary, Lexeme, LexemeType, Segmenter};
use std::io::Cursor;

fn filler(n: usize) -> String {
    "人".repeat(n)
}

#[test]
fn long_word_across_buffer_end() {
    let long_word = "天地".repeat(150);
    let prefix = 3900;
    let text = format!("{}{}{}", filler(prefix), long_word, filler(10));
    assert!(prefix + 300 > BUFF_SIZE);

    let dict = Dictionary::from_words([long_word.as_str()], Vec::<&str>::new(), Vec::<&str>::new());
    let out = segment_str(&text, &dict, true).unwrap();

    assert_eq!(out.len(), prefix + 1 + 10);
    let word = &out[prefix];
    assert_eq!(word.begin_position(), prefix);
    assert_eq!(word.length(), 300);
    assert_eq!(word.text(), long_word);
    assert_eq!(word.lexeme_type(), LexemeType::CjkWord);
    assert_eq!(out.last().map(Lexeme::end_position), Some(prefix + 310));
}

#[test]
fn planted_word_just_before_buffer_end() {
    let prefix = BUFF_SIZE - 6;
    let text = format!("{}中华人民共和国{}", filler(prefix), filler(20));
    let dict = Dictionary::from_words(
        ["中华人民共和国", "人民", "共和国"],
        Vec::<&str>::new(),
        Vec::<&str>::new(),
    );

    for use_smart in [true, false] {
        let out: Vec<Lexeme> = Segmenter::new(Cursor::new(text.clone().into_bytes()), dict.clone(), use_smart)
            .collect::<Result<_, _>>()
            .unwrap();
        let hit = out
            .iter()
            .find(|l| l.text() == "中华人民共和国")
            .unwrap_or_else(|| panic!("long word missing (smart = {use_smart})"));
        assert_eq!(hit.begin_position(), prefix);
    }
}

#[test]
fn positions_stay_absolute_after_refills() {
    // delimiters keep the buffer unlocked, so passes stop early in the
    // critical zone instead of at the physical end
    let text = "中国，".repeat(3000);
    let dict = Dictionary::from_words(["中国"], Vec::<&str>::new(), Vec::<&str>::new());
    let out = segment_str(&text, &dict, true).unwrap();

    assert_eq!(out.len(), 3000);
    for (i, l) in out.iter().enumerate() {
        assert_eq!(l.begin_position(), i * 3);
        assert_eq!(l.text(), "中国");
    }
}

#[test]
fn numeral_run_across_buffer_end() {
    let prefix = BUFF_SIZE - 2;
    let text = format!("{}一二三四五个", filler(prefix));
    let dict = Dictionary::from_words(Vec::<&str>::new(), ["个"], Vec::<&str>::new());
    let out = segment_str(&text, &dict, true).unwrap();
    let last = out.last().unwrap();
    assert_eq!(last.text(), "一二三四五个");
    assert_eq!(last.lexeme_type(), LexemeType::CombinedQuantifier);
    assert_eq!(last.begin_position(), prefix);
}

#[test]
fn count_word_after_cut_keeps_its_type() {
    // the Latin run holds the buffer lock, so the pass reaches the last unit
    // with 公 in flight and is cut right after the numeral
    let text = format!("{}三公斤", "a".repeat(BUFF_SIZE - 2));
    let dict = Dictionary::from_words(Vec::<&str>::new(), ["公斤"], Vec::<&str>::new());
    let out = segment_str(&text, &dict, true).unwrap();

    let tail: Vec<(&str, LexemeType, usize)> = out[1..]
        .iter()
        .map(|l| (l.text(), l.lexeme_type(), l.begin_position()))
        .collect();
    assert_eq!(
        tail,
        vec![
            ("三", LexemeType::ChineseNumeral, BUFF_SIZE - 2),
            ("公斤", LexemeType::Count, BUFF_SIZE - 1),
        ]
    );
}
