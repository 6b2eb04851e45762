//! libchinese-segmenter
//!
//! Streaming dictionary-based word segmentation for Chinese and mixed-script
//! text.
//!
//! Public API:
//! - `Segmenter` - Lazy lexeme stream over any `Read`
//! - `Dictionary` - Shared main/quantifier/stop-word dictionaries with hot reload
//! - `Lexeme` - One token with its position, type and text
//! - `Config` - Dictionary locations and segmentation mode
//!
//! ```
//! use libchinese_segmenter::{segment_str, Dictionary};
//!
//! let dict = Dictionary::from_words(["中国", "人民"], ["个"], ["的"]);
//! let words: Vec<String> = segment_str("中国的人民", &dict, true)
//!     .unwrap()
//!     .into_iter()
//!     .map(|l| l.text().to_string())
//!     .collect();
//! assert_eq!(words, ["中国", "人民"]);
//! ```
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod char_util;
pub use char_util::CharType;

pub mod error;
pub use error::{Result, SegmentError};

pub mod trie;
pub use trie::{DictKind, Hit, Trie};

pub mod dictionary;
pub use dictionary::{DictSnapshot, DictSource, Dictionary, FileDictSource, MemoryDictSource};

pub mod lexeme;
pub use lexeme::{Lexeme, LexemeType};

pub mod lexeme_set;
pub use lexeme_set::LexemeSet;

pub mod path;
pub use path::LexemePath;

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod context;
pub use context::{AnalyzeContext, ScanState};

pub mod segmenters;
pub use segmenters::{SegmenterKind, SubSegmenter};

pub mod arbitrator;
pub use arbitrator::Arbitrator;

pub mod segmenter;
pub use segmenter::{segment_str, Segmenter};

/// Segmenter configuration.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
/// Relative paths in a file loaded with [`Config::load_toml`] are resolved
/// against the file's directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Main word list. Required to exist when set.
    pub main_dictionary: Option<PathBuf>,

    /// Count words used after numerals. Required to exist when set.
    pub quantifier_dictionary: Option<PathBuf>,

    /// Extra main-dictionary word lists; missing files are skipped.
    pub ext_dictionaries: Vec<PathBuf>,

    /// Stop-word lists; missing files are skipped.
    pub ext_stop_word_dictionaries: Vec<PathBuf>,

    /// Resolve ambiguity and merge numerals with count words.
    pub use_smart: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_dictionary: None,
            quantifier_dictionary: None,
            ext_dictionaries: vec![],
            ext_stop_word_dictionaries: vec![],
            use_smart: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Make every relative dictionary path relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        let rebase = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.main_dictionary.iter_mut().for_each(rebase);
        self.quantifier_dictionary.iter_mut().for_each(rebase);
        self.ext_dictionaries.iter_mut().for_each(rebase);
        self.ext_stop_word_dictionaries.iter_mut().for_each(rebase);
    }
}
