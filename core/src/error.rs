//! Error type shared by the segmenter and the dictionary.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SegmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8 at stream byte {offset}")]
    Decode { offset: u64 },

    #[error("dictionary not found: {}", .0.display())]
    DictionaryNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("configuration could not be written: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("dictionary refresh failed: {0}")]
    Refresh(String),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
