//! Shared dictionary: main, quantifier and stop-word tries.
//!
//! One `Dictionary` is built by the caller and handed to every `Segmenter` as
//! an `Arc`. The main trie lives behind an [`ArcSwap`]: each scan pass works on
//! a [`DictSnapshot`] taken when the pass starts, while hot patches and
//! background rebuilds publish whole new tries with a single atomic store.
//! Old tries stay valid for as long as some snapshot still holds them.
//!
//! Entries are line-oriented word lists. See [`read_word_list`].

use crate::error::{Result, SegmentError};
use crate::trie::{DictKind, Hit, Trie};
use crate::Config;
use arc_swap::ArcSwap;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Source of truth for the main dictionary, consulted by every rebuild.
pub trait DictSource: Send + Sync {
    /// Return every main-dictionary entry (raw, not yet regularized).
    fn load_main_words(&self) -> Result<Vec<String>>;
}

/// Main dictionary file plus optional extension files.
#[derive(Debug, Clone, Default)]
pub struct FileDictSource {
    main: Option<PathBuf>,
    extensions: Vec<PathBuf>,
}

impl FileDictSource {
    pub fn new(main: Option<PathBuf>, extensions: Vec<PathBuf>) -> Self {
        Self { main, extensions }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.main_dictionary.clone(),
            config.ext_dictionaries.clone(),
        )
    }
}

impl DictSource for FileDictSource {
    fn load_main_words(&self) -> Result<Vec<String>> {
        let mut words = match &self.main {
            Some(path) => read_word_list(path)?,
            None => Vec::new(),
        };
        for path in &self.extensions {
            info!(path = %path.display(), "loading extension dictionary");
            words.extend(read_optional_word_list(path)?);
        }
        Ok(words)
    }
}

/// In-memory word list. Useful for embedding and for tests that need to
/// change the source between refreshes.
#[derive(Debug, Default)]
pub struct MemoryDictSource {
    words: Mutex<Vec<String>>,
}

impl MemoryDictSource {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: Mutex::new(words.into_iter().map(|w| w.as_ref().to_string()).collect()),
        }
    }

    /// Append words; they become visible to segmenters after the next refresh.
    pub fn add_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .lock()
            .extend(words.into_iter().map(|w| w.as_ref().to_string()));
    }

    /// Remove every occurrence of the given words.
    pub fn remove_words<I, S>(&self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let gone: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        self.words.lock().retain(|w| !gone.contains(w));
    }
}

impl DictSource for MemoryDictSource {
    fn load_main_words(&self) -> Result<Vec<String>> {
        Ok(self.words.lock().clone())
    }
}

/// Read a UTF-8 word list, one entry per line.
///
/// Lines are trimmed; blank lines and a leading byte-order mark are skipped.
/// A missing file is reported as [`SegmentError::DictionaryNotFound`].
pub fn read_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SegmentError::DictionaryNotFound(path.to_path_buf()),
        _ => SegmentError::Io(e),
    })?;
    let mut words = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let word = line.trim_start_matches('\u{FEFF}').trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    Ok(words)
}

/// Like [`read_word_list`], but a missing file only logs a warning.
fn read_optional_word_list(path: &Path) -> Result<Vec<String>> {
    match read_word_list(path) {
        Err(SegmentError::DictionaryNotFound(p)) => {
            warn!(path = %p.display(), "dictionary file not found, skipping");
            Ok(Vec::new())
        }
        other => other,
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    running: bool,
    /// Number of finished rebuilds, successful or not.
    completed: u64,
    last_error: Option<String>,
}

/// Main, quantifier and stop-word tries shared by all segmenters.
pub struct Dictionary {
    main: ArcSwap<Trie>,
    quantifiers: Trie,
    stop_words: Trie,
    source: Arc<dyn DictSource>,
    refresh: Mutex<RefreshState>,
    refreshed: Condvar,
}

impl Dictionary {
    /// Load every dictionary named in `config`.
    ///
    /// The main and quantifier files must exist when configured; extension
    /// and stop-word files are skipped with a warning when missing.
    pub fn load(config: &Config) -> Result<Arc<Self>> {
        let quantifiers = match &config.quantifier_dictionary {
            Some(path) => read_word_list(path)?,
            None => Vec::new(),
        };
        let mut stop_words = Vec::new();
        for path in &config.ext_stop_word_dictionaries {
            info!(path = %path.display(), "loading stop-word dictionary");
            stop_words.extend(read_optional_word_list(path)?);
        }
        Self::with_source(
            Arc::new(FileDictSource::from_config(config)),
            Trie::from_words(DictKind::Quantifier, quantifiers),
            Trie::from_words(DictKind::StopWord, stop_words),
        )
    }

    /// Build from a custom main-dictionary source and prepared side tries.
    pub fn with_source(
        source: Arc<dyn DictSource>,
        quantifiers: Trie,
        stop_words: Trie,
    ) -> Result<Arc<Self>> {
        let main = Trie::from_words(DictKind::Main, source.load_main_words()?);
        info!(
            main = main.len(),
            quantifiers = quantifiers.len(),
            stop_words = stop_words.len(),
            "dictionary loaded"
        );
        Ok(Arc::new(Self {
            main: ArcSwap::from_pointee(main),
            quantifiers,
            stop_words,
            source,
            refresh: Mutex::new(RefreshState::default()),
            refreshed: Condvar::new(),
        }))
    }

    /// Build entirely from in-memory word lists.
    pub fn from_words<M, Q, S>(main: M, quantifiers: Q, stop_words: S) -> Arc<Self>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        Q: IntoIterator,
        Q::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let source = MemoryDictSource::new(main);
        let trie = Trie::from_words(DictKind::Main, source.words.lock().iter());
        Arc::new(Self {
            main: ArcSwap::from_pointee(trie),
            quantifiers: Trie::from_words(DictKind::Quantifier, quantifiers),
            stop_words: Trie::from_words(DictKind::StopWord, stop_words),
            source: Arc::new(source),
            refresh: Mutex::new(RefreshState::default()),
            refreshed: Condvar::new(),
        })
    }

    /// Pin the current main trie for one scan pass.
    pub fn snapshot(self: &Arc<Self>) -> DictSnapshot {
        DictSnapshot {
            main: self.main.load_full(),
            dict: Arc::clone(self),
        }
    }

    /// Whether `text[begin..begin + length]` is a stop word.
    pub fn is_stop_word(&self, text: &[char], begin: usize, length: usize) -> bool {
        self.stop_words.match_span(text, begin, length).is_match()
    }

    /// Whether the live main trie has `word` enabled.
    pub fn contains_word(&self, word: &str) -> bool {
        self.main.load().contains_word(word)
    }

    /// Number of enabled entries in the live main trie.
    pub fn main_len(&self) -> usize {
        self.main.load().len()
    }

    /// Number of finished refreshes.
    pub fn generation(&self) -> u64 {
        self.lock_state().completed
    }

    /// Hot-patch words into the live main trie. Returns how many were new.
    ///
    /// The trie is copied, patched and published atomically; scans already
    /// running keep their snapshot. Calls are expected to be serialized by the
    /// caller. Patches are not written back to the source, so a later
    /// [`refresh`](Self::refresh) drops them unless the source has them too.
    pub fn add_words<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        let mut added = 0;
        self.main.rcu(|current| {
            let mut next = Trie::clone(current);
            added = words.iter().filter(|w| next.insert(w)).count();
            next
        });
        debug!(added, "main dictionary patched");
        added
    }

    /// Disable words in the live main trie. Returns how many were enabled.
    pub fn disable_words<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words.into_iter().map(|w| w.as_ref().to_string()).collect();
        let mut disabled = 0;
        self.main.rcu(|current| {
            let mut next = Trie::clone(current);
            disabled = words.iter().filter(|w| next.disable(w)).count();
            next
        });
        debug!(disabled, "main dictionary entries disabled");
        disabled
    }

    /// Rebuild the main trie from the source on a background thread and swap
    /// it in.
    ///
    /// Requests made while a rebuild is running join that rebuild instead of
    /// starting another. With `block` the call waits for the rebuild it joined
    /// and reports its outcome; otherwise failures are only logged. A failed
    /// rebuild leaves the live trie untouched.
    pub fn refresh(self: &Arc<Self>, block: bool) -> Result<()> {
        let mut state = self.lock_state();
        let target = state.completed + 1;
        if state.running {
            debug!("dictionary refresh already running, joining it");
        } else {
            let dict = Arc::clone(self);
            thread::Builder::new()
                .name("dict-refresh".into())
                .spawn(move || dict.rebuild_main())?;
            state.running = true;
            debug!("dictionary refresh started");
        }
        if !block {
            return Ok(());
        }
        while state.completed < target {
            self.refreshed.wait(&mut state);
        }
        match &state.last_error {
            Some(message) => Err(SegmentError::Refresh(message.clone())),
            None => Ok(()),
        }
    }

    fn rebuild_main(&self) {
        let started = Instant::now();
        let outcome = self
            .source
            .load_main_words()
            .map(|words| Trie::from_words(DictKind::Main, words));

        let mut state = self.lock_state();
        match outcome {
            Ok(trie) => {
                let words = trie.len();
                self.main.store(Arc::new(trie));
                state.last_error = None;
                info!(
                    words,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "main dictionary swapped"
                );
            }
            Err(e) => {
                error!(error = %e, "dictionary refresh failed, keeping current trie");
                state.last_error = Some(e.to_string());
            }
        }
        state.running = false;
        state.completed += 1;
        drop(state);
        self.refreshed.notify_all();
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.refresh.lock()
    }
}

impl std::fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dictionary")
            .field("main", &self.main_len())
            .field("quantifiers", &self.quantifiers.len())
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}

/// The dictionary as seen by one scan pass.
///
/// Hits produced here carry node ids of the pinned main trie, so they must be
/// continued through the same snapshot.
#[derive(Clone)]
pub struct DictSnapshot {
    main: Arc<Trie>,
    dict: Arc<Dictionary>,
}

impl DictSnapshot {
    pub fn match_in_main_dict(&self, text: &[char], begin: usize, length: usize) -> Hit {
        self.main.match_span(text, begin, length)
    }

    pub fn match_in_quantifier_dict(&self, text: &[char], begin: usize, length: usize) -> Hit {
        self.dict.quantifiers.match_span(text, begin, length)
    }

    /// Continue `hit` by one unit at `text[index]` in the trie it came from.
    pub fn match_with_hit(&self, text: &[char], index: usize, hit: Hit) -> Hit {
        match hit.kind() {
            DictKind::Main => self.main.match_with_hit(text, index, hit),
            DictKind::Quantifier => self.dict.quantifiers.match_with_hit(text, index, hit),
            DictKind::StopWord => self.dict.stop_words.match_with_hit(text, index, hit),
        }
    }

    pub fn is_stop_word(&self, text: &[char], begin: usize, length: usize) -> bool {
        self.dict.is_stop_word(text, begin, length)
    }

    pub fn main(&self) -> &Trie {
        &self.main
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    struct FailingSource;

    impl DictSource for FailingSource {
        fn load_main_words(&self) -> Result<Vec<String>> {
            Err(SegmentError::DictionaryNotFound(PathBuf::from("gone.dic")))
        }
    }

    #[test]
    fn from_words_builds_all_tries() {
        let dict = Dictionary::from_words(["中国", "人"], ["个"], ["的"]);
        let snap = dict.snapshot();
        let text = chars("中国个的");
        assert!(snap.match_in_main_dict(&text, 0, 2).is_match());
        assert!(snap.match_in_quantifier_dict(&text, 2, 1).is_match());
        assert!(snap.is_stop_word(&text, 3, 1));
        assert!(!dict.is_stop_word(&text, 0, 1));
        assert_eq!(dict.main_len(), 2);
    }

    #[test]
    fn match_with_hit_dispatches_by_kind() {
        let dict = Dictionary::from_words(["千克"], ["千米"], Vec::<&str>::new());
        let snap = dict.snapshot();
        let text = chars("千米");
        let hit = snap.match_in_quantifier_dict(&text, 0, 1);
        assert!(hit.is_prefix());
        assert!(snap.match_with_hit(&text, 1, hit).is_match());
    }

    #[test]
    fn add_and_disable_words() {
        let dict = Dictionary::from_words(["北京"], Vec::<&str>::new(), Vec::<&str>::new());
        assert_eq!(dict.add_words(["上海", "北京"]), 1);
        assert!(dict.contains_word("上海"));
        assert_eq!(dict.disable_words(["北京", "广州"]), 1);
        assert!(!dict.contains_word("北京"));
        assert_eq!(dict.main_len(), 1);
    }

    #[test]
    fn snapshot_is_isolated_from_patches() {
        let dict = Dictionary::from_words(["北京"], Vec::<&str>::new(), Vec::<&str>::new());
        let before = dict.snapshot();
        dict.add_words(["上海"]);
        assert!(!before.main().contains_word("上海"));
        assert!(dict.snapshot().main().contains_word("上海"));
    }

    #[test]
    fn blocking_refresh_swaps_in_source_words() {
        let source = Arc::new(MemoryDictSource::new(["北京"]));
        let dict = Dictionary::with_source(
            source.clone(),
            Trie::new(DictKind::Quantifier),
            Trie::new(DictKind::StopWord),
        )
        .unwrap();
        let old = dict.snapshot();

        source.add_words(["深圳"]);
        source.remove_words(["北京"]);
        dict.refresh(true).unwrap();

        assert_eq!(dict.generation(), 1);
        assert!(dict.contains_word("深圳"));
        assert!(!dict.contains_word("北京"));
        assert!(old.main().contains_word("北京"));
    }

    #[test]
    fn failed_refresh_keeps_live_trie() {
        let dict = Dictionary::from_words(["北京"], Vec::<&str>::new(), Vec::<&str>::new());
        let failing = Dictionary {
            main: ArcSwap::new(dict.main.load_full()),
            quantifiers: Trie::new(DictKind::Quantifier),
            stop_words: Trie::new(DictKind::StopWord),
            source: Arc::new(FailingSource),
            refresh: Mutex::new(RefreshState::default()),
            refreshed: Condvar::new(),
        };
        let failing = Arc::new(failing);
        let err = failing.refresh(true).unwrap_err();
        assert!(matches!(err, SegmentError::Refresh(_)));
        assert!(failing.contains_word("北京"));
        assert_eq!(failing.generation(), 1);
    }

    #[test]
    fn concurrent_refreshes_all_complete() {
        let source = Arc::new(MemoryDictSource::new(["一"]));
        let dict = Dictionary::with_source(
            source.clone(),
            Trie::new(DictKind::Quantifier),
            Trie::new(DictKind::StopWord),
        )
        .unwrap();
        source.add_words(["二"]);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let dict = Arc::clone(&dict);
                thread::spawn(move || dict.refresh(true))
            })
            .collect();
        for h in handles {
            h.join().unwrap().unwrap();
        }
        assert!(dict.contains_word("二"));
        let generation = dict.generation();
        assert!((1..=4).contains(&generation));
    }

    #[test]
    fn word_list_skips_blank_lines_and_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.dic");
        std::fs::write(&path, "\u{FEFF}中国\n\n   \n 人民 \n").unwrap();
        assert_eq!(read_word_list(&path).unwrap(), vec!["中国", "人民"]);

        let missing = dir.path().join("missing.dic");
        assert!(matches!(
            read_word_list(&missing),
            Err(SegmentError::DictionaryNotFound(_))
        ));
    }
}
