//! Prefix trie for dictionary matching during segmentation.
use crate::char_util::regularize_str;
use ahash::AHashMap;

/// Nodes with at most this many children keep them in a sorted array;
/// wider nodes switch to a hash map.
const ARRAY_LENGTH_LIMIT: usize = 3;

const ROOT: NodeId = 0;

/// Index of a node inside one [`Trie`]. Only meaningful for the trie that
/// produced it.
pub type NodeId = u32;

/// Which dictionary a trie (and therefore a [`Hit`]) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictKind {
    Main,
    Quantifier,
    StopWord,
}

/// State of an in-progress or completed trie descent.
///
/// A hit is `unmatch` when the descent fell off the trie, `match` when the
/// consumed span is an enabled entry, and `prefix` when longer entries
/// continue below the reached node. `match` and `prefix` can both be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    kind: DictKind,
    node: Option<NodeId>,
    matched: bool,
    prefix: bool,
    begin: usize,
    end: usize,
}

impl Hit {
    fn start(kind: DictKind, begin: usize) -> Self {
        Self {
            kind,
            node: None,
            matched: false,
            prefix: false,
            begin,
            end: begin,
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched
    }

    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    pub fn is_unmatch(&self) -> bool {
        !self.matched && !self.prefix
    }

    /// Buffer index of the first unit of the span.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Buffer index of the last unit consumed (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn kind(&self) -> DictKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
enum Children {
    Array(Vec<(char, NodeId)>),
    Map(AHashMap<char, NodeId>),
}

impl Default for Children {
    fn default() -> Self {
        Children::Array(Vec::new())
    }
}

impl Children {
    fn get(&self, ch: char) -> Option<NodeId> {
        match self {
            Children::Array(entries) => entries
                .binary_search_by_key(&ch, |&(c, _)| c)
                .ok()
                .map(|i| entries[i].1),
            Children::Map(map) => map.get(&ch).copied(),
        }
    }

    fn insert(&mut self, ch: char, id: NodeId) {
        match self {
            Children::Array(entries) if entries.len() < ARRAY_LENGTH_LIMIT => {
                if let Err(pos) = entries.binary_search_by_key(&ch, |&(c, _)| c) {
                    entries.insert(pos, (ch, id));
                }
            }
            Children::Array(entries) => {
                let mut map: AHashMap<char, NodeId> = entries.drain(..).collect();
                map.insert(ch, id);
                *self = Children::Map(map);
            }
            Children::Map(map) => {
                map.insert(ch, id);
            }
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Children::Array(entries) => entries.is_empty(),
            Children::Map(map) => map.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: Children,
    /// Set while the path to this node spells an enabled entry.
    terminal: bool,
}

/// An arena-backed trie over regularized dictionary entries.
///
/// Nodes are never removed: [`Trie::disable`] only clears the terminal flag so
/// an entry stops matching while still acting as a prefix of longer entries.
///
/// # Example
/// ```
/// use libchinese_segmenter::trie::{DictKind, Trie};
///
/// let trie = Trie::from_words(DictKind::Main, ["中", "中国"]);
/// let text: Vec<char> = "中国".chars().collect();
///
/// let hit = trie.match_span(&text, 0, 1);
/// assert!(hit.is_match() && hit.is_prefix());
///
/// let hit = trie.match_with_hit(&text, 1, hit);
/// assert!(hit.is_match() && !hit.is_prefix());
/// ```
#[derive(Debug, Clone)]
pub struct Trie {
    kind: DictKind,
    nodes: Vec<TrieNode>,
    words: usize,
}

impl Trie {
    /// Create an empty trie.
    pub fn new(kind: DictKind) -> Self {
        Self {
            kind,
            nodes: vec![TrieNode::default()],
            words: 0,
        }
    }

    /// Build a trie from an iterator of raw entries. Blank entries are skipped.
    pub fn from_words<I, S>(kind: DictKind, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new(kind);
        for word in words {
            trie.insert(word.as_ref());
        }
        trie
    }

    pub fn kind(&self) -> DictKind {
        self.kind
    }

    /// Number of enabled entries.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Insert an entry (trimmed and regularized first).
    ///
    /// Returns `true` if the entry was not already enabled. Re-inserting a
    /// disabled entry enables it again.
    pub fn insert(&mut self, word: &str) -> bool {
        let key = regularize_str(word);
        if key.is_empty() {
            return false;
        }
        let mut node = ROOT;
        for ch in key.chars() {
            node = match self.nodes[node as usize].children.get(ch) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len() as NodeId;
                    self.nodes.push(TrieNode::default());
                    self.nodes[node as usize].children.insert(ch, next);
                    next
                }
            };
        }
        let target = &mut self.nodes[node as usize];
        if target.terminal {
            return false;
        }
        target.terminal = true;
        self.words += 1;
        true
    }

    /// Disable an entry in place. Returns `true` if it was enabled.
    pub fn disable(&mut self, word: &str) -> bool {
        let key = regularize_str(word);
        match self.find(&key) {
            Some(node) if self.nodes[node as usize].terminal => {
                self.nodes[node as usize].terminal = false;
                self.words -= 1;
                true
            }
            _ => false,
        }
    }

    /// Whether `word` is an enabled entry (not just a prefix).
    pub fn contains_word(&self, word: &str) -> bool {
        self.find(&regularize_str(word))
            .map(|node| self.nodes[node as usize].terminal)
            .unwrap_or(false)
    }

    /// Match `text[begin..begin + length]` from the root.
    ///
    /// Out-of-range or empty spans report `unmatch`.
    pub fn match_span(&self, text: &[char], begin: usize, length: usize) -> Hit {
        let mut hit = Hit::start(self.kind, begin);
        match begin.checked_add(length).and_then(|end| text.get(begin..end)) {
            Some(span) if !span.is_empty() => {
                self.descend(ROOT, span, begin, &mut hit);
            }
            _ => {}
        }
        hit
    }

    /// Continue a prefix `hit` by one unit at `text[index]`.
    ///
    /// The returned hit keeps the original `begin`. Hits that carry no node
    /// (already dead ends) stay `unmatch`.
    pub fn match_with_hit(&self, text: &[char], index: usize, hit: Hit) -> Hit {
        let mut next = Hit::start(self.kind, hit.begin);
        next.end = index;
        if let (Some(node), Some(unit)) = (hit.node, text.get(index..=index)) {
            self.descend(node, unit, index, &mut next);
        }
        next
    }

    fn descend(&self, from: NodeId, span: &[char], first: usize, hit: &mut Hit) {
        let mut node = from;
        for (i, &ch) in span.iter().enumerate() {
            hit.end = first + i;
            match self.nodes[node as usize].children.get(ch) {
                Some(next) => node = next,
                None => return,
            }
        }
        let reached = &self.nodes[node as usize];
        hit.matched = reached.terminal;
        if !reached.children.is_empty() {
            hit.prefix = true;
            hit.node = Some(node);
        }
    }

    fn find(&self, key: &str) -> Option<NodeId> {
        if key.is_empty() {
            return None;
        }
        let mut node = ROOT;
        for ch in key.chars() {
            node = self.nodes[node as usize].children.get(ch)?;
        }
        Some(node)
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new(DictKind::Main)
    }
}
