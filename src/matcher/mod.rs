//! Multi-pattern substring matcher
//!
//! An Aho-Corasick automaton built over the bot-name set. Construction is a
//! trie insert followed by a breadth-first suffix-link pass; search walks the
//! input once, following suffix links on mismatch, and stops at the first
//! node whose suffix chain ends a pattern. Lookup cost is independent of the
//! number of patterns, which is what keeps per-request classification in the
//! sub-microsecond range even with catalogs of hundreds of bots.
//!
//! The automaton is immutable once built; the manager replaces it wholesale
//! on every index refresh.

use std::collections::HashMap;

const ROOT: usize = 0;

/// A single automaton state, stored in the arena of [`AhoCorasick::nodes`]
#[derive(Debug)]
struct Node {
    children: HashMap<char, usize>,
    /// Deepest proper suffix of this node's path that is also a trie path
    suffix: usize,
    /// The pattern recognized on reaching this state, either ending exactly
    /// here or inherited from the suffix chain
    output: Option<String>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            suffix: ROOT,
            output: None,
        }
    }
}

/// Aho-Corasick automaton over a set of literal, case-sensitive patterns
#[derive(Debug)]
pub struct AhoCorasick {
    nodes: Vec<Node>,
}

impl AhoCorasick {
    /// Builds an automaton from the given patterns
    ///
    /// Empty patterns are discarded; they would turn the root into an
    /// accepting state and match every input.
    ///
    /// # Arguments
    ///
    /// * `patterns` - The literal strings to recognize
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut automaton = Self {
            nodes: vec![Node::new()],
        };
        for pattern in patterns {
            automaton.insert(pattern.as_ref());
        }
        automaton.build_links();
        automaton
    }

    /// Inserts one pattern into the trie
    fn insert(&mut self, pattern: &str) {
        if pattern.is_empty() {
            return;
        }
        let mut current = ROOT;
        for ch in pattern.chars() {
            current = match self.nodes[current].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[current].children.insert(ch, next);
                    next
                }
            };
        }
        self.nodes[current].output = Some(pattern.to_string());
    }

    /// Computes suffix links breadth-first and propagates outputs along them
    ///
    /// Root children link to the root. Every other node's link points at the
    /// child of its parent-link chain reachable by the same character, which
    /// is the deepest proper suffix present in the trie. Because parents are
    /// processed before children, a node with no pattern of its own can
    /// inherit the output of its suffix target in the same pass.
    fn build_links(&mut self) {
        let mut queue: std::collections::VecDeque<usize> = std::collections::VecDeque::new();
        let root_children: Vec<usize> = self.nodes[ROOT].children.values().copied().collect();
        for child in root_children {
            self.nodes[child].suffix = ROOT;
            queue.push_back(child);
        }

        while let Some(current) = queue.pop_front() {
            let children: Vec<(char, usize)> = self.nodes[current]
                .children
                .iter()
                .map(|(&ch, &idx)| (ch, idx))
                .collect();
            for (ch, child) in children {
                let mut probe = self.nodes[current].suffix;
                let suffix = loop {
                    if let Some(&target) = self.nodes[probe].children.get(&ch) {
                        break target;
                    }
                    if probe == ROOT {
                        break ROOT;
                    }
                    probe = self.nodes[probe].suffix;
                };
                self.nodes[child].suffix = suffix;
                if self.nodes[child].output.is_none() {
                    let inherited = self.nodes[suffix].output.clone();
                    self.nodes[child].output = inherited;
                }
                queue.push_back(child);
            }
        }
    }

    /// Searches the haystack for the first recognized pattern
    ///
    /// Walks the input character by character, falling back along suffix
    /// links on mismatch and re-attempting the transition after each
    /// fallback. Terminates at the first accepting state reached.
    ///
    /// # Arguments
    ///
    /// * `haystack` - The string to scan, typically a User-Agent header
    ///
    /// # Returns
    ///
    /// * `Some(pattern)` - The first pattern whose end is reached
    /// * `None` - The input was exhausted without a match
    pub fn find(&self, haystack: &str) -> Option<&str> {
        let mut current = ROOT;
        for ch in haystack.chars() {
            loop {
                if let Some(&next) = self.nodes[current].children.get(&ch) {
                    current = next;
                    break;
                }
                if current == ROOT {
                    break;
                }
                current = self.nodes[current].suffix;
            }
            if let Some(pattern) = &self.nodes[current].output {
                return Some(pattern.as_str());
            }
        }
        None
    }

    /// Returns true when the haystack contains any recognized pattern
    pub fn is_match(&self, haystack: &str) -> bool {
        self.find(haystack).is_some()
    }
}
