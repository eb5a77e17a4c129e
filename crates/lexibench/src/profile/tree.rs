//! Character trie for greedy longest-match segmentation.

use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct Node {
    children: HashMap<char, usize>,
    terminal: bool,
}

/// A token produced by [`Tree::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A grapheme of the tree, borrowed from the parsed input.
    Grapheme(&'a str),
    /// A character no grapheme matches.
    Unmatched(char),
}

impl Token<'_> {
    /// Render unmatched characters as `<c>`.
    pub fn render(&self) -> String {
        match self {
            Token::Grapheme(g) => (*g).to_string(),
            Token::Unmatched(c) => error_token(*c),
        }
    }
}

/// Error-marker notation for characters no grapheme matches.
pub fn error_token(c: char) -> String {
    format!("<{}>", c)
}

/// An arena-allocated trie over a set of graphemes.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Build a tree from graphemes. Empty strings are ignored.
    pub fn new<'a>(graphemes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tree = Self {
            nodes: vec![Node::default()],
        };
        for grapheme in graphemes {
            tree.insert(grapheme);
        }
        tree
    }

    fn insert(&mut self, grapheme: &str) {
        if grapheme.is_empty() {
            return;
        }
        let mut node_idx = 0;
        for c in grapheme.chars() {
            let next_idx = match self.nodes[node_idx].children.get(&c) {
                Some(&idx) => idx,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node_idx].children.insert(c, idx);
                    idx
                }
            };
            node_idx = next_idx;
        }
        self.nodes[node_idx].terminal = true;
    }

    /// Byte length of the longest grapheme that is a prefix of `text`.
    pub fn longest_match(&self, text: &str) -> Option<usize> {
        let mut node_idx = 0;
        let mut best = None;
        for (offset, c) in text.char_indices() {
            match self.nodes[node_idx].children.get(&c) {
                Some(&idx) => {
                    node_idx = idx;
                    if self.nodes[node_idx].terminal {
                        best = Some(offset + c.len_utf8());
                    }
                }
                None => break,
            }
        }
        best
    }

    /// Split `text` into graphemes, always taking the longest match.
    ///
    /// Characters that start no match become [`Token::Unmatched`] and parsing
    /// resumes at the next character.
    pub fn parse<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            match self.longest_match(rest) {
                Some(len) => {
                    tokens.push(Token::Grapheme(&rest[..len]));
                    rest = &rest[len..];
                }
                None => {
                    tokens.push(Token::Unmatched(c));
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        tokens
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
