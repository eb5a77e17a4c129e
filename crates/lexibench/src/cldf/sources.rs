//! Bibliographic sources and citations.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LexibenchError, Result};

// Citation syntax: `sourceID` or `sourceID[context]`.
static REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<id>[^\[\]]+?)\s*(?:\[(?P<context>.*)\])?\s*$").unwrap());

/// Split a citation into source id and context.
///
/// A bare id has an empty context.
///
/// ```
/// use lexibench::cldf::parse_reference;
///
/// let (id, context) = parse_reference("Smith2001[12-15]").unwrap();
/// assert_eq!((id.as_str(), context.as_str()), ("Smith2001", "12-15"));
/// assert_eq!(parse_reference("Jones1999").unwrap().1, "");
/// ```
pub fn parse_reference(reference: &str) -> Result<(String, String)> {
    let captures = REFERENCE.captures(reference).ok_or_else(|| {
        LexibenchError::InvalidInput(format!("invalid source reference: {:?}", reference))
    })?;
    let id = captures.name("id").map(|m| m.as_str()).unwrap_or_default();
    let context = captures
        .name("context")
        .map(|m| m.as_str())
        .unwrap_or_default();
    Ok((id.to_string(), context.to_string()))
}

/// A bibliographic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    /// BibTeX entry type (`book`, `article`, ...).
    pub genre: String,
    /// Fields with lowercase names, in entry order.
    pub fields: IndexMap<String, String>,
}

impl Source {
    /// Create a source without fields.
    pub fn new(id: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            genre: genre.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_lowercase(), value.into());
        self
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Parse the entries of a BibTeX file.
///
/// `@comment`, `@preamble` and `@string` blocks are skipped. Field values may
/// be braced, quoted or bare; nested braces are kept as written.
pub fn parse_bibtex(text: &str) -> Result<Vec<Source>> {
    let mut parser = BibParser {
        chars: text.chars().collect(),
        pos: 0,
    };
    let mut sources = Vec::new();
    while parser.seek('@') {
        let genre = parser.take_while(|c| c.is_alphanumeric() || c == '_').to_lowercase();
        parser.skip_whitespace();
        let Some(close) = parser.open_delimiter() else {
            continue;
        };
        if matches!(genre.as_str(), "comment" | "preamble" | "string") {
            parser.skip_block(close);
            continue;
        }
        sources.push(parser.entry(genre, close)?);
    }
    Ok(sources)
}

struct BibParser {
    chars: Vec<char>,
    pos: usize,
}

impl BibParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn seek(&mut self, target: char) -> bool {
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == target {
                return true;
            }
        }
        false
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn open_delimiter(&mut self) -> Option<char> {
        let close = match self.peek()? {
            '{' => '}',
            '(' => ')',
            _ => return None,
        };
        self.pos += 1;
        Some(close)
    }

    fn skip_block(&mut self, close: char) {
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == close && depth == 0 => return,
                _ => {}
            }
        }
    }

    fn entry(&mut self, genre: String, close: char) -> Result<Source> {
        self.skip_whitespace();
        let id = self.take_while(|c| c != ',' && c != close && !c.is_whitespace());
        if id.is_empty() {
            return Err(LexibenchError::InvalidInput(format!(
                "BibTeX @{} entry without key",
                genre
            )));
        }
        let mut source = Source::new(id, genre);
        loop {
            self.take_while(|c| c.is_whitespace() || c == ',');
            match self.peek() {
                None => {
                    return Err(LexibenchError::InvalidInput(format!(
                        "unterminated BibTeX entry {}",
                        source.id
                    )));
                }
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(source);
                }
                Some(_) => {}
            }
            let name = self
                .take_while(|c| c != '=' && c != ',' && c != close)
                .trim()
                .to_lowercase();
            if self.peek() != Some('=') {
                continue;
            }
            self.pos += 1;
            self.skip_whitespace();
            let value = self.value(close)?;
            if !name.is_empty() {
                source.fields.insert(name, value);
            }
        }
    }

    fn value(&mut self, close: char) -> Result<String> {
        match self.peek() {
            Some('{') => {
                self.pos += 1;
                self.delimited('}')
            }
            Some('"') => {
                self.pos += 1;
                self.delimited('"')
            }
            _ => Ok(self
                .take_while(|c| c != ',' && c != close)
                .trim()
                .to_string()),
        }
    }

    fn delimited(&mut self, end: char) -> Result<String> {
        let mut depth = 0usize;
        let mut value = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '{' => depth += 1,
                '}' if depth > 0 => depth -= 1,
                c if c == end && depth == 0 => return Ok(value),
                _ => {}
            }
            value.push(c);
        }
        Err(LexibenchError::InvalidInput(
            "unterminated BibTeX field value".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference() {
        assert_eq!(
            parse_reference("Smith2001[12-15]").unwrap(),
            ("Smith2001".to_string(), "12-15".to_string())
        );
        assert_eq!(
            parse_reference(" Jones1999 ").unwrap(),
            ("Jones1999".to_string(), String::new())
        );
        assert_eq!(
            parse_reference("Doe2010[p. 4[a]]").unwrap().1,
            "p. 4[a]"
        );
        assert!(parse_reference("").is_err());
        assert!(parse_reference("[12]").is_err());
    }

    #[test]
    fn test_parse_bibtex() {
        let text = r#"
@comment{ignored, entirely}
@book{Smith2001,
  author = {Smith, John},
  title = "A {Grammar} of Things",
  year = 2001,
}
@Article(Jones1999, journal={Lingua}, pages={1--10})
"#;
        let sources = parse_bibtex(text).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].id, "Smith2001");
        assert_eq!(sources[0].genre, "book");
        assert_eq!(sources[0].get("author"), Some("Smith, John"));
        assert_eq!(sources[0].get("title"), Some("A {Grammar} of Things"));
        assert_eq!(sources[0].get("year"), Some("2001"));
        assert_eq!(sources[1].genre, "article");
        assert_eq!(sources[1].get("pages"), Some("1--10"));
    }

    #[test]
    fn test_unterminated_entry() {
        assert!(parse_bibtex("@book{Smith2001, title = {Open").is_err());
    }
}
