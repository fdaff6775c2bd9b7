//! Well-known-text reference descriptor parsing.
//!
//! A descriptor is a tree of nodes of the form `KEYWORD[value, value, ...]`
//! where each value is a quoted string, a number, a bare identifier
//! (`NORTH`, `EAST`) or another node. Both `[]` and `()` delimiters are
//! accepted, as long as each node closes with the delimiter it opened with.
//!
//! WKT2 keywords are mapped onto their WKT1 equivalents for lookups (see
//! [`canonical_keyword`]), while the original spelling is kept for
//! serialisation.

use std::fmt;
use thiserror::Error;

/// Nesting limit; real descriptors stay well below ten levels.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WktError {
    #[error("Empty descriptor")]
    Empty,

    #[error("Unexpected end of descriptor")]
    UnexpectedEnd,

    #[error("Unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("Expected a keyword at offset {pos}")]
    ExpectedKeyword { pos: usize },

    #[error("Invalid number '{text}' at offset {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("Trailing characters after descriptor at offset {pos}")]
    TrailingCharacters { pos: usize },

    #[error("Descriptor nested too deeply")]
    TooDeep,
}

/// A single value inside a node.
#[derive(Debug, Clone, PartialEq)]
pub enum WktValue {
    Text(String),
    Number(f64),
    Keyword(String),
    Node(WktNode),
}

/// A parsed descriptor node.
#[derive(Debug, Clone, PartialEq)]
pub struct WktNode {
    keyword: String,
    values: Vec<WktValue>,
}

/// Map WKT2 spellings onto the WKT1 keyword used for lookups.
pub fn canonical_keyword(keyword: &str) -> &str {
    match keyword {
        "GEOGCRS" | "GEODCRS" | "BASEGEOGCRS" | "BASEGEODCRS" | "GEOGRAPHICCRS" => "GEOGCS",
        "PROJCRS" | "PROJECTEDCRS" => "PROJCS",
        "ELLIPSOID" => "SPHEROID",
        "ID" => "AUTHORITY",
        "METHOD" => "PROJECTION",
        "GEODETICDATUM" | "TRF" => "DATUM",
        "LENGTHUNIT" | "ANGLEUNIT" => "UNIT",
        "PRIMEMERIDIAN" => "PRIMEM",
        other => other,
    }
}

impl WktNode {
    pub fn new(keyword: impl Into<String>, values: Vec<WktValue>) -> Self {
        Self {
            keyword: keyword.into().to_ascii_uppercase(),
            values,
        }
    }

    /// Parse a complete descriptor. Anything after the root node other than
    /// whitespace is an error.
    pub fn parse(input: &str) -> Result<WktNode, WktError> {
        let mut parser = Parser::new(input);
        parser.skip_whitespace();
        if parser.peek().is_none() {
            return Err(WktError::Empty);
        }

        let keyword = parser.read_keyword()?;
        let node = parser.parse_node_body(keyword, 0)?;

        parser.skip_whitespace();
        if parser.peek().is_some() {
            return Err(WktError::TrailingCharacters { pos: parser.pos });
        }
        Ok(node)
    }

    /// Keyword as written (upper-cased).
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Keyword after WKT2 → WKT1 mapping.
    pub fn canonical(&self) -> &str {
        canonical_keyword(&self.keyword)
    }

    pub fn is(&self, keyword: &str) -> bool {
        self.canonical() == keyword
    }

    pub fn values(&self) -> &[WktValue] {
        &self.values
    }

    /// The first quoted string, which WKT uses as the node name.
    pub fn name(&self) -> Option<&str> {
        self.values.iter().find_map(|v| match v {
            WktValue::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Scalar values (numbers and quoted strings) rendered as text, in order.
    ///
    /// WKT1 quotes authority codes while WKT2 writes them as bare numbers;
    /// this gives both the same shape.
    pub fn scalars(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(|v| match v {
                WktValue::Text(s) => Some(s.clone()),
                WktValue::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }

    pub fn numbers(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|v| match v {
                WktValue::Number(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn number(&self, index: usize) -> Option<f64> {
        self.numbers().get(index).copied()
    }

    /// Direct child nodes.
    pub fn children(&self) -> impl Iterator<Item = &WktNode> {
        self.values.iter().filter_map(|v| match v {
            WktValue::Node(n) => Some(n),
            _ => None,
        })
    }

    /// First direct child with the given (canonical) keyword.
    pub fn child(&self, keyword: &str) -> Option<&WktNode> {
        self.children().find(|n| n.is(keyword))
    }

    /// Depth-first search for the first descendant (or self) with the keyword.
    pub fn find(&self, keyword: &str) -> Option<&WktNode> {
        if self.is(keyword) {
            return Some(self);
        }
        self.children().find_map(|n| n.find(keyword))
    }

    /// All descendants with the keyword, in document order.
    pub fn find_all<'a>(&'a self, keyword: &str, out: &mut Vec<&'a WktNode>) {
        if self.is(keyword) {
            out.push(self);
        }
        for child in self.children() {
            child.find_all(keyword, out);
        }
    }

    /// Walk a `|`-separated path starting at this node, e.g.
    /// `"PROJCS|GEOGCS|DATUM"`. The first segment must name this node.
    pub fn get_node(&self, path: &str) -> Option<&WktNode> {
        let mut segments = path.split('|');
        let first = segments.next()?;
        if !self.is(first) {
            return None;
        }
        segments.try_fold(self, |node, segment| node.child(segment))
    }

    /// Serialise back to single-line WKT with square brackets.
    pub fn to_wkt(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WktNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.keyword)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match value {
                WktValue::Text(s) => write!(f, "\"{}\"", s.replace('"', "\"\""))?,
                WktValue::Number(n) => write!(f, "{}", n)?,
                WktValue::Keyword(k) => f.write_str(k)?,
                WktValue::Node(n) => write!(f, "{}", n)?,
            }
        }
        f.write_str("]")
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn read_keyword(&mut self) -> Result<String, WktError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        if start == self.pos {
            return match self.peek() {
                Some(_) => Err(WktError::ExpectedKeyword { pos: start }),
                None => Err(WktError::UnexpectedEnd),
            };
        }
        Ok(self.src[start..self.pos].to_string())
    }

    /// Parse `[values]` or `(values)` following an already-read keyword.
    fn parse_node_body(&mut self, keyword: String, depth: usize) -> Result<WktNode, WktError> {
        if depth >= MAX_DEPTH {
            return Err(WktError::TooDeep);
        }

        self.skip_whitespace();
        let close = match self.bump() {
            Some('[') => ']',
            Some('(') => ')',
            Some(ch) => {
                return Err(WktError::UnexpectedChar {
                    ch,
                    pos: self.pos - ch.len_utf8(),
                })
            }
            None => return Err(WktError::UnexpectedEnd),
        };

        let mut values = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(close) {
            self.bump();
            return Ok(WktNode::new(keyword, values));
        }

        loop {
            self.skip_whitespace();
            values.push(self.parse_value(depth)?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(ch) if ch == close => break,
                Some(ch) => {
                    return Err(WktError::UnexpectedChar {
                        ch,
                        pos: self.pos - ch.len_utf8(),
                    })
                }
                None => return Err(WktError::UnexpectedEnd),
            }
        }

        Ok(WktNode::new(keyword, values))
    }

    fn parse_value(&mut self, depth: usize) -> Result<WktValue, WktError> {
        match self.peek() {
            Some('"') => self.parse_text().map(WktValue::Text),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number().map(WktValue::Number)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.read_keyword()?;
                self.skip_whitespace();
                match self.peek() {
                    Some('[') | Some('(') => {
                        self.parse_node_body(word, depth + 1).map(WktValue::Node)
                    }
                    _ => Ok(WktValue::Keyword(word)),
                }
            }
            Some(ch) => Err(WktError::UnexpectedChar { ch, pos: self.pos }),
            None => Err(WktError::UnexpectedEnd),
        }
    }

    fn parse_text(&mut self) -> Result<String, WktError> {
        // opening quote
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => {
                    if self.peek() == Some('"') {
                        self.bump();
                        text.push('"');
                    } else {
                        return Ok(text);
                    }
                }
                Some(ch) => text.push(ch),
                None => return Err(WktError::UnexpectedEnd),
            }
        }
    }

    fn parse_number(&mut self) -> Result<f64, WktError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')
        ) {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        text.parse().map_err(|_| WktError::InvalidNumber {
            text: text.to_string(),
            pos: start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433],AUTHORITY["EPSG","4326"]]"#;

    #[test]
    fn test_parse_tree() {
        let root = WktNode::parse(WGS84).unwrap();
        assert_eq!(root.keyword(), "GEOGCS");
        assert_eq!(root.name(), Some("WGS 84"));

        let spheroid = root.get_node("GEOGCS|DATUM|SPHEROID").unwrap();
        assert_eq!(spheroid.numbers(), vec![6378137.0, 298.257223563]);

        let authority = root.child("AUTHORITY").unwrap();
        assert_eq!(authority.scalars(), vec!["EPSG", "4326"]);
    }

    #[test]
    fn test_parentheses_and_whitespace() {
        let root = WktNode::parse("  GEOGCS ( \"x\" , UNIT ( \"degree\" , 0.0174 ) )  ").unwrap();
        assert_eq!(root.child("UNIT").unwrap().number(0), Some(0.0174));
    }

    #[test]
    fn test_mismatched_delimiters() {
        let err = WktNode::parse("GEOGCS[\"x\")").unwrap_err();
        assert!(matches!(err, WktError::UnexpectedChar { ch: ')', .. }));
    }

    #[test]
    fn test_bare_identifiers() {
        let root = WktNode::parse(r#"AXIS["Easting",EAST]"#).unwrap();
        assert_eq!(root.values()[1], WktValue::Keyword("EAST".to_string()));
    }

    #[test]
    fn test_escaped_quotes_round_trip() {
        let root = WktNode::parse(r#"LOCAL_CS["say ""hi"""]"#).unwrap();
        assert_eq!(root.name(), Some(r#"say "hi""#));
        let again = WktNode::parse(&root.to_wkt()).unwrap();
        assert_eq!(again, root);
    }

    #[test]
    fn test_serialisation_round_trip() {
        let root = WktNode::parse(WGS84).unwrap();
        assert_eq!(root.to_wkt(), WGS84);
    }

    #[test]
    fn test_errors() {
        assert_eq!(WktNode::parse(""), Err(WktError::Empty));
        assert_eq!(WktNode::parse("   "), Err(WktError::Empty));
        assert_eq!(WktNode::parse("GEOGCS["), Err(WktError::UnexpectedEnd));
        assert!(matches!(
            WktNode::parse("EPSG:4326"),
            Err(WktError::UnexpectedChar { ch: ':', .. })
        ));
        assert!(matches!(
            WktNode::parse("GEOGCS[\"x\"] tail"),
            Err(WktError::TrailingCharacters { .. })
        ));
        assert!(matches!(
            WktNode::parse("UNIT[\"m\",1.2.3]"),
            Err(WktError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "A[".repeat(200), "]".repeat(200));
        assert_eq!(WktNode::parse(&deep), Err(WktError::TooDeep));
    }

    #[test]
    fn test_wkt2_aliases() {
        let root = WktNode::parse(
            r#"GEOGCRS["WGS 84",DATUM["World Geodetic System 1984",ELLIPSOID["WGS 84",6378137,298.257223563]],ID["EPSG",4326]]"#,
        )
        .unwrap();
        assert!(root.is("GEOGCS"));
        assert!(root.find("SPHEROID").is_some());
        assert_eq!(root.child("AUTHORITY").unwrap().scalars(), vec!["EPSG", "4326"]);
    }
}
