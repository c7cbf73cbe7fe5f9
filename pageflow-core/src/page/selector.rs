//! Minimal CSS selector engine.
//!
//! Supports the subset the landing page relies on: `*`, type selectors,
//! `#id`, `.class`, `[attr]`, `[attr="v"]`, `[attr^="v"]`, compound
//! selectors, descendant and `>` child combinators, and comma lists.

use std::fmt;

use thiserror::Error;

use super::{ElementId, Page};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{ch}' at offset {offset} in selector '{selector}'")]
    UnexpectedChar {
        ch: char,
        offset: usize,
        selector: String,
    },
    #[error("selector '{selector}' ends with a dangling combinator")]
    DanglingCombinator { selector: String },
    #[error("unterminated attribute selector in '{selector}'")]
    UnterminatedAttribute { selector: String },
    #[error("unterminated string in selector '{selector}'")]
    UnterminatedString { selector: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One comma-separated branch. `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

/// A parsed selector list.
#[derive(Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    branches: Vec<Complex>,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser {
            source: trimmed,
            chars: trimmed.char_indices().collect(),
            pos: 0,
        };
        let mut branches = vec![parser.complex()?];
        while parser.eat(',') {
            branches.push(parser.complex()?);
        }
        if let Some((offset, ch)) = parser.peek_indexed() {
            return Err(parser.unexpected(ch, offset));
        }
        Ok(Self {
            source: trimmed.to_string(),
            branches,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `id` matches any branch of this selector.
    pub fn matches(&self, page: &Page, id: ElementId) -> bool {
        self.branches.iter().any(|branch| {
            let last = branch.compounds.len() - 1;
            match_at(page, branch, id, last)
        })
    }
}

fn match_at(page: &Page, branch: &Complex, id: ElementId, index: usize) -> bool {
    let Some(element) = page.element(id) else {
        return false;
    };
    if !branch.compounds[index].matches(element) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match branch.combinators[index - 1] {
        Combinator::Child => page
            .parent(id)
            .is_some_and(|parent| match_at(page, branch, parent, index - 1)),
        Combinator::Descendant => {
            let mut cursor = page.parent(id);
            while let Some(ancestor) = cursor {
                if match_at(page, branch, ancestor, index - 1) {
                    return true;
                }
                cursor = page.parent(ancestor);
            }
            false
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
    }

    fn matches(&self, element: &super::Element) -> bool {
        if let Some(tag) = &self.tag
            && tag != "*"
            && !tag.eq_ignore_ascii_case(&element.tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.id.as_deref() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|class| element.classes.contains(class)) {
            return false;
        }
        self.attrs.iter().all(|attr| {
            let value = element.attribute(&attr.name);
            match (&attr.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(actual)) => actual == expected,
                (AttrOp::Prefix(prefix), Some(actual)) => {
                    !prefix.is_empty() && actual.starts_with(prefix.as_str())
                }
            }
        })
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, ch)| *ch)
    }

    fn peek_indexed(&self) -> Option<(usize, char)> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self, ch: char, offset: usize) -> SelectorError {
        SelectorError::UnexpectedChar {
            ch,
            offset,
            selector: self.source.to_string(),
        }
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    if matches!(self.peek(), None | Some(',')) {
                        return Err(SelectorError::DanglingCombinator {
                            selector: self.source.to_string(),
                        });
                    }
                    combinators.push(Combinator::Child);
                }
                Some(_) if had_ws => combinators.push(Combinator::Descendant),
                Some(ch) => {
                    let offset = self.chars[self.pos].0;
                    return Err(self.unexpected(ch, offset));
                }
            }
            compounds.push(self.compound()?);
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();

        if self.eat('*') {
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.required_ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    let class = self.required_ident()?;
                    compound.classes.push(class);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return match self.peek_indexed() {
                Some((offset, ch)) => Err(self.unexpected(ch, offset)),
                None => Err(SelectorError::DanglingCombinator {
                    selector: self.source.to_string(),
                }),
            };
        }
        Ok(compound)
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(ch) = self.peek().filter(|ch| is_ident_char(*ch)) {
            out.push(ch);
            self.pos += 1;
        }
        out
    }

    fn required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.ident();
        if ident.is_empty() {
            return Err(match self.peek_indexed() {
                Some((offset, ch)) => self.unexpected(ch, offset),
                None => SelectorError::DanglingCombinator {
                    selector: self.source.to_string(),
                },
            });
        }
        Ok(ident)
    }

    fn attribute(&mut self) -> Result<AttrMatch, SelectorError> {
        let source = self.source;
        let unterminated = move || SelectorError::UnterminatedAttribute {
            selector: source.to_string(),
        };

        self.skip_ws();
        let name = self.ident();
        if name.is_empty() {
            return Err(unterminated());
        }
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatch {
                    name,
                    op: AttrOp::Exists,
                });
            }
            Some('=') => {
                self.pos += 1;
                AttrOp::Equals(self.attribute_value()?)
            }
            Some('^') => {
                self.pos += 1;
                if !self.eat('=') {
                    return Err(unterminated());
                }
                AttrOp::Prefix(self.attribute_value()?)
            }
            _ => return Err(unterminated()),
        };

        self.skip_ws();
        if !self.eat(']') {
            return Err(unterminated());
        }
        Ok(AttrMatch { name, op })
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        self.skip_ws();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut out = String::new();
                loop {
                    match self.peek() {
                        Some(ch) if ch == quote => {
                            self.pos += 1;
                            return Ok(out);
                        }
                        Some(ch) => {
                            out.push(ch);
                            self.pos += 1;
                        }
                        None => {
                            return Err(SelectorError::UnterminatedString {
                                selector: self.source.to_string(),
                            });
                        }
                    }
                }
            }
            _ => Ok(self.ident()),
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}
