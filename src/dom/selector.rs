//! CSS selector subset used for template lookups and parent resolution.
//!
//! Supported: type (`div`), universal (`*`), id (`#x`), class (`.x`),
//! attribute presence/equality (`[role]`, `[role="bar"]`), compound
//! selectors, descendant and child (`>`) combinators, and selector lists (`,`).

use crate::dom::NodeId;
use crate::error::{Error, Result};

/// Read access to a tree, as needed for matching.
pub(crate) trait NodeView {
    fn tag_name(&self, node: NodeId) -> Option<&str>;
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList(Vec<Complex>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl SelectorList {
    pub(crate) fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser {
            input,
            chars: input.char_indices().peekable(),
        };
        let mut list = vec![parser.complex()?];
        while parser.eat(',') {
            list.push(parser.complex()?);
        }
        parser.skip_whitespace();
        if parser.chars.peek().is_some() {
            return Err(parser.error());
        }
        Ok(Self(list))
    }

    pub(crate) fn matches(&self, view: &impl NodeView, node: NodeId) -> bool {
        self.0.iter().any(|complex| complex.matches(view, node))
    }
}

impl Complex {
    fn matches(&self, view: &impl NodeView, node: NodeId) -> bool {
        self.matches_at(view, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, view: &impl NodeView, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(view, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => view
                .parent(node)
                .is_some_and(|parent| self.matches_at(view, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = view.parent(node);
                while let Some(current) = ancestor {
                    if self.matches_at(view, current, index - 1) {
                        return true;
                    }
                    ancestor = view.parent(current);
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
    }

    fn matches(&self, view: &impl NodeView, node: NodeId) -> bool {
        let Some(tag) = view.tag_name(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if expected != "*" && !expected.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if view.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| view.has_class(node, class)) {
            return false;
        }
        self.attributes.iter().all(|(name, expected)| {
            match (view.attribute(node, name), expected) {
                (Some(actual), Some(expected)) => &actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn complex(&mut self) -> Result<Complex> {
        self.skip_whitespace();
        let mut complex = Complex {
            compounds: vec![self.compound()?],
            combinators: Vec::new(),
        };

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.chars.next();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.error()),
            };
            complex.combinators.push(combinator);
            complex.compounds.push(self.compound()?);
        }

        Ok(complex)
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();

        loop {
            match self.peek() {
                Some('*') if compound.is_empty() => {
                    self.chars.next();
                    compound.tag = Some("*".to_string());
                }
                Some(c) if is_ident_char(c) && compound.is_empty() => {
                    compound.tag = Some(self.ident()?.to_ascii_lowercase());
                }
                Some('#') => {
                    self.chars.next();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(self.error());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<(String, Option<String>)> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        let value = if self.eat('=') {
            self.skip_whitespace();
            let value = match self.peek() {
                Some(quote @ ('"' | '\'')) => {
                    self.chars.next();
                    let mut value = String::new();
                    loop {
                        match self.chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => return Err(self.error()),
                        }
                    }
                    value
                }
                _ => self.ident()?,
            };
            self.skip_whitespace();
            Some(value)
        } else {
            None
        };

        if !self.eat(']') {
            return Err(self.error());
        }
        Ok((name, value))
    }

    fn ident(&mut self) -> Result<String> {
        let mut ident = String::new();
        while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
            ident.push(c);
            self.chars.next();
        }
        if ident.is_empty() {
            return Err(self.error());
        }
        Ok(ident)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.peek().is_some_and(char::is_whitespace) {
            self.chars.next();
            skipped = true;
        }
        skipped
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn error(&self) -> Error {
        Error::InvalidSelector(self.input.to_string())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
