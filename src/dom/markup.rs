//! Minimal markup fragment parser.
//!
//! Understands elements, quoted/unquoted/bare attributes, self-closing tags,
//! void elements and comments. Text content is skipped: the bar templates are
//! purely structural.

use crate::error::{Error, Result};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A parsed element with its attributes and element children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ElementSpec {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<ElementSpec>,
}

/// Parses `input` into a list of top-level elements.
pub(crate) fn parse_fragment(input: &str) -> Result<Vec<ElementSpec>> {
    Parser { input, pos: 0 }.parse()
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse(mut self) -> Result<Vec<ElementSpec>> {
        // The bottom entry collects the top-level elements.
        let mut stack = vec![ElementSpec::default()];

        while let Some(offset) = self.rest().find('<') {
            self.pos += offset;

            if self.rest().starts_with("<!--") {
                let end = self
                    .rest()
                    .find("-->")
                    .ok_or_else(|| self.error("unterminated comment"))?;
                self.pos += end + 3;
            } else if self.rest().starts_with("</") {
                self.pos += 2;
                let name = self.ident().to_ascii_lowercase();
                self.skip_whitespace();
                self.expect('>')?;

                if stack.len() == 1 {
                    return Err(self.error(&format!("unexpected closing tag </{}>", name)));
                }
                let element = stack.pop().unwrap_or_default();
                if element.tag != name {
                    return Err(self.error(&format!(
                        "closing tag </{}> does not match <{}>",
                        name, element.tag
                    )));
                }
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            } else {
                self.pos += 1;
                let (element, self_closing) = self.open_tag()?;
                if self_closing || VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                } else {
                    stack.push(element);
                }
            }
        }

        if stack.len() > 1 {
            let open = stack.last().map(|e| e.tag.clone()).unwrap_or_default();
            return Err(self.error(&format!("unclosed tag <{}>", open)));
        }
        Ok(stack.pop().map(|root| root.children).unwrap_or_default())
    }

    /// Parses the inside of `<tag ...>` after the opening bracket.
    fn open_tag(&mut self) -> Result<(ElementSpec, bool)> {
        let tag = self.ident().to_ascii_lowercase();
        if tag.is_empty() {
            return Err(self.error("expected a tag name"));
        }
        let mut element = ElementSpec {
            tag,
            ..Default::default()
        };

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(&format!("unterminated tag <{}>", element.tag))),
                Some('>') => {
                    self.pos += 1;
                    return Ok((element, false));
                }
                Some('/') => {
                    self.pos += 1;
                    self.expect('>')?;
                    return Ok((element, true));
                }
                Some(_) => {
                    let name = self.attribute_name().to_ascii_lowercase();
                    if name.is_empty() {
                        return Err(self.error("expected an attribute name"));
                    }
                    self.skip_whitespace();
                    let value = if self.peek() == Some('=') {
                        self.pos += 1;
                        self.skip_whitespace();
                        self.attribute_value()?
                    } else {
                        String::new()
                    };
                    element.attributes.push((name, value));
                }
            }
        }
    }

    fn attribute_value(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let end = self
                    .rest()
                    .find(quote)
                    .ok_or_else(|| self.error("unterminated attribute value"))?;
                let value = self.rest()[..end].to_string();
                self.pos += end + 1;
                Ok(value)
            }
            _ => {
                let end = self
                    .rest()
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(self.rest().len());
                let value = self.rest()[..end].to_string();
                self.pos += end;
                Ok(value)
            }
        }
    }

    fn ident(&mut self) -> &'a str {
        self.take_while(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn attribute_name(&mut self) -> &'a str {
        self.take_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\''))
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let rest = &input[self.pos..];
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c)))
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn error(&self, message: &str) -> Error {
        Error::InvalidMarkup(format!("{} at offset {}", message, self.pos))
    }
}
