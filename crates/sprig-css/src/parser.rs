//! Stylesheet parser.
//!
//! A cursor over the stylesheet text with one method per grammar
//! production. Every production either consumes input and succeeds or
//! fails with a [`ParseError`]; the two list productions ([`CssParser::body`]
//! and [`CssParser::parse`]) catch those errors and resynchronise at the
//! next delimiter, so one malformed declaration or rule never takes the
//! rest of the stylesheet down with it.

use std::collections::HashMap;

use thiserror::Error;

use crate::selector::Selector;

/// Property name to value, as written in a declaration block.
pub type Declarations = HashMap<String, String>;

/// A production failed at `position` (a character offset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at offset {position}")]
pub struct ParseError {
    /// Character offset where parsing stopped.
    pub position: usize,
    /// What the parser was looking for.
    pub expected: String,
}

/// One `selector { declarations }` rule. Immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Which elements the rule applies to.
    pub selector: Selector,
    /// The declarations the rule sets on matching elements.
    pub declarations: Declarations,
}

/// Cursor-based recursive-descent parser over stylesheet text.
pub struct CssParser {
    chars: Vec<char>,
    pos: usize,
}

impl CssParser {
    /// Create a parser positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    /// Current character offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, expected: impl Into<String>) -> ParseError {
        ParseError {
            position: self.pos,
            expected: expected.into(),
        }
    }

    /// Skip any run of whitespace.
    pub fn whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Consume a maximal run of alphanumerics and `#-.%`.
    ///
    /// # Errors
    ///
    /// Fails when no character was consumed.
    pub fn word(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || "#-.%".contains(c))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("a word"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Consume exactly `literal`.
    ///
    /// # Errors
    ///
    /// Fails when the next character is anything else (or input ended).
    pub fn literal(&mut self, literal: char) -> Result<(), ParseError> {
        if self.peek() != Some(literal) {
            return Err(self.error(format!("'{literal}'")));
        }
        self.pos += 1;
        Ok(())
    }

    /// `word ':' word`, with the property name case-folded.
    ///
    /// # Errors
    ///
    /// Propagates the first failing production.
    pub fn pair(&mut self) -> Result<(String, String), ParseError> {
        let property = self.word()?;
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok((property.to_lowercase(), value))
    }

    /// Advance to the next character in `stops` and return it, or `None`
    /// when the input runs out first.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.pos += 1;
        }
        None
    }

    /// A declaration list: `(pair ';')*`, ending at `}` or end of input.
    ///
    /// A malformed declaration is skipped up to the next `;`; if a `}` or
    /// the end of input comes first the body ends there. The trailing `;`
    /// of the last declaration is optional.
    pub fn body(&mut self) -> Declarations {
        let mut declarations = Declarations::new();
        while !self.at_end() && self.peek() != Some('}') {
            if self.declaration(&mut declarations).is_err() {
                if self.ignore_until(&[';', '}']) == Some(';') {
                    self.pos += 1;
                    self.whitespace();
                } else {
                    break;
                }
            }
        }
        declarations
    }

    /// One `pair ';'`. The pair is recorded before the `;` is checked.
    fn declaration(&mut self, declarations: &mut Declarations) -> Result<(), ParseError> {
        let (property, value) = self.pair()?;
        let _ = declarations.insert(property, value);
        self.whitespace();
        self.literal(';')?;
        self.whitespace();
        Ok(())
    }

    /// One tag name followed by any number of descendant tag names.
    ///
    /// `a b c` parses as `Descendant(Descendant(a, b), c)`. Stops at `{` or
    /// end of input.
    ///
    /// # Errors
    ///
    /// Fails when a selector part is not a word.
    pub fn selector(&mut self) -> Result<Selector, ParseError> {
        let mut out = Selector::tag(self.word()?.to_lowercase());
        self.whitespace();
        while !self.at_end() && self.peek() != Some('{') {
            let descendant = Selector::tag(self.word()?.to_lowercase());
            out = Selector::descendant(out, descendant);
            self.whitespace();
        }
        Ok(out)
    }

    /// A whole stylesheet: `(selector '{' body '}')*`.
    ///
    /// A malformed rule is discarded up to its closing `}`; if there is
    /// none the rest of the input is dropped.
    #[must_use]
    pub fn parse(mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        while !self.at_end() {
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    log::debug!("skipping malformed rule: {err}");
                    if self.ignore_until(&['}']).is_some() {
                        self.pos += 1;
                        self.whitespace();
                    } else {
                        break;
                    }
                }
            }
        }
        rules
    }

    fn rule(&mut self) -> Result<Rule, ParseError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.body();
        self.literal('}')?;
        self.whitespace();
        Ok(Rule {
            selector,
            declarations,
        })
    }
}

/// Parse stylesheet text into its rule list, in source order.
#[must_use]
pub fn parse_stylesheet(text: &str) -> Vec<Rule> {
    CssParser::new(text).parse()
}

/// Parse a bare declaration list, as found in a `style` attribute.
#[must_use]
pub fn parse_declarations(text: &str) -> Declarations {
    let mut parser = CssParser::new(text);
    parser.whitespace();
    parser.body()
}

/// Parse a standalone selector such as the argument of
/// `querySelectorAll`. Surrounding whitespace is allowed; anything else
/// left over is an error.
///
/// # Errors
///
/// Returns a [`ParseError`] when the text is not a tag or descendant
/// selector.
pub fn parse_selector(text: &str) -> Result<Selector, ParseError> {
    let mut parser = CssParser::new(text);
    parser.whitespace();
    let selector = parser.selector()?;
    if !parser.at_end() {
        return Err(parser.error("end of selector"));
    }
    Ok(selector)
}
