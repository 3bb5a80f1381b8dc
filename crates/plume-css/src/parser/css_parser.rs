//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//! Rules are consumed into component values first; selectors and declaration
//! values are then parsed from those component values.

use serde::Serialize;

use crate::selector::{Selector, parse_selector_list};
use crate::tokenizer::{CSSToken, TokenError, tokenize};
use crate::values::{CssValue, parse_css_value};

use super::error::{DeclarationParseError, ParseError, RuleParseError};

/// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
///
/// A component value in a prelude or block.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments, whitespace removed.
        value: Vec<ComponentValue>,
    },
    /// A simple block.
    Block {
        /// The opening token character.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Token(CSSToken::Whitespace))
    }

    const fn is_semicolon(&self) -> bool {
        matches!(self, Self::Token(CSSToken::Semicolon))
    }

    fn describe(&self) -> String {
        match self {
            Self::Token(token) => format!("'{token}'"),
            Self::Function { name, .. } => format!("function {name}()"),
            Self::Block { token, .. } => format!("'{token}' block"),
        }
    }
}

/// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlock {
    /// The opening token character: `{`, `[` or `(`.
    pub token: char,
    /// The block contents.
    pub value: Vec<ComponentValue>,
}

/// A declaration such as `color: red !important`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// The property name, ASCII-lowercased.
    pub name: String,
    /// The parsed values. Never empty.
    pub values: Vec<CssValue>,
    /// Whether the declaration ended with `!important`.
    pub important: bool,
}

/// A style rule: a selector list and its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Selectors sorted by specificity, highest first.
    pub selectors: Vec<Selector>,
    /// The declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude component values.
    pub prelude: Vec<ComponentValue>,
    /// The block, absent for the `;`-terminated statement form.
    pub block: Option<SimpleBlock>,
}

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// Style rules in source order.
    pub rules: Vec<Rule>,
    /// At-rules in source order. They are kept but not interpreted.
    pub at_rules: Vec<AtRule>,
    /// Cascade origin supplied by the caller.
    pub origin: u32,
}

/// Parse CSS text into a stylesheet tagged with `origin`.
///
/// Rules and declarations that fail to parse are dropped.
///
/// # Errors
///
/// Returns a [`TokenError`] when the text cannot be tokenized at all.
pub fn parse_stylesheet(text: &str, origin: u32) -> Result<Stylesheet, TokenError> {
    let (stylesheet, errors) = parse_stylesheet_with_errors(text, origin)?;
    for error in &errors {
        log::debug!("dropped: {error}");
    }
    Ok(stylesheet)
}

/// Like [`parse_stylesheet`] but also returns every recoverable error.
///
/// # Errors
///
/// Returns a [`TokenError`] when the text cannot be tokenized at all.
pub fn parse_stylesheet_with_errors(
    text: &str,
    origin: u32,
) -> Result<(Stylesheet, Vec<ParseError>), TokenError> {
    let mut parser = CSSParser::new(tokenize(text)?);
    let stylesheet = parser.parse_stylesheet(origin);
    Ok((stylesheet, parser.into_errors()))
}

/// Parse the contents of a `style` attribute.
///
/// # Errors
///
/// Returns a [`TokenError`] when the text cannot be tokenized at all.
pub fn parse_declaration_list(text: &str) -> Result<Vec<Declaration>, TokenError> {
    let mut parser = CSSParser::new(tokenize(text)?);
    let declarations = parser.parse_declaration_list();
    for error in &parser.errors {
        log::debug!("dropped: {error}");
    }
    Ok(declarations)
}

/// CSS parser over a token stream.
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
    errors: Vec<ParseError>,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
            errors: Vec::new(),
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self, origin: u32) -> Stylesheet {
        let mut stylesheet = Stylesheet {
            origin,
            ..Stylesheet::default()
        };
        self.consume_list_of_rules(&mut stylesheet);
        stylesheet
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        let mut values = Vec::new();
        while let Some(value) = self.consume_component_value() {
            values.push(value);
        }
        consume_declaration_list(&values, &mut self.errors)
    }

    /// Errors collected so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consume the parser, returning its collected errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    /// with the top-level flag set.
    fn consume_list_of_rules(&mut self, stylesheet: &mut Stylesheet) {
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => return,
                Some(CSSToken::Whitespace | CSSToken::CDO | CSSToken::CDC) => self.advance(),
                Some(CSSToken::AtKeyword(_)) => match self.consume_at_rule() {
                    Ok(at_rule) => stylesheet.at_rules.push(at_rule),
                    Err(error) => self.errors.push(error.into()),
                },
                Some(_) => match self.consume_qualified_rule() {
                    Ok(rule) => stylesheet.rules.push(rule),
                    Err(error) => self.errors.push(error.into()),
                },
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Result<AtRule, RuleParseError> {
        let name = match self.consume() {
            Some(CSSToken::AtKeyword(name)) => name.clone(),
            _ => String::new(),
        };
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                Some(CSSToken::Semicolon) => {
                    self.advance();
                    return Ok(AtRule {
                        name,
                        prelude,
                        block: None,
                    });
                }
                None | Some(CSSToken::EOF) => {
                    return Err(RuleParseError::UnterminatedAtRule { name });
                }
                Some(CSSToken::LeftBrace) => {
                    let block = self.consume_simple_block();
                    return Ok(AtRule {
                        name,
                        prelude,
                        block: Some(block),
                    });
                }
                Some(_) => {
                    if let Some(value) = self.consume_component_value() {
                        prelude.push(value);
                    }
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Result<Rule, RuleParseError> {
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "This is a parse error. Return nothing."
                None | Some(CSSToken::EOF) => return Err(RuleParseError::MissingBlock),
                Some(CSSToken::LeftBrace) => {
                    let block = self.consume_simple_block();
                    let mut selectors = parse_selector_list(&prelude)?;
                    selectors.sort_by(|a, b| b.specificity().cmp(&a.specificity()));
                    let declarations = consume_declaration_list(&block.value, &mut self.errors);
                    return Ok(Rule {
                        selectors,
                        declarations,
                    });
                }
                Some(_) => {
                    if let Some(value) = self.consume_component_value() {
                        prelude.push(value);
                    }
                }
            }
        }
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(&mut self) -> SimpleBlock {
        let (token, ending) = match self.consume() {
            Some(CSSToken::LeftBracket) => ('[', CSSToken::RightBracket),
            Some(CSSToken::LeftParen) => ('(', CSSToken::RightParen),
            _ => ('{', CSSToken::RightBrace),
        };
        let mut value = Vec::new();

        loop {
            match self.peek() {
                Some(next) if *next == ending => {
                    self.advance();
                    break;
                }
                None | Some(CSSToken::EOF) => break,
                Some(_) => {
                    if let Some(v) = self.consume_component_value() {
                        value.push(v);
                    }
                }
            }
        }

        SimpleBlock { token, value }
    }

    /// [§ 5.4.9 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    fn consume_function(&mut self, name: String) -> ComponentValue {
        let mut value = Vec::new();
        loop {
            match self.peek() {
                Some(CSSToken::RightParen) => {
                    self.advance();
                    break;
                }
                None | Some(CSSToken::EOF) => break,
                Some(CSSToken::Whitespace) => self.advance(),
                Some(_) => {
                    if let Some(v) = self.consume_component_value() {
                        value.push(v);
                    }
                }
            }
        }
        ComponentValue::Function { name, value }
    }

    /// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        match self.peek()? {
            CSSToken::EOF => None,
            CSSToken::LeftBrace | CSSToken::LeftBracket | CSSToken::LeftParen => {
                let SimpleBlock { token, value } = self.consume_simple_block();
                Some(ComponentValue::Block { token, value })
            }
            CSSToken::Function(name) => {
                let name = name.clone();
                self.advance();
                Some(self.consume_function(name))
            }
            _ => self.consume().cloned().map(ComponentValue::Token),
        }
    }

    fn consume(&mut self) -> Option<&CSSToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.position)
    }
}

/// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
///
/// Runs over a block's already-consumed contents. Each failed declaration is
/// recorded in `errors` and skipped up to the next `;`.
fn consume_declaration_list(
    items: &[ComponentValue],
    errors: &mut Vec<ParseError>,
) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    let mut i = 0;

    while let Some(item) = items.get(i) {
        match item {
            ComponentValue::Token(CSSToken::Whitespace | CSSToken::Semicolon) => i += 1,
            ComponentValue::Token(CSSToken::Ident(name)) => {
                let end = items[i..]
                    .iter()
                    .position(ComponentValue::is_semicolon)
                    .map_or(items.len(), |offset| i + offset);
                match consume_declaration(name, &items[i + 1..end]) {
                    Ok(declaration) => declarations.push(declaration),
                    Err(error) => errors.push(error.into()),
                }
                i = end;
            }
            other => {
                // "This is a parse error." Throw away everything up to the next `;`.
                errors.push(
                    DeclarationParseError::ExpectedName {
                        found: other.describe(),
                    }
                    .into(),
                );
                i = items[i..]
                    .iter()
                    .position(ComponentValue::is_semicolon)
                    .map_or(items.len(), |offset| i + offset);
            }
        }
    }

    declarations
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// `rest` is everything after the property name up to the terminating `;`.
fn consume_declaration(
    name: &str,
    rest: &[ComponentValue],
) -> Result<Declaration, DeclarationParseError> {
    let name = name.to_ascii_lowercase();
    let rest = trim_start(rest);

    let Some((ComponentValue::Token(CSSToken::Colon), value)) = rest.split_first() else {
        return Err(DeclarationParseError::MissingColon { name });
    };

    let (value, important) = strip_important(trim_end(trim_start(value)));
    let values = parse_css_value(value);
    if values.is_empty() {
        return Err(DeclarationParseError::EmptyValue { name });
    }

    Ok(Declaration {
        name,
        values,
        important,
    })
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e. if the
/// last two (non-whitespace, non-comment) tokens in its value are a
/// `<delim-token>` with the value "!" followed by an `<ident-token>` with a
/// value that is an ASCII case-insensitive match for "important"."
///
/// Returns the value with the annotation and surrounding whitespace removed.
fn strip_important(value: &[ComponentValue]) -> (&[ComponentValue], bool) {
    let Some((ComponentValue::Token(CSSToken::Ident(last)), before)) = value.split_last() else {
        return (value, false);
    };
    if !last.eq_ignore_ascii_case("important") {
        return (value, false);
    }
    match trim_end(before).split_last() {
        Some((ComponentValue::Token(CSSToken::Delim('!')), remaining)) => {
            (trim_end(remaining), true)
        }
        _ => (value, false),
    }
}

fn trim_start(values: &[ComponentValue]) -> &[ComponentValue] {
    let start = values
        .iter()
        .position(|v| !v.is_whitespace())
        .unwrap_or(values.len());
    &values[start..]
}

fn trim_end(values: &[ComponentValue]) -> &[ComponentValue] {
    let end = values
        .iter()
        .rposition(|v| !v.is_whitespace())
        .map_or(0, |last| last + 1);
    &values[..end]
}
