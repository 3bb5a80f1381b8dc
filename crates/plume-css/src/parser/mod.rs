//! CSS Parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).

pub mod css_parser;
pub mod error;

pub use css_parser::{
    AtRule, CSSParser, ComponentValue, Declaration, Rule, SimpleBlock, Stylesheet,
    parse_declaration_list, parse_stylesheet, parse_stylesheet_with_errors,
};
pub use error::{DeclarationParseError, ParseError, RuleParseError};
