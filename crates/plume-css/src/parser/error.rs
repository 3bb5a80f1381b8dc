//! Recoverable parse errors.
//!
//! None of these abort a stylesheet parse. A failed rule or declaration is
//! dropped and the parser moves on to the next one; the error is reported to
//! callers of [`parse_stylesheet_with_errors`](super::parse_stylesheet_with_errors).

use thiserror::Error;

use crate::selector::SelectorParseError;

/// A single qualified rule or at-rule could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    /// The prelude reached end of input before a `{` block.
    #[error("qualified rule ended before its block")]
    MissingBlock,

    /// "EOF before either terminator" of a statement or block at-rule.
    #[error("at-rule @{name} is not terminated")]
    UnterminatedAtRule {
        /// The at-keyword name, without `@`.
        name: String,
    },

    /// The prelude is not a valid selector list.
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorParseError),
}

/// A single declaration inside a block could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationParseError {
    /// The property name is not followed by `:`.
    #[error("expected ':' after property name '{name}'")]
    MissingColon {
        /// The property name that was read.
        name: String,
    },

    /// Nothing usable is left once whitespace and `!important` are removed.
    #[error("declaration '{name}' has no value")]
    EmptyValue {
        /// The property name that was read.
        name: String,
    },

    /// A declaration must start with an identifier.
    #[error("expected a property name, found {found}")]
    ExpectedName {
        /// Description of the offending component value.
        found: String,
    },
}

/// Any recoverable error collected while parsing a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A dropped rule.
    #[error(transparent)]
    Rule(#[from] RuleParseError),
    /// A dropped declaration.
    #[error(transparent)]
    Declaration(#[from] DeclarationParseError),
}
