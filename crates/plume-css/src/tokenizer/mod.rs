//! CSS tokenizer module.

/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// CSS tokenizer implementation.
pub mod css_tokenizer;

pub use css_tokenizer::{CSSTokenizer, TokenError, tokenize};
pub use token::{CSSToken, HashType, NumericType};
