//! CSS tokenizer, parser, cascade, and block layout for the Plume style engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url, number, dimension, etc.
//!   - Comment handling
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheet parsing with per-rule and per-declaration error recovery
//!   - At-rules (kept, not interpreted)
//!   - `style` attribute declaration lists
//!
//! - **CSS Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Keywords, dimensions, hex and named colors, functions, one-operator expressions
//!   - `rgb()` / `rgba()` color resolution
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type (with namespace prefix), universal, class, ID, and attribute-name selectors
//!   - Specificity calculation
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Ordering by origin, then specificity, then source order
//!   - Inline `style` attributes
//!
//! - **Layout** ([CSS 2.1 § 10](https://www.w3.org/TR/CSS2/visudet.html))
//!   - Block width, position, and height resolution with `auto` margins
//!   - Anonymous block boxes around inline runs
//!
//! - **Paint** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Background and border fills
//!
//! # Not Yet Implemented
//!
//! - Hex escape sequences in the tokenizer
//! - Units other than `px`
//! - Combinators, pseudo-classes, and attribute value matching
//! - Property inheritance
//! - `!important` precedence
//! - Inline formatting (line boxes, text measurement)
//! - Media queries

/// CSS backgrounds per [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/).
pub mod backgrounds;
/// CSS cascade and style tree per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box tree and block layout per [CSS 2.1 § 9-10](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;
/// Typed CSS values per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

// Re-exports for convenience
pub use backgrounds::root_background;
pub use cascade::{
    AUTHOR_ORIGIN, DisplayType, INLINE_STYLE_ORIGIN, PropertyMap, StyleTree, StyledNode,
    StyledNodeId, USER_AGENT_ORIGIN, style_tree,
};
pub use layout::{
    BoxDimensions, BoxType, EdgeSizes, LayoutBox, LayoutBoxId, LayoutError, LayoutTree, Rect,
    layout_tree,
};
pub use paint::{DisplayCommand, DisplayList, build_display_list, build_page_display_list};
pub use parser::{
    AtRule, CSSParser, ComponentValue, Declaration, DeclarationParseError, ParseError, Rule,
    RuleParseError, SimpleBlock, Stylesheet, parse_declaration_list, parse_stylesheet,
    parse_stylesheet_with_errors,
};
pub use selector::{
    AttrSelector, Selector, SelectorParseError, Specificity, parse_selector_list,
    parse_simple_selector, query_selector, query_selector_all,
};
pub use tokenizer::{CSSToken, CSSTokenizer, HashType, NumericType, TokenError, tokenize};
pub use ua_stylesheet::ua_stylesheet;
pub use values::{ColorValue, CssValue, Unit, parse_css_value};
