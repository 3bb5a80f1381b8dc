//! CSS Selector parsing and matching
//!
//! A selector here is a single compound of simple selectors (type, id,
//! class, attribute) as described in
//! [Selectors Level 4 § 3.1](https://www.w3.org/TR/selectors-4/#structure).
//! Combinators are not supported: anything after the compound is ignored.

use std::collections::{BTreeMap, BTreeSet};

use plume_dom::{DomTree, ElementData, NodeId};
use thiserror::Error;

use crate::parser::ComponentValue;
use crate::tokenizer::{CSSToken, HashType};

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "Specificities are compared by comparing the three components in order."
/// The derived `Ord` is exactly that lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Attribute selectors are recognized and counted for specificity, but their
/// operators and values are not interpreted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttrSelector;

/// A compound selector such as `svg|rect`, `#nav.main` or `[href]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    /// Element name, `*` for the universal selector.
    pub tag_name: Option<String>,
    /// Value of an ID selector.
    pub id: Option<String>,
    /// Class selectors.
    pub classes: BTreeSet<String>,
    /// Namespace prefix; `Some("")` for the explicit "no namespace" form `|name`.
    pub namespace: Option<String>,
    /// Attribute selectors keyed by attribute name.
    pub attributes: BTreeMap<String, AttrSelector>,
}

/// A prelude that could not be turned into a selector. The rule is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    /// Nothing selectable in the segment, e.g. `a, , b`.
    #[error("empty selector")]
    Empty,
    /// A token that cannot start a selector.
    #[error("unexpected {0} in selector")]
    UnexpectedToken(String),
    /// `.` not followed by an identifier.
    #[error("expected a class name after '.'")]
    MissingClassName,
    /// `#` followed by something that is not an identifier, e.g. `#123`.
    #[error("invalid id selector #{0}")]
    InvalidId(String),
    /// `[` `]` without an attribute name.
    #[error("expected an attribute name")]
    MissingAttributeName,
    /// `ns|` not followed by an element name.
    #[error("expected an element name after namespace prefix")]
    MissingTypeName,
    /// Recognized selector syntax without an implementation.
    #[error("{0} selectors are not implemented")]
    NotImplemented(&'static str),
}

impl Selector {
    /// Create a type selector.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Add an id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let _ = self.classes.insert(class.into());
        self
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// - A: 1 if an id is present
    /// - B: number of class and attribute selectors
    /// - C: 1 if a type selector other than `*` is present
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn specificity(&self) -> Specificity {
        let a = u32::from(self.id.is_some());
        let b = (self.classes.len() + self.attributes.len()) as u32;
        let c = u32::from(self.tag_name.as_deref().is_some_and(|tag| tag != "*"));
        Specificity(a, b, c)
    }

    /// Whether the selector applies to `element`.
    ///
    /// This is a union of three independent tests rather than a conjunction:
    /// a matching id, a matching tag name, or any shared class is enough.
    /// The universal selector never matches by itself.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        let id_matches = self
            .id
            .as_deref()
            .is_some_and(|id| !id.is_empty() && element.id() == Some(id));
        if id_matches {
            return true;
        }

        let tag_matches = self
            .tag_name
            .as_deref()
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .is_some_and(|tag| tag.eq_ignore_ascii_case(&element.tag_name));
        if tag_matches {
            return true;
        }

        if self.classes.is_empty() {
            return false;
        }
        let element_classes = element.classes();
        self.classes
            .iter()
            .any(|class| element_classes.contains(class.as_str()))
    }
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors." One invalid
/// selector invalidates the whole list.
///
/// # Errors
///
/// Returns the first segment's [`SelectorParseError`].
pub fn parse_selector_list(
    prelude: &[ComponentValue],
) -> Result<Vec<Selector>, SelectorParseError> {
    prelude
        .split(|value| matches!(value, ComponentValue::Token(CSSToken::Comma)))
        .map(parse_simple_selector)
        .collect()
}

/// Parse one comma-free prelude segment into a [`Selector`].
///
/// A leading type selector (optionally namespaced) ends the compound.
/// Otherwise consecutive id, class and attribute selectors are combined.
/// Pseudo-classes anywhere in the segment are rejected.
///
/// # Errors
///
/// Returns a [`SelectorParseError`] when the segment is empty, malformed, or
/// uses a pseudo-class.
pub fn parse_simple_selector(input: &[ComponentValue]) -> Result<Selector, SelectorParseError> {
    let start = input
        .iter()
        .position(|v| !matches!(v, ComponentValue::Token(CSSToken::Whitespace)))
        .ok_or(SelectorParseError::Empty)?;
    let input = &input[start..];

    if input
        .iter()
        .any(|v| matches!(v, ComponentValue::Token(CSSToken::Colon)))
    {
        return Err(SelectorParseError::NotImplemented("pseudo-class"));
    }

    let mut selector = Selector::default();
    if parse_type_selector(input, &mut selector)? {
        return Ok(selector);
    }

    let mut i = 0;
    while let Some(value) = input.get(i) {
        match value {
            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            ComponentValue::Token(CSSToken::Hash { value, hash_type }) => {
                if *hash_type != HashType::Id {
                    return Err(SelectorParseError::InvalidId(value.clone()));
                }
                selector.id = Some(value.clone());
            }

            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            ComponentValue::Token(CSSToken::Delim('.')) => match input.get(i + 1) {
                Some(ComponentValue::Token(CSSToken::Ident(class))) => {
                    let _ = selector.classes.insert(class.clone());
                    i += 1;
                }
                _ => return Err(SelectorParseError::MissingClassName),
            },

            // [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
            ComponentValue::Block { token: '[', value } => {
                let name = value
                    .iter()
                    .find_map(|v| match v {
                        ComponentValue::Token(CSSToken::Ident(name)) => Some(name.clone()),
                        _ => None,
                    })
                    .ok_or(SelectorParseError::MissingAttributeName)?;
                let _ = selector.attributes.insert(name, AttrSelector);
            }

            _ if i == 0 => {
                return Err(SelectorParseError::UnexpectedToken(describe(value)));
            }

            // End of the compound.
            _ => break,
        }
        i += 1;
    }

    Ok(selector)
}

/// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
///
/// `<type-selector> = <wq-name> | <ns-prefix>? '*'`
/// `<ns-prefix> = [ <ident-token> | '*' ]? '|'`
///
/// Returns `false` without touching `selector` when `input` does not start
/// with a type selector.
fn parse_type_selector(
    input: &[ComponentValue],
    selector: &mut Selector,
) -> Result<bool, SelectorParseError> {
    let (namespace, name_index) = match (input.first(), input.get(1)) {
        (Some(ComponentValue::Token(CSSToken::Delim('|'))), _) => (Some(String::new()), 1),
        (Some(first), Some(ComponentValue::Token(CSSToken::Delim('|')))) => {
            match element_name(first) {
                Some(prefix) => (Some(prefix), 2),
                None => return Ok(false),
            }
        }
        _ => (None, 0),
    };

    match input.get(name_index).and_then(element_name) {
        Some(name) => {
            selector.tag_name = Some(name);
            selector.namespace = namespace;
            Ok(true)
        }
        None if namespace.is_some() => Err(SelectorParseError::MissingTypeName),
        None => Ok(false),
    }
}

fn element_name(value: &ComponentValue) -> Option<String> {
    match value {
        ComponentValue::Token(CSSToken::Ident(name)) => Some(name.clone()),
        ComponentValue::Token(CSSToken::Delim('*')) => Some("*".to_string()),
        _ => None,
    }
}

fn describe(value: &ComponentValue) -> String {
    match value {
        ComponentValue::Token(token) => format!("'{token}'"),
        ComponentValue::Function { name, .. } => format!("function {name}()"),
        ComponentValue::Block { token, .. } => format!("'{token}' block"),
    }
}

/// First element under `root` (inclusive, document order) matched by `selector`.
#[must_use]
pub fn query_selector(tree: &DomTree, root: NodeId, selector: &Selector) -> Option<NodeId> {
    tree.descendants(root).find(|&id| {
        tree.as_element(id)
            .is_some_and(|element| selector.matches(element))
    })
}

/// Every element under `root` (inclusive, document order) matched by `selector`.
#[must_use]
pub fn query_selector_all(tree: &DomTree, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    tree.descendants(root)
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|element| selector.matches(element))
        })
        .collect()
}
