//! CSS Cascading and Style Computation
//!
//! Matches elements against stylesheet rules and builds a [`StyleTree`]
//! mirroring the document, per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).
//!
//! Properties are not inherited: every styled node carries only the
//! declarations whose selectors matched its own element.

use std::collections::BTreeMap;
use std::collections::btree_map;

use plume_common::warning::warn_once;
use plume_dom::{DomTree, ElementData, NodeId, NodeType};
use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::parser::{Declaration, Rule, Stylesheet, parse_declaration_list};
use crate::selector::{Selector, Specificity};
use crate::values::CssValue;

/// Origin key for the built-in user-agent stylesheet.
pub const USER_AGENT_ORIGIN: u32 = 0;

/// Origin key for author stylesheets (`<style>` elements and linked files).
pub const AUTHOR_ORIGIN: u32 = 1;

/// Origin recorded for declarations from a `style` attribute.
///
/// Inline declarations are applied after every stylesheet rule regardless of
/// the origins callers assign to their sheets.
pub const INLINE_STYLE_ORIGIN: u32 = 2;

/// Resolved declarations of one node, keyed by property name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PropertyMap(BTreeMap<String, Declaration>);

impl PropertyMap {
    /// An empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a declaration, replacing any earlier one with the same name.
    pub fn insert(&mut self, declaration: Declaration) {
        let _ = self.0.insert(declaration.name.clone(), declaration);
    }

    /// The declaration for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.0.get(name)
    }

    /// The first declaration present among `names`, tried in order.
    ///
    /// Used to fall back from a longhand to its shorthand, e.g.
    /// `["background-color", "background"]`.
    #[must_use]
    pub fn lookup(&self, names: &[&str]) -> Option<&Declaration> {
        names.iter().find_map(|name| self.0.get(*name))
    }

    /// The values of `name`, empty if it is not set.
    #[must_use]
    pub fn values(&self, name: &str) -> &[CssValue] {
        self.0.get(name).map_or(&[], |decl| decl.values.as_slice())
    }

    /// The first value of `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&CssValue> {
        self.values(name).first()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in property-name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Declaration> {
        self.0.iter()
    }
}

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The subset of `display` values the layout engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DisplayType {
    /// `inline`, and the fallback for anything unrecognised.
    Inline,
    /// `block`
    Block,
    /// `none`: styled but never laid out.
    None,
}

/// Index of a node in a [`StyleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StyledNodeId(pub usize);

/// A document node with its resolved declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledNode {
    /// The document node this was built from.
    pub node: NodeId,
    /// Declarations that won the cascade.
    pub specified_values: PropertyMap,
    /// Styled children in document order.
    pub children: Vec<StyledNodeId>,
}

impl StyledNode {
    /// The first value of property `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&CssValue> {
        self.specified_values.value(name)
    }

    /// The resolved `display` type.
    ///
    /// Absent or unrecognised values are `inline`.
    #[must_use]
    pub fn display(&self) -> DisplayType {
        self.value("display")
            .and_then(CssValue::as_keyword)
            .and_then(|keyword| keyword.parse().ok())
            .unwrap_or(DisplayType::Inline)
    }
}

/// Arena of styled nodes built by [`style_tree`]. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTree {
    nodes: Vec<StyledNode>,
    root: StyledNodeId,
}

impl StyleTree {
    /// The styled node built for the requested document root.
    #[must_use]
    pub const fn root(&self) -> StyledNodeId {
        self.root
    }

    /// Look up a styled node.
    #[must_use]
    pub fn get(&self, id: StyledNodeId) -> Option<&StyledNode> {
        self.nodes.get(id.0)
    }

    /// Children of `id`, empty for an unknown id.
    #[must_use]
    pub fn children(&self, id: StyledNodeId) -> &[StyledNodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of styled nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The styled node built for `node`, if any.
    #[must_use]
    pub fn find(&self, node: NodeId) -> Option<StyledNodeId> {
        self.nodes
            .iter()
            .position(|styled| styled.node == node)
            .map(StyledNodeId)
    }

    fn push(&mut self, node: StyledNode) -> StyledNodeId {
        let id = StyledNodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }
}

/// A rule matched against one element, with its cascade sort key.
#[derive(Debug)]
struct MatchedRule<'a> {
    inline: bool,
    origin: u32,
    specificity: Specificity,
    declarations: &'a [Declaration],
}

impl MatchedRule<'_> {
    const fn sort_key(&self) -> (bool, u32, Specificity) {
        (self.inline, self.origin, self.specificity)
    }
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Build the style tree for `root` and its descendants.
///
/// Element nodes get the declarations of every matching rule, applied in
/// ascending `(origin, specificity)` order so later ones win, followed by
/// their `style` attribute. Text nodes become leaves with no declarations.
/// Comments are skipped. A document node is an unstyled container.
#[must_use]
pub fn style_tree(tree: &DomTree, root: NodeId, stylesheets: &[Stylesheet]) -> StyleTree {
    let mut styles = StyleTree {
        nodes: Vec::new(),
        root: StyledNodeId(0),
    };
    styles.root = build_styled_node(tree, root, stylesheets, &mut styles);
    styles
}

fn build_styled_node(
    tree: &DomTree,
    id: NodeId,
    stylesheets: &[Stylesheet],
    styles: &mut StyleTree,
) -> StyledNodeId {
    let specified_values = match tree.get(id).map(|node| &node.node_type) {
        Some(NodeType::Element(element)) => specified_values(element, stylesheets),
        _ => PropertyMap::new(),
    };
    let styled = styles.push(StyledNode {
        node: id,
        specified_values,
        children: Vec::new(),
    });

    if tree.as_text(id).is_some() {
        return styled;
    }

    let children: Vec<StyledNodeId> = tree
        .children(id)
        .iter()
        .filter(|&&child| {
            !matches!(
                tree.get(child).map(|node| &node.node_type),
                Some(NodeType::Comment(_)) | None
            )
        })
        .map(|&child| build_styled_node(tree, child, stylesheets, styles))
        .collect();

    if let Some(node) = styles.nodes.get_mut(styled.0) {
        node.children = children;
    }
    styled
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
fn specified_values(element: &ElementData, stylesheets: &[Stylesheet]) -> PropertyMap {
    let inline_declarations = inline_style(element);

    let mut matched: Vec<MatchedRule<'_>> = stylesheets
        .iter()
        .flat_map(|sheet| {
            sheet
                .rules
                .iter()
                .filter_map(move |rule| match_rule(element, rule, sheet.origin))
        })
        .collect();

    if !inline_declarations.is_empty() {
        matched.push(MatchedRule {
            inline: true,
            origin: INLINE_STYLE_ORIGIN,
            specificity: Specificity::default(),
            declarations: &inline_declarations,
        });
    }

    // Stable, so equal keys keep source order.
    matched.sort_by_key(MatchedRule::sort_key);

    let mut values = PropertyMap::new();
    for rule in &matched {
        log::trace!(
            "<{}> origin {} specificity {:?}: {} declarations",
            element.tag_name,
            rule.origin,
            rule.specificity,
            rule.declarations.len()
        );
        for declaration in rule.declarations {
            values.insert(declaration.clone());
        }
    }
    values
}

/// The rule's highest-specificity selector that matches `element`.
fn match_rule<'a>(element: &ElementData, rule: &'a Rule, origin: u32) -> Option<MatchedRule<'a>> {
    let specificity = rule
        .selectors
        .iter()
        .filter(|selector| selector.matches(element))
        .map(Selector::specificity)
        .max()?;
    Some(MatchedRule {
        inline: false,
        origin,
        specificity,
        declarations: &rule.declarations,
    })
}

fn inline_style(element: &ElementData) -> Vec<Declaration> {
    let Some(style) = element.style_attribute() else {
        return Vec::new();
    };
    match parse_declaration_list(style) {
        Ok(declarations) => declarations,
        Err(error) => {
            let _ = warn_once(
                "CSS",
                &format!("ignoring style attribute on <{}>: {error}", element.tag_name),
            );
            Vec::new()
        }
    }
}
