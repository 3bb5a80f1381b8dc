//! Box tree construction and block layout.
//!
//! [CSS 2.1 § 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//! and [§ 10 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html).

use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;

use crate::cascade::{DisplayType, PropertyMap, StyleTree, StyledNodeId};

use super::box_model::BoxDimensions;
use super::values::{AutoOr, Side, edge_sizes, edge_value, explicit_px};

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BoxType {
    /// A block-level box generated by `display: block`.
    Block,
    /// An inline-level box generated by `display: inline`.
    Inline,
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Wraps a run of consecutive inline children of a block.
    AnonymousBlock,
}

/// Index of a box in a [`LayoutTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LayoutBoxId(pub usize);

/// A node in the box tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox {
    /// The kind of box.
    pub box_type: BoxType,
    /// Used geometry after layout.
    pub dimensions: BoxDimensions,
    /// The styled node that generated the box; `None` for anonymous boxes.
    pub styled_node: Option<StyledNodeId>,
    /// Child boxes in document order.
    pub children: Vec<LayoutBoxId>,
}

/// Layout could not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The root styled node has `display: none`, so there is no root box.
    #[error("the root element has display: none")]
    RootDisplayNone,
    /// The requested root is not part of the style tree.
    #[error("styled node {0:?} does not exist")]
    UnknownNode(StyledNodeId),
}

/// Arena of layout boxes produced by [`layout_tree`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutTree {
    boxes: Vec<LayoutBox>,
    root: LayoutBoxId,
}

/// Build the box tree for `root` and lay it out inside `containing`.
///
/// The containing block's content height is where the root box starts, so an
/// initial pass passes the viewport width and a height of zero.
///
/// # Errors
///
/// Returns [`LayoutError::RootDisplayNone`] when `root` has `display: none`,
/// and [`LayoutError::UnknownNode`] when it is not in `styles`.
pub fn layout_tree(
    styles: &StyleTree,
    root: StyledNodeId,
    containing: BoxDimensions,
) -> Result<LayoutTree, LayoutError> {
    let mut tree = LayoutTree::build(styles, root)?;
    tree.layout(tree.root, containing, styles);
    Ok(tree)
}

impl LayoutTree {
    /// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
    ///
    /// Build the (not yet laid out) box tree.
    ///
    /// # Errors
    ///
    /// See [`layout_tree`].
    pub fn build(styles: &StyleTree, root: StyledNodeId) -> Result<Self, LayoutError> {
        let node = styles.get(root).ok_or(LayoutError::UnknownNode(root))?;
        let box_type = match node.display() {
            DisplayType::Block => BoxType::Block,
            DisplayType::Inline => BoxType::Inline,
            DisplayType::None => return Err(LayoutError::RootDisplayNone),
        };

        let mut tree = Self {
            boxes: Vec::new(),
            root: LayoutBoxId(0),
        };
        tree.root = tree.push(box_type, Some(root));
        tree.build_children(styles, root, tree.root);
        Ok(tree)
    }

    fn build_children(&mut self, styles: &StyleTree, styled: StyledNodeId, parent: LayoutBoxId) {
        for &child in styles.children(styled) {
            let Some(node) = styles.get(child) else {
                continue;
            };
            let child_box = match node.display() {
                DisplayType::Block => {
                    let id = self.push(BoxType::Block, Some(child));
                    self.boxes[parent.0].children.push(id);
                    id
                }
                DisplayType::Inline => {
                    let container = self.inline_container(parent);
                    let id = self.push(BoxType::Inline, Some(child));
                    self.boxes[container.0].children.push(id);
                    id
                }
                DisplayType::None => continue,
            };
            self.build_children(styles, child, child_box);
        }
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Where an inline child of `parent` goes: `parent` itself unless it is a
    /// block, otherwise its trailing anonymous block, created if missing.
    fn inline_container(&mut self, parent: LayoutBoxId) -> LayoutBoxId {
        let parent_box = &self.boxes[parent.0];
        if parent_box.box_type != BoxType::Block {
            return parent;
        }
        let trailing_anonymous = parent_box
            .children
            .last()
            .copied()
            .filter(|last| self.boxes[last.0].box_type == BoxType::AnonymousBlock);
        if let Some(last) = trailing_anonymous {
            return last;
        }
        let anonymous = self.push(BoxType::AnonymousBlock, None);
        self.boxes[parent.0].children.push(anonymous);
        anonymous
    }

    fn push(&mut self, box_type: BoxType, styled_node: Option<StyledNodeId>) -> LayoutBoxId {
        let id = LayoutBoxId(self.boxes.len());
        self.boxes.push(LayoutBox {
            box_type,
            dimensions: BoxDimensions::default(),
            styled_node,
            children: Vec::new(),
        });
        id
    }

    /// The root box.
    #[must_use]
    pub const fn root(&self) -> LayoutBoxId {
        self.root
    }

    /// Look up a box.
    #[must_use]
    pub fn get(&self, id: LayoutBoxId) -> Option<&LayoutBox> {
        self.boxes.get(id.0)
    }

    /// Children of `id`, empty for an unknown id.
    #[must_use]
    pub fn children(&self, id: LayoutBoxId) -> &[LayoutBoxId] {
        self.get(id).map_or(&[], |b| b.children.as_slice())
    }

    /// Number of boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the tree has no boxes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes in pre-order, parents before children.
    #[must_use]
    pub fn pre_order(&self) -> Vec<LayoutBoxId> {
        let mut order = Vec::with_capacity(self.boxes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Lay out box `id` and its subtree inside `containing`.
    fn layout(&mut self, id: LayoutBoxId, containing: BoxDimensions, styles: &StyleTree) {
        match self.boxes[id.0].box_type {
            BoxType::Block | BoxType::Inline => self.layout_block(id, containing, styles),
            BoxType::AnonymousBlock => self.layout_anonymous(id, containing, styles),
        }
        log::trace!(
            "{} box {:?}: {:?}",
            self.boxes[id.0].box_type,
            id,
            self.boxes[id.0].dimensions.content
        );
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// Width depends on the parent, height on the children, so the order of
    /// these steps matters.
    fn layout_block(&mut self, id: LayoutBoxId, containing: BoxDimensions, styles: &StyleTree) {
        let props = self.props(id, styles);
        self.calculate_block_width(id, containing, props);
        self.calculate_block_position(id, containing, props);
        self.layout_children(id, styles);
        self.calculate_block_height(id, props);
    }

    /// An anonymous block has no style, so no edges. It spans the containing
    /// width at the containing block's current bottom.
    fn layout_anonymous(&mut self, id: LayoutBoxId, containing: BoxDimensions, styles: &StyleTree) {
        let dims = &mut self.boxes[id.0].dimensions;
        *dims = BoxDimensions::default();
        dims.content.x = containing.content.x;
        dims.content.y = containing.content.y + containing.content.height;
        dims.content.width = containing.content.width;
        self.layout_children(id, styles);
    }

    /// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    /// 'padding-right' + 'border-right-width' + 'margin-right' = width of
    /// containing block"
    fn calculate_block_width(
        &mut self,
        id: LayoutBoxId,
        containing: BoxDimensions,
        props: Option<&PropertyMap>,
    ) {
        let empty = PropertyMap::new();
        let props = props.unwrap_or(&empty);

        // An undeclared width is 'auto'; undeclared edges are 0.
        let width = props
            .value("width")
            .map_or(AutoOr::Auto, |value| AutoOr::from_value(Some(value)));
        let mut margin_left = AutoOr::from_value(edge_value(props, "margin", Side::Left));
        let mut margin_right = AutoOr::from_value(edge_value(props, "margin", Side::Right));
        let padding = edge_sizes(props, "padding");
        let border = edge_sizes(props, "border");

        let total = margin_left.to_px()
            + margin_right.to_px()
            + border.left
            + border.right
            + padding.left
            + padding.right
            + width.to_px();

        // "If 'width' is not 'auto' and [the sum] is larger than the width of
        // the containing block, then any 'auto' values for 'margin-left' or
        // 'margin-right' are, for the following rules, treated as zero."
        if !width.is_auto() && total > containing.content.width {
            if margin_left.is_auto() {
                margin_left = AutoOr::Length(0.0);
            }
            if margin_right.is_auto() {
                margin_right = AutoOr::Length(0.0);
            }
        }

        let underflow = containing.content.width - total;

        let (used_width, used_margin_left, used_margin_right) =
            match (width, margin_left, margin_right) {
                // "If all of the above have a computed value other than 'auto',
                // the values are said to be 'over-constrained'... the specified
                // value of 'margin-right' is ignored."
                (AutoOr::Length(w), AutoOr::Length(ml), AutoOr::Length(mr)) => {
                    (w, ml, mr + underflow)
                }

                // "If there is exactly one value specified as 'auto', its used
                // value follows from the equality."
                (AutoOr::Length(w), AutoOr::Length(ml), AutoOr::Auto) => (w, ml, underflow),
                (AutoOr::Length(w), AutoOr::Auto, AutoOr::Length(mr)) => (w, underflow, mr),

                // "If both 'margin-left' and 'margin-right' are 'auto', their
                // used values are equal."
                (AutoOr::Length(w), AutoOr::Auto, AutoOr::Auto) => {
                    (w, underflow / 2.0, underflow / 2.0)
                }

                // "If 'width' is set to 'auto', any other 'auto' values become
                // '0' and 'width' follows from the resulting equality."
                (AutoOr::Auto, ml, mr) => {
                    let (ml, mr) = (ml.to_px(), mr.to_px());
                    if underflow >= 0.0 {
                        (underflow, ml, mr)
                    } else {
                        // Width can't be negative; the right margin absorbs it.
                        (0.0, ml, mr + underflow)
                    }
                }
            };

        let dims = &mut self.boxes[id.0].dimensions;
        dims.content.width = used_width;
        dims.margin.left = used_margin_left;
        dims.margin.right = used_margin_right;
        dims.padding.left = padding.left;
        dims.padding.right = padding.right;
        dims.border.left = border.left;
        dims.border.right = border.right;
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the other,
    /// vertically, beginning at the top of a containing block."
    ///
    /// The containing block's accumulated height is the top of this box.
    fn calculate_block_position(
        &mut self,
        id: LayoutBoxId,
        containing: BoxDimensions,
        props: Option<&PropertyMap>,
    ) {
        let empty = PropertyMap::new();
        let props = props.unwrap_or(&empty);
        let margin = edge_sizes(props, "margin");
        let padding = edge_sizes(props, "padding");
        let border = edge_sizes(props, "border");

        let dims = &mut self.boxes[id.0].dimensions;
        dims.margin.top = margin.top;
        dims.margin.bottom = margin.bottom;
        dims.border.top = border.top;
        dims.border.bottom = border.bottom;
        dims.padding.top = padding.top;
        dims.padding.bottom = padding.bottom;

        dims.content.x =
            containing.content.x + dims.margin.left + dims.border.left + dims.padding.left;
        dims.content.y = containing.content.y
            + containing.content.height
            + dims.margin.top
            + dims.border.top
            + dims.padding.top;
    }

    /// Lay out each child against this box, growing its content height by
    /// each child's margin box.
    fn layout_children(&mut self, id: LayoutBoxId, styles: &StyleTree) {
        self.boxes[id.0].dimensions.content.height = 0.0;
        let children = self.boxes[id.0].children.clone();
        for child in children {
            let containing = self.boxes[id.0].dimensions;
            self.layout(child, containing, styles);
            let child_height = self.boxes[child.0].dimensions.margin_box().height;
            self.boxes[id.0].dimensions.content.height += child_height;
        }
    }

    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// An explicit `px` height wins over the height of the children.
    fn calculate_block_height(&mut self, id: LayoutBoxId, props: Option<&PropertyMap>) {
        if let Some(height) = explicit_px(props.and_then(|p| p.value("height"))) {
            self.boxes[id.0].dimensions.content.height = height;
        }
    }

    fn props<'s>(&self, id: LayoutBoxId, styles: &'s StyleTree) -> Option<&'s PropertyMap> {
        self.boxes[id.0]
            .styled_node
            .and_then(|node| styles.get(node))
            .map(|node| &node.specified_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::style_tree;
    use crate::layout::EdgeSizes;
    use crate::parser::parse_stylesheet;
    use plume_dom::{DomTree, ElementData};

    fn styled_document(css: &str, build: impl FnOnce(&mut DomTree)) -> StyleTree {
        let mut tree = DomTree::new();
        build(&mut tree);
        let sheet = parse_stylesheet(css, 1).unwrap();
        let root = tree.document_element().unwrap();
        style_tree(&tree, root, &[sheet])
    }

    #[test]
    fn test_inline_runs_share_an_anonymous_block() {
        let styles = styled_document("div, p { display: block }", |tree| {
            let div = tree.append_element(tree.root(), ElementData::new("div"));
            let _ = tree.append_element(div, ElementData::new("span"));
            let _ = tree.append_element(div, ElementData::new("em"));
            let _ = tree.append_element(div, ElementData::new("p"));
            let _ = tree.append_element(div, ElementData::new("b"));
        });
        let layout = LayoutTree::build(&styles, styles.root()).unwrap();
        let kinds: Vec<_> = layout
            .children(layout.root())
            .iter()
            .map(|&id| layout.get(id).unwrap().box_type)
            .collect();
        assert_eq!(
            kinds,
            [BoxType::AnonymousBlock, BoxType::Block, BoxType::AnonymousBlock]
        );
        let first = layout.children(layout.root())[0];
        assert_eq!(layout.children(first).len(), 2);
    }

    #[test]
    fn test_display_none_children_are_skipped() {
        let styles = styled_document("div { display: block } i { display: none }", |tree| {
            let div = tree.append_element(tree.root(), ElementData::new("div"));
            let i = tree.append_element(div, ElementData::new("i"));
            let _ = tree.append_element(i, ElementData::new("b"));
        });
        let layout = LayoutTree::build(&styles, styles.root()).unwrap();
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_over_constrained_width() {
        let styles = styled_document(
            "div { display: block; width: 300px; margin-left: 10px; margin-right: 10px }",
            |tree| {
                let _ = tree.append_element(tree.root(), ElementData::new("div"));
            },
        );
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(800.0)).unwrap();
        let dims = layout.get(layout.root()).unwrap().dimensions;
        assert_eq!(dims.content.width, 300.0);
        assert_eq!(dims.margin.left, 10.0);
        assert_eq!(dims.margin.right, 490.0);
    }

    #[test]
    fn test_too_wide_box_drops_auto_margins() {
        let styles = styled_document(
            "div { display: block; width: 900px; margin: 0 auto }",
            |tree| {
                let _ = tree.append_element(tree.root(), ElementData::new("div"));
            },
        );
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(800.0)).unwrap();
        let dims = layout.get(layout.root()).unwrap().dimensions;
        assert_eq!(dims.content.width, 900.0);
        assert_eq!(dims.margin.left, 0.0);
        assert_eq!(dims.margin.right, -100.0);
    }

    #[test]
    fn test_negative_underflow_with_auto_width() {
        let styles = styled_document(
            "div { display: block; padding-left: 500px; margin-left: 400px }",
            |tree| {
                let _ = tree.append_element(tree.root(), ElementData::new("div"));
            },
        );
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(800.0)).unwrap();
        let dims = layout.get(layout.root()).unwrap().dimensions;
        assert_eq!(dims.content.width, 0.0);
        assert_eq!(dims.margin.right, -100.0);
    }

    #[test]
    fn test_explicit_height_and_edges() {
        let styles = styled_document(
            "div { display: block; height: 40px; padding: 5px; border-width: 1px; margin: 2px }",
            |tree| {
                let _ = tree.append_element(tree.root(), ElementData::new("div"));
            },
        );
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(100.0)).unwrap();
        let dims = layout.get(layout.root()).unwrap().dimensions;
        assert_eq!(dims.content.x, 8.0);
        assert_eq!(dims.content.y, 8.0);
        assert_eq!(dims.content.width, 84.0);
        assert_eq!(dims.content.height, 40.0);
        assert_eq!(dims.margin_box().height, 56.0);
    }

    #[test]
    fn test_undeclared_width_is_auto() {
        let styles = styled_document(
            "div { display: block; padding: 5px; border-width: 1px; margin: 2px }",
            |tree| {
                let _ = tree.append_element(tree.root(), ElementData::new("div"));
            },
        );
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(100.0)).unwrap();
        let dims = layout.get(layout.root()).unwrap().dimensions;
        assert_eq!(dims.content.width, 84.0);
        assert_eq!(dims.margin.left, 2.0);
        assert_eq!(dims.margin.right, 2.0);
        assert_eq!(dims.margin_box().width, 100.0);
    }

    #[test]
    fn test_inline_boxes_have_edges_and_height() {
        let styles = styled_document(
            "div { display: block } span { height: 20px; padding: 5px; margin: 3px }",
            |tree| {
                let div = tree.append_element(tree.root(), ElementData::new("div"));
                let _ = tree.append_element(div, ElementData::new("span"));
            },
        );
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(100.0)).unwrap();
        let anonymous = layout.children(layout.root())[0];
        let span = layout.get(layout.children(anonymous)[0]).unwrap();
        assert_eq!(span.box_type, BoxType::Inline);
        assert_eq!(span.dimensions.padding, EdgeSizes::uniform(5.0));
        assert_eq!(span.dimensions.margin, EdgeSizes::uniform(3.0));
        assert_eq!(span.dimensions.content.height, 20.0);
        assert_eq!(span.dimensions.content.x, 8.0);
        assert_eq!(span.dimensions.content.width, 84.0);

        let anonymous = layout.get(anonymous).unwrap().dimensions;
        assert_eq!(anonymous.content.width, 100.0);
        assert_eq!(anonymous.content.height, 36.0);
        assert_eq!(layout.get(layout.root()).unwrap().dimensions.content.height, 36.0);
    }

    #[test]
    fn test_unknown_root() {
        let styles = styled_document("", |tree| {
            let _ = tree.append_element(tree.root(), ElementData::new("div"));
        });
        assert_eq!(
            LayoutTree::build(&styles, StyledNodeId(99)),
            Err(LayoutError::UnknownNode(StyledNodeId(99)))
        );
    }
}
