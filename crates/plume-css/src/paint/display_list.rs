//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! Boxes are painted in tree order, each one's background before its borders,
//! so descendants cover their ancestors.

use serde::Serialize;

use crate::backgrounds::root_background;
use crate::cascade::{PropertyMap, StyleTree};
use crate::layout::{EdgeSizes, LayoutTree, Rect, Side};
use crate::values::{ColorValue, CssValue};

/// A single drawing command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    SolidColor {
        /// Fill color.
        color: ColorValue,
        /// Area to fill.
        rect: Rect,
    },
}

/// Drawing commands in painting order, back to front.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// An empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// The commands in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether there is nothing to paint.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Paint every box of `layout`, resolving colors from `styles`.
#[must_use]
pub fn build_display_list(layout: &LayoutTree, styles: &StyleTree) -> DisplayList {
    let mut list = DisplayList::new();
    paint_boxes(&mut list, layout, styles, false);
    list
}

/// [§ 2.11.2 The Canvas Background](https://www.w3.org/TR/css-backgrounds-3/#special-backgrounds)
///
/// Like [`build_display_list`], but a root background is propagated to the
/// whole `canvas` and painted first instead of over the root's border box.
#[must_use]
pub fn build_page_display_list(layout: &LayoutTree, styles: &StyleTree, canvas: Rect) -> DisplayList {
    let mut list = DisplayList::new();
    let background = root_background(styles);
    if let Some(color) = background {
        list.push(DisplayCommand::SolidColor {
            color,
            rect: canvas,
        });
    }
    paint_boxes(&mut list, layout, styles, background.is_some());
    list
}

fn paint_boxes(
    list: &mut DisplayList,
    layout: &LayoutTree,
    styles: &StyleTree,
    root_background_on_canvas: bool,
) {
    for id in layout.pre_order() {
        let Some(layout_box) = layout.get(id) else {
            continue;
        };
        let Some(props) = layout_box
            .styled_node
            .and_then(|node| styles.get(node))
            .map(|node| &node.specified_values)
        else {
            continue;
        };
        let border_box = layout_box.dimensions.border_box();
        if !(root_background_on_canvas && id == layout.root()) {
            render_background(list, props, border_box);
        }
        render_borders(list, props, layout_box.dimensions.border, border_box);
    }
}

/// [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
///
/// The background color of a set of properties: `background-color`, else the
/// first color in the `background` shorthand.
#[must_use]
pub fn background_color(props: &PropertyMap) -> Option<ColorValue> {
    props
        .value("background-color")
        .and_then(CssValue::to_color)
        .or_else(|| first_color(props.values("background")))
}

/// [§ 3.10 Backgrounds Painting Area](https://www.w3.org/TR/css-backgrounds-3/#background-painting-area)
///
/// The background covers the border box.
fn render_background(list: &mut DisplayList, props: &PropertyMap, border_box: Rect) {
    if let Some(color) = background_color(props) {
        list.push(DisplayCommand::SolidColor {
            color,
            rect: border_box,
        });
    }
}

/// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
///
/// One fill per side with a non-zero width. Border styles are not
/// distinguished; every border is painted solid.
fn render_borders(
    list: &mut DisplayList,
    props: &PropertyMap,
    border: EdgeSizes,
    bb: Rect,
) {
    let edges = [
        (Side::Left, Rect::new(bb.x, bb.y, border.left, bb.height)),
        (
            Side::Right,
            Rect::new(bb.x + bb.width - border.right, bb.y, border.right, bb.height),
        ),
        (Side::Top, Rect::new(bb.x, bb.y, bb.width, border.top)),
        (
            Side::Bottom,
            Rect::new(bb.x, bb.y + bb.height - border.bottom, bb.width, border.bottom),
        ),
    ];

    for (side, rect) in edges {
        if rect.width > 0.0 && rect.height > 0.0 {
            list.push(DisplayCommand::SolidColor {
                color: border_color(props, side),
                rect,
            });
        }
    }
}

/// [§ 4.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
///
/// `border-<side>-color`, then the `border-color` shorthand, then any color in
/// `border-<side>` or `border`. Defaults to black.
fn border_color(props: &PropertyMap, side: Side) -> ColorValue {
    if let Some(color) = props
        .value(&format!("border-{side}-color"))
        .and_then(CssValue::to_color)
    {
        return color;
    }

    let shorthand = props.values("border-color");
    if let Some(color) = side
        .shorthand_index(shorthand.len())
        .and_then(|i| shorthand.get(i))
        .and_then(CssValue::to_color)
    {
        return color;
    }

    first_color(props.values(&format!("border-{side}")))
        .or_else(|| first_color(props.values("border")))
        .unwrap_or(ColorValue::BLACK)
}

fn first_color(values: &[CssValue]) -> Option<ColorValue> {
    values.iter().find_map(CssValue::to_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::style_tree;
    use crate::layout::{BoxDimensions, layout_tree};
    use crate::parser::parse_stylesheet;
    use plume_dom::{DomTree, ElementData};

    fn lay_out(css: &str) -> (LayoutTree, StyleTree) {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.append_element(root, ElementData::new("div"));
        let _ = tree.append_element(div, ElementData::new("p"));
        let sheet = parse_stylesheet(css, 1).unwrap();
        let styles = style_tree(&tree, div, &[sheet]);
        let layout = layout_tree(&styles, styles.root(), BoxDimensions::viewport(200.0)).unwrap();
        (layout, styles)
    }

    fn paint(css: &str) -> DisplayList {
        let (layout, styles) = lay_out(css);
        build_display_list(&layout, &styles)
    }

    #[test]
    fn test_background_over_border_box() {
        let list = paint("div { display: block; padding: 10px; background-color: red } p { display: block; height: 5px }");
        assert_eq!(
            list.commands(),
            [DisplayCommand::SolidColor {
                color: ColorValue::rgb(255, 0, 0),
                rect: Rect::new(0.0, 0.0, 200.0, 25.0),
            }]
        );
    }

    #[test]
    fn test_background_shorthand_and_painting_order() {
        let list = paint("div { display: block; background: blue } p { display: block; background: #00ff00; height: 5px }");
        let colors: Vec<_> = list
            .commands()
            .iter()
            .map(|DisplayCommand::SolidColor { color, .. }| *color)
            .collect();
        assert_eq!(colors, [ColorValue::rgb(0, 0, 255), ColorValue::rgb(0, 255, 0)]);
    }

    #[test]
    fn test_borders() {
        let list = paint("div { display: block; height: 10px; border: 2px solid; border-left-color: red }");
        assert_eq!(list.len(), 4);
        let DisplayCommand::SolidColor { color, rect } = list.commands()[0];
        assert_eq!(color, ColorValue::rgb(255, 0, 0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 2.0, 14.0));
        let DisplayCommand::SolidColor { color, rect } = list.commands()[3];
        assert_eq!(color, ColorValue::BLACK);
        assert_eq!(rect, Rect::new(0.0, 12.0, 200.0, 2.0));
    }

    #[test]
    fn test_unstyled_boxes_paint_nothing() {
        assert!(paint("div { display: block }").is_empty());
    }

    #[test]
    fn test_root_background_fills_canvas_once() {
        let (layout, styles) = lay_out(
            "div { display: block; background-color: red; border: 1px solid blue } \
             p { display: block; height: 5px; background-color: white }",
        );
        let canvas = Rect::new(0.0, 0.0, 200.0, 100.0);
        let list = build_page_display_list(&layout, &styles, canvas);

        let red = ColorValue::rgb(255, 0, 0);
        assert_eq!(
            list.commands()[0],
            DisplayCommand::SolidColor { color: red, rect: canvas }
        );
        let reds = list
            .commands()
            .iter()
            .filter(|DisplayCommand::SolidColor { color, .. }| *color == red)
            .count();
        assert_eq!(reds, 1);
        // Four blue borders and the white paragraph are still painted.
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_page_without_root_background() {
        let (layout, styles) = lay_out("p { display: block; height: 5px; background-color: white }");
        let canvas = Rect::new(0.0, 0.0, 200.0, 100.0);
        assert_eq!(
            build_page_display_list(&layout, &styles, canvas),
            build_display_list(&layout, &styles)
        );
    }
}
