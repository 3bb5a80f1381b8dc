//! Integration tests for box tree construction and block layout.

use plume_css::cascade::{StyleTree, style_tree};
use plume_css::layout::{BoxDimensions, LayoutError, LayoutTree, layout_tree};
use plume_css::parser::parse_stylesheet;
use plume_dom::{DomTree, ElementData};
use quickcheck_macros::quickcheck;

/// A `div` root whose children are `p` elements, styled by `css`.
fn styles(css: &str, children: usize) -> StyleTree {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.append_element(root, ElementData::new("div"));
    for i in 0..children {
        let _ = tree.append_element(div, ElementData::new("p").with_attr("id", format!("p{i}")));
    }
    let sheet = parse_stylesheet(css, 1).unwrap();
    style_tree(&tree, div, &[sheet])
}

fn lay_out(styles: &StyleTree, width: f32) -> LayoutTree {
    layout_tree(styles, styles.root(), BoxDimensions::viewport(width)).unwrap()
}

fn root_dimensions(layout: &LayoutTree) -> BoxDimensions {
    layout.get(layout.root()).unwrap().dimensions
}

#[test]
fn test_auto_width_fills_containing_block() {
    let styles = styles("div { display: block; border-width: 3px; padding: 7px }", 0);
    let dims = root_dimensions(&lay_out(&styles, 800.0));
    assert_eq!(dims.content.width, 800.0 - (3.0 + 3.0 + 7.0 + 7.0));
    assert_eq!(dims.margin.left, 0.0);
    assert_eq!(dims.margin.right, 0.0);
    assert_eq!(dims.border_box().width, 800.0);
}

#[test]
fn test_auto_margins_center() {
    let styles = styles(
        "div { display: block; width: 400px; margin-left: auto; margin-right: auto }",
        0,
    );
    let dims = root_dimensions(&lay_out(&styles, 800.0));
    assert_eq!(dims.content.width, 400.0);
    assert_eq!(dims.margin.left, 200.0);
    assert_eq!(dims.margin.right, 200.0);
    assert_eq!(dims.content.x, 200.0);
}

#[test]
fn test_single_auto_margin_takes_the_rest() {
    let styles = styles("div { display: block; width: 300px; margin-left: auto }", 0);
    let dims = root_dimensions(&lay_out(&styles, 800.0));
    assert_eq!(dims.margin.left, 500.0);
    assert_eq!(dims.margin.right, 0.0);
}

#[test]
fn test_vertical_stacking() {
    let styles = styles(
        "div, p { display: block } #p0 { height: 30px } #p1 { height: 50px }",
        2,
    );
    let layout = lay_out(&styles, 800.0);
    let children = layout.children(layout.root());
    assert_eq!(children.len(), 2);

    let first = layout.get(children[0]).unwrap().dimensions;
    let second = layout.get(children[1]).unwrap().dimensions;
    assert_eq!(first.content.y, 0.0);
    assert_eq!(second.content.y, 30.0);
    assert_eq!(root_dimensions(&layout).content.height, 80.0);
}

#[test]
fn test_margins_separate_siblings() {
    let styles = styles(
        "div, p { display: block } p { height: 10px; margin: 5px 0 }",
        2,
    );
    let layout = lay_out(&styles, 100.0);
    let children = layout.children(layout.root());
    assert_eq!(layout.get(children[0]).unwrap().dimensions.content.y, 5.0);
    assert_eq!(layout.get(children[1]).unwrap().dimensions.content.y, 25.0);
    assert_eq!(root_dimensions(&layout).content.height, 40.0);
}

#[test]
fn test_non_px_height_is_ignored() {
    let styles = styles(
        "div, p { display: block } div { height: 50% } #p0 { height: 12px }",
        1,
    );
    assert_eq!(root_dimensions(&lay_out(&styles, 100.0)).content.height, 12.0);
}

#[test]
fn test_containing_block_offset() {
    let styles = styles("div { display: block; margin: 2px }", 0);
    let mut containing = BoxDimensions::viewport(100.0);
    containing.content.x = 10.0;
    containing.content.y = 20.0;
    containing.content.height = 30.0;
    let layout = layout_tree(&styles, styles.root(), containing).unwrap();
    let dims = root_dimensions(&layout);
    assert_eq!(dims.content.x, 12.0);
    assert_eq!(dims.content.y, 52.0);
    assert_eq!(dims.content.width, 96.0);
}

#[test]
fn test_inline_children_are_wrapped() {
    let styles = styles("div { display: block } #p1 { display: none }", 3);
    let layout = lay_out(&styles, 100.0);
    let children = layout.children(layout.root());
    assert_eq!(children.len(), 1);
    let anonymous = layout.get(children[0]).unwrap();
    assert!(anonymous.styled_node.is_none());
    assert_eq!(anonymous.children.len(), 2);
    assert_eq!(anonymous.dimensions.content.width, 100.0);
}

#[test]
fn test_root_display_none() {
    let styles = styles("div { display: none }", 1);
    assert_eq!(
        layout_tree(&styles, styles.root(), BoxDimensions::viewport(800.0)),
        Err(LayoutError::RootDisplayNone)
    );
}

#[test]
fn test_relayout_is_fresh() {
    let styles = styles("div, p { display: block } p { height: 10px }", 2);
    let first = lay_out(&styles, 300.0);
    let second = lay_out(&styles, 300.0);
    assert_eq!(first, second);
}

#[quickcheck]
fn prop_auto_width_fills_viewport(padding: (u8, u8), border: (u8, u8), extra: u16) -> bool {
    let viewport = 1024.0 + f32::from(extra % 2048);
    let css = format!(
        "div {{ display: block; padding-left: {}px; padding-right: {}px; \
         border-left-width: {}px; border-right-width: {}px }}",
        padding.0, padding.1, border.0, border.1
    );
    let styles = styles(&css, 0);
    let dims = root_dimensions(&lay_out(&styles, viewport));

    let edges = f32::from(padding.0) + f32::from(padding.1) + f32::from(border.0) + f32::from(border.1);
    dims.content.width == viewport - edges
        && dims.margin.left == 0.0
        && dims.margin.right == 0.0
        && dims.margin_box().width == viewport
}
