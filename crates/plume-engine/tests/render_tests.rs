//! Integration tests for the render pipeline.

use std::fs;

use plume_css::{BoxType, ColorValue, DisplayCommand, LayoutError, Rect};
use plume_dom::{DomTree, ElementData};
use plume_engine::{RenderError, RenderOptions, load_stylesheet, render, render_document};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `<html><head><style/></head><body><div/><p/></body></html>`
fn document(style: &str) -> DomTree {
    let mut tree = DomTree::new();
    let root = tree.root();
    let html = tree.append_element(root, ElementData::new("html"));
    let head = tree.append_element(html, ElementData::new("head"));
    let style_element = tree.append_element(head, ElementData::new("style"));
    let _ = tree.append_text(style_element, style);
    let body = tree.append_element(html, ElementData::new("body"));
    let _ = tree.append_element(body, ElementData::new("div").with_attr("id", "box"));
    let _ = tree.append_element(
        body,
        ElementData::new("p").with_attr("style", "height: 20px"),
    );
    tree
}

#[test]
fn test_default_body_margin() {
    init_logging();
    let tree = document("");
    let page = render(&tree, "", &RenderOptions::default()).unwrap();

    let layout = &page.layout;
    let html = layout.get(layout.root()).unwrap();
    assert_eq!(html.box_type, BoxType::Block);
    assert_eq!(html.dimensions.content.width, 800.0);

    // head is display: none, so body is the only child.
    let children = layout.children(layout.root());
    assert_eq!(children.len(), 1);
    let body = layout.get(children[0]).unwrap().dimensions;
    assert_eq!(body.content.x, 8.0);
    assert_eq!(body.content.y, 8.0);
    assert_eq!(body.content.width, 784.0);
}

#[test]
fn test_style_elements_and_inline_styles() {
    init_logging();
    let tree = document("#box { height: 30px; margin: 0 } p { margin: 0; height: 99px }");
    let page = render_document(&tree, &RenderOptions::default()).unwrap();

    let layout = &page.layout;
    let body_id = layout.children(layout.root())[0];
    let blocks = layout.children(body_id);
    assert_eq!(blocks.len(), 2);
    let div = layout.get(blocks[0]).unwrap().dimensions;
    let p = layout.get(blocks[1]).unwrap().dimensions;
    assert_eq!(div.content.height, 30.0);
    assert_eq!(p.content.y, div.content.y + 30.0);
    // The style attribute beats the author rule.
    assert_eq!(p.content.height, 20.0);
    assert_eq!(layout.get(body_id).unwrap().dimensions.content.height, 50.0);
}

#[test]
fn test_background_paints_canvas_first() {
    init_logging();
    let tree = document("");
    let options = RenderOptions {
        viewport_width: 400.0,
        viewport_height: 300.0,
        ..RenderOptions::default()
    };
    let page = render(&tree, "html { background-color: #336699 }", &options).unwrap();

    let color = ColorValue::rgb(0x33, 0x66, 0x99);
    assert_eq!(page.background, Some(color));
    assert_eq!(
        page.display_list.commands()[0],
        DisplayCommand::SolidColor {
            color,
            rect: Rect::new(0.0, 0.0, 400.0, 300.0)
        }
    );
    // The root box does not paint the same color again over its border box.
    let fills = page
        .display_list
        .commands()
        .iter()
        .filter(|DisplayCommand::SolidColor { color: c, .. }| *c == color)
        .count();
    assert_eq!(fills, 1);
}

#[test]
fn test_without_user_agent_sheet() {
    let tree = document("");
    let options = RenderOptions {
        include_user_agent_sheet: false,
        ..RenderOptions::default()
    };
    let page = render(&tree, "", &options).unwrap();

    // Nothing is display: none or block, so head is laid out next to body.
    let layout = &page.layout;
    let html = layout.get(layout.root()).unwrap();
    assert_eq!(html.box_type, BoxType::Inline);
    assert_eq!(html.children.len(), 2);
    assert!(page.display_list.is_empty());
}

#[test]
fn test_hidden_root() {
    let tree = document("");
    let result = render(&tree, "html { display: none }", &RenderOptions::default());
    assert!(matches!(
        result,
        Err(RenderError::Layout(LayoutError::RootDisplayNone))
    ));
}

#[test]
fn test_untokenizable_author_sheet() {
    let tree = document("");
    let result = render(&tree, "p { color: red } /*", &RenderOptions::default());
    assert!(matches!(result, Err(RenderError::Stylesheet(_))));
}

#[test]
fn test_json_dump() {
    let tree = document("");
    let page = render(&tree, "div { border: 2px solid red }", &RenderOptions::default()).unwrap();
    let json = page.to_json().unwrap();
    assert!(json.contains("\"layout\""));
    assert!(json.contains("\"display_list\""));
    assert!(json.contains("SolidColor"));
    assert!(!json.contains("style_tree"));
}

#[test]
fn test_load_stylesheet_from_file() {
    init_logging();
    let path = std::env::temp_dir().join(format!("plume-load-{}.css", std::process::id()));
    fs::write(&path, "p { width: 10px } @media print { p { width: 0 } }").unwrap();

    let sheet = load_stylesheet(&path, 1).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(sheet.origin, 1);
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.at_rules.len(), 1);
}
