//! Stylesheet sources: CSS files on disk and `<style>` elements in a document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use plume_css::{Stylesheet, parse_stylesheet};
use plume_dom::{DomTree, NodeId, NodeType};

/// Read a CSS file and parse it with the given cascade origin.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents cannot be
/// tokenized.
pub fn load_stylesheet(path: impl AsRef<Path>, origin: u32) -> Result<Stylesheet> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read stylesheet '{}'", path.display()))?;
    let stylesheet = parse_stylesheet(&text, origin)
        .with_context(|| format!("failed to tokenize stylesheet '{}'", path.display()))?;

    log::info!(
        "loaded '{}': {} rules, {} at-rules",
        path.display(),
        stylesheet.rules.len(),
        stylesheet.at_rules.len()
    );
    Ok(stylesheet)
}

/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Collect the text of every `<style>` element in document order, one
/// element per line.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> String {
    let mut css = String::new();
    collect_style_content(tree, tree.root(), &mut css);
    css
}

fn collect_style_content(tree: &DomTree, id: NodeId, css: &mut String) {
    let Some(node) = tree.get(id) else { return };

    match &node.node_type {
        NodeType::Element(data) if data.tag_name.eq_ignore_ascii_case("style") => {
            css.push_str(&tree.text_content(id));
            css.push('\n');
            // Markup nested in <style> is not stylesheet text.
            return;
        }
        _ => {}
    }

    for &child in tree.children(id) {
        collect_style_content(tree, child, css);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_dom::ElementData;

    #[test]
    fn test_style_elements_in_document_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let html = tree.append_element(root, ElementData::new("html"));
        let head = tree.append_element(html, ElementData::new("head"));
        let first = tree.append_element(head, ElementData::new("STYLE"));
        let _ = tree.append_text(first, "p { width: 1px }");
        let body = tree.append_element(html, ElementData::new("body"));
        let _ = tree.append_text(body, "div { width: 2px }");
        let second = tree.append_element(body, ElementData::new("style"));
        let _ = tree.append_text(second, "h1 { width: 3px }");

        assert_eq!(
            extract_style_content(&tree),
            "p { width: 1px }\nh1 { width: 3px }\n"
        );
    }

    #[test]
    fn test_no_style_elements() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let _ = tree.append_element(root, ElementData::new("html"));
        assert!(extract_style_content(&tree).is_empty());
    }

    #[test]
    fn test_missing_file_has_context() {
        let error = load_stylesheet("/nonexistent/plume/missing.css", 1).unwrap_err();
        assert!(format!("{error:#}").contains("missing.css"));
    }
}
