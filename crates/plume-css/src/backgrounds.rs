//! [CSS Backgrounds and Borders Module Level 3](https://www.w3.org/TR/css-backgrounds-3/)

use crate::cascade::StyleTree;
use crate::paint::background_color;
use crate::values::ColorValue;

/// [§ 2.11.2 The Canvas Background](https://www.w3.org/TR/css-backgrounds-3/#special-backgrounds)
///
/// "The background of the root element becomes the canvas background."
///
/// Reads `background-color`, falling back to the `background` shorthand, on
/// the root of `styles`. `None` when neither yields a color.
#[must_use]
pub fn root_background(styles: &StyleTree) -> Option<ColorValue> {
    styles
        .get(styles.root())
        .and_then(|root| background_color(&root.specified_values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::style_tree;
    use crate::parser::parse_stylesheet;
    use plume_dom::{DomTree, ElementData};

    fn background(css: &str) -> Option<ColorValue> {
        let mut tree = DomTree::new();
        let root = tree.root();
        let html = tree.append_element(root, ElementData::new("html"));
        let sheet = parse_stylesheet(css, 1).unwrap();
        root_background(&style_tree(&tree, html, &[sheet]))
    }

    #[test]
    fn test_root_background() {
        assert_eq!(background("html { background-color: white }"), Some(ColorValue::WHITE));
        assert_eq!(
            background("html { background: url(x.png) LightBlue }"),
            Some(ColorValue::rgb(173, 216, 230))
        );
        assert_eq!(background("html { background-color: nonsense }"), None);
        assert_eq!(background("body { background-color: red }"), None);
    }
}
