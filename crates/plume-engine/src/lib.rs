//! Render pipeline for the Plume style engine.
//!
//! # Scope
//!
//! This crate ties the stages together:
//! - **Stylesheet Loading** - CSS files and `<style>` element text
//! - **Style Computation** - user-agent, author and inline styles cascaded
//!   over a [`DomTree`]
//! - **Layout** - block layout against the viewport width
//! - **Paint** - a display list of solid fills, plus a JSON dump of the result
//!
//! # Not Yet Implemented
//!
//! - External stylesheets (`<link rel="stylesheet">`)
//! - Rasterizing the display list

pub mod loader;

pub use plume_css as css;
pub use plume_dom as dom;

pub use loader::{extract_style_content, load_stylesheet};

use plume_common::warning::clear_warnings;
use plume_css::{
    AUTHOR_ORIGIN, BoxDimensions, ColorValue, DisplayList, LayoutError, LayoutTree, Rect,
    StyleTree, Stylesheet, TokenError, USER_AGENT_ORIGIN, build_page_display_list, layout_tree,
    parse_stylesheet, root_background, style_tree, ua_stylesheet,
};
use plume_dom::DomTree;
use serde::Serialize;
use thiserror::Error;

/// Viewport and stylesheet settings for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Width of the initial containing block in px.
    pub viewport_width: f32,
    /// Height of the canvas the root background fills, in px.
    pub viewport_height: f32,
    /// Whether the built-in user-agent sheet takes part in the cascade.
    pub include_user_agent_sheet: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            include_user_agent_sheet: true,
        }
    }
}

/// Errors that stop a render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The author stylesheet could not be tokenized.
    #[error("author stylesheet: {0}")]
    Stylesheet(#[from] TokenError),
    /// The document root could not be laid out.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Everything one render produces.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    /// The cascaded style tree the layout was built from.
    #[serde(skip)]
    pub style_tree: StyleTree,
    /// The laid-out box tree.
    pub layout: LayoutTree,
    /// The root element's background, which also paints the canvas.
    pub background: Option<ColorValue>,
    /// Fills in painting order.
    pub display_list: DisplayList,
}

impl RenderedPage {
    /// Serialize the layout, background and display list as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Style, lay out and paint `tree` with `author_css` as the author sheet.
///
/// The user-agent sheet (when enabled) cascades below the author sheet, and
/// each element's `style` attribute above both. The root is the document
/// element, or the document node itself when there is none.
///
/// # Errors
///
/// Returns [`RenderError::Stylesheet`] if `author_css` cannot be tokenized
/// and [`RenderError::Layout`] if the root is `display: none`.
pub fn render(
    tree: &DomTree,
    author_css: &str,
    options: &RenderOptions,
) -> Result<RenderedPage, RenderError> {
    clear_warnings();

    let mut stylesheets: Vec<Stylesheet> = Vec::with_capacity(2);
    if options.include_user_agent_sheet {
        let ua = ua_stylesheet();
        log::info!(
            "user-agent sheet (origin {USER_AGENT_ORIGIN}): {} rules",
            ua.rules.len()
        );
        stylesheets.push(ua.clone());
    }
    let author = parse_stylesheet(author_css, AUTHOR_ORIGIN)?;
    log::info!(
        "author sheet (origin {AUTHOR_ORIGIN}): {} rules",
        author.rules.len()
    );
    stylesheets.push(author);

    let root = tree.document_element().unwrap_or_else(|| tree.root());
    let styles = style_tree(tree, root, &stylesheets);
    let layout = layout_tree(
        &styles,
        styles.root(),
        BoxDimensions::viewport(options.viewport_width),
    )?;

    let background = root_background(&styles);
    let canvas = Rect::new(0.0, 0.0, options.viewport_width, options.viewport_height);
    let display_list = build_page_display_list(&layout, &styles, canvas);

    log::info!(
        "rendered {} boxes, {} display commands",
        layout.len(),
        display_list.len()
    );

    Ok(RenderedPage {
        style_tree: styles,
        layout,
        background,
        display_list,
    })
}

/// [`render`] with the document's own `<style>` elements as the author sheet.
///
/// # Errors
///
/// See [`render`].
pub fn render_document(
    tree: &DomTree,
    options: &RenderOptions,
) -> Result<RenderedPage, RenderError> {
    render(tree, &extract_style_content(tree), options)
}
