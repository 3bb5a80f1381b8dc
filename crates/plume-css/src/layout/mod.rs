//! Block layout.
//!
//! Turns a [`StyleTree`](crate::cascade::StyleTree) into a box tree and
//! computes each box's content rectangle and edges following the
//! [CSS 2.1 visual formatting model](https://www.w3.org/TR/CSS2/visuren.html).
//!
//! Only vertical stacking is implemented: inline content is grouped into
//! anonymous blocks but never measured or broken into lines.
//!
//! # Module Structure
//!
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`values`] - `auto` handling and edge lookup with shorthand fallback
//! - [`layout_box`] - Box tree construction and the block layout algorithm

pub mod box_model;
pub mod layout_box;
pub mod values;

pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use layout_box::{BoxType, LayoutBox, LayoutBoxId, LayoutError, LayoutTree, layout_tree};
pub use values::{AutoOr, Side, edge_sizes, edge_value};
