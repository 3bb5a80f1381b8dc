//! CSS Painting
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! Converts a laid-out box tree into a display list of solid fills that any
//! renderer can execute.
//!
//! ```text
//! Style → Layout → Paint → Render
//!                    ↓
//!              DisplayList
//! ```

mod display_list;

pub use display_list::{
    DisplayCommand, DisplayList, background_color, build_display_list, build_page_display_list,
};
