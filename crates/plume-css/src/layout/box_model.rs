//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::Serialize;

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoxDimensions {
    /// Content area, positioned in page coordinates.
    pub content: Rect,
    /// Padding widths around the content.
    pub padding: EdgeSizes,
    /// Border widths around the padding.
    pub border: EdgeSizes,
    /// Margin widths around the border.
    pub margin: EdgeSizes,
}

/// A rectangle positioned in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

/// Edge sizes for padding, border, or margin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EdgeSizes {
    /// Left edge size.
    pub left: f32,
    /// Right edge size.
    pub right: f32,
    /// Top edge size.
    pub top: f32,
    /// Bottom edge size.
    pub bottom: f32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Grow the rectangle outwards by `edge` on every side.
    ///
    /// ```text
    /// x      = x - edge.left
    /// y      = y - edge.top
    /// width  = width + edge.left + edge.right
    /// height = height + edge.top + edge.bottom
    /// ```
    #[must_use]
    pub fn expanded_by(self, edge: EdgeSizes) -> Self {
        Self {
            x: self.x - edge.left,
            y: self.y - edge.top,
            width: self.width + edge.left + edge.right,
            height: self.height + edge.top + edge.bottom,
        }
    }
}

impl EdgeSizes {
    /// The same size on all four sides.
    #[must_use]
    pub const fn uniform(size: f32) -> Self {
        Self {
            left: size,
            right: size,
            top: size,
            bottom: size,
        }
    }
}

impl BoxDimensions {
    // ┌─────────────────────────────────────────┐
    // │              margin                     │
    // │   ┌─────────────────────────────────┐   │
    // │   │          border                 │   │
    // │   │   ┌─────────────────────────┐   │   │
    // │   │   │      padding            │   │   │
    // │   │   │   ┌─────────────────┐   │   │   │
    // │   │   │   │     CONTENT     │   │   │   │
    // │   │   │   └─────────────────┘   │   │   │
    // │   │   └─────────────────────────┘   │   │
    // │   └─────────────────────────────────┘   │
    // └─────────────────────────────────────────┘

    /// A containing block for the initial layout pass: `width` wide, zero
    /// height, at the origin.
    #[must_use]
    pub const fn viewport(width: f32) -> Self {
        Self {
            content: Rect::new(0.0, 0.0, width, 0.0),
            padding: EdgeSizes::uniform(0.0),
            border: EdgeSizes::uniform(0.0),
            margin: EdgeSizes::uniform(0.0),
        }
    }

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.expanded_by(self.padding)
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.padding_box().expanded_by(self.border)
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(self.margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_boxes() {
        let dims = BoxDimensions {
            content: Rect::new(20.0, 30.0, 100.0, 50.0),
            padding: EdgeSizes::uniform(5.0),
            border: EdgeSizes {
                left: 1.0,
                right: 2.0,
                top: 3.0,
                bottom: 4.0,
            },
            margin: EdgeSizes::uniform(10.0),
        };

        assert_eq!(dims.padding_box(), Rect::new(15.0, 25.0, 110.0, 60.0));
        assert_eq!(dims.border_box(), Rect::new(14.0, 22.0, 113.0, 67.0));
        assert_eq!(dims.margin_box(), Rect::new(4.0, 12.0, 133.0, 87.0));
    }

    #[test]
    fn test_viewport() {
        let dims = BoxDimensions::viewport(800.0);
        assert_eq!(dims.margin_box(), Rect::new(0.0, 0.0, 800.0, 0.0));
    }
}
