//! Used-value helpers for layout: `auto`, sides, and edge lookup with
//! shorthand fallback.

use strum_macros::Display;

use crate::cascade::PropertyMap;
use crate::values::{CssValue, Unit};

use super::box_model::EdgeSizes;

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value."
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    Auto,
    /// A length in pixels. Units other than `px` count as zero.
    Length(f32),
}

impl AutoOr {
    /// Classify a specified value; a missing value is a zero length.
    #[must_use]
    pub fn from_value(value: Option<&CssValue>) -> Self {
        match value {
            Some(value) if value.is_auto() => Self::Auto,
            Some(value) => Self::Length(value.to_px()),
            None => Self::Length(0.0),
        }
    }

    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The length, or `0` for 'auto'.
    #[must_use]
    pub const fn to_px(self) -> f32 {
        match self {
            Self::Length(v) => v,
            Self::Auto => 0.0,
        }
    }
}

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// Top edge.
    Top,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
    /// Left edge.
    Left,
}

impl Side {
    /// [§ 2 Shorthand properties](https://www.w3.org/TR/css-cascade-4/#shorthand)
    ///
    /// Which of a 1-4 value box shorthand's values applies to this side:
    /// `top [right [bottom [left]]]`, with right defaulting to top, bottom to
    /// top and left to right.
    #[must_use]
    pub const fn shorthand_index(self, len: usize) -> Option<usize> {
        let index = match (len, self) {
            (0, _) => return None,
            (1, _) | (2 | 3, Self::Top) | (2, Self::Bottom) => 0,
            (2 | 3, Self::Right | Self::Left) => 1,
            (3, Self::Bottom) => 2,
            (_, Self::Top) => 0,
            (_, Self::Right) => 1,
            (_, Self::Bottom) => 2,
            (_, Self::Left) => 3,
        };
        Some(index)
    }
}

/// The specified value of one side of `margin`, `padding` or `border`.
///
/// Tries the longhand (`margin-left`, `border-left-width`), then the box
/// shorthand (`margin`, `border-width`), then for borders the first length in
/// `border-left` or `border`.
#[must_use]
pub fn edge_value<'a>(props: &'a PropertyMap, property: &str, side: Side) -> Option<&'a CssValue> {
    let is_border = property == "border";
    let (longhand, shorthand) = if is_border {
        (format!("border-{side}-width"), "border-width")
    } else {
        (format!("{property}-{side}"), property)
    };

    if let Some(value) = props.value(&longhand) {
        return Some(value);
    }

    let values = props.values(shorthand);
    if let Some(value) = side.shorthand_index(values.len()).and_then(|i| values.get(i)) {
        return Some(value);
    }

    if is_border {
        let side_shorthand = format!("border-{side}");
        return [side_shorthand.as_str(), "border"]
            .into_iter()
            .find_map(|name| props.values(name).iter().find(|v| v.is_numeric()));
    }

    None
}

/// All four sides of `property` resolved to pixels. `auto` counts as zero.
#[must_use]
pub fn edge_sizes(props: &PropertyMap, property: &str) -> EdgeSizes {
    let px = |side| AutoOr::from_value(edge_value(props, property, side)).to_px();
    EdgeSizes {
        left: px(Side::Left),
        right: px(Side::Right),
        top: px(Side::Top),
        bottom: px(Side::Bottom),
    }
}

/// An explicit pixel length; every other unit and keyword yields `None`.
#[must_use]
pub const fn explicit_px(value: Option<&CssValue>) -> Option<f32> {
    match value {
        Some(CssValue::Dimension {
            value,
            unit: Unit::Px,
        }) => Some(*value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_declaration_list;

    fn props(css: &str) -> PropertyMap {
        let mut map = PropertyMap::new();
        for declaration in parse_declaration_list(css).unwrap() {
            map.insert(declaration);
        }
        map
    }

    #[test]
    fn test_shorthand_expansion() {
        let map = props("margin: 1px 2px 3px");
        let px = |side| AutoOr::from_value(edge_value(&map, "margin", side)).to_px();
        assert_eq!(px(Side::Top), 1.0);
        assert_eq!(px(Side::Right), 2.0);
        assert_eq!(px(Side::Bottom), 3.0);
        assert_eq!(px(Side::Left), 2.0);

        let map = props("padding: 4px");
        assert_eq!(edge_sizes(&map, "padding"), EdgeSizes::uniform(4.0));
    }

    #[test]
    fn test_longhand_wins() {
        let map = props("margin: 0 auto; margin-left: 7px");
        assert_eq!(
            AutoOr::from_value(edge_value(&map, "margin", Side::Left)),
            AutoOr::Length(7.0)
        );
        assert!(AutoOr::from_value(edge_value(&map, "margin", Side::Right)).is_auto());
    }

    #[test]
    fn test_border_fallbacks() {
        let map = props("border: 2px solid black; border-top: 5px dashed; border-bottom-width: 1px");
        let border = edge_sizes(&map, "border");
        assert_eq!(border.top, 5.0);
        assert_eq!(border.bottom, 1.0);
        assert_eq!(border.left, 2.0);
        assert_eq!(border.right, 2.0);
    }

    #[test]
    fn test_non_px_units_are_zero() {
        let map = props("padding: 2em 10%");
        assert_eq!(edge_sizes(&map, "padding"), EdgeSizes::default());
        assert_eq!(explicit_px(map.value("padding")), None);
    }
}
