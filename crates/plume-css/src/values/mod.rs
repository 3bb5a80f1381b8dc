//! Typed CSS values.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Declarations carry their values as a list of [`CssValue`]s produced by
//! [`parse_css_value`]. Only the `px` unit resolves to a length; every other
//! unit is parsed and kept but resolves to zero.

use core::fmt;

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Color values and the named color table.
pub mod color;
/// Component values to typed values.
pub mod parse;

pub use color::ColorValue;
pub use parse::parse_css_value;

/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Units recognized on dimension tokens. Parsing is ASCII case-insensitive;
/// unknown units and bare numbers map to [`Unit::Unitless`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// `px`, the only unit resolved during layout
    Px,
    /// `em`
    Em,
    /// `ex`
    Ex,
    /// `cap`
    Cap,
    /// `ch`
    Ch,
    /// `ic`
    Ic,
    /// `rem`
    Rem,
    /// `lh`
    Lh,
    /// `rlh`
    Rlh,
    /// `vw`
    Vw,
    /// `vh`
    Vh,
    /// `vi`
    Vi,
    /// `vb`
    Vb,
    /// `vmin`
    Vmin,
    /// `vmax`
    Vmax,
    /// A percentage token.
    #[strum(serialize = "%")]
    Percent,
    /// A plain number, or a unit this engine does not know.
    #[strum(serialize = "")]
    Unitless,
}

impl Unit {
    /// Map a dimension token's unit text to a [`Unit`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::Unitless)
    }
}

/// A single typed CSS value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CssValue {
    /// An identifier such as `auto`, `block` or `lightblue`.
    Keyword(String),
    /// A number with an optional unit. Percentages use [`Unit::Percent`].
    Dimension {
        /// The numeric value.
        value: f32,
        /// The unit.
        unit: Unit,
    },
    /// A color written as a hex hash.
    Color(ColorValue),
    /// A function call, e.g. `rgb(1, 2, 3)` or `calc(100px - 20px)`.
    Function {
        /// The function name without the parenthesis.
        name: String,
        /// The parsed arguments.
        args: Vec<CssValue>,
    },
    /// One binary operation between two operands, e.g. `100px - 20px`.
    Expression {
        /// Left operand.
        left: Box<CssValue>,
        /// One of `+ - * /`.
        op: char,
        /// Right operand.
        right: Box<CssValue>,
    },
}

impl CssValue {
    /// A keyword value.
    #[must_use]
    pub fn keyword(name: impl Into<String>) -> Self {
        Self::Keyword(name.into())
    }

    /// A pixel length.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self::Dimension {
            value,
            unit: Unit::Px,
        }
    }

    /// A unitless number.
    #[must_use]
    pub const fn number(value: f32) -> Self {
        Self::Dimension {
            value,
            unit: Unit::Unitless,
        }
    }

    /// The keyword text, if this is a keyword.
    #[must_use]
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(k) => Some(k),
            _ => None,
        }
    }

    /// ASCII case-insensitive keyword comparison.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_keyword()
            .is_some_and(|k| k.eq_ignore_ascii_case(keyword))
    }

    /// Whether this is the `auto` keyword.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.is_keyword("auto")
    }

    /// Whether this value is a number, percentage or dimension.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Dimension { .. })
    }

    /// Resolve to pixels. Only `px` dimensions resolve; everything else is 0.
    #[must_use]
    pub const fn to_px(&self) -> f32 {
        match self {
            Self::Dimension {
                value,
                unit: Unit::Px,
            } => *value,
            _ => 0.0,
        }
    }

    /// Resolve to a color: hex colors, named color keywords, and
    /// `rgb()`/`rgba()` functions. Anything else is "no color".
    #[must_use]
    pub fn to_color(&self) -> Option<ColorValue> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Keyword(name) => ColorValue::from_named(name),
            Self::Function { name, args }
                if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
            {
                ColorValue::from_rgb_function(args)
            }
            _ => None,
        }
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(k) => write!(f, "{k}"),
            Self::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Self::Color(color) => write!(f, "{}", color.to_hex_string()),
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Expression { left, op, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_names() {
        assert_eq!(Unit::from_name("px"), Unit::Px);
        assert_eq!(Unit::from_name("PX"), Unit::Px);
        assert_eq!(Unit::from_name("vmin"), Unit::Vmin);
        assert_eq!(Unit::from_name("furlong"), Unit::Unitless);
        assert_eq!(Unit::Rem.to_string(), "rem");
    }

    #[test]
    fn test_only_px_resolves() {
        assert!((CssValue::px(12.5).to_px() - 12.5).abs() < f32::EPSILON);
        let em = CssValue::Dimension {
            value: 2.0,
            unit: Unit::Em,
        };
        assert!(em.to_px().abs() < f32::EPSILON);
        assert!(CssValue::keyword("auto").to_px().abs() < f32::EPSILON);
    }

    #[test]
    fn test_keyword_to_color() {
        assert_eq!(CssValue::keyword("white").to_color(), Some(ColorValue::WHITE));
        assert_eq!(CssValue::keyword("bogus").to_color(), None);
        assert_eq!(CssValue::px(1.0).to_color(), None);
    }

    #[test]
    fn test_display() {
        let value = CssValue::Function {
            name: "calc".to_string(),
            args: vec![CssValue::Expression {
                left: Box::new(CssValue::px(100.0)),
                op: '-',
                right: Box::new(CssValue::Dimension {
                    value: 20.0,
                    unit: Unit::Percent,
                }),
            }],
        };
        assert_eq!(value.to_string(), "calc(100px - 20%)");
    }
}
