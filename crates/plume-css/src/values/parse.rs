//! Conversion of declaration component values into [`CssValue`]s.

use crate::parser::ComponentValue;
use crate::tokenizer::CSSToken;

use super::{ColorValue, CssValue, Unit};

/// Parse a declaration's component values into typed values, left to right.
///
/// - idents become [`CssValue::Keyword`]
/// - 6 or 8 digit hashes become [`CssValue::Color`]; other hashes are dropped
/// - functions become [`CssValue::Function`] with recursively parsed arguments
/// - numbers, percentages and dimensions become [`CssValue::Dimension`]; when
///   the next non-whitespace item is a `+ - * /` delim, the following operand
///   is consumed too and the pair becomes one [`CssValue::Expression`]
///
/// Whitespace and tokens with no value mapping (strings, commas, stray
/// delims) are skipped. An operator with no right operand is dropped, but its
/// left operand is still kept as a value of its own rather than discarded
/// with it.
#[must_use]
pub fn parse_css_value(input: &[ComponentValue]) -> Vec<CssValue> {
    let mut values = Vec::new();
    let mut i = 0;

    while let Some(item) = input.get(i) {
        i += 1;
        let Some(left) = parse_single(item) else {
            continue;
        };
        if !left.is_numeric() {
            values.push(left);
            continue;
        }

        let op_index = skip_whitespace(input, i);
        let Some(op) = input.get(op_index).and_then(infix_operator) else {
            values.push(left);
            continue;
        };

        let right_index = skip_whitespace(input, op_index + 1);
        match input.get(right_index).and_then(parse_single) {
            Some(right) => {
                values.push(CssValue::Expression {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                });
                i = right_index + 1;
            }
            None => {
                values.push(left);
                i = op_index + 1;
            }
        }
    }

    values
}

/// Map one component value to a typed value, if it has one.
fn parse_single(item: &ComponentValue) -> Option<CssValue> {
    match item {
        ComponentValue::Token(token) => match token {
            CSSToken::Ident(name) => Some(CssValue::Keyword(name.clone())),
            CSSToken::Hash { value, .. } => ColorValue::from_hex(value).map(CssValue::Color),
            CSSToken::Number { value, .. } => Some(CssValue::number(*value)),
            CSSToken::Percentage(value) => Some(CssValue::Dimension {
                value: *value,
                unit: Unit::Percent,
            }),
            CSSToken::Dimension { value, unit } => Some(CssValue::Dimension {
                value: *value,
                unit: Unit::from_name(unit),
            }),
            _ => None,
        },
        ComponentValue::Function { name, value } => Some(CssValue::Function {
            name: name.clone(),
            args: parse_css_value(value),
        }),
        ComponentValue::Block { .. } => None,
    }
}

fn infix_operator(item: &ComponentValue) -> Option<char> {
    match item {
        ComponentValue::Token(CSSToken::Delim(op @ ('+' | '-' | '*' | '/'))) => Some(*op),
        _ => None,
    }
}

fn skip_whitespace(input: &[ComponentValue], mut index: usize) -> usize {
    while matches!(input.get(index), Some(ComponentValue::Token(CSSToken::Whitespace))) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: Vec<CSSToken>) -> Vec<ComponentValue> {
        list.into_iter().map(ComponentValue::Token).collect()
    }

    #[test]
    fn test_keywords_and_dimensions() {
        let input = tokens(vec![
            CSSToken::ident("solid"),
            CSSToken::Whitespace,
            CSSToken::dimension(2.0, "px"),
            CSSToken::Whitespace,
            CSSToken::hash_unrestricted("00ff00"),
        ]);
        assert_eq!(
            parse_css_value(&input),
            vec![
                CssValue::keyword("solid"),
                CssValue::px(2.0),
                CssValue::Color(ColorValue::rgb(0, 255, 0)),
            ]
        );
    }

    #[test]
    fn test_short_hash_is_dropped() {
        let input = tokens(vec![CSSToken::hash_id("abc")]);
        assert!(parse_css_value(&input).is_empty());
    }

    #[test]
    fn test_binary_expression() {
        let input = vec![ComponentValue::Function {
            name: "calc".to_string(),
            value: tokens(vec![
                CSSToken::Percentage(100.0),
                CSSToken::Delim('-'),
                CSSToken::dimension(20.0, "px"),
            ]),
        }];
        let expected = CssValue::Function {
            name: "calc".to_string(),
            args: vec![CssValue::Expression {
                left: Box::new(CssValue::Dimension {
                    value: 100.0,
                    unit: Unit::Percent,
                }),
                op: '-',
                right: Box::new(CssValue::px(20.0)),
            }],
        };
        assert_eq!(parse_css_value(&input), vec![expected]);
    }

    #[test]
    fn test_expression_is_one_level_only() {
        let input = tokens(vec![
            CSSToken::integer(1.0),
            CSSToken::Whitespace,
            CSSToken::Delim('+'),
            CSSToken::Whitespace,
            CSSToken::integer(2.0),
            CSSToken::Whitespace,
            CSSToken::Delim('*'),
            CSSToken::Whitespace,
            CSSToken::integer(3.0),
        ]);
        let values = parse_css_value(&input);
        assert_eq!(values.len(), 2);
        assert!(matches!(values[0], CssValue::Expression { op: '+', .. }));
        assert!(matches!(values[1], CssValue::Dimension { .. }));
    }

    #[test]
    fn test_dangling_operator_keeps_left_operand() {
        let input = tokens(vec![
            CSSToken::dimension(5.0, "px"),
            CSSToken::Whitespace,
            CSSToken::Delim('*'),
        ]);
        assert_eq!(parse_css_value(&input), vec![CssValue::px(5.0)]);
    }
}
