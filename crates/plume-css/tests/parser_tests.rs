//! Integration tests for stylesheet, declaration, and value parsing.

use plume_css::parser::{
    DeclarationParseError, ParseError, RuleParseError, parse_declaration_list, parse_stylesheet,
    parse_stylesheet_with_errors,
};
use plume_css::values::{ColorValue, CssValue, Unit};

#[test]
fn test_two_rule_stylesheet() {
    let sheet = parse_stylesheet(
        "body { background-color: lightblue; } p { font-size: 20px; }",
        1,
    )
    .unwrap();

    assert_eq!(sheet.rules.len(), 2);
    assert_eq!(sheet.rules[0].selectors[0].tag_name.as_deref(), Some("body"));

    let p = &sheet.rules[1];
    assert_eq!(p.declarations.len(), 1);
    assert_eq!(p.declarations[0].name, "font-size");
    assert_eq!(
        p.declarations[0].values,
        vec![CssValue::Dimension {
            value: 20.0,
            unit: Unit::Px
        }]
    );
    assert!(!p.declarations[0].important);
}

#[test]
fn test_errors_are_isolated() {
    let css = "
        h1 { color red; margin: 4px }
        :root { color: black }
        h2 { width: ; height: 3px !important }
        @media print { h3 { color: gray } }
        h4 { color: navy }
    ";
    let (sheet, errors) = parse_stylesheet_with_errors(css, 1).unwrap();

    let tags: Vec<_> = sheet
        .rules
        .iter()
        .map(|rule| rule.selectors[0].tag_name.clone().unwrap_or_default())
        .collect();
    assert_eq!(tags, ["h1", "h2", "h4"]);
    assert_eq!(sheet.at_rules.len(), 1);

    assert_eq!(errors.len(), 3);
    assert!(matches!(
        errors[0],
        ParseError::Declaration(DeclarationParseError::MissingColon { .. })
    ));
    assert!(matches!(errors[1], ParseError::Rule(RuleParseError::Selector(_))));
    assert!(matches!(
        errors[2],
        ParseError::Declaration(DeclarationParseError::EmptyValue { .. })
    ));

    let h2 = &sheet.rules[1].declarations;
    assert_eq!(h2.len(), 1);
    assert!(h2[0].important);
}

#[test]
fn test_tokenizer_failure_is_fatal() {
    assert!(parse_stylesheet("p { color: red } /* open", 1).is_err());
}

#[test]
fn test_calc_expression() {
    let decls = parse_declaration_list("width: calc(100% - 2 * 8px)").unwrap();
    let CssValue::Function { name, args } = &decls[0].values[0] else {
        panic!("expected calc()");
    };
    assert_eq!(name, "calc");
    assert_eq!(args.len(), 2);
    assert!(matches!(args[0], CssValue::Expression { op: '-', .. }));
    assert_eq!(args[1], CssValue::px(8.0));
}

#[test]
fn test_colors_in_values() {
    let decls = parse_declaration_list(
        "color: #11223344; border: 1px solid rgb(10, 20, 30); outline-color: #abc",
    )
    .unwrap();

    assert_eq!(
        decls[0].values,
        vec![CssValue::Color(ColorValue {
            r: 0x11,
            g: 0x22,
            b: 0x33,
            a: 0x44
        })]
    );
    assert_eq!(
        decls[1].values[2].to_color(),
        Some(ColorValue::rgb(10, 20, 30))
    );
    // Three-digit hashes are not supported and leave nothing behind.
    assert_eq!(decls.len(), 2);
}

#[test]
fn test_inline_style_with_trailing_semicolons() {
    let decls = parse_declaration_list(";; margin : 0 ;; padding:1px;").unwrap();
    let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["margin", "padding"]);
}
