//! Parser tests over the canonical type rendering.

use pretty_assertions::assert_eq;
use type_lattice_parser::{parse, ObjectExpr, ParseError, TypeExpr, TypeExprKind};

/// Strip spans so that trees can be compared structurally.
fn shape(expr: &TypeExpr) -> String {
    match &expr.kind {
        TypeExprKind::Named(n) => n.clone(),
        TypeExprKind::Matrix(n) => format!("Matrix({})", n),
        TypeExprKind::Array { element, length } => {
            format!("Array({}, {:?})", shape(element), length)
        }
        TypeExprKind::Record(fields) => format!(
            "Record[{}]",
            fields
                .iter()
                .map(|f| format!("{}: {}", f.label, shape(&f.ty)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        TypeExprKind::Union(fields) => format!(
            "Union[{}]",
            fields
                .iter()
                .map(|f| format!("{}: {}", f.label, shape(&f.ty)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        TypeExprKind::Function { args, ret } => format!(
            "Function({}) -> {}",
            args.iter()
                .map(|a| shape(&a.ty))
                .collect::<Vec<_>>()
                .join(", "),
            shape(ret)
        ),
        TypeExprKind::Object(obj) => format!("Object({:?})", obj),
    }
}

fn parse_shape(source: &str) -> String {
    shape(&parse(source).unwrap_or_else(|e| panic!("failed to parse {:?}: {}", source, e)))
}

#[test]
fn test_base_names() {
    assert_eq!(parse_shape("int"), "int");
    assert_eq!(parse_shape("  unsignedByte "), "unsignedByte");
}

#[test]
fn test_matrix() {
    assert_eq!(parse_shape("[double]"), "Matrix(double)");
}

#[test]
fn test_arrays() {
    assert_eq!(parse_shape("{int}"), "Array(int, None)");
    assert_eq!(parse_shape("arrayType(double,3)"), "Array(double, Some(3))");
    assert_eq!(parse_shape("arrayType(int)"), "Array(int, None)");
    assert_eq!(parse_shape("{{string}}"), "Array(Array(string, None), None)");
}

#[test]
fn test_nested_record_and_union() {
    assert_eq!(
        parse_shape("{pos = {x = double, y = double}, tag = {|a = int, b = {int}|}}"),
        "Record[pos: Record[x: double, y: double], tag: Union[a: int, b: Array(int, None)]]"
    );
    assert_eq!(parse_shape("{||}"), "Union[]");
}

#[test]
fn test_function() {
    assert_eq!(
        parse_shape("(function(a0:int, a1:{int}) boolean)"),
        "Function(int, Array(int, None)) -> boolean"
    );
    assert_eq!(parse_shape("(function() general)"), "Function() -> general");
}

#[test]
fn test_objects() {
    assert_eq!(parse_shape("object"), format!("Object({:?})", ObjectExpr::Unconstrained));
    assert_eq!(parse_shape("object()"), format!("Object({:?})", ObjectExpr::Impossible));
    let expr = parse("object(Actor/Source/Ramp)").unwrap();
    assert_eq!(
        expr.kind,
        TypeExprKind::Object(ObjectExpr::Class(vec![
            "Actor".to_string(),
            "Source".to_string(),
            "Ramp".to_string(),
        ]))
    );
}

#[test]
fn test_size_counts_nested_expressions() {
    let expr = parse("{a = {int}, b = (function(x:int) double)}").unwrap();
    assert_eq!(expr.size(), 6);
}

#[test]
fn test_unclosed_record_reports_eof() {
    let err = parse("{x = int").unwrap_err();
    assert!(
        matches!(err, ParseError::UnexpectedEof { .. }),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_missing_field_type() {
    let err = parse("{x = }").unwrap_err();
    assert!(
        matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "}"),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_oversized_length_is_invalid_number() {
    let err = parse("arrayType(int,99999999999999999999999)").unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { .. }), "{:?}", err);
}

#[test]
fn test_error_context_points_at_token() {
    let source = "{x = int; y = int}";
    let err = parse(source).unwrap_err();
    let context = err.format_with_context(source);
    assert!(context.contains("^"), "{}", context);
    assert!(matches!(err, ParseError::LexerError { .. }), "{:?}", err);
}
