use super::*;
use crate::error::TypeError;

fn ty(s: &str) -> Type {
    s.parse().unwrap()
}

// ==================== Rendering and parsing ====================

#[test]
fn test_display_forms() {
    assert_eq!(Type::INT.to_string(), "int");
    assert_eq!(Type::matrix(MatrixKind::Double).to_string(), "[double]");
    assert_eq!(Type::matrix(MatrixKind::Generic).to_string(), "matrix");
    assert_eq!(Type::array(Type::INT).to_string(), "{int}");
    assert_eq!(
        Type::array_of_length(Type::DOUBLE, 3).to_string(),
        "arrayType(double,3)"
    );
    assert_eq!(
        Type::record([("y", Type::INT), ("x", Type::DOUBLE)])
            .unwrap()
            .to_string(),
        "{x = double, y = int}"
    );
    assert_eq!(
        Type::union([("a", Type::INT)]).unwrap().to_string(),
        "{|a = int|}"
    );
    assert_eq!(
        Type::function([Type::INT, Type::INT], Type::BOOLEAN).to_string(),
        "(function(a0:int, a1:int) boolean)"
    );
    assert_eq!(Type::Object(ObjectType::unconstrained()).to_string(), "object");
    assert_eq!(Type::Object(ObjectType::impossible()).to_string(), "object()");
    assert_eq!(Type::object(["Actor", "Source"]).to_string(), "object(Actor/Source)");
}

#[test]
fn test_parse_round_trip() {
    for source in [
        "unknown",
        "unsignedByte",
        "[fixedpoint]",
        "matrix",
        "{{int}}",
        "arrayType({double},2)",
        "{}",
        "{||}",
        "{a = {b = int}, c = {|d = string|}}",
        "(function() unknown)",
        "(function(a0:{int}) {x = double})",
        "object(A/B/C)",
        "object()",
    ] {
        assert_eq!(ty(source).to_string(), source);
    }
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        "integer".parse::<Type>().unwrap_err(),
        TypeError::UnknownTypeName("integer".to_string())
    );
    assert_eq!(
        "{a = int, a = double}".parse::<Type>().unwrap_err(),
        TypeError::DuplicateLabel("a".to_string())
    );
    assert!(matches!(
        "{a = int".parse::<Type>(),
        Err(TypeError::Parse(_))
    ));
}

// ==================== Classification ====================

#[test]
fn test_constant_and_instantiable() {
    assert!(Type::INT.is_constant());
    assert!(!Type::UNKNOWN.is_constant());
    assert!(Type::GENERAL.is_constant());
    assert!(!Type::GENERAL.is_instantiable());
    assert!(!Type::SCALAR.is_instantiable());
    assert!(!Type::matrix(MatrixKind::Generic).is_instantiable());

    assert!(!ty("{x = unknown, y = int}").is_constant());
    assert!(ty("{x = double, y = int}").is_constant());
    assert!(ty("{x = double, y = int}").is_instantiable());
    assert!(!ty("{general}").is_instantiable());
    assert!(ty("object(A)").is_constant());
    assert!(!ty("object()").is_instantiable());
}

#[test]
fn test_shape_and_representative() {
    assert_eq!(Type::INT.shape(), None);
    assert_eq!(ty("{int}").shape(), Some(TypeShape::Array));
    assert_eq!(ty("{||}").shape(), Some(TypeShape::Union));
    assert!(Type::UNKNOWN.is_bound());
    assert!(!Type::INT.is_bound());
    assert_eq!(
        Type::from_node(ty("{x = int}").representative()),
        ty("{}")
    );
    assert_eq!(
        Type::from_node(ty("(function(a0:int) int)").representative()),
        ty("(function() unknown)")
    );
}

#[test]
fn test_depth() {
    assert_eq!(Type::INT.depth(), 1);
    assert_eq!(ty("{{int}}").depth(), 3);
    assert_eq!(ty("{}").depth(), 1);
    assert_eq!(ty("{a = {int}, b = int}").depth(), 3);
    assert_eq!(ty("(function(a0:{int}) int)").depth(), 3);
}

// ==================== Substitution and update ====================

#[test]
fn test_substitution_instance() {
    let template = ty("{x = unknown, y = int}");
    assert!(template.is_substitution_instance(&ty("{x = {double}, y = int}")));
    assert!(!template.is_substitution_instance(&ty("{x = double, y = long}")));
    assert!(!template.is_substitution_instance(&ty("{x = double}")));

    assert!(ty("{unknown}").is_substitution_instance(&ty("arrayType(int,4)")));
    assert!(!ty("arrayType(unknown,2)").is_substitution_instance(&ty("arrayType(int,4)")));
    assert!(Type::UNKNOWN.is_substitution_instance(&ty("object(A)")));
    assert!(!Type::INT.is_substitution_instance(&Type::DOUBLE));
}

#[test]
fn test_update_type_refines_in_place() {
    let mut record = ty("{x = unknown, y = int}");
    record.update_type(&ty("{x = double, y = int}")).unwrap();
    assert_eq!(record, ty("{x = double, y = int}"));

    let mut array = ty("{unknown}");
    array.update_type(&ty("arrayType(int,3)")).unwrap();
    assert_eq!(array, ty("arrayType(int,3)"));

    let mut function = ty("(function(a0:unknown) unknown)");
    function
        .update_type(&ty("(function(a0:int) boolean)"))
        .unwrap();
    assert_eq!(function, ty("(function(a0:int) boolean)"));
}

#[test]
fn test_update_type_errors() {
    let mut constant = Type::INT;
    assert!(matches!(
        constant.update_type(&Type::DOUBLE),
        Err(TypeError::ConstantType { .. })
    ));
    assert!(constant.update_type(&Type::INT).is_ok());

    let mut record = ty("{x = unknown}");
    assert!(matches!(
        record.update_type(&ty("{y = int}")),
        Err(TypeError::NotSubstitutionInstance { .. })
    ));
    assert!(matches!(
        record.update_type(&ty("{int}")),
        Err(TypeError::NotSubstitutionInstance { .. })
    ));
    assert_eq!(record, ty("{x = unknown}"));

    let mut function = ty("(function(a0:unknown) int)");
    assert!(function
        .update_type(&ty("(function(a0:int, a1:int) int)"))
        .is_err());
}

#[test]
fn test_initialize() {
    let mut record = ty("{x = unknown, y = int, z = {unknown}}");
    record.initialize(&Type::GENERAL);
    assert_eq!(record, ty("{x = general, y = int, z = {general}}"));

    let mut array = ty("{unknown}");
    array.update_type(&ty("arrayType(int,2)")).unwrap();
    array.initialize(&Type::UNKNOWN);
    assert_eq!(array, ty("{unknown}"));

    let mut flat = Type::INT;
    flat.initialize(&Type::GENERAL);
    assert_eq!(flat, Type::INT);
}

// ==================== Field terms ====================

#[test]
fn test_field_term_equality_uses_resolved_type() {
    let mut open = FieldTerm::new(Type::UNKNOWN);
    let fixed = FieldTerm::new(Type::INT);
    assert_ne!(open, fixed);

    open.set_value(&Type::INT).unwrap();
    assert_eq!(open, fixed);
    assert_ne!(open.declared(), fixed.declared());
}

#[test]
fn test_field_term_settability() {
    let mut fixed = FieldTerm::new(Type::INT);
    assert!(!fixed.is_settable());
    assert!(fixed.set_value(&Type::INT).is_ok());
    assert!(fixed.set_value(&Type::DOUBLE).is_err());

    let mut shaped = FieldTerm::new(ty("{x = unknown}"));
    assert!(shaped.set_value(&ty("{y = int}")).is_err());
    shaped.set_value(&ty("{x = long}")).unwrap();
    assert_eq!(shaped.resolved(), &ty("{x = long}"));
}
