//! Monotonic type functions.
//!
//! A function term computes a type from the current values of other terms,
//! e.g. "the element type of port `in`". The solver relies on every function
//! being monotonic: `a <= b` implies `f(a) <= f(b)`. Functions that are not
//! may keep the fixed-point loop from converging.

use std::fmt;

use super::term::{Owner, Term};
use crate::error::{TypeError, TypeResult};
use crate::lattice::TypeLattice;
use crate::types::{RecordType, Type};

pub trait MonotonicFunction: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Terms whose values are passed to [`apply`](Self::apply), in order.
    fn arguments(&self) -> &[Term];

    fn apply(&self, args: &[Type], lattice: &TypeLattice) -> TypeResult<Type>;

    /// Model element blamed when a constraint involving this function fails.
    fn owner(&self) -> Option<&Owner> {
        None
    }
}

fn single<'a>(name: &str, args: &'a [Type]) -> TypeResult<&'a Type> {
    match args {
        [only] => Ok(only),
        _ => Err(TypeError::MalformedOperand(format!(
            "{} takes 1 argument, got {}",
            name,
            args.len()
        ))),
    }
}

/// `{t}`: the unknown-length array of the argument.
#[derive(Debug, Clone)]
pub struct ArrayOf {
    args: [Term; 1],
}

impl ArrayOf {
    pub fn new(element: impl Into<Term>) -> Self {
        Self {
            args: [element.into()],
        }
    }
}

impl MonotonicFunction for ArrayOf {
    fn name(&self) -> &str {
        "arrayOf"
    }

    fn arguments(&self) -> &[Term] {
        &self.args
    }

    fn apply(&self, args: &[Type], _lattice: &TypeLattice) -> TypeResult<Type> {
        Ok(Type::array(single(self.name(), args)?.clone()))
    }
}

/// Element type of an array.
///
/// A non-array value is treated as a one-element array of itself, which keeps
/// the function monotonic under scalar-to-array widening.
#[derive(Debug, Clone)]
pub struct ElementOf {
    args: [Term; 1],
}

impl ElementOf {
    pub fn new(array: impl Into<Term>) -> Self {
        Self {
            args: [array.into()],
        }
    }
}

impl MonotonicFunction for ElementOf {
    fn name(&self) -> &str {
        "elementOf"
    }

    fn arguments(&self) -> &[Term] {
        &self.args
    }

    fn apply(&self, args: &[Type], _lattice: &TypeLattice) -> TypeResult<Type> {
        Ok(match single(self.name(), args)? {
            Type::Array(array) => array.element().clone(),
            other => other.clone(),
        })
    }
}

/// A record assembled from labelled terms.
#[derive(Debug, Clone)]
pub struct RecordOf {
    labels: Vec<String>,
    args: Vec<Term>,
}

impl RecordOf {
    pub fn new<L: Into<String>>(fields: impl IntoIterator<Item = (L, Term)>) -> TypeResult<Self> {
        let mut labels = Vec::new();
        let mut args = Vec::new();
        for (label, term) in fields {
            let label = label.into();
            if labels.contains(&label) {
                return Err(TypeError::DuplicateLabel(label));
            }
            labels.push(label);
            args.push(term);
        }
        Ok(Self { labels, args })
    }
}

impl MonotonicFunction for RecordOf {
    fn name(&self) -> &str {
        "recordOf"
    }

    fn arguments(&self) -> &[Term] {
        &self.args
    }

    fn apply(&self, args: &[Type], _lattice: &TypeLattice) -> TypeResult<Type> {
        if args.len() != self.labels.len() {
            return Err(TypeError::MalformedOperand(format!(
                "recordOf expects {} arguments, got {}",
                self.labels.len(),
                args.len()
            )));
        }
        RecordType::new(self.labels.iter().cloned().zip(args.iter().cloned())).map(Type::Record)
    }
}

/// Type of one field of a record.
///
/// `unknown` maps to `unknown`. Anything that is not a record carrying the
/// label maps to `general`.
#[derive(Debug, Clone)]
pub struct FieldOf {
    label: String,
    args: [Term; 1],
}

impl FieldOf {
    pub fn new(record: impl Into<Term>, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            args: [record.into()],
        }
    }
}

impl MonotonicFunction for FieldOf {
    fn name(&self) -> &str {
        "fieldOf"
    }

    fn arguments(&self) -> &[Term] {
        &self.args
    }

    fn apply(&self, args: &[Type], _lattice: &TypeLattice) -> TypeResult<Type> {
        Ok(match single(self.name(), args)? {
            Type::Record(record) => record.get(&self.label).cloned().unwrap_or(Type::GENERAL),
            t if t.is_unknown() => Type::UNKNOWN,
            _ => Type::GENERAL,
        })
    }
}

/// Return type of a function type.
#[derive(Debug, Clone)]
pub struct ReturnOf {
    args: [Term; 1],
}

impl ReturnOf {
    pub fn new(function: impl Into<Term>) -> Self {
        Self {
            args: [function.into()],
        }
    }
}

impl MonotonicFunction for ReturnOf {
    fn name(&self) -> &str {
        "returnOf"
    }

    fn arguments(&self) -> &[Term] {
        &self.args
    }

    fn apply(&self, args: &[Type], _lattice: &TypeLattice) -> TypeResult<Type> {
        Ok(match single(self.name(), args)? {
            Type::Function(func) => func.return_type().clone(),
            t if t.is_unknown() => Type::UNKNOWN,
            _ => Type::GENERAL,
        })
    }
}

type ApplyFn = dyn Fn(&[Type], &TypeLattice) -> TypeResult<Type> + Send + Sync;

/// A function term backed by a closure, for one-off rules such as
/// "output is at least the lub of all inputs plus one level of nesting".
pub struct MonotonicFn {
    name: String,
    owner: Option<Owner>,
    args: Vec<Term>,
    apply: Box<ApplyFn>,
}

impl MonotonicFn {
    pub fn new(
        name: impl Into<String>,
        args: Vec<Term>,
        apply: impl Fn(&[Type], &TypeLattice) -> TypeResult<Type> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            owner: None,
            args,
            apply: Box::new(apply),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<Owner>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

impl fmt::Debug for MonotonicFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicFn")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl MonotonicFunction for MonotonicFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn arguments(&self) -> &[Term] {
        &self.args
    }

    fn apply(&self, args: &[Type], lattice: &TypeLattice) -> TypeResult<Type> {
        (self.apply)(args, lattice)
    }

    fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> Type {
        s.parse().unwrap()
    }

    #[test]
    fn test_array_and_element_of() {
        let lattice = TypeLattice::new();
        let array_of = ArrayOf::new(Type::INT);
        assert_eq!(array_of.apply(&[Type::INT], &lattice).unwrap(), ty("{int}"));

        let element_of = ElementOf::new(Type::INT);
        assert_eq!(
            element_of.apply(&[ty("arrayType(double,2)")], &lattice).unwrap(),
            Type::DOUBLE
        );
        assert_eq!(element_of.apply(&[Type::INT], &lattice).unwrap(), Type::INT);
        assert_eq!(element_of.apply(&[Type::UNKNOWN], &lattice).unwrap(), Type::UNKNOWN);
    }

    #[test]
    fn test_field_of() {
        let lattice = TypeLattice::new();
        let f = FieldOf::new(Type::UNKNOWN, "x");
        assert_eq!(f.apply(&[ty("{x = int, y = string}")], &lattice).unwrap(), Type::INT);
        assert_eq!(f.apply(&[ty("{y = string}")], &lattice).unwrap(), Type::GENERAL);
        assert_eq!(f.apply(&[Type::UNKNOWN], &lattice).unwrap(), Type::UNKNOWN);
        assert_eq!(f.apply(&[Type::INT], &lattice).unwrap(), Type::GENERAL);
    }

    #[test]
    fn test_record_of_rejects_duplicate_labels() {
        let err = RecordOf::new([("a", Term::from(Type::INT)), ("a", Term::from(Type::INT))])
            .unwrap_err();
        assert_eq!(err, TypeError::DuplicateLabel("a".to_string()));
    }

    #[test]
    fn test_record_of_builds_record() {
        let lattice = TypeLattice::new();
        let f = RecordOf::new([("b", Term::from(Type::INT)), ("a", Term::from(Type::INT))]).unwrap();
        let out = f.apply(&[Type::INT, Type::STRING], &lattice).unwrap();
        assert_eq!(out, ty("{a = string, b = int}"));
    }

    #[test]
    fn test_return_of() {
        let lattice = TypeLattice::new();
        let f = ReturnOf::new(Type::UNKNOWN);
        assert_eq!(
            f.apply(&[ty("(function(a0:int) boolean)")], &lattice).unwrap(),
            Type::BOOLEAN
        );
        assert_eq!(f.apply(&[Type::STRING], &lattice).unwrap(), Type::GENERAL);
    }

    #[test]
    fn test_wrong_arity_is_malformed() {
        let lattice = TypeLattice::new();
        let err = ArrayOf::new(Type::INT)
            .apply(&[Type::INT, Type::INT], &lattice)
            .unwrap_err();
        assert!(err.is_malformed_operand(), "{:?}", err);
    }

    #[test]
    fn test_closure_function() {
        let lattice = TypeLattice::new();
        let f = MonotonicFn::new("lubAll", vec![], |args, lattice| Ok(lattice.lub_all(args)))
            .with_owner("adder");
        assert_eq!(f.apply(&[Type::INT, Type::DOUBLE], &lattice).unwrap(), Type::DOUBLE);
        assert_eq!(f.owner().map(Owner::as_str), Some("adder"));
    }
}
