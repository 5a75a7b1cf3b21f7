//! Function types used as property types

use super::TypeExpression;
use crate::bindings::ParameterBindings;
use crate::error::TypeResult;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Anonymous function signature: named parameters and a return type
///
/// Parameter names are documentation only. Two signatures are equal when their
/// parameter types match position by position and their return types match.
#[derive(Debug, Clone)]
pub struct FunctionType {
    params: Vec<(String, TypeExpression)>,
    return_type: Box<TypeExpression>,
}

impl FunctionType {
    pub fn new<N: Into<String>>(
        params: impl IntoIterator<Item = (N, TypeExpression)>,
        return_type: impl Into<TypeExpression>,
    ) -> Self {
        Self {
            params: params
                .into_iter()
                .map(|(name, param_type)| (name.into(), param_type))
                .collect(),
            return_type: Box::new(return_type.into()),
        }
    }

    pub fn params(&self) -> &[(String, TypeExpression)] {
        &self.params
    }

    pub fn return_type(&self) -> &TypeExpression {
        &self.return_type
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter types position by position must be exactly equal
    pub fn has_same_parameter_types(&self, other: &FunctionType) -> bool {
        self.arity() == other.arity()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|((_, mine), (_, theirs))| mine == theirs)
    }

    /// Function assignability is invariant: arity, return type and every
    /// parameter type must match exactly
    pub fn is_assignable_from_function(&self, other: &FunctionType) -> bool {
        self.return_type == other.return_type && self.has_same_parameter_types(other)
    }

    pub(crate) fn substitute(&self, bindings: &ParameterBindings) -> TypeResult<FunctionType> {
        let params = self
            .params
            .iter()
            .map(|(name, param_type)| Ok((name.clone(), param_type.substitute(bindings)?)))
            .collect::<TypeResult<Vec<_>>>()?;

        Ok(Self {
            params,
            return_type: Box::new(self.return_type.substitute(bindings)?),
        })
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        self.is_assignable_from_function(other)
    }
}

impl Eq for FunctionType {}

impl Hash for FunctionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.params.len().hash(state);
        for (_, param_type) in &self.params {
            param_type.hash(state);
        }
        self.return_type.hash(state);
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|(name, param_type)| format!("{name}: {param_type}"))
            .collect();
        write!(f, "({}) -> {}", params.join(", "), self.return_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> TypeExpression {
        TypeExpression::variable(name)
    }

    #[test]
    fn test_parameter_names_are_not_significant() {
        let f = FunctionType::new([("a", var("T"))], var("R"));
        let g = FunctionType::new([("b", var("T"))], var("R"));

        assert_eq!(f, g);
    }

    #[test]
    fn test_parameter_positions_are_significant() {
        let f = FunctionType::new([("a", var("T")), ("b", var("U"))], var("R"));
        let g = FunctionType::new([("a", var("U")), ("b", var("T"))], var("R"));

        assert!(!f.is_assignable_from_function(&g));
        assert!(!g.is_assignable_from_function(&f));
    }

    #[test]
    fn test_display() {
        let f = FunctionType::new([("a", var("T")), ("b", var("U"))], var("R"));
        assert_eq!(f.to_string(), "(a: T, b: U) -> R");

        let unit = FunctionType::new(Vec::<(String, TypeExpression)>::new(), var("R"));
        assert_eq!(unit.to_string(), "() -> R");
    }
}
