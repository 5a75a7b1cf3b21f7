//! Type expressions
//!
//! A property's declared type, a type argument and a parameter bound are all
//! `TypeExpression`s. The family is closed:
//! - `Constructed`: a definition instantiated with every parameter bound
//! - `Variable`: a reference to one of the enclosing definition's parameters
//! - `Function`: an anonymous function signature

pub mod constructed;
pub mod function;
pub mod variable;

pub use constructed::{ConstructedType, TypeInstantiation};
pub use function::FunctionType;
pub use variable::TypeVariable;

use crate::bindings::ParameterBindings;
use crate::error::TypeResult;
use crate::hierarchy::TypeHierarchy;
use crate::property_access::PropertyAccess;
use std::fmt;

/// Outcome of a successful property lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyLookupResult {
    /// Inheritance hops walked before the property was found
    pub depth: usize,
    /// Index within the declaring definition's property list
    pub position: usize,
    /// Declared type with the receiver's type arguments substituted
    pub property_type: TypeExpression,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpression {
    Constructed(ConstructedType),
    Variable(TypeVariable),
    Function(FunctionType),
}

impl TypeExpression {
    /// Reference a type parameter without an upper bound
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(TypeVariable::new(name))
    }

    /// Reference a type parameter whose upper bound is known
    pub fn bounded_variable(name: impl Into<String>, upper_bound: impl Into<TypeExpression>) -> Self {
        Self::Variable(TypeVariable::bounded(name, upper_bound))
    }

    /// Create a function type from named parameters and a return type
    pub fn function<N: Into<String>>(
        params: impl IntoIterator<Item = (N, TypeExpression)>,
        return_type: impl Into<TypeExpression>,
    ) -> Self {
        Self::Function(FunctionType::new(params, return_type))
    }

    pub fn as_constructed(&self) -> Option<&ConstructedType> {
        match self {
            Self::Constructed(constructed) => Some(constructed),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&TypeVariable> {
        match self {
            Self::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Function types are never nullable
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Constructed(constructed) => constructed.is_nullable(),
            Self::Variable(variable) => variable.is_nullable(),
            Self::Function(_) => false,
        }
    }

    /// The nullable form of this expression; function types are returned as-is
    pub fn nullable(self) -> Self {
        match self {
            Self::Constructed(constructed) => Self::Constructed(constructed.into_nullable()),
            Self::Variable(variable) => Self::Variable(variable.into_nullable()),
            function @ Self::Function(_) => function,
        }
    }

    /// Look up a property using the default configuration
    pub fn find(&self, name: &str) -> TypeResult<Option<PropertyLookupResult>> {
        PropertyAccess::default().find_in_expression(name, self)
    }

    /// Check whether a value of type `other` can be used where `self` is expected
    pub fn is_assignable_from(&self, other: &TypeExpression) -> TypeResult<bool> {
        TypeHierarchy::default().is_expression_assignable(self, other)
    }

    /// Replace every type variable with its binding
    ///
    /// Variables nested inside constructed-type arguments and function signatures
    /// are replaced as well. A nullable variable reference bound to a concrete
    /// type yields the nullable form of that type. Empty bindings leave the
    /// expression untouched.
    pub fn substitute(&self, bindings: &ParameterBindings) -> TypeResult<TypeExpression> {
        if bindings.is_empty() {
            return Ok(self.clone());
        }
        match self {
            Self::Variable(variable) => {
                let bound = bindings.get_type(variable.name())?.clone();
                Ok(if variable.is_nullable() {
                    bound.nullable()
                } else {
                    bound
                })
            }
            Self::Constructed(constructed) => Ok(Self::Constructed(
                constructed.with_bindings(constructed.bindings().re_map(bindings)?),
            )),
            Self::Function(function) => Ok(Self::Function(function.substitute(bindings)?)),
        }
    }

    /// Visit every type variable referenced by this expression, including
    /// variables nested in arguments, signatures and variable bounds
    pub fn visit_variables<'a>(&'a self, visitor: &mut impl FnMut(&'a TypeVariable)) {
        match self {
            Self::Variable(variable) => {
                visitor(variable);
                if let Some(bound) = variable.upper_bound() {
                    bound.visit_variables(visitor);
                }
            }
            Self::Constructed(constructed) => {
                for (_, argument) in constructed.bindings().iter() {
                    argument.visit_variables(visitor);
                }
            }
            Self::Function(function) => {
                for (_, param_type) in function.params() {
                    param_type.visit_variables(visitor);
                }
                function.return_type().visit_variables(visitor);
            }
        }
    }

    /// Visit this expression and every constructed type nested in its
    /// arguments, signatures and variable bounds
    pub fn visit_constructed<'a>(&'a self, visitor: &mut impl FnMut(&'a ConstructedType)) {
        match self {
            Self::Constructed(constructed) => {
                visitor(constructed);
                for (_, argument) in constructed.bindings().iter() {
                    argument.visit_constructed(visitor);
                }
            }
            Self::Variable(variable) => {
                if let Some(bound) = variable.upper_bound() {
                    bound.visit_constructed(visitor);
                }
            }
            Self::Function(function) => {
                for (_, param_type) in function.params() {
                    param_type.visit_constructed(visitor);
                }
                function.return_type().visit_constructed(visitor);
            }
        }
    }
}

impl From<ConstructedType> for TypeExpression {
    fn from(constructed: ConstructedType) -> Self {
        Self::Constructed(constructed)
    }
}

impl From<&ConstructedType> for TypeExpression {
    fn from(constructed: &ConstructedType) -> Self {
        Self::Constructed(constructed.clone())
    }
}

impl From<TypeVariable> for TypeExpression {
    fn from(variable: TypeVariable) -> Self {
        Self::Variable(variable)
    }
}

impl From<FunctionType> for TypeExpression {
    fn from(function: FunctionType) -> Self {
        Self::Function(function)
    }
}

impl fmt::Display for TypeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructed(constructed) => write!(f, "{constructed}"),
            Self::Variable(variable) => write!(f, "{variable}"),
            Self::Function(function) => write!(f, "{function}"),
        }
    }
}

impl fmt::Display for PropertyLookupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (depth {}, position {})",
            self.property_type, self.depth, self.position
        )
    }
}
