//! Type variables: references to a definition's own declared parameters

use super::TypeExpression;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Unbound reference to a declared type parameter
///
/// Identity is the parameter name plus nullability. The upper bound is carried
/// along so properties can be looked up through it, but it does not take part
/// in equality: two references to the same parameter are the same variable.
#[derive(Debug, Clone)]
pub struct TypeVariable {
    name: String,
    upper_bound: Option<Box<TypeExpression>>,
    nullable: bool,
}

impl TypeVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            upper_bound: None,
            nullable: false,
        }
    }

    pub fn bounded(name: impl Into<String>, upper_bound: impl Into<TypeExpression>) -> Self {
        Self {
            name: name.into(),
            upper_bound: Some(Box::new(upper_bound.into())),
            nullable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn upper_bound(&self) -> Option<&TypeExpression> {
        self.upper_bound.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Copy of this reference carrying the given bound, unless it already has one
    pub(crate) fn with_default_bound(&self, upper_bound: Option<&TypeExpression>) -> Self {
        let mut variable = self.clone();
        if variable.upper_bound.is_none() {
            variable.upper_bound = upper_bound.cloned().map(Box::new);
        }
        variable
    }

    /// Variables are only compatible with references to the same parameter
    pub fn is_assignable_from_variable(&self, other: &TypeVariable) -> bool {
        self.name == other.name && (self.nullable || !other.nullable)
    }
}

impl PartialEq for TypeVariable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.nullable == other.nullable
    }
}

impl Eq for TypeVariable {}

impl Hash for TypeVariable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Display for TypeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}
