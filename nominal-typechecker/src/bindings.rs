//! Parameter bindings: the type arguments of one instantiation

use crate::error::{TypeResult, TypeSystemError};
use crate::types::TypeExpression;
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Mapping from declared parameter name to its bound type
///
/// Bindings are append-only: a parameter can be bound exactly once. Insertion
/// order is kept for display, but comparison is by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBindings {
    bindings: IndexMap<String, TypeExpression>,
}

impl ParameterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `param` to `bound_type`, failing if it is already bound
    pub fn add(&mut self, param: impl Into<String>, bound_type: TypeExpression) -> TypeResult<()> {
        let param = param.into();
        if self.bindings.contains_key(&param) {
            return Err(TypeSystemError::DuplicateBinding { parameter: param });
        }
        self.bindings.insert(param, bound_type);
        Ok(())
    }

    pub fn get(&self, param: &str) -> Option<&TypeExpression> {
        self.bindings.get(param)
    }

    pub fn get_type(&self, param: &str) -> TypeResult<&TypeExpression> {
        self.bindings
            .get(param)
            .ok_or_else(|| TypeSystemError::UnboundParameter {
                parameter: param.to_string(),
            })
    }

    pub fn contains(&self, param: &str) -> bool {
        self.bindings.contains_key(param)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeExpression)> {
        self.bindings
            .iter()
            .map(|(param, bound_type)| (param.as_str(), bound_type))
    }

    /// Resolve these bindings against another binding set
    ///
    /// A parent's type arguments are written in terms of the child's
    /// parameters; remapping them with the child's actual bindings yields the
    /// parent's arguments as seen from the child instance.
    pub fn re_map(&self, with: &ParameterBindings) -> TypeResult<ParameterBindings> {
        if with.is_empty() {
            return Ok(self.clone());
        }

        let mut bindings = IndexMap::with_capacity(self.bindings.len());
        for (param, bound_type) in &self.bindings {
            bindings.insert(param.clone(), bound_type.substitute(with)?);
        }
        Ok(Self { bindings })
    }

    /// Exact match: the same parameters bound to identical types
    ///
    /// This is what makes generics invariant.
    pub fn is_assignable_from(&self, other: &ParameterBindings) -> bool {
        self == other
    }
}

impl Hash for ParameterBindings {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Equality ignores insertion order, so hash in name order
        let mut entries: Vec<_> = self.bindings.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (param, bound_type) in entries {
            param.hash(state);
            bound_type.hash(state);
        }
    }
}

impl fmt::Display for ParameterBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return Ok(());
        }
        let entries: Vec<String> = self
            .bindings
            .iter()
            .map(|(param, bound_type)| format!("{param}={bound_type}"))
            .collect();
        write!(f, "<{}>", entries.join(","))
    }
}

impl FromIterator<(String, TypeExpression)> for ParameterBindings {
    /// Later duplicates replace earlier ones; use `add` to reject them instead
    fn from_iter<I: IntoIterator<Item = (String, TypeExpression)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
