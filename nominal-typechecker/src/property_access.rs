//! Property lookup along the inheritance chain
//!
//! Lookup starts on the receiver's own definition and walks up through its
//! parents. At every step the parent's type arguments, which are written in
//! terms of the child's parameters, are remapped through the bindings in
//! effect so far. The first declaration found wins: a property declared on a
//! child shadows any same-named property further up, and overloads resolve to
//! the first one declared.

use crate::bindings::ParameterBindings;
use crate::config::TypeSystemConfig;
use crate::definition::TypeDefinition;
use crate::error::{TypeResult, TypeSystemError};
use crate::types::{ConstructedType, PropertyLookupResult, TypeExpression};
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyAccess {
    max_depth: usize,
}

impl Default for PropertyAccess {
    fn default() -> Self {
        Self::new(&TypeSystemConfig::default())
    }
}

impl PropertyAccess {
    pub fn new(config: &TypeSystemConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    /// Find `name` on a constructed type
    pub fn find(&self, name: &str, on: &ConstructedType) -> TypeResult<Option<PropertyLookupResult>> {
        self.find_with_bindings(name, on.definition(), on.bindings())
    }

    /// Find `name` on `definition`, resolving declared types against `bindings`
    pub fn find_with_bindings(
        &self,
        name: &str,
        definition: &Arc<TypeDefinition>,
        bindings: &ParameterBindings,
    ) -> TypeResult<Option<PropertyLookupResult>> {
        let mut definition = Arc::clone(definition);
        let mut bindings = bindings.clone();

        for depth in 0..=self.max_depth {
            if let Some((position, declared)) = definition.own_property(name) {
                let property_type = declared.substitute(&bindings)?;
                trace!(
                    property = name,
                    owner = %definition.name(),
                    depth,
                    position,
                    "resolved property"
                );
                return Ok(Some(PropertyLookupResult {
                    depth,
                    position,
                    property_type,
                }));
            }

            let Some(parent) = definition.parent() else {
                return Ok(None);
            };
            let remapped = parent.bindings().re_map(&bindings)?;
            let next = Arc::clone(parent.definition());
            definition = next;
            bindings = remapped;
        }

        warn!(property = name, limit = self.max_depth, "property lookup exceeded depth limit");
        Err(TypeSystemError::RecursionLimitExceeded {
            limit: self.max_depth,
            context: format!("looking up property {name}"),
        })
    }

    /// Find `name` on any type expression
    ///
    /// Variables are searched through their upper bound; functions have no
    /// properties.
    pub fn find_in_expression(
        &self,
        name: &str,
        expression: &TypeExpression,
    ) -> TypeResult<Option<PropertyLookupResult>> {
        match expression {
            TypeExpression::Constructed(constructed) => self.find(name, constructed),
            TypeExpression::Variable(variable) => match variable.upper_bound() {
                Some(bound) => self.find_in_expression(name, bound),
                None => Ok(None),
            },
            TypeExpression::Function(_) => Ok(None),
        }
    }

    /// Every property visible on `on` with its resolved type
    ///
    /// Nearest declarations come first. Overloads declared on one level are all
    /// included; names already seen on a nearer level are skipped.
    pub fn all_properties(&self, on: &ConstructedType) -> TypeResult<Vec<(String, TypeExpression)>> {
        let mut properties: Vec<(String, TypeExpression)> = Vec::new();
        let mut definition = Arc::clone(on.definition());
        let mut bindings = on.bindings().clone();

        for _ in 0..=self.max_depth {
            let shadowed = properties.len();
            for (name, declared) in definition.properties() {
                if properties[..shadowed].iter().any(|(seen, _)| seen == name) {
                    continue;
                }
                properties.push((name.clone(), declared.substitute(&bindings)?));
            }

            let Some(parent) = definition.parent() else {
                return Ok(properties);
            };
            let remapped = parent.bindings().re_map(&bindings)?;
            let next = Arc::clone(parent.definition());
            definition = next;
            bindings = remapped;
        }

        warn!(owner = %on, limit = self.max_depth, "property listing exceeded depth limit");
        Err(TypeSystemError::RecursionLimitExceeded {
            limit: self.max_depth,
            context: format!("listing properties of {on}"),
        })
    }
}
