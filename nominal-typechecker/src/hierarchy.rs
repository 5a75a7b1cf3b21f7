//! Assignability along declared supertypes
//!
//! Subtyping is nominal. A type is assignable to another only through the
//! `extends` and `implements` declarations that connect them, and generic
//! arguments must match exactly once the walk reaches the target definition.

use crate::bindings::ParameterBindings;
use crate::config::TypeSystemConfig;
use crate::definition::TypeDefinition;
use crate::error::{TypeResult, TypeSystemError};
use crate::types::{ConstructedType, TypeExpression};
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeHierarchy {
    max_depth: usize,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::new(&TypeSystemConfig::default())
    }
}

impl TypeHierarchy {
    pub fn new(config: &TypeSystemConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    /// Whether a value of type `source` can be used where `target` is expected
    pub fn is_assignable_from(
        &self,
        target: &ConstructedType,
        source: &ConstructedType,
    ) -> TypeResult<bool> {
        self.walk(target, source.definition(), source.bindings(), source.is_nullable(), 0)
    }

    /// One hop of the walk; `nullable` is the nullability of the supertype as
    /// declared at this level, so a nullable parent is rejected like a
    /// nullable source
    fn walk(
        &self,
        target: &ConstructedType,
        definition: &Arc<TypeDefinition>,
        bindings: &ParameterBindings,
        nullable: bool,
        depth: usize,
    ) -> TypeResult<bool> {
        if depth > self.max_depth {
            warn!(%target, limit = self.max_depth, "assignability check exceeded depth limit");
            return Err(TypeSystemError::RecursionLimitExceeded {
                limit: self.max_depth,
                context: format!("checking assignability to {target}"),
            });
        }

        if nullable && !target.is_nullable() {
            trace!(%target, source = %definition.name(), depth, "nullable source rejected");
            return Ok(false);
        }

        if target.definition() == definition {
            let matches = target.bindings().is_assignable_from(bindings);
            trace!(%target, source_bindings = %bindings, depth, matches, "reached target definition");
            return Ok(matches);
        }

        // Classes are only reachable through parents
        let interfaces: &[ConstructedType] = if target.definition().is_interface() {
            definition.interfaces()
        } else {
            &[]
        };

        for candidate in definition.parent().into_iter().chain(interfaces) {
            let remapped = candidate.bindings().re_map(bindings)?;
            if self.walk(
                target,
                candidate.definition(),
                &remapped,
                candidate.is_nullable(),
                depth + 1,
            )? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Assignability between arbitrary type expressions
    pub fn is_expression_assignable(
        &self,
        target: &TypeExpression,
        source: &TypeExpression,
    ) -> TypeResult<bool> {
        match (target, source) {
            (TypeExpression::Constructed(target), TypeExpression::Constructed(source)) => {
                self.is_assignable_from(target, source)
            }
            (TypeExpression::Constructed(target), TypeExpression::Variable(variable)) => {
                if variable.is_nullable() && !target.is_nullable() {
                    return Ok(false);
                }
                match variable.upper_bound() {
                    Some(bound) => self.is_expression_assignable(&TypeExpression::from(target), bound),
                    None => Ok(false),
                }
            }
            (TypeExpression::Variable(target), TypeExpression::Variable(source)) => {
                Ok(target.is_assignable_from_variable(source))
            }
            (TypeExpression::Function(target), TypeExpression::Function(source)) => {
                Ok(target.is_assignable_from_function(source))
            }
            _ => Ok(false),
        }
    }
}
