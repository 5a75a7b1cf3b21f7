//! Constructed types: definitions with every parameter bound

use super::{PropertyLookupResult, TypeExpression};
use crate::bindings::ParameterBindings;
use crate::config::TypeSystemConfig;
use crate::definition::TypeDefinition;
use crate::error::{TypeResult, TypeSystemError};
use crate::hierarchy::TypeHierarchy;
use crate::property_access::PropertyAccess;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, trace};

/// A type instance: a closed definition, its type arguments and nullability
///
/// Only produced by [`TypeInstantiation::construct`], which checks that every
/// declared parameter is bound and satisfies its upper bound. Instances of a
/// definition that is still open are checked when that definition closes.
#[derive(Debug, Clone)]
pub struct ConstructedType {
    definition: Arc<TypeDefinition>,
    bindings: ParameterBindings,
    nullable: bool,
}

impl ConstructedType {
    pub fn definition(&self) -> &Arc<TypeDefinition> {
        &self.definition
    }

    pub fn bindings(&self) -> &ParameterBindings {
        &self.bindings
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Nullable copy of this instance
    pub fn as_nullable(&self) -> Self {
        self.clone().into_nullable()
    }

    /// Same definition and nullability, different arguments; bounds are not
    /// rechecked, so callers must only pass substitutions of valid bindings
    pub(crate) fn with_bindings(&self, bindings: ParameterBindings) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            bindings,
            nullable: self.nullable,
        }
    }

    pub fn find(&self, name: &str) -> TypeResult<Option<PropertyLookupResult>> {
        PropertyAccess::default().find(name, self)
    }

    /// Every visible property with its resolved type, nearest declaration first
    pub fn all_properties(&self) -> TypeResult<Vec<(String, TypeExpression)>> {
        PropertyAccess::default().all_properties(self)
    }

    pub fn is_assignable_from(&self, other: &ConstructedType) -> TypeResult<bool> {
        TypeHierarchy::default().is_assignable_from(self, other)
    }

    /// Fully qualified form, e.g. `core.Map<K=core.String,V=core.Int>?`
    pub fn canonical_name(&self) -> String {
        let arguments: Vec<String> = self
            .bindings
            .iter()
            .map(|(param, argument)| match argument {
                TypeExpression::Constructed(constructed) => {
                    format!("{param}={}", constructed.canonical_name())
                }
                other => format!("{param}={other}"),
            })
            .collect();

        let mut name = self.definition.qualified_name();
        if !arguments.is_empty() {
            name.push('<');
            name.push_str(&arguments.join(","));
            name.push('>');
        }
        if self.nullable {
            name.push('?');
        }
        name
    }
}

impl PartialEq for ConstructedType {
    fn eq(&self, other: &Self) -> bool {
        self.nullable == other.nullable
            && self.definition == other.definition
            && self.bindings == other.bindings
    }
}

impl Eq for ConstructedType {}

impl Hash for ConstructedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.definition.hash(state);
        self.bindings.hash(state);
        self.nullable.hash(state);
    }
}

impl fmt::Display for ConstructedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.definition.name(), self.bindings)?;
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// Staging value for instantiating a closed definition
///
/// ```
/// # use nominal_typechecker::define_type;
/// # fn main() -> nominal_typechecker::TypeResult<()> {
/// let string = define_type("String", false).construct()?.instance()?;
/// let list = define_type("List", false).parameter("T")?.construct()?;
///
/// let list_of_string = list.with().bind("T", string)?.nullable().construct()?;
/// assert_eq!(list_of_string.to_string(), "List<T=String>?");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TypeInstantiation {
    definition: Arc<TypeDefinition>,
    bindings: ParameterBindings,
    nullable: bool,
    hierarchy: TypeHierarchy,
}

impl TypeInstantiation {
    pub(crate) fn new(definition: Arc<TypeDefinition>) -> Self {
        Self {
            definition,
            bindings: ParameterBindings::new(),
            nullable: false,
            hierarchy: TypeHierarchy::default(),
        }
    }

    /// Use the recursion limit of `config` for bound checks
    pub fn configure(mut self, config: &TypeSystemConfig) -> Self {
        self.hierarchy = TypeHierarchy::new(config);
        self
    }

    pub fn bind(
        mut self,
        param: impl Into<String>,
        argument: impl Into<TypeExpression>,
    ) -> TypeResult<Self> {
        self.bindings.add(param, argument.into())?;
        Ok(self)
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Check every binding against the declared parameters and build the instance
    ///
    /// A definition that is still being built has no parameters yet; its
    /// instances are accepted as given and checked when it closes.
    pub fn construct(self) -> TypeResult<ConstructedType> {
        let definition = &self.definition;

        if !definition.is_closed() {
            trace!(definition = %definition.name(), "instantiating open definition");
        } else if let Some((param, _)) = self
            .bindings
            .iter()
            .find(|(param, _)| definition.parameter(param).is_none())
        {
            return Err(TypeSystemError::UndeclaredParameter {
                definition: definition.name().to_string(),
                parameter: param.to_string(),
            });
        }

        for declared in definition.parameters() {
            let argument = self.bindings.get_type(declared.name())?;
            let Some(bound) = declared.upper_bound() else {
                continue;
            };
            // Bounds may mention the definition's own parameters (T: Comparable<T>)
            let bound = bound.substitute(&self.bindings)?;
            if !self.hierarchy.is_expression_assignable(&bound, argument)? {
                return Err(TypeSystemError::BoundViolation {
                    definition: definition.name().to_string(),
                    parameter: declared.name().to_string(),
                    bound: bound.to_string(),
                    argument: argument.to_string(),
                });
            }
        }

        let constructed = ConstructedType {
            definition: self.definition,
            bindings: self.bindings,
            nullable: self.nullable,
        };
        debug!(instance = %constructed, "constructed type instance");
        Ok(constructed)
    }
}
