//! Type definitions and their two-phase builder
//!
//! A definition is assembled with a [`TypeDefinitionBuilder`] and closed with
//! [`TypeDefinitionBuilder::construct`], which validates it and yields an
//! immutable `Arc<TypeDefinition>` that can be shared as a parent, interface
//! or type argument by any number of instances.

use crate::config::TypeSystemConfig;
use crate::error::{TypeResult, TypeSystemError};
use crate::property_access::PropertyAccess;
use crate::types::{
    ConstructedType, FunctionType, TypeExpression, TypeInstantiation, TypeVariable,
};
use crate::validation;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// A class or interface declaration
///
/// Identity is the qualified name (`package.Name`), never the structure, and is
/// fixed as soon as the definition exists. Everything else lives in a body that
/// is filled exactly once when the builder closes. Until then the definition is
/// open: it can already be referenced as a type, so definitions may refer to
/// themselves or to each other, but it has no parent, interfaces, parameters or
/// properties.
pub struct TypeDefinition {
    name: String,
    package: String,
    is_interface: bool,
    body: OnceLock<DefinitionBody>,
}

struct DefinitionBody {
    parent: Option<ConstructedType>,
    interfaces: Vec<ConstructedType>,
    parameters: Vec<TypeVariable>,
    properties: Vec<(String, TypeExpression)>,
}

impl TypeDefinition {
    fn open(name: String, package: String, is_interface: bool) -> Self {
        Self {
            name,
            package,
            is_interface,
            body: OnceLock::new(),
        }
    }

    /// Start building a class definition
    pub fn class(name: impl Into<String>) -> TypeDefinitionBuilder {
        TypeDefinitionBuilder::new(name, false)
    }

    /// Start building an interface definition
    pub fn interface(name: impl Into<String>) -> TypeDefinitionBuilder {
        TypeDefinitionBuilder::new(name, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Whether the builder for this definition has finished
    pub fn is_closed(&self) -> bool {
        self.body.get().is_some()
    }

    pub fn parent(&self) -> Option<&ConstructedType> {
        self.body.get().and_then(|body| body.parent.as_ref())
    }

    pub fn interfaces(&self) -> &[ConstructedType] {
        self.body.get().map_or(&[][..], |body| body.interfaces.as_slice())
    }

    pub fn parameters(&self) -> &[TypeVariable] {
        self.body.get().map_or(&[][..], |body| body.parameters.as_slice())
    }

    pub fn parameter(&self, name: &str) -> Option<&TypeVariable> {
        self.parameters().iter().find(|param| param.name() == name)
    }

    /// Reference to a declared parameter, carrying its upper bound
    pub fn variable(&self, name: &str) -> Option<TypeExpression> {
        self.parameter(name).cloned().map(TypeExpression::Variable)
    }

    pub fn is_generic(&self) -> bool {
        !self.parameters().is_empty()
    }

    /// Properties declared directly on this definition, in declaration order
    pub fn properties(&self) -> &[(String, TypeExpression)] {
        self.body.get().map_or(&[][..], |body| body.properties.as_slice())
    }

    /// First directly declared property named `name`, with its position
    pub fn own_property(&self, name: &str) -> Option<(usize, &TypeExpression)> {
        self.properties()
            .iter()
            .enumerate()
            .find(|(_, (property, _))| property == name)
            .map(|(position, (_, declared))| (position, declared))
    }

    /// Whether `name` is declared directly with exactly `declared` as its type
    pub fn declares(&self, name: &str, declared: &TypeExpression) -> bool {
        validation::declares(self.properties(), name, declared)
    }

    /// Names of every property visible on this definition, nearest level first
    pub fn all_property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let mut current = Some(self);
        while let Some(definition) = current {
            for (name, _) in definition.properties() {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            current = definition.parent().map(|parent| &**parent.definition());
        }
        names
    }

    /// Begin instantiating this definition
    pub fn with(self: &Arc<Self>) -> TypeInstantiation {
        TypeInstantiation::new(Arc::clone(self))
    }

    /// Instantiate a definition that declares no parameters
    pub fn instance(self: &Arc<Self>) -> TypeResult<ConstructedType> {
        self.with().construct()
    }
}

impl PartialEq for TypeDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.package == other.package && self.name == other.name
    }
}

impl Eq for TypeDefinition {}

impl Hash for TypeDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.package.hash(state);
        self.name.hash(state);
    }
}

// Properties may point back at this definition, so only identity is printed
impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("package", &self.package)
            .field("is_interface", &self.is_interface)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_interface { "interface" } else { "class" };
        write!(f, "{keyword} {}", self.name)?;
        if self.is_generic() {
            let params: Vec<String> = self
                .parameters()
                .iter()
                .map(|param| match param.upper_bound() {
                    Some(bound) => format!("{}: {bound}", param.name()),
                    None => param.name().to_string(),
                })
                .collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

/// Mutable staging value for a [`TypeDefinition`]
///
/// Every step that can be rejected is checked eagerly and returns
/// `TypeResult<Self>`, so definitions read as a `?` chain:
///
/// ```
/// # use nominal_typechecker::define_type;
/// # fn main() -> nominal_typechecker::TypeResult<()> {
/// let string = define_type("String", false).construct()?.instance()?;
/// let named = define_type("Named", true).property("name", string.clone())?.construct()?;
///
/// let user = define_type("User", false)
///     .implements(named.instance()?)?
///     .property("name", string)?
///     .construct()?;
/// assert!(user.own_property("name").is_some());
/// # Ok(())
/// # }
/// ```
///
/// A definition can be used as a type before it is closed through
/// [`reference`](Self::reference), which is how self-referential and mutually
/// recursive definitions are written:
///
/// ```
/// # use nominal_typechecker::define_type;
/// # fn main() -> nominal_typechecker::TypeResult<()> {
/// let mut node = define_type("Node", false);
/// let next = node.reference().with().nullable().construct()?;
/// let node = node.property("next", next)?.construct()?;
///
/// let found = node.instance()?.find("next")?.expect("declared on Node");
/// assert_eq!(found.property_type.to_string(), "Node?");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TypeDefinitionBuilder {
    name: String,
    package: Option<String>,
    is_interface: bool,
    parent: Option<ConstructedType>,
    interfaces: Vec<ConstructedType>,
    parameters: Vec<TypeVariable>,
    properties: Vec<(String, TypeExpression)>,
    config: TypeSystemConfig,
    shell: Option<Arc<TypeDefinition>>,
}

impl TypeDefinitionBuilder {
    pub fn new(name: impl Into<String>, is_interface: bool) -> Self {
        Self {
            name: name.into(),
            package: None,
            is_interface,
            parent: None,
            interfaces: Vec::new(),
            parameters: Vec::new(),
            properties: Vec::new(),
            config: TypeSystemConfig::default(),
            shell: None,
        }
    }

    /// Use `config` for the default package and for validation limits
    pub fn configure(mut self, config: &TypeSystemConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// The definition being built, usable as a type before it is closed
    ///
    /// The qualified name is fixed by the first call; changing the package
    /// afterwards makes `construct` fail. Instances of the open definition
    /// skip parameter checks until it closes, at which point its references
    /// to itself are checked.
    pub fn reference(&mut self) -> Arc<TypeDefinition> {
        let package = self.resolved_package();
        let shell = self.shell.get_or_insert_with(|| {
            Arc::new(TypeDefinition::open(self.name.clone(), package, self.is_interface))
        });
        Arc::clone(shell)
    }

    pub fn extends(mut self, parent: ConstructedType) -> TypeResult<Self> {
        if let Some(existing) = &self.parent {
            return Err(TypeSystemError::DuplicateParent {
                definition: self.name,
                parent: existing.to_string(),
            });
        }
        if !parent.definition().is_closed() {
            return Err(TypeSystemError::OpenSupertype {
                definition: self.name,
                supertype: parent.to_string(),
            });
        }
        if parent.definition().is_interface() != self.is_interface {
            return Err(TypeSystemError::KindMismatch {
                definition: self.name,
                parent: parent.to_string(),
            });
        }
        self.parent = Some(parent);
        Ok(self)
    }

    pub fn implements(mut self, interface: ConstructedType) -> TypeResult<Self> {
        if !interface.definition().is_closed() {
            return Err(TypeSystemError::OpenSupertype {
                definition: self.name,
                supertype: interface.to_string(),
            });
        }
        if !interface.definition().is_interface() {
            return Err(TypeSystemError::NotAnInterface {
                definition: self.name,
                target: interface.to_string(),
            });
        }
        if self
            .interfaces
            .iter()
            .any(|existing| existing.definition() == interface.definition())
        {
            return Err(TypeSystemError::DuplicateInterface {
                definition: self.name,
                interface: interface.to_string(),
            });
        }
        self.interfaces.push(interface);
        Ok(self)
    }

    /// Declare an unbounded type parameter
    pub fn parameter(self, name: impl Into<String>) -> TypeResult<Self> {
        self.declare_parameter(TypeVariable::new(name))
    }

    /// Declare a type parameter whose arguments must be assignable to `upper_bound`
    pub fn bounded_parameter(
        self,
        name: impl Into<String>,
        upper_bound: impl Into<TypeExpression>,
    ) -> TypeResult<Self> {
        self.declare_parameter(TypeVariable::bounded(name, upper_bound))
    }

    fn declare_parameter(mut self, parameter: TypeVariable) -> TypeResult<Self> {
        if self
            .parameters
            .iter()
            .any(|existing| existing.name() == parameter.name())
        {
            return Err(TypeSystemError::DuplicateParameter {
                definition: self.name,
                parameter: parameter.name().to_string(),
            });
        }
        self.parameters.push(parameter);
        Ok(self)
    }

    /// Reference a parameter declared so far, carrying its bound
    pub fn variable(&self, name: &str) -> TypeResult<TypeExpression> {
        self.parameters
            .iter()
            .find(|param| param.name() == name)
            .cloned()
            .map(TypeExpression::Variable)
            .ok_or_else(|| TypeSystemError::UndeclaredParameter {
                definition: self.name.clone(),
                parameter: name.to_string(),
            })
    }

    /// Declare a property; a repeated name must form a valid function overload
    pub fn property(
        mut self,
        name: impl Into<String>,
        property_type: impl Into<TypeExpression>,
    ) -> TypeResult<Self> {
        let name = name.into();
        let property_type = property_type.into();

        let existing: Vec<&TypeExpression> = self
            .properties
            .iter()
            .filter(|(property, _)| *property == name)
            .map(|(_, declared)| declared)
            .collect();
        if !existing.is_empty() && !validation::is_valid_overload(&existing, &property_type) {
            return Err(TypeSystemError::DuplicatePropertyName {
                definition: self.name,
                property: name,
            });
        }

        self.properties.push((name, property_type));
        Ok(self)
    }

    /// Validate and close the definition
    pub fn construct(mut self) -> TypeResult<Arc<TypeDefinition>> {
        self.check_declared_variables()?;

        let package = self.resolved_package();
        let shell = match self.shell.take() {
            Some(shell) if shell.package() != package => {
                return Err(TypeSystemError::PackageChangedAfterReference {
                    definition: self.name,
                    referenced: shell.qualified_name(),
                });
            }
            Some(shell) => shell,
            None => Arc::new(TypeDefinition::open(self.name.clone(), package, self.is_interface)),
        };
        self.check_self_references(&shell)?;

        let properties: Vec<(String, TypeExpression)> = self
            .properties
            .iter()
            .map(|(name, declared)| (name.clone(), with_declared_bounds(declared, &self.parameters)))
            .collect();

        validation::validate_interfaces(
            &self.name,
            &self.interfaces,
            &properties,
            &PropertyAccess::new(&self.config),
        )?;

        let body = DefinitionBody {
            parent: self.parent,
            interfaces: self.interfaces,
            parameters: self.parameters,
            properties,
        };
        if shell.body.set(body).is_err() {
            return Err(TypeSystemError::AlreadyConstructed {
                definition: shell.qualified_name(),
            });
        }

        debug!(definition = %shell.qualified_name(), "closed type definition");
        Ok(shell)
    }

    fn resolved_package(&self) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| self.config.default_package.clone())
    }

    /// Every type expression the declaration mentions
    fn declared_expressions(&self) -> Vec<&TypeExpression> {
        let mut expressions: Vec<&TypeExpression> = Vec::new();
        expressions.extend(self.parameters.iter().filter_map(TypeVariable::upper_bound));
        expressions.extend(self.properties.iter().map(|(_, declared)| declared));
        for supertype in self.parent.iter().chain(&self.interfaces) {
            expressions.extend(supertype.bindings().iter().map(|(_, argument)| argument));
        }
        expressions
    }

    /// Every type variable mentioned by the declaration must be one of its parameters
    fn check_declared_variables(&self) -> TypeResult<()> {
        let mut undeclared: Option<&str> = None;
        for expression in self.declared_expressions() {
            expression.visit_variables(&mut |variable| {
                let declared = self
                    .parameters
                    .iter()
                    .any(|param| param.name() == variable.name());
                if !declared && undeclared.is_none() {
                    undeclared = Some(variable.name());
                }
            });
        }

        match undeclared {
            Some(parameter) => Err(TypeSystemError::UndeclaredParameter {
                definition: self.name.clone(),
                parameter: parameter.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Instances of `shell` created while it was open must bind exactly the
    /// declared parameters
    fn check_self_references(&self, shell: &Arc<TypeDefinition>) -> TypeResult<()> {
        let mut failure: Option<TypeSystemError> = None;
        for expression in self.declared_expressions() {
            expression.visit_constructed(&mut |constructed| {
                if failure.is_some() || !Arc::ptr_eq(constructed.definition(), shell) {
                    return;
                }
                let bindings = constructed.bindings();
                if let Some((param, _)) = bindings
                    .iter()
                    .find(|(param, _)| !self.parameters.iter().any(|p| p.name() == *param))
                {
                    failure = Some(TypeSystemError::UndeclaredParameter {
                        definition: self.name.clone(),
                        parameter: param.to_string(),
                    });
                } else if let Some(param) = self
                    .parameters
                    .iter()
                    .find(|param| !bindings.contains(param.name()))
                {
                    failure = Some(TypeSystemError::UnboundParameter {
                        parameter: param.name().to_string(),
                    });
                }
            });
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Give unbounded variable references the bound of their declaration, so a
/// property typed `T` can be searched through `T`'s bound
fn with_declared_bounds(expression: &TypeExpression, parameters: &[TypeVariable]) -> TypeExpression {
    match expression {
        TypeExpression::Variable(variable) => {
            let declared = parameters
                .iter()
                .find(|param| param.name() == variable.name())
                .and_then(TypeVariable::upper_bound);
            if declared.is_some() && variable.upper_bound().is_none() {
                trace!(variable = %variable, "attaching declared bound");
            }
            TypeExpression::Variable(variable.with_default_bound(declared))
        }
        TypeExpression::Constructed(constructed) => {
            let bindings = constructed
                .bindings()
                .iter()
                .map(|(param, argument)| {
                    (param.to_string(), with_declared_bounds(argument, parameters))
                })
                .collect();
            TypeExpression::Constructed(constructed.with_bindings(bindings))
        }
        TypeExpression::Function(function) => TypeExpression::Function(FunctionType::new(
            function
                .params()
                .iter()
                .map(|(name, param_type)| (name.clone(), with_declared_bounds(param_type, parameters))),
            with_declared_bounds(function.return_type(), parameters),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_qualified_name() {
        let first = TypeDefinition::class("A").package("core").construct().unwrap();
        let second = TypeDefinition::class("A")
            .package("core")
            .property("x", TypeDefinition::class("X").construct().unwrap().instance().unwrap())
            .unwrap()
            .construct()
            .unwrap();
        let elsewhere = TypeDefinition::class("A").package("app").construct().unwrap();

        assert_eq!(first, second);
        assert_ne!(first, elsewhere);
        assert_eq!(elsewhere.qualified_name(), "app.A");
    }

    #[test]
    fn test_default_package_comes_from_config() {
        let config = TypeSystemConfig::default().with_default_package("lib");
        let definition = TypeDefinition::class("A").configure(&config).construct().unwrap();
        assert_eq!(definition.qualified_name(), "lib.A");

        let explicit = TypeDefinition::class("A")
            .package("app")
            .configure(&config)
            .construct()
            .unwrap();
        assert_eq!(explicit.qualified_name(), "app.A");
    }

    #[test]
    fn test_display() {
        let any = TypeDefinition::class("Any").construct().unwrap().instance().unwrap();
        let definition = TypeDefinition::interface("Map")
            .parameter("K")
            .unwrap()
            .bounded_parameter("V", any)
            .unwrap()
            .construct()
            .unwrap();

        assert_eq!(definition.to_string(), "interface Map<K, V: Any>");
    }

    #[test]
    fn test_reference_is_open_until_construct() {
        let mut builder = TypeDefinition::class("Node").package("graph");
        let reference = builder.reference();
        assert!(!reference.is_closed());
        assert!(reference.properties().is_empty());
        assert_eq!(
            format!("{reference:?}"),
            r#"TypeDefinition { name: "Node", package: "graph", is_interface: false, closed: false, .. }"#
        );

        let closed = builder.property("id", reference.instance().unwrap()).unwrap().construct().unwrap();
        assert!(Arc::ptr_eq(&closed, &reference));
        assert!(reference.is_closed());
        assert!(reference.own_property("id").is_some());
    }

    #[test]
    fn test_package_is_fixed_by_reference() {
        let mut builder = TypeDefinition::class("Node");
        let _ = builder.reference();
        let err = builder.package("graph").construct().unwrap_err();
        assert_eq!(err.kind(), "PackageChangedAfterReference");
    }

    #[test]
    fn test_shared_reference_closes_once() {
        let mut builder = TypeDefinition::class("Node");
        let _ = builder.reference();
        let copy = builder.clone();

        assert!(builder.construct().is_ok());
        let err = copy.construct().unwrap_err();
        assert_eq!(err.kind(), "AlreadyConstructed");
    }
}
