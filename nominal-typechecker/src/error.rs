//! Error types for the nominal type system
//!
//! Every failure is synchronous and reported eagerly: builder steps fail as soon
//! as an invalid declaration is added, and a definition that fails to close is
//! never observable.

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the crate
pub type TypeResult<T> = Result<T, TypeSystemError>;

/// Main error type covering construction, instantiation and query failures
#[derive(Error, Diagnostic, Debug)]
pub enum TypeSystemError {
    #[error("Parameter {parameter} is already bound")]
    #[diagnostic(
        code(nominal::bindings::duplicate_binding),
        help("Each type parameter can only be bound once per instantiation")
    )]
    DuplicateBinding { parameter: String },

    #[error("Unbound parameter: {parameter}")]
    #[diagnostic(
        code(nominal::bindings::unbound_parameter),
        help("Bind every declared type parameter before constructing an instance")
    )]
    UnboundParameter { parameter: String },

    #[error("{definition} cannot extend {parent}: class and interface kinds differ")]
    #[diagnostic(
        code(nominal::definition::kind_mismatch),
        help("Classes may only extend classes and interfaces may only extend interfaces")
    )]
    KindMismatch { definition: String, parent: String },

    #[error("{definition} already extends {parent}")]
    #[diagnostic(
        code(nominal::definition::duplicate_parent),
        help("A definition has at most one parent; use interfaces for additional supertypes")
    )]
    DuplicateParent { definition: String, parent: String },

    #[error("{definition} cannot inherit from {supertype} before it is constructed")]
    #[diagnostic(
        code(nominal::definition::open_supertype),
        help("Open definitions may be used as property types or type arguments, not as supertypes")
    )]
    OpenSupertype { definition: String, supertype: String },

    #[error("Package of {definition} changed after it was referenced as {referenced}")]
    #[diagnostic(
        code(nominal::definition::package_changed),
        help("Set the package before calling .reference()")
    )]
    PackageChangedAfterReference { definition: String, referenced: String },

    #[error("{definition} has already been constructed")]
    #[diagnostic(code(nominal::definition::already_constructed))]
    AlreadyConstructed { definition: String },

    #[error("{definition} cannot implement {target}: only interfaces can be implemented")]
    #[diagnostic(code(nominal::definition::not_an_interface))]
    NotAnInterface { definition: String, target: String },

    #[error("{definition} already implements {interface}")]
    #[diagnostic(
        code(nominal::definition::duplicate_interface),
        help("Each interface can only be implemented once per definition")
    )]
    DuplicateInterface { definition: String, interface: String },

    #[error("Type parameter {parameter} is declared twice on {definition}")]
    #[diagnostic(code(nominal::definition::duplicate_parameter))]
    DuplicateParameter { definition: String, parameter: String },

    #[error("Type parameter {parameter} is not declared on {definition}")]
    #[diagnostic(
        code(nominal::definition::undeclared_parameter),
        help("Declare the parameter with .parameter() before referring to it")
    )]
    UndeclaredParameter { definition: String, parameter: String },

    #[error("Property {property} is already defined on {definition}")]
    #[diagnostic(
        code(nominal::definition::duplicate_property),
        help("Only function properties with one shared return type and distinct parameter lists can be overloaded")
    )]
    DuplicatePropertyName { definition: String, property: String },

    #[error("Type argument {argument} does not satisfy bound {bound} of parameter {parameter} on {definition}")]
    #[diagnostic(code(nominal::instantiation::bound_violation))]
    BoundViolation {
        definition: String,
        parameter: String,
        bound: String,
        argument: String,
    },

    #[error("Interface type clash on {definition}: property {property} is required as both {first} and {second}")]
    #[diagnostic(
        code(nominal::interface::type_clash),
        help("Implemented interfaces must agree on the type of every shared property")
    )]
    InterfaceTypeClash {
        definition: String,
        property: String,
        first: String,
        second: String,
    },

    #[error("{definition} does not implement property {property}: {expected} required by {interface}")]
    #[diagnostic(
        code(nominal::interface::not_implemented),
        help("Declare the property directly with exactly the required type")
    )]
    InterfaceNotImplemented {
        definition: String,
        interface: String,
        property: String,
        expected: String,
    },

    #[error("Recursion limit of {limit} exceeded while {context}")]
    #[diagnostic(
        code(nominal::recursion_limit),
        help("The type graph is nested deeper than the configured max_depth")
    )]
    RecursionLimitExceeded { limit: usize, context: String },

    #[error("Invalid type system configuration: {0}")]
    #[diagnostic(code(nominal::config::invalid))]
    InvalidConfig(#[from] toml::de::Error),
}

impl TypeSystemError {
    /// Stable diagnostic-free name of the error kind, used by callers that map
    /// failures onto their own messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateBinding { .. } => "DuplicateBinding",
            Self::UnboundParameter { .. } => "UnboundParameter",
            Self::KindMismatch { .. } => "KindMismatch",
            Self::DuplicateParent { .. } => "DuplicateParent",
            Self::OpenSupertype { .. } => "OpenSupertype",
            Self::PackageChangedAfterReference { .. } => "PackageChangedAfterReference",
            Self::AlreadyConstructed { .. } => "AlreadyConstructed",
            Self::NotAnInterface { .. } => "NotAnInterface",
            Self::DuplicateInterface { .. } => "DuplicateInterface",
            Self::DuplicateParameter { .. } => "DuplicateParameter",
            Self::UndeclaredParameter { .. } => "UndeclaredParameter",
            Self::DuplicatePropertyName { .. } => "DuplicatePropertyName",
            Self::BoundViolation { .. } => "BoundViolation",
            Self::InterfaceTypeClash { .. } => "InterfaceTypeClash",
            Self::InterfaceNotImplemented { .. } => "InterfaceNotImplemented",
            Self::RecursionLimitExceeded { .. } => "RecursionLimitExceeded",
            Self::InvalidConfig(_) => "InvalidConfig",
        }
    }
}
