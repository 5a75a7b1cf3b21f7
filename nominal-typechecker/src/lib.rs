//! Nominal Typechecker
//!
//! A nominal, generic type model with single inheritance, interfaces and
//! invariant type arguments.
//!
//! ## Architecture
//!
//! - **Definitions**: classes and interfaces are assembled with a
//!   [`TypeDefinitionBuilder`] and closed into a shared `Arc<TypeDefinition>`
//! - **Instances**: a [`ConstructedType`] binds every parameter of a
//!   definition and records nullability
//! - **Property Access**: lookup walks the parent chain, resolving inherited
//!   property types through each level's type arguments
//! - **Type Hierarchy**: assignability follows declared supertypes only, and
//!   type arguments must match exactly
//!
//! ## Example
//!
//! ```
//! use nominal_typechecker::{define_type, TypeExpression};
//!
//! # fn main() -> nominal_typechecker::TypeResult<()> {
//! let any = define_type("Any", false).construct()?;
//! let string = define_type("String", false).extends(any.instance()?)?.construct()?;
//!
//! let boxed = define_type("Box", false).parameter("T")?;
//! let value = boxed.variable("T")?;
//! let boxed = boxed.property("value", value)?.construct()?;
//!
//! let box_of_string = boxed.with().bind("T", string.instance()?)?.construct()?;
//! let found = box_of_string.find("value")?.expect("declared on Box");
//! assert_eq!(found.property_type, TypeExpression::from(string.instance()?));
//!
//! let box_of_any = boxed.with().bind("T", any.instance()?)?.construct()?;
//! assert!(!box_of_any.is_assignable_from(&box_of_string)?);
//! # Ok(())
//! # }
//! ```

pub mod bindings;
pub mod config;
pub mod definition;
pub mod error;
pub mod hierarchy;
pub mod property_access;
pub mod types;
mod validation;

pub use bindings::ParameterBindings;
pub use config::TypeSystemConfig;
pub use definition::{TypeDefinition, TypeDefinitionBuilder};
pub use error::{TypeResult, TypeSystemError};
pub use hierarchy::TypeHierarchy;
pub use property_access::PropertyAccess;
pub use types::{
    ConstructedType, FunctionType, PropertyLookupResult, TypeExpression, TypeInstantiation,
    TypeVariable,
};

/// Start building a class (`is_interface == false`) or interface definition
pub fn define_type(name: impl Into<String>, is_interface: bool) -> TypeDefinitionBuilder {
    TypeDefinitionBuilder::new(name, is_interface)
}

#[cfg(test)]
mod tests;
