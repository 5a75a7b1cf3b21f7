//! Tests for the nominal type model
//!
//! Shared fixtures live here; each `test_*` module covers one area.

mod test_property_access;

use crate::{define_type, ConstructedType, TypeDefinition, TypeExpression};
use std::sync::Arc;

/// A small class tree: `Any <- String`, `Any <- Number <- Int`
pub(crate) struct CoreTypes {
    pub any: Arc<TypeDefinition>,
    pub string: Arc<TypeDefinition>,
    pub number: Arc<TypeDefinition>,
    pub int: Arc<TypeDefinition>,
}

impl CoreTypes {
    pub fn new() -> Self {
        let any = define_type("Any", false).package("core").construct().unwrap();
        let string = define_type("String", false)
            .package("core")
            .extends(instance(&any))
            .unwrap()
            .construct()
            .unwrap();
        let number = define_type("Number", false)
            .package("core")
            .extends(instance(&any))
            .unwrap()
            .construct()
            .unwrap();
        let int = define_type("Int", false)
            .package("core")
            .extends(instance(&number))
            .unwrap()
            .construct()
            .unwrap();

        Self {
            any,
            string,
            number,
            int,
        }
    }
}

pub(crate) fn instance(definition: &Arc<TypeDefinition>) -> ConstructedType {
    definition.instance().unwrap()
}

pub(crate) fn expr(definition: &Arc<TypeDefinition>) -> TypeExpression {
    instance(definition).into()
}

pub(crate) fn var(name: &str) -> TypeExpression {
    TypeExpression::variable(name)
}

pub(crate) fn function(params: &[(&str, TypeExpression)], return_type: TypeExpression) -> TypeExpression {
    TypeExpression::function(params.iter().cloned(), return_type)
}

/// `class Box<T> { value: T }`
pub(crate) fn box_definition() -> Arc<TypeDefinition> {
    let builder = define_type("Box", false).parameter("T").unwrap();
    let value = builder.variable("T").unwrap();
    builder.property("value", value).unwrap().construct().unwrap()
}

pub(crate) fn bind(
    definition: &Arc<TypeDefinition>,
    param: &str,
    argument: impl Into<TypeExpression>,
) -> ConstructedType {
    definition
        .with()
        .bind(param, argument)
        .unwrap()
        .construct()
        .unwrap()
}
