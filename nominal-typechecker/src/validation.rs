//! Declaration checks run while building a definition

use crate::error::{TypeResult, TypeSystemError};
use crate::property_access::PropertyAccess;
use crate::types::{ConstructedType, TypeExpression};
use indexmap::IndexMap;
use tracing::trace;

/// Whether `candidate` may join the already declared properties of one name
///
/// Only function types overload. All overloads share one return type, and two
/// overloads of equal arity must differ in at least one parameter type.
pub(crate) fn is_valid_overload(existing: &[&TypeExpression], candidate: &TypeExpression) -> bool {
    let Some(candidate) = candidate.as_function() else {
        return false;
    };

    existing.iter().all(|declared| match declared.as_function() {
        Some(declared) => {
            declared.return_type() == candidate.return_type()
                && !declared.has_same_parameter_types(candidate)
        }
        None => false,
    })
}

/// Properties an interface instance requires, grouped by name
fn requirements_of(
    interface: &ConstructedType,
    access: &PropertyAccess,
) -> TypeResult<IndexMap<String, Vec<TypeExpression>>> {
    let mut required: IndexMap<String, Vec<TypeExpression>> = IndexMap::new();
    for (name, property_type) in access.all_properties(interface)? {
        required.entry(name).or_default().push(property_type);
    }
    Ok(required)
}

fn same_signatures(first: &[TypeExpression], second: &[TypeExpression]) -> bool {
    first.len() == second.len() && first.iter().all(|ty| second.contains(ty))
}

fn describe(types: &[TypeExpression]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Whether `properties` contains `name` with exactly `expected` as its type
pub(crate) fn declares(
    properties: &[(String, TypeExpression)],
    name: &str,
    expected: &TypeExpression,
) -> bool {
    properties
        .iter()
        .any(|(property, property_type)| property == name && property_type == expected)
}

/// Check that a definition directly declares everything its interfaces require
///
/// Requirements are gathered from every implemented interface, including the
/// interfaces' own parents. Two interfaces that disagree on a property's type
/// clash. Each requirement must then be met by one of `properties`, the
/// definition's own declarations, with exactly the required type.
pub(crate) fn validate_interfaces(
    definition: &str,
    interfaces: &[ConstructedType],
    properties: &[(String, TypeExpression)],
    access: &PropertyAccess,
) -> TypeResult<()> {
    let mut required: IndexMap<String, (Vec<TypeExpression>, String)> = IndexMap::new();

    for interface in interfaces {
        for (name, types) in requirements_of(interface, access)? {
            match required.get(&name) {
                Some((previous, _)) if !same_signatures(previous, &types) => {
                    return Err(TypeSystemError::InterfaceTypeClash {
                        definition: definition.to_string(),
                        property: name,
                        first: describe(previous),
                        second: describe(&types),
                    });
                }
                Some(_) => {}
                None => {
                    required.insert(name, (types, interface.to_string()));
                }
            }
        }
    }

    for (name, (types, interface)) in &required {
        for expected in types {
            trace!(property = %name, expected = %expected, "checking interface requirement");
            if !declares(properties, name, expected) {
                return Err(TypeSystemError::InterfaceNotImplemented {
                    definition: definition.to_string(),
                    interface: interface.clone(),
                    property: name.clone(),
                    expected: expected.to_string(),
                });
            }
        }
    }

    Ok(())
}
