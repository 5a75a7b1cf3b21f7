//! Tests for property lookup along the inheritance chain

use super::{bind, box_definition, expr, function, instance, var, CoreTypes};
use crate::{define_type, PropertyLookupResult, TypeExpression};
use pretty_assertions::assert_eq;

#[test]
fn test_own_property_is_found_at_depth_zero() {
    let core = CoreTypes::new();
    let point = define_type("Point", false)
        .property("x", instance(&core.int))
        .unwrap()
        .property("y", instance(&core.int))
        .unwrap()
        .construct()
        .unwrap();

    let found = instance(&point).find("y").unwrap().unwrap();
    assert_eq!(
        found,
        PropertyLookupResult {
            depth: 0,
            position: 1,
            property_type: expr(&core.int),
        }
    );
    assert_eq!(found.to_string(), "Int (depth 0, position 1)");
}

#[test]
fn test_missing_property_is_none() {
    let core = CoreTypes::new();
    assert_eq!(instance(&core.int).find("length").unwrap(), None);
}

#[test]
fn test_inherited_properties_report_depth() {
    let core = CoreTypes::new();
    let b = define_type("B", false)
        .property("x", instance(&core.string))
        .unwrap()
        .property("y", instance(&core.int))
        .unwrap()
        .construct()
        .unwrap();
    let c = define_type("C", false)
        .extends(instance(&b))
        .unwrap()
        .property("z", instance(&core.number))
        .unwrap()
        .construct()
        .unwrap();
    let d = define_type("D", false)
        .extends(instance(&c))
        .unwrap()
        .property("y", instance(&core.string))
        .unwrap()
        .construct()
        .unwrap();
    let d = instance(&d);

    let x = d.find("x").unwrap().unwrap();
    assert_eq!((x.depth, x.position), (2, 0));
    assert_eq!(x.property_type, expr(&core.string));

    let z = d.find("z").unwrap().unwrap();
    assert_eq!((z.depth, z.position), (1, 0));

    // D's own y shadows B's
    let y = d.find("y").unwrap().unwrap();
    assert_eq!((y.depth, y.position), (0, 0));
    assert_eq!(y.property_type, expr(&core.string));
}

#[test]
fn test_generic_property_is_resolved() {
    let core = CoreTypes::new();
    let box_of_string = bind(&box_definition(), "T", instance(&core.string));

    let found = box_of_string.find("value").unwrap().unwrap();
    assert_eq!(found.property_type, expr(&core.string));
}

#[test]
fn test_inherited_generic_property_is_remapped() {
    let core = CoreTypes::new();
    let boxed = box_definition();

    // class Pair<K, V> extends Box<T=V> { key: K }
    let pair = define_type("Pair", false)
        .parameter("K")
        .unwrap()
        .parameter("V")
        .unwrap();
    let parent = bind(&boxed, "T", pair.variable("V").unwrap());
    let key = pair.variable("K").unwrap();
    let pair = pair
        .extends(parent)
        .unwrap()
        .property("key", key)
        .unwrap()
        .construct()
        .unwrap();

    // class Entry<N> extends Pair<K=String, V=N>
    let entry = define_type("Entry", false).parameter("N").unwrap();
    let parent = pair
        .with()
        .bind("K", instance(&core.string))
        .unwrap()
        .bind("V", entry.variable("N").unwrap())
        .unwrap()
        .construct()
        .unwrap();
    let entry = entry.extends(parent).unwrap().construct().unwrap();

    let entry_of_int = bind(&entry, "N", instance(&core.int));
    let value = entry_of_int.find("value").unwrap().unwrap();
    assert_eq!(value.depth, 2);
    assert_eq!(value.property_type, expr(&core.int));

    let key = entry_of_int.find("key").unwrap().unwrap();
    assert_eq!(key.depth, 1);
    assert_eq!(key.property_type, expr(&core.string));
}

#[test]
fn test_nested_arguments_are_substituted() {
    let core = CoreTypes::new();
    let boxed = box_definition();

    // class Node<T> { child: Box<T=T>, compare: (a: T, b: T) -> Int }
    let node = define_type("Node", false).parameter("T").unwrap();
    let t = node.variable("T").unwrap();
    let child = bind(&boxed, "T", t.clone());
    let compare = function(&[("a", t.clone()), ("b", t)], expr(&core.int));
    let node = node
        .property("child", child)
        .unwrap()
        .property("compare", compare)
        .unwrap()
        .construct()
        .unwrap();

    let node_of_string = bind(&node, "T", instance(&core.string));

    let child = node_of_string.find("child").unwrap().unwrap();
    assert_eq!(
        child.property_type,
        TypeExpression::from(bind(&boxed, "T", instance(&core.string)))
    );

    let compare = node_of_string.find("compare").unwrap().unwrap();
    assert_eq!(compare.property_type.to_string(), "(a: String, b: String) -> Int");
}

#[test]
fn test_nullable_variable_resolves_to_nullable_type() {
    let core = CoreTypes::new();

    // class Maybe<T> { value: T? }
    let maybe = define_type("Maybe", false).parameter("T").unwrap();
    let value = maybe.variable("T").unwrap().nullable();
    let maybe = maybe.property("value", value).unwrap().construct().unwrap();

    let found = bind(&maybe, "T", instance(&core.string)).find("value").unwrap().unwrap();
    assert_eq!(found.property_type, expr(&core.string).nullable());
    assert_eq!(found.property_type.to_string(), "String?");
}

#[test]
fn test_lookup_through_parameter_bound() {
    let core = CoreTypes::new();
    let b = define_type("B", false)
        .property("y", instance(&core.string))
        .unwrap()
        .construct()
        .unwrap();

    // class A<T: B> { item: T }
    let a = define_type("A", false).bounded_parameter("T", instance(&b)).unwrap();
    let item = a.variable("T").unwrap();
    let a = a.property("item", item).unwrap().construct().unwrap();

    let (_, item) = a.own_property("item").unwrap();
    let found = item.find("y").unwrap().unwrap();
    assert_eq!(found.property_type, expr(&core.string));

    assert_eq!(var("T").find("y").unwrap(), None);
}

#[test]
fn test_function_types_have_no_properties() {
    let core = CoreTypes::new();
    let callback = function(&[], expr(&core.int));
    assert_eq!(callback.find("arity").unwrap(), None);
}

#[test]
fn test_overload_lookup_returns_first_declared() {
    let core = CoreTypes::new();
    let print_string = function(&[("s", expr(&core.string))], expr(&core.any));
    let print_int = function(&[("n", expr(&core.int))], expr(&core.any));
    let printer = define_type("Printer", false)
        .property("print", print_string.clone())
        .unwrap()
        .property("print", print_int)
        .unwrap()
        .construct()
        .unwrap();

    let found = instance(&printer).find("print").unwrap().unwrap();
    assert_eq!(found.position, 0);
    assert_eq!(found.property_type, print_string);
}

#[test]
fn test_all_properties_skips_shadowed_names() {
    let core = CoreTypes::new();
    let base = define_type("Base", false)
        .property("id", instance(&core.int))
        .unwrap()
        .property("name", instance(&core.any))
        .unwrap()
        .construct()
        .unwrap();
    let derived = define_type("Derived", false)
        .extends(instance(&base))
        .unwrap()
        .property("name", instance(&core.string))
        .unwrap()
        .construct()
        .unwrap();

    let properties = instance(&derived).all_properties().unwrap();
    assert_eq!(
        properties,
        vec![
            ("name".to_string(), expr(&core.string)),
            ("id".to_string(), expr(&core.int)),
        ]
    );
    assert_eq!(derived.all_property_names(), vec!["name", "id"]);
}

#[test]
fn test_lookup_through_self_referential_property() {
    let core = CoreTypes::new();

    // class Node { value: Int, next: Node? }
    let mut node = define_type("Node", false);
    let next = node.reference().with().nullable().construct().unwrap();
    let node = node
        .property("value", instance(&core.int))
        .unwrap()
        .property("next", next)
        .unwrap()
        .construct()
        .unwrap();

    let next = instance(&node).find("next").unwrap().unwrap();
    assert_eq!(next.position, 1);
    assert_eq!(next.property_type, expr(&node).nullable());

    // next.next.value resolves through the same definition
    let next_next = next.property_type.find("next").unwrap().unwrap();
    let value = next_next.property_type.find("value").unwrap().unwrap();
    assert_eq!(value.property_type, expr(&core.int));
}

#[test]
fn test_lookup_through_mutually_recursive_properties() {
    let mut string = define_type("String", false);
    let mut int = define_type("Int", false);
    let string_ref = string.reference();
    let int_ref = int.reference();

    let string = string
        .property("length", int_ref.instance().unwrap())
        .unwrap()
        .construct()
        .unwrap();
    let int = int
        .property("toString", string_ref.instance().unwrap())
        .unwrap()
        .construct()
        .unwrap();

    let length = instance(&string).find("length").unwrap().unwrap();
    let to_string = length.property_type.find("toString").unwrap().unwrap();
    assert_eq!(to_string.property_type, expr(&string));

    let round_trip = to_string.property_type.find("length").unwrap().unwrap();
    assert_eq!(round_trip.property_type, expr(&int));
}

#[test]
fn test_generic_self_reference_is_resolved() {
    let core = CoreTypes::new();

    // class Tree<T> { item: T, children: Tree<T=T> }
    let mut tree = define_type("Tree", false).parameter("T").unwrap();
    let item = tree.variable("T").unwrap();
    let children = tree.reference().with().bind("T", item.clone()).unwrap().construct().unwrap();
    let tree = tree
        .property("item", item)
        .unwrap()
        .property("children", children)
        .unwrap()
        .construct()
        .unwrap();

    let tree_of_int = bind(&tree, "T", instance(&core.int));
    let children = tree_of_int.find("children").unwrap().unwrap();
    assert_eq!(children.property_type, TypeExpression::from(tree_of_int.clone()));

    let item = children.property_type.find("item").unwrap().unwrap();
    assert_eq!(item.property_type, expr(&core.int));
}
