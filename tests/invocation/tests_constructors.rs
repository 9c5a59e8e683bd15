//! Constructor lookup and instantiation.

use std::sync::Arc;

use reflect::host::{Loader, Primitive, SearchScope, TypeBuilder, TypeRegistry, object};
use reflect::{DefaultReflection, Reflection};
use rstest::rstest;

use crate::helpers::fixtures::*;

fn catalog_reflection() -> DefaultReflection {
    DefaultReflection::new(Arc::clone(&*CATALOG))
}

// =============================================================================
// PARAMETERISED CONSTRUCTORS
// =============================================================================

#[test]
fn test_widget_with_parts() {
    let reflection = catalog_reflection();
    let ctor = reflection
        .get_constructor("pkg.Widget(int,pkg.Part[])")
        .unwrap()
        .expect("pkg.Widget(int, pkg.Part[]) should resolve");

    let parts = reflection.get_type("[Lpkg.Part;").unwrap();
    assert_eq!(ctor.parameter_types(), &[Primitive::Int.handle(), parts]);

    let value = ctor
        .new_instance2(object(5i32), object(vec![Part { id: 1 }, Part { id: 2 }]))
        .unwrap();
    let widget = value.downcast_ref::<Widget>().unwrap();
    assert_eq!(widget.size, 5);
    assert_eq!(widget.parts, vec![Part { id: 1 }, Part { id: 2 }]);
}

#[test]
fn test_unresolvable_parameter_makes_constructor_absent() {
    let registry = TypeRegistry::named("partial");
    registry
        .define(
            TypeBuilder::class("pkg.Widget")
                .constructor(&["int", "pkg.Part[]"], |_| Ok(object(()))),
        )
        .unwrap();
    let reflection = DefaultReflection::new(Arc::new(registry));
    assert!(reflection
        .get_constructor("pkg.Widget(int,pkg.Part[])")
        .unwrap()
        .is_none());

    let reflection = catalog_reflection();
    assert!(reflection
        .get_constructor("pkg.Widget(int,pkg.Missing[])")
        .unwrap()
        .is_none());
}

#[test]
fn test_parameter_from_other_loader_does_not_match() {
    let plugin = Arc::new(TypeRegistry::named("plugin"));
    plugin.define(TypeBuilder::class("pkg.Part")).unwrap();
    plugin
        .define(TypeBuilder::class("pkg.Mount").constructor(&["pkg.Part"], |_| Ok(object(()))))
        .unwrap();

    // pkg.Part resolves from the catalog first, which is not the Part pkg.Mount takes.
    let reflection = DefaultReflection::new(Arc::clone(&*CATALOG));
    reflection.add_search_scope(SearchScope::from(Arc::clone(&plugin)));
    assert!(reflection.get_constructor("pkg.Mount(pkg.Part)").unwrap().is_none());
    assert!(reflection.get_constructor("pkg.Mount()").unwrap().is_some());

    let own = DefaultReflection::new(Arc::clone(&plugin));
    let ctor = own.get_constructor("pkg.Mount(pkg.Part)").unwrap().unwrap();
    let part = plugin.load_type("pkg.Part").unwrap();
    assert_eq!(ctor.parameter_types(), std::slice::from_ref(&part));
    assert_ne!(Some(part), CATALOG.load_type("pkg.Part"));
}

#[rstest]
#[case("pkg.Widget(long)")]
#[case("pkg.Widget(int)")]
#[case("pkg.Widget(int, pkg.Part)")]
#[case("pkg.Part(int, int)")]
#[case("pkg.Missing(int)")]
fn test_no_matching_constructor(#[case] signature: &str) {
    let reflection = catalog_reflection();
    assert!(reflection.get_constructor(signature).unwrap().is_none());
}

#[test]
fn test_variadic_entry_point() {
    let reflection = catalog_reflection();
    let ctor = reflection.get_constructor("pkg.Part(int)").unwrap().unwrap();
    let part = ctor.new_instance_with(&[object(9i32)]).unwrap();
    assert_eq!(part.downcast_ref::<Part>(), Some(&Part { id: 9 }));
    assert!(ctor.new_instance_with(&[]).unwrap_err().is_arity_mismatch());
}

#[test]
fn test_multidimensional_parameter() {
    let reflection = catalog_reflection();
    let ctor = reflection.get_constructor("pkg.Grid(int[][])").unwrap().unwrap();
    let cells = ctor
        .new_instance1(object(vec![vec![1i32, 2], vec![3]]))
        .unwrap();
    assert_eq!(cells.downcast_ref::<usize>(), Some(&3));
}

// =============================================================================
// DEFAULT CONSTRUCTORS
// =============================================================================

#[test]
fn test_default_constructor() {
    let reflection = catalog_reflection();
    let ctor = reflection.get_constructor("pkg.Widget()").unwrap().unwrap();
    let value = ctor.new_instance().unwrap();
    assert_eq!(
        value.downcast_ref::<Widget>(),
        Some(&Widget {
            size: 0,
            parts: Vec::new()
        })
    );
}

#[test]
fn test_default_constructor_rejects_arguments() {
    let reflection = catalog_reflection();
    let ctor = reflection.get_constructor("pkg.Widget()").unwrap().unwrap();

    let results = [
        ctor.new_instance1(object(1i32)),
        ctor.new_instance2(object(1i32), object(2i32)),
        ctor.new_instance3(object(1i32), object(2i32), object(3i32)),
        ctor.new_instance4(object(1i32), object(2i32), object(3i32), object(4i32)),
    ];
    for (supplied, result) in (1..).zip(results) {
        match result.unwrap_err() {
            reflect::ReflectError::ArityMismatch {
                expected,
                supplied: got,
            } => {
                assert_eq!(expected, 0);
                assert_eq!(got, supplied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_default_constructor_for_absent_type() {
    let reflection = catalog_reflection();
    assert!(reflection.get_constructor("pkg.Missing()").unwrap().is_none());
}

#[test]
fn test_default_constructor_needs_no_arg_constructor() {
    let reflection = catalog_reflection();
    let ctor = reflection.get_constructor("pkg.Part()").unwrap().unwrap();
    let err = ctor.new_instance().unwrap_err();
    assert!(matches!(err, reflect::ReflectError::Invocation { .. }));
    assert!(err.to_string().contains("pkg.Part default constructor"));
}
