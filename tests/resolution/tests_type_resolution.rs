//! Type name and array descriptor resolution.

use std::sync::Arc;

use reflect::host::{Loader, Primitive, TypeKind, TypeRegistry};
use reflect::{DefaultReflection, Reflection};
use rstest::rstest;

use crate::helpers::fixtures::*;
use crate::helpers::loaders::CountingLoader;

fn catalog_reflection() -> DefaultReflection {
    DefaultReflection::new(Arc::clone(&*CATALOG))
}

// =============================================================================
// NOT FOUND
// =============================================================================

#[rstest]
#[case("pkg.Missing")]
#[case("Widget")]
#[case("")]
#[case("int")]
#[case("[Lpkg.Missing;")]
#[case("[X")]
fn test_unresolvable_names_are_absent(#[case] name: &str) {
    let reflection = catalog_reflection();
    assert!(reflection.get_type(name).is_none());
}

#[test]
fn test_get_method_on_absent_type_is_absent() {
    let reflection = DefaultReflection::new(Arc::new(TypeRegistry::new()));
    let method = reflection.get_method("pkg.Util.compute()").unwrap();
    assert!(method.is_none());
}

// =============================================================================
// NAMES AND DESCRIPTORS
// =============================================================================

#[test]
fn test_qualified_name_resolves() {
    let reflection = catalog_reflection();
    let widget = reflection.get_type("pkg.Widget").unwrap();
    assert_eq!(widget.name(), "pkg.Widget");
    assert_eq!(widget.kind(), &TypeKind::Class);
    assert_eq!(CATALOG.load_type("pkg.Widget"), Some(widget));
}

#[test]
fn test_two_dimensional_token_matches_descriptor() {
    let reflection = catalog_reflection();
    let direct = reflection.get_type("[[I").unwrap();

    let grid = reflection.get_constructor("pkg.Grid(int[][])").unwrap().unwrap();
    assert_eq!(grid.parameter_types(), std::slice::from_ref(&direct));
    assert_eq!(direct.dimensions(), 2);
    assert_eq!(
        direct.component_type().and_then(|c| c.component_type()),
        Some(&Primitive::Int.handle())
    );
}

#[test]
fn test_reference_array_descriptor() {
    let reflection = catalog_reflection();
    let parts = reflection.get_type("[Lpkg.Part;").unwrap();
    let part = reflection.get_type("pkg.Part").unwrap();
    assert!(parts.is_array());
    assert_eq!(parts.component_type(), Some(&part));
}

#[test]
fn test_four_dimensions_rejected_before_lookup() {
    let reflection = catalog_reflection();
    let err = reflection
        .get_constructor("pkg.Grid(int[][][][])")
        .unwrap_err();
    assert!(err.is_malformed_signature());
    assert!(err.to_string().contains("maximum array dimension is 3"));

    let err = reflection
        .get_method("pkg.Missing.run(pkg.Missing[][][][])")
        .unwrap_err();
    assert!(err.is_malformed_signature());
}

#[test]
fn test_get_type_from_formats_name() {
    let reflection = catalog_reflection();
    let pkg = "pkg";
    let name = format!("{pkg}.Part");
    assert_eq!(
        reflection.get_type_from(&name),
        reflection.get_type("pkg.Part")
    );
    assert!(reflection.get_type_from(&42).is_none());
}

// =============================================================================
// HIERARCHY
// =============================================================================

#[test]
fn test_super_type_and_interfaces() {
    let reflection = catalog_reflection();
    let gadget = reflection.get_type("pkg.Gadget").unwrap();
    let widget = reflection.get_type("pkg.Widget").unwrap();
    let named = reflection.get_type("pkg.Named").unwrap();

    assert_eq!(reflection.super_type(&gadget), Some(widget.clone()));
    assert_eq!(reflection.interfaces(&gadget), vec![named.clone()]);
    assert!(reflection.super_type(&widget).is_none());
    assert!(reflection.interfaces(&widget).is_empty());
    assert!(named.is_interface());
    assert!(reflection.super_type(&Primitive::Long.handle()).is_none());
}

// =============================================================================
// CACHING
// =============================================================================

#[test]
fn test_repeated_resolution_hits_cache() {
    let loader = CountingLoader::new(Arc::clone(&*CATALOG));
    let reflection = DefaultReflection::new(Arc::clone(&loader));

    let first = reflection.get_type("pkg.Part").unwrap();
    let calls = loader.calls();
    let second = reflection.get_type("pkg.Part").unwrap();
    assert_eq!(first, second);
    assert_eq!(loader.calls(), calls);
}

#[test]
fn test_repeated_signature_lookup_shares_target() {
    let loader = CountingLoader::new(Arc::clone(&*CATALOG));
    let reflection = DefaultReflection::new(Arc::clone(&loader));

    let a = reflection
        .get_constructor("pkg.Widget(int, pkg.Part[])")
        .unwrap()
        .unwrap();
    let calls = loader.calls();
    let b = reflection
        .get_constructor("pkg.Widget(int, pkg.Part[])")
        .unwrap()
        .unwrap();
    assert!(a.same_target(&b));
    assert_eq!(loader.calls(), calls);

    let m1 = reflection.get_method("pkg.Util.sum(int,int)").unwrap().unwrap();
    let m2 = reflection.get_method("pkg.Util.sum( int , int )").unwrap().unwrap();
    assert!(m1.same_target(&m2));
}

#[test]
fn test_default_constructor_handles_share_target() {
    let reflection = catalog_reflection();
    let a = reflection.get_constructor("pkg.Widget()").unwrap().unwrap();
    let b = reflection.get_constructor("pkg.Widget( )").unwrap().unwrap();
    assert!(a.same_target(&b));
}
