//! Search scope registration, ordering and removal.

use std::sync::Arc;

use reflect::host::{Loader, SearchScope, TypeBuilder, TypeRegistry, object};
use reflect::{DefaultReflection, Reflection};

use crate::helpers::fixtures::*;
use crate::helpers::loaders::CountingLoader;

fn empty_default() -> DefaultReflection {
    DefaultReflection::new(Arc::new(TypeRegistry::named("default")))
}

fn registry_with(names: &[&str]) -> Arc<TypeRegistry> {
    let registry = TypeRegistry::named("extra");
    for name in names {
        registry
            .define(TypeBuilder::class(*name).constructor(&[], |_| Ok(object(()))))
            .unwrap();
    }
    Arc::new(registry)
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[test]
fn test_registered_scope_is_searched() {
    let reflection = empty_default();
    assert!(reflection.get_type("pkg.Part").is_none());

    reflection.add_search_scope(SearchScope::from(Arc::clone(&*CATALOG)));
    assert!(reflection.get_type("pkg.Part").is_some());
}

#[test]
fn test_default_scope_wins_over_registered_scopes() {
    let default = registry_with(&["app.Config"]);
    let shadow = registry_with(&["app.Config"]);
    let reflection = DefaultReflection::new(Arc::clone(&default));
    reflection.add_search_scope(SearchScope::from(Arc::clone(&shadow)));

    let resolved = reflection.get_type("app.Config").unwrap();
    assert_eq!(Some(resolved), default.load_type("app.Config"));
}

#[test]
fn test_scopes_searched_in_registration_order() {
    let first = registry_with(&["app.Config"]);
    let second = registry_with(&["app.Config", "app.Other"]);
    let reflection = empty_default();
    reflection.add_search_scope(SearchScope::from(Arc::clone(&first)));
    reflection.add_search_scope(SearchScope::from(Arc::clone(&second)));

    let config = reflection.get_type("app.Config").unwrap();
    assert_eq!(Some(config), first.load_type("app.Config"));
    let other = reflection.get_type("app.Other").unwrap();
    assert_eq!(Some(other), second.load_type("app.Other"));
}

#[test]
fn test_same_scope_registered_once() {
    let reflection = empty_default();
    let scope = SearchScope::from(Arc::clone(&*CATALOG));
    reflection.add_search_scope(scope.clone());
    reflection.add_search_scope(scope.clone());
    assert_eq!(reflection.search_scopes().len(), 1);

    reflection.remove_search_scope(&scope);
    assert!(reflection.get_type("pkg.Part").is_none());
}

// =============================================================================
// REMOVAL
// =============================================================================

#[test]
fn test_removal_invalidates_cached_resolution() {
    let reflection = empty_default();
    let scope = SearchScope::from(Arc::clone(&*CATALOG));
    reflection.add_search_scope(scope.clone());
    assert!(reflection.get_type("pkg.Widget").is_some());
    assert!(reflection.cached_len() > 0);

    reflection.remove_search_scope(&scope);
    assert_eq!(reflection.cached_len(), 0);
    assert!(reflection.get_type("pkg.Widget").is_none());
    assert!(reflection.get_constructor("pkg.Widget()").unwrap().is_none());
}

#[test]
fn test_removal_clears_unrelated_entries() {
    let default = registry_with(&["app.Config"]);
    let loader = CountingLoader::new(Arc::clone(&default));
    let reflection = DefaultReflection::new(Arc::clone(&loader));
    let extra = SearchScope::from(registry_with(&["app.Plugin"]));
    reflection.add_search_scope(extra.clone());

    assert!(reflection.get_type("app.Config").is_some());
    let calls = loader.calls();
    reflection.remove_search_scope(&extra);

    assert!(reflection.get_type("app.Config").is_some());
    assert_eq!(loader.calls(), calls + 1);
}

#[test]
fn test_removing_unknown_scope_still_invalidates() {
    let reflection = DefaultReflection::new(Arc::clone(&*CATALOG));
    assert!(reflection.get_type("pkg.Part").is_some());
    reflection.remove_search_scope(&SearchScope::from(registry_with(&[])));
    assert_eq!(reflection.cached_len(), 0);
    assert!(reflection.get_type("pkg.Part").is_some());
}

#[test]
fn test_handles_survive_scope_removal() {
    let reflection = empty_default();
    let scope = SearchScope::from(Arc::clone(&*CATALOG));
    reflection.add_search_scope(scope.clone());
    let sum = reflection
        .get_method("pkg.Util.sum(int, int)")
        .unwrap()
        .unwrap();

    reflection.remove_search_scope(&scope);
    let result = sum.invoke2(None, object(2i32), object(3i32)).unwrap().unwrap();
    assert_eq!(result.downcast_ref::<i32>(), Some(&5));
}
