//! Export filter behavior as seen by a consuming loader

use std::collections::HashSet;

use artifact_isolation::{ClassLoaderFilter, ExportDecision, ExportFilter, IsolationError};

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_exported_package_does_not_cover_subpackages() {
    let filter = ExportFilter::new(["com.acme"], Vec::<&str>::new());

    assert!(filter.exports_class("com.acme.MyClass"));
    assert!(!filter.exports_class("com.acme.sub.MyClass"));
    assert!(!filter.exports_class("com.MyClass"));
    assert!(!filter.exports_class("com.acmeExtra.MyClass"));
}

#[test]
fn test_default_package_only_when_empty_string_exported() {
    let with_default = ExportFilter::new([""], [""]);
    assert!(with_default.exports_class("Foo"));
    assert!(!with_default.exports_class("a.Foo"));
    assert!(with_default.exports_resource("Foo.txt"));
    assert!(with_default.exports_resource("/Foo.txt"));
    assert!(!with_default.exports_resource("a/Foo.txt"));

    let without_default = ExportFilter::new(["a"], ["a"]);
    assert!(!without_default.exports_class("Foo"));
    assert!(!without_default.exports_resource("Foo.txt"));
}

#[test]
fn test_leading_slash_is_ignored_for_resources() {
    let filter = ExportFilter::new(Vec::<&str>::new(), ["a/b"]);
    for name in ["a/b/c.txt", "/a/b/c.txt"] {
        assert!(filter.exports_resource(name), "{} not exported", name);
    }
    assert_eq!(
        filter.resource_decision("/a/b/c.txt"),
        filter.resource_decision("a/b/c.txt")
    );
}

#[test]
fn test_absent_names_map_to_default_package() {
    let filter = ExportFilter::new([""], Vec::<&str>::new());
    assert!(filter.exports_class_opt(None));
    assert!(!filter.exports_resource_opt(None));
}

#[test]
fn test_malformed_names_classify() {
    let filter = ExportFilter::new(["", "a"], ["", "a"]);
    for name in ["", ".", "..", "/", "//", "a.", ".a", "a/", "\u{0}", "ä.ö.Ü", "a..B"] {
        let _ = filter.exports_class(name);
        let _ = filter.exports_resource(name);
    }
    assert!(filter.exports_class(".a"));
    assert!(filter.exports_class("a."));
}

#[test]
fn test_construction_requires_both_sets() {
    assert!(matches!(
        ExportFilter::from_parts(None, None),
        Err(IsolationError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        ExportFilter::from_parts(Some(set(&["a"])), None),
        Err(IsolationError::InvalidConfiguration(_))
    ));

    let filter = ExportFilter::from_parts(Some(set(&["a"])), Some(HashSet::new())).unwrap();
    assert_eq!(filter.class_decision("a.B"), ExportDecision::Exported);
}

#[test]
fn test_export_nothing_is_shared() {
    let a = ExportFilter::export_nothing();
    let b = ExportFilter::export_nothing();
    assert!(std::ptr::eq(a, b));
    assert_eq!(*a, ExportFilter::default());

    for name in ["com.acme.MyClass", "MyClass", "a/b.txt", "/x"] {
        assert!(!a.exports_class(name));
        assert!(!a.exports_resource(name));
    }
}

#[test]
fn test_filter_shared_across_threads() {
    let filter = std::sync::Arc::new(ExportFilter::new(["com.acme.api"], ["com/acme/api"]));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let filter = std::sync::Arc::clone(&filter);
            std::thread::spawn(move || {
                (0..1000).all(|_| {
                    filter.exports_class("com.acme.api.Widget")
                        && !filter.exports_class(&format!("com.acme.internal{}.Widget", i))
                })
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
