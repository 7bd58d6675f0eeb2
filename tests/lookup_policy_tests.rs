//! Lookup policy precedence between forced-local and blocked overrides

use artifact_isolation::module::naming::PatternSet;
use artifact_isolation::module::policy::{NamePattern, OverrideSet};
use artifact_isolation::{IsolationError, LookupPolicy, LookupStrategy};

#[test]
fn test_exact_local_outranks_blocked_package() {
    let overrides = OverrideSet::builder()
        .blocked(NamePattern::Prefix("org.mycompany".into()))
        .local(NamePattern::Exact("org.mycompany.MyClass".into()))
        .build(true)
        .unwrap();
    let policy = LookupPolicy::new(overrides, LookupStrategy::Delegate);

    assert!(!policy.is_blocked("org.mycompany.MyClass"));
    assert!(policy.is_blocked("org.mycompany.Other"));
    assert!(!policy.is_blocked("MyClass"));
    assert_eq!(policy.lookup_strategy("org.mycompany.MyClass"), LookupStrategy::Local);
}

#[test]
fn test_exact_blocked_outranks_local_package() {
    let policy = LookupPolicy::from_entries(
        ["org.mycompany", "-=org.mycompany.Shared"],
        LookupStrategy::Delegate,
        true,
    )
    .unwrap();

    assert!(policy.is_blocked("org.mycompany.Shared"));
    assert!(policy.is_overridden("org.mycompany.Private"));
    assert!(!policy.is_overridden("org.mycompany.Shared"));
}

#[test]
fn test_prefix_is_boundary_aware() {
    let policy = LookupPolicy::from_entries(["-org.mycompany"], LookupStrategy::Local, true).unwrap();

    assert!(policy.is_blocked("org.mycompany.Sub.Class"));
    assert!(policy.is_blocked("org.mycompany"));
    assert!(!policy.is_blocked("org.mycompanyExtra.Class"));
    assert!(!policy.is_blocked("org.mycompan"));
}

#[test]
fn test_prefix_covers_resource_paths() {
    let policy =
        LookupPolicy::from_entries(["-org/mycompany"], LookupStrategy::Local, true).unwrap();

    assert_eq!(
        policy.resource_lookup_strategy("/org/mycompany/config.xml"),
        LookupStrategy::Delegate
    );
    assert_eq!(
        policy.resource_lookup_strategy("org/mycompanyExtra/config.xml"),
        LookupStrategy::Local
    );
    assert!(policy.is_resource_blocked("/org/mycompany/config.xml"));
}

#[test]
fn test_resource_prefix_stops_at_dotted_names() {
    let policy = LookupPolicy::from_entries(
        ["-com/acme/config", "-web/v1", "=web/v1.2/static/app.js"],
        LookupStrategy::Local,
        true,
    )
    .unwrap();

    // A dot belongs to the file or folder name
    assert_eq!(
        policy.resource_lookup_strategy("com/acme/config.xml"),
        LookupStrategy::Local
    );
    assert_eq!(
        policy.resource_lookup_strategy("web/v1.2/static/app.css"),
        LookupStrategy::Local
    );
    assert!(!policy.is_resource_blocked("/com/acme/config.xml"));

    assert!(policy.is_resource_blocked("com/acme/config/settings.xml"));
    assert!(policy.is_resource_blocked("/web/v1/static/app.js"));
    assert!(policy.is_resource_overridden("web/v1.2/static/app.js"));
}

#[test]
fn test_exact_pattern_does_not_cover_nested_names() {
    let policy =
        LookupPolicy::from_entries(["-=org.mycompany"], LookupStrategy::Local, true).unwrap();

    assert!(policy.is_blocked("org.mycompany"));
    assert!(!policy.is_blocked("org.mycompany.MyClass"));
}

#[test]
fn test_nearest_package_wins() {
    let policy = LookupPolicy::from_entries(
        ["-org", "org.mycompany", "-org.mycompany.legacy"],
        LookupStrategy::Local,
        true,
    )
    .unwrap();

    assert!(policy.is_blocked("org.other.A"));
    assert!(policy.is_overridden("org.mycompany.A"));
    assert!(policy.is_blocked("org.mycompany.legacy.A"));
}

#[test]
fn test_ambiguous_exact_entry_rejected() {
    let result = LookupPolicy::from_entries(
        ["=org.mycompany.MyClass", "-=org.mycompany.MyClass"],
        LookupStrategy::Delegate,
        true,
    );
    assert!(matches!(result, Err(IsolationError::AmbiguousOverride(_))));

    let local = PatternSet::from_parts(["org.mycompany.MyClass"], Vec::<&str>::new());
    let blocked = PatternSet::from_parts(["org.mycompany.MyClass"], Vec::<&str>::new());
    assert!(matches!(
        OverrideSet::from_sets(local, blocked),
        Err(IsolationError::AmbiguousOverride(_))
    ));
}

#[test]
fn test_ambiguous_entry_ignored_deterministically() {
    let entries = ["=org.mycompany.MyClass", "-=org.mycompany.MyClass", "org.mycompany"];

    for _ in 0..10 {
        let policy =
            LookupPolicy::from_entries(entries, LookupStrategy::Delegate, false).unwrap();
        // Conflicting entry dropped; the local package applies instead
        assert!(policy.is_overridden("org.mycompany.MyClass"));
        assert!(!policy.is_blocked("org.mycompany.MyClass"));
        assert_eq!(policy.overrides().entries(), vec!["org.mycompany".to_string()]);
    }
}

#[test]
fn test_never_both_local_and_blocked() {
    let policy = LookupPolicy::from_entries(
        ["-a", "a.b", "-=a.b.C", "=a", "-a.b.c"],
        LookupStrategy::Delegate,
        true,
    )
    .unwrap();

    for name in ["a", "a.X", "a.b", "a.b.C", "a.b.c", "a.b.c.D", "z", ""] {
        assert!(
            !(policy.is_blocked(name) && policy.is_overridden(name)),
            "{} is both local and blocked",
            name
        );
    }
    assert!(policy.is_overridden("a"));
    assert!(policy.is_blocked("a.X"));
    assert!(policy.is_overridden("a.b.X"));
    assert!(policy.is_blocked("a.b.C"));
    assert!(policy.is_blocked("a.b.c.D"));
}

#[test]
fn test_default_strategy_when_nothing_matches() {
    for strategy in [LookupStrategy::Local, LookupStrategy::Delegate] {
        let policy = LookupPolicy::from_entries(["-org.x"], strategy, true).unwrap();
        assert_eq!(policy.lookup_strategy("com.y.Z"), strategy);
        assert_eq!(policy.lookup_strategy(""), strategy);
    }
}
