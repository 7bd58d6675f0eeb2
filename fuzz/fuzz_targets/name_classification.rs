#![no_main]
use artifact_isolation::module::naming::{ancestry, package_name, resource_folder, NameKind};
use artifact_isolation::{ClassLoaderFilter, ExportFilter, LookupPolicy, LookupStrategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Names reach the loader from untrusted archives and reflection calls:
    // every query must classify without panicking.
    let name = String::from_utf8_lossy(data);
    let name: &str = &name;

    let filter = ExportFilter::new(["", "org.acme", "org.acme.api"], ["", "org/acme", "META-INF"]);
    let first = (filter.exports_class(name), filter.exports_resource(name));
    assert_eq!(first, (filter.exports_class(name), filter.exports_resource(name)));
    assert!(!ExportFilter::export_nothing().exports_class(name));

    let policy = LookupPolicy::from_entries(
        ["-org", "org.acme", "=org.acme.Blocked", "-=MyClass", "-META-INF/services"],
        LookupStrategy::Delegate,
        true,
    )
    .expect("static overrides are consistent");
    assert!(!(policy.is_blocked(name) && policy.is_overridden(name)));
    let _ = policy.lookup_strategy(name);
    let _ = policy.resource_lookup_strategy(name);

    // Derived packages are always prefixes of the input
    assert!(name.starts_with(package_name(Some(name))));
    let _ = resource_folder(Some(name));
    assert_eq!(ancestry(name, NameKind::Class).last(), Some(""));
    assert_eq!(ancestry(name, NameKind::Resource).last(), Some(""));
    assert!(!(policy.is_resource_blocked(name) && policy.is_resource_overridden(name)));
});
