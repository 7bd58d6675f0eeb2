#![no_main]
use artifact_isolation::module::validation::DescriptorValidator;
use artifact_isolation::{ArtifactDescriptor, LookupStrategy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    // Malformed descriptors must surface as errors, never panics
    for parsed in [
        ArtifactDescriptor::from_properties("fuzzed", &text),
        ArtifactDescriptor::from_toml_str(&text),
    ] {
        if let Ok(descriptor) = parsed {
            let _ = DescriptorValidator::new().validate(&descriptor);
            let _ = descriptor.export_filter();
            let _ = descriptor.lookup_policy(LookupStrategy::Delegate, true);
            let _ = descriptor.lookup_policy(LookupStrategy::Local, false);
        }
    }
});
