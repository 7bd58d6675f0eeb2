//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary artifacts directory with one subdirectory per module
pub struct ArtifactsFixture {
    pub temp_dir: TempDir,
    pub artifacts_dir: PathBuf,
}

impl ArtifactsFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let artifacts_dir = temp_dir.path().join("artifacts");
        fs::create_dir_all(&artifacts_dir)?;
        Ok(Self {
            temp_dir,
            artifacts_dir,
        })
    }

    /// Write `artifact.toml` for a module
    pub fn add_toml(&self, module: &str, contents: &str) -> PathBuf {
        self.write(module, "artifact.toml", contents)
    }

    /// Write `artifact.properties` for a module
    pub fn add_properties(&self, module: &str, contents: &str) -> PathBuf {
        self.write(module, "artifact.properties", contents)
    }

    fn write(&self, module: &str, file: &str, contents: &str) -> PathBuf {
        let dir = self.artifacts_dir.join(module);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        fs::write(&path, contents).unwrap();
        path
    }
}

pub const BILLING_TOML: &str = r#"
name = "billing"
description = "Invoices and rates"

[export]
class_packages = ["com.acme.billing.api", "com.acme.billing.api.model"]
resource_packages = ["com/acme/billing", "META-INF/services"]

[lookup]
overrides = ["com.acme.billing", "-org.slf4j", "=org.slf4j.impl.StaticLoggerBinder"]
"#;

pub const SHIPPING_PROPERTIES: &str = "\
# shipping module
artifact.export.classPackages=com.acme.shipping.api
artifact.export.resourcePackages=com/acme/shipping
artifact.lookup.overrides=-com.acme.billing
artifact.lookup.defaultStrategy=local
";
