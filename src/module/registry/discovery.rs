//! Artifact discovery
//!
//! Scans an artifacts directory and loads the descriptor of every module
//! found there.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::module::registry::descriptor::ArtifactDescriptor;
use crate::module::traits::IsolationError;
use crate::module::validation::{DescriptorValidator, ValidationResult};

/// TOML descriptor file name inside a module directory
pub const DESCRIPTOR_FILE: &str = "artifact.toml";
/// Property-style descriptor file name inside a module directory
pub const PROPERTIES_FILE: &str = "artifact.properties";

/// Discovered artifact information
#[derive(Debug, Clone)]
pub struct DiscoveredArtifact {
    /// Module directory path
    pub directory: PathBuf,
    /// Descriptor file the module was loaded from
    pub descriptor_path: PathBuf,
    /// Parsed descriptor
    pub descriptor: ArtifactDescriptor,
}

/// Artifact discovery scanner
pub struct ArtifactDiscovery {
    /// Base directory to scan for modules
    artifacts_dir: PathBuf,
    /// Skip descriptors that fail validation instead of only logging them
    strict: bool,
}

impl ArtifactDiscovery {
    /// Create a new discovery scanner
    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> Self {
        Self {
            artifacts_dir: artifacts_dir.as_ref().to_path_buf(),
            strict: true,
        }
    }

    /// Keep descriptors that fail validation (they are still logged)
    pub fn lenient(mut self) -> Self {
        self.strict = false;
        self
    }

    /// Discover all artifacts in the artifacts directory
    ///
    /// Entries are returned sorted by module directory so repeated scans
    /// register modules in the same order.
    pub fn discover(&self) -> Result<Vec<DiscoveredArtifact>, IsolationError> {
        info!("Discovering artifacts in {:?}", self.artifacts_dir);

        if !self.artifacts_dir.exists() {
            debug!("Artifacts directory does not exist: {:?}", self.artifacts_dir);
            return Ok(Vec::new());
        }

        let mut directories = Vec::new();
        for entry in fs::read_dir(&self.artifacts_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                directories.push(path);
            }
        }
        directories.sort();

        let mut artifacts = Vec::new();
        for directory in directories {
            match self.load(&directory) {
                Ok(Some(artifact)) => artifacts.push(artifact),
                Ok(None) => {
                    debug!("No descriptor found in {:?}, skipping", directory);
                }
                Err(e) => {
                    warn!("Failed to load descriptor in {:?}: {}", directory, e);
                }
            }
        }

        info!("Discovered {} artifacts", artifacts.len());
        Ok(artifacts)
    }

    /// Discover a specific artifact by directory name
    pub fn discover_artifact(&self, name: &str) -> Result<DiscoveredArtifact, IsolationError> {
        let directory = self.artifacts_dir.join(name);
        self.load(&directory)?.ok_or_else(|| {
            IsolationError::ModuleNotFound(format!(
                "Artifact {} not found (no {} or {} in {:?})",
                name, DESCRIPTOR_FILE, PROPERTIES_FILE, directory
            ))
        })
    }

    fn load(&self, directory: &Path) -> Result<Option<DiscoveredArtifact>, IsolationError> {
        let toml_path = directory.join(DESCRIPTOR_FILE);
        let properties_path = directory.join(PROPERTIES_FILE);

        let (descriptor, descriptor_path) = if toml_path.is_file() {
            (ArtifactDescriptor::from_file(&toml_path)?, toml_path)
        } else if properties_path.is_file() {
            let name = directory
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    IsolationError::InvalidDescriptor(format!(
                        "Artifact directory name is not valid UTF-8: {:?}",
                        directory
                    ))
                })?;
            let text = fs::read_to_string(&properties_path)?;
            (
                ArtifactDescriptor::from_properties(name, &text)?,
                properties_path,
            )
        } else {
            return Ok(None);
        };

        if let ValidationResult::Invalid(errors) = DescriptorValidator::new().validate(&descriptor)
        {
            if self.strict {
                return Err(IsolationError::InvalidDescriptor(format!(
                    "{}: {}",
                    descriptor.name,
                    errors.join("; ")
                )));
            }
            warn!(
                "Keeping artifact {} despite validation errors: {:?}",
                descriptor.name, errors
            );
        }

        Ok(Some(DiscoveredArtifact {
            directory: directory.to_path_buf(),
            descriptor_path,
            descriptor,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, module: &str, file: &str, contents: &str) {
        let module_dir = dir.join(module);
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(module_dir.join(file), contents).unwrap();
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let discovery = ArtifactDiscovery::new(temp.path().join("absent"));
        assert!(discovery.discover().unwrap().is_empty());
    }

    #[test]
    fn test_discovers_toml_and_properties() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "billing",
            DESCRIPTOR_FILE,
            "name = \"billing\"\n[export]\nclass_packages = [\"com.acme.billing.api\"]\n",
        );
        write(
            temp.path(),
            "shipping",
            PROPERTIES_FILE,
            "artifact.export.classPackages=com.acme.shipping.api\n",
        );
        fs::create_dir_all(temp.path().join("empty")).unwrap();

        let artifacts = ArtifactDiscovery::new(temp.path()).discover().unwrap();
        let names: Vec<_> = artifacts.iter().map(|a| a.descriptor.name.as_str()).collect();
        assert_eq!(names, vec!["billing", "shipping"]);
    }

    #[test]
    fn test_invalid_descriptor_skipped_unless_lenient() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "broken",
            DESCRIPTOR_FILE,
            "name = \"broken\"\n[export]\nclass_packages = [\"com.acme.\"]\n",
        );

        assert!(ArtifactDiscovery::new(temp.path()).discover().unwrap().is_empty());
        assert_eq!(
            ArtifactDiscovery::new(temp.path()).lenient().discover().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_discover_artifact_not_found() {
        let temp = TempDir::new().unwrap();
        let result = ArtifactDiscovery::new(temp.path()).discover_artifact("nope");
        assert!(matches!(result, Err(IsolationError::ModuleNotFound(_))));
    }
}
