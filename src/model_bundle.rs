use crate::error::ConfigError;
use std::path::PathBuf;

/// Application resources that ship next to the binary.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    root: PathBuf,
}

impl ModelBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the `name.extension` resource. A missing resource is a setup error.
    pub fn resolve(&self, name: &str, extension: &str) -> Result<PathBuf, ConfigError> {
        let path = self.root.join(name).with_extension(extension);
        if path.is_file() {
            Ok(path)
        } else {
            Err(ConfigError::ModelResourceMissing(path))
        }
    }
}
