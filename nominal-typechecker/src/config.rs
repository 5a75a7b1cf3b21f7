//! Type system configuration
//!
//! Configuration can be built in code or loaded from TOML text:
//!
//! ```toml
//! default_package = "app"
//! max_depth = 64
//! ```

use crate::error::TypeResult;
use serde::Deserialize;

/// Package assigned to definitions that never call `.package()`
pub const DEFAULT_PACKAGE: &str = "default";

/// Maximum number of hierarchy hops walked by lookup and assignability checks
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeSystemConfig {
    /// Package name given to new definitions
    pub default_package: String,
    /// Recursion guard for hierarchy walks
    pub max_depth: usize,
}

impl TypeSystemConfig {
    /// Parse a configuration from TOML text, filling missing keys with defaults
    pub fn from_toml_str(source: &str) -> TypeResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn with_default_package(mut self, package: impl Into<String>) -> Self {
        self.default_package = package.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for TypeSystemConfig {
    fn default() -> Self {
        Self {
            default_package: DEFAULT_PACKAGE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
