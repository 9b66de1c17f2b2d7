use crate::error::ConfigError;
use autoregister_api::ClassName;
use serde::{Deserialize, Serialize};

/// Annotation that marks static fields receiving the host.
pub const DEFAULT_INJECT_MARKER: &str = "com.miketheshadow.autoregister.annotations.InjectPlugin";

/// Settings for one scan.
///
/// Built once and moved into the scan; the toggles cannot change while a scan
/// is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Dotted package prefix, e.g. `com.example.plugin`.
    pub package_prefix: String,
    /// Inspect every archive entry instead of stopping at the first entry
    /// that falls outside the package prefix.
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default = "default_inject_marker")]
    pub inject_marker: ClassName,
}

fn default_inject_marker() -> ClassName {
    ClassName::new(DEFAULT_INJECT_MARKER)
}

impl ScanConfig {
    pub fn new(package_prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            package_prefix: package_prefix.into(),
            force: false,
            debug_logging: false,
            inject_marker: default_inject_marker(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Log class counts and query results at info level.
    pub fn enable_debug_messages(mut self) -> Self {
        self.debug_logging = true;
        self
    }

    /// Disable the early-exit prefix heuristic and visit every entry.
    pub fn force_load_all_classes(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn with_inject_marker(mut self, marker: impl Into<ClassName>) -> Self {
        self.inject_marker = marker.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package_prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        Ok(())
    }

    /// The package prefix in archive path form (`com/example/plugin`).
    pub fn search_path(&self) -> String {
        self.package_prefix.replace('.', "/")
    }
}
