use crate::config::ScanConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, QueryError, ScanError};
use crate::scanner::{self, DiscoveredClasses};
use autoregister_api::{Class, Host};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::sync::Arc;

/// Discovers the host's classes and answers annotation queries over them.
///
/// The scan runs at most once. Its result is published as a whole, so
/// readers on any thread see either no classes (`NotScanned`) or the
/// complete set.
pub struct ClassDiscovery<H: Host> {
    host: Arc<H>,
    config: ScanConfig,
    diagnostics: Diagnostics,
    classes: OnceCell<DiscoveredClasses>,
}

impl<H: Host> ClassDiscovery<H> {
    pub fn new(host: Arc<H>, config: ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let diagnostics = Diagnostics::new(host.name(), config.debug_logging);
        Ok(Self {
            host,
            config,
            diagnostics,
            classes: OnceCell::new(),
        })
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the archive, injecting the host into marked fields.
    ///
    /// Once a scan has succeeded, later calls return the same set without
    /// touching the archive again. A failed scan leaves nothing behind.
    pub fn scan(&self) -> Result<&DiscoveredClasses, ScanError> {
        self.classes
            .get_or_try_init(|| scanner::scan_with(&self.config, &self.host, &self.diagnostics))
    }

    pub fn is_scanned(&self) -> bool {
        self.classes.get().is_some()
    }

    /// Every class found by the scan.
    pub fn classes(&self) -> Result<&DiscoveredClasses, QueryError> {
        self.classes.get().ok_or(QueryError::NotScanned)
    }

    /// Discovered classes that carry `annotation` at class level.
    ///
    /// `annotation` must be an annotation type.
    pub fn classes_annotated_with(&self, annotation: &Class) -> Result<HashSet<Class>, QueryError> {
        if !annotation.is_annotation() {
            return Err(QueryError::NotAnAnnotation(annotation.name().clone()));
        }

        let annotated = self.classes()?.annotated_with(annotation.name());
        self.diagnostics.debug_log(format_args!(
            "Found: {} classes annotated with {}",
            annotated.len(),
            annotation.name()
        ));
        Ok(annotated)
    }
}

impl<H: Host> std::fmt::Debug for ClassDiscovery<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDiscovery")
            .field("host", &self.host.name())
            .field("config", &self.config)
            .field("scanned", &self.is_scanned())
            .finish()
    }
}
