//! Archive scanner.
//!
//! Walks the host's jar in entry order, turns every `.class` entry under the
//! package prefix into a [`Class`] through the host's class loader, and hands
//! fields carrying the inject marker to the host's injector.
//!
//! Unless `force` is set, the walk uses the prefix heuristic in
//! [`PrefixGate`] and may stop before the end of the archive.

use crate::config::ScanConfig;
use crate::diagnostics::Diagnostics;
use crate::error::ScanError;
use autoregister_api::{Class, ClassName, Host};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use zip::ZipArchive;

pub const CLASS_SUFFIX: &str = ".class";

const META_INF_DIR: &str = "META-INF/";
const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";

/// Counters for one scan pass.
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    /// Entries the loop looked at, including the one that stopped it.
    pub entries_visited: usize,
    pub classes_loaded: usize,
    /// Candidate entries that could not be read or defined.
    pub load_failures: usize,
    pub injections: usize,
    pub injection_failures: usize,
    /// The prefix heuristic ended the pass before the last entry.
    pub stopped_early: bool,
    pub duration: Duration,
}

/// Classes found by one scan pass.
#[derive(Debug, Default, Clone)]
pub struct DiscoveredClasses {
    classes: HashSet<Class>,
    stats: ScanStats,
}

impl DiscoveredClasses {
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, name: &ClassName) -> bool {
        self.classes.contains(name)
    }

    pub fn get(&self, name: &ClassName) -> Option<&Class> {
        self.classes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Class> {
        self.classes.iter()
    }

    pub fn as_set(&self) -> &HashSet<Class> {
        &self.classes
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Classes whose own class-level annotations include `annotation`.
    pub fn annotated_with(&self, annotation: &ClassName) -> HashSet<Class> {
        self.classes
            .iter()
            .filter(|class| class.is_annotated_with(annotation))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a DiscoveredClasses {
    type Item = &'a Class;
    type IntoIter = std::collections::hash_set::Iter<'a, Class>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}

/// Scan the host's archive once and return a fresh set of classes.
///
/// Fatal failures are logged on the error channel before being returned.
pub fn scan<H: Host>(config: &ScanConfig, host: &Arc<H>) -> Result<DiscoveredClasses, ScanError> {
    let diagnostics = Diagnostics::new(host.name(), config.debug_logging);
    scan_with(config, host, &diagnostics)
}

pub(crate) fn scan_with<H: Host>(
    config: &ScanConfig,
    host: &Arc<H>,
    diagnostics: &Diagnostics,
) -> Result<DiscoveredClasses, ScanError> {
    let result = config.validate().map_err(ScanError::from).and_then(|()| {
        ArchiveScanner {
            search: config.search_path(),
            config,
            host,
            diagnostics,
        }
        .run()
    });
    if let Err(e) = &result {
        diagnostics.error(format_args!("Error loading classes! Unable to recover. {e}"));
    }
    result
}

struct ArchiveScanner<'a, H: Host> {
    config: &'a ScanConfig,
    host: &'a Arc<H>,
    diagnostics: &'a Diagnostics,
    search: String,
}

impl<H: Host> ArchiveScanner<'_, H> {
    fn run(&self) -> Result<DiscoveredClasses, ScanError> {
        let start = Instant::now();
        let path = self.host.archive_path().map_err(ScanError::Location)?;
        let mut archive = open_archive(&path)?;

        let mut classes = HashSet::new();
        let mut stats = ScanStats::default();
        let mut gate = PrefixGate::new(&self.search);

        for index in manifest_head_len(&archive)..archive.len() {
            let mut entry = archive.by_index(index).map_err(|source| ScanError::Archive {
                path: path.clone(),
                source,
            })?;
            let name = entry.name().to_owned();
            stats.entries_visited += 1;

            if !self.config.force && !gate.admits(&name) {
                stats.stopped_early = true;
                self.diagnostics.debug_log(format_args!(
                    "Stopped at {name}: entry is outside package {}",
                    self.config.package_prefix
                ));
                break;
            }

            if !is_candidate(&name, &self.search) {
                continue;
            }

            let class_name = class_name_for(&name);
            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                stats.load_failures += 1;
                self.diagnostics
                    .debug_log(format_args!("Skipped {class_name}: {e}"));
                continue;
            }

            let class = match self
                .host
                .class_loader()
                .define_class(&class_name, &bytes)
            {
                Ok(class) => class,
                Err(e) => {
                    stats.load_failures += 1;
                    self.diagnostics.debug_log(format_args!("Skipped {class_name}: {e}"));
                    continue;
                }
            };
            stats.classes_loaded += 1;

            self.inject(&class, &mut stats);
            classes.insert(class);
        }

        stats.duration = start.elapsed();
        self.diagnostics
            .debug_log(format_args!("Total classes loaded: {}", classes.len()));

        Ok(DiscoveredClasses { classes, stats })
    }

    fn inject(&self, class: &Class, stats: &mut ScanStats) {
        let injector = self.host.injector();
        let marker = &self.config.inject_marker;

        for field in class
            .declared_fields()
            .iter()
            .filter(|field| field.is_annotated_with(marker))
        {
            match injector.inject(class, field, self.host) {
                Ok(()) => stats.injections += 1,
                Err(e) => {
                    stats.injection_failures += 1;
                    self.diagnostics
                        .debug_log(format_args!("Skipped injection: {e}"));
                }
            }
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|source| ScanError::Archive {
        path: path.to_path_buf(),
        source,
    })
}

/// Number of leading entries that a jar reader consumes as the manifest.
fn manifest_head_len(archive: &ZipArchive<File>) -> usize {
    let mut skip = 0;
    if archive
        .name_for_index(skip)
        .is_some_and(|name| name.eq_ignore_ascii_case(META_INF_DIR))
    {
        skip += 1;
    }
    if archive
        .name_for_index(skip)
        .is_some_and(|name| name.eq_ignore_ascii_case(MANIFEST_NAME))
    {
        skip += 1;
    }
    skip
}

/// Early-exit heuristic for archives that cluster the target package first.
///
/// Entries shorter than the search path must occur inside it until the first
/// entry at least as long as the search path is seen; after that every entry
/// is admitted. The first short entry that fails the check ends the scan.
/// Lengths and slices count UTF-16 code units, as jar entry names do on the
/// JVM.
#[derive(Debug)]
pub(crate) struct PrefixGate {
    search: Vec<u16>,
    boundary_found: bool,
}

impl PrefixGate {
    pub(crate) fn new(search: &str) -> Self {
        Self {
            search: search.encode_utf16().collect(),
            boundary_found: false,
        }
    }

    /// Returns false when the scan must stop at `path`.
    pub(crate) fn admits(&mut self, path: &str) -> bool {
        let path: Vec<u16> = path.encode_utf16().collect();
        let compare = if path.len() >= self.search.len() {
            self.boundary_found = true;
            &path[..self.search.len().saturating_sub(1)]
        } else {
            &path[..]
        };
        self.boundary_found || contains(&self.search, compare)
    }
}

fn contains<T: PartialEq>(haystack: &[T], needle: &[T]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

fn is_candidate(path: &str, search: &str) -> bool {
    path.contains(search) && path.ends_with(CLASS_SUFFIX)
}

fn class_name_for(path: &str) -> ClassName {
    ClassName::from_internal(path.strip_suffix(CLASS_SUFFIX).unwrap_or(path))
}
