#![allow(dead_code)]

use autoregister_api::{
    BoxError, Class, ClassInfo, ClassKind, ClassLoader, ClassName, Host, InjectionTable, Injector,
    LoadError,
};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Entry bytes that the stub loader refuses to define.
pub const BROKEN: &[u8] = b"broken";

/// Class loader that serves prepared class infos and ignores entry bytes.
#[derive(Default)]
pub struct StubLoader {
    classes: HashMap<ClassName, ClassInfo>,
}

impl StubLoader {
    pub fn with(mut self, info: ClassInfo) -> Self {
        self.classes.insert(info.name.clone(), info);
        self
    }
}

impl ClassLoader for StubLoader {
    fn define_class(&self, name: &ClassName, bytes: &[u8]) -> Result<Class, LoadError> {
        if bytes == BROKEN {
            return Err(LoadError::Malformed {
                class: name.clone(),
                reason: "truncated".to_string(),
            });
        }
        let info = self
            .classes
            .get(name)
            .cloned()
            .unwrap_or_else(|| ClassInfo::new(name.clone(), ClassKind::Class));
        Ok(Class::new(info))
    }
}

pub struct TestPlugin {
    pub archive: PathBuf,
    pub loader: StubLoader,
    pub injector: InjectionTable<TestPlugin>,
}

impl TestPlugin {
    pub fn new(archive: PathBuf) -> Self {
        Self {
            archive,
            loader: StubLoader::default(),
            injector: InjectionTable::new(),
        }
    }

    pub fn with_loader(mut self, loader: StubLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_injector(mut self, injector: InjectionTable<TestPlugin>) -> Self {
        self.injector = injector;
        self
    }
}

impl Host for TestPlugin {
    fn name(&self) -> &str {
        "TestPlugin"
    }

    fn archive_path(&self) -> Result<PathBuf, BoxError> {
        Ok(self.archive.clone())
    }

    fn class_loader(&self) -> &dyn ClassLoader {
        &self.loader
    }

    fn injector(&self) -> &dyn Injector<Self> {
        &self.injector
    }
}

/// Write a jar containing `entries` in order. Names ending in `/` become
/// directory entries; `(name, bytes)` pairs give file contents.
pub fn write_jar(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join("plugin.jar");
    let file = File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, bytes) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(bytes).unwrap();
        }
    }

    zip.finish().unwrap();
    path
}

/// Shorthand for jars whose file entries carry placeholder bytes.
pub fn write_jar_names(dir: &Path, names: &[&str]) -> PathBuf {
    let entries: Vec<(&str, &[u8])> = names.iter().map(|n| (*n, b"CAFEBABE" as &[u8])).collect();
    write_jar(dir, &entries)
}

pub fn sorted_names<'a>(classes: impl IntoIterator<Item = &'a Class>) -> Vec<String> {
    let mut names: Vec<String> = classes.into_iter().map(|c| c.name().to_string()).collect();
    names.sort();
    names
}

/// Log events captured while a closure runs.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl Recorder {
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn count(&self, level: Level) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
