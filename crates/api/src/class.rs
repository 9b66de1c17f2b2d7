//! Runtime class model.
//!
//! A [`Class`] is what a [`ClassLoader`](crate::ClassLoader) hands back for an
//! archive entry: the class name, its kind, its own class-level annotations
//! and its own declared fields. Inherited members are never part of it.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Dotted binary class name, e.g. `com.example.Foo` or `com.example.Foo$Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build from the internal form used inside archives (`com/example/Foo`).
    pub fn from_internal(internal: &str) -> Self {
        Self(internal.replace('/', "."))
    }

    /// Build from an object type descriptor (`Lcom/example/Foo;`).
    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        descriptor
            .strip_prefix('L')
            .and_then(|s| s.strip_suffix(';'))
            .filter(|s| !s.is_empty())
            .map(Self::from_internal)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The simple name, without package.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// The package part, empty for the default package.
    pub fn package(&self) -> &str {
        self.0.rfind('.').map(|idx| &self.0[..idx]).unwrap_or("")
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClassName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A field declared directly by a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    /// JVM field descriptor, e.g. `Lorg/bukkit/plugin/Plugin;`.
    pub descriptor: String,
    pub is_static: bool,
    pub is_final: bool,
    /// Runtime-visible annotations declared on the field.
    pub annotations: Vec<ClassName>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            is_static: false,
            is_final: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_final(mut self, is_final: bool) -> Self {
        self.is_final = is_final;
        self
    }

    pub fn annotated(mut self, annotation: impl Into<ClassName>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn is_annotated_with(&self, annotation: &ClassName) -> bool {
        self.annotations.iter().any(|a| a == annotation)
    }
}

/// Everything known about a loaded class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: ClassName,
    pub kind: ClassKind,
    /// Runtime-visible annotations declared on the class itself.
    pub annotations: Vec<ClassName>,
    /// Declared fields, in class-file order.
    pub fields: Vec<FieldInfo>,
}

impl ClassInfo {
    pub fn new(name: impl Into<ClassName>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotations: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// An annotation type with no members, for markers declared outside the archive.
    pub fn annotation_type(name: impl Into<ClassName>) -> Self {
        Self::new(name, ClassKind::Annotation)
    }

    pub fn annotated(mut self, annotation: impl Into<ClassName>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }
}

/// Shared handle to a loaded class.
///
/// Cloning is cheap. Two handles are equal when they name the same class,
/// since a loading context defines each name at most once.
#[derive(Debug, Clone)]
pub struct Class(Arc<ClassInfo>);

impl Class {
    pub fn new(info: ClassInfo) -> Self {
        Self(Arc::new(info))
    }

    pub fn name(&self) -> &ClassName {
        &self.0.name
    }

    pub fn is_annotation(&self) -> bool {
        self.0.kind == ClassKind::Annotation
    }

    /// True when the class itself (not a member) carries `annotation`.
    pub fn is_annotated_with(&self, annotation: &ClassName) -> bool {
        self.0.annotations.iter().any(|a| a == annotation)
    }

    pub fn declared_fields(&self) -> &[FieldInfo] {
        &self.0.fields
    }

    pub fn declared_field(&self, name: &str) -> Option<&FieldInfo> {
        self.0.fields.iter().find(|f| f.name == name)
    }
}

impl Deref for Class {
    type Target = ClassInfo;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<ClassInfo> for Class {
    fn from(info: ClassInfo) -> Self {
        Self::new(info)
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for Class {}

impl Hash for Class {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl Borrow<ClassName> for Class {
    fn borrow(&self) -> &ClassName {
        &self.0.name
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.name, f)
    }
}
