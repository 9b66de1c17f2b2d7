#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_PRIVATE: u16 = 0x0002;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_FINAL: u16 = 0x0010;
pub const ACC_SUPER: u16 = 0x0020;
pub const ACC_INTERFACE: u16 = 0x0200;
pub const ACC_ABSTRACT: u16 = 0x0400;
pub const ACC_ANNOTATION: u16 = 0x2000;
pub const ACC_ENUM: u16 = 0x4000;

const JAVA_8: u16 = 52;

/// Assembles minimal class files: no methods, optional fields and
/// runtime-visible annotations.
pub struct ClassBuilder {
    name: String,
    access: u16,
    annotations: Vec<String>,
    invisible: Vec<String>,
    fields: Vec<FieldSpec>,
}

struct FieldSpec {
    name: String,
    descriptor: String,
    access: u16,
    annotations: Vec<String>,
}

impl ClassBuilder {
    /// `name` is the internal form, e.g. `com/example/Foo`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access: ACC_PUBLIC | ACC_SUPER,
            annotations: Vec::new(),
            invisible: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn annotation_type(name: &str) -> Self {
        Self::new(name).access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION)
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    /// Add a runtime-visible class annotation given as a descriptor.
    pub fn annotated(mut self, descriptor: &str) -> Self {
        self.annotations.push(descriptor.to_string());
        self
    }

    /// Add a class-retention annotation, stored as `RuntimeInvisibleAnnotations`.
    pub fn annotated_invisible(mut self, descriptor: &str) -> Self {
        self.invisible.push(descriptor.to_string());
        self
    }

    pub fn field(mut self, name: &str, descriptor: &str, access: u16, annotations: &[&str]) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access,
            annotations: annotations.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut pool = Pool::default();
        let this_class = pool.class(&self.name);
        let super_class = pool.class("java/lang/Object");

        let fields: Vec<(u16, u16, u16, Vec<u16>)> = self
            .fields
            .iter()
            .map(|f| {
                let name = pool.utf8(&f.name);
                let descriptor = pool.utf8(&f.descriptor);
                let annotations: Vec<u16> = f.annotations.iter().map(|a| pool.utf8(a)).collect();
                (f.access, name, descriptor, annotations)
            })
            .collect();
        let annotations: Vec<u16> = self.annotations.iter().map(|a| pool.utf8(a)).collect();
        let invisible: Vec<u16> = self.invisible.iter().map(|a| pool.utf8(a)).collect();
        let visible_attr = pool.utf8("RuntimeVisibleAnnotations");
        let invisible_attr = pool.utf8("RuntimeInvisibleAnnotations");

        let mut out = Vec::new();
        out.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
        put_u16(&mut out, 0);
        put_u16(&mut out, JAVA_8);
        put_u16(&mut out, pool.entries.len() as u16 + 1);
        for entry in &pool.entries {
            out.extend_from_slice(entry);
        }
        put_u16(&mut out, self.access);
        put_u16(&mut out, this_class);
        put_u16(&mut out, super_class);
        put_u16(&mut out, 0); // interfaces

        put_u16(&mut out, fields.len() as u16);
        for (access, name, descriptor, annotations) in &fields {
            put_u16(&mut out, *access);
            put_u16(&mut out, *name);
            put_u16(&mut out, *descriptor);
            if annotations.is_empty() {
                put_u16(&mut out, 0);
            } else {
                put_u16(&mut out, 1);
                put_annotations(&mut out, visible_attr, annotations);
            }
        }

        put_u16(&mut out, 0); // methods

        let attribute_count = [!annotations.is_empty(), !invisible.is_empty()]
            .iter()
            .filter(|present| **present)
            .count();
        put_u16(&mut out, attribute_count as u16);
        if !annotations.is_empty() {
            put_annotations(&mut out, visible_attr, &annotations);
        }
        if !invisible.is_empty() {
            put_annotations(&mut out, invisible_attr, &invisible);
        }
        out
    }
}

#[derive(Default)]
struct Pool {
    entries: Vec<Vec<u8>>,
    utf8: HashMap<String, u16>,
}

impl Pool {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(index) = self.utf8.get(value) {
            return *index;
        }
        let mut entry = vec![1u8];
        put_u16(&mut entry, value.len() as u16);
        entry.extend_from_slice(value.as_bytes());
        self.entries.push(entry);
        let index = self.entries.len() as u16;
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        let mut entry = vec![7u8];
        put_u16(&mut entry, name_index);
        self.entries.push(entry);
        self.entries.len() as u16
    }
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_annotations(out: &mut Vec<u8>, attribute_name: u16, type_indexes: &[u16]) {
    put_u16(out, attribute_name);
    out.extend_from_slice(&(2 + 4 * type_indexes.len() as u32).to_be_bytes());
    put_u16(out, type_indexes.len() as u16);
    for type_index in type_indexes {
        put_u16(out, *type_index);
        put_u16(out, 0); // element-value pairs
    }
}

/// Write a jar with `entries` in order; names ending in `/` are directories.
pub fn write_jar(dir: &Path, entries: &[(&str, Vec<u8>)]) -> PathBuf {
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
