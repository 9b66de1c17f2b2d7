use crate::converter::{JavaKindConverter, JavaMemberConverter};
use autoregister_api::{Class, ClassInfo, ClassLoader, ClassName, LoadError};
use dashmap::DashMap;
use ristretto_classfile::ClassFile;
use std::io::Cursor;

/// Defines classes from raw class-file bytes.
///
/// Each name is defined once; asking again for a name returns the cached
/// handle without parsing the new bytes.
#[derive(Default)]
pub struct ClassFileLoader {
    classes: DashMap<ClassName, Class>,
}

impl ClassFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_class(&self, name: &ClassName) -> Option<Class> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn parse(name: &ClassName, bytes: &[u8]) -> Result<Class, LoadError> {
        let malformed = |reason: String| LoadError::Malformed {
            class: name.clone(),
            reason,
        };

        let class = ClassFile::from_bytes(&mut Cursor::new(bytes.to_vec()))
            .map_err(|e| malformed(format!("Failed to parse class: {e:?}")))?;

        let declared = class
            .class_name()
            .map(|n| ClassName::from_internal(&n.to_string()))
            .map_err(|e| malformed(format!("Failed to read class name: {e:?}")))?;
        if &declared != name {
            return Err(LoadError::NameMismatch {
                expected: name.clone(),
                found: declared,
            });
        }

        let pool = &class.constant_pool;
        let annotations = JavaMemberConverter::convert_annotations(pool, &class.attributes)
            .map_err(malformed)?;
        let fields = class
            .fields
            .iter()
            .map(|field| JavaMemberConverter::convert_field(pool, field))
            .collect::<Result<Vec<_>, _>>()
            .map_err(malformed)?;

        Ok(Class::new(ClassInfo {
            name: declared,
            kind: JavaKindConverter::parse_class(class.access_flags),
            annotations,
            fields,
        }))
    }
}

impl ClassLoader for ClassFileLoader {
    fn define_class(&self, name: &ClassName, bytes: &[u8]) -> Result<Class, LoadError> {
        if let Some(existing) = self.find_class(name) {
            return Ok(existing);
        }
        let class = Self::parse(name, bytes)?;
        Ok(self.classes.entry(name.clone()).or_insert(class).value().clone())
    }
}
