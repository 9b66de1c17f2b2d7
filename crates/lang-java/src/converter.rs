use autoregister_api::{ClassKind, ClassName, FieldInfo};
use ristretto_classfile::attributes::Attribute;
use ristretto_classfile::{ClassAccessFlags, ConstantPool, Field, FieldAccessFlags};

pub struct JavaKindConverter;

impl JavaKindConverter {
    pub fn parse_class(flags: ClassAccessFlags) -> ClassKind {
        if flags.contains(ClassAccessFlags::ANNOTATION) {
            ClassKind::Annotation
        } else if flags.contains(ClassAccessFlags::ENUM) {
            ClassKind::Enum
        } else if flags.contains(ClassAccessFlags::INTERFACE) {
            ClassKind::Interface
        } else {
            ClassKind::Class
        }
    }
}

pub struct JavaMemberConverter;

impl JavaMemberConverter {
    pub fn convert_field(pool: &ConstantPool, field: &Field) -> Result<FieldInfo, String> {
        let name = utf8(pool, field.name_index)?;
        let descriptor = utf8(pool, field.descriptor_index)?;
        let mut info = FieldInfo::new(name, descriptor)
            .with_static(field.access_flags.contains(FieldAccessFlags::STATIC))
            .with_final(field.access_flags.contains(FieldAccessFlags::FINAL));
        info.annotations = Self::convert_annotations(pool, &field.attributes)?;
        Ok(info)
    }

    /// Runtime-visible annotation types among `attributes`.
    ///
    /// Invisible (class-retention) annotations are not seen at runtime and
    /// are skipped.
    pub fn convert_annotations(
        pool: &ConstantPool,
        attributes: &[Attribute],
    ) -> Result<Vec<ClassName>, String> {
        let mut names = Vec::new();
        for attribute in attributes {
            if let Attribute::RuntimeVisibleAnnotations { annotations, .. } = attribute {
                for annotation in annotations {
                    let descriptor = utf8(pool, annotation.type_index)?;
                    let name = ClassName::from_descriptor(&descriptor)
                        .ok_or_else(|| format!("Invalid annotation descriptor {descriptor}"))?;
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}

fn utf8(pool: &ConstantPool, index: u16) -> Result<String, String> {
    pool.try_get_utf8(index)
        .map(|value| value.to_string())
        .map_err(|e| format!("Failed to read constant {index}: {e:?}"))
}
