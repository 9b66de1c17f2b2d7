use crate::class::ClassName;

/// Boxed error for failures reported by the host.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why an archive entry could not be turned into a class.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Malformed class data for {class}: {reason}")]
    Malformed { class: ClassName, reason: String },
    #[error("Entry for {expected} declares class {found}")]
    NameMismatch { expected: ClassName, found: ClassName },
}

/// Why a marked field did not receive the host reference.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    #[error("Field {class}.{field} is not static")]
    NotStatic { class: ClassName, field: String },
    #[error("Field {class}.{field} is final")]
    Final { class: ClassName, field: String },
    #[error("No injection target bound for {class}.{field}")]
    Unbound { class: ClassName, field: String },
}
