use crate::class::{Class, ClassName};
use crate::error::LoadError;

/// The host's class-loading context.
///
/// Turns the raw bytes of a `.class` archive entry into a [`Class`]. A loader
/// must hand out one handle per name: defining a name twice returns the
/// handle it already holds.
pub trait ClassLoader: Send + Sync {
    fn define_class(&self, name: &ClassName, bytes: &[u8]) -> Result<Class, LoadError>;
}
