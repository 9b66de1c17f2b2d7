//! Class-file backed class loading for jar scanning.

pub mod converter;
pub mod loader;

pub use loader::ClassFileLoader;
