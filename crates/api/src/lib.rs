//! Contracts shared between the archive scanner and the hosts that use it.

pub mod class;
pub mod error;
pub mod host;
pub mod inject;
pub mod loader;

pub use class::{Class, ClassInfo, ClassKind, ClassName, FieldInfo};
pub use error::{BoxError, InjectError, LoadError};
pub use host::Host;
pub use inject::{HostSlot, InjectionTable, Injector};
pub use loader::ClassLoader;
