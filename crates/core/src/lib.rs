//! Package-prefix class discovery over a host's jar.
//!
//! [`ClassDiscovery`] scans the archive once, injects the host into marked
//! static fields and answers annotation queries over the classes it found.

pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod scanner;

pub use config::{DEFAULT_INJECT_MARKER, ScanConfig};
pub use diagnostics::Diagnostics;
pub use discovery::ClassDiscovery;
pub use error::{ConfigError, QueryError, ScanError};
pub use scanner::{DiscoveredClasses, ScanStats, scan};
