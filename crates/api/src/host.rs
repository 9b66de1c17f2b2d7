use crate::error::BoxError;
use crate::inject::Injector;
use crate::loader::ClassLoader;
use std::path::PathBuf;

/// The application hosting the scan.
///
/// The host is shared as `Arc<Self>` and is the value written into every
/// injection target. The scan only reads from it.
pub trait Host: Send + Sync + Sized + 'static {
    /// Name used to tag log events.
    fn name(&self) -> &str;

    /// Location of the archive the host was loaded from.
    fn archive_path(&self) -> Result<PathBuf, BoxError>;

    fn class_loader(&self) -> &dyn ClassLoader;

    fn injector(&self) -> &dyn Injector<Self>;
}
