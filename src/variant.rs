use std::path::{Path, PathBuf};

use crate::Error;

/// Everything that distinguishes one instrumentation toolchain's wrapper
/// from another. Each wrapper binary holds one of these as a `const`; the
/// rest of the driver is shared.
///
/// Both paths are relative to the directory containing the wrapper
/// executable, so an installed toolchain behaves the same no matter where
/// the build system invokes it from.
#[derive(Debug, Clone, Copy)]
pub struct DriverVariant {
    /// Name used in error messages and the log, nothing else.
    pub name: &'static str,
    /// Compiler plugin loaded into every compilation unit.
    pub plugin: &'static str,
    /// Support object appended to link lines. `None` for analysis-only
    /// toolchains that add nothing at run time.
    pub runtime_object: Option<&'static str>,
}

impl DriverVariant {
    pub fn plugin_path(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(self.plugin)
    }

    pub fn runtime_object_path(&self, install_dir: &Path) -> Option<PathBuf> {
        self.runtime_object.map(|rt| install_dir.join(rt))
    }

    /// Fail fast if the declared runtime object is not on disk.
    ///
    /// Called once at wrapper construction, before any argument is looked
    /// at: a missing runtime artifact means the toolchain build is broken,
    /// and compiling half a project before the first link discovers that
    /// wastes everyone's time.
    pub fn ensure_runtime_object(&self, install_dir: &Path) -> Result<(), Error> {
        if let Some(path) = self.runtime_object_path(install_dir) {
            if !path.is_file() {
                return Err(Error::MissingRuntimeObject {
                    variant: self.name.to_string(),
                    path,
                });
            }
        }
        Ok(())
    }
}
