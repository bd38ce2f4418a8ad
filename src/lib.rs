//! Compiler wrappers for out-of-tree LLVM instrumentation passes.
//!
//! Build systems point `CC`/`CXX` at one of the wrapper binaries instead of
//! the system compiler. The wrapper forwards the whole command line to a
//! real clang, injecting the flags that load the toolchain's instrumentation
//! plugin and, when linking, the runtime object the instrumented code calls
//! into. From the build system's perspective the wrapper IS the compiler:
//! its stdout/stderr and exit code are the child's.
//!
//! Each toolchain differs only by its [`DriverVariant`] descriptor; all of
//! the argument handling lives in [`ClangWrapper`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod mode;
mod toolchain;
mod variant;
mod wrapper;

pub use mode::Mode;
pub use toolchain::{ToolchainConfig, DEFAULT_CC, DEFAULT_CXX};
pub use variant::DriverVariant;
pub use wrapper::{ClangWrapper, CompilerWrapper, BASELINE_FLAGS};

/// Exit code for failures of the wrapper itself, as opposed to failures of
/// the wrapped compiler. BSD `EX_NOINPUT`; compilers exit with small codes
/// and rust panics with 101, so 66 stands out in build logs.
pub const DRIVER_FAILURE_CODE: i32 = 66;

#[derive(Debug, Error)]
pub enum Error {
    /// The variant declares a runtime object that is not on disk. The
    /// toolchain build is broken; refuse to compile anything.
    #[error("runtime object `{path}` for {variant} is missing, rebuild the instrumentation toolchain")]
    MissingRuntimeObject { variant: String, path: PathBuf },

    /// Could not locate the wrapper executable, so artifact paths cannot be
    /// resolved.
    #[error("could not locate the wrapper executable: {0}")]
    InstallDir(#[source] io::Error),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The resolved compiler could not be started at all.
    #[error("failed to launch `{tool}`: {source}")]
    Launch { tool: String, source: io::Error },
}
