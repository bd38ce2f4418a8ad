use std::env;

/// Compiler used when `CUSTOM_CC` is unset.
pub const DEFAULT_CC: &str = "clang-12";
/// Compiler used when `CUSTOM_CXX` is unset.
pub const DEFAULT_CXX: &str = "clang++-12";

/// Overrides for the wrapped compiler executables.
///
/// The environment is read once, at the binary's edge; everything below
/// works on this explicit value so resolution stays a pure function.
#[derive(Debug, Clone, Default)]
pub struct ToolchainConfig {
    pub cc: Option<String>,
    pub cxx: Option<String>,
}

impl ToolchainConfig {
    /// Capture `CUSTOM_CC` / `CUSTOM_CXX` from the process environment.
    pub fn from_env() -> Self {
        Self {
            cc: env::var("CUSTOM_CC").ok(),
            cxx: env::var("CUSTOM_CXX").ok(),
        }
    }

    /// The executable to invoke. Never fails: absent overrides fall back to
    /// the fixed clang defaults.
    pub fn resolve(&self, is_cpp: bool) -> &str {
        if is_cpp {
            self.cxx.as_deref().unwrap_or(DEFAULT_CXX)
        } else {
            self.cc.as_deref().unwrap_or(DEFAULT_CC)
        }
    }
}
