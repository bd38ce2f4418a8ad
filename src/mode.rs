/// Flags that mean the compiler will not produce a final linked artifact,
/// either because it only compiles/preprocesses/assembles or because it
/// only answers a query about itself.
const NO_LINK_FLAGS: &[&str] = &["--version", "--target-help", "-c", "-E", "-S", "-shared"];

/// What the wrapped invocation will produce.
///
/// Deliberately coarse: the wrapper only needs to know whether the runtime
/// object belongs on this command line, not the full compiler grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Object file, preprocessed output, assembly, or a query like
    /// `--version`.
    Compile,
    /// A final executable or shared object.
    Link,
}

impl Mode {
    /// Classify a caller-supplied argument list. Total: any sequence maps
    /// to one of the two modes.
    pub fn of<S: AsRef<str>>(args: &[S]) -> Self {
        if args
            .iter()
            .any(|arg| NO_LINK_FLAGS.contains(&arg.as_ref()))
        {
            Mode::Compile
        } else {
            Mode::Link
        }
    }
}
