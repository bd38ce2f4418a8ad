use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, trace};

use crate::{DriverVariant, Error, Mode, ToolchainConfig};

/// Flags prepended to every non-passthrough invocation. They keep the
/// pass's output deterministic and attributable to source locations, and
/// they go first so caller-supplied flags can still override them in the
/// compiler's left-to-right argument processing.
pub const BASELINE_FLAGS: &[&str] = &["-g", "-fno-inline-functions", "-fno-discard-value-names"];

/// Builder interface of a compiler wrapper.
///
/// `parse_args` must run before `command` or `run`; the rest of the
/// builder calls can come in any order before that.
pub trait CompilerWrapper {
    /// Force the C++ toolchain identity instead of detecting it from the
    /// invoked program name.
    fn cpp(&mut self, is_cpp: bool) -> &mut Self;

    /// Suppress the command-line echo on stdout. Some configure scripts
    /// compare compiler output verbatim and choke on the extra line.
    fn silence(&mut self, silent: bool) -> &mut Self;

    /// Append a driver-side argument. It lands after the caller's
    /// arguments but before the plugin-load flags.
    fn add_arg<S: Into<String>>(&mut self, arg: S) -> &mut Self;

    /// Digest the raw `env::args()` vector: detect the C++ alias from the
    /// program name, keep the rest for forwarding.
    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<&mut Self, Error>;

    /// The assembled argument vector, without the compiler executable
    /// itself. Empty for the zero-argument passthrough.
    fn command(&self) -> Result<Vec<String>, Error>;

    /// Echo and execute the wrapped compiler, returning its exit code.
    fn run(&mut self) -> Result<i32, Error>;
}

/// The shared driver core: one of these, parametrized by a
/// [`DriverVariant`], is the whole difference between `anderson-cc`,
/// `fuzzing-cc` and `learnsan-cc`.
#[derive(Debug)]
pub struct ClangWrapper {
    variant: DriverVariant,
    toolchain: ToolchainConfig,
    install_dir: PathBuf,
    /// Explicit override from [`CompilerWrapper::cpp`], else detected.
    cpp: Option<bool>,
    detected_cpp: bool,
    silent: bool,
    parsed: bool,
    /// Invoked with no arguments at all: forward verbatim, inject nothing.
    passthrough: bool,
    args: Vec<String>,
    extra_args: Vec<String>,
}

impl ClangWrapper {
    /// Build a wrapper anchored at the directory containing the current
    /// executable. Fails fast if the variant's runtime object is missing,
    /// before any argument is looked at.
    pub fn new(variant: DriverVariant, toolchain: ToolchainConfig) -> Result<Self, Error> {
        let exe = env::current_exe().map_err(Error::InstallDir)?;
        let install_dir = exe.parent().map(Path::to_path_buf).ok_or_else(|| {
            Error::InstallDir(io::Error::new(
                io::ErrorKind::NotFound,
                "executable has no parent directory",
            ))
        })?;
        Self::with_install_dir(variant, toolchain, install_dir)
    }

    /// Like [`ClangWrapper::new`] with an explicit artifact directory.
    pub fn with_install_dir(
        variant: DriverVariant,
        toolchain: ToolchainConfig,
        install_dir: PathBuf,
    ) -> Result<Self, Error> {
        variant.ensure_runtime_object(&install_dir)?;
        Ok(Self {
            variant,
            toolchain,
            install_dir,
            cpp: None,
            detected_cpp: false,
            silent: false,
            parsed: false,
            passthrough: false,
            args: Vec::new(),
            extra_args: Vec::new(),
        })
    }

    fn is_cpp(&self) -> bool {
        self.cpp.unwrap_or(self.detected_cpp)
    }

    /// Whether `program` names a C++ alias of the wrapper. Matches the
    /// usual dual-binary conventions: `*-c++`, `*-cpp`, `*-cxx`, plus
    /// `_pp`-suffixed hardlinks. Anything else is the C identity.
    fn is_cpp_alias(program: &str) -> bool {
        let name = Path::new(program)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(program)
            .to_lowercase();
        let name = name.strip_suffix(".exe").unwrap_or(&name);
        name.contains("++") || name.ends_with("pp") || name.ends_with("xx")
    }
}

impl CompilerWrapper for ClangWrapper {
    fn cpp(&mut self, is_cpp: bool) -> &mut Self {
        self.cpp = Some(is_cpp);
        self
    }

    fn silence(&mut self, silent: bool) -> &mut Self {
        self.silent = silent;
        self
    }

    fn add_arg<S: Into<String>>(&mut self, arg: S) -> &mut Self {
        self.extra_args.push(arg.into());
        self
    }

    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) -> Result<&mut Self, Error> {
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::InvalidArguments("the program name is missing".into()))?;
        self.detected_cpp = Self::is_cpp_alias(program.as_ref());
        self.passthrough = rest.is_empty();
        self.args = rest.iter().map(|arg| arg.as_ref().to_string()).collect();
        self.parsed = true;
        Ok(self)
    }

    fn command(&self) -> Result<Vec<String>, Error> {
        if !self.parsed {
            return Err(Error::InvalidArguments(
                "parse_args must run before command".into(),
            ));
        }
        if self.passthrough {
            return Ok(Vec::new());
        }

        let mode = Mode::of(&self.args);
        debug!("{}: {:?} invocation", self.variant.name, mode);

        let mut argv: Vec<String> = BASELINE_FLAGS.iter().map(|flag| flag.to_string()).collect();
        argv.extend(self.args.iter().cloned());
        argv.extend(self.extra_args.iter().cloned());

        // Load the pass in both modes: the final link may still compile
        // source files handed straight to it.
        let plugin = self.variant.plugin_path(&self.install_dir);
        argv.push("-Xclang".into());
        argv.push("-load".into());
        argv.push("-Xclang".into());
        argv.push(plugin.display().to_string());

        // The runtime object goes last, after the plugin flags, so nothing
        // the caller passed can shadow either.
        if mode == Mode::Link {
            if let Some(runtime) = self.variant.runtime_object_path(&self.install_dir) {
                argv.push(runtime.display().to_string());
            }
        }
        Ok(argv)
    }

    fn run(&mut self) -> Result<i32, Error> {
        let tool = self.toolchain.resolve(self.is_cpp()).to_string();
        let argv = self.command()?;
        trace!("{}: exec {} {:?}", self.variant.name, tool, argv);

        if !self.silent {
            if argv.is_empty() {
                println!("{tool}");
            } else {
                println!("{} {}", tool, argv.join(" "));
            }
        }

        let status = Command::new(&tool)
            .args(&argv)
            .status()
            .map_err(|source| Error::Launch {
                tool: tool.clone(),
                source,
            })?;
        // A child killed by a signal has no code; never report that as
        // success.
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARIANT: DriverVariant = DriverVariant {
        name: "test-cc",
        plugin: "Pass.so",
        runtime_object: Some("rt.o"),
    };

    const NO_RT: DriverVariant = DriverVariant {
        name: "bare-cc",
        plugin: "Pass.so",
        runtime_object: None,
    };

    fn wrapper(variant: DriverVariant) -> (tempfile::TempDir, ClangWrapper) {
        let dir = tempfile::tempdir().unwrap();
        if let Some(rt) = variant.runtime_object {
            std::fs::write(dir.path().join(rt), b"").unwrap();
        }
        let cc =
            ClangWrapper::with_install_dir(variant, ToolchainConfig::default(), dir.path().into())
                .unwrap();
        (dir, cc)
    }

    fn args(argv: &[&str]) -> Vec<String> {
        argv.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn compile_line_keeps_baseline_caller_plugin_order() {
        let (dir, mut cc) = wrapper(VARIANT);
        let argv = cc
            .parse_args(&args(&["test-cc", "-c", "foo.c", "-o", "foo.o"]))
            .unwrap()
            .command()
            .unwrap();

        let plugin = dir.path().join("Pass.so").display().to_string();
        let mut expected = args(BASELINE_FLAGS);
        expected.extend(args(&["-c", "foo.c", "-o", "foo.o"]));
        expected.extend(args(&["-Xclang", "-load", "-Xclang"]));
        expected.push(plugin);
        assert_eq!(argv, expected);
    }

    #[test]
    fn link_line_ends_with_the_runtime_object() {
        let (dir, mut cc) = wrapper(VARIANT);
        let argv = cc
            .parse_args(&args(&["test-cc", "foo.o", "-o", "foo"]))
            .unwrap()
            .command()
            .unwrap();

        let runtime = dir.path().join("rt.o").display().to_string();
        assert_eq!(argv.last(), Some(&runtime));
        // ... and the plugin flags come right before it.
        let plugin = dir.path().join("Pass.so").display().to_string();
        assert_eq!(argv[argv.len() - 2], plugin);
    }

    #[test]
    fn compile_line_never_links_the_runtime_object() {
        let (dir, mut cc) = wrapper(VARIANT);
        let argv = cc
            .parse_args(&args(&["test-cc", "-c", "foo.c"]))
            .unwrap()
            .command()
            .unwrap();
        let runtime = dir.path().join("rt.o").display().to_string();
        assert!(!argv.contains(&runtime));
    }

    #[test]
    fn link_line_without_a_runtime_object_ends_with_the_plugin() {
        let (dir, mut cc) = wrapper(NO_RT);
        let argv = cc
            .parse_args(&args(&["bare-cc", "foo.o", "-o", "foo"]))
            .unwrap()
            .command()
            .unwrap();
        let plugin = dir.path().join("Pass.so").display().to_string();
        assert_eq!(argv.last(), Some(&plugin));
    }

    #[test]
    fn extra_args_stay_between_caller_args_and_plugin_flags() {
        let (_dir, mut cc) = wrapper(NO_RT);
        cc.add_arg("-fsanitize-coverage=trace-pc-guard");
        let argv = cc
            .parse_args(&args(&["bare-cc", "-c", "foo.c"]))
            .unwrap()
            .command()
            .unwrap();

        let extra = argv
            .iter()
            .position(|arg| arg == "-fsanitize-coverage=trace-pc-guard")
            .unwrap();
        let caller = argv.iter().position(|arg| arg == "foo.c").unwrap();
        let load = argv.iter().position(|arg| arg == "-load").unwrap();
        assert!(caller < extra && extra < load);
    }

    #[test]
    fn zero_arguments_forward_verbatim() {
        let (_dir, mut cc) = wrapper(VARIANT);
        let argv = cc.parse_args(&args(&["test-cc"])).unwrap().command().unwrap();
        assert!(argv.is_empty());
    }

    #[test]
    fn command_before_parse_args_is_refused() {
        let (_dir, cc) = wrapper(VARIANT);
        assert!(matches!(cc.command(), Err(Error::InvalidArguments(_))));
    }

    #[test]
    fn empty_argv_is_refused() {
        let (_dir, mut cc) = wrapper(VARIANT);
        let none: [&str; 0] = [];
        assert!(matches!(
            cc.parse_args(&none),
            Err(Error::InvalidArguments(_))
        ));
    }

    #[test]
    fn cpp_alias_detection() {
        for alias in ["learnsan-cc++", "/usr/bin/fuzzing-cpp", "anderson-cxx", "compiler_pp"] {
            assert!(ClangWrapper::is_cpp_alias(alias), "{alias}");
        }
        for alias in ["learnsan-cc", "/usr/local/bin/anderson-cc", "cc"] {
            assert!(!ClangWrapper::is_cpp_alias(alias), "{alias}");
        }
    }

    #[test]
    fn explicit_cpp_override_beats_detection() {
        let (_dir, mut cc) = wrapper(VARIANT);
        cc.cpp(true);
        cc.parse_args(&args(&["test-cc", "-c", "foo.c"])).unwrap();
        assert!(cc.is_cpp());
    }
}
