use std::env;
use std::process;

use instrument_cc::{
    ClangWrapper, CompilerWrapper, DriverVariant, Error, ToolchainConfig, DRIVER_FAILURE_CODE,
};

/// Andersen pointer-analysis toolchain: the pass only reports, so there is
/// no runtime object to link.
const VARIANT: DriverVariant = DriverVariant {
    name: "anderson-cc",
    plugin: "AndersonPointerAnalysisPass/Anderson.so",
    runtime_object: None,
};

pub fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut cc = ClangWrapper::new(VARIANT, ToolchainConfig::from_env())
        .unwrap_or_else(|err| fatal(err));

    let code = cc
        .parse_args(&args)
        .unwrap_or_else(|err| fatal(err))
        .run()
        .unwrap_or_else(|err| fatal(err));

    process::exit(code);
}

fn fatal(err: Error) -> ! {
    eprintln!("{}: {err}", VARIANT.name);
    process::exit(DRIVER_FAILURE_CODE)
}
