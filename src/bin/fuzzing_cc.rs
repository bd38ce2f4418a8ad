use std::env;
use std::process;

use instrument_cc::{
    ClangWrapper, CompilerWrapper, DriverVariant, Error, ToolchainConfig, DRIVER_FAILURE_CODE,
};

/// Fuzzing toolchain: coverage pass plus the AFL++ compiler runtime, which
/// lives in the AFLplusplus checkout two levels above the install dir.
const VARIANT: DriverVariant = DriverVariant {
    name: "fuzzing-cc",
    plugin: "FuzzingPass/FuzzingPass.so",
    runtime_object: Some("../../AFLplusplus/afl-compiler-rt.o"),
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
