use std::env;
use std::process;

use instrument_cc::{
    ClangWrapper, CompilerWrapper, DriverVariant, Error, ToolchainConfig, DRIVER_FAILURE_CODE,
};

/// LearnSanitizer toolchain: shadow-memory instrumentation pass plus the
/// runtime object its hooks call into.
const VARIANT: DriverVariant = DriverVariant {
    name: "learnsan-cc",
    plugin: "LearnSanitizer.so",
    runtime_object: Some("learnsan-rt.o"),
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
