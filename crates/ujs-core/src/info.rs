//! Greeting and build identification strings.

use crate::config::RuntimeConfig;

/// Fixed greeting returned by [`hello`].
pub const HELLO: &str = "Hello from UnleashedJS C runtime!";

/// Greeting from the native runtime.
pub fn hello() -> &'static str {
    HELLO
}

/// Target architecture label: `x86_64`, `arm64`, or `unknown`.
pub fn arch() -> &'static str {
    if cfg!(target_arch = "x86_64") {
        "x86_64"
    } else if cfg!(target_arch = "aarch64") {
        "arm64"
    } else {
        "unknown"
    }
}

/// Compiler that built this crate, as reported by `rustc --version`.
pub fn compiler() -> &'static str {
    option_env!("UJS_RUSTC_VERSION").unwrap_or("rustc unknown")
}

/// Multi-line description of the runtime and the platform it was built for.
///
/// Returns a fresh `String` per call.
pub fn system_info(config: &RuntimeConfig) -> String {
    format!(
        "{} Runtime v{}\nArchitecture: {}\nCompiler: {}\nFeatures: {}",
        config.name,
        config.version,
        arch(),
        compiler(),
        config.features.join(", ")
    )
}
