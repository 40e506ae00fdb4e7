//! Generates `include/ujs.h` from the exported `ujs_*` functions.

use std::env;
use std::fs;
use std::path::PathBuf;

const HEADER: &str = "ujs.h";

fn main() {
    let crate_dir =
        PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by cargo"));
    let config_path = crate_dir.join("cbindgen.toml");

    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-changed={}", crate_dir.join("src").display());

    let config = cbindgen::Config::from_file(&config_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", config_path.display()));

    let include_dir = crate_dir.join("include");
    fs::create_dir_all(&include_dir)
        .unwrap_or_else(|e| panic!("failed to create {}: {e}", include_dir.display()));

    let bindings = match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => bindings,
        Err(e) => panic!("cbindgen failed to generate {HEADER}: {e}"),
    };
    bindings.write_to_file(include_dir.join(HEADER));
}
