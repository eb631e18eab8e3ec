use std::env;

const DEFAULT_ENGINE_LIB: &str = "circom2go";

fn main() {
    println!("cargo:rerun-if-env-changed=CIRCOM_ENGINE_LIB_DIR");
    println!("cargo:rerun-if-env-changed=CIRCOM_ENGINE_LIB");

    let native_enabled = env::var("CARGO_FEATURE_NATIVE").is_ok();
    if !native_enabled {
        return;
    }

    if let Ok(dir) = env::var("CIRCOM_ENGINE_LIB_DIR") {
        if !dir.trim().is_empty() {
            println!("cargo:rustc-link-search=native={}", dir.trim());
        }
    }

    let lib = env::var("CIRCOM_ENGINE_LIB")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENGINE_LIB.to_owned());
    println!("cargo:rustc-link-lib=dylib={}", lib.trim());
}
