use circom_bridge::NativeEngine;

/// Display version information
pub fn execute() {
    println!("circom-bridge {}", env!("CARGO_PKG_VERSION"));
    println!("Buffer-protocol bridge to the circom proving engine");
    match NativeEngine::new() {
        Ok(_) => println!("Native engine: linked"),
        Err(e) => println!("Native engine: {}", e),
    }
}
