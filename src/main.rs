/// weedscope entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = weedscope::native::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
