use std::env;

fn main() {
    // kotlin goes through the generic bindgen, swift has its own entry point
    let is_kotlin = env::args().any(|arg| arg.to_lowercase().contains("kotlin"));

    if is_kotlin {
        uniffi::uniffi_bindgen_main();
    } else {
        uniffi::uniffi_bindgen_swift();
    }
}
